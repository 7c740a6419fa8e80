//! Command results and their text / JSON rendering.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::errors::{AppError, ErrorResponse};
use crate::search::LookupResult;

use super::board::{Board, TeammateRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct CommandResponse<'a, T: Serialize> {
    pub success: bool,
    pub data: &'a T,
}

impl<'a, T: Serialize> CommandResponse<'a, T> {
    pub fn new(data: &'a T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// What a command produced.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CommandOutput {
    Board(Board),
    Teammate(TeammateRow),
    Groups(Vec<String>),
    Workspace(WorkspaceInfo),
    Transfer(TransferSummary),
    Zones(LookupResult),
    /// Already-encoded JSON written verbatim in both formats
    #[serde(skip_serializing)]
    Raw(String),
    Message(MessageBody),
}

impl CommandOutput {
    pub fn message(text: impl Into<String>) -> Self {
        CommandOutput::Message(MessageBody {
            message: text.into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceInfo {
    pub slack_workspace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSummary {
    pub action: &'static str,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutput::Board(board) => write!(f, "{}", board),
            CommandOutput::Teammate(row) => writeln!(f, "{}", row),
            CommandOutput::Groups(groups) if groups.is_empty() => writeln!(f, "No groups"),
            CommandOutput::Groups(groups) => {
                for group in groups {
                    writeln!(f, "{}", group)?;
                }
                Ok(())
            }
            CommandOutput::Workspace(info) => match &info.slack_workspace {
                Some(workspace) => writeln!(f, "Slack workspace: {}", workspace),
                None => writeln!(f, "No Slack workspace set"),
            },
            CommandOutput::Transfer(summary) => match &summary.path {
                Some(path) => writeln!(
                    f,
                    "{} {} teammates ({})",
                    summary.action,
                    summary.count,
                    path.display()
                ),
                None => writeln!(f, "{} {} teammates", summary.action, summary.count),
            },
            CommandOutput::Zones(result) if result.zones.is_empty() => {
                writeln!(f, "No time zones match {:?}", result.query)
            }
            CommandOutput::Zones(result) => {
                for zone in &result.zones {
                    writeln!(f, "{}", zone)?;
                }
                Ok(())
            }
            CommandOutput::Raw(payload) => writeln!(f, "{}", payload),
            CommandOutput::Message(body) => writeln!(f, "{}", body.message),
        }
    }
}

/// Write one command result in the requested format.
pub fn emit<W: Write + ?Sized>(
    out: &mut W,
    format: OutputFormat,
    output: &CommandOutput,
) -> Result<(), AppError> {
    match (format, output) {
        (_, CommandOutput::Raw(payload)) => writeln!(out, "{}", payload)?,
        (OutputFormat::Text, output) => write!(out, "{}", output)?,
        (OutputFormat::Json, output) => {
            serde_json::to_writer(&mut *out, &CommandResponse::new(output))
                .map_err(|e| AppError::Internal(format!("Failed to encode output: {}", e)))?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Write an error in the requested format.
pub fn emit_error<W: Write + ?Sized>(out: &mut W, format: OutputFormat, error: &AppError) {
    let written = match format {
        OutputFormat::Text => writeln!(out, "error: {}", error.message()),
        OutputFormat::Json => serde_json::to_writer(&mut *out, &ErrorResponse::new(error))
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(out)),
    };
    if let Err(e) = written {
        tracing::error!("Failed to report error: {}", e);
    }
}
