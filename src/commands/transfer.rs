//! Export, import and reset.

use std::path::{Path, PathBuf};

use super::{AppState, CommandOutput, TransferSummary};
use crate::errors::AppError;
use crate::storage::Persistence;

/// Export the teammate list. Without a path the JSON document itself is the
/// command output.
pub fn export_teammates<P: Persistence>(
    state: &AppState<P>,
    path: Option<PathBuf>,
) -> Result<CommandOutput, AppError> {
    let bytes = state.store.export_snapshot()?;
    let count = state.store.teammates().len();

    let Some(path) = path else {
        let payload = String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("Export is not UTF-8: {}", e)))?;
        return Ok(CommandOutput::Raw(payload));
    };

    std::fs::write(&path, &bytes).map_err(|e| {
        AppError::Persistence(format!("Cannot write {}: {}", path.display(), e))
    })?;
    tracing::info!("Exported {} teammates to {}", count, path.display());

    Ok(CommandOutput::Transfer(TransferSummary {
        action: "Exported",
        count,
        path: Some(path),
    }))
}

/// Replace the teammate list with the contents of an export file.
pub fn import_teammates<P: Persistence>(
    state: &mut AppState<P>,
    path: &Path,
) -> Result<CommandOutput, AppError> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::Import(format!("Cannot read {}: {}", path.display(), e)))?;
    let count = state.store.import_snapshot(&bytes)?;
    tracing::info!("Imported {} teammates from {}", count, path.display());

    Ok(CommandOutput::Transfer(TransferSummary {
        action: "Imported",
        count,
        path: Some(path.to_path_buf()),
    }))
}

pub fn reset_directory<P: Persistence>(
    state: &mut AppState<P>,
    confirmed: bool,
) -> Result<CommandOutput, AppError> {
    if !confirmed {
        return Err(AppError::BadRequest(
            "Reset deletes every teammate, group and setting; pass --yes to confirm".to_string(),
        ));
    }

    let removed = state.store.teammates().len();
    state.store.reset();
    tracing::warn!("Directory reset ({} teammates removed)", removed);

    Ok(CommandOutput::message(format!(
        "Removed {} teammates and all groups",
        removed
    )))
}
