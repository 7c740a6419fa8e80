//! Group label and workspace commands.

use super::{AppState, CommandOutput, GroupsCommand, WorkspaceCommand, WorkspaceInfo};
use crate::errors::AppError;
use crate::storage::Persistence;

pub fn run_groups<P: Persistence>(
    state: &mut AppState<P>,
    command: GroupsCommand,
) -> Result<CommandOutput, AppError> {
    match command {
        GroupsCommand::List => {}
        GroupsCommand::Add { label } => {
            let label = label.trim();
            if label.is_empty() {
                return Err(AppError::Validation("Group label cannot be empty".to_string()));
            }
            if !state.store.add_group(label) {
                tracing::debug!("Group {:?} already exists", label);
            }
        }
        GroupsCommand::Remove { label } => {
            let touched = state.store.remove_group(label.trim());
            tracing::info!("Removed group {:?} ({} teammates updated)", label, touched);
        }
    }

    Ok(CommandOutput::Groups(
        state.store.groups().iter().cloned().collect(),
    ))
}

pub fn run_workspace<P: Persistence>(
    state: &mut AppState<P>,
    command: WorkspaceCommand,
) -> Result<CommandOutput, AppError> {
    match command {
        WorkspaceCommand::Show => {}
        WorkspaceCommand::Set { workspace } => {
            let workspace = workspace.trim();
            if workspace.is_empty() {
                return Err(AppError::Validation(
                    "Workspace id cannot be empty".to_string(),
                ));
            }
            state.store.set_workspace(Some(workspace.to_string()));
        }
        WorkspaceCommand::Clear => state.store.set_workspace(None),
    }

    Ok(CommandOutput::Workspace(WorkspaceInfo {
        slack_workspace: state.store.workspace().map(str::to_string),
    }))
}
