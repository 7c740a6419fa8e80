//! Teammate commands: add, edit, remove.

use std::collections::BTreeSet;
use std::path::Path;

use super::{resolve_teammate, AddArgs, AppState, CommandOutput, EditArgs, RemoveArgs};
use crate::errors::AppError;
use crate::models::NewTeammate;
use crate::storage::Persistence;
use crate::timezone;

pub fn add_teammate<P: Persistence>(
    state: &mut AppState<P>,
    args: AddArgs,
) -> Result<CommandOutput, AppError> {
    let name = required_name(&args.name)?;
    warn_unknown_zone(&args.time_zone);

    let image_data = args.avatar.as_deref().map(read_avatar).transpose()?;
    let groups = labels(args.groups)?;
    register_groups(state, &groups);

    let teammate = state.store.add(NewTeammate {
        name,
        time_zone_identifier: args.time_zone.trim().to_string(),
        image_data,
        email: args.email,
        slack_id: args.slack_id,
        groups,
    });
    tracing::info!("Added teammate {} ({})", teammate.name, teammate.id);

    Ok(CommandOutput::Teammate(state.row(teammate.id)?))
}

pub fn edit_teammate<P: Persistence>(
    state: &mut AppState<P>,
    args: EditArgs,
) -> Result<CommandOutput, AppError> {
    let id = resolve_teammate(&state.store, &args.teammate)?;
    let existing = state
        .store
        .get(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Teammate {} not found", id)))?;

    let mut updated = existing.clone();
    if let Some(name) = &args.name {
        updated.name = required_name(name)?;
    }
    if let Some(zone) = &args.time_zone {
        warn_unknown_zone(zone);
        updated.time_zone_identifier = zone.trim().to_string();
    }

    updated.email = if args.clear_email {
        None
    } else {
        args.email.clone().or(existing.email)
    };
    updated.slack_id = if args.clear_slack {
        None
    } else {
        args.slack_id.clone().or(existing.slack_id)
    };

    if args.clear_groups {
        updated.groups.clear();
    } else if !args.groups.is_empty() {
        updated.groups = labels(args.groups.clone())?;
        register_groups(state, &updated.groups);
    }

    if args.clear_avatar {
        updated.image_data = None;
    } else if let Some(path) = &args.avatar {
        updated.image_data = Some(read_avatar(path)?);
    }

    if !state.store.update(updated) {
        return Err(AppError::NotFound(format!("Teammate {} not found", id)));
    }
    Ok(CommandOutput::Teammate(state.row(id)?))
}

pub fn remove_teammate<P: Persistence>(
    state: &mut AppState<P>,
    args: RemoveArgs,
) -> Result<CommandOutput, AppError> {
    let removed = match (args.index, args.teammate.as_deref()) {
        (Some(index), _) => state.store.delete_at(index).ok_or_else(|| {
            AppError::NotFound(format!(
                "No teammate at position {} ({} stored)",
                index,
                state.store.teammates().len()
            ))
        })?,
        (None, Some(reference)) => {
            let id = resolve_teammate(&state.store, reference)?;
            state
                .store
                .delete(id)
                .ok_or_else(|| AppError::NotFound(format!("Teammate {} not found", id)))?
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "Pass a teammate or --index".to_string(),
            ))
        }
    };

    Ok(CommandOutput::message(format!(
        "Removed {} ({})",
        removed.name, removed.id
    )))
}

fn required_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    Ok(name.to_string())
}

fn labels(raw: Vec<String>) -> Result<BTreeSet<String>, AppError> {
    raw.into_iter()
        .map(|label| {
            let label = label.trim().to_string();
            if label.is_empty() {
                Err(AppError::Validation("Group label cannot be empty".to_string()))
            } else {
                Ok(label)
            }
        })
        .collect()
}

/// Make sure every label a teammate uses is a known group.
fn register_groups<P: Persistence>(state: &mut AppState<P>, groups: &BTreeSet<String>) {
    for group in groups {
        if state.store.add_group(group.clone()) {
            tracing::info!("Created group {:?}", group);
        }
    }
}

fn warn_unknown_zone(zone: &str) {
    if timezone::resolve(zone.trim()).is_none() {
        tracing::warn!(
            "Unknown time zone {:?}; local time will show as empty",
            zone
        );
    }
}

fn read_avatar(path: &Path) -> Result<Vec<u8>, AppError> {
    std::fs::read(path).map_err(|e| {
        AppError::BadRequest(format!("Cannot read avatar {}: {}", path.display(), e))
    })
}
