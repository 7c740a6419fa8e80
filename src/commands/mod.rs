//! Command front end.
//!
//! Parses nothing itself: `main` hands over a parsed [`Command`], and each
//! handler works against an [`AppState`] and returns a [`CommandOutput`].

mod board;
mod cli;
mod groups;
mod links;
mod output;
mod teammates;
mod transfer;
mod zones;

pub use board::*;
pub use cli::*;
pub use groups::*;
pub use links::*;
pub use output::*;
pub use teammates::*;
pub use transfer::*;
pub use zones::*;

use std::io::Write;

use chrono::Utc;
use uuid::Uuid;

use crate::config::Config;
use crate::directory::DirectoryStore;
use crate::errors::AppError;
use crate::storage::{JsonFileStore, Persistence};
use crate::timezone::ZoneClock;

/// Everything a command handler needs.
pub struct AppState<P: Persistence> {
    pub store: DirectoryStore<P>,
    pub clock: ZoneClock,
    pub config: Config,
}

impl<P: Persistence> AppState<P> {
    pub fn new(store: DirectoryStore<P>, config: Config) -> Self {
        let clock = ZoneClock::new(config.viewer_zone(), config.clock_style);
        Self {
            store,
            clock,
            config,
        }
    }

    /// Render the current directory for `args` at the current instant.
    pub fn board(&self, args: &ViewArgs) -> Board {
        Board::build(
            self.store.snapshot(),
            &args.query(),
            &self.clock,
            Utc::now(),
            self.store.workspace(),
        )
    }

    /// Display row for the teammate with `id`.
    pub fn row(&self, id: Uuid) -> Result<TeammateRow, AppError> {
        let position = self
            .store
            .index_of(id)
            .ok_or_else(|| AppError::NotFound(format!("Teammate {} not found", id)))?;
        let teammate = &self.store.teammates()[position];
        Ok(TeammateRow::new(
            teammate,
            position,
            &self.clock,
            Utc::now(),
            self.store.workspace(),
        ))
    }
}

/// Open the on-disk store and run `command`, writing results to `out`.
pub async fn dispatch<W: Write>(
    command: Command,
    config: Config,
    out: &mut W,
    format: OutputFormat,
) -> Result<(), AppError> {
    // Zone lookups never touch the directory.
    match command {
        Command::Zones { query } => {
            let output = zones(&config, &query.join(" ")).await;
            return emit(out, format, &output);
        }
        Command::Pick => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            return pick(&config, stdin, out, format).await;
        }
        _ => {}
    }

    let persistence = JsonFileStore::open(&config.data_dir)?;
    tracing::debug!("Data directory: {}", persistence.dir().display());
    let store = DirectoryStore::open(persistence);
    let mut state = AppState::new(store, config);

    match command {
        Command::Watch(args) => watch(&state, &args, out, format, None).await,
        other => {
            let output = run(&mut state, other)?;
            emit(out, format, &output)
        }
    }
}

/// Run a one-shot directory command.
pub fn run<P: Persistence>(
    state: &mut AppState<P>,
    command: Command,
) -> Result<CommandOutput, AppError> {
    match command {
        Command::List(args) => Ok(CommandOutput::Board(state.board(&args))),
        Command::Add(args) => add_teammate(state, args),
        Command::Edit(args) => edit_teammate(state, args),
        Command::Remove(args) => remove_teammate(state, args),
        Command::Groups(command) => run_groups(state, command),
        Command::Workspace(command) => run_workspace(state, command),
        Command::Export { path } => export_teammates(state, path),
        Command::Import { path } => import_teammates(state, &path),
        Command::Reset { yes } => reset_directory(state, yes),
        Command::Watch(_) | Command::Zones { .. } | Command::Pick => Err(AppError::BadRequest(
            "Interactive commands cannot run as one-shot commands".to_string(),
        )),
    }
}

/// Resolve a teammate reference: full id, unique id prefix, or unique
/// case-insensitive name.
pub fn resolve_teammate<P: Persistence>(
    store: &DirectoryStore<P>,
    reference: &str,
) -> Result<Uuid, AppError> {
    let reference = reference.trim();
    if let Ok(id) = Uuid::parse_str(reference) {
        return store
            .get(id)
            .map(|t| t.id)
            .ok_or_else(|| AppError::NotFound(format!("Teammate {} not found", id)));
    }

    let needle = reference.to_lowercase();
    let mut matches: Vec<Uuid> = store
        .teammates()
        .iter()
        .filter(|t| t.name.to_lowercase() == needle)
        .map(|t| t.id)
        .collect();

    if matches.is_empty() && needle.len() >= 4 {
        matches = store
            .teammates()
            .iter()
            .filter(|t| t.id.to_string().starts_with(&needle))
            .map(|t| t.id)
            .collect();
    }

    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(AppError::NotFound(format!(
            "No teammate matches {:?}",
            reference
        ))),
        _ => Err(AppError::BadRequest(format!(
            "{:?} matches {} teammates; use the id",
            reference,
            matches.len()
        ))),
    }
}
