//! The directory store: canonical teammate list, group labels and workspace id.
//!
//! Every mutation writes through to the [`Persistence`] adapter before
//! returning and then publishes the new snapshot to subscribers. Write
//! failures are logged and absorbed; the in-memory snapshot remains the source
//! of truth for the rest of the session.

use std::collections::BTreeSet;

use tokio::sync::watch;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{DirectorySnapshot, NewTeammate, Settings, Teammate};
use crate::storage::Persistence;

/// Owner of the directory state.
///
/// Single writer: methods that mutate take `&mut self`. Share it across
/// threads behind a mutex.
pub struct DirectoryStore<P: Persistence> {
    persistence: P,
    snapshot: DirectorySnapshot,
    settings: Settings,
    changes: watch::Sender<DirectorySnapshot>,
}

impl<P: Persistence> DirectoryStore<P> {
    /// Load state from `persistence`.
    ///
    /// Artifacts that were never written are initialized empty and written
    /// immediately. Corrupt artifacts load as empty and are left on disk
    /// until the next mutation replaces them.
    pub fn open(persistence: P) -> Self {
        let mut store = Self {
            persistence,
            snapshot: DirectorySnapshot::default(),
            settings: Settings::default(),
            changes: watch::channel(DirectorySnapshot::default()).0,
        };

        let teammates = Loaded::classify(store.persistence.load_teammates(), "teammates");
        let groups = Loaded::classify(store.persistence.load_groups(), "groups");
        let settings = Loaded::classify(store.persistence.load_settings(), "settings");

        let first_run_teammates = teammates.is_absent();
        let first_run_groups = groups.is_absent();

        store.snapshot.teammates = teammates.into_value();
        store.snapshot.groups = groups.into_value();
        store.settings = settings.into_value();

        if first_run_teammates {
            store.persist_teammates();
        }
        if first_run_groups {
            store.persist_groups();
        }

        tracing::info!(
            "Directory loaded with {} teammates and {} groups",
            store.snapshot.teammates.len(),
            store.snapshot.groups.len()
        );
        store.publish();
        store
    }

    pub fn snapshot(&self) -> &DirectorySnapshot {
        &self.snapshot
    }

    pub fn teammates(&self) -> &[Teammate] {
        &self.snapshot.teammates
    }

    pub fn groups(&self) -> &BTreeSet<String> {
        &self.snapshot.groups
    }

    pub fn get(&self, id: Uuid) -> Option<&Teammate> {
        self.snapshot.teammates.iter().find(|t| t.id == id)
    }

    /// Position of `id` in the current ordering, for use with [`Self::delete_at`].
    pub fn index_of(&self, id: Uuid) -> Option<usize> {
        self.snapshot.teammates.iter().position(|t| t.id == id)
    }

    pub fn workspace(&self) -> Option<&str> {
        self.settings.slack_workspace.as_deref()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Receiver that always holds the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<DirectorySnapshot> {
        self.changes.subscribe()
    }

    /// Append a teammate under a fresh id.
    pub fn add(&mut self, new_teammate: NewTeammate) -> Teammate {
        let teammate = new_teammate.into_teammate(Uuid::new_v4());
        tracing::debug!("Adding teammate {} ({})", teammate.name, teammate.id);

        self.snapshot.teammates.push(teammate.clone());
        self.persist_teammates();
        self.publish();
        teammate
    }

    /// Replace the teammate with the same id. Returns `false` when no such
    /// teammate exists, in which case nothing changes.
    pub fn update(&mut self, teammate: Teammate) -> bool {
        let Some(slot) = self
            .snapshot
            .teammates
            .iter_mut()
            .find(|t| t.id == teammate.id)
        else {
            tracing::debug!("Update skipped, teammate {} not found", teammate.id);
            return false;
        };

        *slot = teammate;
        self.persist_teammates();
        self.publish();
        true
    }

    pub fn delete(&mut self, id: Uuid) -> Option<Teammate> {
        let index = self.index_of(id)?;
        self.delete_at(index)
    }

    /// Remove by position in the current ordering. Indices shift after every
    /// mutation.
    pub fn delete_at(&mut self, index: usize) -> Option<Teammate> {
        if index >= self.snapshot.teammates.len() {
            return None;
        }

        let removed = self.snapshot.teammates.remove(index);
        tracing::debug!("Deleted teammate {} ({})", removed.name, removed.id);
        self.persist_teammates();
        self.publish();
        Some(removed)
    }

    /// Insert a group label. Returns `false` if it was already known.
    pub fn add_group(&mut self, label: impl Into<String>) -> bool {
        if !self.snapshot.groups.insert(label.into()) {
            return false;
        }

        self.persist_groups();
        self.publish();
        true
    }

    /// Remove a group label and strip it from every teammate.
    ///
    /// Returns the number of teammates that lost the label. The group set is
    /// written before the teammates; the two writes are not atomic.
    pub fn remove_group(&mut self, label: &str) -> usize {
        let known = self.snapshot.groups.remove(label);

        let mut touched = 0;
        for teammate in &mut self.snapshot.teammates {
            if teammate.groups.remove(label) {
                touched += 1;
            }
        }

        if !known && touched == 0 {
            return 0;
        }

        if known {
            self.persist_groups();
        }
        if touched > 0 {
            self.persist_teammates();
        }
        tracing::debug!("Removed group {:?} from {} teammates", label, touched);
        self.publish();
        touched
    }

    /// Set or clear the Slack workspace id.
    pub fn set_workspace(&mut self, workspace: Option<String>) {
        self.settings.slack_workspace = workspace;
        if let Err(e) = self.persistence.save_settings(&self.settings) {
            tracing::error!("Failed to persist settings: {}", e);
        }
    }

    /// Encode the teammate list (groups and settings are not included).
    pub fn export_snapshot(&self) -> Result<Vec<u8>, AppError> {
        serde_json::to_vec_pretty(&self.snapshot.teammates)
            .map_err(|e| AppError::Internal(format!("Failed to encode teammates: {}", e)))
    }

    /// Replace the whole teammate list with the decoded payload.
    ///
    /// Malformed payloads return [`AppError::Import`] and leave the current
    /// list untouched. Returns the number of imported teammates.
    pub fn import_snapshot(&mut self, bytes: &[u8]) -> Result<usize, AppError> {
        let teammates: Vec<Teammate> = serde_json::from_slice(bytes).map_err(|e| {
            tracing::warn!("Rejected import payload: {}", e);
            AppError::Import(format!("Not a teammate list: {}", e))
        })?;

        let mut seen = BTreeSet::new();
        if let Some(dup) = teammates.iter().find(|t| !seen.insert(t.id)) {
            return Err(AppError::Import(format!(
                "Duplicate teammate id {} in import",
                dup.id
            )));
        }

        let count = teammates.len();
        self.snapshot.teammates = teammates;
        self.persist_teammates();
        self.publish();
        tracing::info!("Imported {} teammates", count);
        Ok(count)
    }

    /// Clear every persisted artifact and the in-memory state.
    ///
    /// Leaves the store as on first launch: empty teammate and group
    /// artifacts are written back, settings stay absent.
    pub fn reset(&mut self) {
        if let Err(e) = self.persistence.clear() {
            tracing::error!("Failed to clear persisted data: {}", e);
        }
        self.snapshot = DirectorySnapshot::default();
        self.settings = Settings::default();
        self.persist_teammates();
        self.persist_groups();
        tracing::info!("Directory reset");
        self.publish();
    }

    fn persist_teammates(&mut self) {
        if let Err(e) = self.persistence.save_teammates(&self.snapshot.teammates) {
            tracing::error!("Failed to persist teammates: {}", e);
        }
    }

    fn persist_groups(&mut self) {
        if let Err(e) = self.persistence.save_groups(&self.snapshot.groups) {
            tracing::error!("Failed to persist groups: {}", e);
        }
    }

    fn publish(&self) {
        self.changes.send_replace(self.snapshot.clone());
    }
}

/// Outcome of loading one artifact at open time.
enum Loaded<T> {
    Present(T),
    Absent,
    Unreadable,
}

impl<T: Default> Loaded<T> {
    fn classify(result: Result<Option<T>, AppError>, what: &str) -> Self {
        match result {
            Ok(Some(value)) => Loaded::Present(value),
            Ok(None) => Loaded::Absent,
            Err(e) => {
                tracing::warn!("Ignoring unreadable {}: {}", what, e);
                Loaded::Unreadable
            }
        }
    }

    fn is_absent(&self) -> bool {
        matches!(self, Loaded::Absent)
    }

    fn into_value(self) -> T {
        match self {
            Loaded::Present(value) => value,
            Loaded::Absent | Loaded::Unreadable => T::default(),
        }
    }
}
