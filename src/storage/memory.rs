//! In-process persistence.

use std::collections::BTreeSet;

use super::Persistence;
use crate::errors::AppError;
use crate::models::{Settings, Teammate};

/// Keeps artifacts in memory. Writes can be made to fail to exercise the
/// store's best-effort durability path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    teammates: Option<Vec<Teammate>>,
    groups: Option<BTreeSet<String>>,
    settings: Option<Settings>,
    fail_writes: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing artifacts, as if loaded from disk.
    pub fn with_data(teammates: Vec<Teammate>, groups: BTreeSet<String>) -> Self {
        Self {
            teammates: Some(teammates),
            groups: Some(groups),
            ..Self::default()
        }
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn stored_teammates(&self) -> Option<&[Teammate]> {
        self.teammates.as_deref()
    }

    pub fn stored_groups(&self) -> Option<&BTreeSet<String>> {
        self.groups.as_ref()
    }

    fn check_writable(&mut self) -> Result<(), AppError> {
        if self.fail_writes {
            return Err(AppError::Persistence("memory store is read-only".to_string()));
        }
        self.writes += 1;
        Ok(())
    }
}

impl Persistence for MemoryStore {
    fn load_teammates(&self) -> Result<Option<Vec<Teammate>>, AppError> {
        Ok(self.teammates.clone())
    }

    fn save_teammates(&mut self, teammates: &[Teammate]) -> Result<(), AppError> {
        self.check_writable()?;
        self.teammates = Some(teammates.to_vec());
        Ok(())
    }

    fn load_groups(&self) -> Result<Option<BTreeSet<String>>, AppError> {
        Ok(self.groups.clone())
    }

    fn save_groups(&mut self, groups: &BTreeSet<String>) -> Result<(), AppError> {
        self.check_writable()?;
        self.groups = Some(groups.clone());
        Ok(())
    }

    fn load_settings(&self) -> Result<Option<Settings>, AppError> {
        Ok(self.settings.clone())
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), AppError> {
        self.check_writable()?;
        self.settings = Some(settings.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), AppError> {
        self.check_writable()?;
        self.teammates = None;
        self.groups = None;
        self.settings = None;
        Ok(())
    }
}
