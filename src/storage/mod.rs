//! Persistence adapters for the directory store.
//!
//! The store only talks to the [`Persistence`] trait. `JsonFileStore` is the
//! on-disk format; `MemoryStore` keeps everything in process.

mod json_store;
mod memory;

pub use json_store::*;
pub use memory::*;

use std::collections::BTreeSet;

use crate::errors::AppError;
use crate::models::{Settings, Teammate};

/// Durable storage for the three persisted artifacts.
///
/// Loads return `Ok(None)` when an artifact has never been written and
/// `Err(AppError::Corrupt)` when it exists but does not decode.
pub trait Persistence {
    fn load_teammates(&self) -> Result<Option<Vec<Teammate>>, AppError>;
    fn save_teammates(&mut self, teammates: &[Teammate]) -> Result<(), AppError>;

    fn load_groups(&self) -> Result<Option<BTreeSet<String>>, AppError>;
    fn save_groups(&mut self, groups: &BTreeSet<String>) -> Result<(), AppError>;

    fn load_settings(&self) -> Result<Option<Settings>, AppError>;
    fn save_settings(&mut self, settings: &Settings) -> Result<(), AppError>;

    /// Remove every artifact.
    fn clear(&mut self) -> Result<(), AppError>;
}
