//! Data models for teamclock.
//!
//! Field names serialize in camelCase; the persisted files and exports share
//! one wire format.

mod snapshot;
mod teammate;

pub use snapshot::*;
pub use teammate::*;
