//! Teamclock
//!
//! A directory of teammates with their time zones. Shows each teammate's
//! local time and offset from the viewer, filtered, sorted and grouped,
//! with contact links. Data lives in JSON files under the data directory.

pub mod commands;
pub mod config;
pub mod directory;
pub mod errors;
pub mod models;
pub mod projection;
pub mod search;
pub mod storage;
pub mod timezone;
