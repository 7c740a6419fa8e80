//! JSON file persistence.
//!
//! One file per artifact inside the data directory. Each write goes to a
//! `.tmp` sibling first and is renamed over the target.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Persistence;
use crate::errors::AppError;
use crate::models::{Settings, Teammate};

pub const TEAMMATES_FILE: &str = "teammates.json";
pub const GROUPS_FILE: &str = "groups.json";
pub const SETTINGS_FILE: &str = "settings.json";

/// Stores artifacts as pretty-printed JSON files under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            AppError::Persistence(format!(
                "Failed to create data directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        tracing::debug!("Opened data directory {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>, AppError> {
        let path = self.dir.join(file);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| AppError::Corrupt(format!("{}: {}", path.display(), e)))
    }

    fn write<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<(), AppError> {
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{}.tmp", file));
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| AppError::Internal(format!("Failed to encode {}: {}", file, e)))?;

        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        tracing::trace!("Wrote {}", path.display());
        Ok(())
    }

    fn remove(&self, file: &str) -> Result<(), AppError> {
        match fs::remove_file(self.dir.join(file)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Persistence for JsonFileStore {
    fn load_teammates(&self) -> Result<Option<Vec<Teammate>>, AppError> {
        self.read(TEAMMATES_FILE)
    }

    fn save_teammates(&mut self, teammates: &[Teammate]) -> Result<(), AppError> {
        self.write(TEAMMATES_FILE, teammates)
    }

    fn load_groups(&self) -> Result<Option<BTreeSet<String>>, AppError> {
        self.read(GROUPS_FILE)
    }

    fn save_groups(&mut self, groups: &BTreeSet<String>) -> Result<(), AppError> {
        self.write(GROUPS_FILE, groups)
    }

    fn load_settings(&self) -> Result<Option<Settings>, AppError> {
        self.read(SETTINGS_FILE)
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), AppError> {
        self.write(SETTINGS_FILE, settings)
    }

    fn clear(&mut self) -> Result<(), AppError> {
        self.remove(TEAMMATES_FILE)?;
        self.remove(GROUPS_FILE)?;
        self.remove(SETTINGS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTeammate;
    use tempfile::TempDir;
    use uuid::Uuid;

    #[test]
    fn test_missing_files_load_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(temp_dir.path().join("nested")).unwrap();

        assert!(store.dir().exists());
        assert_eq!(store.load_teammates().unwrap(), None);
        assert_eq!(store.load_groups().unwrap(), None);
        assert_eq!(store.load_settings().unwrap(), None);
    }

    #[test]
    fn test_round_trip_through_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(temp_dir.path()).unwrap();

        let teammates = vec![NewTeammate::new("Kofi", "Africa/Accra")
            .with_groups(["Support"])
            .into_teammate(Uuid::new_v4())];
        let groups: BTreeSet<String> = ["Support".to_string()].into();
        let settings = Settings {
            slack_workspace: Some("T0001".to_string()),
        };

        store.save_teammates(&teammates).unwrap();
        store.save_groups(&groups).unwrap();
        store.save_settings(&settings).unwrap();

        assert_eq!(store.load_teammates().unwrap(), Some(teammates));
        assert_eq!(store.load_groups().unwrap(), Some(groups));
        assert_eq!(store.load_settings().unwrap(), Some(settings));
        assert!(!temp_dir.path().join("teammates.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(TEAMMATES_FILE), b"{ not json").unwrap();
        let store = JsonFileStore::open(temp_dir.path()).unwrap();

        let err = store.load_teammates().unwrap_err();
        assert!(matches!(err, AppError::Corrupt(_)));
    }

    #[test]
    fn test_clear_removes_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(temp_dir.path()).unwrap();
        store.save_groups(&BTreeSet::new()).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();

        assert!(!temp_dir.path().join(GROUPS_FILE).exists());
    }
}
