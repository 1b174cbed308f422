//! Single-value alarm store.
//!
//! The file holds at most one active alarm: a single canonical time key
//! line. Every save truncates and rewrites it.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::warn;
use valet_foundation::StoreError;

use crate::time_key::TimeKey;

#[derive(Debug, Clone)]
pub struct AlarmStore {
    path: PathBuf,
}

impl AlarmStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the active alarm.
    pub fn save(&self, time: &TimeKey) -> Result<(), StoreError> {
        fs::write(&self.path, format!("{}\n", time)).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })
    }

    /// The active alarm, if any. A missing file or unparseable content
    /// means "no alarm set".
    pub fn load(&self) -> Result<Option<TimeKey>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match TimeKey::parse(trimmed) {
            Ok(key) => Ok(Some(key)),
            Err(_) => {
                warn!(content = trimmed, "alarm store holds an invalid time key");
                Ok(None)
            }
        }
    }

    /// Last modification time, for the watcher's cache invalidation.
    pub fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn key(s: &str) -> TimeKey {
        TimeKey::parse(s).unwrap()
    }

    #[test]
    fn load_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let store = AlarmStore::new(dir.path().join("alarm.txt"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = AlarmStore::new(dir.path().join("alarm.txt"));
        store.save(&key("06:45AM")).unwrap();
        assert_eq!(store.load().unwrap(), Some(key("06:45AM")));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "06:45AM\n");
    }

    #[test]
    fn each_save_overwrites_the_previous_alarm() {
        let dir = tempdir().unwrap();
        let store = AlarmStore::new(dir.path().join("alarm.txt"));
        store.save(&key("06:45AM")).unwrap();
        store.save(&key("10:15PM")).unwrap();

        assert_eq!(store.load().unwrap(), Some(key("10:15PM")));
        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw.lines().count(), 1);
    }

    #[test]
    fn garbage_content_reads_as_no_alarm() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("alarm.txt");
        std::fs::write(&path, "tomorrow-ish\n").unwrap();
        let store = AlarmStore::new(&path);
        assert_eq!(store.load().unwrap(), None);
    }
}
