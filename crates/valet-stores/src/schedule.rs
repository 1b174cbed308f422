//! Flat-file reminder store.
//!
//! One line per entry, `<time_key> = <activity>`. Saving rewrites the whole
//! file: the line whose key matches the new entry is replaced, otherwise the
//! entry is appended (last-write-wins per time slot). Lines that are not
//! entries pass through a rewrite unchanged.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use valet_foundation::StoreError;

use crate::time_key::TimeKey;

pub const ENTRY_SEPARATOR: &str = " = ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub time: TimeKey,
    pub activity: String,
}

impl ScheduleEntry {
    pub fn new(time: TimeKey, activity: impl Into<String>) -> Self {
        Self {
            time,
            activity: activity.into(),
        }
    }

    fn to_line(&self) -> String {
        format!("{}{}{}", self.time, ENTRY_SEPARATOR, self.activity)
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleStore {
    path: PathBuf,
}

impl ScheduleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite the store with `entry`, replacing any line keyed by the same
    /// time and appending otherwise.
    pub fn save(&self, entry: &ScheduleEntry) -> Result<(), StoreError> {
        let existing = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(self.io_err(e)),
        };

        let key_prefix = format!("{}{}", entry.time, ENTRY_SEPARATOR);
        let mut out = String::with_capacity(existing.len() + entry.activity.len() + 16);
        let mut replaced = false;
        for line in existing.lines() {
            if line.starts_with(&key_prefix) {
                out.push_str(&entry.to_line());
                replaced = true;
            } else {
                out.push_str(line);
            }
            out.push('\n');
        }
        if !replaced {
            out.push_str(&entry.to_line());
            out.push('\n');
        }

        fs::write(&self.path, out).map_err(|e| self.io_err(e))
    }

    /// Parse the full store. Missing file is an empty schedule, not an
    /// error. Lines that do not parse as entries are skipped on load (they
    /// still survive a rewrite).
    pub fn load(&self) -> Result<HashMap<TimeKey, String>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(self.io_err(e)),
        };

        let mut entries = HashMap::new();
        for line in content.lines() {
            let Some((raw_key, activity)) = line.split_once(ENTRY_SEPARATOR) else {
                debug!(line, "skipping non-entry line in schedule store");
                continue;
            };
            match TimeKey::parse(raw_key) {
                Ok(key) => {
                    entries.insert(key, activity.trim().to_string());
                }
                Err(_) => debug!(line, "skipping line with invalid time key"),
            }
        }
        Ok(entries)
    }

    /// Last modification time, for the watcher's cache invalidation.
    /// `None` when the store does not exist yet.
    pub fn modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|m| m.modified()).ok()
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
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
    fn load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = ScheduleStore::new(dir.path().join("schedule.txt"));
        assert!(store.load().unwrap().is_empty());
        assert!(store.modified().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = ScheduleStore::new(dir.path().join("schedule.txt"));
        let entry = ScheduleEntry::new(key("07:05PM"), "take medicine");
        store.save(&entry).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[&entry.time], "take medicine");
        assert!(store.modified().is_some());
    }

    #[test]
    fn same_key_is_last_write_wins() {
        let dir = tempdir().unwrap();
        let store = ScheduleStore::new(dir.path().join("schedule.txt"));
        store
            .save(&ScheduleEntry::new(key("07:05PM"), "take medicine"))
            .unwrap();
        store
            .save(&ScheduleEntry::new(key("07:05PM"), "call mom"))
            .unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let matching: Vec<_> = raw.lines().filter(|l| l.starts_with("07:05PM")).collect();
        assert_eq!(matching, vec!["07:05PM = call mom"]);
        assert_eq!(store.load().unwrap()[&key("07:05PM")], "call mom");
    }

    #[test]
    fn distinct_keys_accumulate() {
        let dir = tempdir().unwrap();
        let store = ScheduleStore::new(dir.path().join("schedule.txt"));
        store
            .save(&ScheduleEntry::new(key("07:05PM"), "take medicine"))
            .unwrap();
        store
            .save(&ScheduleEntry::new(key("09:30AM"), "standup"))
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[&key("09:30AM")], "standup");
    }

    #[test]
    fn non_entry_lines_survive_rewrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schedule.txt");
        std::fs::write(&path, "# reminders live here\n07:05PM = take medicine\n").unwrap();

        let store = ScheduleStore::new(&path);
        store
            .save(&ScheduleEntry::new(key("07:05PM"), "call mom"))
            .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("# reminders live here"));
        assert!(raw.contains("07:05PM = call mom"));
        assert!(!raw.contains("take medicine"));
    }
}
