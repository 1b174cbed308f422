//! Application configuration: TOML file with CLI/env overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use valet_foundation::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValetConfig {
    /// Schedule store path
    pub schedule_file: PathBuf,
    /// Alarm store path
    pub alarm_file: PathBuf,
    /// Battery level poll interval (seconds)
    pub battery_interval_secs: u64,
    /// Plug state poll interval (seconds)
    pub plug_interval_secs: u64,
    /// Schedule store poll interval (seconds)
    pub schedule_interval_secs: u64,
    /// Alarm store poll interval (seconds)
    pub alarm_interval_secs: u64,
    /// How long a follow-up session waits before abandoning
    pub session_timeout_secs: u64,
    /// Connectivity probe target
    pub probe_url: String,
    pub probe_timeout_secs: u64,
    /// Greeting spoken when starting online; one is picked at random
    pub greeting_lines: Vec<String>,
    /// Notification raised when starting offline
    pub offline_lines: Vec<String>,
}

impl Default for ValetConfig {
    fn default() -> Self {
        Self {
            schedule_file: PathBuf::from("schedule.txt"),
            alarm_file: PathBuf::from("alarm.txt"),
            battery_interval_secs: 13,
            plug_interval_secs: 2,
            schedule_interval_secs: 60,
            alarm_interval_secs: 10,
            session_timeout_secs: 120,
            probe_url: "https://www.google.com".to_string(),
            probe_timeout_secs: 5,
            greeting_lines: vec![
                "at your service".to_string(),
                "online and ready".to_string(),
                "good to see you again".to_string(),
            ],
            offline_lines: vec![
                "no internet connection, staying quiet".to_string(),
                "offline at the moment, try again later".to_string(),
            ],
        }
    }
}

impl ValetConfig {
    /// Load from a TOML file. A missing file yields the defaults; a file
    /// that exists but does not parse is a configuration error.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(AppError::Config(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )))
            }
        };
        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    pub fn battery_interval(&self) -> Duration {
        Duration::from_secs(self.battery_interval_secs)
    }

    pub fn plug_interval(&self) -> Duration {
        Duration::from_secs(self.plug_interval_secs)
    }

    pub fn schedule_interval(&self) -> Duration {
        Duration::from_secs(self.schedule_interval_secs)
    }

    pub fn alarm_interval(&self) -> Duration {
        Duration::from_secs(self.alarm_interval_secs)
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_intervals() {
        let config = ValetConfig::default();
        assert_eq!(config.schedule_interval(), Duration::from_secs(60));
        assert_eq!(config.alarm_interval(), Duration::from_secs(10));
        assert_eq!(config.session_timeout(), Duration::from_secs(120));
        assert!(!config.greeting_lines.is_empty());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let parsed: ValetConfig =
            toml::from_str("schedule_interval_secs = 30\nschedule_file = \"/tmp/s.txt\"\n")
                .unwrap();
        assert_eq!(parsed.schedule_interval_secs, 30);
        assert_eq!(parsed.schedule_file, PathBuf::from("/tmp/s.txt"));
        assert_eq!(parsed.alarm_interval_secs, 10);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ValetConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.battery_interval_secs, 13);
    }

    #[test]
    fn unparseable_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valet.toml");
        std::fs::write(&path, "schedule_interval_secs = \"soon\"").unwrap();
        assert!(ValetConfig::load(&path).is_err());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = ValetConfig::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: ValetConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.probe_url, config.probe_url);
        assert_eq!(parsed.session_timeout_secs, config.session_timeout_secs);
    }
}
