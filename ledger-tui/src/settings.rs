//! User settings, read from `settings.json` in the config directory.

use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use trestle::config::DEFAULT_NB_PLACEHOLDERS;
use trestle::table::{SortKey, SortingState};

use crate::paths;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings: {0}")]
    Io(#[from] io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Every field is optional in the file; missing ones take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`.
    pub log_level: String,
    /// Skeleton rows shown while transactions load.
    pub nb_placeholders: usize,
    pub compact: bool,
    /// Sort applied when the table first renders.
    pub initial_sort: SortingState,
    /// Simulated query latency, in milliseconds.
    pub latency_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            nb_placeholders: DEFAULT_NB_PLACEHOLDERS,
            compact: false,
            initial_sort: SortKey::desc("date").into(),
            latency_ms: 600,
        }
    }
}

impl Settings {
    /// Load from the platform config directory. A missing file, or a
    /// platform without a home directory, yields the defaults.
    pub fn load() -> Result<Self, SettingsError> {
        match paths::settings_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parsed log level; unknown names fall back to `info`.
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trestle::table::SortDirection;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "compact": true, "initial_sort": [{ "id": "amount", "direction": "asc" }] }"#)
                .expect("valid settings");

        assert!(settings.compact);
        assert_eq!(settings.nb_placeholders, 10);
        assert_eq!(
            settings.initial_sort.direction_of("amount"),
            Some(SortDirection::Asc)
        );
        assert_eq!(settings.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let settings = Settings {
            log_level: "chatty".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.level_filter(), LevelFilter::Info);

        let settings = Settings {
            log_level: "DEBUG".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join("ledger-settings-that-does-not-exist.json");

        let settings = Settings::load_from(&path).expect("defaults");

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("ledger-settings-{}.json", std::process::id()));
        fs::write(&path, "{ not json").expect("write");

        let result = Settings::load_from(&path);
        let _ = fs::remove_file(&path);

        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }
}
