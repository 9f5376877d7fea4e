//! Core configuration struct and loading logic.
//!
//! This module provides the main [`Config`] struct which aggregates all
//! user-tunable settings for ghdash. Followed repositories and tokens are
//! not configuration; they live in the [`DataStore`](crate::DataStore).

use std::path::{Path, PathBuf};

use ghdash_protocol::{ActivityWindow, DEFAULT_WINDOW_DAYS};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::persistence::{find_config_file, read_config_file, user_data_dir, write_config_file};
use crate::polling::PollingConfig;

/// Default number of records fetched per refresh.
pub const DEFAULT_PAGE_SIZE: u8 = 100;

/// Largest page size the GitHub API accepts.
pub const MAX_PAGE_SIZE: u8 = 100;

/// Largest accepted activity window in days.
pub const MAX_WINDOW_DAYS: u32 = 365;

/// Store file name inside the data directory.
const STORE_FILE_NAME: &str = "store.json";

/// The main configuration struct.
///
/// # Examples
///
/// ```
/// use ghdash_config::{Config, PollingConfig};
///
/// let config = Config::default();
/// assert_eq!(config.window_days, 7);
/// assert_eq!(config.page_size, 100);
///
/// let config = Config {
///     polling: PollingConfig::fixed(30),
///     window_days: 14,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Live dashboard refresh settings.
    #[serde(default)]
    pub polling: PollingConfig,

    /// Default activity window in days.
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Default number of commits and pull requests fetched per refresh.
    #[serde(default = "default_page_size")]
    pub page_size: u8,

    /// Overrides the directory holding the store and logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

fn default_page_size() -> u8 {
    DEFAULT_PAGE_SIZE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            polling: PollingConfig::default(),
            window_days: DEFAULT_WINDOW_DAYS,
            page_size: DEFAULT_PAGE_SIZE,
            data_dir: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default file locations.
    ///
    /// If no configuration file is found, returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is found but cannot be
    /// read, parsed, or validated.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        write_config_file(path, self)
    }

    /// Validates all configured values.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range setting.
    pub fn validate(&self) -> Result<()> {
        self.polling.validate()?;

        if self.window_days == 0 || self.window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::InvalidWindow {
                days: self.window_days,
                max: MAX_WINDOW_DAYS,
            });
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidPageSize {
                size: u32::from(self.page_size),
            });
        }

        Ok(())
    }

    /// Returns the configured default window.
    #[must_use]
    pub fn window(&self) -> ActivityWindow {
        ActivityWindow::days(self.window_days)
    }

    /// Returns the directory holding the store and logs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHomeDirectory`] when no override is set and
    /// the platform data directory is unknown.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => user_data_dir(),
        }
    }

    /// Returns the path of the store file.
    ///
    /// # Errors
    ///
    /// See [`Config::data_dir`].
    pub fn store_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(STORE_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.data_dir.is_none());
        assert!(config.validate().is_ok());
        assert_eq!(config.window(), ActivityWindow::days(7));
    }

    #[test]
    fn validate_rejects_bad_window() {
        for days in [0, MAX_WINDOW_DAYS + 1] {
            let config = Config {
                window_days: days,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidWindow { .. })
            ));
        }
    }

    #[test]
    fn validate_rejects_bad_page_size() {
        for size in [0, MAX_PAGE_SIZE + 1] {
            let config = Config {
                page_size: size,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidPageSize { .. })
            ));
        }
    }

    #[test]
    fn validate_invalid_polling() {
        let config = Config {
            polling: PollingConfig::fixed(1),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPollingInterval { .. })
        ));
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn data_dir_override_sets_store_path() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/ghdash-test")),
            ..Default::default()
        };
        assert_eq!(
            config.store_path().unwrap(),
            PathBuf::from("/tmp/ghdash-test/store.json")
        );
    }

    #[test]
    fn load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json5");
        std::fs::write(
            &path,
            r#"
            {
                polling: { interval_secs: 30, auto_adjust: false },
                window_days: 14,
                page_size: 50,
            }
            "#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.polling, PollingConfig::fixed(30));
        assert_eq!(config.window_days, 14);
        assert_eq!(config.page_size, 50);
    }

    #[test]
    fn load_from_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"page_size": 0}"#).unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let original = Config {
            polling: PollingConfig::with_interval(120),
            window_days: 30,
            page_size: 25,
            data_dir: Some(dir.path().to_path_buf()),
        };

        original.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), original);
    }
}
