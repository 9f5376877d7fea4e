//! Configuration and state file reading and writing.
//!
//! # File Formats
//!
//! Files are read with a JSON5 parser, which also accepts plain JSON, and
//! written as pretty-printed JSON.
//!
//! # File Locations
//!
//! The configuration file is searched in the following order:
//!
//! 1. Local: `./ghdash.json5` or `./ghdash.json`
//! 2. User: `~/.config/ghdash/config.json5` or `~/.config/ghdash/config.json`
//!
//! Persisted state (followed repositories and tokens) and logs live in the
//! platform data directory, e.g. `~/.local/share/ghdash/` on Linux.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Configuration file names to search for, in priority order.
const CONFIG_FILE_NAMES: &[&str] = &["ghdash.json5", "ghdash.json"];

/// Application directory name under the platform config and data dirs.
const APP_DIR: &str = "ghdash";

/// User config file names to search for, in priority order.
const USER_CONFIG_FILE_NAMES: &[&str] = &["config.json5", "config.json"];

/// Finds the configuration file path.
///
/// Returns `Some(path)` for the first existing candidate, `None` otherwise.
#[must_use]
pub fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILE_NAMES {
        let path = PathBuf::from(name);
        if path.exists() {
            return Some(path);
        }
    }

    let config_dir = dirs::config_dir()?.join(APP_DIR);
    USER_CONFIG_FILE_NAMES
        .iter()
        .map(|name| config_dir.join(name))
        .find(|path| path.exists())
}

/// Returns the user config directory (`~/.config/ghdash` on Linux).
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] if the config directory cannot
/// be determined.
pub fn user_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Returns the user data directory (`~/.local/share/ghdash` on Linux).
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] if the data directory cannot
/// be determined.
pub fn user_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or(ConfigError::NoHomeDirectory)
}

/// Reads and parses a JSON5 or JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_config_file<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    // JSON5 parser handles both JSON5 and JSON
    serde_json5::from_str(&content).map_err(ConfigError::from)
}

/// Writes a value as pretty JSON, replacing the file atomically.
///
/// The content is written to a sibling temporary file which is then renamed
/// over `path`, so readers never observe a half-written file.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub fn write_config_file<T: serde::Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let write_err = |source| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty() && !p.exists()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let content = serde_json::to_string_pretty(value)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, content).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)
}
