//! Error types for configuration and persisted state.
//!
//! This module defines the error types that can occur while loading the
//! configuration file and while reading or mutating the data store.

use std::path::PathBuf;

use ghdash_protocol::{CredentialId, ProtocolError, RepoName};

/// Errors that can occur during configuration and store operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a configuration or store file.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a configuration or store file.
    #[error("failed to write {path}: {source}")]
    WriteFile {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a JSON5 document.
    #[error("failed to parse config: {0}")]
    ParseJson5(#[from] serde_json5::Error),

    /// Failed to serialize a document to JSON.
    #[error("failed to serialize config: {0}")]
    SerializeJson(#[from] serde_json::Error),

    /// A stored repository name is malformed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Invalid polling interval.
    #[error("invalid polling interval: {reason}")]
    InvalidPollingInterval {
        /// The reason the interval is invalid.
        reason: String,
    },

    /// Invalid activity window.
    #[error("invalid window: {days} days is outside 1..={max}")]
    InvalidWindow {
        /// The configured number of days.
        days: u32,
        /// The largest accepted number of days.
        max: u32,
    },

    /// Invalid page size.
    #[error("invalid page size: {size} is outside 1..=100")]
    InvalidPageSize {
        /// The configured page size.
        size: u32,
    },

    /// Failed to determine the platform config or data directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,

    /// The repository is already stored.
    #[error("repository {name} is already stored")]
    DuplicateRepository {
        /// The duplicate name.
        name: RepoName,
    },

    /// No credential with the given identifier is saved.
    #[error("no saved credential matches {id}")]
    CredentialNotFound {
        /// The identifier, or the name that was looked up.
        id: String,
    },
}

impl ConfigError {
    pub(crate) fn credential_not_found(id: CredentialId) -> Self {
        Self::CredentialNotFound { id: id.to_string() }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
