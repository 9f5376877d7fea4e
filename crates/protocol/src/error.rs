//! Error types for the ghdash-protocol crate.

use thiserror::Error;

/// Errors that can occur when constructing protocol types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A repository name was not of the form `owner/name`.
    #[error("invalid repository name '{input}': {reason}")]
    InvalidRepoName {
        /// The rejected input.
        input: String,
        /// Why the input was rejected.
        reason: &'static str,
    },
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
