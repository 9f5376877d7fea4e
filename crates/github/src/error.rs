//! Error types for GitHub activity operations.
//!
//! The variants separate the failure kinds callers must react to
//! differently:
//!
//! - [`Error::RepositoryNotFound`]: terminal, retrying with another token
//!   will not help
//! - [`Error::Authorization`]: retry with another credential
//! - [`Error::AlreadyFollowing`] / [`Error::NotFollowing`]: local conflicts
//! - [`Error::RateLimited`] / [`Error::Api`]: transient, the caller decides
//!   whether to skip the repository or abort

use ghdash_config::ConfigError;
use ghdash_protocol::{ProtocolError, RepoName};

/// Errors that can occur during GitHub activity operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// GitHub reports that the repository does not exist (or is not visible).
    #[error("could not find {name} on GitHub")]
    RepositoryNotFound {
        /// The repository that was requested.
        name: RepoName,
    },

    /// GitHub rejected the credential that was used.
    #[error("authorization failed: {reason}")]
    Authorization {
        /// The message returned by GitHub.
        reason: String,
    },

    /// The repository is already in the followed set.
    #[error("repository {name} is already followed")]
    AlreadyFollowing {
        /// The repository name.
        name: RepoName,
    },

    /// The repository is not in the followed set.
    #[error("not following {name}")]
    NotFollowing {
        /// The repository name.
        name: RepoName,
    },

    /// Rate limit exceeded.
    ///
    /// GitHub API has rate limits: 60 requests/hour for unauthenticated
    /// requests, 5,000 requests/hour for authenticated requests.
    #[error("rate limit exceeded")]
    RateLimited,

    /// GitHub could not process the request (e.g. a duplicate token note).
    #[error("GitHub rejected the request: {message}")]
    Unprocessable {
        /// The message returned by GitHub.
        message: String,
    },

    /// Any other error while calling the GitHub API, including network
    /// failures.
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// The local store failed.
    #[error(transparent)]
    Store(#[from] ConfigError),

    /// A repository name was malformed.
    #[error(transparent)]
    InvalidName(#[from] ProtocolError),
}

impl Error {
    /// Returns whether the failure may go away on its own (rate limits,
    /// network errors).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Api(_))
    }

    /// Returns whether retrying with a different credential may succeed.
    #[must_use]
    pub fn allows_credential_retry(&self) -> bool {
        matches!(self, Self::Authorization { .. })
    }
}

/// A specialized Result type for GitHub activity operations.
pub type Result<T> = std::result::Result<T, Error>;
