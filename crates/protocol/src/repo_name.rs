//! Canonical repository names.
//!
//! GitHub treats `Owner/Repo` and `owner/repo` as the same repository, so
//! every name entering ghdash is canonicalized to lowercase `owner/name`
//! once, at parse time. Comparisons between [`RepoName`] values are then
//! plain string comparisons.
//!
//! # Examples
//!
//! ```
//! use ghdash_protocol::RepoName;
//!
//! let name = RepoName::parse(" Rust-Lang/Rust ").unwrap();
//! assert_eq!(name.as_str(), "rust-lang/rust");
//! assert_eq!(name.owner(), "rust-lang");
//! assert_eq!(name.repo(), "rust");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// A lowercase `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoName {
    full: String,
    split: usize,
}

impl RepoName {
    /// Parses and canonicalizes a repository name.
    ///
    /// Surrounding whitespace is trimmed and the result is lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidRepoName`] if the input does not
    /// contain exactly one `/`, if either side is empty, or if it contains
    /// whitespace.
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = |reason: &'static str| ProtocolError::InvalidRepoName {
            input: input.to_string(),
            reason,
        };

        let trimmed = input.trim();
        if trimmed.chars().any(char::is_whitespace) {
            return Err(invalid("whitespace is not allowed"));
        }

        let mut parts = trimmed.split('/');
        let (Some(owner), Some(repo), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid("expected 'owner/name'"));
        };
        if owner.is_empty() || repo.is_empty() {
            return Err(invalid("owner and name cannot be empty"));
        }

        Ok(Self {
            full: trimmed.to_lowercase(),
            split: owner.to_lowercase().len(),
        })
    }

    /// Returns the owner part (user or organization).
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.full[..self.split]
    }

    /// Returns the repository part.
    #[must_use]
    pub fn repo(&self) -> &str {
        &self.full[self.split + 1..]
    }

    /// Returns the full `owner/name` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl FromStr for RepoName {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RepoName {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RepoName> for String {
    fn from(value: RepoName) -> Self {
        value.full
    }
}
