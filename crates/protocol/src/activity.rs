//! Repository activity records.
//!
//! These are ghdash's own views of the GitHub objects it displays. They only
//! carry the fields the dashboard needs, which keeps them independent of the
//! API client's model types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Static metadata for a repository, fetched once per handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    /// The `owner/name` as GitHub spells it (original casing).
    pub full_name: String,
    /// The repository description, if any.
    pub description: Option<String>,
    /// Whether the repository is private.
    pub private: bool,
    /// The default branch, if reported.
    pub default_branch: Option<String>,
    /// The repository's web URL, if reported.
    pub html_url: Option<String>,
}

/// A single commit.
///
/// The API does not return commits in chronological order (merges can
/// surface older author dates), so nothing may assume `authored_at` is sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The commit SHA.
    pub sha: String,
    /// The git author name.
    pub author_name: String,
    /// The GitHub login of the author, when GitHub could link one.
    pub author_login: Option<String>,
    /// The git author date.
    pub authored_at: DateTime<Utc>,
    /// The full commit message.
    pub message: String,
}

impl CommitRecord {
    /// Returns the first line of the commit message.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use ghdash_protocol::CommitRecord;
    ///
    /// let commit = CommitRecord {
    ///     sha: "abc123".to_string(),
    ///     author_name: "Ferris".to_string(),
    ///     author_login: None,
    ///     authored_at: Utc::now(),
    ///     message: "Fix parser\n\nLong explanation".to_string(),
    /// };
    /// assert_eq!(commit.summary(), "Fix parser");
    /// ```
    #[must_use]
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    /// Returns the abbreviated (7 character) SHA.
    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }

    /// Returns whether the commit was authored by `login`.
    ///
    /// GitHub logins are case-insensitive.
    #[must_use]
    pub fn is_authored_by(&self, login: &str) -> bool {
        self.author_login
            .as_deref()
            .is_some_and(|author| author.eq_ignore_ascii_case(login))
    }
}

/// A single pull request.
///
/// The API returns pull requests newest-created first when sorted by
/// creation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRecord {
    /// The pull request number.
    pub number: u64,
    /// The GitHub login of the author.
    pub author_login: String,
    /// The pull request title.
    pub title: String,
    /// When the pull request was opened.
    pub created_at: DateTime<Utc>,
    /// When the pull request was last updated.
    pub updated_at: DateTime<Utc>,
}
