//! Shared protocol types for ghdash.
//!
//! This crate defines the types passed between the store, the GitHub
//! activity engine, and the presentation layer.
//!
//! # Overview
//!
//! - [`repo_name`]: Canonical, case-insensitive `owner/name` identifiers
//! - [`activity`]: Commit, pull request, and repository snapshot records
//! - [`window`]: Trailing day windows used to filter activity
//! - [`credential`]: Saved bearer tokens
//! - [`error`]: Error types for protocol operations
//!
//! # Examples
//!
//! ```
//! use chrono::{Duration, Utc};
//! use ghdash_protocol::{ActivityWindow, PullRequestRecord, RepoName};
//!
//! let name = RepoName::parse("Rust-Lang/Rust").unwrap();
//! assert_eq!(name.to_string(), "rust-lang/rust");
//!
//! let now = Utc::now();
//! let pr = PullRequestRecord {
//!     number: 1,
//!     author_login: "ferris".to_string(),
//!     title: "Add feature".to_string(),
//!     created_at: now - Duration::days(2),
//!     updated_at: now,
//! };
//! assert!(ActivityWindow::days(7).includes(pr.created_at, now));
//! ```

pub mod activity;
pub mod credential;
pub mod error;
pub mod repo_name;
pub mod window;

// Re-export primary types at crate root for convenience
pub use activity::{CommitRecord, PullRequestRecord, RepositorySnapshot};
pub use credential::{Credential, CredentialId};
pub use error::{ProtocolError, Result};
pub use repo_name::RepoName;
pub use window::{ActivityWindow, DEFAULT_WINDOW_DAYS};
