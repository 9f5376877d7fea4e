//! GitHub activity engine for ghdash.
//!
//! This crate fetches, caches and filters the recent activity of GitHub
//! repositories, and manages the set of followed repositories.
//!
//! # Overview
//!
//! - [`RepositoryHandle`]: one repository, its metadata and cached activity
//! - [`ActivityCache`]: the last fetched page of commits and pull requests
//! - [`FollowingService`]: follow, unfollow and list repositories
//! - [`GitHubClient`] and [`GitHubConnector`]: the octocrab-backed
//!   [`RemoteApi`] and [`Connector`]
//! - [`request_token`]: create a token from a username and password
//! - [`Error`]: error types for GitHub operations
//!
//! # Authentication
//!
//! Every handle is bound to one credential, chosen once when it is opened:
//!
//! - **Authenticated**: 5,000 requests/hour, access to private repos
//! - **Unauthenticated**: 60 requests/hour, public repos only
//!
//! Which saved token to use is decided by
//! [`ghdash_config::CredentialResolver`]. When GitHub rejects it, the error
//! is [`Error::Authorization`] and the caller may retry with another
//! credential. [`Error::RepositoryNotFound`] is final.
//!
//! # Examples
//!
//! ```no_run
//! use ghdash_config::{CredentialResolver, DataStore};
//! use ghdash_github::{GitHubConnector, RepositoryHandle};
//! use ghdash_protocol::{ActivityWindow, RepoName};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = DataStore::in_memory();
//! let resolver = CredentialResolver::new(&mut store);
//! let name = RepoName::parse("rust-lang/cargo")?;
//!
//! let mut handle = RepositoryHandle::open(&GitHubConnector, &resolver, &name).await?;
//! let window = ActivityWindow::days(7);
//! let commits = handle.commits(window, None).await?.len();
//! let pull_requests = handle.pull_requests(window).await?.len();
//! println!(
//!     "{}: {} commits, {} pull requests",
//!     handle.full_name(),
//!     commits,
//!     pull_requests,
//! );
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod authorization;
pub mod cache;
pub mod client;
pub mod error;
pub mod following;
pub mod repository;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{Connector, RemoteApi};
pub use authorization::{Authorizer, BasicAuthClient, TOKEN_NOTE, TOKEN_SCOPES, request_token};
pub use cache::{ActivityCache, CacheStatus, CachedPage};
pub use client::{GitHubClient, GitHubConnector};
pub use error::{Error, Result};
pub use following::FollowingService;
pub use repository::RepositoryHandle;
