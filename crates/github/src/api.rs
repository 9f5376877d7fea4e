//! Seams between the activity engine and the remote hosting API.
//!
//! [`RemoteApi`] is one authenticated (or anonymous) view of the API.
//! [`Connector`] is the only place a [`Credential`] becomes a
//! [`RemoteApi`], so the credential chosen for a repository is decided once
//! and never threaded through individual calls.

use std::future::Future;

use ghdash_protocol::{CommitRecord, Credential, PullRequestRecord, RepoName, RepositorySnapshot};

use crate::error::Result;

/// The remote hosting API, bound to a single credential.
///
/// Each collection is returned in the order the API produced it. Pull
/// requests are requested newest-created-first but callers must not rely on
/// that without checking.
pub trait RemoteApi: Send + Sync {
    /// Fetches repository metadata.
    fn repository(
        &self,
        name: &RepoName,
    ) -> impl Future<Output = Result<RepositorySnapshot>> + Send;

    /// Fetches up to `page_size` of the most recent commits.
    fn commits(
        &self,
        name: &RepoName,
        page_size: u8,
    ) -> impl Future<Output = Result<Vec<CommitRecord>>> + Send;

    /// Fetches up to `page_size` of the most recently created pull requests.
    fn pull_requests(
        &self,
        name: &RepoName,
        page_size: u8,
    ) -> impl Future<Output = Result<Vec<PullRequestRecord>>> + Send;
}

/// Builds a [`RemoteApi`] for an optional credential.
pub trait Connector: Send + Sync {
    /// The client type produced by this connector.
    type Api: RemoteApi;

    /// Returns a client using `credential`, or an anonymous client for
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    fn connect(&self, credential: Option<&Credential>) -> Result<Self::Api>;
}
