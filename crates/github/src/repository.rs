//! A handle on one remote repository and its cached activity.

use chrono::Utc;
use ghdash_config::{CredentialResolver, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use ghdash_protocol::{
    ActivityWindow, CommitRecord, Credential, CredentialId, PullRequestRecord, RepoName,
    RepositorySnapshot,
};
use tracing::{debug, info, instrument, warn};

use crate::api::{Connector, RemoteApi};
use crate::cache::ActivityCache;
use crate::error::Result;

/// One repository on GitHub, bound to the credential it was opened with.
///
/// Activity is fetched lazily: the first windowed read of commits or pull
/// requests fills the cache with the handle's default page size. Later reads
/// are served from the cache until [`refresh`](Self::refresh) (or one of the
/// per-collection refreshes) is called.
///
/// A refresh that fails leaves the previous page in place.
///
/// # Examples
///
/// ```no_run
/// use ghdash_config::{CredentialResolver, DataStore};
/// use ghdash_github::{GitHubConnector, RepositoryHandle};
/// use ghdash_protocol::{ActivityWindow, RepoName};
///
/// # async fn example() -> ghdash_github::Result<()> {
/// let mut store = DataStore::in_memory();
/// let resolver = CredentialResolver::new(&mut store);
/// let name = RepoName::parse("rust-lang/rust")?;
///
/// let mut handle = RepositoryHandle::open(&GitHubConnector, &resolver, &name).await?;
/// for commit in handle.commits(ActivityWindow::days(7), None).await? {
///     println!("{} {}", commit.short_sha(), commit.summary());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RepositoryHandle<A> {
    name: RepoName,
    snapshot: RepositorySnapshot,
    credential_id: Option<CredentialId>,
    api: A,
    cache: ActivityCache,
    page_size: u8,
}

impl<A: RemoteApi> RepositoryHandle<A> {
    /// Opens `name` with the credential the resolver picks for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RepositoryNotFound`](crate::Error::RepositoryNotFound)
    /// if GitHub has no such repository, or
    /// [`Error::Authorization`](crate::Error::Authorization) if the chosen
    /// credential was rejected. Only the latter is worth retrying with
    /// another credential.
    pub async fn open<C>(
        connector: &C,
        resolver: &CredentialResolver<'_>,
        name: &RepoName,
    ) -> Result<Self>
    where
        C: Connector<Api = A>,
    {
        let credential = resolver.resolve(name);
        Self::open_with(connector, name, credential).await
    }

    /// Opens `name` like [`open`](Self::open), and while GitHub rejects the
    /// credential, retries with each other saved credential, newest first.
    ///
    /// # Errors
    ///
    /// Returns the last [`Error::Authorization`](crate::Error::Authorization)
    /// when every saved credential was rejected, or the first error of any
    /// other kind.
    #[instrument(skip_all, fields(name = %name))]
    pub async fn open_with_fallback<C>(
        connector: &C,
        resolver: &CredentialResolver<'_>,
        name: &RepoName,
    ) -> Result<Self>
    where
        C: Connector<Api = A>,
    {
        let first = resolver.resolve(name);
        let mut tried: Vec<CredentialId> = first.iter().map(|c| c.id).collect();
        let mut error = match Self::open_with(connector, name, first).await {
            Err(e) if e.allows_credential_retry() => e,
            other => return other,
        };

        let candidates: Vec<Credential> = resolver.fallback_sequence(name, &tried).collect();
        for credential in candidates {
            warn!(rejected = ?tried, next = %credential.id, "credential rejected, trying another");
            tried.push(credential.id);
            match Self::open_with(connector, name, Some(credential)).await {
                Err(e) if e.allows_credential_retry() => error = e,
                other => return other,
            }
        }

        Err(error)
    }

    /// Opens `name` with an explicit credential, or anonymously with `None`.
    ///
    /// # Errors
    ///
    /// See [`open`](Self::open).
    #[instrument(skip_all, fields(name = %name, credential = ?credential.as_ref().map(|c| c.id)))]
    pub async fn open_with<C>(
        connector: &C,
        name: &RepoName,
        credential: Option<Credential>,
    ) -> Result<Self>
    where
        C: Connector<Api = A>,
    {
        let api = connector.connect(credential.as_ref())?;
        let snapshot = api.repository(name).await?;
        info!(full_name = %snapshot.full_name, "opened repository");

        Ok(Self {
            name: name.clone(),
            snapshot,
            credential_id: credential.map(|c| c.id),
            api,
            cache: ActivityCache::new(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Sets the page size used by [`refresh`](Self::refresh) and lazy
    /// warming, clamped to what GitHub serves in one page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u8) -> Self {
        self.page_size = clamp_page_size(page_size);
        self
    }

    /// Fetches up to `page_size` recent commits and replaces the cached
    /// page.
    ///
    /// # Errors
    ///
    /// Returns the API error; the cached page is left untouched.
    #[instrument(skip(self), fields(name = %self.name))]
    pub async fn refresh_commits(&mut self, page_size: u8) -> Result<()> {
        let page_size = clamp_page_size(page_size);
        let mut commits = self.api.commits(&self.name, page_size).await?;
        commits.truncate(usize::from(page_size));
        self.cache.replace_commits(commits, page_size, Utc::now());
        Ok(())
    }

    /// Fetches up to `page_size` recently created pull requests and replaces
    /// the cached page.
    ///
    /// # Errors
    ///
    /// Returns the API error; the cached page is left untouched.
    #[instrument(skip(self), fields(name = %self.name))]
    pub async fn refresh_pull_requests(&mut self, page_size: u8) -> Result<()> {
        let page_size = clamp_page_size(page_size);
        let mut pull_requests = self.api.pull_requests(&self.name, page_size).await?;
        pull_requests.truncate(usize::from(page_size));
        self.cache
            .replace_pull_requests(pull_requests, page_size, Utc::now());
        Ok(())
    }

    /// Refreshes both commits and pull requests with the default page size.
    ///
    /// # Errors
    ///
    /// Returns the first API error. Pull requests are not fetched when the
    /// commit refresh fails.
    pub async fn refresh(&mut self) -> Result<()> {
        self.refresh_commits(self.page_size).await?;
        self.refresh_pull_requests(self.page_size).await
    }

    /// Returns commits authored inside `window`, optionally only those by
    /// `author`.
    ///
    /// Fetches commits first if none are cached. A window wider than the
    /// cached page can under-report; refresh with a larger page size to see
    /// more.
    ///
    /// # Errors
    ///
    /// Returns the API error of the initial fetch.
    pub async fn commits(
        &mut self,
        window: ActivityWindow,
        author: Option<&str>,
    ) -> Result<Vec<CommitRecord>> {
        if !self.cache.commits_status().is_populated() {
            debug!(name = %self.name, "warming commit cache");
            self.refresh_commits(self.page_size).await?;
        }

        Ok(self
            .cache
            .commits_within(window, author, Utc::now())
            .into_iter()
            .cloned()
            .collect())
    }

    /// Returns pull requests created inside `window`.
    ///
    /// Fetches pull requests first if none are cached.
    ///
    /// # Errors
    ///
    /// Returns the API error of the initial fetch.
    pub async fn pull_requests(&mut self, window: ActivityWindow) -> Result<Vec<PullRequestRecord>> {
        if !self.cache.pull_requests_status().is_populated() {
            debug!(name = %self.name, "warming pull request cache");
            self.refresh_pull_requests(self.page_size).await?;
        }

        Ok(self
            .cache
            .pull_requests_within(window, Utc::now())
            .into_iter()
            .cloned()
            .collect())
    }

    /// The canonical (lowercase) repository name.
    #[must_use]
    pub fn name(&self) -> &RepoName {
        &self.name
    }

    /// Repository metadata fetched when the handle was opened.
    #[must_use]
    pub fn snapshot(&self) -> &RepositorySnapshot {
        &self.snapshot
    }

    /// The name as GitHub spells it, e.g. `Rust-Lang/Rust`.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.snapshot.full_name
    }

    /// The credential the handle uses, or `None` when anonymous.
    #[must_use]
    pub fn credential_id(&self) -> Option<CredentialId> {
        self.credential_id
    }

    #[must_use]
    pub fn cache(&self) -> &ActivityCache {
        &self.cache
    }

    /// Mutable access to the cache, e.g. to seed it with saved activity.
    pub fn cache_mut(&mut self) -> &mut ActivityCache {
        &mut self.cache
    }
}

fn clamp_page_size(page_size: u8) -> u8 {
    page_size.clamp(1, MAX_PAGE_SIZE)
}
