//! In-memory activity cache for one repository.
//!
//! The cache holds the most recently fetched page of commits and of pull
//! requests. Pages are replaced whole, never merged, and windowed reads are
//! computed from the current page on every call.
//!
//! Commits come back from GitHub in an order that is not chronological
//! (merge commits keep their original author date), so commit reads always
//! scan the whole page. Pull requests are requested newest-created-first;
//! that order is checked when a page is stored and only a verified page is
//! scanned with an early exit.
//!
//! # Examples
//!
//! ```
//! use chrono::{Duration, Utc};
//! use ghdash_github::ActivityCache;
//! use ghdash_protocol::{ActivityWindow, PullRequestRecord};
//!
//! let now = Utc::now();
//! let pr = |number, days| PullRequestRecord {
//!     number,
//!     author_login: "octocat".to_string(),
//!     title: format!("PR {number}"),
//!     created_at: now - Duration::days(days),
//!     updated_at: now,
//! };
//!
//! let mut cache = ActivityCache::new();
//! cache.replace_pull_requests(vec![pr(3, 1), pr(2, 3), pr(1, 10)], 100, now);
//!
//! let recent = cache.pull_requests_within(ActivityWindow::days(7), now);
//! assert_eq!(recent.len(), 2);
//! ```

use chrono::{DateTime, Utc};
use ghdash_protocol::{ActivityWindow, CommitRecord, PullRequestRecord};
use tracing::{debug, warn};

/// One cached page with the metadata of the fetch that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPage<T> {
    /// The records, in the order they were received.
    pub items: Vec<T>,
    /// When the page was fetched.
    pub fetched_at: DateTime<Utc>,
    /// The page size that was requested.
    pub page_size: u8,
    /// Whether the records were checked to be newest-created-first.
    pub newest_first: bool,
}

impl<T> CachedPage<T> {
    fn status(&self) -> CacheStatus {
        CacheStatus::Populated {
            fetched_at: self.fetched_at,
            len: self.items.len(),
            page_size: self.page_size,
        }
    }
}

/// Whether a cached collection has ever been populated.
///
/// A failed refresh leaves the previous page in place, so `Populated` with an
/// old `fetched_at` means "stale", while `Empty` means "never fetched".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Nothing has been fetched yet.
    Empty,
    /// A page is cached.
    Populated {
        /// When the page was fetched.
        fetched_at: DateTime<Utc>,
        /// Number of cached records.
        len: usize,
        /// The page size that was requested.
        page_size: u8,
    },
}

impl CacheStatus {
    /// Returns whether a page is cached.
    #[must_use]
    pub fn is_populated(self) -> bool {
        matches!(self, Self::Populated { .. })
    }
}

/// The cached commit and pull-request pages of one repository.
#[derive(Debug, Clone, Default)]
pub struct ActivityCache {
    commits: Option<CachedPage<CommitRecord>>,
    pull_requests: Option<CachedPage<PullRequestRecord>>,
}

impl ActivityCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cached commits with a freshly fetched page.
    pub fn replace_commits(
        &mut self,
        items: Vec<CommitRecord>,
        page_size: u8,
        fetched_at: DateTime<Utc>,
    ) {
        debug!(count = items.len(), page_size, "replacing cached commits");
        self.commits = Some(CachedPage {
            items,
            fetched_at,
            page_size,
            newest_first: false,
        });
    }

    /// Replaces the cached pull requests with a freshly fetched page.
    ///
    /// The page is checked for newest-created-first order. A page out of
    /// order is still stored but every read scans it in full.
    pub fn replace_pull_requests(
        &mut self,
        items: Vec<PullRequestRecord>,
        page_size: u8,
        fetched_at: DateTime<Utc>,
    ) {
        let newest_first = is_newest_created_first(&items);
        if !newest_first {
            warn!(
                count = items.len(),
                "pull requests are not newest-created-first, windowed reads will scan the whole page"
            );
        }
        debug!(count = items.len(), page_size, newest_first, "replacing cached pull requests");
        self.pull_requests = Some(CachedPage {
            items,
            fetched_at,
            page_size,
            newest_first,
        });
    }

    /// Stores commits that did not come from a refresh (e.g. restored from
    /// elsewhere).
    pub fn seed_commits(&mut self, items: Vec<CommitRecord>, fetched_at: DateTime<Utc>) {
        let page_size = seeded_page_size(items.len());
        debug!(count = items.len(), "seeding commit cache");
        self.commits = Some(CachedPage {
            items,
            fetched_at,
            page_size,
            newest_first: false,
        });
    }

    /// Stores pull requests that did not come from a refresh.
    ///
    /// Their order is never trusted, so reads always scan the whole page.
    pub fn seed_pull_requests(&mut self, items: Vec<PullRequestRecord>, fetched_at: DateTime<Utc>) {
        let page_size = seeded_page_size(items.len());
        debug!(count = items.len(), "seeding pull request cache");
        self.pull_requests = Some(CachedPage {
            items,
            fetched_at,
            page_size,
            newest_first: false,
        });
    }

    /// Returns the cached commit page, if any.
    #[must_use]
    pub fn commits(&self) -> Option<&CachedPage<CommitRecord>> {
        self.commits.as_ref()
    }

    /// Returns the cached pull-request page, if any.
    #[must_use]
    pub fn pull_requests(&self) -> Option<&CachedPage<PullRequestRecord>> {
        self.pull_requests.as_ref()
    }

    /// Returns whether commits have been cached.
    #[must_use]
    pub fn commits_status(&self) -> CacheStatus {
        self.commits
            .as_ref()
            .map_or(CacheStatus::Empty, CachedPage::status)
    }

    /// Returns whether pull requests have been cached.
    #[must_use]
    pub fn pull_requests_status(&self) -> CacheStatus {
        self.pull_requests
            .as_ref()
            .map_or(CacheStatus::Empty, CachedPage::status)
    }

    /// Returns cached commits authored inside `window`, in cached order.
    ///
    /// With `author`, only commits whose author login matches (ignoring
    /// ASCII case) are returned. Commits without a linked account never
    /// match an author filter.
    #[must_use]
    pub fn commits_within(
        &self,
        window: ActivityWindow,
        author: Option<&str>,
        now: DateTime<Utc>,
    ) -> Vec<&CommitRecord> {
        let Some(page) = &self.commits else {
            return Vec::new();
        };

        page.items
            .iter()
            .filter(|commit| window.includes(commit.authored_at, now))
            .filter(|commit| author.is_none_or(|login| commit.is_authored_by(login)))
            .collect()
    }

    /// Returns cached pull requests created inside `window`, in cached
    /// order.
    ///
    /// Verified newest-first pages stop at the first pull request outside
    /// the window.
    #[must_use]
    pub fn pull_requests_within(
        &self,
        window: ActivityWindow,
        now: DateTime<Utc>,
    ) -> Vec<&PullRequestRecord> {
        let Some(page) = &self.pull_requests else {
            return Vec::new();
        };

        let inside = |pr: &&PullRequestRecord| window.includes(pr.created_at, now);
        if page.newest_first {
            page.items.iter().take_while(inside).collect()
        } else {
            page.items.iter().filter(inside).collect()
        }
    }
}

fn is_newest_created_first(items: &[PullRequestRecord]) -> bool {
    items
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at)
}

fn seeded_page_size(len: usize) -> u8 {
    u8::try_from(len).unwrap_or(u8::MAX)
}
