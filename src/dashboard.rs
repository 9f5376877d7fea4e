//! Concurrent refresh of every followed repository.
//!
//! Each refresh fans out one task per repository and gathers the results
//! back into the followed order. A repository that fails reports its error
//! and keeps its handle, so the next refresh reuses the connection and the
//! cached activity.

use std::collections::HashMap;

use chrono::Utc;
use ghdash_config::{CredentialResolver, DataStore};
use ghdash_github::{Connector, Error, RemoteApi, RepositoryHandle};
use ghdash_protocol::{ActivityWindow, Credential, RepoName};
use ghdash_tui::{ActivitySource, ActivitySummary, RepoReport};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

struct Target {
    name: RepoName,
    credential: Option<Credential>,
}

/// The followed repositories as an [`ActivitySource`].
pub struct Dashboard<C: Connector> {
    connector: C,
    targets: Vec<Target>,
    handles: HashMap<RepoName, RepositoryHandle<C::Api>>,
    window: ActivityWindow,
    page_size: u8,
}

impl<C> Dashboard<C>
where
    C: Connector + Clone + 'static,
    C::Api: 'static,
{
    /// Snapshots the followed repositories and the credential each one
    /// resolves to.
    pub fn new(connector: C, store: &mut DataStore, window: ActivityWindow, page_size: u8) -> Self {
        let names = store.list_repos();
        let resolver = CredentialResolver::new(store);
        let targets: Vec<Target> = names
            .into_iter()
            .map(|name| Target {
                credential: resolver.resolve(&name),
                name,
            })
            .collect();
        debug!(repositories = targets.len(), "dashboard created");

        Self {
            connector,
            targets,
            handles: HashMap::new(),
            window,
            page_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Returns whether any repository is fetched with a credential.
    pub fn is_authenticated(&self) -> bool {
        self.targets.iter().any(|t| t.credential.is_some())
    }

    /// Refreshes every repository concurrently.
    ///
    /// Reports come back in followed order, one per repository, whatever
    /// order the fetches finish in.
    #[instrument(skip(self), fields(repositories = self.targets.len()))]
    pub async fn refresh_all(&mut self) -> Vec<RepoReport> {
        let mut tasks = JoinSet::new();
        for (index, target) in self.targets.iter().enumerate() {
            let connector = self.connector.clone();
            let name = target.name.clone();
            let credential = target.credential.clone();
            let handle = self.handles.remove(&name);
            let (window, page_size) = (self.window, self.page_size);

            tasks.spawn(async move {
                let (handle, result) =
                    refresh_repository(&connector, &name, credential, handle, window, page_size)
                        .await;
                (index, name, handle, result)
            });
        }

        let mut reports: Vec<Option<RepoReport>> = vec![None; self.targets.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, name, handle, result)) => {
                    if let Some(handle) = handle {
                        self.handles.insert(name.clone(), handle);
                    }
                    reports[index] = Some(RepoReport { name, result });
                }
                Err(e) => warn!(error = %e, "refresh task failed"),
            }
        }

        let failures = reports
            .iter()
            .filter(|report| report.as_ref().is_none_or(|r| r.result.is_err()))
            .count();
        info!(failures, "refresh finished");

        self.targets
            .iter()
            .zip(reports)
            .map(|(target, report)| {
                report.unwrap_or_else(|| RepoReport {
                    name: target.name.clone(),
                    result: Err("refresh task failed".to_string()),
                })
            })
            .collect()
    }
}

impl<C> ActivitySource for Dashboard<C>
where
    C: Connector + Clone + 'static,
    C::Api: 'static,
{
    async fn refresh(&mut self) -> Vec<RepoReport> {
        self.refresh_all().await
    }
}

/// Refreshes one repository, opening it first if there is no handle yet.
///
/// The handle is returned whenever it exists so a failed refresh keeps the
/// cached activity for next time.
async fn refresh_repository<C: Connector>(
    connector: &C,
    name: &RepoName,
    credential: Option<Credential>,
    handle: Option<RepositoryHandle<C::Api>>,
    window: ActivityWindow,
    page_size: u8,
) -> (Option<RepositoryHandle<C::Api>>, Result<ActivitySummary, String>) {
    let mut handle = match handle {
        Some(mut handle) => {
            if let Err(e) = handle.refresh().await {
                warn!(%name, error = %e, "refresh failed");
                return (Some(handle), Err(describe(&e)));
            }
            handle
        }
        None => match RepositoryHandle::open_with(connector, name, credential).await {
            Ok(handle) => handle.with_page_size(page_size),
            Err(e) => {
                warn!(%name, error = %e, "could not open repository");
                return (None, Err(describe(&e)));
            }
        },
    };

    let result = summarize(&mut handle, window).await.map_err(|e| describe(&e));
    (Some(handle), result)
}

async fn summarize<A: RemoteApi>(
    handle: &mut RepositoryHandle<A>,
    window: ActivityWindow,
) -> ghdash_github::Result<ActivitySummary> {
    let commits = handle.commits(window, None).await?;
    let pull_requests = handle.pull_requests(window).await?;

    let latest_commit = commits
        .iter()
        .max_by_key(|c| c.authored_at)
        .map(|c| c.summary().to_string());
    let fetched_at = handle
        .cache()
        .commits()
        .map_or_else(Utc::now, |page| page.fetched_at);

    Ok(ActivitySummary {
        full_name: handle.full_name().to_string(),
        commits: commits.len(),
        pull_requests: pull_requests.len(),
        latest_commit,
        fetched_at,
    })
}

/// A short message for the dashboard's status column.
fn describe(error: &Error) -> String {
    match error {
        Error::RepositoryNotFound { .. } => "not found on GitHub".to_string(),
        Error::Authorization { reason } => format!("token rejected ({reason})"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeGitHub;

    fn dashboard(github: &FakeGitHub, store: &mut DataStore) -> Dashboard<FakeGitHub> {
        Dashboard::new(github.clone(), store, ActivityWindow::days(7), 100)
    }

    #[tokio::test]
    async fn reports_follow_store_order_and_isolate_failures() {
        let github = FakeGitHub::default();
        let mut store = DataStore::in_memory();
        for name in ["zeta/one", "alpha/two", "mid/three"] {
            let name = RepoName::parse(name).unwrap();
            store.add_repo(&name, None).unwrap();
        }
        github.add_repo("zeta/one", false, 3);
        github.add_repo("mid/three", false, 1);

        let mut dashboard = dashboard(&github, &mut store);
        let reports = dashboard.refresh_all().await;

        let names: Vec<_> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["zeta/one", "alpha/two", "mid/three"]);
        assert_eq!(reports[0].result.as_ref().unwrap().commits, 3);
        assert_eq!(reports[1].result, Err("not found on GitHub".to_string()));
        assert_eq!(reports[2].result.as_ref().unwrap().commits, 1);
        assert_eq!(
            reports[0].result.as_ref().unwrap().latest_commit.as_deref(),
            Some("Commit number 0")
        );
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_handle() {
        let github = FakeGitHub::default();
        let mut store = DataStore::in_memory();
        let name = github.add_repo("acme/app", false, 2);
        store.add_repo(&name, None).unwrap();

        let mut dashboard = dashboard(&github, &mut store);
        assert!(dashboard.refresh_all().await[0].result.is_ok());

        github.state().limited.insert(name.clone());
        let reports = dashboard.refresh_all().await;
        assert!(reports[0].result.as_ref().unwrap_err().contains("rate limit"));
        assert!(dashboard.handles.contains_key(&name));

        github.state().limited.clear();
        assert!(dashboard.refresh_all().await[0].result.is_ok());

        // Opened once, then reused
        assert_eq!(github.state().connections.len(), 1);
    }

    #[tokio::test]
    async fn credentials_are_resolved_per_repository() {
        let github = FakeGitHub::default();
        let mut store = DataStore::in_memory();
        let work = store.save_token("ghp_work", Some("work")).unwrap();
        let default = store.save_token("ghp_default", None).unwrap();

        let bound = github.add_repo("acme/private", true, 1);
        let open = github.add_repo("acme/public", false, 1);
        store.add_repo(&bound, Some(work)).unwrap();
        store.add_repo(&open, None).unwrap();

        let mut dashboard = dashboard(&github, &mut store);
        assert!(dashboard.is_authenticated());
        dashboard.refresh_all().await;

        let mut connections = github.state().connections.clone();
        connections.sort();
        assert_eq!(connections, vec![Some(work), Some(default)]);
    }

    #[tokio::test]
    async fn anonymous_dashboard_is_not_authenticated() {
        let github = FakeGitHub::default();
        let mut store = DataStore::in_memory();
        assert!(dashboard(&github, &mut store).is_empty());

        let name = github.add_repo("acme/app", false, 0);
        store.add_repo(&name, None).unwrap();
        let dashboard = dashboard(&github, &mut store);
        assert!(!dashboard.is_authenticated());
    }
}
