//! In-memory stand-ins for the GitHub API used by unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};
use ghdash_protocol::{
    CommitRecord, Credential, CredentialId, PullRequestRecord, RepoName, RepositorySnapshot,
};

use crate::api::{Connector, RemoteApi};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub(crate) struct MockRepo {
    pub private: bool,
    pub commits: Vec<CommitRecord>,
    pub pull_requests: Vec<PullRequestRecord>,
}

#[derive(Debug, Default)]
pub(crate) struct MockState {
    pub repos: HashMap<RepoName, MockRepo>,
    /// Credentials GitHub rejects with 401.
    pub rejected: Vec<CredentialId>,
    /// Makes every fetch fail with a rate limit.
    pub rate_limited: bool,
    /// Credentials passed to `connect`, in call order.
    pub connections: Vec<Option<CredentialId>>,
    pub commit_fetches: usize,
    pub pull_request_fetches: usize,
}

/// A fake GitHub shared between a connector and the clients it creates.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockGitHub {
    state: Arc<Mutex<MockState>>,
}

impl MockGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn add_repo(&self, name: &str, private: bool) -> RepoName {
        let name = RepoName::parse(name).unwrap();
        self.state().repos.insert(
            name.clone(),
            MockRepo {
                private,
                commits: Vec::new(),
                pull_requests: Vec::new(),
            },
        );
        name
    }

    pub fn set_commits(&self, name: &RepoName, commits: Vec<CommitRecord>) {
        self.state().repos.get_mut(name).unwrap().commits = commits;
    }

    pub fn set_pull_requests(&self, name: &RepoName, pull_requests: Vec<PullRequestRecord>) {
        self.state().repos.get_mut(name).unwrap().pull_requests = pull_requests;
    }
}

impl Connector for MockGitHub {
    type Api = MockApi;

    fn connect(&self, credential: Option<&Credential>) -> Result<MockApi> {
        let credential = credential.map(|c| c.id);
        self.state().connections.push(credential);
        Ok(MockApi {
            github: self.clone(),
            credential,
        })
    }
}

#[derive(Debug)]
pub(crate) struct MockApi {
    github: MockGitHub,
    credential: Option<CredentialId>,
}

impl MockApi {
    fn with_repo<T>(&self, name: &RepoName, f: impl FnOnce(&MockRepo) -> T) -> Result<T> {
        let state = self.github.state();
        if let Some(id) = self.credential {
            if state.rejected.contains(&id) {
                return Err(Error::Authorization {
                    reason: "Bad credentials".to_string(),
                });
            }
        }
        if state.rate_limited {
            return Err(Error::RateLimited);
        }
        match state.repos.get(name) {
            // Private repositories look missing to anonymous callers
            Some(repo) if !repo.private || self.credential.is_some() => Ok(f(repo)),
            _ => Err(Error::RepositoryNotFound { name: name.clone() }),
        }
    }
}

impl RemoteApi for MockApi {
    async fn repository(&self, name: &RepoName) -> Result<RepositorySnapshot> {
        self.with_repo(name, |repo| RepositorySnapshot {
            full_name: name.to_string(),
            description: None,
            private: repo.private,
            default_branch: Some("main".to_string()),
            html_url: None,
        })
    }

    async fn commits(&self, name: &RepoName, _page_size: u8) -> Result<Vec<CommitRecord>> {
        let commits = self.with_repo(name, |repo| repo.commits.clone())?;
        self.github.state().commit_fetches += 1;
        Ok(commits)
    }

    async fn pull_requests(&self, name: &RepoName, _page_size: u8) -> Result<Vec<PullRequestRecord>> {
        let pull_requests = self.with_repo(name, |repo| repo.pull_requests.clone())?;
        self.github.state().pull_request_fetches += 1;
        Ok(pull_requests)
    }
}

pub(crate) fn commit(sha: &str, login: &str, days_ago: i64) -> CommitRecord {
    CommitRecord {
        sha: sha.to_string(),
        author_name: login.to_string(),
        author_login: Some(login.to_string()),
        authored_at: Utc::now() - Duration::days(days_ago),
        message: format!("commit {sha}"),
    }
}

pub(crate) fn pull_request(number: u64, created_days_ago: i64) -> PullRequestRecord {
    let created_at = Utc::now() - Duration::days(created_days_ago);
    PullRequestRecord {
        number,
        author_login: "octocat".to_string(),
        title: format!("PR {number}"),
        created_at,
        updated_at: created_at,
    }
}
