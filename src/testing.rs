//! A fake GitHub for command and dashboard tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};
use ghdash_github::{Connector, Error, RemoteApi, Result};
use ghdash_protocol::{
    CommitRecord, Credential, CredentialId, PullRequestRecord, RepoName, RepositorySnapshot,
};

#[derive(Debug, Default)]
pub struct FakeState {
    /// Repositories by name, with their commits.
    pub repos: HashMap<RepoName, Vec<CommitRecord>>,
    /// Repositories only visible with a credential.
    pub private: HashSet<RepoName>,
    /// Credentials answered with 401.
    pub rejected: HashSet<CredentialId>,
    /// Repositories whose every request is rate limited.
    pub limited: HashSet<RepoName>,
    /// Credentials passed to `connect`, in call order.
    pub connections: Vec<Option<CredentialId>>,
}

#[derive(Debug, Clone, Default)]
pub struct FakeGitHub {
    state: Arc<Mutex<FakeState>>,
}

impl FakeGitHub {
    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Adds a repository with `commits` commits from the last few hours.
    pub fn add_repo(&self, name: &str, private: bool, commits: usize) -> RepoName {
        let name = RepoName::parse(name).unwrap();
        let records = (0..commits)
            .map(|i| CommitRecord {
                sha: format!("{i:040x}"),
                author_name: "Someone".to_string(),
                author_login: Some("someone".to_string()),
                authored_at: Utc::now() - Duration::hours(i as i64 + 1),
                message: format!("Commit number {i}"),
            })
            .collect();

        let mut state = self.state();
        state.repos.insert(name.clone(), records);
        if private {
            state.private.insert(name.clone());
        }
        name
    }
}

impl Connector for FakeGitHub {
    type Api = FakeApi;

    fn connect(&self, credential: Option<&Credential>) -> Result<FakeApi> {
        let credential = credential.map(|c| c.id);
        self.state().connections.push(credential);
        Ok(FakeApi {
            github: self.clone(),
            credential,
        })
    }
}

#[derive(Debug)]
pub struct FakeApi {
    github: FakeGitHub,
    credential: Option<CredentialId>,
}

impl FakeApi {
    fn check(&self, name: &RepoName) -> Result<Vec<CommitRecord>> {
        let state = self.github.state();
        if self.credential.is_some_and(|id| state.rejected.contains(&id)) {
            return Err(Error::Authorization {
                reason: "Bad credentials".to_string(),
            });
        }
        if state.limited.contains(name) {
            return Err(Error::RateLimited);
        }
        match state.repos.get(name) {
            Some(_) if self.credential.is_none() && state.private.contains(name) => {
                Err(Error::RepositoryNotFound { name: name.clone() })
            }
            Some(commits) => Ok(commits.clone()),
            None => Err(Error::RepositoryNotFound { name: name.clone() }),
        }
    }
}

impl RemoteApi for FakeApi {
    async fn repository(&self, name: &RepoName) -> Result<RepositorySnapshot> {
        self.check(name)?;
        Ok(RepositorySnapshot {
            full_name: name.to_string(),
            description: None,
            private: self.github.state().private.contains(name),
            default_branch: Some("main".to_string()),
            html_url: None,
        })
    }

    async fn commits(&self, name: &RepoName, page_size: u8) -> Result<Vec<CommitRecord>> {
        let mut commits = self.check(name)?;
        commits.truncate(usize::from(page_size));
        Ok(commits)
    }

    async fn pull_requests(
        &self,
        name: &RepoName,
        _page_size: u8,
    ) -> Result<Vec<PullRequestRecord>> {
        self.check(name)?;
        Ok(Vec::new())
    }
}
