//! GitHub API client implementation.
//!
//! This module provides the [`GitHubClient`] struct for interacting with
//! the GitHub API, supporting both authenticated and unauthenticated access,
//! and the [`GitHubConnector`] that builds clients from saved credentials.

use chrono::{DateTime, Utc};
use ghdash_protocol::{CommitRecord, Credential, PullRequestRecord, RepoName, RepositorySnapshot};
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::api::{Connector, RemoteApi};
use crate::error::{Error, Result};

/// Largest `per_page` value GitHub accepts.
const MAX_PER_PAGE: u8 = 100;

/// Login shown for pull requests whose author account was deleted.
const GHOST_LOGIN: &str = "ghost";

/// GitHub API client with optional authentication.
///
/// Authenticated clients have higher rate limits (5,000 req/hour vs 60
/// req/hour) and can access private repositories.
///
/// # Security
///
/// Tokens are stored using [`SecretString`] to prevent accidental logging
/// or exposure in debug output.
///
/// # Examples
///
/// ```no_run
/// use ghdash_github::{GitHubClient, RemoteApi};
/// use ghdash_protocol::RepoName;
///
/// # async fn example() -> ghdash_github::Result<()> {
/// let client = GitHubClient::new(None)?;
/// let name = RepoName::parse("rust-lang/rust")?;
///
/// let snapshot = client.repository(&name).await?;
/// println!("{}", snapshot.full_name);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GitHubClient {
    /// The underlying octocrab client.
    inner: Octocrab,
    /// Whether this client is authenticated.
    authenticated: bool,
}

impl GitHubClient {
    /// Creates a new GitHub client.
    ///
    /// # Arguments
    ///
    /// * `token` - Optional GitHub personal access token. If `None`, the
    ///   client is anonymous and limited to public repositories.
    ///
    /// # Errors
    ///
    /// Returns an error if the octocrab client fails to initialize.
    #[instrument(skip(token), fields(authenticated = token.is_some()))]
    pub fn new(token: Option<SecretString>) -> Result<Self> {
        let (inner, authenticated) = match token {
            Some(token) => {
                debug!("creating authenticated GitHub client");
                let client = Octocrab::builder()
                    .personal_token(token.expose_secret())
                    .build()
                    .map_err(Error::Api)?;
                (client, true)
            }
            None => {
                debug!("creating unauthenticated GitHub client");
                let client = Octocrab::builder().build().map_err(Error::Api)?;
                (client, false)
            }
        };

        Ok(Self {
            inner,
            authenticated,
        })
    }

    /// Returns whether this client is authenticated.
    ///
    /// This reflects the state at creation time; the token may still be
    /// rejected by GitHub.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

impl RemoteApi for GitHubClient {
    #[instrument(skip_all, fields(name = %name))]
    async fn repository(&self, name: &RepoName) -> Result<RepositorySnapshot> {
        let route = format!("/repos/{}/{}", name.owner(), name.repo());
        debug!("fetching repository");

        let repo: WireRepository = self
            .inner
            .get(route, None::<&()>)
            .await
            .map_err(|e| classify(e, name))?;
        Ok(repo.into_snapshot())
    }

    #[instrument(skip_all, fields(name = %name, page_size = page_size))]
    async fn commits(&self, name: &RepoName, page_size: u8) -> Result<Vec<CommitRecord>> {
        let route = format!("/repos/{}/{}/commits", name.owner(), name.repo());
        let query = PageQuery::commits(page_size);
        debug!(per_page = query.per_page, "fetching commits");

        let commits: Vec<WireCommit> = self
            .inner
            .get(route, Some(&query))
            .await
            .map_err(|e| classify(e, name))?;

        let records = commits_to_records(commits);
        debug!(count = records.len(), "fetched commits");
        Ok(records)
    }

    #[instrument(skip_all, fields(name = %name, page_size = page_size))]
    async fn pull_requests(
        &self,
        name: &RepoName,
        page_size: u8,
    ) -> Result<Vec<PullRequestRecord>> {
        let route = format!("/repos/{}/{}/pulls", name.owner(), name.repo());
        let query = PageQuery::pull_requests(page_size);
        debug!(per_page = query.per_page, "fetching pull requests");

        let pulls: Vec<WirePullRequest> = self
            .inner
            .get(route, Some(&query))
            .await
            .map_err(|e| classify(e, name))?;

        let records: Vec<_> = pulls.into_iter().map(WirePullRequest::into_record).collect();
        debug!(count = records.len(), "fetched pull requests");
        Ok(records)
    }
}

/// Builds [`GitHubClient`]s from saved credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitHubConnector;

impl Connector for GitHubConnector {
    type Api = GitHubClient;

    fn connect(&self, credential: Option<&Credential>) -> Result<GitHubClient> {
        GitHubClient::new(credential.map(|c| c.token.clone()))
    }
}

/// Maps an octocrab failure to the error kinds callers react to.
///
/// `name` is the repository the request was about, used for not-found
/// errors.
pub(crate) fn classify(error: octocrab::Error, name: &RepoName) -> Error {
    let octocrab::Error::GitHub { source, .. } = &error else {
        warn!(error = %error, "request to GitHub failed");
        return Error::Api(error);
    };

    let status = source.status_code.as_u16();
    let message = source.message.clone();
    warn!(status, %message, "GitHub returned an error");
    match classify_status(status, message, name) {
        Some(classified) => classified,
        None => Error::Api(error),
    }
}

/// Classifies a GitHub error response by status code and message.
///
/// Returns `None` for statuses that have no dedicated error kind.
fn classify_status(status: u16, message: String, name: &RepoName) -> Option<Error> {
    let error = match status {
        404 => Error::RepositoryNotFound { name: name.clone() },
        401 => Error::Authorization { reason: message },
        403 | 429 if message.to_ascii_lowercase().contains("rate limit") => Error::RateLimited,
        403 => Error::Authorization { reason: message },
        422 => Error::Unprocessable { message },
        _ => return None,
    };
    Some(error)
}

/// Query parameters for list endpoints.
#[derive(Debug, Serialize)]
struct PageQuery {
    per_page: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    direction: Option<&'static str>,
}

impl PageQuery {
    fn commits(page_size: u8) -> Self {
        Self {
            per_page: clamp_page_size(page_size),
            state: None,
            sort: None,
            direction: None,
        }
    }

    /// Every pull request, open or closed, newest created first.
    fn pull_requests(page_size: u8) -> Self {
        Self {
            per_page: clamp_page_size(page_size),
            state: Some("all"),
            sort: Some("created"),
            direction: Some("desc"),
        }
    }
}

fn clamp_page_size(page_size: u8) -> u8 {
    page_size.clamp(1, MAX_PER_PAGE)
}

#[derive(Debug, Deserialize)]
struct WireRepository {
    full_name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
}

impl WireRepository {
    fn into_snapshot(self) -> RepositorySnapshot {
        RepositorySnapshot {
            full_name: self.full_name,
            description: self.description,
            private: self.private,
            default_branch: self.default_branch,
            html_url: self.html_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct WireSignature {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct WireCommitDetail {
    #[serde(default)]
    author: Option<WireSignature>,
    #[serde(default)]
    committer: Option<WireSignature>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct WireCommit {
    sha: String,
    commit: WireCommitDetail,
    #[serde(default)]
    author: Option<WireUser>,
}

impl WireCommit {
    /// Converts to a record, falling back to the committer when the author
    /// signature is incomplete. Returns `None` when no timestamp is known.
    fn into_record(self) -> Option<CommitRecord> {
        let WireCommitDetail {
            author,
            committer,
            message,
        } = self.commit;

        let authored_at = author
            .as_ref()
            .and_then(|a| a.date)
            .or_else(|| committer.as_ref().and_then(|c| c.date))?;
        let author_name = author
            .and_then(|a| a.name)
            .or_else(|| committer.and_then(|c| c.name))
            .unwrap_or_default();

        Some(CommitRecord {
            sha: self.sha,
            author_name,
            author_login: self.author.map(|u| u.login),
            authored_at,
            message,
        })
    }
}

fn commits_to_records(commits: Vec<WireCommit>) -> Vec<CommitRecord> {
    commits
        .into_iter()
        .filter_map(|commit| {
            let sha = commit.sha.clone();
            let record = commit.into_record();
            if record.is_none() {
                warn!(%sha, "skipping commit without a timestamp");
            }
            record
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct WirePullRequest {
    number: u64,
    title: String,
    #[serde(default)]
    user: Option<WireUser>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WirePullRequest {
    fn into_record(self) -> PullRequestRecord {
        PullRequestRecord {
            number: self.number,
            author_login: self
                .user
                .map_or_else(|| GHOST_LOGIN.to_string(), |u| u.login),
            title: self.title,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn name() -> RepoName {
        RepoName::parse("owner/repo").unwrap()
    }

    #[tokio::test]
    async fn new_unauthenticated_client() {
        let client = GitHubClient::new(None).unwrap();
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn new_authenticated_client() {
        let token = SecretString::from("fake_token_for_testing".to_string());
        let client = GitHubClient::new(Some(token)).unwrap();
        assert!(client.is_authenticated());
    }

    #[tokio::test]
    async fn connector_authenticates_only_with_credential() {
        let credential = Credential::new(ghdash_protocol::CredentialId(1), None, "ghp_x");
        assert!(
            GitHubConnector
                .connect(Some(&credential))
                .unwrap()
                .is_authenticated()
        );
        assert!(!GitHubConnector.connect(None).unwrap().is_authenticated());
    }

    #[test]
    fn rate_limit_message_is_not_passed_through() {
        let error = classify_status(429, "API rate limit exceeded".into(), &name());
        assert_eq!(
            error.map(|e| e.to_string()),
            Some("rate limit exceeded".to_string())
        );
    }

    #[test]
    fn classify_status_codes() {
        assert!(matches!(
            classify_status(404, "Not Found".into(), &name()),
            Some(Error::RepositoryNotFound { .. })
        ));
        assert!(matches!(
            classify_status(401, "Bad credentials".into(), &name()),
            Some(Error::Authorization { .. })
        ));
        assert!(matches!(
            classify_status(403, "API rate limit exceeded for 1.2.3.4".into(), &name()),
            Some(Error::RateLimited)
        ));
        assert!(matches!(
            classify_status(403, "Resource not accessible by integration".into(), &name()),
            Some(Error::Authorization { .. })
        ));
        assert!(matches!(
            classify_status(422, "Validation Failed".into(), &name()),
            Some(Error::Unprocessable { .. })
        ));
        assert!(classify_status(500, "Server Error".into(), &name()).is_none());
    }

    #[test]
    fn pull_request_query_requests_all_states_newest_first() {
        let query = serde_json::to_value(PageQuery::pull_requests(30)).unwrap();
        assert_eq!(
            query,
            json!({"per_page": 30, "state": "all", "sort": "created", "direction": "desc"})
        );

        let query = serde_json::to_value(PageQuery::commits(0)).unwrap();
        assert_eq!(query, json!({"per_page": 1}));
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(clamp_page_size(0), 1);
        assert_eq!(clamp_page_size(42), 42);
        assert_eq!(clamp_page_size(250), 100);
    }

    #[test]
    fn commit_from_api_json() {
        let commits: Vec<WireCommit> = serde_json::from_value(json!([
            {
                "sha": "abc123",
                "commit": {
                    "author": {"name": "Jane", "email": "j@x", "date": "2024-05-01T12:00:00Z"},
                    "committer": {"name": "GitHub", "date": "2024-05-02T12:00:00Z"},
                    "message": "Fix bug\n\nLonger body"
                },
                "author": {"login": "jane"}
            },
            {
                "sha": "def456",
                "commit": {
                    "author": null,
                    "committer": {"name": "Bot", "date": "2024-05-03T00:00:00Z"},
                    "message": "Automated"
                },
                "author": null
            },
            {
                "sha": "nodate",
                "commit": {"author": null, "committer": null, "message": "?"},
                "author": null
            }
        ]))
        .unwrap();

        let records = commits_to_records(commits);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].author_name, "Jane");
        assert_eq!(records[0].author_login.as_deref(), Some("jane"));
        assert_eq!(
            records[0].authored_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(records[0].summary(), "Fix bug");

        assert_eq!(records[1].author_name, "Bot");
        assert!(records[1].author_login.is_none());
    }

    #[test]
    fn pull_request_from_api_json() {
        let pull: WirePullRequest = serde_json::from_value(json!({
            "number": 42,
            "title": "Add feature",
            "user": null,
            "state": "closed",
            "created_at": "2024-05-01T00:00:00Z",
            "updated_at": "2024-05-04T00:00:00Z"
        }))
        .unwrap();

        let record = pull.into_record();
        assert_eq!(record.number, 42);
        assert_eq!(record.author_login, "ghost");
        assert_eq!(record.title, "Add feature");
    }

    #[test]
    fn repository_from_api_json() {
        let repo: WireRepository = serde_json::from_value(json!({
            "id": 1,
            "full_name": "Owner/Repo",
            "description": null,
            "private": true,
            "default_branch": "main",
            "html_url": "https://github.com/Owner/Repo"
        }))
        .unwrap();

        let snapshot = repo.into_snapshot();
        assert_eq!(snapshot.full_name, "Owner/Repo");
        assert!(snapshot.private);
        assert_eq!(snapshot.default_branch.as_deref(), Some("main"));
    }
}
