//! Creating personal access tokens from a username and password.

use std::future::Future;

use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};

/// Scopes requested for new tokens. `repo` grants read access to private
/// repositories.
pub const TOKEN_SCOPES: &[&str] = &["repo"];

/// Note attached to new tokens so they can be recognized on GitHub.
pub const TOKEN_NOTE: &str = "ghdash token";

/// Something that can create a token on GitHub.
pub trait Authorizer: Send + Sync {
    /// Creates a token with `scopes`, labeled `note`, and returns its value.
    fn create_authorization(
        &self,
        scopes: &[&str],
        note: &str,
    ) -> impl Future<Output = Result<SecretString>> + Send;
}

/// An [`Authorizer`] signing in with basic authentication.
#[derive(Debug, Clone)]
pub struct BasicAuthClient {
    inner: Octocrab,
}

impl BasicAuthClient {
    /// Creates a client for `username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the octocrab client fails to initialize.
    #[instrument(skip(password))]
    pub fn new(username: &str, password: &SecretString) -> Result<Self> {
        let inner = Octocrab::builder()
            .basic_auth(username.to_string(), password.expose_secret().to_string())
            .build()
            .map_err(Error::Api)?;
        Ok(Self { inner })
    }
}

#[derive(Debug, Serialize)]
struct AuthorizationRequest<'a> {
    scopes: &'a [&'a str],
    note: &'a str,
}

#[derive(Deserialize)]
struct AuthorizationResponse {
    token: String,
}

impl Authorizer for BasicAuthClient {
    #[instrument(skip(self))]
    async fn create_authorization(&self, scopes: &[&str], note: &str) -> Result<SecretString> {
        let body = AuthorizationRequest { scopes, note };
        let response: AuthorizationResponse = self
            .inner
            .post("/authorizations", Some(&body))
            .await
            .map_err(classify)?;
        Ok(SecretString::from(response.token))
    }
}

fn classify(error: octocrab::Error) -> Error {
    let octocrab::Error::GitHub { source, .. } = &error else {
        warn!(error = %error, "authorization request failed");
        return Error::Api(error);
    };

    let status = source.status_code.as_u16();
    let message = source.message.clone();
    warn!(status, %message, "GitHub refused to create a token");
    match status {
        401 | 403 | 404 => Error::Authorization { reason: message },
        422 => Error::Unprocessable { message },
        _ => Error::Api(error),
    }
}

/// Creates a token with the standard scopes and note.
///
/// GitHub refuses a second token with the same note, so when the standard
/// note is taken the request is retried once with the note suffixed by
/// `now`.
///
/// # Errors
///
/// Returns [`Error::Authorization`] for bad credentials or a missing
/// two-factor code, or the error of the retried request.
#[instrument(skip_all)]
pub async fn request_token<A: Authorizer>(
    authorizer: &A,
    now: DateTime<Utc>,
) -> Result<SecretString> {
    match authorizer.create_authorization(TOKEN_SCOPES, TOKEN_NOTE).await {
        Err(Error::Unprocessable { message }) => {
            let note = format!("{TOKEN_NOTE} {}", now.format("%Y-%m-%d %H:%M:%S"));
            debug!(%message, %note, "token note already taken, retrying");
            let token = authorizer.create_authorization(TOKEN_SCOPES, &note).await?;
            info!(%note, "created token");
            Ok(token)
        }
        Ok(token) => {
            info!(note = TOKEN_NOTE, "created token");
            Ok(token)
        }
        Err(e) => Err(e),
    }
}
