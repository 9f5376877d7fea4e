//! Saved API credentials.
//!
//! A [`Credential`] is an opaque bearer token with an optional label. Tokens
//! are wrapped in [`SecretString`] so that debug output and log fields never
//! contain the secret.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Identifier of a saved credential.
///
/// Identifiers are allocated in increasing order, so a larger id is a more
/// recently added credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialId(pub i64);

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A saved bearer token.
///
/// # Examples
///
/// ```
/// use ghdash_protocol::{Credential, CredentialId};
///
/// let credential = Credential::new(CredentialId(1), Some("work".to_string()), "ghp_secret");
/// assert_eq!(credential.label(), "work");
/// assert!(!format!("{credential:?}").contains("ghp_secret"));
/// ```
#[derive(Debug)]
pub struct Credential {
    /// The store identifier.
    pub id: CredentialId,
    /// An optional human-readable name.
    pub name: Option<String>,
    /// The token itself.
    pub token: SecretString,
}

impl Credential {
    /// Creates a credential from its parts.
    #[must_use]
    pub fn new(id: CredentialId, name: Option<String>, token: impl Into<String>) -> Self {
        Self {
            id,
            name,
            token: SecretString::from(token.into()),
        }
    }

    /// Returns the name, or `#<id>` for unnamed credentials.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", self.id),
        }
    }
}

impl Clone for Credential {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            token: SecretString::from(self.token.expose_secret().to_owned()),
        }
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.token.expose_secret() == other.token.expose_secret()
    }
}

impl Eq for Credential {}
