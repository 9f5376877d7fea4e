//! Credential resolution with fallback.
//!
//! The [`CredentialResolver`] decides which saved token to use for a
//! repository:
//!
//! 1. The token explicitly bound to the repository, if any
//! 2. The most recently added token (the default)
//! 3. No token (anonymous, rate-limited access)
//!
//! When the chosen token is rejected, [`CredentialResolver::fallback_sequence`]
//! offers the remaining tokens, newest first. Resolution only reads the local
//! store and never touches the network.

use ghdash_protocol::{Credential, CredentialId, RepoName};
use tracing::{debug, instrument};

use crate::error::{ConfigError, Result};
use crate::store::DataStore;

/// Chooses credentials for repositories from the [`DataStore`].
///
/// # Examples
///
/// ```
/// use ghdash_config::{CredentialResolver, DataStore};
/// use ghdash_protocol::RepoName;
///
/// # fn example() -> ghdash_config::Result<()> {
/// let mut store = DataStore::in_memory();
/// let old = store.save_token("ghp_old", None)?;
/// let new = store.save_token("ghp_new", None)?;
///
/// let resolver = CredentialResolver::new(&mut store);
/// let name = RepoName::parse("rust-lang/rust")?;
///
/// // No binding: the newest token is the default
/// assert_eq!(resolver.resolve(&name).map(|c| c.id), Some(new));
///
/// // After `new` is rejected, the older token is offered
/// let next: Vec<_> = resolver.fallback_sequence(&name, &[new]).map(|c| c.id).collect();
/// assert_eq!(next, vec![old]);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct CredentialResolver<'a> {
    store: &'a mut DataStore,
}

impl<'a> CredentialResolver<'a> {
    /// Creates a resolver over the given store.
    pub fn new(store: &'a mut DataStore) -> Self {
        Self { store }
    }

    /// Returns the credential to use for `name`, or `None` for anonymous
    /// access.
    ///
    /// A binding whose token has since been deleted is ignored.
    #[instrument(skip_all, fields(name = %name))]
    pub fn resolve(&self, name: &RepoName) -> Option<Credential> {
        if let Some(row) = self.store.credential_for_repo(name) {
            debug!(id = %row.id, "using token bound to repository");
            return Some(row.to_credential());
        }

        match self.store.most_recent(0) {
            Some(row) => {
                debug!(id = %row.id, "using default token");
                Some(row.to_credential())
            }
            None => {
                debug!("no saved token, using anonymous access");
                None
            }
        }
    }

    /// Returns every saved credential not in `tried`, newest first, for
    /// retrying `name` after an authorization failure.
    ///
    /// The sequence is lazy and finite, and each call starts over from the
    /// newest token.
    pub fn fallback_sequence<'s>(
        &'s self,
        name: &'s RepoName,
        tried: &'s [CredentialId],
    ) -> impl Iterator<Item = Credential> + 's {
        debug!(%name, tried = tried.len(), "building credential fallback sequence");
        self.store
            .list_tokens()
            .iter()
            .rev()
            .filter(move |row| !tried.contains(&row.id))
            .map(|row| row.to_credential())
    }

    /// Deletes a saved credential.
    ///
    /// Repositories bound to it fall back to the default or anonymous access
    /// on their next resolution.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CredentialNotFound`] if no credential has the
    /// given id, or a write error.
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: CredentialId) -> Result<()> {
        if self.store.delete_token(id)? {
            Ok(())
        } else {
            Err(ConfigError::credential_not_found(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> RepoName {
        RepoName::parse(s).unwrap()
    }

    #[test]
    fn resolve_without_tokens_is_anonymous() {
        let mut store = DataStore::in_memory();
        let resolver = CredentialResolver::new(&mut store);
        assert!(resolver.resolve(&name("owner/repo")).is_none());
    }

    #[test]
    fn resolve_prefers_bound_token() {
        let mut store = DataStore::in_memory();
        let bound = store.save_token("bound", None).unwrap();
        store.save_token("newer", None).unwrap();
        store.add_repo(&name("owner/private"), Some(bound)).unwrap();

        let resolver = CredentialResolver::new(&mut store);
        assert_eq!(resolver.resolve(&name("Owner/Private")).unwrap().id, bound);
    }

    #[test]
    fn resolve_falls_back_to_most_recent() {
        let mut store = DataStore::in_memory();
        store.save_token("older", None).unwrap();
        let newest = store.save_token("newest", None).unwrap();
        store.add_repo(&name("owner/public"), None).unwrap();

        let resolver = CredentialResolver::new(&mut store);
        assert_eq!(resolver.resolve(&name("owner/public")).unwrap().id, newest);
        assert_eq!(resolver.resolve(&name("not/followed")).unwrap().id, newest);
    }

    #[test]
    fn fallback_sequence_is_newest_first_and_excludes_tried() {
        let mut store = DataStore::in_memory();
        let a = store.save_token("a", None).unwrap();
        let b = store.save_token("b", None).unwrap();
        let c = store.save_token("c", None).unwrap();

        let resolver = CredentialResolver::new(&mut store);
        let repo = name("owner/repo");
        let all: Vec<_> = resolver.fallback_sequence(&repo, &[]).map(|c| c.id).collect();
        assert_eq!(all, vec![c, b, a]);

        let rest: Vec<_> = resolver.fallback_sequence(&repo, &[c, a]).map(|c| c.id).collect();
        assert_eq!(rest, vec![b]);

        // Restartable: a second call yields the same sequence
        let again: Vec<_> = resolver.fallback_sequence(&repo, &[c, a]).map(|c| c.id).collect();
        assert_eq!(again, rest);
    }

    #[test]
    fn fallback_sequence_is_empty_when_everything_was_tried() {
        let mut store = DataStore::in_memory();
        let a = store.save_token("a", None).unwrap();

        let resolver = CredentialResolver::new(&mut store);
        let repo = name("owner/repo");
        assert_eq!(resolver.fallback_sequence(&repo, &[a]).count(), 0);
    }

    #[test]
    fn delete_unknown_credential_fails() {
        let mut store = DataStore::in_memory();
        let mut resolver = CredentialResolver::new(&mut store);
        assert!(matches!(
            resolver.delete(CredentialId(7)),
            Err(ConfigError::CredentialNotFound { .. })
        ));
    }

    #[test]
    fn deleting_bound_credential_fails_open() {
        let mut store = DataStore::in_memory();
        let default = store.save_token("default", None).unwrap();
        let bound = store.save_token("bound", None).unwrap();
        store.add_repo(&name("owner/private"), Some(bound)).unwrap();

        let mut resolver = CredentialResolver::new(&mut store);
        resolver.delete(bound).unwrap();

        // The binding is gone; the remaining default is used
        assert_eq!(resolver.resolve(&name("owner/private")).unwrap().id, default);

        resolver.delete(default).unwrap();
        assert!(resolver.resolve(&name("owner/private")).is_none());
    }
}
