//! The set of followed repositories.

use ghdash_config::{CredentialResolver, DataStore};
use ghdash_protocol::{Credential, CredentialId, RepoName};
use tracing::{info, instrument};

use crate::api::Connector;
use crate::error::{Error, Result};
use crate::repository::RepositoryHandle;

/// Follows and unfollows repositories, persisting the set in a
/// [`DataStore`].
///
/// A repository is only added once GitHub confirms it exists and the chosen
/// credential can read it. Failed follows leave the store untouched.
///
/// # Examples
///
/// ```no_run
/// use ghdash_config::DataStore;
/// use ghdash_github::{FollowingService, GitHubConnector};
/// use ghdash_protocol::RepoName;
///
/// # async fn example() -> ghdash_github::Result<()> {
/// let mut store = DataStore::in_memory();
/// let mut following = FollowingService::new(&GitHubConnector, &mut store);
///
/// let name = RepoName::parse("tokio-rs/tokio")?;
/// let handle = following.follow(&name, None).await?;
/// println!("now following {}", handle.full_name());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FollowingService<'a, C> {
    connector: &'a C,
    store: &'a mut DataStore,
}

impl<'a, C: Connector> FollowingService<'a, C> {
    /// Creates a service over `store`, opening repositories with
    /// `connector`.
    pub fn new(connector: &'a C, store: &'a mut DataStore) -> Self {
        Self { connector, store }
    }

    /// Starts following `name`.
    ///
    /// With an explicit `credential`, the repository is opened with it and
    /// the binding is persisted. Without one, the resolver's choice is used
    /// and nothing is bound, so the repository keeps following the default
    /// token.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyFollowing`] before any network access
    /// - [`Error::RepositoryNotFound`] or [`Error::Authorization`] from
    ///   GitHub, with the store unchanged
    /// - [`Error::Store`] if the store cannot be written
    #[instrument(skip_all, fields(name = %name))]
    pub async fn follow(
        &mut self,
        name: &RepoName,
        credential: Option<Credential>,
    ) -> Result<RepositoryHandle<C::Api>> {
        if self.store.contains_repo(name) {
            return Err(Error::AlreadyFollowing { name: name.clone() });
        }

        let bound = credential.as_ref().map(|c| c.id);
        let handle = match credential {
            Some(credential) => {
                RepositoryHandle::open_with(self.connector, name, Some(credential)).await?
            }
            None => {
                let resolver = CredentialResolver::new(&mut *self.store);
                RepositoryHandle::open(self.connector, &resolver, name).await?
            }
        };

        self.store.add_repo(name, bound)?;
        info!(credential = ?bound, "following repository");
        Ok(handle)
    }

    /// Stops following `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFollowing`] if `name` is not followed, or
    /// [`Error::Store`] if the store cannot be written.
    #[instrument(skip_all, fields(name = %name))]
    pub fn unfollow(&mut self, name: &RepoName) -> Result<()> {
        if self.store.remove_repo(name)? {
            info!("unfollowed repository");
            Ok(())
        } else {
            Err(Error::NotFollowing { name: name.clone() })
        }
    }

    /// Returns the followed repositories in the order they were followed.
    #[must_use]
    pub fn list_following(&self) -> Vec<RepoName> {
        self.store.list_repos()
    }

    /// Returns the saved credentials to try for `name` after the ones in
    /// `tried` were rejected, newest first.
    #[must_use]
    pub fn fallback_credentials(&mut self, name: &RepoName, tried: &[CredentialId]) -> Vec<Credential> {
        CredentialResolver::new(&mut *self.store)
            .fallback_sequence(name, tried)
            .collect()
    }
}
