//! Persisted followed repositories and saved tokens.
//!
//! The [`DataStore`] holds two relations, mirroring a small relational
//! schema:
//!
//! ```text
//! repos(name, token_id?)      token_id -> tokens.id, nullable
//! tokens(id, token, name?)
//! ```
//!
//! Rows keep insertion order. Token ids are allocated in increasing order so
//! the last token row is always the most recently added one.
//!
//! Every mutation builds the next state on a copy, persists it, and only
//! then swaps it in. A failed write leaves both the file and the in-memory
//! state untouched.
//!
//! # Examples
//!
//! ```
//! use ghdash_config::DataStore;
//! use ghdash_protocol::RepoName;
//!
//! # fn example() -> ghdash_config::Result<()> {
//! let mut store = DataStore::in_memory();
//! let token = store.save_token("ghp_example", Some("work"))?;
//!
//! let name = RepoName::parse("rust-lang/rust")?;
//! store.add_repo(&name, Some(token))?;
//!
//! assert_eq!(store.list_repos(), vec![name.clone()]);
//! assert_eq!(store.credential_for_repo(&name).map(|row| row.id), Some(token));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use ghdash_protocol::{Credential, CredentialId, RepoName};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{ConfigError, Result};
use crate::persistence::{read_config_file, write_config_file};

/// A row of the `tokens` relation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRow {
    /// The token identifier.
    pub id: CredentialId,
    /// The bearer token.
    pub token: String,
    /// An optional human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TokenRow {
    /// Converts the row into a [`Credential`].
    #[must_use]
    pub fn to_credential(&self) -> Credential {
        Credential::new(self.id, self.name.clone(), self.token.clone())
    }
}

impl fmt::Debug for TokenRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRow")
            .field("id", &self.id)
            .field("token", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

/// A row of the `repos` relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRow {
    /// The canonical repository name.
    pub name: RepoName,
    /// The token bound to this repository, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<CredentialId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    repos: Vec<RepoRow>,
    #[serde(default)]
    tokens: Vec<TokenRow>,
    #[serde(default)]
    next_token_id: i64,
}

impl StoreData {
    fn token(&self, id: CredentialId) -> Option<&TokenRow> {
        self.tokens.iter().find(|row| row.id == id)
    }

    fn allocate_token_id(&mut self) -> CredentialId {
        let floor = self.tokens.iter().map(|row| row.id.0 + 1).max().unwrap_or(1);
        let id = self.next_token_id.max(floor);
        self.next_token_id = id + 1;
        CredentialId(id)
    }
}

/// The durable store of followed repositories and tokens.
#[derive(Debug)]
pub struct DataStore {
    path: Option<PathBuf>,
    data: StoreData,
}

impl DataStore {
    /// Opens the store file at `path`, starting empty if it does not exist.
    ///
    /// The file (and its parent directories) is only created by the first
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            read_config_file(&path)?
        } else {
            debug!("store file not found, starting empty");
            StoreData::default()
        };
        debug!(
            repos = data.repos.len(),
            tokens = data.tokens.len(),
            "opened store"
        );
        Ok(Self {
            path: Some(path),
            data,
        })
    }

    /// Creates a store that is never written to disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: StoreData::default(),
        }
    }

    /// Returns the backing file, or `None` for in-memory stores.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn modify<T>(&mut self, change: impl FnOnce(&mut StoreData) -> Result<T>) -> Result<T> {
        let mut next = self.data.clone();
        let output = change(&mut next)?;
        if let Some(path) = &self.path {
            write_config_file(path, &next)?;
        }
        self.data = next;
        Ok(output)
    }

    // --- repos ---

    /// Adds a repository, optionally bound to a saved token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateRepository`] if the name is already
    /// stored, [`ConfigError::CredentialNotFound`] if `token_id` is unknown,
    /// or a write error.
    #[instrument(skip_all, fields(name = %name))]
    pub fn add_repo(&mut self, name: &RepoName, token_id: Option<CredentialId>) -> Result<()> {
        self.modify(|data| {
            if data.repos.iter().any(|row| &row.name == name) {
                return Err(ConfigError::DuplicateRepository { name: name.clone() });
            }
            if let Some(id) = token_id.filter(|id| data.token(*id).is_none()) {
                return Err(ConfigError::credential_not_found(id));
            }
            data.repos.push(RepoRow {
                name: name.clone(),
                token_id,
            });
            Ok(())
        })?;
        debug!("repository stored");
        Ok(())
    }

    /// Removes a repository. Returns `false` if it was not stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    #[instrument(skip_all, fields(name = %name))]
    pub fn remove_repo(&mut self, name: &RepoName) -> Result<bool> {
        if !self.contains_repo(name) {
            return Ok(false);
        }
        self.modify(|data| {
            data.repos.retain(|row| &row.name != name);
            Ok(())
        })?;
        debug!("repository removed");
        Ok(true)
    }

    /// Returns whether a repository is stored.
    #[must_use]
    pub fn contains_repo(&self, name: &RepoName) -> bool {
        self.data.repos.iter().any(|row| &row.name == name)
    }

    /// Returns all stored repository names in insertion order.
    #[must_use]
    pub fn list_repos(&self) -> Vec<RepoName> {
        self.data.repos.iter().map(|row| row.name.clone()).collect()
    }

    /// Returns all repository rows in insertion order.
    #[must_use]
    pub fn repos(&self) -> &[RepoRow] {
        &self.data.repos
    }

    // --- tokens ---

    /// Saves a token and returns its id.
    ///
    /// Saving a token that is already stored returns the existing id and
    /// leaves its position (and therefore its recency) unchanged. The stored
    /// row keeps its original name; a different `name` passed here is
    /// ignored. Delete the token and save it again to rename it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    #[instrument(skip(self, token))]
    pub fn save_token(&mut self, token: &str, name: Option<&str>) -> Result<CredentialId> {
        let token = token.trim();
        if let Some(existing) = self.data.tokens.iter().find(|row| row.token == token) {
            debug!(
                id = %existing.id,
                name_ignored = name.is_some(),
                "token already saved, keeping its name"
            );
            return Ok(existing.id);
        }
        let id = self.modify(|data| {
            let id = data.allocate_token_id();
            data.tokens.push(TokenRow {
                id,
                token: token.to_string(),
                name: name.map(str::to_string),
            });
            Ok(id)
        })?;
        debug!(%id, "token saved");
        Ok(id)
    }

    /// Returns all saved tokens, oldest first.
    #[must_use]
    pub fn list_tokens(&self) -> &[TokenRow] {
        &self.data.tokens
    }

    /// Returns the token with the given id.
    #[must_use]
    pub fn token(&self, id: CredentialId) -> Option<&TokenRow> {
        self.data.token(id)
    }

    /// Finds a token by numeric id or by name.
    #[must_use]
    pub fn find_token(&self, query: &str) -> Option<&TokenRow> {
        let query = query.trim();
        let by_id = query
            .trim_start_matches('#')
            .parse::<i64>()
            .ok()
            .and_then(|id| self.data.token(CredentialId(id)));
        by_id.or_else(|| {
            self.data
                .tokens
                .iter()
                .rev()
                .find(|row| row.name.as_deref() == Some(query))
        })
    }

    /// Deletes a token. Returns `false` if it was not saved.
    ///
    /// Repositories bound to the token are left without a binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    #[instrument(skip(self))]
    pub fn delete_token(&mut self, id: CredentialId) -> Result<bool> {
        if self.data.token(id).is_none() {
            return Ok(false);
        }
        self.modify(|data| {
            data.tokens.retain(|row| row.id != id);
            for repo in data.repos.iter_mut().filter(|row| row.token_id == Some(id)) {
                repo.token_id = None;
            }
            Ok(())
        })?;
        debug!("token deleted");
        Ok(true)
    }

    /// Returns the token `offset_from_end` positions before the newest one.
    ///
    /// `most_recent(0)` is the most recently added token.
    #[must_use]
    pub fn most_recent(&self, offset_from_end: usize) -> Option<&TokenRow> {
        self.data.tokens.iter().rev().nth(offset_from_end)
    }

    /// Returns the token explicitly bound to a repository, if any.
    #[must_use]
    pub fn credential_for_repo(&self, name: &RepoName) -> Option<&TokenRow> {
        self.data
            .repos
            .iter()
            .find(|row| &row.name == name)
            .and_then(|row| row.token_id)
            .and_then(|id| self.data.token(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn name(s: &str) -> RepoName {
        RepoName::parse(s).unwrap()
    }

    #[test]
    fn add_and_list_repos_in_insertion_order() {
        let mut store = DataStore::in_memory();
        store.add_repo(&name("josefwaller/pycatan"), None).unwrap();
        store.add_repo(&name("rails/rails"), None).unwrap();

        assert_eq!(
            store.list_repos(),
            vec![name("josefwaller/pycatan"), name("rails/rails")]
        );
    }

    #[test]
    fn add_repo_rejects_duplicates_case_insensitively() {
        let mut store = DataStore::in_memory();
        store.add_repo(&name("rails/rails"), None).unwrap();

        let err = store.add_repo(&name("Rails/Rails"), None).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateRepository { .. }));
        assert_eq!(store.list_repos().len(), 1);
    }

    #[test]
    fn add_repo_rejects_unknown_token() {
        let mut store = DataStore::in_memory();
        let err = store
            .add_repo(&name("rails/rails"), Some(CredentialId(42)))
            .unwrap_err();
        assert!(matches!(err, ConfigError::CredentialNotFound { .. }));
        assert!(store.list_repos().is_empty());
    }

    #[test]
    fn remove_repo_reports_absence() {
        let mut store = DataStore::in_memory();
        store.add_repo(&name("rails/rails"), None).unwrap();

        assert!(store.remove_repo(&name("RAILS/rails")).unwrap());
        assert!(!store.remove_repo(&name("rails/rails")).unwrap());
    }

    #[test]
    fn token_ids_increase_and_most_recent_is_last() {
        let mut store = DataStore::in_memory();
        let first = store.save_token("one", None).unwrap();
        let second = store.save_token("two", Some("work")).unwrap();

        assert!(second > first);
        assert_eq!(store.most_recent(0).unwrap().id, second);
        assert_eq!(store.most_recent(1).unwrap().id, first);
        assert!(store.most_recent(2).is_none());
    }

    #[test]
    fn saving_existing_token_returns_same_id() {
        let mut store = DataStore::in_memory();
        let first = store.save_token("one", None).unwrap();
        store.save_token("two", None).unwrap();

        assert_eq!(store.save_token(" one ", None).unwrap(), first);
        assert_eq!(store.list_tokens().len(), 2);
        assert_eq!(store.most_recent(0).unwrap().token, "two");
    }

    #[test]
    fn saving_existing_token_keeps_its_name() {
        let mut store = DataStore::in_memory();
        let id = store.save_token("one", Some("work")).unwrap();

        assert_eq!(store.save_token("one", Some("home")).unwrap(), id);
        assert_eq!(store.save_token("one", None).unwrap(), id);
        assert_eq!(store.token(id).unwrap().name.as_deref(), Some("work"));
        assert!(store.find_token("home").is_none());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut store = DataStore::in_memory();
        let first = store.save_token("one", None).unwrap();
        store.delete_token(first).unwrap();
        let second = store.save_token("two", None).unwrap();
        assert!(second > first);
    }

    #[test]
    fn delete_token_unbinds_repositories() {
        let mut store = DataStore::in_memory();
        let id = store.save_token("secret", None).unwrap();
        store.add_repo(&name("owner/private"), Some(id)).unwrap();

        assert!(store.delete_token(id).unwrap());
        assert!(store.credential_for_repo(&name("owner/private")).is_none());
        assert_eq!(store.repos()[0].token_id, None);
        assert!(!store.delete_token(id).unwrap());
    }

    #[test]
    fn find_token_by_id_or_name() {
        let mut store = DataStore::in_memory();
        let id = store.save_token("secret", Some("work")).unwrap();

        assert_eq!(store.find_token(&id.to_string()).unwrap().id, id);
        assert_eq!(store.find_token(&format!("#{id}")).unwrap().id, id);
        assert_eq!(store.find_token("work").unwrap().id, id);
        assert!(store.find_token("home").is_none());
    }

    #[test]
    fn token_row_debug_is_redacted() {
        let mut store = DataStore::in_memory();
        store.save_token("ghp_topsecret", None).unwrap();
        assert!(!format!("{store:?}").contains("ghp_topsecret"));
    }

    #[test]
    fn state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        {
            let mut store = DataStore::open(&path).unwrap();
            let id = store.save_token("secret", Some("work")).unwrap();
            store.add_repo(&name("owner/private"), Some(id)).unwrap();
            store.add_repo(&name("owner/public"), None).unwrap();
        }

        let store = DataStore::open(&path).unwrap();
        assert_eq!(
            store.list_repos(),
            vec![name("owner/private"), name("owner/public")]
        );
        let bound = store.credential_for_repo(&name("owner/private")).unwrap();
        assert_eq!(bound.token, "secret");
        assert_eq!(bound.name.as_deref(), Some("work"));
    }

    #[test]
    fn open_missing_file_does_not_create_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let store = DataStore::open(&path).unwrap();
        assert!(store.list_repos().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn open_rejects_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ repos: [ { name: 'not a repo name' } ] }").unwrap();

        assert!(DataStore::open(&path).is_err());
    }

    #[test]
    fn failed_write_leaves_state_untouched() {
        let dir = TempDir::new().unwrap();
        // A directory where the store file should be makes the rename fail
        let path = dir.path().join("store.json");
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        let mut store = DataStore::open(dir.path().join("absent.json")).unwrap();
        store.path = Some(path);

        assert!(store.add_repo(&name("owner/repo"), None).is_err());
        assert!(store.list_repos().is_empty());
    }
}
