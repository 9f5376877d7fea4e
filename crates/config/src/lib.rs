//! Configuration and persisted state for ghdash.
//!
//! This crate handles loading configuration, persisting followed
//! repositories and tokens, and choosing which token to use for a
//! repository.
//!
//! # Overview
//!
//! - [`config`]: Core configuration struct and loading logic
//! - [`polling`]: Live refresh interval with rate-limit awareness
//! - [`store`]: The followed-repository and token relations
//! - [`auth`]: Credential resolution with fallback
//! - [`persistence`]: File locations, reading and atomic writing
//! - [`error`]: Error types for configuration and store operations
//!
//! # Configuration Sources (Priority)
//!
//! 1. An explicit path passed by the caller
//! 2. Local config (`./ghdash.json5` or `./ghdash.json`)
//! 3. User config (`~/.config/ghdash/config.json5` or `~/.config/ghdash/config.json`)
//! 4. Built-in defaults
//!
//! # Token Resolution
//!
//! 1. Token bound to the repository when it was followed
//! 2. Most recently added token
//! 3. Unauthenticated (rate-limited)
//!
//! # Examples
//!
//! ```no_run
//! use ghdash_config::{Config, CredentialResolver, DataStore};
//!
//! # fn example() -> ghdash_config::Result<()> {
//! let config = Config::load()?;
//! let mut store = DataStore::open(config.store_path()?)?;
//!
//! let names = store.list_repos();
//! let resolver = CredentialResolver::new(&mut store);
//! for name in &names {
//!     let credential = resolver.resolve(name);
//!     println!("{name}: {}", credential.map_or("anonymous".to_string(), |c| c.label()));
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod persistence;
pub mod polling;
pub mod store;

// Re-export primary types at crate root for convenience
pub use auth::CredentialResolver;
pub use config::{Config, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use error::{ConfigError, Result};
pub use polling::PollingConfig;
pub use store::{DataStore, RepoRow, TokenRow};
