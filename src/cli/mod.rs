pub mod follow;
pub mod following;
pub mod login;
pub mod prompt;
pub mod repo;
pub mod report;
pub mod token;
pub mod unfollow;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use ghdash_config::{Config, DataStore};
use ghdash_protocol::ActivityWindow;

use crate::cli::prompt::TerminalPrompt;

#[derive(Parser)]
#[command(name = "ghdash")]
#[command(about = "Keep an eye on recent activity in your favorite GitHub repositories")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging to terminal
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep followed repositories, tokens and logs in this directory
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show recent commits and pull requests of one repository
    Repo(repo::RepoArgs),

    /// Summarize recent activity of every followed repository
    #[command(visible_aliases = ["ls", "dashboard"])]
    Following(following::FollowingArgs),

    /// Start following a repository
    #[command(visible_alias = "add")]
    Follow(follow::FollowArgs),

    /// Stop following a repository
    #[command(visible_aliases = ["remove", "rm"])]
    Unfollow(unfollow::UnfollowArgs),

    /// Create and save a token by signing in with username and password
    Login,

    /// Manage saved personal access tokens
    #[command(subcommand)]
    Token(token::TokenCommand),
}

impl Cli {
    /// Returns whether the command takes over the screen.
    pub fn runs_live_dashboard(&self) -> bool {
        matches!(&self.command, Commands::Following(args) if args.live)
    }

    /// Loads the configuration, applying command-line overrides.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("could not load config from {}", path.display()))?,
            None => Config::load().context("could not load config")?,
        };
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        Ok(config)
    }
}

/// Everything a command needs: the configuration and the opened store.
pub struct Context {
    pub config: Config,
    pub store: DataStore,
}

impl Context {
    /// Opens the store the configuration points at.
    pub fn open(config: Config) -> Result<Self> {
        let path = config.store_path()?;
        let store = DataStore::open(&path)
            .with_context(|| format!("could not open store {}", path.display()))?;
        Ok(Self { config, store })
    }

    /// Returns the window for `days`, or the configured default.
    pub fn window(&self, days: Option<u32>) -> ActivityWindow {
        days.map_or_else(|| self.config.window(), ActivityWindow::days)
    }
}

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let mut ctx = Context::open(config)?;
    let mut prompt = TerminalPrompt;

    match cli.command {
        Commands::Repo(args) => repo::run(&mut ctx, args).await,
        Commands::Following(args) => following::run(&mut ctx, args).await,
        Commands::Follow(args) => follow::run(&mut ctx, args, &mut prompt).await,
        Commands::Unfollow(args) => unfollow::run(&mut ctx, args),
        Commands::Login => login::run(&mut ctx, &mut prompt).await,
        Commands::Token(command) => token::run(&mut ctx, command, &mut prompt),
    }
}
