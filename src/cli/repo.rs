use std::io::{self, Write};

use anyhow::{Context as _, Result};
use clap::Args;
use ghdash_config::CredentialResolver;
use ghdash_github::{GitHubConnector, RepositoryHandle};
use ghdash_protocol::RepoName;

use crate::cli::{Context, report};

#[derive(Args)]
pub struct RepoArgs {
    /// Repository as OWNER/NAME
    pub name: String,

    /// Only show activity from the last N days [default: from config]
    #[arg(long, short, value_parser = clap::value_parser!(u32).range(1..=365))]
    pub days: Option<u32>,

    /// Number of commits and pull requests to fetch [default: from config]
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub page_size: Option<u8>,

    /// Only show commits by this GitHub login
    #[arg(long, short)]
    pub author: Option<String>,
}

pub async fn run(ctx: &mut Context, args: RepoArgs) -> Result<()> {
    let name = RepoName::parse(&args.name)?;
    let window = ctx.window(args.days);
    let page_size = args.page_size.unwrap_or(ctx.config.page_size);

    let resolver = CredentialResolver::new(&mut ctx.store);
    let mut handle = RepositoryHandle::open_with_fallback(&GitHubConnector, &resolver, &name)
        .await
        .with_context(|| format!("could not open {name}"))?
        .with_page_size(page_size);

    let commits = handle.commits(window, args.author.as_deref()).await?;
    let pull_requests = handle.pull_requests(window).await?;

    let mut out = io::stdout().lock();
    report::write_repository(
        &mut out,
        handle.snapshot(),
        window,
        args.author.as_deref(),
        &commits,
        &pull_requests,
    )?;
    out.flush()?;
    Ok(())
}
