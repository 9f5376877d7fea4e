use anyhow::Result;
use clap::Args;
use crossterm::style::Stylize;
use ghdash_github::{FollowingService, GitHubConnector};
use ghdash_protocol::RepoName;

use crate::cli::Context;

#[derive(Args)]
pub struct UnfollowArgs {
    /// Repository as OWNER/NAME
    pub name: String,
}

pub fn run(ctx: &mut Context, args: UnfollowArgs) -> Result<()> {
    let name = RepoName::parse(&args.name)?;
    FollowingService::new(&GitHubConnector, &mut ctx.store).unfollow(&name)?;
    println!("Stopped following {}", name.as_str().green());
    Ok(())
}
