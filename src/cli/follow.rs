use anyhow::{Result, anyhow};
use clap::Args;
use crossterm::style::Stylize;
use ghdash_config::{CredentialResolver, DataStore};
use ghdash_github::{Connector, FollowingService, GitHubConnector, RepositoryHandle};
use ghdash_protocol::{Credential, RepoName};
use tracing::info;

use crate::cli::Context;
use crate::cli::prompt::Prompt;

#[derive(Args)]
pub struct FollowArgs {
    /// Repository as OWNER/NAME
    pub name: String,

    /// Saved token to use for this repository, by id or name
    #[arg(long, short)]
    pub token: Option<String>,
}

pub async fn run<P: Prompt>(ctx: &mut Context, args: FollowArgs, prompt: &mut P) -> Result<()> {
    let name = RepoName::parse(&args.name)?;
    let credential = match &args.token {
        Some(query) => Some(
            ctx.store
                .find_token(query)
                .ok_or_else(|| anyhow!("no saved token matches `{query}`"))?
                .to_credential(),
        ),
        None => None,
    };

    let handle =
        follow_with_prompt(&GitHubConnector, &mut ctx.store, &name, credential, prompt).await?;
    println!("Now following {}", handle.full_name().green());
    Ok(())
}

/// Follows `name`, and when GitHub rejects the credential, offers each other
/// saved token in turn.
///
/// A token accepted this way is bound to the repository.
pub async fn follow_with_prompt<C, P>(
    connector: &C,
    store: &mut DataStore,
    name: &RepoName,
    credential: Option<Credential>,
    prompt: &mut P,
) -> Result<RepositoryHandle<C::Api>>
where
    C: Connector,
    P: Prompt,
{
    let first = match &credential {
        Some(credential) => Some(credential.id),
        None => CredentialResolver::new(&mut *store)
            .resolve(name)
            .map(|c| c.id),
    };

    let mut following = FollowingService::new(connector, store);
    let mut error = match following.follow(name, credential).await {
        Err(e) if e.allows_credential_retry() => e,
        other => return Ok(other?),
    };

    let tried: Vec<_> = first.into_iter().collect();
    for candidate in following.fallback_credentials(name, &tried) {
        let question = format!("{error}. Try token {} instead?", candidate.label());
        if !prompt.confirm(&question)? {
            continue;
        }

        info!(%name, id = %candidate.id, "retrying with another token");
        match following.follow(name, Some(candidate)).await {
            Ok(handle) => return Ok(handle),
            Err(e) if e.allows_credential_retry() => error = e,
            Err(e) => return Err(e.into()),
        }
    }

    Err(anyhow::Error::new(error).context(format!("no saved token could open {name}")))
}
