use anyhow::{Context as _, Result, bail};
use chrono::Utc;
use crossterm::style::Stylize;
use ghdash_config::DataStore;
use ghdash_github::{Authorizer, BasicAuthClient, request_token};
use ghdash_protocol::CredentialId;
use secrecy::ExposeSecret;

use crate::cli::Context;
use crate::cli::prompt::Prompt;

pub async fn run<P: Prompt>(ctx: &mut Context, prompt: &mut P) -> Result<()> {
    let username = prompt.line("GitHub username: ")?.trim().to_string();
    if username.is_empty() {
        bail!("a username is required");
    }
    let password = prompt.secret("Password: ")?;

    let client = BasicAuthClient::new(&username, &password)?;
    let id = save_new_token(&mut ctx.store, &client, &username).await?;
    println!("Saved token {} for {}", id, username.as_str().green());
    Ok(())
}

/// Creates a token through `authorizer` and saves it under `username`.
pub async fn save_new_token<A: Authorizer>(
    store: &mut DataStore,
    authorizer: &A,
    username: &str,
) -> Result<CredentialId> {
    let token = request_token(authorizer, Utc::now())
        .await
        .context("GitHub did not create a token")?;
    let id = store.save_token(token.expose_secret(), Some(username))?;
    Ok(id)
}
