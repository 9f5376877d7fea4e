use std::io::{self, Write};

use anyhow::{Result, anyhow, bail};
use clap::Subcommand;
use crossterm::style::Stylize;
use ghdash_config::{CredentialResolver, DataStore};
use ghdash_protocol::CredentialId;
use secrecy::ExposeSecret;

use crate::cli::prompt::Prompt;
use crate::cli::{Context, report};

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Save a personal access token; the newest token is the default
    Add {
        /// The token; prompted for without echo when omitted
        token: Option<String>,

        /// A name to refer to the token by
        #[arg(long, short)]
        name: Option<String>,
    },

    /// List saved tokens without revealing them
    #[command(visible_alias = "ls")]
    List,

    /// Delete a saved token
    #[command(visible_aliases = ["remove", "rm"])]
    Delete {
        /// Token id or name
        token: String,
    },
}

pub fn run<P: Prompt>(ctx: &mut Context, command: TokenCommand, prompt: &mut P) -> Result<()> {
    match command {
        TokenCommand::Add { token, name } => {
            let token = match token {
                Some(token) => token,
                None => prompt.secret("Token: ")?.expose_secret().to_string(),
            };
            let id = add(&mut ctx.store, &token, name.as_deref())?;
            println!("Saved token {}", id.to_string().green());
        }
        TokenCommand::List => {
            let mut out = io::stdout().lock();
            report::write_tokens(&mut out, ctx.store.list_tokens(), ctx.store.repos())?;
            out.flush()?;
        }
        TokenCommand::Delete { token } => {
            let (id, unbound) = delete(&mut ctx.store, &token)?;
            println!("Deleted token {}", id.to_string().green());
            if unbound > 0 {
                println!("{unbound} repositories now use the default token");
            }
        }
    }
    Ok(())
}

fn add(store: &mut DataStore, token: &str, name: Option<&str>) -> Result<CredentialId> {
    if token.trim().is_empty() {
        bail!("the token is empty");
    }
    Ok(store.save_token(token, name)?)
}

/// Deletes the token matching `query`, returning its id and how many
/// repositories were bound to it.
fn delete(store: &mut DataStore, query: &str) -> Result<(CredentialId, usize)> {
    let id = store
        .find_token(query)
        .map(|row| row.id)
        .ok_or_else(|| anyhow!("no saved token matches `{query}`"))?;
    let unbound = store
        .repos()
        .iter()
        .filter(|repo| repo.token_id == Some(id))
        .count();

    CredentialResolver::new(store).delete(id)?;
    Ok((id, unbound))
}
