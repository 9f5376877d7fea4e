//! Text output of the one-shot commands.
//!
//! Every function writes to a caller-supplied writer so the output can be
//! checked in tests. Styling comes from crossterm and is switched off by
//! `main` when stdout is not a terminal.

use std::io::{self, Write};

use chrono::Local;
use crossterm::style::Stylize;
use ghdash_config::{RepoRow, TokenRow};
use ghdash_protocol::{ActivityWindow, CommitRecord, PullRequestRecord, RepositorySnapshot};
use ghdash_tui::RepoReport;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Writes the header, commits and pull requests of one repository.
pub fn write_repository<W: Write>(
    out: &mut W,
    snapshot: &RepositorySnapshot,
    window: ActivityWindow,
    author: Option<&str>,
    commits: &[CommitRecord],
    pull_requests: &[PullRequestRecord],
) -> io::Result<()> {
    let visibility = if snapshot.private { "private" } else { "public" };
    writeln!(out, "{} ({visibility})", snapshot.full_name.as_str().bold())?;
    if let Some(description) = snapshot.description.as_deref().filter(|d| !d.is_empty()) {
        writeln!(out, "{description}")?;
    }
    if let Some(url) = &snapshot.html_url {
        writeln!(out, "{}", url.as_str().dark_grey())?;
    }

    let span = format!("from the last {} {}", window.len_days(), window.unit());
    let heading = match author {
        Some(login) => format!("Commits by {login} {span} ({})", commits.len()),
        None => format!("Commits {span} ({})", commits.len()),
    };
    writeln!(out)?;
    writeln!(out, "{}", heading.bold())?;
    if commits.is_empty() {
        writeln!(out, "  none")?;
    }
    for commit in commits {
        let who = commit.author_login.as_deref().unwrap_or(&commit.author_name);
        writeln!(
            out,
            "  {}  {}  {who:<16}  {}",
            commit.short_sha().yellow(),
            commit.authored_at.with_timezone(&Local).format(DATE_FORMAT),
            commit.summary()
        )?;
    }

    let heading = format!("Pull requests {span} ({})", pull_requests.len());
    writeln!(out)?;
    writeln!(out, "{}", heading.bold())?;
    if pull_requests.is_empty() {
        writeln!(out, "  none")?;
    }
    for pull_request in pull_requests {
        writeln!(
            out,
            "  {}  {}  {:<16}  {}",
            format!("#{:<6}", pull_request.number).yellow(),
            pull_request
                .created_at
                .with_timezone(&Local)
                .format(DATE_FORMAT),
            pull_request.author_login,
            pull_request.title
        )?;
    }

    Ok(())
}

/// Writes one line per followed repository, in the order of `reports`.
pub fn write_summary<W: Write>(
    out: &mut W,
    window: ActivityWindow,
    reports: &[RepoReport],
) -> io::Result<()> {
    let names: Vec<&str> = reports
        .iter()
        .map(|report| match &report.result {
            Ok(summary) => summary.full_name.as_str(),
            Err(_) => report.name.as_str(),
        })
        .collect();
    let width = names
        .iter()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0)
        .max("REPOSITORY".len());

    let heading = format!(
        "Activity in the last {} {}",
        window.len_days(),
        window.unit()
    );
    writeln!(out, "{}", heading.bold())?;
    writeln!(
        out,
        "{:<width$}  {:>7}  {:>4}  LATEST COMMIT",
        "REPOSITORY", "COMMITS", "PRS"
    )?;

    for (report, name) in reports.iter().zip(names) {
        match &report.result {
            Ok(summary) => writeln!(
                out,
                "{name:<width$}  {:>7}  {:>4}  {}",
                summary.commits,
                summary.pull_requests,
                summary.latest_commit.as_deref().unwrap_or("-")
            )?,
            Err(error) => writeln!(
                out,
                "{name:<width$}  {}",
                format!("error: {error}").red()
            )?,
        }
    }

    let failures = reports.iter().filter(|r| r.result.is_err()).count();
    if failures > 0 {
        writeln!(out)?;
        writeln!(
            out,
            "{} of {} repositories could not be refreshed",
            failures,
            reports.len()
        )?;
    }

    Ok(())
}

/// Writes the saved tokens without revealing them.
///
/// The newest token is marked as the default for unbound repositories.
pub fn write_tokens<W: Write>(
    out: &mut W,
    tokens: &[TokenRow],
    repos: &[RepoRow],
) -> io::Result<()> {
    let Some(default) = tokens.last().map(|row| row.id) else {
        writeln!(
            out,
            "No saved tokens. Add one with `ghdash token add` or `ghdash login`."
        )?;
        return Ok(());
    };

    let width = tokens
        .iter()
        .filter_map(|row| row.name.as_deref())
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    writeln!(
        out,
        "{:<4}  {:<width$}  {:<13}  REPOSITORIES",
        "ID", "NAME", "TOKEN"
    )?;
    for row in tokens.iter().rev() {
        let bound = repos
            .iter()
            .filter(|repo| repo.token_id == Some(row.id))
            .count();
        let id = if row.id == default {
            format!("{}*", row.id)
        } else {
            row.id.to_string()
        };
        writeln!(
            out,
            "{id:<4}  {:<width$}  {:<13}  {bound}",
            row.name.as_deref().unwrap_or("-"),
            mask_token(&row.token)
        )?;
    }
    writeln!(out)?;
    writeln!(out, "* used for repositories without a bound token")?;

    Ok(())
}

/// Shows only the ends of a token, or nothing for short ones.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < 12 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}
