use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use ghdash_github::GitHubConnector;
use ghdash_protocol::ActivityWindow;
use ghdash_tui::App;
use ghdash_tui::terminal::{RawDisplayGuard, install_panic_hook};
use tracing::info;

use crate::cli::{Context, report};
use crate::dashboard::Dashboard;

#[derive(Args)]
pub struct FollowingArgs {
    /// Only count activity from the last N days [default: from config]
    #[arg(long, short, value_parser = clap::value_parser!(u32).range(1..=365))]
    pub days: Option<u32>,

    /// Keep refreshing in a full-screen dashboard
    #[arg(long)]
    pub live: bool,

    /// Seconds between live refreshes [default: from config]
    #[arg(long, requires = "live", value_parser = clap::value_parser!(u32).range(5..=3600))]
    pub interval: Option<u32>,
}

pub async fn run(ctx: &mut Context, args: FollowingArgs) -> Result<()> {
    let window = ctx.window(args.days);
    let mut dashboard = Dashboard::new(
        GitHubConnector,
        &mut ctx.store,
        window,
        ctx.config.page_size,
    );

    if args.live {
        let seconds = args.interval.unwrap_or_else(|| {
            ctx.config
                .polling
                .effective_interval(dashboard.is_authenticated())
        });
        return run_live(dashboard, window, Duration::from_secs(seconds.into())).await;
    }

    if dashboard.is_empty() {
        println!("Not following any repositories yet. Try `ghdash follow OWNER/NAME`.");
        return Ok(());
    }

    let reports = dashboard.refresh_all().await;
    let mut out = io::stdout().lock();
    report::write_summary(&mut out, window, &reports)?;
    out.flush()?;
    Ok(())
}

async fn run_live(
    mut dashboard: Dashboard<GitHubConnector>,
    window: ActivityWindow,
    interval: Duration,
) -> Result<()> {
    info!(interval_secs = interval.as_secs(), "starting live dashboard");
    install_panic_hook();

    let mut guard = RawDisplayGuard::acquire()?;
    let mut app = App::new(window, interval);

    // Always restore the terminal, even if the app failed
    let result = app.run(guard.terminal(), &mut dashboard).await;
    guard.restore()?;

    result
}
