//! ghdash - recent activity of your favorite GitHub repositories.
//!
//! This is the main binary: it parses the command line, loads the
//! configuration, sets up logging and dispatches to a command.

use std::io::{self, IsTerminal};

use clap::Parser;

mod cli;
mod dashboard;
mod logging;
#[cfg(test)]
mod testing;

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    // The live dashboard owns the screen, so it only logs to the file
    let terminal_logs = logging::wants_terminal(cli.verbose) && !cli.runs_live_dashboard();
    logging::init(&config.data_dir()?, terminal_logs)?;

    if !io::stdout().is_terminal() {
        crossterm::style::force_color_output(false);
    }

    cli::run(cli, config).await
}
