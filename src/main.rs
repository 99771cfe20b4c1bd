//! ldapsync CLI - reconcile local user accounts against directory listings
//!
//! Usage: ldapsync [--config PATH] [--json] [-v...] <COMMAND>
//!
//! Commands:
//!   sync    Run one reconciliation
//!   check   Validate configuration and directory snapshots
//!   list    Print the canonical usernames of one domain

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref();
    match &cli.command {
        Commands::Sync(args) => commands::cmd_sync(config, args, cli.json, cli.verbose),
        Commands::Check => commands::cmd_check(config, cli.json),
        Commands::List { domain } => commands::cmd_list(config, domain, cli.json),
    }
}

/// Logs go to stderr; RUST_LOG wins over -v
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
