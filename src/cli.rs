use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// ldapsync - reconcile local user accounts against directory listings
#[derive(Parser, Debug)]
#[command(name = "ldapsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./ldapsync.toml, then ~/.config/ldapsync/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output NDJSON for schedulers
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one reconciliation
    Sync(SyncArgs),

    /// Validate configuration and directory snapshots
    Check,

    /// Print the canonical usernames of one domain
    List {
        /// Domain name as configured
        domain: String,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct SyncArgs {
    /// Plan and report, but change nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Only disable local accounts missing from every domain
    #[arg(long)]
    pub disable_only: bool,

    /// Skip domains that cannot be listed instead of aborting
    #[arg(long)]
    pub continue_on_domain_error: bool,
}
