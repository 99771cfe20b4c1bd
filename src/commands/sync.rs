use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use ldapsync::application::{RunContext, SyncMechanism};
use ldapsync::domain::ports::{NoopEventSink, SyncEventSink};
use ldapsync::infrastructure::{JsonEventSink, RunLock};
use ldapsync::presentation::{create_renderer, OutputFormat, SyncServices};

use crate::cli::SyncArgs;

/// Exit status when the run aborted
const EXIT_FATAL: i32 = 1;
/// Exit status when the run finished with per-account failures
const EXIT_PARTIAL: i32 = 2;

pub fn cmd_sync(config_path: Option<&Path>, args: &SyncArgs, json: bool, verbose: u8) -> Result<()> {
    let config = super::load_config(config_path)?;
    config.validate()?;

    let mut options = config.reconcile_options();
    if args.dry_run {
        options.dry_run = true;
    }
    if args.disable_only {
        options.mechanism = SyncMechanism::DisableOnly;
    }
    if args.continue_on_domain_error {
        options.abort_on_domain_error = false;
    }

    let store_path = config.store_path();
    let lock = RunLock::acquire(&store_path)?;
    info!(lock = %lock.path().display(), "run lock acquired");

    let mut ctx = RunContext::new();
    if let Some(timeout) = config.run_timeout() {
        ctx = ctx.with_timeout(timeout);
    }
    let flag = ctx.cancel_flag();
    ctrlc::set_handler(move || {
        flag.store(true, std::sync::atomic::Ordering::SeqCst);
    })
    .context("failed to install Ctrl+C handler")?;

    let events: Arc<dyn SyncEventSink> = if json {
        Arc::new(JsonEventSink::stdout())
    } else {
        Arc::new(NoopEventSink)
    };

    let services = SyncServices::from_config(&config);
    let result = services.reconcile_use_case(events).sync(
        &config.domain_configs(),
        &config.exclusions,
        &options,
        &ctx,
    );
    drop(lock);

    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    create_renderer(format, true, verbose).render(&result);

    if !result.ok() {
        std::process::exit(EXIT_FATAL);
    }
    if result.has_failures() {
        std::process::exit(EXIT_PARTIAL);
    }
    Ok(())
}
