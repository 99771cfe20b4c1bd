//! Command implementations for the ldapsync binary

mod check;
mod list;
mod sync;

pub use check::cmd_check;
pub use list::cmd_list;
pub use sync::cmd_sync;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::warn;

use ldapsync::config::Config;

/// Load the configuration file (explicit or default) with env overrides
/// applied. Unknown keys are logged as warnings.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::default_path().ok_or_else(|| {
            anyhow!("no configuration file found (tried ./ldapsync.toml and the user config directory)")
        })?,
    };

    let (config, warnings) = Config::load_with_warnings(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    for warning in &warnings {
        warn!("{}", warning);
    }
    Ok(config.with_env_overrides())
}
