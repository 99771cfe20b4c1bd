//! Configuration module for ldapsync
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (LDAPSYNC_*)
//! 3. Config file (`--config`, `./ldapsync.toml`, or `~/.config/ldapsync/config.toml`)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::ConfigWarning;
pub use types::{Config, DomainEntry, PagesConfig, StoreConfig, SyncConfig};
