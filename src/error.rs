//! Error types for ldapsync
//!
//! Uses `thiserror` for library errors. Port-level failures (directory,
//! store, enrichment) have their own types in `domain::ports` and are
//! wrapped here when they cross the application boundary.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::{DirectoryError, StoreError};

/// Result type alias for ldapsync operations
pub type LdapSyncResult<T> = Result<T, LdapSyncError>;

/// Main error type for ldapsync operations
#[derive(Error, Debug)]
pub enum LdapSyncError {
    /// No directory domain configured; refusing to run (would disable everyone)
    #[error("no directory domains configured - refusing to reconcile")]
    NoDomains,

    /// Domain referenced but not configured
    #[error("unknown domain '{0}'")]
    UnknownDomain(String),

    /// Configuration file is invalid
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Configuration loaded but semantically wrong
    #[error("configuration error: {0}")]
    Config(String),

    /// Directory unreachable for one domain
    #[error("directory for domain '{domain}' failed: {source}")]
    Directory {
        domain: String,
        #[source]
        source: DirectoryError,
    },

    /// Local user store unreachable
    #[error("local user store failed: {0}")]
    Store(#[from] StoreError),

    /// Run was cancelled from outside (e.g. Ctrl+C)
    #[error("reconciliation run cancelled")]
    Cancelled,

    /// Run exceeded its deadline
    #[error("reconciliation run exceeded its deadline")]
    DeadlineExceeded,

    /// Another run holds the lock
    #[error("another reconciliation run is in progress (lock: {path})")]
    RunInProgress { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
