//! ldapsync - directory-to-local user reconciliation
//!
//! Keeps a local user store in step with one or more LDAP / Active
//! Directory domains: users present in the directory get a local
//! account (or have theirs re-enabled), local accounts that vanished
//! from every domain are disabled, and configured exclusions are never
//! touched.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{ReconcileOptions, ReconcileUseCase, RunContext, SyncMechanism, SyncResult};
pub use config::Config;
pub use domain::entities::{DomainConfig, Identity};
pub use domain::policies::ExclusionRules;
pub use domain::value_objects::{DomainName, Username};
pub use error::{LdapSyncError, LdapSyncResult};
