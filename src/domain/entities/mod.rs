//! Domain Entities
//!
//! Core domain entities rebuilt on every reconciliation run.
//! - `Identity` - one account, local or directory-sourced
//! - `DirectoryListing` - merged per-domain directory usernames
//! - `DomainConfig` - per-domain settings, immutable during a run

mod directory_listing;
mod domain_config;
mod identity;

pub use directory_listing::DirectoryListing;
pub use domain_config::{
    AttributeMapping, AuthorizationRules, ConnectionSettings, DomainConfig, GroupSyncSettings,
};
pub use identity::{Identity, UserAttributes};
