//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `directory/` - Directory snapshot listing and eligibility
//! - `store/` - TOML-backed local user store
//! - `events/` - Sync event sinks (NDJSON)
//! - `enrichment` - Attribute and group sync from the directory
//! - `pages` - Filesystem user pages
//! - `lock` - Single-run lock per store

pub mod directory;
pub mod enrichment;
pub mod events;
pub mod lock;
pub mod pages;
pub mod store;

// Re-export for convenience
pub use directory::{DirectoryEntry, DirectorySnapshot, SnapshotDirectory, SnapshotError};
pub use enrichment::DirectoryEnricher;
pub use events::JsonEventSink;
pub use lock::RunLock;
pub use pages::FsPagePublisher;
pub use store::{StoredUser, TomlUserStore};
