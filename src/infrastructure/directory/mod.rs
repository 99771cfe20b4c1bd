//! Directory adapters
//!
//! - `snapshot` - snapshot file format (JSON / YAML / TOML)
//! - `lister` - `SnapshotDirectory`, the directory ports over snapshots

mod lister;
mod snapshot;

pub use lister::SnapshotDirectory;
pub use snapshot::{DirectoryEntry, DirectorySnapshot, SnapshotError, SnapshotFormat};
