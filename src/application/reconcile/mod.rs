//! Reconcile Module
//!
//! Synchronizes the local user store against the configured directory
//! domains.
//!
//! ## Structure
//!
//! - `options` - Per-run settings (`ReconcileOptions`, `SyncMechanism`)
//! - `context` - Cancellation and deadlines (`RunContext`)
//! - `result` - Outcome of a run (`SyncResult`)
//! - `use_case` - Core orchestration (`ReconcileUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use ldapsync::application::reconcile::{ReconcileOptions, ReconcileUseCase, RunContext};
//!
//! let use_case = ReconcileUseCase::new(Arc::new(directory), Arc::new(checker), &store, &store);
//! let result = use_case.sync(&domains, &rules, &ReconcileOptions::new(), &RunContext::new());
//! ```

mod context;
mod options;
mod result;
mod use_case;

pub use context::RunContext;
pub use options::{
    ReconcileOptions, SyncMechanism, DEFAULT_BLOCK_REASON, DEFAULT_BLOCK_TAG, DEFAULT_EXECUTOR,
};
pub use result::{AccountError, PlannedChange, SyncResult};
pub use use_case::ReconcileUseCase;
