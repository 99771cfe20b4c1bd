//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `ReconcileUseCase` - Lists directories, plans the diff, applies add / enable / disable

pub mod reconcile;

pub use reconcile::{
    AccountError, PlannedChange, ReconcileOptions, ReconcileUseCase, RunContext, SyncMechanism,
    SyncResult,
};
