//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! These services have no I/O dependencies and are easily testable.

mod planner;

pub use planner::{
    Eligibility, PlanMode, PlannedAccount, Planner, ProtectionReason, ReconcilePlan,
};
