//! Domain Policies
//!
//! Business rules that override what the directory diff alone would do.

mod exclusion;
mod requirements;

pub use exclusion::{ExclusionPolicy, ExclusionReason, ExclusionRules};
pub use requirements::GroupRequirements;
