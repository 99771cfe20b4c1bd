//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod action_kind;
mod domain_name;
mod username;

pub use action_kind::ActionKind;
pub use domain_name::DomainName;
pub use username::Username;
