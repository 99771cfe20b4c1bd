//! Domain Layer
//!
//! The core of ldapsync - pure reconciliation logic without I/O.
//!
//! ## Structure
//!
//! - `entities/` - Identity, DirectoryListing, DomainConfig
//! - `value_objects/` - Username, DomainName, ActionKind
//! - `services/` - Planner (the two-set diff)
//! - `policies/` - ExclusionPolicy
//! - `ports/` - Interface definitions for directory, store and enrichment
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches a directory or a database
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod policies;
pub mod ports;
pub mod services;
pub mod value_objects;
