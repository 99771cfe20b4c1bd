//! Presentation Layer
//!
//! This layer handles:
//! - Creating the reconcile use case with infrastructure dependencies
//! - Output formatting (text/JSON)
//!
//! ## Structure
//!
//! - `factory` - Wires file-backed adapters into the use case (dependency injection)
//! - `output` - Output rendering abstractions
//!
//! ## Usage
//!
//! ```ignore
//! use ldapsync::presentation::SyncServices;
//!
//! let services = SyncServices::from_config(&config);
//! let result = services.reconcile_use_case(events).sync(&domains, &rules, &options, &ctx);
//! ```

pub mod factory;
pub mod output;

pub use factory::{ConcreteReconcileUseCase, SyncServices};
pub use output::{create_renderer, JsonRenderer, OutputFormat, SyncResultRenderer, TextRenderer};
