//! Common test utilities for scenario tests.
//!
//! This module provides:
//! - `TestEnv`: Isolated test environment with a temp directory
//! - Fixtures: Reusable configuration and snapshot content

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
