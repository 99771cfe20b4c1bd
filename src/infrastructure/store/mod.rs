//! Local user store adapters

mod toml_store;

pub use toml_store::{StoredBlock, StoredUser, TomlUserStore};
