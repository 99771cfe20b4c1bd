//! DirectoryLister port - abstraction over the authoritative directory
//!
//! Implementations return canonical usernames; the LDAP protocol itself
//! lives behind this trait.

use crate::domain::entities::{DomainConfig, UserAttributes};
use crate::domain::value_objects::Username;

/// Result type for directory operations
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Directory operation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Directory could not be contacted
    Unreachable(String),
    /// Call took longer than the caller allowed
    TimedOut { elapsed_ms: u128, limit_ms: u128 },
    /// Directory answered with data we cannot use
    InvalidData(String),
    /// Username not present in the directory
    UnknownUser(Username),
    /// Run was cancelled while the call was pending
    Cancelled,
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryError::Unreachable(msg) => write!(f, "directory unreachable: {}", msg),
            DirectoryError::TimedOut {
                elapsed_ms,
                limit_ms,
            } => write!(
                f,
                "directory call timed out after {}ms (limit {}ms)",
                elapsed_ms, limit_ms
            ),
            DirectoryError::InvalidData(msg) => write!(f, "invalid directory data: {}", msg),
            DirectoryError::UnknownUser(name) => {
                write!(f, "user '{}' not found in directory", name)
            }
            DirectoryError::Cancelled => f.write_str("directory call abandoned: run cancelled"),
        }
    }
}

impl std::error::Error for DirectoryError {}

/// Read access to one directory domain
pub trait DirectoryLister {
    /// All canonical usernames currently present in the domain
    fn list_usernames(&self, domain: &DomainConfig) -> DirectoryResult<Vec<Username>>;

    /// Profile attributes used when creating the local account
    fn user_attributes(
        &self,
        username: &Username,
        domain: &DomainConfig,
    ) -> DirectoryResult<UserAttributes>;
}

impl<T: DirectoryLister + ?Sized> DirectoryLister for &T {
    fn list_usernames(&self, domain: &DomainConfig) -> DirectoryResult<Vec<Username>> {
        (**self).list_usernames(domain)
    }

    fn user_attributes(
        &self,
        username: &Username,
        domain: &DomainConfig,
    ) -> DirectoryResult<UserAttributes> {
        (**self).user_attributes(username, domain)
    }
}
