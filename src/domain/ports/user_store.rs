//! UserStore port - the local account store
//!
//! The store owns persistence of accounts; the reconciler only reads
//! identities and asks for create / enable / disable.

use std::collections::BTreeMap;

use crate::domain::entities::{Identity, UserAttributes};
use crate::domain::value_objects::{DomainName, Username};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// User store errors
#[derive(Debug)]
pub enum StoreError {
    /// Backing store cannot be reached at all
    Unavailable(String),
    /// Account does not exist
    NotFound(Username),
    /// Account already exists
    AlreadyExists(Username),
    /// Store refused the change
    Rejected(String),
    /// I/O error
    Io(std::io::Error),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "user store unavailable: {}", msg),
            StoreError::NotFound(name) => write!(f, "user '{}' not found", name),
            StoreError::AlreadyExists(name) => write!(f, "user '{}' already exists", name),
            StoreError::Rejected(msg) => write!(f, "change rejected: {}", msg),
            StoreError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {}

/// How a disable action is recorded by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDetails {
    pub reason: String,
    pub tags: Vec<String>,
    /// Account performing the block
    pub actor: String,
}

/// Local account store
pub trait UserStore {
    /// All known local accounts, keyed by canonical username
    fn read_users(&self) -> StoreResult<BTreeMap<Username, Identity>>;

    /// Fresh read of a single account
    fn find_user(&self, username: &Username) -> StoreResult<Option<Identity>>;

    fn create_user(&self, username: &Username, attributes: &UserAttributes)
        -> StoreResult<Identity>;

    fn disable_user(&self, identity: &Identity, block: &BlockDetails) -> StoreResult<()>;

    fn enable_user(&self, identity: &Identity, actor: &str) -> StoreResult<()>;

    /// Remember which directory domain the account belongs to
    fn record_domain(&self, identity: &Identity, domain: &DomainName) -> StoreResult<()>;
}

/// Local group membership lookup, used by the exclusion policy
pub trait GroupMembership {
    fn groups_of(&self, identity: &Identity) -> StoreResult<Vec<String>>;
}

impl<T: UserStore + ?Sized> UserStore for &T {
    fn read_users(&self) -> StoreResult<BTreeMap<Username, Identity>> {
        (**self).read_users()
    }

    fn find_user(&self, username: &Username) -> StoreResult<Option<Identity>> {
        (**self).find_user(username)
    }

    fn create_user(
        &self,
        username: &Username,
        attributes: &UserAttributes,
    ) -> StoreResult<Identity> {
        (**self).create_user(username, attributes)
    }

    fn disable_user(&self, identity: &Identity, block: &BlockDetails) -> StoreResult<()> {
        (**self).disable_user(identity, block)
    }

    fn enable_user(&self, identity: &Identity, actor: &str) -> StoreResult<()> {
        (**self).enable_user(identity, actor)
    }

    fn record_domain(&self, identity: &Identity, domain: &DomainName) -> StoreResult<()> {
        (**self).record_domain(identity, domain)
    }
}

impl<T: GroupMembership + ?Sized> GroupMembership for &T {
    fn groups_of(&self, identity: &Identity) -> StoreResult<Vec<String>> {
        (**self).groups_of(identity)
    }
}
