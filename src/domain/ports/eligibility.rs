//! EligibilityChecker port
//!
//! Decides whether directory-side policy (e.g. required group
//! membership) allows a username to hold an active local account.
//! The reconciler treats the answer as a black box.

use crate::domain::entities::DomainConfig;
use crate::domain::value_objects::Username;

use super::directory_lister::DirectoryResult;

pub trait EligibilityChecker {
    /// True when every requirement of `domain` is satisfied by `username`
    fn is_eligible(&self, username: &Username, domain: &DomainConfig) -> DirectoryResult<bool>;
}

impl<T: EligibilityChecker + ?Sized> EligibilityChecker for &T {
    fn is_eligible(&self, username: &Username, domain: &DomainConfig) -> DirectoryResult<bool> {
        (**self).is_eligible(username, domain)
    }
}

/// Treats every listed directory user as eligible
pub struct AllEligible;

impl EligibilityChecker for AllEligible {
    fn is_eligible(&self, _username: &Username, _domain: &DomainConfig) -> DirectoryResult<bool> {
        Ok(true)
    }
}
