//! Exclusion Policy
//!
//! Local accounts that must never be disabled, whatever the directory
//! says: excluded usernames, members of excluded groups, and accounts
//! that are already disabled (nothing to do).
//!
//! A policy instance lives for one run. Group memberships are looked up
//! lazily, at most once per local account, and cached for the rest of
//! the run.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::entities::Identity;
use crate::domain::ports::{GroupMembership, StoreResult};
use crate::domain::value_objects::Username;

/// Configured exclusion lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRules {
    #[serde(default)]
    pub usernames: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl ExclusionRules {
    pub fn new(usernames: Vec<String>, groups: Vec<String>) -> Self {
        Self { usernames, groups }
    }

    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty() && self.groups.is_empty()
    }
}

/// Why a disable was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    AlreadyDisabled,
    ExcludedUsername,
    ExcludedGroup(String),
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExclusionReason::AlreadyDisabled => write!(f, "already disabled"),
            ExclusionReason::ExcludedUsername => write!(f, "excluded by username"),
            ExclusionReason::ExcludedGroup(group) => {
                write!(f, "member of excluded group '{}'", group)
            }
        }
    }
}

pub struct ExclusionPolicy {
    usernames: BTreeSet<Username>,
    groups: Vec<String>,
    group_cache: RefCell<HashMap<u64, Vec<String>>>,
}

impl ExclusionPolicy {
    pub fn new(rules: &ExclusionRules) -> Self {
        Self {
            usernames: rules
                .usernames
                .iter()
                .filter_map(|name| Username::canonicalize(name))
                .collect(),
            groups: rules.groups.clone(),
            group_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn is_excluded_username(&self, username: &Username) -> bool {
        self.usernames.contains(username)
    }

    /// Evaluate the policy for one disable candidate.
    ///
    /// Returns `Ok(None)` when the account may be disabled. A failed group
    /// lookup is returned as an error; callers must not disable then.
    pub fn is_excluded<G>(
        &self,
        identity: &Identity,
        memberships: &G,
    ) -> StoreResult<Option<ExclusionReason>>
    where
        G: GroupMembership + ?Sized,
    {
        if identity.disabled {
            return Ok(Some(ExclusionReason::AlreadyDisabled));
        }
        if self.is_excluded_username(&identity.username) {
            return Ok(Some(ExclusionReason::ExcludedUsername));
        }
        if self.groups.is_empty() {
            return Ok(None);
        }

        let Some(local_id) = identity.local_id else {
            return Ok(None);
        };

        if !self.group_cache.borrow().contains_key(&local_id) {
            let groups = memberships.groups_of(identity)?;
            self.group_cache.borrow_mut().insert(local_id, groups);
        }

        let cache = self.group_cache.borrow();
        let member_of = cache.get(&local_id).map(Vec::as_slice).unwrap_or(&[]);
        Ok(self
            .groups
            .iter()
            .find(|excluded| member_of.contains(excluded))
            .map(|group| ExclusionReason::ExcludedGroup(group.clone())))
    }

    /// Number of accounts whose groups were looked up this run
    pub fn cached_lookups(&self) -> usize {
        self.group_cache.borrow().len()
    }
}
