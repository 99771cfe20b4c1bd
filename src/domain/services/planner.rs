//! Reconciliation planning service
//!
//! Pure domain logic: the two-set diff between the merged directory
//! listing and the local accounts. No I/O happens here; exclusion is
//! evaluated later, right before each disable.

use std::collections::BTreeMap;

use crate::domain::entities::{DirectoryListing, Identity};
use crate::domain::value_objects::{DomainName, Username};

/// Outcome of the eligibility check for one directory user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Ineligible,
    /// Check failed; the account is left untouched this run
    Unknown,
}

/// Which diff to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanMode {
    /// Eligibility partition: add / enable eligible users, disable the rest
    #[default]
    SyncAll,
    /// Disable local users missing from every listing; nothing is added
    DisableOnly,
}

/// Why a local account was kept out of the disable list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionReason {
    /// Its domain (or an unknown domain) failed to list this run
    DomainUnavailable,
    /// The eligibility check errored
    EligibilityUnknown,
}

/// A directory user paired with the domain that owns it
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedAccount {
    pub identity: Identity,
    pub domain: DomainName,
}

#[derive(Debug, Clone, Default)]
pub struct ReconcilePlan {
    /// Local accounts to disable (exclusion still pending)
    pub disable: Vec<Identity>,
    /// Eligible directory users with no local account
    pub add: Vec<PlannedAccount>,
    /// Eligible directory users whose local account is disabled
    pub enable: Vec<PlannedAccount>,
    /// Eligible directory users already active locally
    pub keep: Vec<PlannedAccount>,
    pub protected: Vec<(Username, ProtectionReason)>,
}

impl ReconcilePlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.disable.is_empty() && self.add.is_empty() && self.enable.is_empty()
    }

    /// Number of mutations the plan asks for
    pub fn action_count(&self) -> usize {
        self.disable.len() + self.add.len() + self.enable.len()
    }
}

/// Sync planner - computes what to do without doing it
pub struct Planner;

impl Planner {
    pub fn plan(
        mode: PlanMode,
        listing: &DirectoryListing,
        eligibility: &BTreeMap<Username, Eligibility>,
        local: &BTreeMap<Username, Identity>,
    ) -> ReconcilePlan {
        let mut plan = ReconcilePlan::new();

        for (username, identity) in local {
            if listing.contains(username) {
                let keep_listed = match mode {
                    PlanMode::DisableOnly => true,
                    PlanMode::SyncAll => match eligibility.get(username) {
                        Some(Eligibility::Eligible) => true,
                        Some(Eligibility::Unknown) => {
                            plan.protected
                                .push((username.clone(), ProtectionReason::EligibilityUnknown));
                            true
                        }
                        Some(Eligibility::Ineligible) | None => false,
                    },
                };
                if keep_listed {
                    continue;
                }
            } else if Self::owned_by_failed_domain(listing, identity) {
                plan.protected
                    .push((username.clone(), ProtectionReason::DomainUnavailable));
                continue;
            }

            if !identity.disabled {
                plan.disable.push(identity.clone());
            }
        }

        if mode == PlanMode::DisableOnly {
            return plan;
        }

        for (username, domain) in listing.entries() {
            if eligibility.get(username) != Some(&Eligibility::Eligible) {
                continue;
            }
            match local.get(username) {
                Some(identity) => {
                    let planned = PlannedAccount {
                        identity: identity.clone(),
                        domain: domain.clone(),
                    };
                    if identity.disabled {
                        plan.enable.push(planned);
                    } else {
                        plan.keep.push(planned);
                    }
                }
                None => plan.add.push(PlannedAccount {
                    identity: Identity::from_directory(username.clone(), domain.clone()),
                    domain: domain.clone(),
                }),
            }
        }

        plan
    }

    /// A local account missing from the listing may still belong to a
    /// domain whose listing failed. Unknown ownership counts as "maybe".
    fn owned_by_failed_domain(listing: &DirectoryListing, identity: &Identity) -> bool {
        if !listing.has_failures() {
            return false;
        }
        match &identity.domain {
            Some(domain) => listing.is_failed(domain),
            None => true,
        }
    }
}
