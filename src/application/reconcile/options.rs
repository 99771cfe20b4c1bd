//! Reconcile Options
//!
//! Per-run settings for the reconcile use case.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::ports::BlockDetails;
use crate::domain::services::PlanMode;

pub const DEFAULT_BLOCK_REASON: &str = "User is not in the directory";
pub const DEFAULT_BLOCK_TAG: &str = "ldap";
pub const DEFAULT_EXECUTOR: &str = "Maintenance script";

/// Which reconciliation mechanism runs. Chosen once, at composition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMechanism {
    /// Eligibility-based partition: add, enable and disable
    #[default]
    SyncAll,
    /// Only disable local accounts absent from every listing
    DisableOnly,
}

impl SyncMechanism {
    pub fn plan_mode(&self) -> PlanMode {
        match self {
            SyncMechanism::SyncAll => PlanMode::SyncAll,
            SyncMechanism::DisableOnly => PlanMode::DisableOnly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMechanism::SyncAll => "sync-all",
            SyncMechanism::DisableOnly => "disable-only",
        }
    }
}

impl std::str::FromStr for SyncMechanism {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sync-all" | "syncall" | "sync_all" => Ok(SyncMechanism::SyncAll),
            "disable-only" | "disableonly" | "disable_only" => Ok(SyncMechanism::DisableOnly),
            other => Err(format!("unknown sync mechanism '{}'", other)),
        }
    }
}

/// Options for the reconcile use case
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    pub mechanism: SyncMechanism,
    /// Abort the whole run when one domain cannot be listed.
    /// When false the failed domain is skipped and its accounts are left alone.
    pub abort_on_domain_error: bool,
    /// Plan and report, but do not mutate the store
    pub dry_run: bool,
    /// Also refresh the profile attributes of accounts kept this run.
    /// Their groups are resynced either way.
    pub enrich_all_active: bool,
    /// Directory calls still pending after this are abandoned as failures
    pub call_timeout: Option<Duration>,
    /// How disables are recorded
    pub block: BlockDetails,
    /// Content of the page published for new accounts
    pub user_page_content: Option<String>,
}

impl ReconcileOptions {
    pub fn new() -> Self {
        Self {
            mechanism: SyncMechanism::default(),
            abort_on_domain_error: true,
            dry_run: false,
            enrich_all_active: false,
            call_timeout: None,
            block: BlockDetails {
                reason: DEFAULT_BLOCK_REASON.to_string(),
                tags: vec![DEFAULT_BLOCK_TAG.to_string()],
                actor: DEFAULT_EXECUTOR.to_string(),
            },
            user_page_content: None,
        }
    }

    pub fn with_mechanism(mut self, mechanism: SyncMechanism) -> Self {
        self.mechanism = mechanism;
        self
    }

    pub fn with_abort_on_domain_error(mut self, abort: bool) -> Self {
        self.abort_on_domain_error = abort;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_enrich_all_active(mut self, enrich: bool) -> Self {
        self.enrich_all_active = enrich;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_block(mut self, block: BlockDetails) -> Self {
        self.block = block;
        self
    }

    pub fn with_user_page_content(mut self, content: Option<String>) -> Self {
        self.user_page_content = content;
        self
    }
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self::new()
    }
}
