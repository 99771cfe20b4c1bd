//! Sync Result
//!
//! Outcome of one reconciliation run. Only the reconcile use case
//! mutates it; callers get it back by value and read it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::{ActionKind, DomainName, Username};

/// A per-account failure that did not stop the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountError {
    pub username: Username,
    /// Mutation that failed; `None` for lookups (eligibility, groups)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionKind>,
    pub message: String,
}

/// An action the run performed, or would perform in a dry run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedChange {
    pub username: Username,
    pub action: ActionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainName>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
    added_count: usize,
    added_fail_count: usize,
    enabled_count: usize,
    disabled_count: usize,
    disabled_fail_count: usize,
    excluded_count: usize,
    dry_run: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed_domains: Vec<DomainName>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    changes: Vec<PlannedChange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<AccountError>,
    started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

impl SyncResult {
    pub fn new() -> Self {
        Self {
            ok: true,
            error_message: None,
            added_count: 0,
            added_fail_count: 0,
            enabled_count: 0,
            disabled_count: 0,
            disabled_fail_count: 0,
            excluded_count: 0,
            dry_run: false,
            failed_domains: Vec::new(),
            changes: Vec::new(),
            errors: Vec::new(),
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// True unless a fatal error aborted the run
    pub fn ok(&self) -> bool {
        self.ok
    }

    /// Present iff `ok()` is false
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn added_count(&self) -> usize {
        self.added_count
    }

    pub fn added_fail_count(&self) -> usize {
        self.added_fail_count
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled_count
    }

    pub fn disabled_count(&self) -> usize {
        self.disabled_count
    }

    pub fn disabled_fail_count(&self) -> usize {
        self.disabled_fail_count
    }

    /// Disables skipped by the exclusion policy (not a mutation attempt)
    pub fn excluded_count(&self) -> usize {
        self.excluded_count
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn failed_domains(&self) -> &[DomainName] {
        &self.failed_domains
    }

    /// Changes performed, or only planned in a dry run, in execution order
    pub fn changes(&self) -> &[PlannedChange] {
        &self.changes
    }

    pub fn errors(&self) -> &[AccountError] {
        &self.errors
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Number of mutation attempts made in this run
    pub fn attempts(&self) -> usize {
        self.added_count
            + self.added_fail_count
            + self.enabled_count
            + self.disabled_count
            + self.disabled_fail_count
    }

    pub fn has_failures(&self) -> bool {
        self.added_fail_count > 0 || self.disabled_fail_count > 0 || !self.errors.is_empty()
    }

    pub fn has_changes(&self) -> bool {
        self.added_count > 0 || self.enabled_count > 0 || self.disabled_count > 0
    }

    pub(crate) fn set_dry_run(&mut self, dry_run: bool) {
        self.dry_run = dry_run;
    }

    pub(crate) fn record_added(&mut self, username: &Username, domain: &DomainName) {
        self.added_count += 1;
        self.push_change(username, ActionKind::Add, Some(domain));
    }

    pub(crate) fn record_enabled(&mut self, username: &Username, domain: &DomainName) {
        self.enabled_count += 1;
        self.push_change(username, ActionKind::Enable, Some(domain));
    }

    pub(crate) fn record_disabled(&mut self, username: &Username) {
        self.disabled_count += 1;
        self.push_change(username, ActionKind::Disable, None);
    }

    /// Failed create or re-enable
    pub(crate) fn record_add_failure(
        &mut self,
        username: &Username,
        action: ActionKind,
        message: impl Into<String>,
    ) {
        self.added_fail_count += 1;
        self.push_error(username, Some(action), message);
    }

    pub(crate) fn record_disable_failure(&mut self, username: &Username, message: impl Into<String>) {
        self.disabled_fail_count += 1;
        self.push_error(username, Some(ActionKind::Disable), message);
    }

    pub(crate) fn record_excluded(&mut self) {
        self.excluded_count += 1;
    }

    /// Non-counted failure (lookup errors)
    pub(crate) fn record_account_error(&mut self, username: &Username, message: impl Into<String>) {
        self.push_error(username, None, message);
    }

    pub(crate) fn record_planned(
        &mut self,
        username: &Username,
        action: ActionKind,
        domain: Option<&DomainName>,
    ) {
        self.push_change(username, action, domain);
    }

    pub(crate) fn record_failed_domain(&mut self, domain: &DomainName) {
        if !self.failed_domains.contains(domain) {
            self.failed_domains.push(domain.clone());
        }
    }

    /// Abort: counters are no longer trusted and are cleared
    pub(crate) fn mark_fatal(&mut self, message: impl Into<String>) {
        self.ok = false;
        self.error_message = Some(message.into());
        self.added_count = 0;
        self.added_fail_count = 0;
        self.enabled_count = 0;
        self.disabled_count = 0;
        self.disabled_fail_count = 0;
        self.excluded_count = 0;
    }

    pub(crate) fn finish(mut self) -> Self {
        self.completed_at = Some(Utc::now());
        self
    }

    fn push_change(&mut self, username: &Username, action: ActionKind, domain: Option<&DomainName>) {
        self.changes.push(PlannedChange {
            username: username.clone(),
            action,
            domain: domain.cloned(),
        });
    }

    fn push_error(&mut self, username: &Username, action: Option<ActionKind>, message: impl Into<String>) {
        self.errors.push(AccountError {
            username: username.clone(),
            action,
            message: message.into(),
        });
    }
}

impl Default for SyncResult {
    fn default() -> Self {
        Self::new()
    }
}
