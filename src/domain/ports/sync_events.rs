//! Sync Event Port
//!
//! Provides an observable interface for reconciliation runs.
//! Enables progress reporting, JSON event streams, and auditing.

use crate::domain::value_objects::{ActionKind, DomainName, Username};

/// Event emitted during a reconciliation run
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// Run started
    Started {
        domains: Vec<DomainName>,
        mechanism: String,
        dry_run: bool,
    },

    /// Directory listing obtained for one domain
    DomainListed { domain: DomainName, count: usize },

    /// Directory listing failed for one domain
    DomainFailed { domain: DomainName, error: String },

    /// Local account created
    UserAdded {
        username: Username,
        domain: DomainName,
    },

    /// Disabled local account re-enabled
    UserEnabled {
        username: Username,
        domain: DomainName,
    },

    /// Local account disabled
    UserDisabled { username: Username },

    /// Disable skipped by exclusion policy
    UserExcluded { username: Username, reason: String },

    /// Dry run: action that would have been performed
    ActionPlanned {
        username: Username,
        action: ActionKind,
    },

    /// Mutation attempt failed
    ActionFailed {
        username: Username,
        action: ActionKind,
        error: String,
    },

    /// Run finished (also emitted for fatal outcomes)
    Completed {
        ok: bool,
        added: usize,
        added_failed: usize,
        enabled: usize,
        disabled: usize,
        disabled_failed: usize,
    },
}

/// Trait for receiving sync events
///
/// Implementations can be:
/// - JsonEventSink: NDJSON event stream for schedulers
/// - NoopEventSink: Silent operation
pub trait SyncEventSink: Send + Sync {
    /// Handle a sync event
    fn on_event(&self, event: SyncEvent);

    /// Check if this sink wants per-account events
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl SyncEventSink for NoopEventSink {
    fn on_event(&self, _event: SyncEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
