//! Run context - cancellation and deadlines for one run
//!
//! External collaborators are blocking calls. The context is checked
//! before each of them; a cancelled or expired run stops at the next
//! checkpoint instead of carrying on with stale data.
//!
//! Directory calls run on a worker thread whenever a call limit or a run
//! deadline applies. The run stops waiting once the budget is spent and
//! the worker is left to finish on its own.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::domain::ports::{DirectoryError, DirectoryResult};
use crate::error::{LdapSyncError, LdapSyncResult};

#[derive(Debug, Clone)]
pub struct RunContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl RunContext {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// Share an existing flag (e.g. one flipped by a Ctrl+C handler)
    pub fn with_cancel_flag(flag: Arc<AtomicBool>) -> Self {
        Self {
            cancelled: flag,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fails once the run is cancelled or past its deadline
    pub fn checkpoint(&self) -> LdapSyncResult<()> {
        if self.is_cancelled() {
            return Err(LdapSyncError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(LdapSyncError::DeadlineExceeded);
            }
        }
        Ok(())
    }

    /// Run a directory call within `limit` and the run deadline.
    ///
    /// With neither set the call runs inline. Otherwise it runs on a
    /// worker thread; a call that has not answered once the budget is
    /// spent yields `TimedOut`, and a cancelled run yields `Cancelled`.
    pub fn timed_call<T, F>(&self, limit: Option<Duration>, call: F) -> DirectoryResult<T>
    where
        F: FnOnce() -> DirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let started = Instant::now();
        let Some(budget) = self.call_budget(limit, started) else {
            return call();
        };

        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("ldapsync-directory".to_string())
            .spawn(move || {
                let _ = tx.send(call());
            })
            .map_err(|e| DirectoryError::Unreachable(format!("cannot start directory call: {}", e)))?;

        loop {
            let elapsed = started.elapsed();
            if elapsed >= budget {
                return Err(DirectoryError::TimedOut {
                    elapsed_ms: elapsed.as_millis(),
                    limit_ms: budget.as_millis(),
                });
            }
            if self.is_cancelled() {
                return Err(DirectoryError::Cancelled);
            }
            match rx.recv_timeout((budget - elapsed).min(WAIT_SLICE)) {
                Ok(outcome) => return outcome,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(DirectoryError::Unreachable(
                        "directory call panicked".to_string(),
                    ))
                }
            }
        }
    }

    /// Smaller of `limit` and the time left before the run deadline
    fn call_budget(&self, limit: Option<Duration>, now: Instant) -> Option<Duration> {
        let until_deadline = self
            .deadline
            .map(|deadline| deadline.saturating_duration_since(now));
        match (limit, until_deadline) {
            (Some(limit), Some(left)) => Some(limit.min(left)),
            (limit, left) => limit.or(left),
        }
    }
}

/// Cancellation is noticed at least this often while a call is pending
const WAIT_SLICE: Duration = Duration::from_millis(50);

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
