//! Status events and the sink that receives them
//!
//! The core never renders anything itself. It pushes [`StatusEvent`]s, in the
//! order they happen, into a [`ReportSink`] supplied by the caller.

use super::controller::RunResult;
use std::sync::{Mutex, MutexGuard};

/// Something the audit wants the operator to see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// Low-level trace of a login attempt
    Debug(String),
    /// A credential was accepted
    Success {
        username: String,
        password: String,
        simulated: bool,
    },
    /// A credential was refused
    Failed {
        username: String,
        password: String,
        reason: String,
    },
    /// The server answered with a retryable error
    TempError { code: u16, reason: String },
    /// Connect or reply timed out
    Timeout { attempt: u32, max_attempts: u32 },
    /// The target could not be reached
    ConnectionFailure { target: String, reason: String },
    Warning(String),
    Info(String),
    Error(String),
    /// Brute-force progress; `index` is zero-based
    ProgressTick {
        index: usize,
        total: usize,
        current: String,
    },
    /// Final verdict of a run, emitted exactly once
    Finished { result: RunResult },
}

/// Receiver for status events
pub trait ReportSink: Send + Sync {
    fn emit(&self, event: StatusEvent);
}

/// Sink that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn emit(&self, _event: StatusEvent) {}
}

/// Sink that keeps every event in memory, in order
///
/// Used by tests and by embedders that render the run after the fact.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<StatusEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StatusEvent>> {
        // A poisoned sink still holds a valid event list
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Snapshot of all events so far
    pub fn events(&self) -> Vec<StatusEvent> {
        self.lock().clone()
    }

    /// Number of events matching a predicate
    pub fn count(&self, predicate: impl Fn(&StatusEvent) -> bool) -> usize {
        self.lock().iter().filter(|e| predicate(e)).count()
    }
}

impl ReportSink for CollectingSink {
    fn emit(&self, event: StatusEvent) {
        self.lock().push(event);
    }
}
