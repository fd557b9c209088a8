//! # Runtime events emitted by the runner and its executions.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Run events**: the run as a whole (starting, finished)
//! - **Test lifecycle events**: one test execution (starting, passed, failed, timeout)
//! - **Routing events**: uncaught errors delivered to, or dropped before, a live test
//!
//! The [`Event`] struct carries additional metadata such as timestamps, test name,
//! registry index and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use testvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TestFailed)
//!     .with_test("parses header")
//!     .with_reason("test failed: bad magic")
//!     .with_index(3)
//!     .with_timeout(Duration::from_secs(1));
//!
//! assert_eq!(ev.kind, EventKind::TestFailed);
//! assert_eq!(ev.test.as_deref(), Some("parses header"));
//! assert_eq!(ev.index, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Run events ===
    /// Run is starting; the error router has just been installed.
    ///
    /// Sets:
    /// - `index`: number of registered tests
    RunStarting,

    /// Every registered test has been logged; the router is uninstalled.
    ///
    /// Sets:
    /// - `index`: number of executed tests
    RunFinished,

    // === Test lifecycle events ===
    /// Test became the live target and its body is about to start.
    ///
    /// Sets:
    /// - `test`: test name
    /// - `index`: position in the registry (0-based)
    /// - `timeout_ms`: deadline for this test (ms)
    TestStarting,

    /// Test resolved as passed.
    ///
    /// Sets:
    /// - `test`: test name
    /// - `index`: position in the registry
    TestPassed,

    /// Test resolved as failed (in-band or via an uncaught error).
    ///
    /// Sets:
    /// - `test`: test name
    /// - `index`: position in the registry
    /// - `reason`: failure cause
    TestFailed,

    /// Test deadline fired before the body settled.
    ///
    /// Sets:
    /// - `test`: test name
    /// - `index`: position in the registry
    /// - `timeout_ms`: the deadline that was exceeded (ms)
    TimeoutHit,

    // === Routing events ===
    /// Uncaught error delivered to the live test.
    ///
    /// Sets:
    /// - `test`: live test name
    /// - `index`: position in the registry
    /// - `reason`: the routed error
    UncaughtRouted,

    /// Uncaught error arrived while no test was live and was dropped.
    ///
    /// Sets:
    /// - `reason`: the dropped error
    UncaughtDropped,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Deadline in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Human-readable reason (failure causes, dropped errors).
    pub reason: Option<Arc<str>>,
    /// Registry index, or a test count for run events.
    pub index: Option<u32>,
    /// Name of the test, if applicable.
    pub test: Option<Arc<str>>,
    /// Event classification.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind,
            at: SystemTime::now(),
            timeout_ms: None,
            reason: None,
            index: None,
            test: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a test name.
    #[inline]
    pub fn with_test(mut self, test: impl Into<Arc<str>>) -> Self {
        self.test = Some(test.into());
        self
    }

    /// Attaches a deadline (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Attaches a registry index (saturates at `u32::MAX`).
    #[inline]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(u32::try_from(index).unwrap_or(u32::MAX));
        self
    }

    /// Returns `true` for the terminal event of one test
    /// (`TestPassed`, `TestFailed` or `TimeoutHit`).
    #[inline]
    pub fn is_test_outcome(&self) -> bool {
        matches!(
            self.kind,
            EventKind::TestPassed | EventKind::TestFailed | EventKind::TimeoutHit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::RunStarting);
        let b = Event::new(EventKind::RunFinished);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_timeout_saturates() {
        let ev = Event::new(EventKind::TimeoutHit).with_timeout(Duration::from_secs(u64::MAX));
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }

    #[test]
    fn test_outcome_kinds() {
        assert!(Event::new(EventKind::TimeoutHit).is_test_outcome());
        assert!(Event::new(EventKind::TestPassed).is_test_outcome());
        assert!(!Event::new(EventKind::UncaughtRouted).is_test_outcome());
    }
}
