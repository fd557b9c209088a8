//! # Deadline timer collaborators.
//!
//! The execution of every test schedules exactly one deadline through a [`Timer`].
//! Each returned [`TimeoutHandle`] is either canceled exactly once (the body settled
//! first) or allowed to fire exactly once (the test timed out), never both.
//!
//! - [`TokioTimer`]: default, backed by `tokio::time::sleep` + `CancellationToken`.
//! - [`ManualTimer`]: deterministic fake clock that records schedules and cancels.

mod manual;
mod tokio_timer;

use std::time::Duration;

use crate::error::TimerError;

pub use manual::ManualTimer;
pub use tokio_timer::TokioTimer;

/// Callback run when a deadline fires.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Opaque token identifying one scheduled deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeoutHandle(u64);

impl TimeoutHandle {
    /// Wraps a raw timer-specific id.
    #[inline]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw timer-specific id.
    #[inline]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// Timer primitives used to enforce test deadlines.
pub trait Timer: Send + Sync + 'static {
    /// Schedules `callback` to run once after `delay`.
    fn schedule(&self, delay: Duration, callback: TimerCallback)
    -> Result<TimeoutHandle, TimerError>;

    /// Cancels a pending deadline. The callback of a canceled handle never runs.
    fn cancel(&self, handle: TimeoutHandle);
}
