//! # Manual (fake-clock) timer.
//!
//! [`ManualTimer`] never fires on its own. Tests drive it with
//! [`advance`](ManualTimer::advance) or [`fire`](ManualTimer::fire), and inspect
//! what the runner did through [`scheduled`](ManualTimer::scheduled) and
//! [`cancelled`](ManualTimer::cancelled).
//!
//! Every `cancel` call is recorded, including cancels of unknown or already fired
//! handles, so double disposal is observable.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use testvisor::{ManualTimer, Timer};
//!
//! let timer = ManualTimer::new();
//! let fired = Arc::new(AtomicBool::new(false));
//! let f = Arc::clone(&fired);
//! timer.schedule(Duration::from_millis(1000), Box::new(move || f.store(true, Ordering::SeqCst))).unwrap();
//!
//! assert_eq!(timer.advance(Duration::from_millis(999)), 0);
//! assert_eq!(timer.advance(Duration::from_millis(1)), 1);
//! assert!(fired.load(Ordering::SeqCst));
//! ```

use std::sync::Mutex;
use std::time::Duration;

use super::{TimeoutHandle, Timer, TimerCallback};
use crate::error::TimerError;
use crate::sync::lock;

struct Armed {
    handle: TimeoutHandle,
    due: Duration,
    callback: TimerCallback,
}

#[derive(Default)]
struct State {
    now: Duration,
    next_id: u64,
    armed: Vec<Armed>,
    scheduled: Vec<(TimeoutHandle, Duration)>,
    cancelled: Vec<TimeoutHandle>,
    fired: Vec<TimeoutHandle>,
}

/// Deterministic timer for tests.
#[derive(Default)]
pub struct ManualTimer {
    state: Mutex<State>,
}

impl ManualTimer {
    /// Creates a timer at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        lock(&self.state).now
    }

    /// Every `(handle, delay)` ever scheduled, in schedule order.
    pub fn scheduled(&self) -> Vec<(TimeoutHandle, Duration)> {
        lock(&self.state).scheduled.clone()
    }

    /// Every handle passed to `cancel`, in call order.
    pub fn cancelled(&self) -> Vec<TimeoutHandle> {
        lock(&self.state).cancelled.clone()
    }

    /// Every handle whose callback has run, in firing order.
    pub fn fired(&self) -> Vec<TimeoutHandle> {
        lock(&self.state).fired.clone()
    }

    /// Number of deadlines that have neither fired nor been canceled.
    pub fn pending(&self) -> usize {
        lock(&self.state).armed.len()
    }

    /// Moves virtual time forward by `by`, firing every deadline that comes due,
    /// earliest first (ties in schedule order). Returns how many fired.
    ///
    /// Callbacks run without the internal lock held, so they may schedule or
    /// cancel other deadlines.
    pub fn advance(&self, by: Duration) -> usize {
        let target = lock(&self.state).now.saturating_add(by);
        let mut count = 0;

        loop {
            let next = {
                let mut st = lock(&self.state);
                let due = st
                    .armed
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| a.due <= target)
                    .min_by_key(|(_, a)| a.due)
                    .map(|(i, _)| i);
                match due {
                    Some(i) => {
                        let armed = st.armed.remove(i);
                        st.now = st.now.max(armed.due);
                        st.fired.push(armed.handle);
                        Some(armed.callback)
                    }
                    None => {
                        st.now = target;
                        None
                    }
                }
            };
            match next {
                Some(callback) => {
                    callback();
                    count += 1;
                }
                None => break,
            }
        }
        count
    }

    /// Fires `handle` immediately regardless of its due time.
    ///
    /// Returns `false` if the handle is unknown, canceled, or already fired.
    pub fn fire(&self, handle: TimeoutHandle) -> bool {
        let callback = {
            let mut st = lock(&self.state);
            let Some(i) = st.armed.iter().position(|a| a.handle == handle) else {
                return false;
            };
            let armed = st.armed.remove(i);
            st.fired.push(armed.handle);
            armed.callback
        };
        callback();
        true
    }
}

impl Timer for ManualTimer {
    fn schedule(
        &self,
        delay: Duration,
        callback: TimerCallback,
    ) -> Result<TimeoutHandle, TimerError> {
        let mut st = lock(&self.state);
        st.next_id += 1;
        let handle = TimeoutHandle::from_raw(st.next_id);
        let due = st.now.saturating_add(delay);
        st.armed.push(Armed {
            handle,
            due,
            callback,
        });
        st.scheduled.push((handle, delay));
        Ok(handle)
    }

    fn cancel(&self, handle: TimeoutHandle) {
        let mut st = lock(&self.state);
        st.cancelled.push(handle);
        st.armed.retain(|a| a.handle != handle);
    }
}
