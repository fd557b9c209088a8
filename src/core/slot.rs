//! # Live-target slot.
//!
//! Single-slot reference to the execution that currently receives uncaught
//! errors. The runner arms it before a test body starts and the execution
//! retires it as soon as its race resolves.
//!
//! ```text
//! uncaught error ──► router ──► dispatcher ──► LiveSlot::route()
//!                                                ├─ armed  ──► mpsc ──► execution
//!                                                └─ empty  ──► dropped
//! ```

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::error::TestError;
use crate::sync::lock;

/// The execution currently eligible for routed errors.
pub(crate) struct LiveTarget {
    pub(crate) name: Arc<str>,
    pub(crate) index: usize,
    pub(crate) tx: mpsc::UnboundedSender<TestError>,
}

/// Shared slot holding at most one [`LiveTarget`].
#[derive(Clone, Default)]
pub(crate) struct LiveSlot {
    inner: Arc<Mutex<Option<LiveTarget>>>,
}

impl LiveSlot {
    /// Makes `target` the live target, replacing any previous one.
    pub(crate) fn arm(&self, target: LiveTarget) {
        *lock(&self.inner) = Some(target);
    }

    /// Clears the slot; subsequent errors are dropped until the next `arm`.
    pub(crate) fn retire(&self) {
        *lock(&self.inner) = None;
    }

    /// Forwards `error` to the live target.
    ///
    /// Returns the receiving test's name and index, or `None` if the error was dropped.
    pub(crate) fn route(&self, error: &TestError) -> Option<(Arc<str>, usize)> {
        let slot = lock(&self.inner);
        let target = slot.as_ref()?;
        target
            .tx
            .send(error.clone())
            .ok()
            .map(|()| (Arc::clone(&target.name), target.index))
    }

    #[cfg(test)]
    pub(crate) fn is_armed(&self) -> bool {
        lock(&self.inner).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_to_armed_target() {
        let slot = LiveSlot::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        slot.arm(LiveTarget {
            name: Arc::from("t"),
            index: 2,
            tx,
        });

        let routed = slot.route(&TestError::fail("g")).unwrap();
        assert_eq!((&*routed.0, routed.1), ("t", 2));
        assert_eq!(rx.try_recv().unwrap(), TestError::fail("g"));
    }

    #[test]
    fn test_route_to_empty_slot_drops() {
        let slot = LiveSlot::default();
        assert!(slot.route(&TestError::fail("g")).is_none());
    }

    #[test]
    fn test_retire_stops_routing() {
        let slot = LiveSlot::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        slot.arm(LiveTarget {
            name: Arc::from("t"),
            index: 0,
            tx,
        });
        slot.retire();

        assert!(!slot.is_armed());
        assert!(slot.route(&TestError::fail("late")).is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_receiver_counts_as_dropped() {
        let slot = LiveSlot::default();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        slot.arm(LiveTarget {
            name: Arc::from("t"),
            index: 0,
            tx,
        });
        assert!(slot.route(&TestError::fail("g")).is_none());
    }
}
