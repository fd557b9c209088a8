//! # Uncaught-error notification channel.
//!
//! [`UncaughtChannel`] models a process-wide listener list for errors nobody
//! awaited: listeners are attached and detached by identity, and every emitted
//! error is delivered to the listeners attached at that moment, in order.
//!
//! [`ErrorChannel`] is the in-process implementation. [`ErrorChannel::global`]
//! is the shared instance fed by the panic bridge
//! ([`forward_panics`](crate::uncaught::forward_panics)); private instances are
//! handy in tests and for code that reports errors explicitly.

use std::sync::{Arc, Mutex, OnceLock};

use crate::error::TestError;
use crate::sync::lock;

/// Listener callback; identity is the `Arc` allocation.
pub type Listener = Arc<dyn Fn(&TestError) + Send + Sync>;

/// Listener registry for uncaught errors.
pub trait UncaughtChannel: Send + Sync + 'static {
    /// Currently attached listeners, in attach order.
    fn listeners(&self) -> Vec<Listener>;

    /// Detaches every listener.
    fn remove_all_listeners(&self);

    /// Attaches `listener` at the end of the list.
    fn add_listener(&self, listener: Listener);

    /// Detaches the first occurrence of `listener` (by identity), if attached.
    fn remove_listener(&self, listener: &Listener);
}

/// In-process [`UncaughtChannel`] with explicit [`emit`](ErrorChannel::emit).
#[derive(Default)]
pub struct ErrorChannel {
    listeners: Mutex<Vec<Listener>>,
}

static GLOBAL: OnceLock<Arc<ErrorChannel>> = OnceLock::new();

impl ErrorChannel {
    /// Creates a channel with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide channel used by default runners and the panic bridge.
    pub fn global() -> Arc<ErrorChannel> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(ErrorChannel::new())))
    }

    /// Delivers `error` to every listener attached right now.
    ///
    /// Returns the number of listeners notified. Listeners run without the
    /// internal lock held, so they may attach or detach listeners.
    pub fn emit(&self, error: TestError) -> usize {
        let snapshot = self.listeners();
        for listener in &snapshot {
            listener(&error);
        }
        snapshot.len()
    }

    /// Returns `true` if at least one listener is attached.
    pub fn has_listeners(&self) -> bool {
        !lock(&self.listeners).is_empty()
    }
}

impl UncaughtChannel for ErrorChannel {
    fn listeners(&self) -> Vec<Listener> {
        lock(&self.listeners).clone()
    }

    fn remove_all_listeners(&self) {
        lock(&self.listeners).clear();
    }

    fn add_listener(&self, listener: Listener) {
        lock(&self.listeners).push(listener);
    }

    fn remove_listener(&self, listener: &Listener) {
        let mut listeners = lock(&self.listeners);
        if let Some(i) = listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
            listeners.remove(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collecting() -> (Arc<Mutex<Vec<TestError>>>, Listener) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener: Listener = Arc::new(move |e: &TestError| lock(&sink).push(e.clone()));
        (seen, listener)
    }

    #[test]
    fn test_emit_reaches_all_in_order() {
        let ch = ErrorChannel::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["a", "b"] {
            let order = Arc::clone(&order);
            ch.add_listener(Arc::new(move |_: &TestError| lock(&order).push(tag)));
        }

        assert_eq!(ch.emit(TestError::fail("x")), 2);
        assert_eq!(*lock(&order), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_listener_by_identity() {
        let ch = ErrorChannel::new();
        let (seen, listener) = collecting();
        let (_, other) = collecting();
        ch.add_listener(Arc::clone(&listener));
        ch.add_listener(Arc::clone(&other));

        ch.remove_listener(&listener);
        assert_eq!(ch.listeners().len(), 1);
        assert!(Arc::ptr_eq(&ch.listeners()[0], &other));

        ch.emit(TestError::fail("x"));
        assert!(lock(&seen).is_empty());
    }

    #[test]
    fn test_remove_unknown_listener_is_noop() {
        let ch = ErrorChannel::new();
        let (_, listener) = collecting();
        ch.remove_listener(&listener);
        assert!(!ch.has_listeners());
    }

    #[test]
    fn test_emit_without_listeners_is_dropped() {
        let ch = ErrorChannel::new();
        assert_eq!(ch.emit(TestError::fail("lost")), 0);
    }

    #[test]
    fn test_global_is_shared() {
        assert!(Arc::ptr_eq(&ErrorChannel::global(), &ErrorChannel::global()));
    }
}
