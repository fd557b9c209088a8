//! # Global error router.
//!
//! [`ErrorRouter`] takes exclusive ownership of an [`UncaughtChannel`] for the
//! duration of a run and forwards every notification to a single replaceable
//! handler.
//!
//! ```text
//! install(h):   saved = channel.listeners()      uninstall():  channel.remove(router)
//!               channel.remove_all()                           channel.add(saved...) in order
//!               channel.add(router)                            handler = None
//!               handler = h
//!
//! notification ──► router listener ──┬─ handler set ──► handler(err)
//!                                    └─ no handler  ──► dropped
//! ```
//!
//! ## Rules
//! - Install twice without uninstall is unsupported.
//! - `uninstall()` with nothing installed is a no-op.
//! - Dropping an installed router uninstalls it.

use std::mem;
use std::sync::{Arc, Mutex};

use crate::error::TestError;
use crate::sync::lock;
use crate::uncaught::{Listener, UncaughtChannel};

/// Recipient of routed uncaught errors.
pub type Handler = Arc<dyn Fn(&TestError) + Send + Sync>;

/// Multiplexes an uncaught-error channel onto one replaceable handler.
///
/// # Example
/// ```
/// use std::sync::{Arc, Mutex};
/// use testvisor::{ErrorChannel, ErrorRouter, TestError};
///
/// let channel = Arc::new(ErrorChannel::new());
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
///
/// let mut router = ErrorRouter::new(channel.clone());
/// router.install(Arc::new(move |e: &TestError| sink.lock().unwrap().push(e.clone())));
/// channel.emit(TestError::fail("error 1"));
/// router.uninstall();
/// channel.emit(TestError::fail("error 2"));
///
/// assert_eq!(*seen.lock().unwrap(), vec![TestError::fail("error 1")]);
/// ```
pub struct ErrorRouter {
    channel: Arc<dyn UncaughtChannel>,
    handler: Arc<Mutex<Option<Handler>>>,
    listener: Listener,
    saved: Vec<Listener>,
    installed: bool,
}

impl ErrorRouter {
    /// Creates a router over `channel`. Nothing is attached until [`install`](Self::install).
    pub fn new(channel: Arc<dyn UncaughtChannel>) -> Self {
        let handler: Arc<Mutex<Option<Handler>>> = Arc::new(Mutex::new(None));
        let current = Arc::clone(&handler);
        let listener: Listener = Arc::new(move |error: &TestError| {
            // Clone out so the handler runs without the slot locked.
            let handler = lock(&current).clone();
            if let Some(handler) = handler {
                handler(error);
            }
        });
        Self {
            channel,
            handler,
            listener,
            saved: Vec::new(),
            installed: false,
        }
    }

    /// Detaches every listener of the channel (remembering them) and becomes its
    /// sole listener, forwarding to `handler`.
    pub fn install(&mut self, handler: Handler) {
        self.saved = self.channel.listeners();
        self.channel.remove_all_listeners();
        self.set_handler(Some(handler));
        self.channel.add_listener(Arc::clone(&self.listener));
        self.installed = true;
    }

    /// Replaces the recipient for subsequent notifications; `None` drops them.
    pub fn set_handler(&self, handler: Option<Handler>) {
        *lock(&self.handler) = handler;
    }

    /// Detaches the router and re-attaches the listeners saved at install, in order.
    pub fn uninstall(&mut self) {
        self.channel.remove_listener(&self.listener);
        for listener in mem::take(&mut self.saved) {
            self.channel.add_listener(listener);
        }
        self.set_handler(None);
        self.installed = false;
    }

    /// Returns `true` between `install` and `uninstall`.
    #[inline]
    pub fn is_installed(&self) -> bool {
        self.installed
    }
}

impl Drop for ErrorRouter {
    fn drop(&mut self) {
        if self.installed {
            self.uninstall();
        }
    }
}
