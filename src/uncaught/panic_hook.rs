//! # Panic bridge.
//!
//! Turns panics raised by work a test started but did not await (typically a
//! `tokio::spawn`ed task) into [`TestError::Panicked`] emissions on
//! [`ErrorChannel::global`].
//!
//! ```text
//! panic!() ──► hook ──┬─ in-band poll of a test body ──► previous hook
//!                     │  (the execution catches it itself)
//!                     ├─ global channel has no listeners ──► previous hook
//!                     └─ otherwise ──► ErrorChannel::global().emit(Panicked)
//!                                        ├─ claimed by a live test ──► done
//!                                        └─ unclaimed ──► previous hook
//! ```
//!
//! "In-band" is tracked per thread by [`InBand`] guards that the execution holds
//! while calling or polling a test body. A listener claims an emission with
//! `claim()` while it runs inside `emit`, on the panicking thread.
//!
//! ## Limitations
//! The hook sees a panic, not who observes it. A panic in a spawned task whose
//! `JoinHandle` the test awaits (and whose `JoinError` it handles) is still
//! forwarded and fails the live test. Set
//! [`RunnerConfig::capture_panics`](crate::RunnerConfig::capture_panics) to `false`
//! for suites that rely on that pattern.

use std::cell::Cell;
use std::panic;
use std::sync::Once;

use super::channel::ErrorChannel;
use crate::error::TestError;

thread_local! {
    static IN_BAND_DEPTH: Cell<usize> = const { Cell::new(0) };
    static CLAIMED: Cell<bool> = const { Cell::new(false) };
}

static INSTALL: Once = Once::new();

/// Marks the current thread as running a test body in-band until dropped.
pub(crate) struct InBand {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl InBand {
    pub(crate) fn enter() -> Self {
        IN_BAND_DEPTH.with(|d| d.set(d.get() + 1));
        Self {
            _not_send: std::marker::PhantomData,
        }
    }
}

impl Drop for InBand {
    fn drop(&mut self) {
        IN_BAND_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

/// Returns `true` while the current thread is inside a test body's call or poll.
pub(crate) fn in_band() -> bool {
    IN_BAND_DEPTH.with(|d| d.get() > 0)
}

/// Marks the emission currently delivered on this thread as handled.
///
/// Called by the runner's dispatcher when a live test received the error.
pub(crate) fn claim() {
    CLAIMED.with(|c| c.set(true));
}

/// Returns whether the last emission on this thread was claimed, and resets it.
fn take_claim() -> bool {
    CLAIMED.with(|c| c.replace(false))
}

/// Installs the panic bridge. Idempotent; the first call wins for the process.
///
/// The hook that was active at first call keeps handling every panic the bridge
/// does not forward, and every forwarded panic no live test claimed (for example
/// one raised between tests or inside a logger).
///
/// The bridge cannot tell a detached task from one whose `JoinHandle` is awaited:
/// both are forwarded. See [`RunnerConfig::capture_panics`](crate::RunnerConfig::capture_panics).
pub fn forward_panics() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let channel = ErrorChannel::global();
            if in_band() || !channel.has_listeners() {
                previous(info);
                return;
            }
            take_claim();
            channel.emit(TestError::from_panic(info.payload()));
            if !take_claim() {
                previous(info);
            }
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_band_guard_nests() {
        assert!(!in_band());
        {
            let _outer = InBand::enter();
            {
                let _inner = InBand::enter();
                assert!(in_band());
            }
            assert!(in_band());
        }
        assert!(!in_band());
    }

    #[test]
    fn test_claim_is_taken_once() {
        assert!(!take_claim());
        claim();
        assert!(take_claim());
        assert!(!take_claim());
    }

    #[test]
    fn test_in_band_is_per_thread() {
        let _guard = InBand::enter();
        let other = std::thread::spawn(in_band).join().unwrap();
        assert!(!other);
    }
}
