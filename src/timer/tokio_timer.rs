//! # Tokio-backed deadline timer.
//!
//! Every scheduled deadline is a spawned task racing `tokio::time::sleep` against a
//! per-handle [`CancellationToken`]:
//!
//! ```text
//! schedule(delay, cb) ──► pending[id] = token ──► spawn {
//!                                                   select! {
//!                                                     token.cancelled() → exit quietly
//!                                                     sleep(delay)      → pending.remove(id); cb()
//!                                                   }
//!                                                 }
//! cancel(id) ──► pending.remove(id)?.cancel()
//! ```
//!
//! A handle is removed from `pending` by whichever side gets there first, so a
//! fired deadline cannot be canceled afterwards and vice versa.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::{runtime::Handle, select, time};
use tokio_util::sync::CancellationToken;

use super::{TimeoutHandle, Timer, TimerCallback};
use crate::error::TimerError;
use crate::sync::lock;

/// Default timer: one cancellable sleeping task per deadline.
#[derive(Default)]
pub struct TokioTimer {
    next_id: AtomicU64,
    pending: Arc<Mutex<HashMap<TimeoutHandle, CancellationToken>>>,
}

impl TokioTimer {
    /// Creates a timer with no pending deadlines.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of deadlines that have neither fired nor been canceled.
    pub fn pending(&self) -> usize {
        lock(&self.pending).len()
    }
}

impl Timer for TokioTimer {
    fn schedule(
        &self,
        delay: Duration,
        callback: TimerCallback,
    ) -> Result<TimeoutHandle, TimerError> {
        let rt = Handle::try_current().map_err(|_| TimerError::NoRuntime)?;
        let handle = TimeoutHandle::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));
        let token = CancellationToken::new();
        lock(&self.pending).insert(handle, token.clone());

        let pending = Arc::clone(&self.pending);
        rt.spawn(async move {
            select! {
                biased;
                _ = token.cancelled() => {}
                _ = time::sleep(delay) => {
                    let still_armed = lock(&pending).remove(&handle).is_some();
                    if still_armed {
                        callback();
                    }
                }
            }
        });
        Ok(handle)
    }

    fn cancel(&self, handle: TimeoutHandle) {
        if let Some(token) = lock(&self.pending).remove(&handle) {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    fn flag() -> (Arc<AtomicBool>, TimerCallback) {
        let fired = Arc::new(AtomicBool::new(false));
        let f = Arc::clone(&fired);
        (fired, Box::new(move || f.store(true, Ordering::SeqCst)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let timer = TokioTimer::new();
        let (fired, cb) = flag();
        timer.schedule(Duration::from_millis(1000), cb).unwrap();

        time::sleep(Duration::from_millis(999)).await;
        assert!(!fired.load(Ordering::SeqCst));

        time::sleep(Duration::from_millis(2)).await;
        assert!(fired.load(Ordering::SeqCst));
        assert_eq!(timer.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_callback() {
        let timer = TokioTimer::new();
        let (fired, cb) = flag();
        let handle = timer.schedule(Duration::from_millis(1000), cb).unwrap();
        timer.cancel(handle);
        assert_eq!(timer.pending(), 0);

        time::sleep(Duration::from_secs(5)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_fire_is_noop() {
        let timer = TokioTimer::new();
        let (fired, cb) = flag();
        let handle = timer.schedule(Duration::from_millis(10), cb).unwrap();
        time::sleep(Duration::from_millis(20)).await;
        assert!(fired.load(Ordering::SeqCst));

        timer.cancel(handle);
        assert_eq!(timer.pending(), 0);
    }

    #[test]
    fn test_schedule_outside_runtime_fails() {
        let timer = TokioTimer::new();
        let err = timer
            .schedule(Duration::from_millis(1), Box::new(|| {}))
            .unwrap_err();
        assert_eq!(err, TimerError::NoRuntime);
    }
}
