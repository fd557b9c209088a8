//! Poison-tolerant locking for the synchronous collaborator state.
//!
//! Listener lists, timer tables and recorders are touched from panic hooks and
//! timer callbacks; a panic while one of them is locked must not wedge the run.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `m`, recovering the guard if a previous holder panicked.
#[inline]
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
