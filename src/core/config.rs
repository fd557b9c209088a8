//! # Runner configuration.
//!
//! Provides [`RunnerConfig`], the centralized settings of a [`Runner`](crate::Runner).
//!
//! ## Notes
//! - The deadline is one constant for every test; there is no per-test override.
//! - `bus_capacity = 0` is clamped to 1 by the bus.

use std::time::Duration;

/// Deadline applied to every test unless configured otherwise (1000 ms).
pub const DEFAULT_DEADLINE: Duration = Duration::from_millis(1000);

/// Global configuration for a test run.
///
/// ## Field semantics
/// - `deadline`: time a test body gets before it is reported as timed out
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
/// - `capture_panics`: install the panic bridge when the runner listens on the
///   process-wide [`ErrorChannel`](crate::ErrorChannel)
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Per-test deadline.
    ///
    /// When it elapses before the body settles, the test is reported as
    /// `FAIL: name (timed out)` and its body is dropped.
    pub deadline: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` events observe
    /// `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Route panics from work a test spawned but did not await to that test.
    ///
    /// Only effective for runners built without an explicit channel; a private
    /// channel never receives panics.
    ///
    /// The bridge sees every panic outside a test body's own poll, including one
    /// in a spawned task whose `JoinHandle` the test awaits. Suites that assert
    /// on such `JoinError`s should set this to `false`. The bridge is installed
    /// once per process, so the opt-out holds only while no other runner in the
    /// process has installed it.
    pub capture_panics: bool,
}

impl RunnerConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for RunnerConfig {
    /// Default configuration:
    ///
    /// - `deadline = 1000ms`
    /// - `bus_capacity = 1024`
    /// - `capture_panics = true`
    fn default() -> Self {
        Self {
            deadline: DEFAULT_DEADLINE,
            bus_capacity: 1024,
            capture_panics: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = RunnerConfig::default();
        assert_eq!(cfg.deadline, Duration::from_secs(1));
        assert!(cfg.capture_panics);
    }

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = RunnerConfig {
            bus_capacity: 0,
            ..RunnerConfig::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
