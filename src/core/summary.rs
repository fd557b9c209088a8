//! # Run summary.
//!
//! [`RunSummary`] is what [`Runner::run`](crate::Runner::run) resolves to once every
//! test has been logged: per-test reports in registration order plus counters.

use std::sync::Arc;

use super::execution::Outcome;

/// Outcome of one registered test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReport {
    /// Registered test name.
    pub name: Arc<str>,
    /// How the test resolved.
    pub outcome: Outcome,
}

/// Totals of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tests that passed.
    pub passed: usize,
    /// Tests that failed in-band or through an uncaught error.
    pub failed: usize,
    /// Tests whose deadline fired.
    pub timed_out: usize,
    /// Per-test reports, in registration order.
    pub reports: Vec<TestReport>,
}

impl RunSummary {
    /// Number of executed tests.
    #[inline]
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    /// Returns `true` if every test passed (vacuously true for an empty run).
    #[inline]
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.timed_out == 0
    }

    pub(crate) fn record(&mut self, name: Arc<str>, outcome: Outcome) {
        match outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Failed(_) => self.failed += 1,
            Outcome::TimedOut => self.timed_out += 1,
        }
        self.reports.push(TestReport { name, outcome });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TestError;

    #[test]
    fn test_record_counts() {
        let mut summary = RunSummary::default();
        summary.record(Arc::from("a"), Outcome::Passed);
        summary.record(Arc::from("b"), Outcome::Failed(TestError::fail("x")));
        summary.record(Arc::from("c"), Outcome::TimedOut);

        assert_eq!((summary.passed, summary.failed, summary.timed_out), (1, 1, 1));
        assert_eq!(summary.total(), 3);
        assert!(!summary.is_success());
        assert_eq!(&*summary.reports[2].name, "c");
    }

    #[test]
    fn test_empty_run_is_success() {
        assert!(RunSummary::default().is_success());
    }
}
