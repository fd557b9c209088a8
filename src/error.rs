//! Error types used by the testvisor runtime and by tests.
//!
//! This module defines three enums:
//!
//! - [`TestError`]: the failure cause of a single test (in-band or uncaught).
//! - [`TimerError`]: failures of the deadline timer collaborator.
//! - [`RunError`]: errors raised by [`Runner::run`](crate::Runner::run) itself.
//!
//! Test failures never surface as [`RunError`]: they are absorbed and reported
//! through the [`Logger`](crate::Logger). Only a broken harness (timer) fails a run.

use thiserror::Error;

/// # Failure cause of a single test.
///
/// This is the raw value handed to [`Logger::error`](crate::Logger::error), both for
/// in-band failures (returned `Err`, panics while polled) and for uncaught errors
/// routed through an [`UncaughtChannel`](crate::UncaughtChannel).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TestError {
    /// The test (or work it started) reported a failure.
    #[error("test failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The test (or work it started) panicked.
    #[error("panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
}

impl TestError {
    /// Shorthand for [`TestError::Fail`].
    ///
    /// # Example
    /// ```
    /// use testvisor::TestError;
    ///
    /// let err = TestError::fail("nope");
    /// assert_eq!(err.to_string(), "test failed: nope");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        TestError::Fail {
            error: error.into(),
        }
    }

    /// Shorthand for [`TestError::Panicked`].
    pub fn panicked(message: impl Into<String>) -> Self {
        TestError::Panicked {
            message: message.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/events.
    ///
    /// # Example
    /// ```
    /// use testvisor::TestError;
    ///
    /// assert_eq!(TestError::fail("x").as_label(), "test_failed");
    /// assert_eq!(TestError::panicked("x").as_label(), "test_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TestError::Fail { .. } => "test_failed",
            TestError::Panicked { .. } => "test_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TestError::Fail { error } => format!("error: {error}"),
            TestError::Panicked { message } => format!("panic: {message}"),
        }
    }

    /// Renders a panic payload (`&'static str`, `String`, or anything else).
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        TestError::Panicked { message }
    }
}

impl From<&str> for TestError {
    fn from(error: &str) -> Self {
        TestError::fail(error)
    }
}

impl From<String> for TestError {
    fn from(error: String) -> Self {
        TestError::Fail { error }
    }
}

/// # Errors produced by a [`Timer`](crate::Timer) collaborator.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A deadline was requested outside of a tokio runtime.
    #[error("no tokio runtime available to schedule a deadline")]
    NoRuntime,
}

impl TimerError {
    /// Returns a short stable label (snake_case) for use in logs/events.
    pub fn as_label(&self) -> &'static str {
        match self {
            TimerError::NoRuntime => "timer_no_runtime",
        }
    }
}

/// # Errors produced by a test run.
///
/// These represent failures of the harness itself, never of a test.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RunError {
    /// The timer collaborator could not schedule a deadline.
    #[error("deadline timer failed: {0}")]
    Timer(#[from] TimerError),
}

impl RunError {
    /// Returns a short stable label (snake_case) for use in logs/events.
    ///
    /// # Example
    /// ```
    /// use testvisor::{RunError, TimerError};
    ///
    /// let err = RunError::from(TimerError::NoRuntime);
    /// assert_eq!(err.as_label(), "run_timer");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RunError::Timer(_) => "run_timer",
        }
    }
}
