//! # In-memory logger.
//!
//! [`Recorder`] keeps every line and every error in call order. Useful for
//! asserting on runner output:
//!
//! ```rust
//! use testvisor::{Logger, Recorder, TestError};
//!
//! let rec = Recorder::new();
//! rec.log("FAIL: parses");
//! rec.error(&TestError::fail("bad magic"));
//!
//! assert_eq!(rec.lines(), vec!["FAIL: parses"]);
//! assert_eq!(rec.errors(), vec![TestError::fail("bad magic")]);
//! ```

use std::sync::Mutex;

use super::Logger;
use crate::error::TestError;
use crate::sync::lock;

#[derive(Default)]
struct Calls {
    lines: Vec<String>,
    errors: Vec<TestError>,
}

/// Logger that records calls instead of printing them.
#[derive(Default)]
pub struct Recorder {
    calls: Mutex<Calls>,
}

impl Recorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines passed to [`Logger::log`], in call order.
    pub fn lines(&self) -> Vec<String> {
        lock(&self.calls).lines.clone()
    }

    /// Errors passed to [`Logger::error`], in call order.
    pub fn errors(&self) -> Vec<TestError> {
        lock(&self.calls).errors.clone()
    }
}

impl Logger for Recorder {
    fn log(&self, message: &str) {
        lock(&self.calls).lines.push(message.to_owned());
    }

    fn error(&self, error: &TestError) {
        lock(&self.calls).errors.push(error.clone());
    }
}
