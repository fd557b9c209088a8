//! # Log sinks for test outcomes.
//!
//! The runner writes exactly one line per test through [`Logger::log`] and hands
//! raw failure causes to [`Logger::error`].
//!
//! - [`ConsoleLogger`]: lines to stdout, errors to stderr (default).
//! - [`Recorder`]: keeps everything in memory for assertions.

mod console;
mod recorder;

use crate::error::TestError;

pub use console::ConsoleLogger;
pub use recorder::Recorder;

/// Destination for outcome lines and failure causes.
///
/// Called synchronously from the runner; implementations should not block for long.
pub trait Logger: Send + Sync + 'static {
    /// Writes one outcome line (`PASS: name`, `FAIL: name`, `FAIL: name (timed out)`).
    fn log(&self, message: &str);

    /// Reports a failure cause as-is.
    fn error(&self, error: &TestError);
}
