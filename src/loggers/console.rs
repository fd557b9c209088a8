use super::Logger;
use crate::error::TestError;

/// Prints outcome lines to stdout and failure causes to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLogger;

impl ConsoleLogger {
    /// Construct a new [`ConsoleLogger`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, error: &TestError) {
        eprintln!("{error}");
    }
}
