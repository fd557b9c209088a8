//! Runtime core: routing, per-test execution and the sequential runner.
//!
//! The public API from this module is [`Runner`] (with its builder and config),
//! [`ErrorRouter`], [`Outcome`] and [`RunSummary`].
//!
//! Internal modules:
//! - [`execution`]: runs one test under a deadline and races uncaught errors;
//! - [`router`]: takes over an uncaught-error channel and forwards to one handler;
//! - [`slot`]: single-slot live target the router's dispatcher delivers to;
//! - [`runner`]: owns the registry and drives executions in order;
//! - [`builder`]: wires collaborators with production defaults.

mod builder;
mod config;
mod execution;
mod router;
mod runner;
mod slot;
mod summary;

pub use builder::RunnerBuilder;
pub use config::{DEFAULT_DEADLINE, RunnerConfig};
pub use execution::Outcome;
pub use router::{ErrorRouter, Handler};
pub use runner::Runner;
pub use summary::{RunSummary, TestReport};
