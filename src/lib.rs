//! # testvisor
//!
//! **Testvisor** is a small sequential test runner for async Rust.
//!
//! It runs registered tests one at a time, bounds each with a deadline, and
//! attributes errors that escape a test's own control flow (panics in spawned
//! tasks, errors emitted on an uncaught-error channel) to the test that is
//! running when they arrive.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   TestCase   │   │   TestCase   │   │   TestCase   │
//!     │  (name, fn)  │   │  (name, fn)  │   │  (name, fn)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Runner (ordered registry, one run at a time)                     │
//! │  - ErrorRouter (takes over the UncaughtChannel during a run)      │
//! │  - LiveSlot (the one execution uncaught errors are routed to)     │
//! │  - Timer (per-test deadline)                                      │
//! │  - Logger (PASS / FAIL lines and failure causes)                  │
//! └──────┬───────────────────────────────────────────────────┬────────┘
//!        ▼                                                   │
//!   Execution::run()  ── one at a time, registration order   │
//!   races: uncaught error | deadline | body                  │
//!        │                                                   │
//!        ▼                                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │               (capacity: RunnerConfig::bus_capacity)              │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Runner::run()
//!   ├─► router.install(dispatcher)
//!   ├─► for each test:
//!   │     ├─ arm live slot, schedule deadline, start body
//!   │     ├─ uncaught error ─► logger.error(err) now, test will fail
//!   │     ├─ deadline       ─► "FAIL: name (timed out)"
//!   │     └─ body settled   ─► cancel deadline
//!   │                          ├─ Ok  (no uncaught) ─► "PASS: name"
//!   │                          └─ Err / uncaught    ─► "FAIL: name" + logger.error(cause)
//!   └─► router.uninstall()  (previous listeners restored)
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Runner**        | Register tests and run them sequentially with deadlines.      | [`Runner`], [`RunnerBuilder`], [`RunSummary`] |
//! | **Tests**         | Define tests as functions or trait objects.                   | [`Test`], [`TestFn`], [`TestCase`]          |
//! | **Uncaught errors**| Route out-of-band errors and panics to the running test.     | [`ErrorRouter`], [`UncaughtChannel`], [`ErrorChannel`] |
//! | **Timers**        | Deadline scheduling, real or manually driven.                 | [`Timer`], [`TokioTimer`], [`ManualTimer`]  |
//! | **Logging**       | Outcome lines and causes; runtime events.                     | [`Logger`], [`ConsoleLogger`], [`Event`]    |
//! | **Errors**        | Typed errors for tests and the runner itself.                 | [`TestError`], [`RunError`]                 |
//! | **Configuration** | Deadline, bus capacity, panic capture.                        | [`RunnerConfig`]                            |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in `LogWriter` event printer _(demo/debug only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use testvisor::{Runner, RunnerConfig, TestError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = RunnerConfig::default();
//!     cfg.deadline = Duration::from_millis(200);
//!
//!     let mut runner = Runner::builder(cfg).build();
//!     runner.test("adds", || async {
//!         if 1 + 1 == 2 { Ok(()) } else { Err(TestError::fail("math")) }
//!     });
//!     runner.test("hangs", || async {
//!         std::future::pending::<()>().await;
//!         Ok(())
//!     });
//!
//!     // PASS: adds
//!     // FAIL: hangs (timed out)
//!     let summary = runner.run().await?;
//!     assert_eq!((summary.passed, summary.timed_out), (1, 1));
//!     Ok(())
//! }
//! ```
mod cases;
mod core;
mod error;
mod events;
mod loggers;
mod sync;
mod timer;
mod uncaught;

// ---- Public re-exports ----

pub use cases::{Test, TestCase, TestFn, TestRef};
pub use crate::core::{
    DEFAULT_DEADLINE, ErrorRouter, Handler, Outcome, RunSummary, Runner, RunnerBuilder,
    RunnerConfig, TestReport,
};
pub use error::{RunError, TestError, TimerError};
pub use events::{Bus, Event, EventKind};
pub use loggers::{ConsoleLogger, Logger, Recorder};
pub use timer::{ManualTimer, TimeoutHandle, Timer, TimerCallback, TokioTimer};
pub use uncaught::{ErrorChannel, Listener, UncaughtChannel, forward_panics};

// Optional: expose a simple built-in event printer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use events::LogWriter;
