//! # Runner: sequential test driver.
//!
//! The [`Runner`] owns the ordered registry, the router lifecycle for a whole run,
//! and the translation of every [`Outcome`] into log output.
//!
//! ## Architecture
//! ```text
//! run()
//!   ├─► forward_panics()            (global channel + capture_panics only)
//!   ├─► router.install(dispatcher)  dispatcher: err ─► LiveSlot::route(err)
//!   ├─► publish RunStarting
//!   ├─► for (index, case) in registry (registration order):
//!   │      Execution { case, .. }.run()
//!   │        ├─ arm slot, schedule deadline, race body
//!   │        └─ retire slot, settle timer, publish terminal event
//!   │      log "PASS: name" | "FAIL: name" (+ error(cause)) | "FAIL: name (timed out)"
//!   ├─► router.uninstall()
//!   └─► publish RunFinished
//! ```
//!
//! ## Rules
//! - Tests run **strictly sequentially**; a hung test blocks the rest until its deadline.
//! - Exactly one log line per registered test, in registration order.
//! - Test failures never surface as errors of `run()`; a failing timer does.
//! - The registry is read-only during a run (`run` takes `&self`, registration `&mut self`).

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;

use super::{
    builder::RunnerBuilder,
    config::RunnerConfig,
    execution::{Execution, Outcome, Verdict},
    router::{ErrorRouter, Handler},
    slot::LiveSlot,
    summary::RunSummary,
};
use crate::{
    cases::{TestCase, TestFn, TestRef},
    error::{RunError, TestError},
    events::{Bus, Event, EventKind},
    loggers::Logger,
    timer::Timer,
    uncaught::{self, UncaughtChannel},
};

/// Sequential test runner.
///
/// ## Example
/// ```rust
/// use testvisor::{Runner, TestError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut runner = Runner::new();
///     runner.test("async ok", || async { Ok(()) });
///     runner.test_sync("sync fails", || Err(TestError::fail("nope")));
///
///     let summary = runner.run().await?;
///     assert_eq!((summary.passed, summary.failed), (1, 1));
///     Ok(())
/// }
/// ```
pub struct Runner {
    cfg: RunnerConfig,
    bus: Bus,
    logger: Arc<dyn Logger>,
    timer: Arc<dyn Timer>,
    channel: Arc<dyn UncaughtChannel>,
    bridge_panics: bool,
    tests: Vec<TestCase>,
}

impl Runner {
    /// Creates a runner with default configuration and collaborators.
    pub fn new() -> Self {
        RunnerBuilder::new(RunnerConfig::default()).build()
    }

    /// Returns a builder for custom configuration and collaborators.
    pub fn builder(cfg: RunnerConfig) -> RunnerBuilder {
        RunnerBuilder::new(cfg)
    }

    pub(super) fn new_internal(
        cfg: RunnerConfig,
        bus: Bus,
        logger: Arc<dyn Logger>,
        timer: Arc<dyn Timer>,
        channel: Arc<dyn UncaughtChannel>,
        bridge_panics: bool,
    ) -> Self {
        Self {
            cfg,
            bus,
            logger,
            timer,
            channel,
            bridge_panics,
            tests: Vec::new(),
        }
    }

    /// Registers an async test body under `name`.
    pub fn test<F, Fut>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TestError>> + Send + 'static,
    {
        let name: String = name.into();
        let case = TestCase::new(name.as_str(), TestFn::arc(name.clone(), f));
        self.register(case);
    }

    /// Registers a synchronous test body under `name`.
    ///
    /// The body runs when its test starts, under the same deadline and panic
    /// handling as async bodies.
    pub fn test_sync<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn() -> Result<(), TestError> + Send + Sync + 'static,
    {
        self.test(name, move || std::future::ready(f()));
    }

    /// Registers a test implemented through the [`Test`](crate::Test) trait, under its own name.
    pub fn add(&mut self, test: TestRef) {
        self.register(TestCase::from_test(test));
    }

    /// Appends `case` to the registry. Duplicate names are allowed.
    pub fn register(&mut self, case: TestCase) {
        self.tests.push(case);
    }

    /// Registered tests, in registration order.
    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    /// Runner configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.cfg
    }

    /// Creates a receiver for runtime events of subsequent runs.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Runs every registered test once, in order, and logs each outcome.
    ///
    /// Resolves after the last test has been logged and the router has been
    /// uninstalled. Fails only if the timer collaborator fails; the router is
    /// uninstalled on that path too.
    pub async fn run(&self) -> Result<RunSummary, RunError> {
        if self.bridge_panics {
            uncaught::forward_panics();
        }

        let slot = LiveSlot::default();
        let mut router = ErrorRouter::new(Arc::clone(&self.channel));
        router.install(self.dispatcher(&slot));
        self.bus
            .publish(Event::new(EventKind::RunStarting).with_index(self.tests.len()));

        let mut summary = RunSummary::default();
        for (index, case) in self.tests.iter().enumerate() {
            let verdict = Execution {
                case,
                index,
                deadline: self.cfg.deadline,
                timer: self.timer.as_ref(),
                logger: self.logger.as_ref(),
                bus: &self.bus,
                slot: &slot,
            }
            .run()
            .await?;

            self.report(case, &verdict);
            summary.record(case.shared_name(), verdict.outcome);
        }

        router.uninstall();
        self.bus
            .publish(Event::new(EventKind::RunFinished).with_index(summary.total()));
        Ok(summary)
    }

    /// Router handler forwarding to whichever execution is live.
    ///
    /// A delivered error is claimed, so the panic bridge leaves unclaimed panics
    /// to the previous hook.
    fn dispatcher(&self, slot: &LiveSlot) -> Handler {
        let slot = slot.clone();
        let bus = self.bus.clone();
        Arc::new(move |error: &TestError| match slot.route(error) {
            Some((name, index)) => {
                uncaught::claim();
                bus.publish(
                    Event::new(EventKind::UncaughtRouted)
                        .with_test(name)
                        .with_index(index)
                        .with_reason(error.to_string()),
                );
            }
            None => bus.publish(
                Event::new(EventKind::UncaughtDropped).with_reason(error.to_string()),
            ),
        })
    }

    /// Writes the single outcome line (and the in-band cause, if any).
    fn report(&self, case: &TestCase, verdict: &Verdict) {
        let name = case.name();
        match &verdict.outcome {
            Outcome::Passed => self.logger.log(&format!("PASS: {name}")),
            Outcome::Failed(_) => {
                self.logger.log(&format!("FAIL: {name}"));
                if let Some(cause) = &verdict.unreported {
                    self.logger.error(cause);
                }
            }
            Outcome::TimedOut => self.logger.log(&format!("FAIL: {name} (timed out)")),
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}
