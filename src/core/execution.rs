//! # Run a single test under a deadline.
//!
//! Executes one [`TestCase`] while it is the live target for uncaught errors,
//! races it against a deadline and publishes the terminal event to [`Bus`].
//!
//! ## Race
//!
//! ```text
//! arm live slot ──► schedule deadline ──► start body
//!                                            │
//!        ┌───────────────────────────────────┼────────────────────────┐
//!        ▼                                   ▼                        ▼
//!  uncaught error                      deadline fired           body settled
//!  error() now, remember,              TimedOut                 cancel deadline
//!  keep racing                         (no cancel)              Passed / Failed
//!        │                                   │                        │
//!        └──────────────► retire live slot ◄─┴────────────────────────┘
//! ```
//!
//! ## Rules
//! - Branch priority when several are ready: uncaught error, deadline, body.
//! - A remembered uncaught error turns an in-band success into `Failed`, and wins
//!   as the cause over a later in-band failure; both values are still reported.
//! - After the deadline fires the body is dropped; its result is never observed.
//! - The deadline handle is canceled exactly once when the body settles first,
//!   and never when it fired.
//! - Errors that reached the live slot before retirement are drained and count
//!   as part of the race.
//! - Always publishes **exactly one** terminal event: `TestPassed`, `TestFailed` or `TimeoutHit`.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::{self, BoxFuture, FutureExt};
use tokio::select;
use tokio::sync::{mpsc, oneshot};

use crate::{
    cases::TestCase,
    core::slot::{LiveSlot, LiveTarget},
    error::{RunError, TestError},
    events::{Bus, Event, EventKind},
    loggers::Logger,
    timer::Timer,
    uncaught::InBand,
};

/// Result of one test execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Body settled without error and no uncaught error was routed to it.
    Passed,
    /// Body failed in-band, or an uncaught error was routed to it while live.
    Failed(TestError),
    /// Deadline fired before the body settled.
    TimedOut,
}

impl Outcome {
    /// Returns `true` for [`Outcome::Passed`].
    #[inline]
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    /// Returns a short stable label (snake_case) for use in logs/events.
    pub fn as_label(&self) -> &'static str {
        match self {
            Outcome::Passed => "passed",
            Outcome::Failed(_) => "failed",
            Outcome::TimedOut => "timed_out",
        }
    }
}

/// Outcome plus the in-band error the runner still has to report.
///
/// Uncaught errors are reported the moment they arrive; only the in-band cause
/// is left for the runner, which reports it right after the `FAIL` line.
pub(crate) struct Verdict {
    pub(crate) outcome: Outcome,
    pub(crate) unreported: Option<TestError>,
}

type Settled = Result<Result<(), TestError>, Box<dyn Any + Send>>;

enum Race {
    Settled(Settled),
    Deadline,
}

/// Everything one execution borrows from the runner.
pub(crate) struct Execution<'a> {
    pub(crate) case: &'a TestCase,
    pub(crate) index: usize,
    pub(crate) deadline: Duration,
    pub(crate) timer: &'a dyn Timer,
    pub(crate) logger: &'a dyn Logger,
    pub(crate) bus: &'a Bus,
    pub(crate) slot: &'a LiveSlot,
}

impl Execution<'_> {
    /// Drives the test from Pending to Resolved.
    ///
    /// ### Flow
    /// 1. Arm the live slot (before the body can run)
    /// 2. Schedule the deadline
    /// 3. Start the body and race body / deadline / uncaught errors
    /// 4. Retire the live slot, drain errors that made it in, settle the timer
    /// 5. Publish the terminal event
    ///
    /// Fails only if the timer cannot schedule the deadline.
    pub(crate) async fn run(self) -> Result<Verdict, RunError> {
        let (tx, mut uncaught) = mpsc::unbounded_channel::<TestError>();
        self.slot.arm(LiveTarget {
            name: self.case.shared_name(),
            index: self.index,
            tx,
        });

        let (fire, mut deadline) = oneshot::channel::<()>();
        let handle = match self.timer.schedule(
            self.deadline,
            Box::new(move || {
                let _ = fire.send(());
            }),
        ) {
            Ok(handle) => handle,
            Err(e) => {
                self.slot.retire();
                return Err(e.into());
            }
        };

        self.bus.publish(
            Event::new(EventKind::TestStarting)
                .with_test(self.case.shared_name())
                .with_index(self.index)
                .with_timeout(self.deadline),
        );

        let mut body = start(self.case);
        let mut recorded: Option<TestError> = None;
        let mut deadline_armed = true;

        let race = loop {
            select! {
                biased;
                Some(err) = uncaught.recv() => {
                    self.absorb(err, &mut recorded);
                }
                fired = &mut deadline, if deadline_armed => match fired {
                    Ok(()) => break Race::Deadline,
                    // Timer dropped the callback without running it.
                    Err(_) => deadline_armed = false,
                },
                settled = &mut body => break Race::Settled(settled),
            }
        };

        self.slot.retire();
        while let Ok(err) = uncaught.try_recv() {
            self.absorb(err, &mut recorded);
        }

        let verdict = match race {
            Race::Deadline => Verdict {
                outcome: Outcome::TimedOut,
                unreported: None,
            },
            Race::Settled(settled) => {
                self.timer.cancel(handle);
                let in_band = match settled {
                    Ok(Ok(())) => None,
                    Ok(Err(e)) => Some(e),
                    Err(payload) => Some(TestError::from_panic(payload.as_ref())),
                };
                match (recorded, in_band) {
                    (None, None) => Verdict {
                        outcome: Outcome::Passed,
                        unreported: None,
                    },
                    (Some(global), in_band) => Verdict {
                        outcome: Outcome::Failed(global),
                        unreported: in_band,
                    },
                    (None, Some(e)) => Verdict {
                        outcome: Outcome::Failed(e.clone()),
                        unreported: Some(e),
                    },
                }
            }
        };

        self.publish_outcome(&verdict.outcome);
        Ok(verdict)
    }

    /// Reports an uncaught error immediately and remembers the first one.
    fn absorb(&self, err: TestError, recorded: &mut Option<TestError>) {
        self.logger.error(&err);
        if recorded.is_none() {
            *recorded = Some(err);
        }
    }

    fn publish_outcome(&self, outcome: &Outcome) {
        let ev = match outcome {
            Outcome::Passed => Event::new(EventKind::TestPassed),
            Outcome::Failed(cause) => {
                Event::new(EventKind::TestFailed).with_reason(cause.to_string())
            }
            Outcome::TimedOut => Event::new(EventKind::TimeoutHit).with_timeout(self.deadline),
        };
        self.bus
            .publish(ev.with_test(self.case.shared_name()).with_index(self.index));
    }
}

/// Starts the body in-band and converts panics (at call or poll) into `Err(payload)`.
fn start(case: &TestCase) -> BoxFuture<'_, Settled> {
    let started = {
        let _in_band = InBand::enter();
        panic::catch_unwind(AssertUnwindSafe(|| case.body().run()))
    };
    match started {
        Ok(fut) => AssertUnwindSafe(InBandBody { inner: fut }).catch_unwind().boxed(),
        Err(payload) => future::ready(Err(payload)).boxed(),
    }
}

/// Polls the body with the current thread marked in-band.
struct InBandBody<'a> {
    inner: BoxFuture<'a, Result<(), TestError>>,
}

impl Future for InBandBody<'_> {
    type Output = Result<(), TestError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let _in_band = InBand::enter();
        self.inner.as_mut().poll(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ManualTimer, Recorder, TestFn, TimeoutHandle};

    struct Harness {
        timer: ManualTimer,
        logger: Recorder,
        bus: Bus,
        slot: LiveSlot,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                timer: ManualTimer::new(),
                logger: Recorder::new(),
                bus: Bus::new(64),
                slot: LiveSlot::default(),
            }
        }

        fn execution<'a>(&'a self, case: &'a TestCase) -> Execution<'a> {
            Execution {
                case,
                index: 0,
                deadline: Duration::from_millis(1000),
                timer: &self.timer,
                logger: &self.logger,
                bus: &self.bus,
                slot: &self.slot,
            }
        }
    }

    fn case<F, Fut>(name: &'static str, f: F) -> TestCase
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), TestError>> + Send + 'static,
    {
        TestCase::from_test(TestFn::arc(name, f))
    }

    #[tokio::test]
    async fn test_pass_cancels_deadline_once() {
        let h = Harness::new();
        let c = case("ok", || async { Ok(()) });

        let verdict = h.execution(&c).run().await.unwrap();

        assert_eq!(verdict.outcome, Outcome::Passed);
        assert!(verdict.unreported.is_none());
        assert_eq!(h.timer.cancelled(), vec![TimeoutHandle::from_raw(1)]);
        assert!(!h.slot.is_armed());
        assert!(h.logger.errors().is_empty());
    }

    #[tokio::test]
    async fn test_in_band_error_is_left_for_runner() {
        let h = Harness::new();
        let c = case("bad", || async { Err(TestError::fail("nope")) });

        let verdict = h.execution(&c).run().await.unwrap();

        assert_eq!(verdict.outcome, Outcome::Failed(TestError::fail("nope")));
        assert_eq!(verdict.unreported, Some(TestError::fail("nope")));
        assert!(h.logger.errors().is_empty());
        assert_eq!(h.timer.cancelled().len(), 1);
    }

    fn explode(msg: &str) -> Result<(), TestError> {
        panic!("{msg}")
    }

    #[tokio::test]
    async fn test_panic_while_polled_is_in_band() {
        let h = Harness::new();
        let c = case("panics", || async {
            tokio::task::yield_now().await;
            explode("kaboom")
        });

        let verdict = h.execution(&c).run().await.unwrap();

        assert_eq!(verdict.outcome, Outcome::Failed(TestError::panicked("kaboom")));
        assert_eq!(h.timer.cancelled().len(), 1);
    }

    #[tokio::test]
    async fn test_deadline_wins_and_is_not_cancelled() {
        let h = Harness::new();
        let c = case("hangs", || future::pending::<Result<(), TestError>>());
        let mut events = h.bus.subscribe();

        let exec = h.execution(&c).run();
        let fire = async {
            tokio::task::yield_now().await;
            assert_eq!(h.timer.advance(Duration::from_millis(1000)), 1);
        };
        let (verdict, ()) = tokio::join!(exec, fire);
        let verdict = verdict.unwrap();

        assert_eq!(verdict.outcome, Outcome::TimedOut);
        assert!(h.timer.cancelled().is_empty());
        assert_eq!(events.recv().await.unwrap().kind, EventKind::TestStarting);
        assert_eq!(events.recv().await.unwrap().kind, EventKind::TimeoutHit);
    }

    #[tokio::test]
    async fn test_uncaught_error_overrides_success() {
        let h = Harness::new();
        let (release_tx, release_rx) = tokio::sync::watch::channel(false);
        let c = case("leaky", move || {
            let mut rx = release_rx.clone();
            async move {
                let _ = rx.changed().await;
                Ok(())
            }
        });

        let exec = h.execution(&c).run();
        let drive = async {
            tokio::task::yield_now().await;
            assert!(h.slot.route(&TestError::fail("global")).is_some());
            let _ = release_tx.send(true);
        };
        let (verdict, ()) = tokio::join!(exec, drive);
        let verdict = verdict.unwrap();

        assert_eq!(verdict.outcome, Outcome::Failed(TestError::fail("global")));
        assert!(verdict.unreported.is_none());
        assert_eq!(h.logger.errors(), vec![TestError::fail("global")]);
    }

    #[tokio::test]
    async fn test_schedule_failure_retires_slot() {
        struct Broken;
        impl Timer for Broken {
            fn schedule(
                &self,
                _: Duration,
                _: crate::timer::TimerCallback,
            ) -> Result<TimeoutHandle, crate::TimerError> {
                Err(crate::TimerError::NoRuntime)
            }
            fn cancel(&self, _: TimeoutHandle) {}
        }

        let h = Harness::new();
        let c = case("never-runs", || async { Ok(()) });
        let exec = Execution {
            timer: &Broken,
            ..h.execution(&c)
        };

        assert!(matches!(exec.run().await, Err(RunError::Timer(_))));
        assert!(!h.slot.is_armed());
    }
}
