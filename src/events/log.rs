//! # LogWriter: simple event printer
//!
//! Prints runtime [`Event`]s to stdout. Use it for demos or when debugging a
//! run; the outcome lines themselves always go through the runner's logger.
//!
//! ## Example output
//! ```text
//! [run-starting] tests=3
//! [starting] test="fetches" index=0 timeout=1000ms
//! [uncaught-routed] test="fetches" index=0 err="panicked: boom"
//! [failed] test="fetches" index=0 err="panicked: boom"
//! [timeout] test="hangs" index=1 timeout=1000ms
//! [passed] test="parses" index=2
//! [uncaught-dropped] err="test failed: late"
//! [run-finished] tests=3
//! ```

use tokio::sync::broadcast::{self, error::RecvError};

use super::{Event, EventKind};

/// Event writer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Prints one event.
    pub fn on_event(&self, e: &Event) {
        println!("{}", Self::format(e));
    }

    /// Prints events from `rx` until the bus is closed.
    ///
    /// Typically spawned with a receiver from [`Runner::subscribe`](crate::Runner::subscribe).
    pub async fn run(self, mut rx: broadcast::Receiver<Event>) {
        loop {
            match rx.recv().await {
                Ok(ev) => self.on_event(&ev),
                Err(RecvError::Lagged(skipped)) => println!("[lagged] skipped={skipped}"),
                Err(RecvError::Closed) => break,
            }
        }
    }

    /// Renders an event as a single line.
    pub fn format(e: &Event) -> String {
        let test = e.test.as_deref().unwrap_or("unknown");
        let err = e.reason.as_deref().unwrap_or("unknown");
        let index = e.index.unwrap_or_default();
        let timeout = e.timeout_ms.unwrap_or_default();

        match e.kind {
            EventKind::RunStarting => format!("[run-starting] tests={index}"),
            EventKind::RunFinished => format!("[run-finished] tests={index}"),
            EventKind::TestStarting => {
                format!("[starting] test={test:?} index={index} timeout={timeout}ms")
            }
            EventKind::TestPassed => format!("[passed] test={test:?} index={index}"),
            EventKind::TestFailed => format!("[failed] test={test:?} index={index} err={err:?}"),
            EventKind::TimeoutHit => {
                format!("[timeout] test={test:?} index={index} timeout={timeout}ms")
            }
            EventKind::UncaughtRouted => {
                format!("[uncaught-routed] test={test:?} index={index} err={err:?}")
            }
            EventKind::UncaughtDropped => format!("[uncaught-dropped] err={err:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_lines() {
        let ev = Event::new(EventKind::TimeoutHit)
            .with_test("hangs")
            .with_index(1)
            .with_timeout(Duration::from_secs(1));
        assert_eq!(
            LogWriter::format(&ev),
            r#"[timeout] test="hangs" index=1 timeout=1000ms"#
        );

        let ev = Event::new(EventKind::UncaughtDropped).with_reason("test failed: late");
        assert_eq!(
            LogWriter::format(&ev),
            r#"[uncaught-dropped] err="test failed: late""#
        );
    }

    #[tokio::test]
    async fn test_run_stops_when_bus_closes() {
        let bus = crate::events::Bus::new(8);
        let rx = bus.subscribe();
        bus.publish(Event::new(EventKind::RunStarting).with_index(0));
        drop(bus);

        LogWriter::new().run(rx).await;
    }
}
