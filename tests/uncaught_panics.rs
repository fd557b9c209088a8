//! Panic bridge end to end. Kept to a single test: the panic hook and the global
//! channel are process-wide, so parallel tests in this binary would see each other.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::FutureExt;
use testvisor::{ErrorChannel, Logger, Recorder, Runner, RunnerConfig, TestError};

fn explode(msg: &str) -> Result<(), TestError> {
    panic!("{msg}")
}

/// Logger that panics on its first outcome line, outside any test body.
struct BrokenLogger;

impl Logger for BrokenLogger {
    fn log(&self, message: &str) {
        panic!("logger broke on {message}");
    }

    fn error(&self, _: &TestError) {}
}

fn payload_text(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_default()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_panic_bridge_routes_live_panics_and_falls_back_otherwise() {
    // Installed before the bridge, so it becomes the bridge's previous hook.
    let fallback = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = Arc::clone(&fallback);
    panic::set_hook(Box::new(move |info| {
        sink.lock().unwrap().push(payload_text(info.payload()));
    }));

    let rec = Arc::new(Recorder::new());
    let mut runner = Runner::builder(RunnerConfig::default())
        .with_logger(rec.clone())
        .build();

    runner.test("spawns", || async {
        // Detached: the test never looks at the handle.
        tokio::spawn(async { explode("background") });
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(())
    });
    runner.test("direct", || async { explode("direct") });
    runner.test("clean", || async { Ok(()) });

    let summary = runner.run().await.unwrap();

    assert_eq!(rec.lines(), vec!["FAIL: spawns", "FAIL: direct", "PASS: clean"]);
    // The in-band panic is caught by the execution and not forwarded a second time.
    assert_eq!(
        rec.errors(),
        vec![TestError::panicked("background"), TestError::panicked("direct")]
    );
    assert_eq!(summary.failed, 2);
    // Claimed by a live test: only the in-band panic reached the previous hook.
    assert_eq!(*fallback.lock().unwrap(), vec!["direct".to_owned()]);
    assert!(!ErrorChannel::global().has_listeners());

    // A panic while the router is installed but no test is live is not swallowed.
    let mut broken = Runner::builder(RunnerConfig::default())
        .with_logger(Arc::new(BrokenLogger))
        .build();
    broken.test("t", || async { Ok(()) });

    let unwound = AssertUnwindSafe(broken.run()).catch_unwind().await;

    assert!(unwound.is_err());
    assert_eq!(
        fallback.lock().unwrap().last().map(String::as_str),
        Some("logger broke on PASS: t")
    );
    // Unwinding dropped the router, which detached itself.
    assert!(!ErrorChannel::global().has_listeners());
}
