//! # Example: uncaught
//!
//! A test that spawns background work without awaiting it. The background task
//! panics; the runner attributes the panic to the test that is live at that moment.
//!
//! ## Flow
//! ```text
//! Runner::run()
//!   ├─► forward_panics()                 (bridge: panic hook ─► ErrorChannel::global)
//!   ├─► router.install(dispatcher)
//!   ├─► "fire and forget" starts, spawns a task, keeps waiting
//!   │     └─ spawned task panics ─► hook ─► router ─► live test
//!   │                                      └─► error(panicked: ...) logged immediately
//!   ├─► body completes Ok ─► "FAIL: fire and forget" (uncaught error wins)
//!   └─► "PASS: unaffected"
//! ```
//!
//! With the `logging` feature the runtime events are printed too.
//!
//! ## Run
//! ```bash
//! cargo run --example uncaught --features logging
//! ```

use std::time::Duration;

use testvisor::Runner;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut runner = Runner::new();

    #[cfg(feature = "logging")]
    let printer = tokio::spawn(testvisor::LogWriter::new().run(runner.subscribe()));

    runner.test("fire and forget", || async {
        tokio::spawn(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let config: Option<&str> = None;
            config.expect("background worker lost its config");
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(())
    });
    runner.test("unaffected", || async { Ok(()) });

    let summary = runner.run().await?;

    #[cfg(feature = "logging")]
    {
        drop(runner);
        let _ = printer.await;
    }

    println!("success: {}", summary.is_success());
    Ok(())
}
