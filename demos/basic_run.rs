//! # Example: basic_run
//!
//! Registers a handful of tests and runs them with the default console logger.
//!
//! Demonstrates how to:
//! - Register async and sync tests with [`Runner::test`] / [`Runner::test_sync`].
//! - Shorten the per-test deadline through [`RunnerConfig`].
//! - Read the [`RunSummary`](testvisor::RunSummary) after the run.
//!
//! ## Expected output
//! ```text
//! PASS: adds
//! FAIL: divides
//! test failed: division by zero
//! FAIL: sleeps too long (timed out)
//! PASS: sync check
//! 2 passed, 1 failed, 1 timed out
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_run
//! ```

use std::time::Duration;

use testvisor::{Runner, RunnerConfig, TestError};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = RunnerConfig::default();
    cfg.deadline = Duration::from_millis(300);
    let mut runner = Runner::builder(cfg).build();

    runner.test("adds", || async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        if 2 + 2 == 4 {
            Ok(())
        } else {
            Err(TestError::fail("math is broken"))
        }
    });
    runner.test("divides", || async {
        let d = 0u32;
        4u32.checked_div(d)
            .map(|_| ())
            .ok_or_else(|| TestError::fail("division by zero"))
    });
    runner.test("sleeps too long", || async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(())
    });
    runner.test_sync("sync check", || Ok(()));

    let summary = runner.run().await?;
    println!(
        "{} passed, {} failed, {} timed out",
        summary.passed, summary.failed, summary.timed_out
    );
    Ok(())
}
