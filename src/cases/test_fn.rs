//! # Function-backed test (`TestFn`)
//!
//! [`TestFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per run.
//! Shared state between the closure and the outside world goes through `Arc<...>`.
//!
//! ## Example
//! ```rust
//! use testvisor::{Test, TestError, TestFn, TestRef};
//!
//! let t: TestRef = TestFn::arc("adds", || async {
//!     if 2 + 2 != 4 {
//!         return Err(TestError::fail("math is broken"));
//!     }
//!     Ok(())
//! });
//!
//! assert_eq!(t.name(), "adds");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::cases::test::Test;
use crate::error::TestError;

/// Function-backed test implementation.
#[derive(Debug)]
pub struct TestFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> TestFn<F> {
    /// Creates a new function-backed test.
    ///
    /// Prefer [`TestFn::arc`] when you immediately need a [`TestRef`](crate::TestRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the test and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Test for TestFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), TestError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> Result<(), TestError> {
        (self.f)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_fresh_future_per_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let t = TestFn::arc("counts", move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        t.run().await.unwrap();
        t.run().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_error_is_returned() {
        let t = TestFn::arc("fails", || async { Err(TestError::fail("nope")) });
        assert_eq!(t.run().await, Err(TestError::fail("nope")));
    }
}
