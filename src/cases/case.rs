//! # Registered test case.
//!
//! [`TestCase`] is the immutable registry entry: the name the test was registered
//! under plus its body. Duplicate names are allowed; reporting repeats the name.

use std::sync::Arc;

use crate::cases::test::TestRef;

/// One entry of the runner's ordered registry.
#[derive(Clone)]
pub struct TestCase {
    name: Arc<str>,
    body: TestRef,
}

impl TestCase {
    /// Creates a case registered under `name`.
    pub fn new(name: impl Into<Arc<str>>, body: TestRef) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }

    /// Creates a case registered under the body's own [`Test::name`](crate::Test::name).
    pub fn from_test(body: TestRef) -> Self {
        Self {
            name: Arc::from(body.name()),
            body,
        }
    }

    /// Name used in log lines.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Test body.
    #[inline]
    pub fn body(&self) -> &TestRef {
        &self.body
    }

    #[inline]
    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TestFn;

    #[test]
    fn test_from_test_uses_body_name() {
        let case = TestCase::from_test(TestFn::arc("inner", || async { Ok(()) }));
        assert_eq!(case.name(), "inner");
    }

    #[test]
    fn test_registered_name_wins() {
        let case = TestCase::new("outer", TestFn::arc("inner", || async { Ok(()) }));
        assert_eq!(case.name(), "outer");
        assert_eq!(case.body().name(), "inner");
    }
}
