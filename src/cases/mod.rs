//! # Test abstractions.
//!
//! This module provides the test-related types:
//! - [`Test`] - trait for async test bodies
//! - [`TestFn`] - function-backed implementation
//! - [`TestRef`] - shared reference to a test (`Arc<dyn Test>`)
//! - [`TestCase`] - registry entry (registered name + body)

mod case;
mod test_fn;

pub use case::TestCase;
pub use test::{Test, TestRef};
pub use test_fn::TestFn;
