//! # Uncaught-error sources.
//!
//! - [`UncaughtChannel`] - listener-list contract the router takes over
//! - [`ErrorChannel`] - in-process implementation (private or [`ErrorChannel::global`])
//! - [`forward_panics`] - panic hook feeding out-of-band panics into the global channel

mod channel;
mod panic_hook;

pub use channel::{ErrorChannel, Listener, UncaughtChannel};
pub use panic_hook::forward_panics;

pub(crate) use panic_hook::{InBand, claim};
