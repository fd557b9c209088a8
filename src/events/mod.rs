//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Runner::run`, `core::execution`, the runner's uncaught-error dispatcher.
//! - **Consumers**: anything holding [`Runner::subscribe`](crate::Runner::subscribe),
//!   e.g. the `logging` feature's `LogWriter`.

mod bus;
mod event;
#[cfg(feature = "logging")]
mod log;

pub use bus::Bus;
pub use event::{Event, EventKind};
#[cfg(feature = "logging")]
pub use log::LogWriter;
