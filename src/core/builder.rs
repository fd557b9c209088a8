use std::sync::Arc;

use super::{config::RunnerConfig, runner::Runner};
use crate::{
    events::Bus,
    loggers::{ConsoleLogger, Logger},
    timer::{Timer, TokioTimer},
    uncaught::{ErrorChannel, UncaughtChannel},
};

/// Builder for constructing a [`Runner`] with custom collaborators.
///
/// Anything not set falls back to the production default:
/// [`ConsoleLogger`], [`TokioTimer`] and [`ErrorChannel::global`].
pub struct RunnerBuilder {
    cfg: RunnerConfig,
    logger: Option<Arc<dyn Logger>>,
    timer: Option<Arc<dyn Timer>>,
    channel: Option<Arc<dyn UncaughtChannel>>,
}

impl RunnerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: RunnerConfig) -> Self {
        Self {
            cfg,
            logger: None,
            timer: None,
            channel: None,
        }
    }

    /// Sets the sink for outcome lines and failure causes.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Sets the deadline timer.
    pub fn with_timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Sets the uncaught-error channel the router takes over during a run.
    ///
    /// A runner with an explicit channel never installs the panic bridge.
    pub fn with_channel(mut self, channel: Arc<dyn UncaughtChannel>) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Builds the runner with an empty registry.
    pub fn build(self) -> Runner {
        let bridge_panics = self.cfg.capture_panics && self.channel.is_none();
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let channel = self
            .channel
            .unwrap_or_else(|| ErrorChannel::global() as Arc<dyn UncaughtChannel>);

        Runner::new_internal(
            self.cfg,
            bus,
            self.logger.unwrap_or_else(|| Arc::new(ConsoleLogger::new())),
            self.timer.unwrap_or_else(|| Arc::new(TokioTimer::new())),
            channel,
            bridge_panics,
        )
    }
}
