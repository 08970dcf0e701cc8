//! Convenience entry points for creating and emitting flow events.

use std::sync::Arc;

use tracing::info;

use crate::builder::FlowEventBuilder;
use crate::clock::{Clock, SystemClock};
use crate::codec;
use crate::config::{ConfigError, FlowLoggerConfig};
use crate::error::Result;
use crate::event::FlowEvent;
use crate::ids::{RandomSource, SystemRandom};

/// Tracing target used by [`FlowLogger::emit`].
pub const EVENT_TARGET: &str = "flowlog::event";

/// Hands out builders pre-populated with the configured reporter and
/// shared collaborators, and emits finished events as JSON.
///
/// Cloning is cheap; one logger can be shared across threads.
#[derive(Clone)]
pub struct FlowLogger {
    config: Arc<FlowLoggerConfig>,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
}

impl std::fmt::Debug for FlowLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowLogger")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for FlowLogger {
    fn default() -> Self {
        Self {
            config: Arc::new(FlowLoggerConfig::default()),
            clock: Arc::new(SystemClock),
            random: Arc::new(SystemRandom),
        }
    }
}

impl FlowLogger {
    /// Create a logger using the system clock and randomness.
    pub fn new(config: FlowLoggerConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_collaborators(config, Arc::new(SystemClock), Arc::new(SystemRandom))
    }

    pub fn with_collaborators(
        config: FlowLoggerConfig,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            clock,
            random,
        })
    }

    pub fn config(&self) -> &FlowLoggerConfig {
        &self.config
    }

    /// A fresh builder with the configured reporter applied.
    pub fn event(&self) -> FlowEventBuilder {
        let reporter = &self.config.reporter;
        FlowEventBuilder::with_collaborators(self.clock.clone(), self.random.clone())
            .reporter(|r| reporter.apply(r))
    }

    /// A builder for an event in an existing flow.
    pub fn event_for(&self, correlation_id: impl Into<String>) -> FlowEventBuilder {
        self.event().correlation_id(correlation_id)
    }

    /// A builder for an event continuing a flow with the given history.
    pub fn event_with_history(
        &self,
        correlation_id: impl Into<String>,
        history: &str,
    ) -> Result<FlowEventBuilder> {
        self.event_for(correlation_id).history(history)
    }

    /// Serialize `event` and log it at INFO under [`EVENT_TARGET`].
    ///
    /// Returns the JSON document so the caller can forward it to its own
    /// sink as well.
    pub fn emit(&self, event: &FlowEvent) -> Result<String> {
        let json = if self.config.pretty {
            codec::to_json_pretty(event)?
        } else {
            codec::to_json(event)?
        };
        info!(
            target: EVENT_TARGET,
            correlation_id = event.correlation_id(),
            edge_id = event.edge().id(),
            status = event.edge().status(),
            "{}",
            json
        );
        Ok(json)
    }
}

/// A builder from the default logger.
pub fn event() -> FlowEventBuilder {
    FlowLogger::default().event()
}

/// A builder from the default logger for an existing flow.
pub fn event_for(correlation_id: impl Into<String>) -> FlowEventBuilder {
    FlowLogger::default().event_for(correlation_id)
}

/// A builder from the default logger continuing a flow with `history`.
pub fn event_with_history(
    correlation_id: impl Into<String>,
    history: &str,
) -> Result<FlowEventBuilder> {
    FlowLogger::default().event_with_history(correlation_id, history)
}
