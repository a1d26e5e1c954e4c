use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use thiserror::Error;
use tracing::debug;

use crate::{
    client::{ClientId, MonitoringClient},
    names::{self, scoped_name, MonitoringContext},
    registry::MonitorRegistry,
};

const DEFAULT_SAMPLE_RATE: f64 = 1.0;

/// Errors that could occur while configuring an [`ActorMonitor`].
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The sample rate was not in the range `(0, 1]`.
    #[error("invalid sample rate {0} (expected a value in (0, 1])")]
    InvalidSampleRate(f64),

    /// Two configured monitoring clients share the same identity.
    #[error("monitoring client {0} was configured more than once")]
    DuplicateClient(ClientId),
}

fn validate_sample_rate(sample_rate: f64) -> Result<f64, MonitorError> {
    if sample_rate > 0.0 && sample_rate <= 1.0 {
        Ok(sample_rate)
    } else {
        Err(MonitorError::InvalidSampleRate(sample_rate))
    }
}

/// Entry point for reporting actor system metrics.
///
/// `ActorMonitor` holds the set of registered monitoring clients and turns each reading into broadcasts: one under the
/// metric's global name and, when a reporting context is given, a second one under the context-scoped name (see
/// [`scoped_name`]). Both broadcasts carry the same value and sample rate, and the global one is always issued first.
///
/// Nothing is aggregated here; every call is forwarded synchronously to the clients. A single `ActorMonitor` can be
/// shared freely between threads.
pub struct ActorMonitor {
    registry: MonitorRegistry,
    global_sample_rate: AtomicU64,
}

impl ActorMonitor {
    /// Creates a new `ActorMonitor` with no clients and a global sample rate of 1.0.
    pub fn new() -> Self {
        ActorMonitor {
            registry: MonitorRegistry::new(),
            global_sample_rate: AtomicU64::new(DEFAULT_SAMPLE_RATE.to_bits()),
        }
    }

    /// Creates a builder for configuring an `ActorMonitor`.
    pub fn builder() -> ActorMonitorBuilder {
        ActorMonitorBuilder::default()
    }

    /// Registers a monitoring client.
    ///
    /// Returns `true` if the client was registered, or `false` if a client with the same identity is already active.
    pub fn register_monitor(&self, client: Arc<dyn MonitoringClient>) -> bool {
        self.registry.add(client)
    }

    /// Deregisters a monitoring client so it no longer receives metrics.
    ///
    /// The client is not disposed. Returns `true` if the client was active and has been deregistered.
    pub fn deregister_monitor(&self, client: &dyn MonitoringClient) -> bool {
        self.registry.remove(client)
    }

    /// Disposes all registered monitoring clients.
    ///
    /// New clients can be registered after this call.
    pub fn terminate_monitors(&self) {
        self.registry.dispose_all();
    }

    /// Returns the registry of active clients.
    pub fn registry(&self) -> &MonitorRegistry {
        &self.registry
    }

    /// Sets the sample rate used by every call that does not specify its own.
    ///
    /// # Errors
    ///
    /// If `sample_rate` is not within `(0, 1]`, an error is returned and the current rate is kept.
    pub fn set_global_sample_rate(&self, sample_rate: f64) -> Result<(), MonitorError> {
        let sample_rate = validate_sample_rate(sample_rate)?;
        self.global_sample_rate.store(sample_rate.to_bits(), Ordering::Release);
        debug!(sample_rate, "Updated global sample rate.");
        Ok(())
    }

    /// Returns the sample rate used by every call that does not specify its own.
    pub fn global_sample_rate(&self) -> f64 {
        f64::from_bits(self.global_sample_rate.load(Ordering::Acquire))
    }

    fn effective_sample_rate(&self, sample_rate: Option<f64>) -> f64 {
        sample_rate.unwrap_or_else(|| self.global_sample_rate())
    }

    /// Increments the "actor restarts" counter.
    pub fn increment_actor_restart(&self, context: Option<&dyn MonitoringContext>) {
        self.increment_counter(names::ACTOR_RESTARTS, 1, None, context);
    }

    /// Increments the "actors created" counter.
    pub fn increment_actor_created(&self, context: Option<&dyn MonitoringContext>) {
        self.increment_counter(names::ACTORS_CREATED, 1, None, context);
    }

    /// Increments the "actors stopped" counter.
    pub fn increment_actor_stopped(&self, context: Option<&dyn MonitoringContext>) {
        self.increment_counter(names::ACTORS_STOPPED, 1, None, context);
    }

    /// Increments the "messages received" counter.
    pub fn increment_messages_received(&self, context: Option<&dyn MonitoringContext>) {
        self.increment_counter(names::RECEIVED_MESSAGES, 1, None, context);
    }

    /// Increments the "unhandled messages" counter.
    pub fn increment_unhandled_message(&self, context: Option<&dyn MonitoringContext>) {
        self.increment_counter(names::UNHANDLED_MESSAGES, 1, None, context);
    }

    /// Increments the "dead letters" counter.
    pub fn increment_dead_letters(&self, context: Option<&dyn MonitoringContext>) {
        self.increment_counter(names::DEAD_LETTERS, 1, None, context);
    }

    /// Increments the "errors logged" counter.
    pub fn increment_errors_logged(&self, context: Option<&dyn MonitoringContext>) {
        self.increment_counter(names::ERROR_MESSAGES, 1, None, context);
    }

    /// Increments the "warnings logged" counter.
    pub fn increment_warnings_logged(&self, context: Option<&dyn MonitoringContext>) {
        self.increment_counter(names::WARNING_MESSAGES, 1, None, context);
    }

    /// Increments the "debugs logged" counter.
    pub fn increment_debugs_logged(&self, context: Option<&dyn MonitoringContext>) {
        self.increment_counter(names::DEBUG_MESSAGES, 1, None, context);
    }

    /// Increments the "infos logged" counter.
    pub fn increment_infos_logged(&self, context: Option<&dyn MonitoringContext>) {
        self.increment_counter(names::INFO_MESSAGES, 1, None, context);
    }

    /// Increments a counter by `value`.
    ///
    /// When `sample_rate` is `None`, the global sample rate is used.
    pub fn increment_counter(
        &self,
        metric_name: &str,
        value: i64,
        sample_rate: Option<f64>,
        context: Option<&dyn MonitoringContext>,
    ) {
        let sample_rate = self.effective_sample_rate(sample_rate);
        self.registry.broadcast_counter(metric_name, value, sample_rate);
        if let Some(context) = context {
            self.registry.broadcast_counter(&scoped_name(context, metric_name), value, sample_rate);
        }
    }

    /// Records the elapsed time of an operation, in milliseconds.
    ///
    /// When `sample_rate` is `None`, the global sample rate is used.
    pub fn timing(
        &self,
        metric_name: &str,
        elapsed_ms: u64,
        sample_rate: Option<f64>,
        context: Option<&dyn MonitoringContext>,
    ) {
        let sample_rate = self.effective_sample_rate(sample_rate);
        self.registry.broadcast_timing(metric_name, elapsed_ms, sample_rate);
        if let Some(context) = context {
            self.registry.broadcast_timing(&scoped_name(context, metric_name), elapsed_ms, sample_rate);
        }
    }

    /// Sets a gauge, used for arbitrary non-counter measurements such as message sizes.
    ///
    /// When `sample_rate` is `None`, the global sample rate is used.
    pub fn gauge(
        &self,
        metric_name: &str,
        value: i64,
        sample_rate: Option<f64>,
        context: Option<&dyn MonitoringContext>,
    ) {
        let sample_rate = self.effective_sample_rate(sample_rate);
        self.registry.broadcast_gauge(metric_name, value, sample_rate);
        if let Some(context) = context {
            self.registry.broadcast_gauge(&scoped_name(context, metric_name), value, sample_rate);
        }
    }
}

impl Default for ActorMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for an [`ActorMonitor`].
#[derive(Default)]
pub struct ActorMonitorBuilder {
    global_sample_rate: Option<f64>,
    clients: Vec<Arc<dyn MonitoringClient>>,
}

impl ActorMonitorBuilder {
    /// Sets the sample rate used by every call that does not specify its own.
    ///
    /// Defaults to 1.0.
    #[must_use]
    pub fn with_global_sample_rate(mut self, sample_rate: f64) -> Self {
        self.global_sample_rate = Some(sample_rate);
        self
    }

    /// Adds a monitoring client to register once the monitor is built.
    #[must_use]
    pub fn with_monitor(mut self, client: Arc<dyn MonitoringClient>) -> Self {
        self.clients.push(client);
        self
    }

    /// Builds the monitor, registering all configured clients.
    ///
    /// # Errors
    ///
    /// If the configured sample rate is not within `(0, 1]`, or if two configured clients share the same identity, an
    /// error is returned.
    pub fn build(self) -> Result<ActorMonitor, MonitorError> {
        let monitor = ActorMonitor::new();
        if let Some(sample_rate) = self.global_sample_rate {
            monitor.set_global_sample_rate(sample_rate)?;
        }

        for client in self.clients {
            let client_id = client.client_id();
            if !monitor.register_monitor(client) {
                return Err(MonitorError::DuplicateClient(client_id));
            }
        }

        Ok(monitor)
    }
}
