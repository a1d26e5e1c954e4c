use actor_monitoring::{ClientError, ClientId, DisposeGuard, MonitoringClient};
use metrics::{counter, gauge, histogram, Label};
use tracing::debug;

use crate::builder::MetricsBridgeBuilder;

/// Identity shared by every bridge monitor, so readings are forwarded to the `metrics` facade at most once.
pub const METRICS_BRIDGE_CLIENT_ID: ClientId = ClientId::new(0xb5b9_6e2c_6d65_46f5);

/// A monitoring client that forwards every update to the `metrics` facade.
///
/// Readings go to whichever recorder is current on the reporting thread: the thread-local recorder if one is set, or
/// else the global recorder. Aggregation and sampling are left to that recorder, so the sample rate of a reading is
/// ignored.
///
/// | update  | `metrics` call                            |
/// |---------|-------------------------------------------|
/// | counter | `counter!(name).increment(delta)`         |
/// | timing  | `histogram!(name).record(milliseconds)`   |
/// | gauge   | `gauge!(name).set(value)`                 |
///
/// `metrics` counters only go up, so counter updates with a negative delta are rejected.
#[derive(Debug)]
pub struct MetricsBridgeMonitor {
    prefix: Option<String>,
    global_labels: Vec<Label>,
    guard: DisposeGuard,
}

impl MetricsBridgeMonitor {
    pub(crate) fn new(prefix: Option<String>, global_labels: Vec<Label>) -> Self {
        MetricsBridgeMonitor { prefix, global_labels, guard: DisposeGuard::new() }
    }

    /// Creates a [`MetricsBridgeBuilder`] for configuring a monitor.
    pub fn builder() -> MetricsBridgeBuilder {
        MetricsBridgeBuilder::default()
    }

    fn key_name(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}.{}", prefix, name),
            None => name.to_owned(),
        }
    }
}

impl MonitoringClient for MetricsBridgeMonitor {
    fn update_counter(&self, name: &str, delta: i64, _sample_rate: f64) -> Result<(), ClientError> {
        self.guard.ensure_active()?;
        let delta = u64::try_from(delta).map_err(|_| ClientError::Unsupported {
            reason: format!("counter '{}' cannot be decremented (delta {})", name, delta),
        })?;

        counter!(self.key_name(name), self.global_labels.clone()).increment(delta);
        Ok(())
    }

    fn update_timing(&self, name: &str, elapsed_ms: u64, _sample_rate: f64) -> Result<(), ClientError> {
        self.guard.ensure_active()?;
        histogram!(self.key_name(name), self.global_labels.clone()).record(elapsed_ms as f64);
        Ok(())
    }

    fn update_gauge(&self, name: &str, value: i64, _sample_rate: f64) -> Result<(), ClientError> {
        self.guard.ensure_active()?;
        gauge!(self.key_name(name), self.global_labels.clone()).set(value as f64);
        Ok(())
    }

    fn client_id(&self) -> ClientId {
        METRICS_BRIDGE_CLIENT_ID
    }

    fn dispose(&self) {
        self.guard.dispose(|| debug!("Metrics bridge monitor disposed."));
    }

    fn is_disposed(&self) -> bool {
        self.guard.is_disposed()
    }
}
