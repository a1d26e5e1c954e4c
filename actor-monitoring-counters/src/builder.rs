use std::sync::Arc;

use actor_monitoring::names::BUILT_IN_COUNTERS;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    category::{CategoryError, CategoryRegistrar, InMemoryCategories},
    custom::CustomMetrics,
    declared::{DeclareError, DeclaredMetrics},
    metric::{CounterMetric, GaugeMetric, Metric, TimerMetric},
    monitor::CountersMonitor,
};

/// Category that holds the counters unless configured otherwise.
pub const DEFAULT_CATEGORY_NAME: &str = "Akka";

/// Errors that could occur while building a counters monitor.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The configured metrics could not be declared.
    #[error(transparent)]
    InvalidMetric(#[from] DeclareError),

    /// The counter category could not be created.
    #[error(transparent)]
    Category(#[from] CategoryError),
}

/// Builder for a [`CountersMonitor`].
pub struct CountersMonitorBuilder {
    category_name: String,
    custom_metrics: CustomMetrics,
    registrar: Option<Arc<dyn CategoryRegistrar>>,
}

impl CountersMonitorBuilder {
    /// Set the name of the category holding the counters.
    ///
    /// Defaults to `"Akka"`.
    #[must_use]
    pub fn with_category_name<N: Into<String>>(mut self, name: N) -> Self {
        self.category_name = name.into();
        self
    }

    /// Set the custom metrics to declare in addition to the built-in counters.
    ///
    /// Defaults to no custom metrics.
    #[must_use]
    pub fn with_custom_metrics(mut self, custom_metrics: CustomMetrics) -> Self {
        self.custom_metrics = custom_metrics;
        self
    }

    /// Set the counter subsystem the category is created in.
    ///
    /// Defaults to a fresh [`InMemoryCategories`].
    #[must_use]
    pub fn with_registrar(mut self, registrar: Arc<dyn CategoryRegistrar>) -> Self {
        self.registrar = Some(registrar);
        self
    }

    /// Builds the monitor, creating its category if it does not exist yet.
    ///
    /// An existing category is reused as-is, even if it was created with a different set of counters.
    ///
    /// # Errors
    ///
    /// If a custom metric cannot be declared next to the built-in counters and the other custom metrics (empty,
    /// duplicate, or ambiguous names), or the category cannot be created, an error is returned.
    pub fn build(self) -> Result<CountersMonitor, BuildError> {
        let mut metrics = DeclaredMetrics::new();
        for name in BUILT_IN_COUNTERS {
            metrics.declare(name, Metric::Counter(CounterMetric::new()))?;
        }
        for name in self.custom_metrics.counters {
            metrics.declare(name, Metric::Counter(CounterMetric::new()))?;
        }
        for name in self.custom_metrics.gauges {
            metrics.declare(name, Metric::Gauge(GaugeMetric::new()))?;
        }
        for name in self.custom_metrics.timers {
            metrics.declare(name, Metric::Timer(TimerMetric::new()))?;
        }

        let registrar = self.registrar.unwrap_or_else(|| Arc::new(InMemoryCategories::new()));
        if registrar.category_exists(&self.category_name) {
            debug!(category = %self.category_name, "Counter category already exists, reusing it.");
        } else {
            let counters = metrics
                .iter()
                .flat_map(|(name, metric)| metric.definitions(name))
                .collect::<Vec<_>>();

            match registrar.create_category(&self.category_name, &counters) {
                Ok(()) => {
                    info!(category = %self.category_name, counters = counters.len(), "Created counter category.")
                }
                Err(CategoryError::AlreadyExists(_)) => {
                    debug!(category = %self.category_name, "Counter category was created concurrently, reusing it.")
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(CountersMonitor::new(self.category_name, metrics))
    }
}

impl Default for CountersMonitorBuilder {
    fn default() -> Self {
        CountersMonitorBuilder {
            category_name: DEFAULT_CATEGORY_NAME.to_string(),
            custom_metrics: CustomMetrics::default(),
            registrar: None,
        }
    }
}
