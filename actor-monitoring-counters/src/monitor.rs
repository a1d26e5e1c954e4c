use actor_monitoring::{ClientError, ClientId, DisposeGuard, MonitoringClient};
use tracing::{debug, trace};

use crate::{
    builder::CountersMonitorBuilder,
    declared::{DeclaredMetrics, Resolved},
    metric::{Metric, TimerReading},
};

/// Identity shared by every counters monitor: a process has one counter subsystem, so it gets at most one.
pub const COUNTERS_CLIENT_ID: ClientId = ClientId::new(0xf651_b9f8_aa38_45bd);

/// A monitoring client that records into a category of pre-declared counters.
///
/// Only declared metrics are recorded. A reading under a declared name updates the metric's `_Total` instance, and a
/// reading under `<scope>.<declared name>` updates the `<scope>` instance, created on first use. Readings for anything
/// else are dropped.
///
/// Counters keep every update, so the sample rate of a reading is ignored.
#[derive(Debug)]
pub struct CountersMonitor {
    category_name: String,
    metrics: DeclaredMetrics<Metric>,
    guard: DisposeGuard,
}

impl CountersMonitor {
    pub(crate) fn new(category_name: String, metrics: DeclaredMetrics<Metric>) -> Self {
        CountersMonitor { category_name, metrics, guard: DisposeGuard::new() }
    }

    /// Creates a [`CountersMonitorBuilder`] for configuring a monitor.
    pub fn builder() -> CountersMonitorBuilder {
        CountersMonitorBuilder::default()
    }

    /// Name of the category holding the counters.
    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    /// Iterates over the declared metric names, built-in counters first.
    pub fn declared_names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|(name, _)| name)
    }

    /// Current total of a counter instance.
    pub fn counter_value(&self, metric: &str, instance: &str) -> Option<i64> {
        match self.metrics.get(metric)? {
            Metric::Counter(counter) => counter.value(instance),
            _ => None,
        }
    }

    /// Current value of the per-second rate series of a counter instance, before the subsystem divides it by time.
    pub fn rate_value(&self, metric: &str, instance: &str) -> Option<i64> {
        match self.metrics.get(metric)? {
            Metric::Counter(counter) => counter.rate(instance),
            _ => None,
        }
    }

    /// Last value of a gauge instance.
    pub fn gauge_value(&self, metric: &str, instance: &str) -> Option<i64> {
        match self.metrics.get(metric)? {
            Metric::Gauge(gauge) => gauge.value(instance),
            _ => None,
        }
    }

    /// Accumulated readings of a timer instance.
    pub fn timer_value(&self, metric: &str, instance: &str) -> Option<TimerReading> {
        match self.metrics.get(metric)? {
            Metric::Timer(timer) => timer.reading(instance),
            _ => None,
        }
    }

    /// Instances created so far for a metric, sorted by name.
    pub fn instances(&self, metric: &str) -> Vec<String> {
        self.metrics.get(metric).map(Metric::instances).unwrap_or_default()
    }

    fn resolve<'a>(&'a self, name: &'a str, expected: &'static str) -> Option<Resolved<'a, Metric>> {
        let resolved = self.metrics.resolve(name);
        match &resolved {
            None => debug!(metric_name = name, kind = expected, "Dropping reading for undeclared metric."),
            Some(r) if r.metric.kind_name() != expected => {
                debug!(
                    metric_name = name,
                    kind = expected,
                    declared_kind = r.metric.kind_name(),
                    "Dropping reading for metric declared as another kind."
                );
                return None;
            }
            Some(r) => trace!(metric_name = name, instance = r.instance, "Resolved metric."),
        }
        resolved
    }
}

impl MonitoringClient for CountersMonitor {
    fn update_counter(&self, name: &str, delta: i64, _sample_rate: f64) -> Result<(), ClientError> {
        self.guard.ensure_active()?;
        if let Some(Resolved { metric: Metric::Counter(counter), instance, .. }) = self.resolve(name, "counter") {
            counter.increment(instance, delta);
        }
        Ok(())
    }

    fn update_timing(&self, name: &str, elapsed_ms: u64, _sample_rate: f64) -> Result<(), ClientError> {
        self.guard.ensure_active()?;
        if let Some(Resolved { metric: Metric::Timer(timer), instance, .. }) = self.resolve(name, "timer") {
            timer.record(instance, elapsed_ms);
        }
        Ok(())
    }

    fn update_gauge(&self, name: &str, value: i64, _sample_rate: f64) -> Result<(), ClientError> {
        self.guard.ensure_active()?;
        if let Some(Resolved { metric: Metric::Gauge(gauge), instance, .. }) = self.resolve(name, "gauge") {
            gauge.set(instance, value);
        }
        Ok(())
    }

    fn client_id(&self) -> ClientId {
        COUNTERS_CLIENT_ID
    }

    fn dispose(&self) {
        self.guard.dispose(|| debug!(category = %self.category_name, "Counters monitor disposed."));
    }

    fn is_disposed(&self) -> bool {
        self.guard.is_disposed()
    }
}

#[cfg(test)]
mod tests {
    use actor_monitoring::{names, ClientError, MonitoringClient};

    use super::CountersMonitor;
    use crate::{custom::CustomMetrics, declared::AGGREGATE_INSTANCE};

    fn monitor() -> CountersMonitor {
        let custom = CustomMetrics::new()
            .with_counter("jobs.done")
            .with_gauge("queue.depth")
            .with_timer("job.duration");
        CountersMonitor::builder().with_custom_metrics(custom).build().expect("failed to build monitor")
    }

    #[test]
    fn records_global_and_scoped_counters() {
        let monitor = monitor();

        monitor.update_counter(names::ACTORS_CREATED, 1, 1.0).expect("update failed");
        monitor.update_counter(names::ACTORS_CREATED, 1, 1.0).expect("update failed");
        monitor.update_counter("sys.Worker.akka.actor.created", 1, 1.0).expect("update failed");

        assert_eq!(monitor.counter_value(names::ACTORS_CREATED, AGGREGATE_INSTANCE), Some(2));
        assert_eq!(monitor.rate_value(names::ACTORS_CREATED, AGGREGATE_INSTANCE), Some(2));
        assert_eq!(monitor.counter_value(names::ACTORS_CREATED, "sys.Worker"), Some(1));
        assert_eq!(
            monitor.instances(names::ACTORS_CREATED),
            vec![AGGREGATE_INSTANCE.to_string(), "sys.Worker".to_string()]
        );
    }

    #[test]
    fn records_custom_gauges_and_timers() {
        let monitor = monitor();

        monitor.update_gauge("queue.depth", 12, 1.0).expect("update failed");
        monitor.update_gauge("queue.depth", 7, 1.0).expect("update failed");
        monitor.update_timing("sys.Worker.job.duration", 40, 1.0).expect("update failed");
        monitor.update_timing("sys.Worker.job.duration", 20, 1.0).expect("update failed");

        assert_eq!(monitor.gauge_value("queue.depth", AGGREGATE_INSTANCE), Some(7));
        let reading = monitor.timer_value("job.duration", "sys.Worker").expect("timer should have an instance");
        assert_eq!(reading.average_ms(), Some(30.0));
        assert_eq!(monitor.timer_value("job.duration", AGGREGATE_INSTANCE), None);
    }

    #[test]
    fn sample_rate_is_ignored() {
        let monitor = monitor();
        for _ in 0..10 {
            monitor.update_counter("jobs.done", 1, 0.1).expect("update failed");
        }
        assert_eq!(monitor.counter_value("jobs.done", AGGREGATE_INSTANCE), Some(10));
    }

    #[test]
    fn drops_unknown_and_mismatched_names() {
        let monitor = monitor();

        monitor.update_counter("not.declared", 1, 1.0).expect("update failed");
        monitor.update_counter("queue.depth", 1, 1.0).expect("update failed");
        monitor.update_gauge(names::ACTORS_CREATED, 5, 1.0).expect("update failed");

        assert_eq!(monitor.instances("not.declared"), Vec::<String>::new());
        assert_eq!(monitor.gauge_value("queue.depth", AGGREGATE_INSTANCE), None);
        assert_eq!(monitor.counter_value(names::ACTORS_CREATED, AGGREGATE_INSTANCE), None);
    }

    #[test]
    fn rejects_updates_after_dispose() {
        let monitor = monitor();
        assert!(!monitor.is_disposed());

        monitor.dispose();
        monitor.dispose();
        assert!(monitor.is_disposed());
        assert!(matches!(monitor.update_counter("jobs.done", 1, 1.0), Err(ClientError::Disposed)));
        assert_eq!(monitor.counter_value("jobs.done", AGGREGATE_INSTANCE), None);
    }
}
