use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicI64, AtomicU64, Ordering},
        Arc,
    },
};

use parking_lot::RwLock;

use crate::category::{CounterDefinition, CounterKind};

/// Per-instance storage of a declared metric, created on first use.
///
/// Lookups take the read lock. On a miss, the write lock is taken and the map checked again before inserting, so
/// concurrent first updates for the same instance all end up sharing one storage slot.
#[derive(Debug)]
pub(crate) struct InstanceMap<T> {
    instances: RwLock<HashMap<String, Arc<T>>>,
}

impl<T: Default> InstanceMap<T> {
    pub fn new() -> Self {
        InstanceMap { instances: RwLock::new(HashMap::new()) }
    }

    pub fn get_or_create(&self, instance: &str) -> Arc<T> {
        if let Some(storage) = self.instances.read().get(instance) {
            return Arc::clone(storage);
        }

        let mut instances = self.instances.write();
        Arc::clone(instances.entry(instance.to_owned()).or_default())
    }

    pub fn get(&self, instance: &str) -> Option<Arc<T>> {
        self.instances.read().get(instance).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names = self.instances.read().keys().cloned().collect::<Vec<_>>();
        names.sort();
        names
    }
}

/// Per-instance storage of a counter.
#[derive(Debug, Default)]
pub(crate) struct CounterStorage {
    items: AtomicI64,
    rate: AtomicI64,
}

/// Per-instance storage of a timer.
#[derive(Debug, Default)]
pub(crate) struct TimerStorage {
    total_ms: AtomicU64,
    samples: AtomicU64,
}

/// Accumulated readings of a timer instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimerReading {
    /// Sum of every recorded timing, in milliseconds.
    pub total_ms: u64,
    /// Number of recorded timings.
    pub samples: u64,
}

impl TimerReading {
    /// Average of the recorded timings, in milliseconds, or `None` if nothing was recorded.
    pub fn average_ms(&self) -> Option<f64> {
        if self.samples == 0 {
            None
        } else {
            Some(self.total_ms as f64 / self.samples as f64)
        }
    }
}

/// A declared counter: a running total plus a rate-of-change series fed by the same deltas.
#[derive(Debug)]
pub(crate) struct CounterMetric {
    instances: InstanceMap<CounterStorage>,
}

impl CounterMetric {
    pub fn new() -> Self {
        CounterMetric { instances: InstanceMap::new() }
    }

    pub fn increment(&self, instance: &str, delta: i64) {
        let storage = self.instances.get_or_create(instance);
        storage.items.fetch_add(delta, Ordering::Relaxed);
        storage.rate.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn value(&self, instance: &str) -> Option<i64> {
        self.instances.get(instance).map(|storage| storage.items.load(Ordering::Relaxed))
    }

    pub fn rate(&self, instance: &str) -> Option<i64> {
        self.instances.get(instance).map(|storage| storage.rate.load(Ordering::Relaxed))
    }
}

/// A declared gauge holding the last value set.
#[derive(Debug)]
pub(crate) struct GaugeMetric {
    instances: InstanceMap<AtomicI64>,
}

impl GaugeMetric {
    pub fn new() -> Self {
        GaugeMetric { instances: InstanceMap::new() }
    }

    pub fn set(&self, instance: &str, value: i64) {
        self.instances.get_or_create(instance).store(value, Ordering::Relaxed);
    }

    pub fn value(&self, instance: &str) -> Option<i64> {
        self.instances.get(instance).map(|storage| storage.load(Ordering::Relaxed))
    }
}

/// A declared timer: an average of timings over a base count of samples.
#[derive(Debug)]
pub(crate) struct TimerMetric {
    instances: InstanceMap<TimerStorage>,
}

impl TimerMetric {
    pub fn new() -> Self {
        TimerMetric { instances: InstanceMap::new() }
    }

    pub fn record(&self, instance: &str, elapsed_ms: u64) {
        let storage = self.instances.get_or_create(instance);
        storage.total_ms.fetch_add(elapsed_ms, Ordering::Relaxed);
        storage.samples.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reading(&self, instance: &str) -> Option<TimerReading> {
        self.instances.get(instance).map(|storage| TimerReading {
            total_ms: storage.total_ms.load(Ordering::Relaxed),
            samples: storage.samples.load(Ordering::Relaxed),
        })
    }
}

/// A declared metric of any kind.
#[derive(Debug)]
pub(crate) enum Metric {
    Counter(CounterMetric),
    Gauge(GaugeMetric),
    Timer(TimerMetric),
}

impl Metric {
    /// Counter definitions the category needs for this metric.
    pub fn definitions(&self, name: &str) -> Vec<CounterDefinition> {
        match self {
            Metric::Counter(_) => vec![
                CounterDefinition::new(name, CounterKind::NumberOfItems),
                CounterDefinition::new(format!("{} /sec", name), CounterKind::RateOfCountsPerSecond),
            ],
            Metric::Gauge(_) => vec![CounterDefinition::new(name, CounterKind::NumberOfItems)],
            Metric::Timer(_) => vec![
                CounterDefinition::new(name, CounterKind::AverageTimer),
                CounterDefinition::new(format!("{}Base", name), CounterKind::AverageBase),
            ],
        }
    }

    pub fn instances(&self) -> Vec<String> {
        match self {
            Metric::Counter(counter) => counter.instances.names(),
            Metric::Gauge(gauge) => gauge.instances.names(),
            Metric::Timer(timer) => timer.instances.names(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Metric::Counter(_) => "counter",
            Metric::Gauge(_) => "gauge",
            Metric::Timer(_) => "timer",
        }
    }
}
