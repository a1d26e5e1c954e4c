use indexmap::IndexSet;

/// Application-defined metrics to declare alongside the built-in counters.
///
/// With the `serde` feature enabled, this can be read straight from a configuration file; every list is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CustomMetrics {
    /// Names of custom counters.
    pub counters: IndexSet<String>,
    /// Names of custom gauges.
    pub gauges: IndexSet<String>,
    /// Names of custom timers.
    pub timers: IndexSet<String>,
}

impl CustomMetrics {
    /// Creates an empty set of custom metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom counter.
    #[must_use]
    pub fn with_counter<N: Into<String>>(mut self, name: N) -> Self {
        self.counters.insert(name.into());
        self
    }

    /// Adds a custom gauge.
    #[must_use]
    pub fn with_gauge<N: Into<String>>(mut self, name: N) -> Self {
        self.gauges.insert(name.into());
        self
    }

    /// Adds a custom timer.
    #[must_use]
    pub fn with_timer<N: Into<String>>(mut self, name: N) -> Self {
        self.timers.insert(name.into());
        self
    }

    /// Returns `true` if no custom metric is configured.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty() && self.gauges.is_empty() && self.timers.is_empty()
    }
}
