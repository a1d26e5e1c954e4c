use metrics::Label;

use crate::monitor::MetricsBridgeMonitor;

/// Builder for a [`MetricsBridgeMonitor`].
#[derive(Default)]
pub struct MetricsBridgeBuilder {
    prefix: Option<String>,
    global_labels: Vec<Label>,
}

impl MetricsBridgeBuilder {
    /// Set the prefix prepended, with a separating dot, to every metric name.
    ///
    /// An empty prefix is the same as no prefix.
    ///
    /// Defaults to no prefix.
    #[must_use]
    pub fn with_prefix<P: Into<String>>(mut self, prefix: P) -> Self {
        let prefix = prefix.into();
        self.prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }

    /// Adds a label attached to every metric.
    ///
    /// Setting the same key again replaces its value.
    #[must_use]
    pub fn with_global_label<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let label = Label::new(key.into(), value.into());
        self.global_labels.retain(|existing| existing.key() != label.key());
        self.global_labels.push(label);
        self
    }

    /// Builds the monitor.
    pub fn build(self) -> MetricsBridgeMonitor {
        MetricsBridgeMonitor::new(self.prefix, self.global_labels)
    }
}
