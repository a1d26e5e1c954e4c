use actor_monitoring::names::SEPARATOR;
use indexmap::IndexMap;
use thiserror::Error;

/// Instance label for the process-wide aggregate of a metric.
pub const AGGREGATE_INSTANCE: &str = "_Total";

/// Errors that could occur while declaring a metric.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeclareError {
    /// The metric name was empty.
    #[error("metric name must not be empty")]
    EmptyName,

    /// The metric name was already declared.
    #[error("metric '{0}' is declared more than once")]
    Duplicate(String),

    /// One metric name is a scoped suffix of the other, so a scoped name could resolve to either.
    #[error("metric '{name}' is ambiguous with already declared metric '{existing}'")]
    Ambiguous {
        /// The metric being declared.
        name: String,
        /// The previously declared metric it collides with.
        existing: String,
    },
}

/// A metric resolved from a possibly-scoped name.
#[derive(Debug, PartialEq)]
pub struct Resolved<'a, M> {
    /// Declared name of the metric.
    pub name: &'a str,
    /// The declared metric.
    pub metric: &'a M,
    /// The instance the update belongs to: [`AGGREGATE_INSTANCE`] or the scope prefix of the name.
    pub instance: &'a str,
}

// `longer` is `<prefix>.<shorter>` for a non-empty prefix.
fn scope_of<'a>(longer: &'a str, shorter: &str) -> Option<&'a str> {
    longer
        .strip_suffix(shorter)
        .and_then(|prefix| prefix.strip_suffix(SEPARATOR))
        .filter(|scope| !scope.is_empty())
}

/// The set of metrics a backend has declared, indexed by global name.
///
/// Metrics are kept in declaration order, which also fixes the order in which scoped names are matched. Declaration
/// rejects any name that is a scoped suffix of another declared name (or the other way around), such as `foo` and
/// `x.foo`: with both declared, `y.x.foo` could belong to either, so every name resolves to at most one metric.
#[derive(Debug)]
pub struct DeclaredMetrics<M> {
    metrics: IndexMap<String, M>,
}

impl<M> DeclaredMetrics<M> {
    /// Creates an empty set of declared metrics.
    pub fn new() -> Self {
        DeclaredMetrics { metrics: IndexMap::new() }
    }

    /// Declares a metric under the given global name.
    ///
    /// # Errors
    ///
    /// If the name is empty, already declared, or ambiguous with a declared name, an error is returned and the metric
    /// is not declared.
    pub fn declare<N>(&mut self, name: N, metric: M) -> Result<(), DeclareError>
    where
        N: Into<String>,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(DeclareError::EmptyName);
        }

        if self.metrics.contains_key(&name) {
            return Err(DeclareError::Duplicate(name));
        }

        if let Some(existing) = self
            .metrics
            .keys()
            .find(|existing| scope_of(&name, existing).is_some() || scope_of(existing, &name).is_some())
        {
            return Err(DeclareError::Ambiguous { existing: existing.clone(), name });
        }

        self.metrics.insert(name, metric);
        Ok(())
    }

    /// Resolves a metric name to a declared metric and the instance it belongs to.
    ///
    /// A declared global name resolves to its metric with the [`AGGREGATE_INSTANCE`] instance. A scoped name of the
    /// form `<scope>.<declared name>` resolves to the declared metric with `<scope>` as the instance. Anything else is
    /// unknown and resolves to `None`.
    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<Resolved<'a, M>> {
        if let Some((declared, metric)) = self.metrics.get_key_value(name) {
            return Some(Resolved { name: declared, metric, instance: AGGREGATE_INSTANCE });
        }

        self.metrics.iter().find_map(|(declared, metric)| {
            scope_of(name, declared).map(|instance| Resolved { name: declared, metric, instance })
        })
    }

    /// Gets a declared metric by its global name.
    pub fn get(&self, name: &str) -> Option<&M> {
        self.metrics.get(name)
    }

    /// Iterates over the declared metrics in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &M)> {
        self.metrics.iter().map(|(name, metric)| (name.as_str(), metric))
    }

    /// Returns the number of declared metrics.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Returns `true` if no metric has been declared.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl<M> Default for DeclaredMetrics<M> {
    fn default() -> Self {
        Self::new()
    }
}
