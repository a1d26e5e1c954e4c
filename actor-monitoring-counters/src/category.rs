use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;

/// Kind of a counter within a category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CounterKind {
    /// A running total, or the last value of a gauge.
    NumberOfItems,
    /// A total sampled as a per-second rate.
    RateOfCountsPerSecond,
    /// Total elapsed time, averaged over a matching [`CounterKind::AverageBase`] counter.
    AverageTimer,
    /// Number of samples behind an [`CounterKind::AverageTimer`] counter.
    AverageBase,
}

/// A counter to be created within a category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterDefinition {
    name: String,
    kind: CounterKind,
}

impl CounterDefinition {
    /// Creates a new `CounterDefinition`.
    pub fn new<N: Into<String>>(name: N, kind: CounterKind) -> Self {
        CounterDefinition { name: name.into(), kind }
    }

    /// Name of the counter.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of the counter.
    pub fn kind(&self) -> CounterKind {
        self.kind
    }
}

/// Errors that could occur while creating a category.
#[derive(Debug, Error)]
pub enum CategoryError {
    /// The category was created by someone else in the meantime.
    #[error("category '{0}' already exists")]
    AlreadyExists(String),

    /// The counter subsystem refused to create the category.
    #[error("failed to create category '{category}': {reason}")]
    Rejected {
        /// The category that could not be created.
        category: String,
        /// Reason given by the counter subsystem.
        reason: String,
    },
}

/// Access to the counter subsystem that holds categories.
///
/// Categories are shared, process-external state: once created, they outlive the monitor that created them.
pub trait CategoryRegistrar: Send + Sync {
    /// Returns `true` if the category already exists.
    fn category_exists(&self, category: &str) -> bool;

    /// Creates a category holding the given counters.
    fn create_category(&self, category: &str, counters: &[CounterDefinition]) -> Result<(), CategoryError>;
}

/// A [`CategoryRegistrar`] that keeps categories in memory.
///
/// This is the registrar used when none is configured, and works anywhere the platform offers no counter subsystem.
#[derive(Debug, Default)]
pub struct InMemoryCategories {
    categories: RwLock<HashMap<String, Vec<CounterDefinition>>>,
}

impl InMemoryCategories {
    /// Creates an empty `InMemoryCategories`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the counters of a category, if it exists.
    pub fn counters(&self, category: &str) -> Option<Vec<CounterDefinition>> {
        self.categories.read().get(category).cloned()
    }
}

impl CategoryRegistrar for InMemoryCategories {
    fn category_exists(&self, category: &str) -> bool {
        self.categories.read().contains_key(category)
    }

    fn create_category(&self, category: &str, counters: &[CounterDefinition]) -> Result<(), CategoryError> {
        let mut categories = self.categories.write();
        if categories.contains_key(category) {
            return Err(CategoryError::AlreadyExists(category.to_owned()));
        }

        categories.insert(category.to_owned(), counters.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CategoryError, CategoryRegistrar, CounterDefinition, CounterKind, InMemoryCategories};

    #[test]
    fn creates_category_once() {
        let categories = InMemoryCategories::new();
        let counters = vec![CounterDefinition::new("jobs", CounterKind::NumberOfItems)];

        assert!(!categories.category_exists("Akka"));
        categories.create_category("Akka", &counters).expect("failed to create category");
        assert!(categories.category_exists("Akka"));
        assert_eq!(categories.counters("Akka"), Some(counters));

        let result = categories.create_category("Akka", &[]);
        assert!(matches!(result, Err(CategoryError::AlreadyExists(name)) if name == "Akka"));
        assert_eq!(categories.counters("Akka").map(|c| c.len()), Some(1));
    }
}
