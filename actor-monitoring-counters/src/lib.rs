//! A monitoring backend that records actor metrics into a category of pre-declared counters.
//!
//! Operating-system counter subsystems only accept updates for counters declared up front, inside a named category.
//! [`CountersMonitor`] declares the built-in actor counters plus any [`CustomMetrics`], creates the category through a
//! [`CategoryRegistrar`] if it does not exist yet, and then maps every reading it receives onto a declared counter:
//!
//! - `akka.actor.created` updates the `_Total` instance of the `akka.actor.created` counter.
//! - `my-system.WorkerActor.akka.actor.created` updates its `my-system.WorkerActor` instance.
//!
//! ```
//! # use std::sync::Arc;
//! # use actor_monitoring::ActorMonitor;
//! # use actor_monitoring_counters::{CountersMonitor, CustomMetrics};
//! let counters = CountersMonitor::builder()
//!     .with_custom_metrics(CustomMetrics::new().with_timer("worker.job.duration"))
//!     .build()
//!     .expect("failed to build counters monitor");
//!
//! let monitor = ActorMonitor::new();
//! monitor.register_monitor(Arc::new(counters));
//! ```
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]

mod builder;
pub use self::builder::{BuildError, CountersMonitorBuilder, DEFAULT_CATEGORY_NAME};

mod category;
pub use self::category::{
    CategoryError, CategoryRegistrar, CounterDefinition, CounterKind, InMemoryCategories,
};

mod custom;
pub use self::custom::CustomMetrics;

mod declared;
pub use self::declared::{DeclareError, DeclaredMetrics, Resolved, AGGREGATE_INSTANCE};

mod metric;
pub use self::metric::TimerReading;

mod monitor;
pub use self::monitor::{CountersMonitor, COUNTERS_CLIENT_ID};
