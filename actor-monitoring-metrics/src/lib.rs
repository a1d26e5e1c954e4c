//! An actor-monitoring backend that forwards metrics to the [`metrics`] facade.
//!
//! This lets actor metrics reach any exporter built for `metrics`, such as Prometheus or DogStatsD, alongside the rest
//! of an application's metrics.
//!
//! ```
//! # use std::sync::Arc;
//! # use actor_monitoring::ActorMonitor;
//! # use actor_monitoring_metrics::MetricsBridgeMonitor;
//! let bridge = MetricsBridgeMonitor::builder()
//!     .with_prefix("my-app")
//!     .with_global_label("service", "orders")
//!     .build();
//!
//! let monitor = ActorMonitor::new();
//! monitor.register_monitor(Arc::new(bridge));
//! ```
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]

mod builder;
pub use self::builder::MetricsBridgeBuilder;

mod monitor;
pub use self::monitor::{MetricsBridgeMonitor, METRICS_BRIDGE_CLIENT_ID};
