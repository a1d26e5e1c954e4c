//! An actor-monitoring backend that sends metrics to a StatsD server.
//!
//! Each update becomes one StatsD line, sent as a single UDP datagram:
//!
//! - counters: `name:delta|c`, plus `|@rate` when sampled
//! - timings: `name:milliseconds|ms`, plus `|@rate` when sampled
//! - gauges: `name:value|g`
//!
//! Names are prefixed with `<prefix>.` when a prefix is configured.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use actor_monitoring::ActorMonitor;
//! # use actor_monitoring_statsd::StatsDMonitor;
//! let statsd = StatsDMonitor::builder()
//!     .with_remote_address("localhost:8125")
//!     .expect("failed to parse remote address")
//!     .with_prefix("my-app")
//!     .build()
//!     .expect("failed to build StatsD monitor");
//!
//! let monitor = ActorMonitor::new();
//! monitor.register_monitor(Arc::new(statsd));
//! ```
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]

mod builder;
pub use self::builder::{BuildError, StatsDBuilder};

mod monitor;
pub use self::monitor::{StatsDMonitor, STATSD_CLIENT_ID};

mod sampler;
mod writer;
