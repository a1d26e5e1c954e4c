//! Fans actor system metrics out to pluggable monitoring backends.
//!
//! Application code reports counters, timers, and gauges through an [`ActorMonitor`], which broadcasts each reading to
//! every registered [`MonitoringClient`]: a StatsD client, an OS counter subsystem, a telemetry SDK, and so on. Clients
//! can be added and removed at any time, including while other threads are reporting.
//!
//! # Naming
//!
//! Every metric has a global name, such as [`akka.actor.created`][names::ACTORS_CREATED]. When a reading is reported
//! from a context (an actor, identified by its system name and actor type), it is additionally broadcast under the
//! scoped name `<system>.<actor type>.<metric>`, so backends see both the process-wide and the per-actor-type series.
//!
//! ```
//! # use std::sync::Arc;
//! # use actor_monitoring::{ActorContext, ActorMonitor};
//! let monitor = ActorMonitor::new();
//!
//! // Register any number of backends, each implementing `MonitoringClient`:
//! // monitor.register_monitor(Arc::new(my_backend));
//!
//! let context = ActorContext::new("my-system", "WorkerActor");
//!
//! // Broadcasts `akka.actor.created` and `my-system.WorkerActor.akka.actor.created`.
//! monitor.increment_actor_created(Some(&context));
//!
//! // Custom metrics, with an explicit sample rate or the monitor's global default.
//! monitor.timing("worker.job.duration", 125, None, Some(&context));
//! monitor.gauge("worker.queue.depth", 42, Some(0.5), None);
//! ```
//!
//! # Failure handling
//!
//! Reporting never fails from the caller's point of view. A client that returns an error or panics while handling an
//! update is logged and skipped, and the remaining clients still receive the update.
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]

mod client;
pub use self::client::{ClientError, ClientId, DisposeGuard, MonitoringClient};

mod events;
pub use self::events::{LifecycleEvent, MonitoredContext, MonitoringEvent};

mod monitor;
pub use self::monitor::{ActorMonitor, ActorMonitorBuilder, MonitorError};

pub mod names;
pub use self::names::{scoped_name, ActorContext, MonitoringContext};

mod registry;
pub use self::registry::MonitorRegistry;

#[cfg(test)]
mod test_util;
