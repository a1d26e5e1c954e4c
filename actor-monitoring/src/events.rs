//! Routing of actor system events to the built-in counters.
//!
//! The host runtime owns the actual event stream and actor lifecycle. It hands each notification to
//! [`ActorMonitor::record_event`] or [`ActorMonitor::record_lifecycle`], and actors that can reach their monitor get
//! the shorthand methods of [`MonitoredContext`].

use crate::{monitor::ActorMonitor, names::MonitoringContext};

/// A notification from the actor system's event stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MonitoringEvent {
    /// A debug-level log event.
    Debug,
    /// An info-level log event.
    Info,
    /// A warning-level log event.
    Warning,
    /// An error-level log event.
    Error,
    /// A message could not be delivered.
    DeadLetter,
    /// A message was not handled by its recipient.
    Unhandled,
}

/// A change in an actor's lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// The actor was created.
    Created,
    /// The actor was restarted.
    Restarted,
    /// The actor was stopped.
    Stopped,
    /// The actor received a message.
    MessageReceived,
}

impl ActorMonitor {
    /// Records an event-stream notification.
    ///
    /// Event-stream notifications carry no actor context, so only the global counter is updated.
    pub fn record_event(&self, event: MonitoringEvent) {
        match event {
            MonitoringEvent::Debug => self.increment_debugs_logged(None),
            MonitoringEvent::Info => self.increment_infos_logged(None),
            MonitoringEvent::Warning => self.increment_warnings_logged(None),
            MonitoringEvent::Error => self.increment_errors_logged(None),
            MonitoringEvent::DeadLetter => self.increment_dead_letters(None),
            MonitoringEvent::Unhandled => self.increment_unhandled_message(None),
        }
    }

    /// Records a lifecycle change of the actor described by `context`.
    pub fn record_lifecycle(&self, event: LifecycleEvent, context: &dyn MonitoringContext) {
        let context = Some(context);
        match event {
            LifecycleEvent::Created => self.increment_actor_created(context),
            LifecycleEvent::Restarted => self.increment_actor_restart(context),
            LifecycleEvent::Stopped => self.increment_actor_stopped(context),
            LifecycleEvent::MessageReceived => self.increment_messages_received(context),
        }
    }
}

/// A reporting context that knows the monitor of its actor system.
///
/// Every method reports through [`MonitoredContext::monitor`] with `self` as the context, so the reading is recorded
/// both globally and for this context.
pub trait MonitoredContext: MonitoringContext + Sized {
    /// The monitor of the actor system this context belongs to.
    fn monitor(&self) -> &ActorMonitor;

    /// Increments the "actor restarts" counter.
    fn increment_actor_restart(&self) {
        self.monitor().increment_actor_restart(Some(self));
    }

    /// Increments the "actors created" counter.
    fn increment_actor_created(&self) {
        self.monitor().increment_actor_created(Some(self));
    }

    /// Increments the "actors stopped" counter.
    fn increment_actor_stopped(&self) {
        self.monitor().increment_actor_stopped(Some(self));
    }

    /// Increments the "messages received" counter.
    fn increment_messages_received(&self) {
        self.monitor().increment_messages_received(Some(self));
    }

    /// Increments the "unhandled messages" counter.
    fn increment_unhandled_message(&self) {
        self.monitor().increment_unhandled_message(Some(self));
    }

    /// Increments the "dead letters" counter.
    fn increment_dead_letters(&self) {
        self.monitor().increment_dead_letters(Some(self));
    }

    /// Increments the "errors logged" counter.
    fn increment_errors_logged(&self) {
        self.monitor().increment_errors_logged(Some(self));
    }

    /// Increments the "warnings logged" counter.
    fn increment_warnings_logged(&self) {
        self.monitor().increment_warnings_logged(Some(self));
    }

    /// Increments the "debugs logged" counter.
    fn increment_debugs_logged(&self) {
        self.monitor().increment_debugs_logged(Some(self));
    }

    /// Increments the "infos logged" counter.
    fn increment_infos_logged(&self) {
        self.monitor().increment_infos_logged(Some(self));
    }

    /// Increments a custom counter at the global sample rate.
    fn increment_counter(&self, metric_name: &str, value: i64) {
        self.monitor().increment_counter(metric_name, value, None, Some(self));
    }

    /// Records a custom timing, in milliseconds, at the global sample rate.
    fn timing(&self, metric_name: &str, elapsed_ms: u64) {
        self.monitor().timing(metric_name, elapsed_ms, None, Some(self));
    }

    /// Sets a custom gauge at the global sample rate.
    fn gauge(&self, metric_name: &str, value: i64) {
        self.monitor().gauge(metric_name, value, None, Some(self));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{LifecycleEvent, MonitoredContext, MonitoringEvent};
    use crate::{
        client::ClientId,
        monitor::ActorMonitor,
        names::{self, ActorContext, MonitoringContext},
        test_util::{RecordedUpdate, RecordingClient},
    };

    struct WorkerContext<'a> {
        monitor: &'a ActorMonitor,
    }

    impl MonitoringContext for WorkerContext<'_> {
        fn system_name(&self) -> &str {
            "sys"
        }

        fn actor_type(&self) -> &str {
            "Worker"
        }
    }

    impl MonitoredContext for WorkerContext<'_> {
        fn monitor(&self) -> &ActorMonitor {
            self.monitor
        }
    }

    fn counter(name: &str) -> RecordedUpdate {
        RecordedUpdate::Counter(name.to_string(), 1, 1.0)
    }

    #[test]
    fn events_update_global_counters() {
        let monitor = ActorMonitor::new();
        let client = Arc::new(RecordingClient::new(ClientId::new(1)));
        monitor.register_monitor(client.clone());

        for event in [
            MonitoringEvent::Debug,
            MonitoringEvent::Info,
            MonitoringEvent::Warning,
            MonitoringEvent::Error,
            MonitoringEvent::DeadLetter,
            MonitoringEvent::Unhandled,
        ] {
            monitor.record_event(event);
        }

        assert_eq!(
            client.updates(),
            vec![
                counter(names::DEBUG_MESSAGES),
                counter(names::INFO_MESSAGES),
                counter(names::WARNING_MESSAGES),
                counter(names::ERROR_MESSAGES),
                counter(names::DEAD_LETTERS),
                counter(names::UNHANDLED_MESSAGES),
            ]
        );
    }

    #[test]
    fn lifecycle_updates_global_and_scoped_counters() {
        let monitor = ActorMonitor::new();
        let client = Arc::new(RecordingClient::new(ClientId::new(1)));
        monitor.register_monitor(client.clone());

        let context = ActorContext::new("sys", "Greeter");
        monitor.record_lifecycle(LifecycleEvent::Restarted, &context);

        assert_eq!(
            client.updates(),
            vec![counter(names::ACTOR_RESTARTS), counter("sys.Greeter.akka.actor.restarts")]
        );
    }

    #[test]
    fn monitored_context_reports_with_itself() {
        let monitor = ActorMonitor::new();
        let client = Arc::new(RecordingClient::new(ClientId::new(1)));
        monitor.register_monitor(client.clone());

        let context = WorkerContext { monitor: &monitor };
        context.increment_messages_received();
        context.timing("work.duration", 15);

        assert_eq!(
            client.updates(),
            vec![
                counter(names::RECEIVED_MESSAGES),
                counter("sys.Worker.akka.messages.received"),
                RecordedUpdate::Timing("work.duration".to_string(), 15, 1.0),
                RecordedUpdate::Timing("sys.Worker.work.duration".to_string(), 15, 1.0),
            ]
        );
    }
}
