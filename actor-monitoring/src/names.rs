//! Names of the built-in metrics and the scheme for scoping a metric to a reporting context.

/// Number of actor restarts.
pub const ACTOR_RESTARTS: &str = "akka.actor.restarts";
/// Number of actors created.
pub const ACTORS_CREATED: &str = "akka.actor.created";
/// Number of actors stopped.
pub const ACTORS_STOPPED: &str = "akka.actor.stopped";

/// Number of messages received.
pub const RECEIVED_MESSAGES: &str = "akka.messages.received";
/// Number of dead letters.
pub const DEAD_LETTERS: &str = "akka.messages.deadletters";
/// Number of unhandled messages.
pub const UNHANDLED_MESSAGES: &str = "akka.messages.unhandled";

/// Number of debug log events.
pub const DEBUG_MESSAGES: &str = "akka.logging.debug";
/// Number of info log events.
pub const INFO_MESSAGES: &str = "akka.logging.info";
/// Number of warning log events.
pub const WARNING_MESSAGES: &str = "akka.logging.warning";
/// Number of error log events.
pub const ERROR_MESSAGES: &str = "akka.logging.error";

/// Every built-in counter, in declaration order.
pub const BUILT_IN_COUNTERS: [&str; 10] = [
    ACTOR_RESTARTS,
    ACTORS_CREATED,
    ACTORS_STOPPED,
    RECEIVED_MESSAGES,
    DEAD_LETTERS,
    UNHANDLED_MESSAGES,
    DEBUG_MESSAGES,
    INFO_MESSAGES,
    WARNING_MESSAGES,
    ERROR_MESSAGES,
];

/// Separator between the segments of a scoped metric name.
pub const SEPARATOR: char = '.';

/// The context a metric is reported from.
///
/// This is usually an actor: the system it lives in plus the type of the actor.
pub trait MonitoringContext {
    /// Name of the owning actor system.
    fn system_name(&self) -> &str;

    /// Type of the reporting actor.
    fn actor_type(&self) -> &str;
}

/// An owned [`MonitoringContext`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActorContext {
    system_name: String,
    actor_type: String,
}

impl ActorContext {
    /// Creates a new `ActorContext`.
    pub fn new<S, T>(system_name: S, actor_type: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        ActorContext { system_name: system_name.into(), actor_type: actor_type.into() }
    }
}

impl MonitoringContext for ActorContext {
    fn system_name(&self) -> &str {
        &self.system_name
    }

    fn actor_type(&self) -> &str {
        &self.actor_type
    }
}

/// Builds the name of `metric_name` as reported from `context`.
///
/// The result is `<system>.<actor type>.<metric>`, and so always ends with `.<metric>`. Backends that need to recover
/// the reporting context from a flat name rely on that suffix.
///
/// Distinct contexts map to distinct names only as long as system names and actor types contain no `.`: the contexts
/// `("a.b", "c")` and `("a", "b.c")` both produce `a.b.c.<metric>`.
pub fn scoped_name<C>(context: &C, metric_name: &str) -> String
where
    C: MonitoringContext + ?Sized,
{
    let system = context.system_name();
    let actor_type = context.actor_type();

    let mut name = String::with_capacity(system.len() + actor_type.len() + metric_name.len() + 2);
    name.push_str(system);
    name.push(SEPARATOR);
    name.push_str(actor_type);
    name.push(SEPARATOR);
    name.push_str(metric_name);
    name
}
