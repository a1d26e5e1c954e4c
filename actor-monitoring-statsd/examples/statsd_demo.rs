use std::{sync::Arc, thread, time::Duration};

use actor_monitoring::{ActorContext, ActorMonitor, LifecycleEvent};
use actor_monitoring_statsd::StatsDMonitor;
use rand::Rng as _;

fn main() {
    tracing_subscriber::fmt::init();

    let statsd = StatsDMonitor::builder()
        .with_remote_address("localhost:8125")
        .expect("failed to parse remote address")
        .with_prefix("statsd-demo")
        .build()
        .expect("failed to build StatsD monitor");

    let monitor = ActorMonitor::builder()
        .with_global_sample_rate(0.5)
        .with_monitor(Arc::new(statsd))
        .build()
        .expect("failed to build actor monitor");

    let greeter = ActorContext::new("demo-system", "Greeter");
    monitor.record_lifecycle(LifecycleEvent::Created, &greeter);

    // Pretend to handle messages forever, reporting how long each one took.
    let mut rng = rand::rng();
    loop {
        let elapsed_ms = rng.random_range(1..50);
        thread::sleep(Duration::from_millis(elapsed_ms));

        monitor.record_lifecycle(LifecycleEvent::MessageReceived, &greeter);
        monitor.timing("greeter.handle", elapsed_ms, Some(1.0), Some(&greeter));
        monitor.gauge("greeter.mailbox", rng.random_range(0..10), None, Some(&greeter));
    }
}
