use std::{
    sync::{
        atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering},
        Arc, Barrier,
    },
    thread,
};

use actor_monitoring::{
    ActorContext, ActorMonitor, ClientError, ClientId, DisposeGuard, MonitorRegistry,
    MonitoringClient,
};

struct CountingClient {
    id: ClientId,
    counter_total: AtomicI64,
    updates: AtomicUsize,
    dispose_calls: AtomicUsize,
    guard: DisposeGuard,
}

impl CountingClient {
    fn new(id: u64) -> Self {
        CountingClient {
            id: ClientId::new(id),
            counter_total: AtomicI64::new(0),
            updates: AtomicUsize::new(0),
            dispose_calls: AtomicUsize::new(0),
            guard: DisposeGuard::new(),
        }
    }
}

impl MonitoringClient for CountingClient {
    fn update_counter(&self, _: &str, delta: i64, _: f64) -> Result<(), ClientError> {
        self.guard.ensure_active()?;
        self.counter_total.fetch_add(delta, Ordering::SeqCst);
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn update_timing(&self, _: &str, _: u64, _: f64) -> Result<(), ClientError> {
        self.guard.ensure_active()?;
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn update_gauge(&self, _: &str, _: i64, _: f64) -> Result<(), ClientError> {
        self.guard.ensure_active()?;
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn client_id(&self) -> ClientId {
        self.id
    }

    fn dispose(&self) {
        self.dispose_calls.fetch_add(1, Ordering::SeqCst);
        self.guard.dispose(|| {});
    }

    fn is_disposed(&self) -> bool {
        self.guard.is_disposed()
    }
}

#[test]
fn concurrent_registration_keeps_every_client() {
    const THREADS: u64 = 10;
    const PER_THREAD: u64 = 10;

    let registry = Arc::new(MonitorRegistry::new());
    let barrier = Arc::new(Barrier::new(THREADS as usize));

    let handles = (0..THREADS)
        .map(|t| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..PER_THREAD)
                    .filter(|i| registry.add(Arc::new(CountingClient::new(t * PER_THREAD + i))))
                    .count()
            })
        })
        .collect::<Vec<_>>();

    let added: usize = handles.into_iter().map(|h| h.join().expect("thread panicked")).sum();
    assert_eq!(added, 100);
    assert_eq!(registry.len(), 100);
    for id in 0..THREADS * PER_THREAD {
        assert!(registry.contains(ClientId::new(id)));
    }
}

#[test]
fn concurrent_duplicate_registration_admits_one() {
    let registry = Arc::new(MonitorRegistry::new());
    let barrier = Arc::new(Barrier::new(16));

    let handles = (0..16)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.add(Arc::new(CountingClient::new(7)))
            })
        })
        .collect::<Vec<_>>();

    let winners = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .filter(|added| *added)
        .count();
    assert_eq!(winners, 1);
    assert_eq!(registry.len(), 1);
}

#[test]
fn concurrent_reporting_reaches_stable_clients() {
    const THREADS: usize = 8;
    const REPORTS: usize = 500;

    let monitor = Arc::new(ActorMonitor::new());
    let stable = Arc::new(CountingClient::new(1));
    assert!(monitor.register_monitor(stable.clone()));

    let running = Arc::new(AtomicBool::new(true));
    let churn = {
        let monitor = Arc::clone(&monitor);
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut id = 1_000;
            while running.load(Ordering::Acquire) {
                let client = Arc::new(CountingClient::new(id));
                monitor.register_monitor(client.clone());
                monitor.deregister_monitor(&*client);
                id += 1;
            }
        })
    };

    let reporters = (0..THREADS)
        .map(|t| {
            let monitor = Arc::clone(&monitor);
            thread::spawn(move || {
                let context = ActorContext::new("sys", format!("Worker{}", t));
                for _ in 0..REPORTS {
                    monitor.increment_messages_received(Some(&context));
                }
            })
        })
        .collect::<Vec<_>>();

    for reporter in reporters {
        reporter.join().expect("reporter panicked");
    }
    running.store(false, Ordering::Release);
    churn.join().expect("churn thread panicked");

    // Each report is broadcast twice: once globally and once for the context.
    assert_eq!(stable.updates.load(Ordering::SeqCst), THREADS * REPORTS * 2);
    assert_eq!(stable.counter_total.load(Ordering::SeqCst), (THREADS * REPORTS * 2) as i64);
}

#[test]
fn terminate_monitors_disposes_each_client_once() {
    let monitor = ActorMonitor::new();
    let clients = (0..5).map(|id| Arc::new(CountingClient::new(id))).collect::<Vec<_>>();
    for client in &clients {
        assert!(monitor.register_monitor(client.clone()));
    }

    monitor.terminate_monitors();
    monitor.increment_actor_created(None);
    monitor.terminate_monitors();

    for client in &clients {
        assert_eq!(client.dispose_calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.updates.load(Ordering::SeqCst), 0);
        assert!(client.is_disposed());
    }
}
