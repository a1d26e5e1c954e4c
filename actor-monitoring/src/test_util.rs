use std::sync::atomic::{AtomicUsize, Ordering};

use mockall::mock;
use parking_lot::Mutex;

use crate::client::{ClientError, ClientId, DisposeGuard, MonitoringClient};

#[derive(Clone, Debug, PartialEq)]
pub enum RecordedUpdate {
    Counter(String, i64, f64),
    Timing(String, u64, f64),
    Gauge(String, i64, f64),
}

/// A client that records every update it receives.
pub struct RecordingClient {
    id: ClientId,
    updates: Mutex<Vec<RecordedUpdate>>,
    dispose_calls: AtomicUsize,
    guard: DisposeGuard,
    panic_on_update: bool,
    panic_on_dispose: bool,
}

impl RecordingClient {
    pub fn new(id: ClientId) -> Self {
        Self {
            id,
            updates: Mutex::new(Vec::new()),
            dispose_calls: AtomicUsize::new(0),
            guard: DisposeGuard::new(),
            panic_on_update: false,
            panic_on_dispose: false,
        }
    }

    pub fn panic_on_update(mut self) -> Self {
        self.panic_on_update = true;
        self
    }

    pub fn panic_on_dispose(mut self) -> Self {
        self.panic_on_dispose = true;
        self
    }

    pub fn updates(&self) -> Vec<RecordedUpdate> {
        self.updates.lock().clone()
    }

    pub fn dispose_calls(&self) -> usize {
        self.dispose_calls.load(Ordering::SeqCst)
    }

    fn record(&self, update: RecordedUpdate) -> Result<(), ClientError> {
        self.guard.ensure_active()?;
        if self.panic_on_update {
            panic!("recording client asked to panic");
        }
        self.updates.lock().push(update);
        Ok(())
    }
}

impl MonitoringClient for RecordingClient {
    fn update_counter(&self, name: &str, delta: i64, sample_rate: f64) -> Result<(), ClientError> {
        self.record(RecordedUpdate::Counter(name.to_string(), delta, sample_rate))
    }

    fn update_timing(&self, name: &str, elapsed_ms: u64, sample_rate: f64) -> Result<(), ClientError> {
        self.record(RecordedUpdate::Timing(name.to_string(), elapsed_ms, sample_rate))
    }

    fn update_gauge(&self, name: &str, value: i64, sample_rate: f64) -> Result<(), ClientError> {
        self.record(RecordedUpdate::Gauge(name.to_string(), value, sample_rate))
    }

    fn client_id(&self) -> ClientId {
        self.id
    }

    fn dispose(&self) {
        self.dispose_calls.fetch_add(1, Ordering::SeqCst);
        let panic_on_dispose = self.panic_on_dispose;
        self.guard.dispose(|| {
            if panic_on_dispose {
                panic!("recording client asked to panic on dispose");
            }
        });
    }

    fn is_disposed(&self) -> bool {
        self.guard.is_disposed()
    }
}

mock! {
    pub Client {}

    impl MonitoringClient for Client {
        fn update_counter(&self, name: &str, delta: i64, sample_rate: f64) -> Result<(), ClientError>;
        fn update_timing(&self, name: &str, elapsed_ms: u64, sample_rate: f64) -> Result<(), ClientError>;
        fn update_gauge(&self, name: &str, value: i64, sample_rate: f64) -> Result<(), ClientError>;
        fn client_id(&self) -> ClientId;
        fn dispose(&self);
        fn is_disposed(&self) -> bool;
    }
}
