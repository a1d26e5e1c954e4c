use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
};

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{debug, error, warn};

use crate::client::{ClientError, ClientId, MonitoringClient};

type ClientMap = IndexMap<ClientId, Arc<dyn MonitoringClient>>;

/// A thread-safe registry of the monitoring clients active for a monitor.
///
/// Every update is fanned out synchronously to each active client. Broadcasts read an immutable snapshot of the active
/// set without locking, while registration, deregistration, and disposal publish a new snapshot. A client added or
/// removed while a broadcast is in flight may or may not see that particular update.
///
/// A client that fails or panics while handling an update (or while being disposed) is logged and skipped, so a single
/// misbehaving client cannot stop delivery to the others.
pub struct MonitorRegistry {
    active: ArcSwap<ClientMap>,
    write_lock: Mutex<()>,
}

impl MonitorRegistry {
    /// Creates an empty `MonitorRegistry`.
    pub fn new() -> Self {
        MonitorRegistry { active: ArcSwap::from_pointee(ClientMap::new()), write_lock: Mutex::new(()) }
    }

    /// Adds a client to the active set.
    ///
    /// Returns `true` if no client with the same [`ClientId`] was active and the client is now active, `false`
    /// otherwise.
    pub fn add(&self, client: Arc<dyn MonitoringClient>) -> bool {
        let client_id = client.client_id();

        let _guard = self.write_lock.lock();
        let current = self.active.load_full();
        if current.contains_key(&client_id) {
            debug!(%client_id, "Monitoring client already registered.");
            return false;
        }

        let mut updated = ClientMap::clone(&current);
        updated.insert(client_id, client);
        self.active.store(Arc::new(updated));

        debug!(%client_id, "Registered monitoring client.");
        true
    }

    /// Removes a client from the active set.
    ///
    /// The client is matched by its [`ClientId`] and is not disposed. Returns `true` if it was active and has been
    /// removed, `false` otherwise.
    pub fn remove(&self, client: &dyn MonitoringClient) -> bool {
        self.remove_by_id(client.client_id())
    }

    /// Removes the client with the given identifier from the active set.
    ///
    /// Returns `true` if it was active and has been removed, `false` otherwise.
    pub fn remove_by_id(&self, client_id: ClientId) -> bool {
        let _guard = self.write_lock.lock();
        let current = self.active.load_full();
        if !current.contains_key(&client_id) {
            return false;
        }

        let mut updated = ClientMap::clone(&current);
        updated.shift_remove(&client_id);
        self.active.store(Arc::new(updated));

        debug!(%client_id, "Deregistered monitoring client.");
        true
    }

    /// Returns `true` if a client with the given identifier is active.
    pub fn contains(&self, client_id: ClientId) -> bool {
        self.active.load().contains_key(&client_id)
    }

    /// Returns the number of active clients.
    pub fn len(&self) -> usize {
        self.active.load().len()
    }

    /// Returns `true` if there are no active clients.
    pub fn is_empty(&self) -> bool {
        self.active.load().is_empty()
    }

    /// Updates a counter on every active client.
    pub fn broadcast_counter(&self, name: &str, delta: i64, sample_rate: f64) {
        self.broadcast(name, "counter", |client| client.update_counter(name, delta, sample_rate));
    }

    /// Updates a timer on every active client.
    pub fn broadcast_timing(&self, name: &str, elapsed_ms: u64, sample_rate: f64) {
        self.broadcast(name, "timing", |client| client.update_timing(name, elapsed_ms, sample_rate));
    }

    /// Updates a gauge on every active client.
    pub fn broadcast_gauge(&self, name: &str, value: i64, sample_rate: f64) {
        self.broadcast(name, "gauge", |client| client.update_gauge(name, value, sample_rate));
    }

    /// Disposes every active client and clears the active set.
    ///
    /// The active set is emptied before any client is disposed, so broadcasts issued after this call starts reach no
    /// client even if disposal is slow. Each client is disposed exactly once; clients can be registered again
    /// afterwards.
    pub fn dispose_all(&self) {
        let previous = {
            let _guard = self.write_lock.lock();
            self.active.swap(Arc::new(ClientMap::new()))
        };

        for (client_id, client) in previous.iter() {
            if catch_unwind(AssertUnwindSafe(|| client.dispose())).is_err() {
                error!(%client_id, "Monitoring client panicked while disposing.");
            } else {
                debug!(%client_id, "Disposed monitoring client.");
            }
        }
    }

    fn broadcast<F>(&self, name: &str, kind: &'static str, update: F)
    where
        F: Fn(&dyn MonitoringClient) -> Result<(), ClientError>,
    {
        let clients = self.active.load();
        for (client_id, client) in clients.iter() {
            match catch_unwind(AssertUnwindSafe(|| update(&**client))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(%client_id, metric_name = name, kind, error = %e, "Monitoring client failed to update metric.");
                }
                Err(_) => {
                    error!(%client_id, metric_name = name, kind, "Monitoring client panicked while updating metric.");
                }
            }
        }
    }
}

impl Default for MonitorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
