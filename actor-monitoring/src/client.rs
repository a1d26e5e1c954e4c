use std::{
    fmt, io,
    panic::{catch_unwind, AssertUnwindSafe},
    sync::atomic::{AtomicBool, Ordering},
};

use thiserror::Error;
use tracing::error;

/// Identity of a monitoring client.
///
/// The registry deduplicates clients by identity rather than by reference: two distinct client objects that report
/// the same `ClientId` cannot be active at the same time. Backends typically use a single constant per backend kind,
/// which limits a monitor to one instance of each backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(u64);

impl ClientId {
    /// Creates a `ClientId` from a raw value.
    pub const fn new(raw: u64) -> Self {
        ClientId(raw)
    }

    /// Returns the raw value of this identifier.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Errors that a monitoring client can report while handling an update.
///
/// These never reach the code reporting the metric: the registry logs them and moves on to the next client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The client was disposed and no longer accepts updates.
    #[error("monitoring client has been disposed")]
    Disposed,

    /// An I/O error occurred while delivering the update.
    #[error("I/O error while delivering update: {0}")]
    Io(#[from] io::Error),

    /// The backend cannot represent the update.
    #[error("unsupported update: {reason}")]
    Unsupported {
        /// Details about why the update is unsupported.
        reason: String,
    },

    /// Any other backend-specific failure.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// A monitoring backend.
///
/// Every backend (a network metrics protocol, an OS counter subsystem, a telemetry SDK, and so on) implements this
/// trait, and the [`MonitorRegistry`][crate::MonitorRegistry] fans each reading out to all registered backends.
///
/// Implementations are called synchronously on whichever thread reported the metric, potentially from many threads at
/// once, and so should keep updates cheap. Any buffering or batching is the backend's own business.
pub trait MonitoringClient: Send + Sync {
    /// Updates a counter by an arbitrary amount.
    ///
    /// `delta` is usually 1 or -1 but can be any value. `sample_rate` is a value in `(0, 1]` describing the fraction of
    /// updates that should be reported; how (or whether) it is honored depends entirely on the backend.
    fn update_counter(&self, name: &str, delta: i64, sample_rate: f64) -> Result<(), ClientError>;

    /// Records how long an operation took, in milliseconds.
    fn update_timing(&self, name: &str, elapsed_ms: u64, sample_rate: f64) -> Result<(), ClientError>;

    /// Sets a gauge to an arbitrary value.
    ///
    /// Gauges may not be supported by every backend.
    fn update_gauge(&self, name: &str, value: i64, sample_rate: f64) -> Result<(), ClientError>;

    /// Identity of this client, used to keep a single instance of each backend active.
    fn client_id(&self) -> ClientId;

    /// Releases any resources held by this client.
    ///
    /// Must be idempotent and must not panic: only the first call has any effect.
    fn dispose(&self);

    /// Returns `true` if this client has been disposed.
    fn is_disposed(&self) -> bool;
}

/// Disposal bookkeeping for monitoring clients.
///
/// Clients embed a `DisposeGuard` to get idempotent disposal: the finalizer passed to [`DisposeGuard::dispose`] runs
/// at most once no matter how many threads race to dispose the client, and a panic raised by the finalizer is caught
/// and logged rather than propagated.
#[derive(Debug, Default)]
pub struct DisposeGuard {
    disposed: AtomicBool,
}

impl DisposeGuard {
    /// Creates a new, active `DisposeGuard`.
    pub const fn new() -> Self {
        DisposeGuard { disposed: AtomicBool::new(false) }
    }

    /// Marks the guard as disposed, running `finalize` if this is the first call.
    ///
    /// Returns `true` if this call performed the disposal.
    pub fn dispose<F>(&self, finalize: F) -> bool
    where
        F: FnOnce(),
    {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return false;
        }

        if catch_unwind(AssertUnwindSafe(finalize)).is_err() {
            error!("Monitoring client panicked while disposing.");
        }

        true
    }

    /// Returns `true` if the guard has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Returns an error if the guard has been disposed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Disposed`] once [`dispose`][DisposeGuard::dispose] has been called.
    pub fn ensure_active(&self) -> Result<(), ClientError> {
        if self.is_disposed() {
            Err(ClientError::Disposed)
        } else {
            Ok(())
        }
    }
}
