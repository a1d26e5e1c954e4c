use std::net::{SocketAddr, UdpSocket};

use actor_monitoring::{ClientError, ClientId, DisposeGuard, MonitoringClient};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{builder::StatsDBuilder, sampler::should_send, writer::LineWriter};

/// Identity shared by every StatsD monitor, so a process reports to at most one StatsD server.
pub const STATSD_CLIENT_ID: ClientId = ClientId::new(0x0ad9_0a54_db5c_4cab);

/// A monitoring client that sends every update as a StatsD line over UDP.
///
/// Counters and timings reported with a sample rate below 1.0 are sampled locally and carry the rate, so the server can
/// scale them back up. Gauges are absolute values and are always sent.
pub struct StatsDMonitor {
    socket: UdpSocket,
    remote_addr: SocketAddr,
    writer: Mutex<LineWriter>,
    guard: DisposeGuard,
}

impl StatsDMonitor {
    pub(crate) fn new(socket: UdpSocket, remote_addr: SocketAddr, prefix: Option<String>) -> Self {
        StatsDMonitor { socket, remote_addr, writer: Mutex::new(LineWriter::new(prefix)), guard: DisposeGuard::new() }
    }

    /// Creates a [`StatsDBuilder`] for configuring a monitor.
    pub fn builder() -> StatsDBuilder {
        StatsDBuilder::default()
    }

    /// Address of the StatsD server.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    fn send(&self, line: &[u8]) -> Result<(), ClientError> {
        let sent = self.socket.send(line)?;
        trace!(remote_addr = %self.remote_addr, bytes = sent, "Sent StatsD line.");
        Ok(())
    }
}

impl MonitoringClient for StatsDMonitor {
    fn update_counter(&self, name: &str, delta: i64, sample_rate: f64) -> Result<(), ClientError> {
        self.guard.ensure_active()?;
        if !should_send(sample_rate) {
            return Ok(());
        }

        let mut writer = self.writer.lock();
        self.send(writer.write_counter(name, delta, sample_rate))
    }

    fn update_timing(&self, name: &str, elapsed_ms: u64, sample_rate: f64) -> Result<(), ClientError> {
        self.guard.ensure_active()?;
        if !should_send(sample_rate) {
            return Ok(());
        }

        let mut writer = self.writer.lock();
        self.send(writer.write_timing(name, elapsed_ms, sample_rate))
    }

    fn update_gauge(&self, name: &str, value: i64, _sample_rate: f64) -> Result<(), ClientError> {
        self.guard.ensure_active()?;

        let mut writer = self.writer.lock();
        self.send(writer.write_gauge(name, value))
    }

    fn client_id(&self) -> ClientId {
        STATSD_CLIENT_ID
    }

    fn dispose(&self) {
        self.guard.dispose(|| debug!(remote_addr = %self.remote_addr, "StatsD monitor disposed."));
    }

    fn is_disposed(&self) -> bool {
        self.guard.is_disposed()
    }
}
