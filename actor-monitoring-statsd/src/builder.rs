use std::{
    io,
    net::{Ipv4Addr, SocketAddr, ToSocketAddrs as _, UdpSocket},
    time::Duration,
};

use thiserror::Error;
use tracing::debug;

use crate::monitor::StatsDMonitor;

const DEFAULT_PORT: u16 = 8125;
const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// Errors that could occur while building a StatsD monitor.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Failed to parse the remote address.
    #[error("invalid remote address: {reason}")]
    InvalidRemoteAddress {
        /// Details about the parsing failure.
        reason: String,
    },

    /// Failed to set up the UDP socket.
    #[error("failed to set up UDP socket: {0}")]
    Io(#[from] io::Error),
}

/// Builder for a [`StatsDMonitor`].
pub struct StatsDBuilder {
    remote_addrs: Vec<SocketAddr>,
    prefix: Option<String>,
    write_timeout: Duration,
}

fn resolve_remote_address(addr: &str) -> Result<Vec<SocketAddr>, BuildError> {
    let addrs = addr
        .to_socket_addrs()
        .map_err(|e| BuildError::InvalidRemoteAddress { reason: e.to_string() })?
        .collect::<Vec<_>>();

    if addrs.is_empty() {
        return Err(BuildError::InvalidRemoteAddress { reason: format!("'{}' did not resolve to any address", addr) });
    }

    Ok(addrs)
}

impl StatsDBuilder {
    /// Set the remote address to send metrics to.
    ///
    /// The address needs to be in the format of `<host>:<port>`.
    ///
    /// Defaults to sending to `127.0.0.1:8125`.
    ///
    /// # Errors
    ///
    /// If the given address is not able to be parsed or resolved, an error will be returned indicating the reason.
    pub fn with_remote_address<A>(mut self, addr: A) -> Result<Self, BuildError>
    where
        A: AsRef<str>,
    {
        self.remote_addrs = resolve_remote_address(addr.as_ref())?;
        Ok(self)
    }

    /// Set the prefix prepended, with a separating dot, to every metric name.
    ///
    /// An empty prefix is the same as no prefix.
    ///
    /// Defaults to no prefix.
    #[must_use]
    pub fn with_prefix<P: Into<String>>(mut self, prefix: P) -> Self {
        let prefix = prefix.into();
        self.prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }

    /// Set the write timeout for sending metrics.
    ///
    /// When the write timeout is reached, the update being sent is dropped without retrying.
    ///
    /// Defaults to 1 second.
    #[must_use]
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Builds the monitor, binding a local UDP socket connected to the remote address.
    ///
    /// # Errors
    ///
    /// If the socket cannot be bound, connected, or configured, an error is returned.
    pub fn build(self) -> Result<StatsDMonitor, BuildError> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        socket.connect(&self.remote_addrs[..])?;
        socket.set_write_timeout(Some(self.write_timeout))?;

        let remote_addr = socket.peer_addr()?;
        debug!(%remote_addr, prefix = ?self.prefix, "Connected StatsD socket.");

        Ok(StatsDMonitor::new(socket, remote_addr, self.prefix))
    }
}

impl Default for StatsDBuilder {
    fn default() -> Self {
        StatsDBuilder {
            remote_addrs: vec![SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT))],
            prefix: None,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{net::SocketAddr, time::Duration};

    use super::{BuildError, StatsDBuilder, DEFAULT_WRITE_TIMEOUT};

    #[test]
    fn defaults() {
        let builder = StatsDBuilder::default();
        assert_eq!(builder.remote_addrs, vec!["127.0.0.1:8125".parse::<SocketAddr>().expect("valid address")]);
        assert_eq!(builder.prefix, None);
        assert_eq!(builder.write_timeout, DEFAULT_WRITE_TIMEOUT);
    }

    #[test]
    fn invalid_remote_address() {
        for addr in ["not an address", "127.0.0.1", "127.0.0.1:notaport"] {
            let result = StatsDBuilder::default().with_remote_address(addr);
            assert!(matches!(result, Err(BuildError::InvalidRemoteAddress { .. })), "accepted '{}'", addr);
        }
    }

    #[test]
    fn empty_prefix_is_no_prefix() {
        let builder = StatsDBuilder::default().with_prefix("app").with_prefix("");
        assert_eq!(builder.prefix, None);

        let builder = StatsDBuilder::default().with_prefix("app").with_write_timeout(Duration::from_millis(50));
        assert_eq!(builder.prefix.as_deref(), Some("app"));
        assert_eq!(builder.write_timeout, Duration::from_millis(50));
    }
}
