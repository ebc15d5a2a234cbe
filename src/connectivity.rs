//! Network connectivity detection
//!
//! Used by the resolver to tell a plain connection failure apart from the
//! device being offline altogether.
//!
//! The default probe is a TCP connect with timeout to a literal IP address
//! on port 443. The resolver only sees the [`ConnectivityProbe`] trait.

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use strum::Display;
use tracing::{debug, warn};

/// Default probe target (Cloudflare DNS over HTTPS)
pub const DEFAULT_PROBE_ADDR: &str = "1.1.1.1:443";

/// Network connectivity state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NetworkState {
    /// TCP connection to the probe address succeeded
    Online,
    /// TCP connection failed or timed out
    Offline,
}

impl NetworkState {
    /// Returns true if network connectivity is available.
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// Source of the device's current connectivity state
pub trait ConnectivityProbe: Send + Sync {
    fn network_state(&self) -> NetworkState;
}

/// Probe that opens (and immediately drops) a TCP connection.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
        }
    }

    /// Probe target as configured
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_ADDR, Duration::from_secs(3))
    }
}

impl ConnectivityProbe for TcpProbe {
    /// Returns `Offline` if the address does not resolve, the connection is
    /// refused or it times out.
    fn network_state(&self) -> NetworkState {
        let addrs: Vec<SocketAddr> = match self.addr.to_socket_addrs() {
            Ok(addrs) => addrs.collect(),
            Err(e) => {
                warn!("Connectivity probe address {} did not resolve: {}", self.addr, e);
                return NetworkState::Offline;
            }
        };

        for addr in &addrs {
            match TcpStream::connect_timeout(addr, self.timeout) {
                Ok(_stream) => {
                    debug!("Network connectivity confirmed (TCP to {})", addr);
                    return NetworkState::Online;
                }
                Err(e) => debug!("Connectivity probe to {} failed: {}", addr, e),
            }
        }

        warn!("Network connectivity check failed for {}", self.addr);
        NetworkState::Offline
    }
}

/// Probe with a fixed answer, for tests and `--assume-online`
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe(pub NetworkState);

impl ConnectivityProbe for StaticProbe {
    fn network_state(&self) -> NetworkState {
        self.0
    }
}
