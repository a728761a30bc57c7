//! Device transport configuration.

use std::time::Duration;

use serde::Deserialize;

/// Prefix selecting the TCP transport instead of a serial port.
pub const TCP_SCHEME: &str = "tcp://";

/// Configuration for the device byte stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Serial port path (`/dev/ttyUSB0`, `COM5`) or `tcp://host:port`.
    pub address: String,
    /// Serial line speed; ignored for TCP.
    pub baud_rate: u32,
    /// Upper bound on a single blocking read, in milliseconds.
    pub read_timeout_ms: u64,
    /// Consecutive failed connection attempts tolerated before giving up.
    pub reconnect_attempts: u32,
    /// Pause between connection attempts, in milliseconds.
    pub reconnect_delay_ms: u64,
}

impl TransportConfig {
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// The `host:port` part when the address uses the TCP scheme.
    #[must_use]
    pub fn tcp_addr(&self) -> Option<&str> {
        self.address.strip_prefix(TCP_SCHEME)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            address: "/dev/ttyUSB0".to_string(),
            baud_rate: 9600,
            read_timeout_ms: 1000,
            reconnect_attempts: 5,
            reconnect_delay_ms: 2000,
        }
    }
}
