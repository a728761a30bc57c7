//! Byte-stream transports the reader can (re)open.

use std::io::{ErrorKind, Read};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::TransportConfig;
use crate::error::SerialError;

/// Something that can be opened repeatedly to yield a fresh byte stream.
///
/// Reads on the returned stream must honour a timeout and report it as
/// [`std::io::ErrorKind::TimedOut`] or [`std::io::ErrorKind::WouldBlock`].
pub trait LineSource: Send {
    fn open(&mut self) -> Result<Box<dyn Read + Send>, SerialError>;

    /// Human-readable address for logs.
    fn describe(&self) -> String;
}

/// A local serial port such as `/dev/ttyUSB0` or `COM5`.
#[derive(Debug, Clone)]
pub struct SerialSource {
    path: String,
    baud_rate: u32,
    timeout: Duration,
}

impl SerialSource {
    pub fn new(path: impl Into<String>, baud_rate: u32, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            baud_rate,
            timeout,
        }
    }
}

impl LineSource for SerialSource {
    fn open(&mut self) -> Result<Box<dyn Read + Send>, SerialError> {
        let port = serialport::new(&self.path, self.baud_rate)
            .timeout(self.timeout)
            .open()
            .map_err(|err| SerialError::Unavailable {
                address: self.path.clone(),
                source: std::io::Error::from(err),
            })?;
        tracing::info!(port = %self.path, baud = self.baud_rate, "serial port opened");
        Ok(Box::new(port))
    }

    fn describe(&self) -> String {
        format!("{}@{}", self.path, self.baud_rate)
    }
}

/// A device bridged over TCP (`tcp://host:port`), e.g. a serial-to-network
/// adapter or a simulator.
#[derive(Debug, Clone)]
pub struct TcpSource {
    addr: String,
    timeout: Duration,
}

impl TcpSource {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
        }
    }

    /// Connect to the first resolved address that answers within the timeout.
    fn connect(&self) -> std::io::Result<TcpStream> {
        let mut last_err = None;
        for addr in self.addr.to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            std::io::Error::new(ErrorKind::NotFound, "address resolved to nothing")
        }))
    }
}

impl LineSource for TcpSource {
    fn open(&mut self) -> Result<Box<dyn Read + Send>, SerialError> {
        let unavailable = |source| SerialError::Unavailable {
            address: self.addr.clone(),
            source,
        };
        let stream = self.connect().map_err(unavailable)?;
        stream
            .set_read_timeout(Some(self.timeout))
            .map_err(unavailable)?;
        tracing::info!(addr = %self.addr, "tcp device connected");
        Ok(Box::new(stream))
    }

    fn describe(&self) -> String {
        format!("tcp://{}", self.addr)
    }
}

/// Pick the transport matching the configured address.
#[must_use]
pub fn from_config(config: &TransportConfig) -> Box<dyn LineSource> {
    match config.tcp_addr() {
        Some(addr) => Box::new(TcpSource::new(addr, config.read_timeout())),
        None => Box::new(SerialSource::new(
            config.address.clone(),
            config.baud_rate,
            config.read_timeout(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::net::TcpListener;
    use std::time::Instant;

    use super::*;
    use crate::decoder::LineDecoder;

    #[test]
    fn should_choose_tcp_for_tcp_scheme() {
        let config = TransportConfig {
            address: "tcp://127.0.0.1:7000".to_string(),
            ..TransportConfig::default()
        };
        assert_eq!(from_config(&config).describe(), "tcp://127.0.0.1:7000");
    }

    #[test]
    fn should_choose_serial_otherwise() {
        let config = TransportConfig {
            address: "COM5".to_string(),
            baud_rate: 9600,
            ..TransportConfig::default()
        };
        assert_eq!(from_config(&config).describe(), "COM5@9600");
    }

    #[test]
    fn should_report_missing_serial_port_as_unavailable() {
        let mut source = SerialSource::new(
            "/dev/alerthub-does-not-exist",
            9600,
            Duration::from_millis(10),
        );
        let err = source.open().err().unwrap();
        assert!(matches!(err, SerialError::Unavailable { .. }));
    }

    #[test]
    fn should_report_refused_tcp_connection_as_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let mut source = TcpSource::new(addr, Duration::from_millis(10));
        let err = source.open().err().unwrap();
        assert!(matches!(err, SerialError::Unavailable { .. }));
    }

    #[test]
    fn should_give_up_connecting_to_unreachable_host_after_timeout() {
        // Non-routable, so the SYN goes unanswered.
        let mut source = TcpSource::new("10.255.255.1:9", Duration::from_millis(200));
        let started = Instant::now();
        let err = source.open().err().unwrap();

        assert!(matches!(err, SerialError::Unavailable { .. }));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn should_report_unresolvable_tcp_address_as_unavailable() {
        let mut source = TcpSource::new("not-an-address", Duration::from_millis(10));
        let err = source.open().err().unwrap();
        assert!(matches!(err, SerialError::Unavailable { .. }));
    }

    #[test]
    fn should_stream_lines_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let server = std::thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            conn.write_all(b"DOORBELL:ALERT\nGAS:OK\n").unwrap();
        });

        let mut source = TcpSource::new(addr, Duration::from_millis(500));
        let stream = source.open().unwrap();
        server.join().unwrap();

        let codes: Vec<String> = LineDecoder::new(stream)
            .filter_map(Result::ok)
            .map(|e| e.device_code)
            .collect();
        assert_eq!(codes, ["DOORBELL", "GAS"]);
    }
}
