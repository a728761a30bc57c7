//! Configuration loading — TOML file with environment variable overrides.
//!
//! Shares `alerthub.toml` (or `ALERTHUB_CONFIG`) with `alerthubd`; sections
//! the gateway does not use are ignored.

use std::time::Duration;

use alerthub_adapter_http_client::ApiConfig;
use alerthub_adapter_serial::TransportConfig;
use alerthub_domain::registry::SensorRegistry;
use serde::Deserialize;

const DEFAULT_PATH: &str = "alerthub.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device byte stream.
    pub transport: TransportConfig,
    /// Status service endpoint.
    pub api: ApiConfig,
    /// Device code to sensor identifier mapping.
    pub sensors: SensorRegistry,
    /// Event pipeline settings.
    pub gateway: GatewayConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Events buffered between the reader thread and the delivery loop.
    pub queue_capacity: usize,
    /// How long shutdown waits for buffered events to be delivered.
    pub shutdown_grace_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("ALERTHUB_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("ALERTHUB_TRANSPORT") {
            self.transport.address = val;
        }
        if let Some(baud) = var("ALERTHUB_BAUD_RATE").and_then(|val| val.parse().ok()) {
            self.transport.baud_rate = baud;
        }
        if let Some(val) = var("ALERTHUB_API_URL") {
            self.api.base_url = val;
        }
        if let Some(val) = var("ALERTHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.transport.address.trim().is_empty() {
            return Err(ConfigError::Validation(
                "transport address must not be empty".to_string(),
            ));
        }
        if self.transport.baud_rate == 0 {
            return Err(ConfigError::Validation(
                "baud rate must be non-zero".to_string(),
            ));
        }
        if self.transport.read_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "read timeout must be non-zero".to_string(),
            ));
        }
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "api base url `{}` must start with http:// or https://",
                self.api.base_url
            )));
        }
        if self.api.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "api timeout must be non-zero".to_string(),
            ));
        }
        if self.gateway.queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "queue capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.gateway.shutdown_grace_ms)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            shutdown_grace_ms: 5000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "alerthub_gateway=info,alerthub_app=info,alerthub_adapter_serial=info"
                .to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure, including an invalid `[sensors]` table.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.transport.address, "/dev/ttyUSB0");
        assert_eq!(config.transport.baud_rate, 9600);
        assert_eq!(config.api.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.gateway.queue_capacity, 64);
        assert_eq!(config.shutdown_grace(), Duration::from_secs(5));
        assert_eq!(config.sensors, SensorRegistry::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_shared_config_file() {
        let toml = "
            [server]
            port = 5000

            [transport]
            address = 'COM5'
            baud_rate = 115200

            [api]
            base_url = 'http://hub.local:5000'
            retries = 0

            [sensors]
            doorbell = 'doorbell_sensor'

            [gateway]
            queue_capacity = 8
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.transport.address, "COM5");
        assert_eq!(config.transport.baud_rate, 115_200);
        assert_eq!(config.api.base_url, "http://hub.local:5000");
        assert_eq!(config.api.retries, 0);
        assert_eq!(config.gateway.queue_capacity, 8);
        assert_eq!(config.gateway.shutdown_grace_ms, 5000);
        assert!(config.sensors.resolve("DOORBELL").is_some());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.transport.baud_rate, 9600);
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[
            ("ALERTHUB_TRANSPORT", "tcp://127.0.0.1:7000"),
            ("ALERTHUB_BAUD_RATE", "19200"),
            ("ALERTHUB_API_URL", "http://10.0.0.5:5000"),
            ("RUST_LOG", "debug"),
        ]));
        assert_eq!(config.transport.tcp_addr(), Some("127.0.0.1:7000"));
        assert_eq!(config.transport.baud_rate, 19200);
        assert_eq!(config.api.base_url, "http://10.0.0.5:5000");
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_ignore_unparsable_baud_rate() {
        let mut config = Config::default();
        config.apply_env_overrides(env(&[("ALERTHUB_BAUD_RATE", "fast")]));
        assert_eq!(config.transport.baud_rate, 9600);
    }

    #[test]
    fn should_reject_zero_queue_capacity() {
        let mut config = Config::default();
        config.gateway.queue_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_non_http_base_url() {
        let mut config = Config::default();
        config.api.base_url = "127.0.0.1:5000".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("127.0.0.1:5000"));
    }

    #[test]
    fn should_reject_blank_transport_address() {
        let mut config = Config::default();
        config.transport.address = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_read_timeout() {
        let mut config = Config::default();
        config.transport.read_timeout_ms = 0;
        assert!(config.validate().is_err());
    }
}
