//! Status API client configuration.

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root URL of the status service, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    /// Upper bound on one HTTP exchange, in milliseconds.
    pub timeout_ms: u64,
    /// Extra attempts when the connection cannot be established.
    pub retries: u32,
    /// Initial pause between attempts, doubled after each one.
    pub retry_backoff_ms: u64,
}

impl ApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Pause before retry number `attempt` (zero-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1_u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }

    /// Absolute URL of an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_ms: 3000,
            retries: 2,
            retry_backoff_ms: 200,
        }
    }
}
