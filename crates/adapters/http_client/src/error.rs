//! Delivery error types.

use alerthub_domain::error::AlertHubError;

/// Errors raised while talking to the status service.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// No connection could be established. The request was never sent.
    #[error("cannot connect to {url}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The exchange exceeded the configured timeout.
    #[error("request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Any other transport failure.
    #[error("request failed")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("status service rejected update ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl DeliveryError {
    /// Classify a failed `send()`.
    pub(crate) fn from_send(url: &str, err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Connect {
                url: url.to_string(),
                source: err,
            }
        } else if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                source: err,
            }
        } else {
            Self::Http(err)
        }
    }

    /// Whether retrying cannot apply the update twice.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connect { .. })
    }

    /// Convert into a [`AlertHubError::Infrastructure`] for propagation across
    /// port boundaries.
    #[must_use]
    pub fn into_domain(self) -> AlertHubError {
        AlertHubError::Infrastructure(Box::new(self))
    }
}

impl From<DeliveryError> for AlertHubError {
    fn from(err: DeliveryError) -> Self {
        err.into_domain()
    }
}
