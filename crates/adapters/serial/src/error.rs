//! Device transport error types.

use alerthub_domain::error::AlertHubError;

/// Errors raised while talking to the device byte stream.
#[derive(Debug, thiserror::Error)]
pub enum SerialError {
    /// The device could not be opened or connected to.
    #[error("device `{address}` unavailable")]
    Unavailable {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// No bytes arrived within the read timeout. Recoverable.
    #[error("read timed out")]
    Timeout,

    /// The stream failed mid-read.
    #[error("device read failed")]
    Io(#[source] std::io::Error),

    /// The stream reached end of file.
    #[error("device stream closed")]
    Closed,

    /// Reconnecting failed too many times in a row.
    #[error("device unreachable after {attempts} reconnect attempts")]
    GaveUp {
        attempts: u32,
        #[source]
        last: Box<SerialError>,
    },
}

impl SerialError {
    /// Whether the caller may simply read again.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Convert into a [`AlertHubError::Infrastructure`] for propagation across
    /// port boundaries.
    #[must_use]
    pub fn into_domain(self) -> AlertHubError {
        AlertHubError::Infrastructure(Box::new(self))
    }
}

impl From<SerialError> for AlertHubError {
    fn from(err: SerialError) -> Self {
        err.into_domain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_treat_only_timeout_as_recoverable() {
        assert!(SerialError::Timeout.is_recoverable());
        assert!(!SerialError::Closed.is_recoverable());
        assert!(!SerialError::Io(std::io::Error::other("broken pipe")).is_recoverable());
    }

    #[test]
    fn should_display_unavailable_address() {
        let err = SerialError::Unavailable {
            address: "COM5".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(err.to_string(), "device `COM5` unavailable");
    }

    #[test]
    fn should_display_gave_up_attempts() {
        let err = SerialError::GaveUp {
            attempts: 3,
            last: Box::new(SerialError::Closed),
        };
        assert_eq!(
            err.to_string(),
            "device unreachable after 3 reconnect attempts"
        );
    }

    #[test]
    fn should_convert_to_infrastructure_error() {
        let err: AlertHubError = SerialError::Closed.into();
        assert!(matches!(err, AlertHubError::Infrastructure(_)));
    }
}
