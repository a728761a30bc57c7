//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`AlertHubError`] via `#[from]` or an `into_domain` helper.

/// Top-level error shared by the application core and its adapters.
#[derive(Debug, thiserror::Error)]
pub enum AlertHubError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("unknown sensor")]
    UnknownSensor(#[from] UnknownSensorError),

    /// Failure in an IO adapter (transport, HTTP client, …).
    #[error("infrastructure error")]
    Infrastructure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A domain invariant was violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("sensor identifier must not be empty")]
    EmptySensorId,

    #[error("sensor value must not be empty")]
    EmptyValue,

    #[error("device code must not be empty")]
    EmptyDeviceCode,

    #[error("device code `{0}` is mapped more than once")]
    DuplicateDeviceCode(String),

    #[error("sensor registry must contain at least one sensor")]
    EmptyRegistry,
}

/// A trigger referenced an identifier outside the closed sensor set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sensor `{id}`")]
pub struct UnknownSensorError {
    pub id: String,
}

/// A device line could not be turned into an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedLineError {
    #[error("line has no `:` separator")]
    MissingSeparator,

    #[error("line has an empty device code")]
    EmptyDeviceCode,

    #[error("line has an empty value")]
    EmptyValue,

    #[error("line exceeds {limit} bytes")]
    TooLong { limit: usize },
}
