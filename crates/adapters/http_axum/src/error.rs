//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use alerthub_domain::error::{AlertHubError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps request failures to an HTTP response with appropriate status code.
pub enum ApiError {
    /// Error raised by the application layer.
    Domain(AlertHubError),
    /// The request body could not be decoded.
    Body(JsonRejection),
}

impl From<AlertHubError> for ApiError {
    fn from(err: AlertHubError) -> Self {
        Self::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Domain(AlertHubError::UnknownSensor(_)) => {
                (StatusCode::BAD_REQUEST, "Invalid sensor".to_string())
            }
            Self::Domain(AlertHubError::Validation(ValidationError::EmptyValue)) => {
                (StatusCode::BAD_REQUEST, "Invalid value".to_string())
            }
            Self::Domain(AlertHubError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(AlertHubError::Infrastructure(err)) => {
                tracing::error!(error = %err, "infrastructure error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            Self::Body(rejection) => {
                tracing::debug!(%rejection, "rejected request body");
                (StatusCode::BAD_REQUEST, "Invalid request body".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
