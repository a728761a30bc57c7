//! Mutating handlers: trigger one sensor, reset all of them.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Message returned by a successful reset.
pub const RESET_MESSAGE: &str = "All sensors reset to OK";

/// Request body for triggering a sensor.
#[derive(Debug, Deserialize)]
pub struct TriggerRequest {
    pub sensor: String,
    pub value: String,
}

/// JSON acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// Possible responses from the trigger and reset endpoints.
pub enum CommandResponse {
    Ok(Json<MessageBody>),
}

impl IntoResponse for CommandResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /trigger`
pub async fn trigger(
    State(state): State<AppState>,
    body: Result<Json<TriggerRequest>, JsonRejection>,
) -> Result<CommandResponse, ApiError> {
    let Json(req) = body?;
    let record = state
        .sensor_service
        .trigger(&req.sensor, &req.value)
        .await?;
    Ok(CommandResponse::Ok(Json(MessageBody {
        message: format!("{} set to {}", record.id, record.value),
    })))
}

/// `POST /reset`
pub async fn reset(State(state): State<AppState>) -> CommandResponse {
    state.sensor_service.reset().await;
    CommandResponse::Ok(Json(MessageBody {
        message: RESET_MESSAGE.to_string(),
    }))
}
