//! Read-only handlers: acknowledgement, flat status and detailed records.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use alerthub_app::state_store::StatusSnapshot;
use alerthub_domain::sensor::SensorRecord;
use alerthub_domain::time::{Timestamp, format_local};

use crate::state::AppState;

/// Acknowledgement served at `/`.
pub const HOME_MESSAGE: &str = "Smart Home Alert System Server is running";

/// Key carrying the snapshot time in the flat status body.
pub const LAST_UPDATED_KEY: &str = "last_updated";

/// Flat status body: one field per sensor plus `last_updated`.
#[derive(Debug, Serialize)]
pub struct StatusBody {
    #[serde(flatten)]
    pub sensors: BTreeMap<String, String>,
    pub last_updated: String,
}

impl From<StatusSnapshot> for StatusBody {
    fn from(snapshot: StatusSnapshot) -> Self {
        Self {
            sensors: snapshot
                .records
                .into_iter()
                .map(|record| (String::from(record.id), String::from(record.value)))
                .collect(),
            last_updated: format_local(snapshot.taken_at),
        }
    }
}

/// Detailed body with per-sensor timestamps.
#[derive(Debug, Serialize)]
pub struct SensorsBody {
    pub sensors: Vec<SensorRecord>,
    pub taken_at: Timestamp,
}

/// Possible responses from the status endpoint.
pub enum StatusResponse {
    Ok(Json<StatusBody>),
}

impl IntoResponse for StatusResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the sensors endpoint.
pub enum SensorsResponse {
    Ok(Json<SensorsBody>),
}

impl IntoResponse for SensorsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /`
pub async fn home() -> &'static str {
    HOME_MESSAGE
}

/// `GET /status`
pub async fn status(State(state): State<AppState>) -> StatusResponse {
    let snapshot = state.sensor_service.status().await;
    StatusResponse::Ok(Json(snapshot.into()))
}

/// `GET /sensors`
pub async fn sensors(State(state): State<AppState>) -> SensorsResponse {
    let snapshot = state.sensor_service.status().await;
    SensorsResponse::Ok(Json(SensorsBody {
        sensors: snapshot.records,
        taken_at: snapshot.taken_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerthub_domain::sensor::{SensorId, SensorValue};
    use alerthub_domain::time::now;

    #[test]
    fn should_flatten_sensors_next_to_last_updated() {
        let ts = now();
        let mut alert = SensorRecord::new(SensorId::new("gas_sensor").unwrap(), ts);
        alert.update(SensorValue::new("ALERT").unwrap(), ts);
        let snapshot = StatusSnapshot {
            records: vec![
                alert,
                SensorRecord::new(SensorId::new("smoke_sensor").unwrap(), ts),
            ],
            taken_at: ts,
        };

        let json = serde_json::to_value(StatusBody::from(snapshot)).unwrap();

        assert_eq!(json["gas_sensor"], "ALERT");
        assert_eq!(json["smoke_sensor"], "OK");
        assert_eq!(json[LAST_UPDATED_KEY], format_local(ts));
        assert_eq!(json.as_object().unwrap().len(), 3);
    }
}
