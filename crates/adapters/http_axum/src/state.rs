//! Shared application state for axum handlers.

use std::sync::Arc;

use alerthub_app::services::sensor_service::SensorService;

/// Application state shared across all axum handlers.
///
/// Only the `Arc` is cloned per request; the service and its store are
/// shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Sensor status service.
    pub sensor_service: Arc<SensorService>,
}

impl AppState {
    /// Create a new application state from a service instance.
    pub fn new(sensor_service: SensorService) -> Self {
        Self {
            sensor_service: Arc::new(sensor_service),
        }
    }

    /// Create a new application state from a pre-wrapped `Arc` service.
    ///
    /// Use this when the service needs to be shared with background tasks
    /// before constructing the HTTP state.
    pub fn from_arc(sensor_service: Arc<SensorService>) -> Self {
        Self { sensor_service }
    }
}
