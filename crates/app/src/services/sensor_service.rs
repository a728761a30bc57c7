//! Sensor service — use-cases behind the status API.

use alerthub_domain::error::{AlertHubError, UnknownSensorError};
use alerthub_domain::registry::SensorRegistry;
use alerthub_domain::sensor::{SensorRecord, SensorValue};

use crate::state_store::{StateStore, StatusSnapshot};

/// Application service for reading and mutating sensor state.
///
/// Every mutation of the [`StateStore`] goes through here, so validation
/// happens in exactly one place.
pub struct SensorService {
    store: StateStore,
}

impl SensorService {
    /// Create a new service backed by the given store.
    #[must_use]
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }

    /// Create a service whose store holds every sensor of `registry`.
    #[must_use]
    pub fn from_registry(registry: &SensorRegistry) -> Self {
        Self::new(StateStore::from_registry(registry))
    }

    /// Access the underlying store.
    #[must_use]
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Current state of every sensor.
    pub async fn status(&self) -> StatusSnapshot {
        self.store.get().await
    }

    /// Set `sensor` to `value`.
    ///
    /// The sensor is checked against the closed set before the value is
    /// looked at, so an unknown sensor is reported as such whatever the value.
    ///
    /// # Errors
    ///
    /// Returns [`AlertHubError::UnknownSensor`] when `sensor` is not a known
    /// identifier, or [`AlertHubError::Validation`] when `value` is blank.
    pub async fn trigger(&self, sensor: &str, value: &str) -> Result<SensorRecord, AlertHubError> {
        if !self.store.contains(sensor) {
            tracing::warn!(sensor, value, "trigger for unknown sensor rejected");
            return Err(UnknownSensorError {
                id: sensor.to_string(),
            }
            .into());
        }
        let value = SensorValue::new(value)?;
        let record = self.store.set(sensor, value).await?;
        tracing::info!(sensor = %record.id, value = %record.value, "sensor updated");
        Ok(record)
    }

    /// Return every sensor to `OK`.
    pub async fn reset(&self) {
        self.store.reset_all().await;
        tracing::info!("all sensors reset");
    }
}
