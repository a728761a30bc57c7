//! Sensors — the identifiers, value tokens and records the hub keeps track of.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time::Timestamp;

/// Canonical sensor identifier (e.g. `doorbell_sensor`).
///
/// Identifiers are opaque and compared exactly; the only invariant carried
/// by the type is that they are not blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SensorId(pub(crate) String);

impl SensorId {
    /// Wrap a string as an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySensorId`] when `id` is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptySensorId);
        }
        Ok(Self(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SensorId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SensorId> for String {
    fn from(id: SensorId) -> Self {
        id.0
    }
}

impl Borrow<str> for SensorId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque value token reported by a sensor (`OK`, `ALERT`, …).
///
/// The hub never interprets a value beyond equality; any non-blank token is
/// accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SensorValue(String);

impl SensorValue {
    /// Token every sensor starts with and returns to on reset.
    pub const OK: &'static str = "OK";

    /// Wrap a string as a value token.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyValue`] when `value` is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyValue);
        }
        Ok(Self(value))
    }

    /// The `OK` token.
    #[must_use]
    pub fn ok() -> Self {
        Self(Self::OK.to_string())
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.0 == Self::OK
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SensorValue {
    fn default() -> Self {
        Self::ok()
    }
}

impl TryFrom<String> for SensorValue {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SensorValue> for String {
    fn from(value: SensorValue) -> Self {
        value.0
    }
}

impl fmt::Display for SensorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current state of one sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorRecord {
    pub id: SensorId,
    pub value: SensorValue,
    pub updated_at: Timestamp,
}

impl SensorRecord {
    /// A fresh record holding `OK`.
    #[must_use]
    pub fn new(id: SensorId, ts: Timestamp) -> Self {
        Self {
            id,
            value: SensorValue::ok(),
            updated_at: ts,
        }
    }

    /// Replace the value and bump `updated_at`.
    ///
    /// `updated_at` never moves backwards, even if the wall clock does.
    pub fn update(&mut self, value: SensorValue, ts: Timestamp) {
        self.value = value;
        self.updated_at = self.updated_at.max(ts);
    }

    /// Return to `OK`.
    pub fn reset(&mut self, ts: Timestamp) {
        self.update(SensorValue::ok(), ts);
    }
}

/// A resolved `(sensor, value)` pair ready to be applied to the status service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorUpdate {
    pub sensor: SensorId,
    pub value: SensorValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;
    use chrono::Duration;

    #[test]
    fn should_reject_blank_sensor_id() {
        assert_eq!(SensorId::new("  "), Err(ValidationError::EmptySensorId));
    }

    #[test]
    fn should_keep_sensor_id_verbatim() {
        let id = SensorId::new("doorbell_sensor").unwrap();
        assert_eq!(id.as_str(), "doorbell_sensor");
        assert_eq!(id.to_string(), "doorbell_sensor");
    }

    #[test]
    fn should_reject_blank_value() {
        assert_eq!(SensorValue::new(""), Err(ValidationError::EmptyValue));
    }

    #[test]
    fn should_accept_arbitrary_value_token() {
        let value = SensorValue::new("LOW_BATTERY").unwrap();
        assert!(!value.is_ok());
        assert_eq!(value.as_str(), "LOW_BATTERY");
    }

    #[test]
    fn should_default_value_to_ok() {
        assert!(SensorValue::default().is_ok());
    }

    #[test]
    fn should_reject_blank_id_when_deserializing() {
        let result: Result<SensorId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn should_serialize_update_as_plain_strings() {
        let update = SensorUpdate {
            sensor: SensorId::new("gas_sensor").unwrap(),
            value: SensorValue::new("ALERT").unwrap(),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"sensor": "gas_sensor", "value": "ALERT"})
        );
    }

    #[test]
    fn should_start_record_at_ok() {
        let record = SensorRecord::new(SensorId::new("smoke_sensor").unwrap(), now());
        assert!(record.value.is_ok());
    }

    #[test]
    fn should_bump_timestamp_on_update() {
        let start = now();
        let mut record = SensorRecord::new(SensorId::new("smoke_sensor").unwrap(), start);
        let later = start + Duration::seconds(5);

        record.update(SensorValue::new("ALERT").unwrap(), later);

        assert_eq!(record.value.as_str(), "ALERT");
        assert_eq!(record.updated_at, later);
    }

    #[test]
    fn should_not_move_timestamp_backwards() {
        let start = now();
        let mut record = SensorRecord::new(SensorId::new("smoke_sensor").unwrap(), start);

        record.update(
            SensorValue::new("ALERT").unwrap(),
            start - Duration::seconds(30),
        );

        assert_eq!(record.updated_at, start);
    }

    #[test]
    fn should_reset_record_to_ok() {
        let mut record = SensorRecord::new(SensorId::new("gas_sensor").unwrap(), now());
        record.update(SensorValue::new("ALERT").unwrap(), now());

        record.reset(now());

        assert!(record.value.is_ok());
    }
}
