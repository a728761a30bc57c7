//! Sensor registry — the closed set of device codes and the identifiers they
//! map to.
//!
//! The registry is the single authority on which sensors exist. The gateway
//! uses it to resolve device codes; the status service uses it to seed the
//! state store, so the two sides cannot drift apart as long as they load the
//! same `[sensors]` table.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::error::ValidationError;
use crate::event::normalize_token;
use crate::sensor::SensorId;

/// Fixed mapping from upper-case device codes to [`SensorId`]s.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>")]
pub struct SensorRegistry {
    codes: BTreeMap<String, SensorId>,
}

impl SensorRegistry {
    /// Build a registry from `(device_code, identifier)` pairs.
    ///
    /// Device codes are trimmed and upper-cased; identifiers are kept as-is.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when a code or identifier is blank,
    /// when two codes collide after normalization, or when the mapping is
    /// empty.
    pub fn new<I, C, S>(mapping: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (C, S)>,
        C: AsRef<str>,
        S: Into<String>,
    {
        let mut codes = BTreeMap::new();
        for (code, id) in mapping {
            let code = normalize_token(code.as_ref());
            if code.is_empty() {
                return Err(ValidationError::EmptyDeviceCode);
            }
            let id = SensorId::new(id)?;
            if codes.insert(code.clone(), id).is_some() {
                return Err(ValidationError::DuplicateDeviceCode(code));
            }
        }
        if codes.is_empty() {
            return Err(ValidationError::EmptyRegistry);
        }
        Ok(Self { codes })
    }

    /// Resolve a device code (any case, surrounding whitespace ignored).
    ///
    /// Returns `None` for codes outside the registry.
    #[must_use]
    pub fn resolve(&self, device_code: &str) -> Option<&SensorId> {
        self.codes.get(&normalize_token(device_code))
    }

    /// Every distinct identifier, sorted.
    #[must_use]
    pub fn identifiers(&self) -> BTreeSet<SensorId> {
        self.codes.values().cloned().collect()
    }

    /// Whether `id` belongs to the closed set.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.codes.values().any(|known| known.as_str() == id)
    }

    /// Number of device codes. Never zero.
    #[must_use]
    pub fn code_count(&self) -> usize {
        self.codes.len()
    }
}

impl Default for SensorRegistry {
    fn default() -> Self {
        let codes = [
            ("DOORBELL", "doorbell_sensor"),
            ("GAS", "gas_sensor"),
            ("SMOKE", "smoke_sensor"),
        ]
        .into_iter()
        .map(|(code, id)| (code.to_string(), SensorId(id.to_string())))
        .collect();
        Self { codes }
    }
}

impl TryFrom<BTreeMap<String, String>> for SensorRegistry {
    type Error = ValidationError;

    fn try_from(mapping: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        Self::new(mapping)
    }
}
