//! In-memory sensor state — the single source of truth of the status service.

use std::collections::{BTreeMap, BTreeSet};

use tokio::sync::RwLock;

use alerthub_domain::error::UnknownSensorError;
use alerthub_domain::registry::SensorRegistry;
use alerthub_domain::sensor::{SensorId, SensorRecord, SensorValue};
use alerthub_domain::time::{Timestamp, now};

/// Point-in-time copy of every sensor record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Records ordered by sensor identifier.
    pub records: Vec<SensorRecord>,
    /// When the snapshot was taken.
    pub taken_at: Timestamp,
}

impl StatusSnapshot {
    /// Look up one record by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SensorRecord> {
        self.records.iter().find(|record| record.id.as_str() == id)
    }
}

/// Closed-world map from [`SensorId`] to its current [`SensorRecord`].
///
/// The key set is fixed at construction. A single [`RwLock`] guards every
/// record: snapshots share the read lock, `set` and `reset_all` take the
/// write lock, so a reader sees a reset either entirely or not at all.
#[derive(Debug)]
pub struct StateStore {
    ids: BTreeSet<SensorId>,
    records: RwLock<BTreeMap<SensorId, SensorRecord>>,
}

impl StateStore {
    /// Create a store holding `OK` for each identifier.
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = SensorId>) -> Self {
        let ids: BTreeSet<SensorId> = ids.into_iter().collect();
        let ts = now();
        let records = ids
            .iter()
            .map(|id| (id.clone(), SensorRecord::new(id.clone(), ts)))
            .collect();
        Self {
            ids,
            records: RwLock::new(records),
        }
    }

    /// Create a store seeded with every identifier of `registry`.
    #[must_use]
    pub fn from_registry(registry: &SensorRegistry) -> Self {
        Self::new(registry.identifiers())
    }

    /// The fixed set of identifiers this store accepts.
    #[must_use]
    pub fn sensor_ids(&self) -> &BTreeSet<SensorId> {
        &self.ids
    }

    /// Whether `id` is one of the store's keys.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Consistent copy of all records.
    pub async fn get(&self) -> StatusSnapshot {
        let records = self.records.read().await;
        StatusSnapshot {
            records: records.values().cloned().collect(),
            taken_at: now(),
        }
    }

    /// Set the value of one sensor.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownSensorError`] when `id` is not one of the store's
    /// keys; the store is left untouched.
    pub async fn set(
        &self,
        id: &str,
        value: SensorValue,
    ) -> Result<SensorRecord, UnknownSensorError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(id).ok_or_else(|| UnknownSensorError {
            id: id.to_string(),
        })?;
        record.update(value, now());
        Ok(record.clone())
    }

    /// Return every sensor to `OK` as one atomic step.
    pub async fn reset_all(&self) {
        let mut records = self.records.write().await;
        let ts = now();
        for record in records.values_mut() {
            record.reset(ts);
        }
    }
}
