//! Gateway — turns decoded device events into updates for the status service.
//!
//! The device reader pushes [`RawEvent`]s into a channel; [`Gateway::run`]
//! drains it, resolves each event through the [`SensorRegistry`] and hands
//! the result to an [`UpdateSink`]. A failure is confined to the event that
//! caused it: the loop logs it and moves on to the next one.

use tokio::sync::mpsc;

use alerthub_domain::event::RawEvent;
use alerthub_domain::registry::SensorRegistry;
use alerthub_domain::sensor::{SensorUpdate, SensorValue};

use crate::ports::UpdateSink;

/// What happened to a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The update reached the status service.
    Delivered(SensorUpdate),
    /// The device code is not in the registry; nothing was sent.
    UnknownDevice(String),
    /// The device is known but the value is blank; nothing was sent.
    InvalidValue(String),
    /// The update was sent but failed; it is dropped.
    Failed(SensorUpdate),
}

/// Running totals kept by [`Gateway::run`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GatewayStats {
    pub delivered: u64,
    pub unknown_device: u64,
    pub invalid_value: u64,
    pub failed: u64,
}

impl GatewayStats {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Delivered(_) => self.delivered += 1,
            Outcome::UnknownDevice(_) => self.unknown_device += 1,
            Outcome::InvalidValue(_) => self.invalid_value += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Resolves device events and delivers them one at a time.
pub struct Gateway<S> {
    registry: SensorRegistry,
    sink: S,
}

impl<S: UpdateSink> Gateway<S> {
    /// Create a gateway that resolves through `registry` and delivers to `sink`.
    pub fn new(registry: SensorRegistry, sink: S) -> Self {
        Self { registry, sink }
    }

    /// Map a raw event to an update.
    ///
    /// # Errors
    ///
    /// Returns the [`Outcome`] explaining why nothing can be sent: an
    /// unknown device code or a blank value.
    pub fn resolve(&self, event: &RawEvent) -> Result<SensorUpdate, Outcome> {
        let sensor = self
            .registry
            .resolve(&event.device_code)
            .ok_or_else(|| Outcome::UnknownDevice(event.device_code.clone()))?
            .clone();
        let value = SensorValue::new(event.raw_value.as_str())
            .map_err(|_| Outcome::InvalidValue(event.device_code.clone()))?;
        Ok(SensorUpdate { sensor, value })
    }

    /// Resolve and deliver one event.
    pub async fn handle(&self, event: RawEvent) -> Outcome {
        let update = match self.resolve(&event) {
            Ok(update) => update,
            Err(outcome) => {
                match &outcome {
                    Outcome::UnknownDevice(code) => {
                        tracing::debug!(%code, "ignoring event from unknown device");
                    }
                    _ => tracing::debug!(
                        code = %event.device_code,
                        value = %event.raw_value,
                        "ignoring event with invalid value"
                    ),
                }
                return outcome;
            }
        };

        match self.sink.deliver(&update).await {
            Ok(()) => {
                tracing::info!(sensor = %update.sensor, value = %update.value, "update delivered");
                Outcome::Delivered(update)
            }
            Err(err) => {
                tracing::warn!(
                    %err,
                    sensor = %update.sensor,
                    value = %update.value,
                    "delivery failed, dropping update"
                );
                Outcome::Failed(update)
            }
        }
    }

    /// Drain `events` until every sender is gone, delivering in arrival order.
    pub async fn run(&self, mut events: mpsc::Receiver<RawEvent>) -> GatewayStats {
        let mut stats = GatewayStats::default();
        while let Some(event) = events.recv().await {
            let outcome = self.handle(event).await;
            stats.record(&outcome);
        }
        tracing::info!(
            delivered = stats.delivered,
            unknown_device = stats.unknown_device,
            invalid_value = stats.invalid_value,
            failed = stats.failed,
            "gateway loop finished"
        );
        stats
    }
}
