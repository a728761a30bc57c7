//! Lifetime of the reader and delivery tasks, from start to bounded shutdown.
//!
//! The delivery loop runs until the reader closes the channel or shutdown is
//! requested. On shutdown the reader is stopped first, then buffered events
//! get the grace period to be delivered. Whatever is still queued after that
//! is dropped.

use std::future::Future;
use std::time::Duration;

use alerthub_adapter_serial::{ReaderHandle, SerialError};
use alerthub_app::gateway::{Gateway, GatewayStats};
use alerthub_app::ports::UpdateSink;
use alerthub_domain::event::RawEvent;
use tokio::sync::mpsc;

/// Time limits applied once shutdown is requested.
#[derive(Debug, Clone, Copy)]
pub struct ShutdownLimits {
    /// How long buffered events may take to be delivered.
    pub grace: Duration,
    /// How long to wait for the reader thread after the delivery loop ended.
    pub reader_timeout: Duration,
}

/// Drive `gateway` over `events` until the stream ends or `shutdown` fires.
///
/// Returns the delivery totals, or `None` when the grace period expired
/// before the queue was drained.
///
/// # Errors
///
/// Returns the reader's error when it gave up on the device.
pub async fn supervise<S>(
    gateway: Gateway<S>,
    events: mpsc::Receiver<RawEvent>,
    reader: ReaderHandle,
    shutdown: impl Future<Output = ()>,
    limits: ShutdownLimits,
) -> Result<Option<GatewayStats>, SerialError>
where
    S: UpdateSink + 'static,
{
    let mut delivery = tokio::spawn(async move { gateway.run(events).await });

    let finished = tokio::select! {
        () = shutdown => None,
        joined = &mut delivery => Some(joined),
    };

    let joined = match finished {
        Some(joined) => Some(joined),
        None => {
            tracing::info!("shutdown requested, stopping device reader");
            reader.stop();
            if let Ok(joined) = tokio::time::timeout(limits.grace, &mut delivery).await {
                Some(joined)
            } else {
                tracing::warn!(
                    grace_ms = limits.grace.as_millis(),
                    "buffered events not delivered within grace period, dropping them"
                );
                delivery.abort();
                None
            }
        }
    };

    let stats = match joined {
        Some(Ok(stats)) => Some(stats),
        Some(Err(err)) => {
            tracing::error!(%err, "gateway task failed");
            None
        }
        None => None,
    };

    // The reader notices the stop flag within one read timeout.
    match tokio::time::timeout(limits.reader_timeout, reader.join()).await {
        Ok(Ok(())) => Ok(stats),
        Ok(Err(err)) => {
            tracing::error!(%err, "device reader failed");
            Err(err)
        }
        Err(_) => {
            tracing::warn!("device reader did not stop in time");
            Ok(stats)
        }
    }
}
