//! Delivery port — how the gateway hands resolved updates to the status service.

use std::future::Future;

use alerthub_domain::error::AlertHubError;
use alerthub_domain::sensor::SensorUpdate;

/// Destination for resolved sensor updates.
///
/// The production implementation posts to the status service over HTTP;
/// tests substitute in-memory recorders.
pub trait UpdateSink: Send + Sync {
    /// Deliver one update.
    ///
    /// Implementations must bound the time they spend on a single update and
    /// report failures instead of panicking; the caller drops the update and
    /// moves on.
    fn deliver(
        &self,
        update: &SensorUpdate,
    ) -> impl Future<Output = Result<(), AlertHubError>> + Send;
}

impl<T: UpdateSink> UpdateSink for std::sync::Arc<T> {
    fn deliver(
        &self,
        update: &SensorUpdate,
    ) -> impl Future<Output = Result<(), AlertHubError>> + Send {
        (**self).deliver(update)
    }
}
