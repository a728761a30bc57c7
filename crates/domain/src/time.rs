//! Time and timestamp helpers.

use chrono::{DateTime, Local, Utc};

/// UTC timestamp used for `updated_at`, snapshot times, etc.
pub type Timestamp = DateTime<Utc>;

/// Layout of the `last_updated` field served by the status endpoint.
pub const STATUS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Render a timestamp in the host's local time as `YYYY-MM-DD HH:MM:SS`.
#[must_use]
pub fn format_local(ts: Timestamp) -> String {
    ts.with_timezone(&Local)
        .format(STATUS_TIME_FORMAT)
        .to_string()
}
