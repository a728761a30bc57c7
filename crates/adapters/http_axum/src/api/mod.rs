//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod commands;
pub mod status;

use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

/// Build the API sub-router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(status::home))
        .route("/status", get(status::status))
        .route("/sensors", get(status::sensors))
        .route("/trigger", post(commands::trigger))
        .route("/reset", post(commands::reset))
}
