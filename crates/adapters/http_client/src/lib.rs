//! # alerthub-adapter-http-client
//!
//! Driven adapter implementing the [`UpdateSink`](alerthub_app::ports::UpdateSink)
//! port with [reqwest](https://docs.rs/reqwest).
//!
//! Each update becomes one `POST /trigger` with a `{"sensor", "value"}` JSON
//! body. Every request is bounded by a timeout. Only failures to connect are
//! retried, so an update the server may already have applied is never sent
//! again.

mod config;
mod error;
mod sink;

pub use config::ApiConfig;
pub use error::DeliveryError;
pub use sink::HttpUpdateSink;
