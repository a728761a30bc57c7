//! # alerthub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `UpdateSink` — deliver a resolved sensor update to the status service
//! - Define **driving/inbound ports** as use-case structs:
//!   - `SensorService` — status snapshot, trigger, reset
//!   - `Gateway` — resolve decoded device events and hand them to a sink
//! - Provide **in-process infrastructure** that doesn't need IO
//!   (the `StateStore`)
//! - Orchestrate domain objects without knowing *how* transport or HTTP works
//!
//! ## Dependency rule
//! Depends on `alerthub-domain` only (plus `tokio::sync` for locks and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod gateway;
pub mod ports;
pub mod services;
pub mod state_store;
