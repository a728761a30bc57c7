//! # alerthub-domain
//!
//! Pure domain model for the alerthub sensor relay.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, timestamps
//! - Define **Sensors** (identifier, value token, record with last update)
//! - Define the **Sensor Registry** (closed set of device codes → identifiers)
//! - Define the **device line format** (`<CODE>:<VALUE>` framing rule)
//! - Contain all invariant enforcement and domain logic
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod time;

pub mod event;
pub mod registry;
pub mod sensor;
