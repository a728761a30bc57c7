//! Application services — use-case implementations.

pub mod sensor_service;
