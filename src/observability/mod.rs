//! # Observability
//!
//! Prometheus metrics for the controller. Logging goes through `tracing` and
//! is configured in `runtime::initialization`.

pub mod metrics;

pub use metrics::*;
