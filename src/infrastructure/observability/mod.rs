//! Observability for kumo
//!
//! Structured logs through `tracing` and Prometheus metrics rendered by the
//! server at `/metrics`.

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::Metrics;
