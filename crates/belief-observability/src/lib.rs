//! # belief-observability
//!
//! Structured logging setup, span macros, log events for lifecycle
//! transitions, and lock-free pipeline counters.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::{MetricsSnapshot, PipelineMetrics};
pub use tracing_setup::{init_from_config, init_tracing, init_tracing_json};
