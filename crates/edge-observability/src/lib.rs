//! Structured logging and invocation metrics for the edge adapter.
//!
//! This crate provides:
//! - `StructuredLogger` - Correlated log lines emitted through `tracing`
//! - `InvocationMetrics` - Per-invocation timing and outcome summary

mod logging;
mod metrics;

pub use logging::*;
pub use metrics::*;

// Re-export RequestId and TimingContext from edge-core for convenience
pub use edge_core::{RequestId, TimingContext};
