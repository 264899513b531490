//! Self-instrumentation.
//!
//! The node records its own activity in the same metric registry it serves,
//! so a poller can graph the node like any other application.

pub mod metrics;

pub use metrics::NodeMetrics;
