//! munin core: metrics registry, property catalog, wire protocol primitives
//! and the shared error type.
//!
//! This crate carries no transport or runtime dependency so the same
//! primitives serve the node, its tests and any embedding application.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `MuninError`/`Result` so a poller sending
//! garbage, or a graph bound to the wrong metric, cannot crash the host
//! process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;
pub mod number;
pub mod property;
pub mod protocol;
pub mod units;

/// Shared result type.
pub use error::{ErrorCode, MuninError, Result};
pub use metrics::{Metric, MetricKind, MetricRegistry};
pub use number::Number;
pub use property::{DataType, Property};
pub use units::{TimeUnit, Units};
