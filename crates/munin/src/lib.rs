//! Top-level facade crate for munin.
//!
//! Re-exports the metric/protocol core and the node library so applications
//! can depend on a single crate.

pub mod core {
    pub use munin_core::*;
}

pub mod node {
    pub use munin_node::*;
}

pub use munin_core::{MetricRegistry, MuninError, Result};
pub use munin_node::{Graph, Reporter};
