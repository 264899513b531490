//! munin node library entry.
//!
//! Wires graph definitions, graph providers, the command processor and the
//! TCP transport into an embeddable munin node. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod config;
pub mod graph;
pub mod hostname;
pub mod obs;
pub mod processor;
pub mod provider;
pub mod registry;
pub mod reporter;
pub mod transport;

pub use graph::{DataSource, DataSourceConfig, Graph, GraphBuilder};
pub use hostname::{Hostname, StaticHostname, SystemHostname};
pub use processor::{CommandProcessor, Reply};
pub use provider::{ConventionGraphProvider, GraphProvider, StaticGraphProvider};
pub use registry::GraphRegistry;
pub use reporter::{Reporter, ReporterBuilder};
