//! Node activity metrics and their graphs.

use std::sync::Arc;

use munin_core::error::Result;
use munin_core::metrics::{Counter, Meter, MetricRegistry, Timer};
use munin_core::property::{CounterProperty, MeterProperty, TimerProperty};
use munin_core::Property;

use crate::graph::{field_name, Graph};
use crate::provider::StaticGraphProvider;

pub const CONNECTIONS: &str = "munin.node.connections";
pub const COMMANDS: &str = "munin.node.commands";
pub const FETCH: &str = "munin.node.fetch";

/// Handles to the node's own metrics.
#[derive(Debug, Clone)]
pub struct NodeMetrics {
    connections: Arc<Counter>,
    commands: Arc<Meter>,
    fetch: Arc<Timer>,
}

impl NodeMetrics {
    /// Register (or reuse) the node metrics in `registry`.
    pub fn register(registry: &MetricRegistry) -> Result<Self> {
        Ok(Self {
            connections: registry.counter(CONNECTIONS)?,
            commands: registry.meter(COMMANDS)?,
            fetch: registry.timer(FETCH)?,
        })
    }

    pub fn connection_opened(&self) {
        self.connections.inc();
    }

    pub fn connection_closed(&self) {
        self.connections.dec();
    }

    pub fn command(&self) {
        self.commands.mark();
    }

    pub fn fetch_timer(&self) -> &Timer {
        &self.fetch
    }

    pub fn open_connections(&self) -> i64 {
        self.connections.count()
    }

    /// The `munin_node` graph over the metrics above.
    pub fn graphs(&self) -> Result<StaticGraphProvider> {
        let graph = Graph::builder("munin_node", "munin", "munin node activity")
            .vlabel("per ${graph_period}")
            .data_source_with(
                CONNECTIONS,
                Some("open connections"),
                Some(Property::Counter(CounterProperty::Gauge)),
                field_name("connections"),
            )
            .data_source_with(
                COMMANDS,
                Some("commands"),
                Some(Property::Meter(MeterProperty::OneMinuteRate)),
                field_name("commands"),
            )
            .data_source_with(
                FETCH,
                Some("fetches"),
                Some(Property::Timer(TimerProperty::OneMinuteRate)),
                field_name("fetch"),
            )
            .build()?;
        Ok(StaticGraphProvider::new([graph]))
    }
}
