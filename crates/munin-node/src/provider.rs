//! Graph providers: named sources of graph definitions.

use std::collections::BTreeMap;
use std::sync::Arc;

use munin_core::metrics::MetricRegistry;
use munin_core::protocol::{is_valid_graph_name, sanitize};
use munin_core::Property;

use crate::graph::{DataSource, DataSourceConfig, Graph};

/// A source of graphs keyed by name.
///
/// Providers are shared across connection tasks, so implementations must be
/// thread-safe. Returning a name from `graph_names` that `graph` cannot
/// resolve is allowed; the registry treats it as a miss.
pub trait GraphProvider: Send + Sync {
    fn graph_names(&self) -> Vec<String>;

    fn graph(&self, name: &str) -> Option<Arc<Graph>>;
}

/// Fixed set of graphs. A later graph with the same name replaces an earlier one.
#[derive(Debug, Clone, Default)]
pub struct StaticGraphProvider {
    graphs: BTreeMap<String, Arc<Graph>>,
}

impl StaticGraphProvider {
    pub fn new(graphs: impl IntoIterator<Item = Graph>) -> Self {
        let graphs = graphs
            .into_iter()
            .map(|g| (g.name().to_string(), Arc::new(g)))
            .collect();
        Self { graphs }
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

impl GraphProvider for StaticGraphProvider {
    fn graph_names(&self) -> Vec<String> {
        self.graphs.keys().cloned().collect()
    }

    fn graph(&self, name: &str) -> Option<Arc<Graph>> {
        self.graphs.get(name).cloned()
    }
}

/// Derives one graph per registered metric from its dotted name.
///
/// `app.db.queries` becomes graph `app_db_queries` in category `app`, titled
/// `db - queries`, with a single data source over the metric. Metrics with
/// fewer than three segments, or whose sanitized name is not a valid graph
/// name, are skipped. When two metrics sanitize to the same graph name the
/// lexicographically first one wins.
#[derive(Debug, Clone)]
pub struct ConventionGraphProvider {
    registry: MetricRegistry,
    prefix: Option<String>,
    property: Option<Property>,
}

impl ConventionGraphProvider {
    pub fn new(registry: MetricRegistry) -> Self {
        Self {
            registry,
            prefix: None,
            property: None,
        }
    }

    /// Only consider metrics whose name starts with `prefix`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Read every derived graph through `property` instead of the kind default.
    pub fn with_property(mut self, property: Property) -> Self {
        self.property = Some(property);
        self
    }

    /// `(graph name, metric name)` for every eligible metric.
    fn derived(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for metric in self.registry.names() {
            if let Some(prefix) = &self.prefix {
                if !metric.starts_with(prefix.as_str()) {
                    continue;
                }
            }
            if metric.split('.').count() < 3 {
                continue;
            }
            let graph = sanitize(&metric);
            if !is_valid_graph_name(&graph) {
                continue;
            }
            out.entry(graph).or_insert(metric);
        }
        out
    }

    fn build(&self, graph_name: &str, metric: &str) -> Option<Graph> {
        let mut segments = metric.split('.');
        let category = segments.next()?;
        let title = segments.collect::<Vec<_>>().join(" - ");
        Graph::builder(graph_name, category, title)
            .push(DataSource::for_metric(
                metric,
                None,
                self.property,
                DataSourceConfig::default(),
            ))
            .build()
            .ok()
    }
}

impl GraphProvider for ConventionGraphProvider {
    fn graph_names(&self) -> Vec<String> {
        self.derived().into_keys().collect()
    }

    fn graph(&self, name: &str) -> Option<Arc<Graph>> {
        let derived = self.derived();
        let metric = derived.get(name)?;
        self.build(name, metric).map(Arc::new)
    }
}
