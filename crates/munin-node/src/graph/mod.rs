//! Graph definitions and the fluent graph builder.

pub mod data_source;

use std::collections::HashSet;

use munin_core::error::{MuninError, Result};
use munin_core::protocol::is_valid_graph_name;
use munin_core::Property;

pub use data_source::{DataSource, DataSourceConfig, MetricSelector};

/// A protocol-addressable graph: display metadata plus ordered data sources.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    name: String,
    category: String,
    title: String,
    vlabel: String,
    args: Option<String>,
    data_sources: Vec<DataSource>,
}

impl Graph {
    /// Graph without data sources.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<Graph> {
        Graph::builder(name, category, title).build()
    }

    pub fn builder(
        name: impl Into<String>,
        category: impl Into<String>,
        title: impl Into<String>,
    ) -> GraphBuilder {
        GraphBuilder {
            name: name.into(),
            category: category.into(),
            title: title.into(),
            vlabel: String::new(),
            args: None,
            data_sources: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn vlabel(&self) -> &str {
        &self.vlabel
    }

    pub fn args(&self) -> Option<&str> {
        self.args.as_deref()
    }

    pub fn data_sources(&self) -> &[DataSource] {
        &self.data_sources
    }
}

/// Accumulates graph settings; `build` validates and freezes them.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    name: String,
    category: String,
    title: String,
    vlabel: String,
    args: Option<String>,
    data_sources: Vec<DataSource>,
}

impl GraphBuilder {
    /// Rename the graph.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn vlabel(mut self, vlabel: impl Into<String>) -> Self {
        self.vlabel = vlabel.into();
        self
    }

    /// Extra plotting arguments (`graph_args`).
    pub fn args(mut self, args: impl Into<String>) -> Self {
        self.args = Some(args.into());
        self
    }

    /// Data source over `metric` with default label and property.
    pub fn data_source(self, metric: impl Into<String>) -> Self {
        self.data_source_with(metric, None, None, DataSourceConfig::default())
    }

    pub fn data_source_labeled(self, metric: impl Into<String>, label: &str) -> Self {
        self.data_source_with(metric, Some(label), None, DataSourceConfig::default())
    }

    pub fn data_source_with(
        mut self,
        metric: impl Into<String>,
        label: Option<&str>,
        property: Option<Property>,
        config: DataSourceConfig,
    ) -> Self {
        self.data_sources
            .push(DataSource::for_metric(metric, label, property, config));
        self
    }

    /// Append an already built data source.
    pub fn push(mut self, data_source: DataSource) -> Self {
        self.data_sources.push(data_source);
        self
    }

    pub fn build(self) -> Result<Graph> {
        if !is_valid_graph_name(&self.name) {
            return Err(MuninError::InvalidGraphName(self.name));
        }

        let mut seen = HashSet::new();
        for field in self.data_sources.iter().filter_map(DataSource::static_field_name) {
            if !seen.insert(field.clone()) {
                return Err(MuninError::DuplicateField {
                    graph: self.name,
                    field,
                });
            }
        }

        Ok(Graph {
            name: self.name,
            category: self.category,
            title: self.title,
            vlabel: self.vlabel,
            args: self.args,
            data_sources: self.data_sources,
        })
    }
}

/// Shorthand for a data source config that only sets the field name:
/// `.data_source_with(REQUESTS, Some("Requests"), None, field_name("requests"))`.
pub fn field_name(name: impl Into<String>) -> DataSourceConfig {
    DataSourceConfig::new().with_name(name)
}
