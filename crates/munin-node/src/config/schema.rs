use std::collections::HashSet;
use std::net::SocketAddr;

use serde::Deserialize;
use munin_core::error::{MuninError, Result};
use munin_core::protocol::{is_valid_graph_name, sanitize};
use munin_core::{Number, Property, TimeUnit, Units};

use crate::graph::{DataSource, DataSourceConfig, Graph};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    pub version: u32,

    #[serde(default)]
    pub node: NodeSection,

    #[serde(default)]
    pub discover: DiscoverSection,

    #[serde(default)]
    pub graphs: Vec<GraphConfig>,
}

impl NodeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MuninError::BadRequest(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.node.validate()?;

        let mut names = HashSet::new();
        for graph in &self.graphs {
            graph.validate()?;
            let name = graph.graph_name();
            if !names.insert(name.clone()) {
                return Err(MuninError::BadRequest(format!(
                    "graphs: duplicate graph name {name}"
                )));
            }
        }
        Ok(())
    }

    /// Build the configured graphs.
    pub fn build_graphs(&self) -> Result<Vec<Graph>> {
        self.graphs.iter().map(GraphConfig::build).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Reported host name; detected from the system when unset.
    #[serde(default)]
    pub hostname: Option<String>,

    #[serde(default = "default_rate_unit")]
    pub rate_unit: TimeUnit,

    #[serde(default = "default_duration_unit")]
    pub duration_unit: TimeUnit,

    /// Register the node's own activity metrics and graph.
    #[serde(default = "default_instrument")]
    pub instrument: bool,
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            hostname: None,
            rate_unit: default_rate_unit(),
            duration_unit: default_duration_unit(),
            instrument: default_instrument(),
        }
    }
}

impl NodeSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if let Some(h) = &self.hostname {
            if h.trim().is_empty() {
                return Err(MuninError::BadRequest("node.hostname must not be empty".into()));
            }
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            MuninError::BadRequest(format!("node.listen must be a valid SocketAddr: {e}"))
        })
    }

    pub fn units(&self) -> Units {
        Units::new(self.rate_unit, self.duration_unit)
    }
}

fn default_listen() -> String {
    "127.0.0.1:4951".into()
}
fn default_rate_unit() -> TimeUnit {
    TimeUnit::Seconds
}
fn default_duration_unit() -> TimeUnit {
    TimeUnit::Nanoseconds
}
fn default_instrument() -> bool {
    true
}

/// Derive graphs from metric names (`a.b.c` => graph `a_b_c`).
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoverSection {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default)]
    pub property: Option<Property>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphConfig {
    /// Defaults to `<category>_<title>`, sanitized.
    #[serde(default)]
    pub name: Option<String>,
    pub category: String,
    pub title: String,

    #[serde(default)]
    pub vlabel: String,

    #[serde(default)]
    pub args: Option<String>,

    #[serde(default)]
    pub data_sources: Vec<DataSourceEntry>,
}

impl GraphConfig {
    pub fn graph_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => sanitize(&format!("{}_{}", self.category, self.title)),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let name = self.graph_name();
        if !is_valid_graph_name(&name) {
            return Err(MuninError::BadRequest(format!(
                "graphs: invalid graph name {name:?}"
            )));
        }
        for ds in &self.data_sources {
            ds.validate(&name)?;
        }
        Ok(())
    }

    pub fn build(&self) -> Result<Graph> {
        let mut builder = Graph::builder(self.graph_name(), &self.category, &self.title).vlabel(&self.vlabel);
        if let Some(args) = &self.args {
            builder = builder.args(args);
        }
        for ds in &self.data_sources {
            builder = builder.push(ds.to_data_source()?);
        }
        builder.build()
    }
}

/// One data source. Exactly one of `metric` or `prefix` must be set.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSourceEntry {
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub property: Option<Property>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub min: Option<Number>,
    #[serde(default)]
    pub max: Option<Number>,
    #[serde(default)]
    pub cdef: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub draw: Option<String>,
    #[serde(default)]
    pub line: Option<String>,
    #[serde(default)]
    pub stack: Option<String>,
}

impl DataSourceEntry {
    pub fn validate(&self, graph: &str) -> Result<()> {
        match (&self.metric, &self.prefix) {
            (Some(_), None) => Ok(()),
            (None, Some(_)) if self.label.is_none() && self.name.is_none() => Ok(()),
            (None, Some(_)) => Err(MuninError::BadRequest(format!(
                "graphs.{graph}: label and name apply to single-metric data sources only"
            ))),
            _ => Err(MuninError::BadRequest(format!(
                "graphs.{graph}: data source needs exactly one of metric or prefix"
            ))),
        }
    }

    fn config(&self) -> DataSourceConfig {
        DataSourceConfig {
            name: self.name.clone(),
            min: self.min,
            max: self.max,
            cdef: self.cdef.clone(),
            color: self.color.clone(),
            draw: self.draw.clone(),
            line: self.line.clone(),
            stack: self.stack.clone(),
        }
    }

    pub fn to_data_source(&self) -> Result<DataSource> {
        match (&self.metric, &self.prefix) {
            (Some(metric), None) => Ok(DataSource::for_metric(
                metric,
                self.label.as_deref(),
                self.property,
                self.config(),
            )),
            (None, Some(prefix)) => Ok(DataSource::for_prefix(prefix, self.property, self.config())),
            _ => Err(MuninError::BadRequest(
                "data source needs exactly one of metric or prefix".into(),
            )),
        }
    }
}
