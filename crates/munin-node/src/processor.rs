//! Protocol command processor.
//!
//! Maps one parsed request to the exact response lines. The processor is
//! stateless apart from shared handles, so one instance serves every
//! connection.

use std::sync::Arc;

use munin_core::error::Result;
use munin_core::metrics::MetricRegistry;
use munin_core::protocol::{self, Command, Request, END, UNKNOWN_SERVICE};
use munin_core::{Metric, Number, Property, Units};

use crate::graph::{DataSource, Graph};
use crate::hostname::Hostname;
use crate::registry::GraphRegistry;

/// Outcome of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Lines to send, without terminators.
    Lines(Vec<String>),
    /// Close the connection.
    Quit,
}

impl Reply {
    fn lines<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Reply {
        Reply::Lines(lines.into_iter().map(Into::into).collect())
    }
}

/// One field of a graph: the metric it reads and how.
struct Field<'a> {
    name: String,
    metric_name: String,
    metric: Option<Metric>,
    property: Property,
    source: &'a DataSource,
}

pub struct CommandProcessor {
    metrics: MetricRegistry,
    graphs: Arc<GraphRegistry>,
    hostname: Arc<dyn Hostname>,
    units: Units,
}

impl CommandProcessor {
    pub fn new(metrics: MetricRegistry, graphs: Arc<GraphRegistry>, hostname: Arc<dyn Hostname>) -> Self {
        Self {
            metrics,
            graphs,
            hostname,
            units: Units::default(),
        }
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn graphs(&self) -> &Arc<GraphRegistry> {
        &self.graphs
    }

    pub fn metrics(&self) -> &MetricRegistry {
        &self.metrics
    }

    /// Line sent when a poller connects.
    pub fn greeting(&self) -> String {
        protocol::greeting(&self.hostname.hostname())
    }

    /// Answer `command` with `args`.
    ///
    /// An unknown command fails with `UnknownCommand`. A failure while
    /// reading a metric aborts the whole response.
    pub fn process(&self, command: &str, args: &[&str]) -> Result<Reply> {
        let command: Command = command.parse()?;
        self.dispatch(command, args)
    }

    pub fn process_request(&self, request: &Request) -> Result<Reply> {
        self.process(&request.command, &request.args())
    }

    fn dispatch(&self, command: Command, args: &[&str]) -> Result<Reply> {
        match command {
            Command::List => Ok(self.list()),
            Command::Config => self.config(args.first().copied()),
            Command::Fetch => self.fetch(args.first().copied()),
            Command::Nodes => Ok(Reply::lines([self.hostname.hostname(), END.to_string()])),
            Command::Version => Ok(Reply::lines([protocol::version_line(&self.hostname.hostname())])),
            Command::Quit => Ok(Reply::Quit),
        }
    }

    fn list(&self) -> Reply {
        Reply::lines([self.graphs.graph_names().join(" ")])
    }

    fn config(&self, name: Option<&str>) -> Result<Reply> {
        let Some(graph) = name.and_then(|n| self.graphs.lookup(n)) else {
            return Ok(unknown_service());
        };

        let mut lines = vec![
            format!("graph_title {}", graph.title()),
            format!("graph_category {}", graph.category()),
        ];
        if let Some(args) = graph.args() {
            lines.push(format!("graph_args {args}"));
        }
        lines.push(format!("graph_vlabel {}", graph.vlabel()));

        for field in self.fields(&graph) {
            let Field {
                name,
                metric_name,
                property,
                source,
                ..
            } = field;
            lines.push(format!("{name}.label {}", source.label(&metric_name)));
            lines.push(format!("{name}.type {}", property.data_type()));
            lines.push(format!("{name}.min {}", source.min()));
            if let Some(max) = source.max() {
                lines.push(format!("{name}.max {max}"));
            }
            let optional = [
                ("cdef", source.cdef()),
                ("colour", source.color()),
                ("draw", source.draw()),
                ("line", source.line()),
                ("stack", source.stack()),
            ];
            for (attr, value) in optional {
                if let Some(value) = value {
                    lines.push(format!("{name}.{attr} {value}"));
                }
            }
        }
        lines.push(END.to_string());
        Ok(Reply::Lines(lines))
    }

    fn fetch(&self, name: Option<&str>) -> Result<Reply> {
        let Some(graph) = name.and_then(|n| self.graphs.lookup(n)) else {
            return Ok(unknown_service());
        };

        let mut lines = Vec::new();
        for field in self.fields(&graph) {
            let value = match &field.metric {
                Some(metric) => field.property.value(metric, None, self.units)?.to_string(),
                None => Number::Float(f64::NAN).to_string(),
            };
            lines.push(format!("{}.value {value}", field.name));
        }
        lines.push(END.to_string());
        Ok(Reply::Lines(lines))
    }

    /// Fields of `graph` in order, shared by `config` and `fetch` so both
    /// report the same field names.
    fn fields<'a>(&self, graph: &'a Graph) -> Vec<Field<'a>> {
        let mut fields = Vec::new();
        for source in graph.data_sources() {
            for metric_name in source.metric_names(&self.metrics) {
                let metric = self.metrics.get(&metric_name);
                let property = match (source.property(), &metric) {
                    (explicit, Some(m)) => Property::resolve(explicit, m),
                    (Some(explicit), None) => explicit,
                    (None, None) => {
                        tracing::debug!(graph = graph.name(), metric = %metric_name, "metric not registered, field skipped");
                        continue;
                    }
                };
                fields.push(Field {
                    name: source.field_name(&metric_name, property),
                    metric_name,
                    metric,
                    property,
                    source,
                });
            }
        }
        fields
    }
}

fn unknown_service() -> Reply {
    Reply::lines([UNKNOWN_SERVICE, END])
}

impl std::fmt::Debug for CommandProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandProcessor")
            .field("graphs", &self.graphs)
            .field("units", &self.units)
            .finish()
    }
}

