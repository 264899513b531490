//! One plotted line of a graph.

use munin_core::metrics::MetricRegistry;
use munin_core::protocol;
use munin_core::{Number, Property};

/// Optional display overrides for a data source.
///
/// Unset attributes are left out of the `config` response, except `min`
/// which falls back to `0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSourceConfig {
    pub name: Option<String>,
    pub min: Option<Number>,
    pub max: Option<Number>,
    pub cdef: Option<String>,
    pub color: Option<String>,
    pub draw: Option<String>,
    pub line: Option<String>,
    pub stack: Option<String>,
}

impl DataSourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name used for the field instead of the metric name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_min(mut self, min: impl Into<Number>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn with_max(mut self, max: impl Into<Number>) -> Self {
        self.max = Some(max.into());
        self
    }

    pub fn with_cdef(mut self, cdef: impl Into<String>) -> Self {
        self.cdef = Some(cdef.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_draw(mut self, draw: impl Into<String>) -> Self {
        self.draw = Some(draw.into());
        self
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.line = Some(line.into());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// Which metrics feed a data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricSelector {
    /// Fixed metric names.
    Names(Vec<String>),
    /// Every registered metric whose name starts with the prefix.
    Prefix(String),
}

/// Binds metric(s) to a property and display settings.
///
/// Each bound metric becomes one protocol field. The property may be left
/// unset; it is then resolved per metric kind when the graph is queried, so
/// a data source can name a metric that is registered later.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSource {
    metrics: MetricSelector,
    label: Option<String>,
    property: Option<Property>,
    config: DataSourceConfig,
}

impl DataSource {
    /// Single-metric data source. The label defaults to the metric name.
    pub fn for_metric(
        metric: impl Into<String>,
        label: Option<&str>,
        property: Option<Property>,
        config: DataSourceConfig,
    ) -> Self {
        Self {
            metrics: MetricSelector::Names(vec![metric.into()]),
            label: label.map(str::to_string),
            property,
            config,
        }
    }

    /// One field per listed metric, each labelled with its metric name.
    pub fn for_metrics<I, S>(metrics: I, property: Option<Property>, config: DataSourceConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            metrics: MetricSelector::Names(metrics.into_iter().map(Into::into).collect()),
            label: None,
            property,
            config,
        }
    }

    /// One field per registered metric under `prefix`, resolved at query time.
    pub fn for_prefix(prefix: impl Into<String>, property: Option<Property>, config: DataSourceConfig) -> Self {
        Self {
            metrics: MetricSelector::Prefix(prefix.into()),
            label: None,
            property,
            config,
        }
    }

    pub fn selector(&self) -> &MetricSelector {
        &self.metrics
    }

    /// Metric names feeding this data source, in field order.
    pub fn metric_names(&self, registry: &MetricRegistry) -> Vec<String> {
        match &self.metrics {
            MetricSelector::Names(names) => names.clone(),
            MetricSelector::Prefix(prefix) => registry
                .names()
                .into_iter()
                .filter(|n| n.starts_with(prefix.as_str()))
                .collect(),
        }
    }

    fn is_single(&self) -> bool {
        matches!(&self.metrics, MetricSelector::Names(names) if names.len() == 1)
    }

    pub fn label<'a>(&'a self, metric: &'a str) -> &'a str {
        match &self.label {
            Some(label) if self.is_single() => label,
            _ => metric,
        }
    }

    /// Display name of the field for `metric` (before sanitizing).
    pub fn name<'a>(&'a self, metric: &'a str) -> &'a str {
        match &self.config.name {
            Some(name) if self.is_single() => name,
            _ => metric,
        }
    }

    /// Protocol field name for `metric` read through `property`.
    pub fn field_name(&self, metric: &str, property: Property) -> String {
        protocol::field_name(self.name(metric), property.id())
    }

    /// Field name when it does not depend on the registry.
    pub(crate) fn static_field_name(&self) -> Option<String> {
        match (&self.metrics, self.property) {
            (MetricSelector::Names(names), Some(property)) if names.len() == 1 => {
                Some(self.field_name(&names[0], property))
            }
            _ => None,
        }
    }

    /// Explicitly chosen property, if any.
    pub fn property(&self) -> Option<Property> {
        self.property
    }

    pub fn config(&self) -> &DataSourceConfig {
        &self.config
    }

    pub fn min(&self) -> Number {
        self.config.min.unwrap_or_default()
    }

    pub fn max(&self) -> Option<Number> {
        self.config.max
    }

    pub fn cdef(&self) -> Option<&str> {
        self.config.cdef.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.config.color.as_deref()
    }

    pub fn draw(&self) -> Option<&str> {
        self.config.draw.as_deref()
    }

    pub fn line(&self) -> Option<&str> {
        self.config.line.as_deref()
    }

    pub fn stack(&self) -> Option<&str> {
        self.config.stack.as_deref()
    }
}
