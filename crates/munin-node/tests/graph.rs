//! Graph builder and data source tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use munin_core::metrics;
use munin_core::property::{CounterProperty, MeterProperty};
use munin_core::{MetricRegistry, Number, Property};
use munin_node::graph::{field_name, MetricSelector};
use munin_node::{DataSource, DataSourceConfig, Graph};

#[test]
fn empty_builder_equals_plain_graph() {
    let built = Graph::builder("n", "c", "t").build().unwrap();
    assert_eq!(built, Graph::new("n", "c", "t").unwrap());
    assert!(built.data_sources().is_empty());
    assert_eq!(built.vlabel(), "");
    assert_eq!(built.args(), None);
}

#[test]
fn builder_shortcuts_produce_single_metric_sources() {
    let property = Property::Meter(MeterProperty::MeanRate);
    let cfg = DataSourceConfig::new().with_draw("LINE2");

    let graph = Graph::builder("n", "c", "t")
        .data_source("t1")
        .data_source_labeled("t2", "label")
        .data_source_with("t3", Some("label"), Some(property), cfg.clone())
        .build()
        .unwrap();

    assert_eq!(
        graph.data_sources(),
        &[
            DataSource::for_metric("t1", None, None, DataSourceConfig::default()),
            DataSource::for_metric("t2", Some("label"), None, DataSourceConfig::default()),
            DataSource::for_metric("t3", Some("label"), Some(property), cfg),
        ]
    );
}

#[test]
fn invalid_graph_names_are_rejected() {
    for bad in ["", "1abc", "a-b", "gr.t1"] {
        let err = Graph::new(bad, "c", "t").expect_err("invalid name");
        assert_eq!(err.code().as_str(), "INVALID_GRAPH_NAME", "name={bad:?}");
    }
    let err = Graph::builder("ok", "c", "t").name("not ok").build().expect_err("renamed");
    assert_eq!(err.code().as_str(), "INVALID_GRAPH_NAME");
}

#[test]
fn statically_duplicate_fields_are_rejected() {
    let count = Some(Property::Counter(CounterProperty::Count));
    let err = Graph::builder("g", "c", "t")
        .data_source_with("app.hits", None, count, DataSourceConfig::new())
        .data_source_with("other", Some("x"), count, field_name("app.hits"))
        .build()
        .expect_err("duplicate field");
    assert_eq!(err.code().as_str(), "DUPLICATE_FIELD");

    // Same metric read through two different properties is fine.
    Graph::builder("g", "c", "t")
        .data_source_with("app.hits", None, count, DataSourceConfig::new())
        .data_source_with("app.hits", None, Some(Property::Counter(CounterProperty::Gauge)), DataSourceConfig::new())
        .build()
        .unwrap();
}

#[test]
fn data_source_exposes_config() {
    let property = Property::Meter(MeterProperty::OneMinuteRate);
    let cfg = DataSourceConfig::new()
        .with_cdef("cdef")
        .with_color("color")
        .with_draw("draw")
        .with_line("line")
        .with_min(42)
        .with_stack("stack");
    let ds = DataSource::for_metric("t1", Some("label"), Some(property), cfg);

    assert_eq!(ds.property(), Some(property));
    assert_eq!(ds.metric_names(&MetricRegistry::new()), vec!["t1"]);
    assert_eq!(ds.label("t1"), "label");
    assert_eq!(ds.cdef(), Some("cdef"));
    assert_eq!(ds.color(), Some("color"));
    assert_eq!(ds.draw(), Some("draw"));
    assert_eq!(ds.line(), Some("line"));
    assert_eq!(ds.min(), Number::Int(42));
    assert_eq!(ds.max(), None);
    assert_eq!(ds.stack(), Some("stack"));
}

#[test]
fn label_and_name_default_to_metric_name() {
    let name = metrics::name(&["g", "t", "n"]);

    let ds = DataSource::for_metric(&name, None, None, DataSourceConfig::new());
    assert_eq!(ds.label(&name), "g.t.n");
    assert_eq!(ds.name(&name), "g.t.n");
    assert_eq!(ds.min(), Number::Int(0));

    let ds = DataSource::for_metric(&name, Some("label"), None, field_name("munin_name"));
    assert_eq!(ds.label(&name), "label");
    assert_eq!(ds.name(&name), "munin_name");
    assert_eq!(
        ds.field_name(&name, Property::Counter(CounterProperty::Count)),
        "munin_name__count"
    );
}

#[test]
fn prefix_source_tracks_registry() {
    let registry = MetricRegistry::new();
    registry.counter("db.reads").unwrap();
    let ds = DataSource::for_prefix("db.", None, field_name("ignored"));
    assert_eq!(ds.selector(), &MetricSelector::Prefix("db.".to_string()));
    assert_eq!(ds.metric_names(&registry), vec!["db.reads"]);

    registry.counter("db.writes").unwrap();
    registry.counter("cache.hits").unwrap();
    assert_eq!(ds.metric_names(&registry), vec!["db.reads", "db.writes"]);
    assert_eq!(ds.name("db.writes"), "db.writes");
    assert_eq!(ds.label("db.writes"), "db.writes");
}

#[test]
fn multi_metric_source_lists_in_order() {
    let ds = DataSource::for_metrics(["b.x", "a.y"], None, DataSourceConfig::new());
    assert_eq!(ds.metric_names(&MetricRegistry::new()), vec!["b.x", "a.y"]);
}
