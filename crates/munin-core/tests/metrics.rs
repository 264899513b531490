//! Metric registry and primitive tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use munin_core::metrics::{self, Gauge, Histogram, Snapshot};
use munin_core::{MetricKind, MetricRegistry, Number};

#[test]
fn get_or_create_returns_the_same_metric() {
    let registry = MetricRegistry::new();
    let a = registry.counter("app.hits").unwrap();
    let b = registry.counter("app.hits").unwrap();
    a.inc();
    b.inc_by(2);
    assert_eq!(a.count(), 3);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(registry.len(), 1);
}

#[test]
fn second_kind_under_same_name_conflicts() {
    let registry = MetricRegistry::new();
    registry.meter("app.x").unwrap();

    let err = registry.timer("app.x").expect_err("kind conflict");
    assert_eq!(err.code().as_str(), "METRIC_KIND_CONFLICT");

    let err = registry
        .register_gauge("app.x", Gauge::new(|| 1))
        .expect_err("kind conflict");
    assert_eq!(err.code().as_str(), "METRIC_KIND_CONFLICT");
    assert_eq!(registry.get("app.x").unwrap().kind(), MetricKind::Meter);
}

#[test]
fn gauge_registration_replaces_previous_gauge() {
    let registry = MetricRegistry::new();
    registry.register_gauge("g", Gauge::new(|| 1)).unwrap();
    let g = registry.register_gauge("g", Gauge::new(|| 2.5)).unwrap();
    assert_eq!(g.value(), Number::Float(2.5));
    match registry.get("g").unwrap() {
        munin_core::Metric::Gauge(g) => assert_eq!(g.value(), Number::Float(2.5)),
        other => panic!("unexpected {:?}", other.kind()),
    }
}

#[test]
fn gauge_reads_live_value() {
    let source = Arc::new(AtomicI64::new(4));
    let read = Arc::clone(&source);
    let gauge = Gauge::new(move || read.load(Ordering::Relaxed));
    assert_eq!(gauge.value(), Number::Int(4));
    source.store(9, Ordering::Relaxed);
    assert_eq!(gauge.value(), Number::Int(9));
}

#[test]
fn names_are_sorted_and_removable() {
    let registry = MetricRegistry::new();
    registry.counter("b").unwrap();
    registry.histogram("a").unwrap();
    registry.meter("c").unwrap();
    assert_eq!(registry.names(), vec!["a", "b", "c"]);

    assert!(registry.remove("b").is_some());
    assert!(!registry.contains("b"));
    assert!(registry.remove("b").is_none());
    let kinds: Vec<MetricKind> = registry.metrics().into_iter().map(|(_, m)| m.kind()).collect();
    assert_eq!(kinds, vec![MetricKind::Histogram, MetricKind::Meter]);
}

#[test]
fn name_joins_non_empty_segments() {
    assert_eq!(metrics::name(&["app", "", "db", "queries"]), "app.db.queries");
}

#[test]
fn histogram_median_of_small_sample() {
    let h = Histogram::new();
    for v in [1, 1, 3] {
        h.update(v);
    }
    let s = h.snapshot();
    assert_eq!(s.median(), 1.0);
    assert_eq!(s.min(), 1);
    assert_eq!(s.max(), 3);
    assert_eq!(h.count(), 3);
}

#[test]
fn snapshot_interpolates_quantiles() {
    let s = Snapshot::new(vec![5, 3, 1, 4, 2]);
    assert_eq!(s.values(), &[1, 2, 3, 4, 5]);
    assert_eq!(s.value(0.1), 1.0);
    assert_eq!(s.median(), 3.0);
    assert_eq!(s.percentile75(), 4.5);
    assert_eq!(s.percentile99(), 5.0);
    assert_eq!(s.mean(), 3.0);
    assert!((s.std_dev() - 1.581_138_830_084_189_8).abs() < 1e-12);
}

#[test]
fn empty_snapshot_reads_zero() {
    let s = Snapshot::new(Vec::new());
    assert_eq!(s.median(), 0.0);
    assert_eq!(s.max(), 0);
    assert_eq!(s.min(), 0);
    assert_eq!(s.std_dev(), 0.0);
}

#[test]
fn histogram_window_keeps_latest_values() {
    let h = Histogram::with_capacity(3);
    for v in 1..=5 {
        h.update(v);
    }
    assert_eq!(h.count(), 5);
    assert_eq!(h.snapshot().values(), &[3, 4, 5]);
}

#[test]
fn timer_records_nanoseconds() {
    let registry = MetricRegistry::new();
    let timer = registry.timer("t").unwrap();
    for _ in 0..3 {
        timer.update(Duration::from_secs(1));
    }
    assert_eq!(timer.count(), 3);
    assert_eq!(timer.snapshot().median(), 1_000_000_000.0);
}

#[test]
fn timer_context_records_once() {
    let registry = MetricRegistry::new();
    let timer = registry.timer("t").unwrap();

    let ctx = timer.start();
    ctx.stop();
    {
        let _ctx = timer.start();
    }
    let out = timer.time(|| 7);

    assert_eq!(out, 7);
    assert_eq!(timer.count(), 3);
}

#[test]
fn meter_counts_marks() {
    let registry = MetricRegistry::new();
    let meter = registry.meter("m").unwrap();
    meter.mark();
    meter.mark_n(4);
    assert_eq!(meter.count(), 5);
    assert_eq!(meter.one_minute_rate(), 0.0);
}
