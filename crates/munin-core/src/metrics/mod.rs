//! In-process metrics registry.
//!
//! Metrics are stored by dotted name in a `DashMap` behind a clonable handle.
//! Every lookup returns a cheap `Arc` handle to the live metric, so readers
//! always see the current value without copying.

mod counter;
mod histogram;
mod meter;
mod timer;

use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{MuninError, Result};

pub use counter::{Counter, Gauge};
pub use histogram::{Histogram, Snapshot, DEFAULT_RESERVOIR_SIZE};
pub use meter::{Meter, Rates};
pub use timer::{Timer, TimerContext};

/// The kind of a registered metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
    Meter,
    Histogram,
    Timer,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Meter => "meter",
            MetricKind::Histogram => "histogram",
            MetricKind::Timer => "timer",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A live metric handle.
#[derive(Debug, Clone)]
pub enum Metric {
    Counter(Arc<Counter>),
    Gauge(Arc<Gauge>),
    Meter(Arc<Meter>),
    Histogram(Arc<Histogram>),
    Timer(Arc<Timer>),
}

impl Metric {
    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Counter(_) => MetricKind::Counter,
            Metric::Gauge(_) => MetricKind::Gauge,
            Metric::Meter(_) => MetricKind::Meter,
            Metric::Histogram(_) => MetricKind::Histogram,
            Metric::Timer(_) => MetricKind::Timer,
        }
    }

    /// Distribution snapshot for histograms and timers.
    pub fn snapshot(&self) -> Option<Snapshot> {
        match self {
            Metric::Histogram(h) => Some(h.snapshot()),
            Metric::Timer(t) => Some(t.snapshot()),
            Metric::Counter(_) | Metric::Gauge(_) | Metric::Meter(_) => None,
        }
    }
}

/// Join name segments with `.`, skipping empty ones.
pub fn name(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(".")
}

/// Shared registry of named metrics.
#[derive(Debug, Clone, Default)]
pub struct MetricRegistry {
    metrics: Arc<DashMap<String, Metric>>,
}

macro_rules! get_or_create {
    ($fn_name:ident, $variant:ident, $ty:ty) => {
        #[doc = concat!("Get the ", stringify!($fn_name), " registered as `name`, creating it if absent.")]
        pub fn $fn_name(&self, name: &str) -> Result<Arc<$ty>> {
            match self.metrics.entry(name.to_string()) {
                Entry::Occupied(e) => match e.get() {
                    Metric::$variant(m) => Ok(Arc::clone(m)),
                    other => Err(MuninError::MetricKindConflict {
                        name: name.to_string(),
                        existing: other.kind(),
                    }),
                },
                Entry::Vacant(e) => {
                    let m = Arc::new(<$ty>::default());
                    e.insert(Metric::$variant(Arc::clone(&m)));
                    Ok(m)
                }
            }
        }
    };
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    get_or_create!(counter, Counter, Counter);
    get_or_create!(meter, Meter, Meter);
    get_or_create!(histogram, Histogram, Histogram);
    get_or_create!(timer, Timer, Timer);

    /// Register a gauge. An existing gauge under the same name is replaced.
    pub fn register_gauge(&self, name: &str, gauge: Gauge) -> Result<Arc<Gauge>> {
        let gauge = Arc::new(gauge);
        match self.metrics.entry(name.to_string()) {
            Entry::Occupied(mut e) => match e.get() {
                Metric::Gauge(_) => {
                    e.insert(Metric::Gauge(Arc::clone(&gauge)));
                    Ok(gauge)
                }
                other => Err(MuninError::MetricKindConflict {
                    name: name.to_string(),
                    existing: other.kind(),
                }),
            },
            Entry::Vacant(e) => {
                e.insert(Metric::Gauge(Arc::clone(&gauge)));
                Ok(gauge)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Metric> {
        self.metrics.get(name).map(|r| r.value().clone())
    }

    pub fn remove(&self, name: &str) -> Option<Metric> {
        self.metrics.remove(name).map(|(_, m)| m)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.metrics.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.metrics.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// All `(name, metric)` pairs, sorted by name.
    pub fn metrics(&self) -> Vec<(String, Metric)> {
        let mut all: Vec<(String, Metric)> = self
            .metrics
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }
}
