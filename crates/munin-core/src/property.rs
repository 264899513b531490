//! Selectable statistics per metric kind.
//!
//! A [`Property`] names one statistic of one metric kind (`timer.median`,
//! `counter.count`, ...). It knows its protocol identifier, whether Munin
//! should treat it as an instantaneous `GAUGE` or a monotonic `DERIVE`, and
//! how to read it from a live [`Metric`]. Reading a property from a metric of
//! another kind is a configuration bug and always fails.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{MuninError, Result};
use crate::metrics::{Histogram, Meter, Metric, MetricKind, Snapshot, Timer};
use crate::number::Number;
use crate::units::Units;

/// Munin field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Gauge,
    Derive,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Gauge => "GAUGE",
            DataType::Derive => "DERIVE",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! catalog {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $id:literal, $ty:ident;)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Protocol identifier, used as the field name suffix.
            pub fn id(self) -> &'static str {
                match self {
                    $($name::$variant => $id,)+
                }
            }

            pub fn data_type(self) -> DataType {
                match self {
                    $($name::$variant => DataType::$ty,)+
                }
            }

            fn from_id(id: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|p| p.id() == id)
            }
        }
    };
}

catalog! {
    CounterProperty {
        Count => "count", Derive;
        Gauge => "gauge", Gauge;
    }
}

catalog! {
    GaugeProperty {
        ValueGauge => "value_gauge", Gauge;
        ValueDerive => "value_derive", Derive;
    }
}

catalog! {
    MeterProperty {
        Count => "count", Derive;
        OneMinuteRate => "one_minute_rate", Gauge;
        FiveMinuteRate => "five_minute_rate", Gauge;
        FifteenMinuteRate => "fifteen_minute_rate", Gauge;
        MeanRate => "mean_rate", Gauge;
    }
}

catalog! {
    HistogramProperty {
        Count => "count", Derive;
        Max => "max", Gauge;
        Min => "min", Gauge;
        Mean => "mean", Gauge;
        StdDev => "std_dev", Gauge;
        Median => "median", Gauge;
        Percentile75 => "percentile75", Gauge;
        Percentile95 => "percentile95", Gauge;
        Percentile98 => "percentile98", Gauge;
        Percentile99 => "percentile99", Gauge;
        Percentile999 => "percentile999", Gauge;
    }
}

catalog! {
    /// Timer statistics. Rates use the rate unit, durations the duration unit.
    TimerProperty {
        Count => "count", Derive;
        OneMinuteRate => "one_minute_rate", Gauge;
        FiveMinuteRate => "five_minute_rate", Gauge;
        FifteenMinuteRate => "fifteen_minute_rate", Gauge;
        MeanRate => "mean_rate", Gauge;
        Max => "max", Gauge;
        Min => "min", Gauge;
        Mean => "mean", Gauge;
        StdDev => "std_dev", Gauge;
        Median => "median", Gauge;
        Percentile75 => "percentile75", Gauge;
        Percentile95 => "percentile95", Gauge;
        Percentile98 => "percentile98", Gauge;
        Percentile99 => "percentile99", Gauge;
        Percentile999 => "percentile999", Gauge;
    }
}

/// Distribution statistic shared by histograms and timers.
#[derive(Debug, Clone, Copy)]
enum Stat {
    Max,
    Min,
    Mean,
    StdDev,
    Quantile(f64),
}

impl Stat {
    fn read(self, snapshot: &Snapshot) -> f64 {
        match self {
            Stat::Max => snapshot.max() as f64,
            Stat::Min => snapshot.min() as f64,
            Stat::Mean => snapshot.mean(),
            Stat::StdDev => snapshot.std_dev(),
            Stat::Quantile(q) => snapshot.value(q),
        }
    }

    fn read_from(self, histogram: &Histogram, snapshot: Option<&Snapshot>) -> f64 {
        match snapshot {
            Some(s) => self.read(s),
            None => self.read(&histogram.snapshot()),
        }
    }
}

impl HistogramProperty {
    fn read(self, histogram: &Histogram, snapshot: Option<&Snapshot>) -> Number {
        let stat = |stat: Stat| Number::Float(stat.read_from(histogram, snapshot));
        match self {
            HistogramProperty::Count => Number::from(histogram.count()),
            HistogramProperty::Max => Number::Int(Stat::Max.read_from(histogram, snapshot) as i64),
            HistogramProperty::Min => Number::Int(Stat::Min.read_from(histogram, snapshot) as i64),
            HistogramProperty::Mean => stat(Stat::Mean),
            HistogramProperty::StdDev => stat(Stat::StdDev),
            HistogramProperty::Median => stat(Stat::Quantile(0.5)),
            HistogramProperty::Percentile75 => stat(Stat::Quantile(0.75)),
            HistogramProperty::Percentile95 => stat(Stat::Quantile(0.95)),
            HistogramProperty::Percentile98 => stat(Stat::Quantile(0.98)),
            HistogramProperty::Percentile99 => stat(Stat::Quantile(0.99)),
            HistogramProperty::Percentile999 => stat(Stat::Quantile(0.999)),
        }
    }
}

impl MeterProperty {
    fn read(self, meter: &Meter, units: Units) -> Number {
        let rate = |per_second: f64| Number::Float(units.convert_rate(per_second));
        match self {
            MeterProperty::Count => Number::from(meter.count()),
            MeterProperty::OneMinuteRate => rate(meter.rates().one_minute),
            MeterProperty::FiveMinuteRate => rate(meter.rates().five_minute),
            MeterProperty::FifteenMinuteRate => rate(meter.rates().fifteen_minute),
            MeterProperty::MeanRate => rate(meter.rates().mean),
        }
    }
}

impl TimerProperty {
    fn read(self, timer: &Timer, snapshot: Option<&Snapshot>, units: Units) -> Number {
        let rate = |per_second: f64| Number::Float(units.convert_rate(per_second));
        let duration = |stat: Stat| {
            let nanos = match snapshot {
                Some(s) => stat.read(s),
                None => stat.read(&timer.snapshot()),
            };
            Number::Float(units.convert_duration(nanos))
        };
        match self {
            TimerProperty::Count => Number::from(timer.count()),
            TimerProperty::OneMinuteRate => rate(timer.rates().one_minute),
            TimerProperty::FiveMinuteRate => rate(timer.rates().five_minute),
            TimerProperty::FifteenMinuteRate => rate(timer.rates().fifteen_minute),
            TimerProperty::MeanRate => rate(timer.rates().mean),
            TimerProperty::Max => duration(Stat::Max),
            TimerProperty::Min => duration(Stat::Min),
            TimerProperty::Mean => duration(Stat::Mean),
            TimerProperty::StdDev => duration(Stat::StdDev),
            TimerProperty::Median => duration(Stat::Quantile(0.5)),
            TimerProperty::Percentile75 => duration(Stat::Quantile(0.75)),
            TimerProperty::Percentile95 => duration(Stat::Quantile(0.95)),
            TimerProperty::Percentile98 => duration(Stat::Quantile(0.98)),
            TimerProperty::Percentile99 => duration(Stat::Quantile(0.99)),
            TimerProperty::Percentile999 => duration(Stat::Quantile(0.999)),
        }
    }
}

/// A selectable statistic of one metric kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Property {
    Counter(CounterProperty),
    Gauge(GaugeProperty),
    Meter(MeterProperty),
    Histogram(HistogramProperty),
    Timer(TimerProperty),
}

impl Property {
    /// Statistic used when a data source does not pick one.
    pub fn default_for(kind: MetricKind) -> Property {
        match kind {
            MetricKind::Counter => Property::Counter(CounterProperty::Count),
            MetricKind::Gauge => Property::Gauge(GaugeProperty::ValueGauge),
            MetricKind::Meter => Property::Meter(MeterProperty::FiveMinuteRate),
            MetricKind::Histogram => Property::Histogram(HistogramProperty::Median),
            MetricKind::Timer => Property::Timer(TimerProperty::Median),
        }
    }

    /// The explicit property if any, otherwise the default for `metric`'s kind.
    pub fn resolve(explicit: Option<Property>, metric: &Metric) -> Property {
        explicit.unwrap_or_else(|| Property::default_for(metric.kind()))
    }

    pub fn kind(self) -> MetricKind {
        match self {
            Property::Counter(_) => MetricKind::Counter,
            Property::Gauge(_) => MetricKind::Gauge,
            Property::Meter(_) => MetricKind::Meter,
            Property::Histogram(_) => MetricKind::Histogram,
            Property::Timer(_) => MetricKind::Timer,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Property::Counter(p) => p.id(),
            Property::Gauge(p) => p.id(),
            Property::Meter(p) => p.id(),
            Property::Histogram(p) => p.id(),
            Property::Timer(p) => p.id(),
        }
    }

    pub fn data_type(self) -> DataType {
        match self {
            Property::Counter(p) => p.data_type(),
            Property::Gauge(p) => p.data_type(),
            Property::Meter(p) => p.data_type(),
            Property::Histogram(p) => p.data_type(),
            Property::Timer(p) => p.data_type(),
        }
    }

    /// Read this statistic from `metric`.
    ///
    /// `snapshot` replaces a fresh distribution snapshot for histogram and
    /// timer statistics; other kinds ignore it.
    pub fn value(self, metric: &Metric, snapshot: Option<&Snapshot>, units: Units) -> Result<Number> {
        match (self, metric) {
            (Property::Counter(_), Metric::Counter(c)) => Ok(Number::Int(c.count())),
            (Property::Gauge(_), Metric::Gauge(g)) => Ok(g.value()),
            (Property::Meter(p), Metric::Meter(m)) => Ok(p.read(m, units)),
            (Property::Histogram(p), Metric::Histogram(h)) => Ok(p.read(h, snapshot)),
            (Property::Timer(p), Metric::Timer(t)) => Ok(p.read(t, snapshot, units)),
            (property, metric) => Err(MuninError::IncompatibleMetricKind {
                property: property.to_string(),
                metric: metric.kind(),
            }),
        }
    }

    /// Every property of `kind`.
    pub fn all(kind: MetricKind) -> Vec<Property> {
        match kind {
            MetricKind::Counter => CounterProperty::ALL.iter().map(|p| Property::Counter(*p)).collect(),
            MetricKind::Gauge => GaugeProperty::ALL.iter().map(|p| Property::Gauge(*p)).collect(),
            MetricKind::Meter => MeterProperty::ALL.iter().map(|p| Property::Meter(*p)).collect(),
            MetricKind::Histogram => HistogramProperty::ALL
                .iter()
                .map(|p| Property::Histogram(*p))
                .collect(),
            MetricKind::Timer => TimerProperty::ALL.iter().map(|p| Property::Timer(*p)).collect(),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind(), self.id())
    }
}

impl FromStr for MetricKind {
    type Err = MuninError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "counter" => Ok(MetricKind::Counter),
            "gauge" => Ok(MetricKind::Gauge),
            "meter" => Ok(MetricKind::Meter),
            "histogram" => Ok(MetricKind::Histogram),
            "timer" => Ok(MetricKind::Timer),
            other => Err(MuninError::UnsupportedMetricKind(other.to_string())),
        }
    }
}

impl FromStr for Property {
    type Err = MuninError;

    /// Parse `<kind>.<identifier>`, e.g. `meter.one_minute_rate`.
    fn from_str(s: &str) -> Result<Self> {
        let (kind, id) = s
            .split_once('.')
            .ok_or_else(|| MuninError::UnknownProperty(format!("{s} (expected kind.property)")))?;
        let unknown = || MuninError::UnknownProperty(s.to_string());
        match kind.parse::<MetricKind>()? {
            MetricKind::Counter => CounterProperty::from_id(id).map(Property::Counter),
            MetricKind::Gauge => GaugeProperty::from_id(id).map(Property::Gauge),
            MetricKind::Meter => MeterProperty::from_id(id).map(Property::Meter),
            MetricKind::Histogram => HistogramProperty::from_id(id).map(Property::Histogram),
            MetricKind::Timer => TimerProperty::from_id(id).map(Property::Timer),
        }
        .ok_or_else(unknown)
    }
}

impl TryFrom<String> for Property {
    type Error = MuninError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}
