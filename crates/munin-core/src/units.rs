//! Rate and duration units.

use serde::Deserialize;

/// Unit of time used to scale rates and durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// Length of one unit in nanoseconds.
    pub fn nanos(self) -> f64 {
        match self {
            TimeUnit::Nanoseconds => 1.0,
            TimeUnit::Microseconds => 1e3,
            TimeUnit::Milliseconds => 1e6,
            TimeUnit::Seconds => 1e9,
            TimeUnit::Minutes => 60.0 * 1e9,
            TimeUnit::Hours => 3_600.0 * 1e9,
            TimeUnit::Days => 86_400.0 * 1e9,
        }
    }

    /// Length of one unit in seconds.
    pub fn seconds(self) -> f64 {
        self.nanos() / 1e9
    }
}

/// Units applied when reading statistics.
///
/// Rates are kept per second and scaled to events per `rate`.
/// Durations are recorded in nanoseconds and scaled to `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Units {
    pub rate: TimeUnit,
    pub duration: TimeUnit,
}

impl Units {
    pub fn new(rate: TimeUnit, duration: TimeUnit) -> Self {
        Self { rate, duration }
    }

    pub fn convert_rate(&self, per_second: f64) -> f64 {
        per_second * self.rate.seconds()
    }

    pub fn convert_duration(&self, nanos: f64) -> f64 {
        nanos / self.duration.nanos()
    }
}

impl Default for Units {
    fn default() -> Self {
        Self {
            rate: TimeUnit::Seconds,
            duration: TimeUnit::Nanoseconds,
        }
    }
}
