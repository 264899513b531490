use std::time::{Duration, Instant};

use super::histogram::{Histogram, Snapshot};
use super::meter::{Meter, Rates};

/// Duration histogram (nanoseconds) plus a rate meter of timed events.
#[derive(Debug, Default)]
pub struct Timer {
    histogram: Histogram,
    meter: Meter,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, duration: Duration) {
        let nanos = i64::try_from(duration.as_nanos()).unwrap_or(i64::MAX);
        self.histogram.update(nanos);
        self.meter.mark();
    }

    /// Run `f` and record how long it took.
    pub fn time<T>(&self, f: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let out = f();
        self.update(started.elapsed());
        out
    }

    /// Start a measurement that is recorded when the returned guard drops.
    pub fn start(&self) -> TimerContext<'_> {
        TimerContext {
            timer: self,
            started: Instant::now(),
            stopped: false,
        }
    }

    pub fn count(&self) -> u64 {
        self.histogram.count()
    }

    pub fn rates(&self) -> Rates {
        self.meter.rates()
    }

    /// Snapshot of recorded durations, in nanoseconds.
    pub fn snapshot(&self) -> Snapshot {
        self.histogram.snapshot()
    }
}

/// Running measurement; records on drop.
#[derive(Debug)]
pub struct TimerContext<'a> {
    timer: &'a Timer,
    started: Instant,
    stopped: bool,
}

impl TimerContext<'_> {
    /// Stop now and return the recorded duration.
    pub fn stop(mut self) -> Duration {
        let elapsed = self.started.elapsed();
        self.timer.update(elapsed);
        self.stopped = true;
        elapsed
    }
}

impl Drop for TimerContext<'_> {
    fn drop(&mut self) {
        if !self.stopped {
            self.timer.update(self.started.elapsed());
        }
    }
}
