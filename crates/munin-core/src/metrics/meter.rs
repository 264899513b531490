//! Event rate meter with exponentially weighted moving averages.
//!
//! Rates are ticked every 5 seconds and kept in events per second.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

const TICK_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct Ewma {
    alpha: f64,
    rate: f64,
    initialized: bool,
    uncounted: u64,
}

impl Ewma {
    fn with_minutes(minutes: f64) -> Self {
        let interval = TICK_INTERVAL.as_secs_f64();
        Self {
            alpha: 1.0 - (-interval / 60.0 / minutes).exp(),
            rate: 0.0,
            initialized: false,
            uncounted: 0,
        }
    }

    fn tick(&mut self) {
        let instant_rate = self.uncounted as f64 / TICK_INTERVAL.as_secs_f64();
        self.uncounted = 0;
        if self.initialized {
            self.rate += self.alpha * (instant_rate - self.rate);
        } else {
            self.rate = instant_rate;
            self.initialized = true;
        }
    }
}

#[derive(Debug)]
struct MeterState {
    last_tick: Instant,
    m1: Ewma,
    m5: Ewma,
    m15: Ewma,
}

impl MeterState {
    fn tick_if_necessary(&mut self, now: Instant) {
        let age = now.saturating_duration_since(self.last_tick);
        if age <= TICK_INTERVAL {
            return;
        }
        let ticks = age.as_nanos() / TICK_INTERVAL.as_nanos();
        for _ in 0..ticks {
            self.m1.tick();
            self.m5.tick();
            self.m15.tick();
        }
        let remainder = age.as_nanos() % TICK_INTERVAL.as_nanos();
        self.last_tick = now - Duration::from_nanos(remainder as u64);
    }
}

/// Snapshot of a meter's rates, in events per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    pub one_minute: f64,
    pub five_minute: f64,
    pub fifteen_minute: f64,
    pub mean: f64,
}

/// Counts events and tracks their 1/5/15 minute and mean rates.
#[derive(Debug)]
pub struct Meter {
    count: AtomicU64,
    start: Instant,
    state: Mutex<MeterState>,
}

impl Default for Meter {
    fn default() -> Self {
        Self::starting_at(Instant::now())
    }
}

impl Meter {
    pub fn new() -> Self {
        Self::default()
    }

    fn starting_at(start: Instant) -> Self {
        Self {
            count: AtomicU64::new(0),
            start,
            state: Mutex::new(MeterState {
                last_tick: start,
                m1: Ewma::with_minutes(1.0),
                m5: Ewma::with_minutes(5.0),
                m15: Ewma::with_minutes(15.0),
            }),
        }
    }

    /// Record one event.
    pub fn mark(&self) {
        self.mark_n(1);
    }

    /// Record `n` events.
    pub fn mark_n(&self, n: u64) {
        self.mark_at(n, Instant::now());
    }

    fn mark_at(&self, n: u64, now: Instant) {
        let mut state = self.state.lock();
        state.tick_if_necessary(now);
        state.m1.uncounted += n;
        state.m5.uncounted += n;
        state.m15.uncounted += n;
        self.count.fetch_add(n, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn rates(&self) -> Rates {
        self.rates_at(Instant::now())
    }

    fn rates_at(&self, now: Instant) -> Rates {
        let mut state = self.state.lock();
        state.tick_if_necessary(now);
        let count = self.count();
        let elapsed = now.saturating_duration_since(self.start).as_secs_f64();
        let mean = if count == 0 || elapsed <= 0.0 {
            0.0
        } else {
            count as f64 / elapsed
        };
        Rates {
            one_minute: state.m1.rate,
            five_minute: state.m5.rate,
            fifteen_minute: state.m15.rate,
            mean,
        }
    }

    pub fn one_minute_rate(&self) -> f64 {
        self.rates().one_minute
    }

    pub fn five_minute_rate(&self) -> f64 {
        self.rates().five_minute
    }

    pub fn fifteen_minute_rate(&self) -> f64 {
        self.rates().fifteen_minute
    }

    pub fn mean_rate(&self) -> f64 {
        self.rates().mean
    }
}
