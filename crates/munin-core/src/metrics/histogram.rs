//! Value distributions.
//!
//! Samples are kept in a sliding window of the most recent
//! [`DEFAULT_RESERVOIR_SIZE`] values; snapshots sort the window once and
//! answer every statistic from it.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

pub const DEFAULT_RESERVOIR_SIZE: usize = 1028;

/// Distribution of recorded values.
#[derive(Debug)]
pub struct Histogram {
    count: AtomicU64,
    window: Mutex<VecDeque<i64>>,
    capacity: usize,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RESERVOIR_SIZE)
    }
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            count: AtomicU64::new(0),
            window: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn update(&self, value: i64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        let mut window = self.window.lock();
        if window.len() == self.capacity {
            window.pop_front();
        }
        window.push_back(value);
    }

    /// Total number of recorded values (not bounded by the window).
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> Snapshot {
        let values: Vec<i64> = self.window.lock().iter().copied().collect();
        Snapshot::new(values)
    }
}

/// Sorted, immutable view of a histogram window.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    values: Vec<i64>,
}

impl Snapshot {
    pub fn new(mut values: Vec<i64>) -> Self {
        values.sort_unstable();
        Self { values }
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Value at `quantile` (0.0..=1.0), interpolated between neighbours.
    pub fn value(&self, quantile: f64) -> f64 {
        let n = self.values.len();
        if n == 0 || !(0.0..=1.0).contains(&quantile) {
            return 0.0;
        }

        let pos = quantile * (n as f64 + 1.0);
        if pos < 1.0 {
            return self.values[0] as f64;
        }
        if pos >= n as f64 {
            return self.values[n - 1] as f64;
        }

        let index = pos.floor() as usize;
        let lower = self.values[index - 1] as f64;
        let upper = self.values[index] as f64;
        lower + (pos - pos.floor()) * (upper - lower)
    }

    pub fn median(&self) -> f64 {
        self.value(0.5)
    }

    pub fn percentile75(&self) -> f64 {
        self.value(0.75)
    }

    pub fn percentile95(&self) -> f64 {
        self.value(0.95)
    }

    pub fn percentile98(&self) -> f64 {
        self.value(0.98)
    }

    pub fn percentile99(&self) -> f64 {
        self.value(0.99)
    }

    pub fn percentile999(&self) -> f64 {
        self.value(0.999)
    }

    pub fn max(&self) -> i64 {
        self.values.last().copied().unwrap_or(0)
    }

    pub fn min(&self) -> i64 {
        self.values.first().copied().unwrap_or(0)
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.values.iter().map(|v| *v as f64).sum();
        sum / self.values.len() as f64
    }

    /// Sample standard deviation.
    pub fn std_dev(&self) -> f64 {
        let n = self.values.len();
        if n <= 1 {
            return 0.0;
        }
        let mean = self.mean();
        let sum: f64 = self
            .values
            .iter()
            .map(|v| {
                let d = *v as f64 - mean;
                d * d
            })
            .sum();
        (sum / (n as f64 - 1.0)).sqrt()
    }
}
