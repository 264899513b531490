//! Reported values.
//!
//! Munin reads every value as text. Integral values (and floats without a
//! fractional part) are written as plain integers; anything else uses the
//! shortest representation that round-trips. Non-finite floats become `U`,
//! the protocol's "unknown" marker.

use std::fmt;

use serde::Deserialize;

/// Largest float magnitude that still converts to `i64` without loss of range.
const I64_RANGE: f64 = 9_223_372_036_854_775_807.0;

/// A number read from a metric or configured on a data source.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

impl Default for Number {
    fn default() -> Self {
        Number::Int(0)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(v) => write!(f, "{v}"),
            Number::Float(v) if !v.is_finite() => f.write_str("U"),
            Number::Float(v) if v.fract() == 0.0 && v.abs() < I64_RANGE => {
                write!(f, "{}", v as i64)
            }
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Int(v)
    }
}

impl From<i32> for Number {
    fn from(v: i32) -> Self {
        Number::Int(i64::from(v))
    }
}

impl From<u32> for Number {
    fn from(v: u32) -> Self {
        Number::Int(i64::from(v))
    }
}

impl From<u64> for Number {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => Number::Int(v),
            Err(_) => Number::Float(v as f64),
        }
    }
}

impl From<usize> for Number {
    fn from(v: usize) -> Self {
        Number::from(v as u64)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Float(v)
    }
}

impl From<f32> for Number {
    fn from(v: f32) -> Self {
        Number::Float(f64::from(v))
    }
}
