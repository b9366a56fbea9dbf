//! Scalar summary metrics that may be undefined.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::types::Value;

/// A numeric metric, or `NotApplicable` when it cannot be computed (no data, zero denominator).
///
/// Serializes as a JSON number, or the string `"n/a"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Value(f64),
    NotApplicable,
}

impl Metric {
    /// Numeric values become `Value`; `Null` and everything else is `NotApplicable`.
    pub fn from_value(v: &Value) -> Self {
        match v.as_f64() {
            Some(f) if f.is_finite() => Metric::Value(f),
            _ => Metric::NotApplicable,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Metric::Value(_))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{v:.2}"),
            Metric::NotApplicable => f.write_str("n/a"),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Value(v) => serializer.serialize_f64(*v),
            Metric::NotApplicable => serializer.serialize_str("n/a"),
        }
    }
}

/// `numerator / denominator`, or `NotApplicable` when the denominator is zero or either side
/// is not applicable.
pub fn ratio(numerator: Metric, denominator: Metric) -> Metric {
    match (numerator, denominator) {
        (Metric::Value(n), Metric::Value(d)) if d != 0.0 => Metric::Value(n / d),
        _ => Metric::NotApplicable,
    }
}
