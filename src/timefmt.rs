//! Human-readable durations for half-lives and simulated time.

use std::fmt;

/// Units in seconds, smallest first.
pub const TIME_UNITS: [(&str, f64); 9] = [
    ("ps", 1e-12),
    ("ns", 1e-9),
    ("μs", 1e-6),
    ("ms", 1e-3),
    ("s", 1.0),
    ("min", 60.0),
    ("h", 3600.0),
    ("d", 86_400.0),
    ("y", 3.154e7),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeValue {
    pub value: f64,
    pub unit: &'static str,
}

impl TimeValue {
    /// Express `seconds` in the unit whose length is nearest to it.
    pub fn from_seconds(seconds: f64) -> Self {
        if seconds == 0.0 || !seconds.is_finite() {
            return Self {
                value: seconds,
                unit: "s",
            };
        }
        let magnitude = seconds.abs();
        let (unit, length) = TIME_UNITS
            .iter()
            .copied()
            .min_by(|(_, a), (_, b)| (a - magnitude).abs().total_cmp(&(b - magnitude).abs()))
            .unwrap_or(("s", 1.0));
        Self {
            value: seconds / length,
            unit,
        }
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_nan() {
            return f.write_str("unknown");
        }
        if self.value.is_infinite() {
            return f.write_str("∞");
        }
        let text = format!("{:.3}", self.value);
        let text = text.trim_end_matches('0').trim_end_matches('.');
        write!(f, "{text} {}", self.unit)
    }
}

pub fn format_seconds(seconds: f64) -> String {
    TimeValue::from_seconds(seconds).to_string()
}

/// Same as [`format_seconds`] for an optional half-life.
pub fn format_halflife(halflife: Option<f64>) -> String {
    halflife.map(format_seconds).unwrap_or_else(|| "unknown".to_string())
}
