//! Unit conversions and pace arithmetic for activity data.

use serde_json::Value;

/// Kilometers to statute miles
pub const KM_TO_MILE: f64 = 0.621371192;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_HOUR: u64 = 3_600_000;

/// Format a millisecond duration as `HH:MM:SS`.
///
/// Hours are not capped, so 100 hours or more prints with three or more digits.
pub fn format_duration_ms(ms: u64) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = ms % MS_PER_HOUR / MS_PER_MINUTE;
    let seconds = ms % MS_PER_MINUTE / MS_PER_SECOND;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

pub fn km_to_miles(km: f64) -> f64 {
    km * KM_TO_MILE
}

/// Numeric value of one speed sample. Anything that is not a number, or a
/// string holding one, counts as 0.0.
pub fn speed_sample(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Arithmetic mean of the samples, or `None` for an empty series
pub fn mean_speed(samples: &[Value]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let sum: f64 = samples.iter().map(speed_sample).sum();
    Some(sum / samples.len() as f64)
}

/// How the seconds part of a pace is derived from its fractional minute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaceSeconds {
    /// Round to the nearest second. A result of 60 is printed as-is.
    Round,
    /// Drop the fractional second.
    Truncate,
}

/// Minutes needed to cover one distance unit at `speed` units per hour, as `MM:SS`.
///
/// Returns `None` when the speed gives no finite pace (zero or NaN). A negative
/// speed also gives `None` rather than a negative pace such as `-12:00`, since
/// no sample from a real run can average below zero.
pub fn pace(speed: f64, seconds: PaceSeconds) -> Option<String> {
    let div = 60.0 / speed;
    if !div.is_finite() || div < 0.0 {
        return None;
    }
    let min = div.floor();
    let frac = (div - min) * 60.0;
    let sec = match seconds {
        PaceSeconds::Round => frac.round(),
        PaceSeconds::Truncate => frac.trunc(),
    };
    Some(format!("{:02}:{:02}", min as u64, sec as u64))
}
