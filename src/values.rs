//! Row Values
//!
//! Rows handed to the filter evaluator and the table views are loose key/value maps. The
//! coercions here define how a stored value is read as text, as a number or as a point in time.

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use rustc_hash::FxHashMap;
use serde_json::Value;

/// A single table row keyed by field name.
pub type Row = FxHashMap<String, Value>;

/// Read a value as text.
///
/// Missing and `null` values read as the empty string, numbers without a fractional part are
/// rendered without one and arrays are joined with commas.
#[must_use]
pub fn as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number_text(number),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| as_text(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(object @ Value::Object(_)) => object.to_string(),
    }
}

/// Read a value as a number.
///
/// Missing values, arrays, objects and unparseable strings read as `NaN`, so every numeric
/// comparison against them is false. `null` and blank strings read as zero.
#[must_use]
pub fn as_number(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Array(_) | Value::Object(_)) => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(flag)) => f64::from(u8::from(*flag)),
        Some(Value::Number(number)) => number.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(text)) => parse_number(text),
    }
}

/// Read a value as epoch milliseconds.
///
/// Strings holding an RFC 3339 timestamp or a `YYYY-MM-DD` date are converted; anything else
/// falls back to [`as_number`].
#[must_use]
pub fn as_instant(value: Option<&Value>) -> f64 {
    if let Some(Value::String(text)) = value
        && let Some(millis) = parse_instant(text.trim())
    {
        return millis;
    }

    as_number(value)
}

/// Whether a value is missing, `null` or the empty string.
#[must_use]
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}

fn number_text(number: &serde_json::Number) -> String {
    if let Some(float) = number.as_f64()
        && number.is_f64()
        && float.fract() == 0.0
        && float.abs() < 1e15
    {
        return format!("{float:.0}");
    }

    number.to_string()
}

fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return 0.0;
    }

    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[expect(
    clippy::cast_precision_loss,
    reason = "epoch milliseconds stay well inside the f64 mantissa for calendar dates"
)]
fn parse_instant(text: &str) -> Option<f64> {
    if let Ok(timestamp) = text.parse::<Timestamp>() {
        return Some(timestamp.as_millisecond() as f64);
    }

    let date = text.parse::<Date>().ok()?;
    let zoned = date.to_zoned(TimeZone::UTC).ok()?;

    Some(zoned.timestamp().as_millisecond() as f64)
}
