//! Comparison values and field access
//!
//! `CompareValue` wraps the literal pulled out of a condition spec and
//! coerces it on demand. `Searchable` is the seam through which comparators
//! pull field values out of the objects being filtered.

mod access;
mod compare;

pub use access::*;
pub use compare::*;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::cmp::Ordering;

/// Short type name used in mismatch errors
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Numeric view of a value; numeric strings are accepted, non-finite ones are not
pub fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Exact integer view of a value, covering the full `i64` and `u64` ranges
pub fn integer_of(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        Value::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    }
}

/// Order two numeric values
///
/// Integers are compared exactly; floats, or an integer against a float, go
/// through `f64`. `None` when either side is not numeric or is NaN.
pub fn compare_numbers(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (integer_of(a), integer_of(b)) {
        return Some(x.cmp(&y));
    }
    number_of(a)?.partial_cmp(&number_of(b)?)
}

/// Temporal view of a value
///
/// Strings may be RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` (the last
/// two read as UTC). Numbers are Unix seconds.
pub fn time_of(value: &Value) -> Option<DateTime<FixedOffset>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt);
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(naive.and_utc().fixed_offset());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc().fixed_offset())
        }
        Value::Number(n) => {
            let secs = n.as_i64()?;
            DateTime::from_timestamp(secs, 0).map(|dt| dt.fixed_offset())
        }
        _ => None,
    }
}

/// Equality with numbers compared by value (`1 == 1.0`)
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => compare_numbers(a, b) == Some(Ordering::Equal),
        _ => a == b,
    }
}
