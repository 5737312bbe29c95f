//! Built-in comparators
//!
//! Every comparator here except `exists` treats a missing field as an error
//! rather than a non-match.

use crate::error::{FilterError, Result};
use crate::registry::MatchRegistry;
use crate::value::{compare_numbers, loosely_equal, number_of, time_of, type_name, CompareValue, Searchable};
use serde_json::Value;
use std::borrow::Cow;
use std::cmp::Ordering;

/// Register all built-in comparators under their canonical keys
pub fn register_builtins(registry: &mut MatchRegistry) {
    registry
        .register("eq", match_eq)
        .register("ne", match_ne)
        .register("gt", match_gt)
        .register("ge", match_ge)
        .register("lt", match_lt)
        .register("le", match_le)
        .register("between", match_between)
        .register("in", match_in)
        .register("nin", match_nin)
        .register("contains", match_contains)
        .register("prefix", match_prefix)
        .register("suffix", match_suffix)
        .register("regex", match_regex)
        .register("before", match_before)
        .register("after", match_after)
        .register("exists", match_exists);
}

fn require<'a>(obj: &'a dyn Searchable, key: &str) -> Result<Cow<'a, Value>> {
    obj.lookup(key)
        .ok_or_else(|| FilterError::FieldNotFound(key.to_string()))
}

fn field_mismatch(expected: &'static str, field: &Value) -> FilterError {
    FilterError::TypeMismatch {
        expected,
        found: type_name(field).to_string(),
    }
}

/// Order a field against a literal: numbers with numbers, strings with strings
fn ordering(field: &Value, literal: &Value) -> Result<Ordering> {
    match (field, literal) {
        (Value::String(f), Value::String(l)) => Ok(f.as_str().cmp(l.as_str())),
        (_, Value::Number(_)) | (Value::Number(_), _) => {
            number_of(field).ok_or_else(|| field_mismatch("number", field))?;
            number_of(literal).ok_or_else(|| field_mismatch("number", literal))?;
            compare_numbers(field, literal)
                .ok_or_else(|| field_mismatch("comparable number", field))
        }
        _ => Err(FilterError::TypeMismatch {
            expected: "number or string",
            found: format!("{} vs {}", type_name(field), type_name(literal)),
        }),
    }
}

fn compare_with(
    obj: &dyn Searchable,
    key: &str,
    value: &CompareValue,
    accept: fn(Ordering) -> bool,
) -> Result<bool> {
    let field = require(obj, key)?;
    ordering(&field, value.raw()).map(accept)
}

fn string_field<'a>(field: &'a Value) -> Result<&'a str> {
    field.as_str().ok_or_else(|| field_mismatch("string", field))
}

pub fn match_eq(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    let field = require(obj, key)?;
    Ok(loosely_equal(&field, value.raw()))
}

pub fn match_ne(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    match_eq(obj, key, value).map(|eq| !eq)
}

pub fn match_gt(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    compare_with(obj, key, value, Ordering::is_gt)
}

pub fn match_ge(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    compare_with(obj, key, value, Ordering::is_ge)
}

pub fn match_lt(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    compare_with(obj, key, value, Ordering::is_lt)
}

pub fn match_le(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    compare_with(obj, key, value, Ordering::is_le)
}

/// Inclusive range `[low, high]`
pub fn match_between(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    let bounds = value.as_seq()?;
    let [low, high] = bounds else {
        return Err(FilterError::Comparison {
            key: key.to_string(),
            reason: format!("between expects [low, high], got {} items", bounds.len()),
        });
    };
    let field = require(obj, key)?;
    Ok(ordering(&field, low)?.is_ge() && ordering(&field, high)?.is_le())
}

pub fn match_in(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    let candidates = value.as_seq()?;
    let field = require(obj, key)?;
    Ok(candidates.iter().any(|c| loosely_equal(&field, c)))
}

pub fn match_nin(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    match_in(obj, key, value).map(|found| !found)
}

/// Substring of a string field, or element of an array field
pub fn match_contains(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    let field = require(obj, key)?;
    match &*field {
        Value::String(s) => Ok(s.contains(value.as_str()?)),
        Value::Array(items) => Ok(items.iter().any(|item| loosely_equal(item, value.raw()))),
        other => Err(field_mismatch("string or array", other)),
    }
}

pub fn match_prefix(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    let field = require(obj, key)?;
    Ok(string_field(&field)?.starts_with(value.as_str()?))
}

pub fn match_suffix(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    let field = require(obj, key)?;
    Ok(string_field(&field)?.ends_with(value.as_str()?))
}

pub fn match_regex(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    let regex = value.as_regex()?;
    let field = require(obj, key)?;
    Ok(regex.is_match(string_field(&field)?))
}

fn compare_time(
    obj: &dyn Searchable,
    key: &str,
    value: &CompareValue,
    accept: fn(Ordering) -> bool,
) -> Result<bool> {
    let literal = value.as_time()?;
    let field = require(obj, key)?;
    let at = time_of(&field).ok_or_else(|| field_mismatch("time", &field))?;
    Ok(accept(at.cmp(&literal)))
}

pub fn match_before(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    compare_time(obj, key, value, Ordering::is_lt)
}

pub fn match_after(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    compare_time(obj, key, value, Ordering::is_gt)
}

/// `value: true` matches present fields, `value: false` absent ones
pub fn match_exists(obj: &dyn Searchable, key: &str, value: &CompareValue) -> Result<bool> {
    let wanted = value.as_bool()?;
    Ok(obj.lookup(key).is_some() == wanted)
}
