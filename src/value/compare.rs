//! Comparison value taken from a condition spec

use crate::error::{FilterError, Result};
use crate::value::{number_of, time_of, type_name};
use chrono::{DateTime, FixedOffset};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::Value;
use std::fmt;

/// Literal of a leaf condition, interpreted lazily by each comparator
///
/// The literal is never modified after parsing. A compiled regex is memoised
/// on first use so repeated evaluations do not recompile it.
#[derive(Clone)]
pub struct CompareValue {
    raw: Value,
    regex: OnceCell<std::result::Result<Regex, String>>,
}

impl CompareValue {
    pub fn new(raw: Value) -> Self {
        Self {
            raw,
            regex: OnceCell::new(),
        }
    }

    /// The literal exactly as it appeared in the spec
    #[inline]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn as_str(&self) -> Result<&str> {
        self.raw.as_str().ok_or_else(|| self.mismatch("string"))
    }

    pub fn as_f64(&self) -> Result<f64> {
        number_of(&self.raw).ok_or_else(|| self.mismatch("number"))
    }

    pub fn as_i64(&self) -> Result<i64> {
        match &self.raw {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
        .ok_or_else(|| self.mismatch("integer"))
    }

    pub fn as_bool(&self) -> Result<bool> {
        self.raw.as_bool().ok_or_else(|| self.mismatch("bool"))
    }

    pub fn as_time(&self) -> Result<DateTime<FixedOffset>> {
        time_of(&self.raw).ok_or_else(|| self.mismatch("time"))
    }

    pub fn as_seq(&self) -> Result<&[Value]> {
        self.raw
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.mismatch("array"))
    }

    /// Regex compiled from a string literal, built once per value
    pub fn as_regex(&self) -> Result<&Regex> {
        let pattern = self.as_str()?;
        let compiled = self
            .regex
            .get_or_init(|| Regex::new(pattern).map_err(|e| e.to_string()));
        compiled.as_ref().map_err(|reason| FilterError::TypeMismatch {
            expected: "regex",
            found: format!("`{}` ({})", pattern, reason),
        })
    }

    fn mismatch(&self, expected: &'static str) -> FilterError {
        FilterError::TypeMismatch {
            expected,
            found: type_name(&self.raw).to_string(),
        }
    }
}

impl From<Value> for CompareValue {
    fn from(raw: Value) -> Self {
        Self::new(raw)
    }
}

impl PartialEq for CompareValue {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl fmt::Debug for CompareValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CompareValue").field(&self.raw).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_one_literal_many_views() {
        let value = CompareValue::new(json!("18"));
        assert_eq!(value.as_str().unwrap(), "18");
        assert_eq!(value.as_f64().unwrap(), 18.0);
        assert_eq!(value.as_i64().unwrap(), 18);
        assert!(value.as_bool().is_err());
        assert!(value.as_seq().is_err());
    }

    #[test]
    fn test_non_finite_strings_are_not_numbers() {
        for literal in ["inf", "infinity", "NaN"] {
            let value = CompareValue::new(json!(literal));
            assert!(matches!(
                value.as_f64(),
                Err(FilterError::TypeMismatch { expected: "number", .. })
            ));
        }
    }

    #[test]
    fn test_type_mismatch_reports_found_type() {
        let value = CompareValue::new(json!({"a": 1}));
        match value.as_f64() {
            Err(FilterError::TypeMismatch { expected, found }) => {
                assert_eq!(expected, "number");
                assert_eq!(found, "object");
            }
            other => panic!("Expected type mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_as_seq() {
        let value = CompareValue::new(json!([1, "two", 3.0]));
        let seq = value.as_seq().unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq[1], json!("two"));
    }

    #[test]
    fn test_as_time() {
        let value = CompareValue::new(json!("2023-09-29"));
        assert_eq!(value.as_time().unwrap().timestamp(), 1_695_945_600);
        assert!(CompareValue::new(json!(true)).as_time().is_err());
    }

    #[test]
    fn test_regex_is_compiled_once() {
        let value = CompareValue::new(json!("^ab+c$"));
        let first = value.as_regex().unwrap() as *const Regex;
        let second = value.as_regex().unwrap() as *const Regex;
        assert_eq!(first, second);
        assert!(value.as_regex().unwrap().is_match("abbbc"));
    }

    #[test]
    fn test_invalid_regex() {
        let value = CompareValue::new(json!("(unclosed"));
        assert!(matches!(
            value.as_regex(),
            Err(FilterError::TypeMismatch { expected: "regex", .. })
        ));
    }
}
