//! Condition spec parser
//!
//! Grammar, by shape of the raw spec:
//! - a mapping is a leaf: `{"key"|"col": <name>, "match": <operator>, "value": <literal>}`
//! - a sequence is a composite: AND by default, OR when any string element
//!   equals `"or"` (any case); non-string elements are nested specs
//! - anything else is invalid

use crate::condition::ast::{Condition, Leaf};
use crate::config::{self, OperatorResolver};
use crate::error::{FilterError, Result};
use crate::registry::{self, MatchRegistry};
use crate::value::CompareValue;
use serde_json::{Map, Value};

/// Shape of a raw spec
#[derive(Debug, Clone, Copy)]
pub enum RawSpec<'a> {
    Mapping(&'a Map<String, Value>),
    Sequence(&'a [Value]),
    Scalar(&'a Value),
}

impl<'a> From<&'a Value> for RawSpec<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => RawSpec::Mapping(map),
            Value::Array(items) => RawSpec::Sequence(items),
            other => RawSpec::Scalar(other),
        }
    }
}

/// Builds condition trees against one registry and operator resolver
#[derive(Clone, Copy)]
pub struct Parser<'a> {
    registry: &'a MatchRegistry,
    resolver: &'a dyn OperatorResolver,
}

impl<'a> Parser<'a> {
    pub fn new(registry: &'a MatchRegistry, resolver: &'a dyn OperatorResolver) -> Self {
        Self { registry, resolver }
    }

    /// Parser over the process-wide registry and operator config
    pub fn global() -> Parser<'static> {
        Parser::new(registry::global(), config::global())
    }

    /// Parse a raw spec into a condition tree; no partial trees on error
    pub fn parse(&self, spec: &Value) -> Result<Condition> {
        match RawSpec::from(spec) {
            RawSpec::Mapping(map) => self.parse_leaf(map).map(Condition::Leaf),
            RawSpec::Sequence(items) => self.parse_composite(items),
            RawSpec::Scalar(other) => Err(FilterError::InvalidCondition(other.to_string())),
        }
    }

    fn parse_leaf(&self, spec: &Map<String, Value>) -> Result<Leaf> {
        let key = match spec.get("key").or_else(|| spec.get("col")) {
            None => return Err(FilterError::MissingKey),
            Some(Value::String(key)) => key,
            Some(other) => return Err(FilterError::KeyNotString(other.to_string())),
        };
        if key.is_empty() {
            return Err(FilterError::EmptyKey);
        }

        let matcher = match spec.get("match") {
            None => return Err(FilterError::MissingMatch(key.clone())),
            Some(Value::String(matcher)) => matcher,
            Some(other) => {
                return Err(FilterError::IllegalMatcher {
                    key: key.clone(),
                    matcher: other.to_string(),
                })
            }
        };

        let value = spec
            .get("value")
            .ok_or_else(|| FilterError::MissingValue(key.clone()))?;

        let canonical = self.resolver.resolve(matcher);
        let handler = self
            .registry
            .lookup(&canonical)
            .ok_or_else(|| FilterError::IllegalMatcher {
                key: key.clone(),
                matcher: matcher.clone(),
            })?;

        tracing::trace!(key = %key, matcher = %matcher, operator = %canonical, "parsed leaf condition");
        Ok(Leaf::new(
            key.clone(),
            matcher.clone(),
            CompareValue::new(value.clone()),
            handler,
        ))
    }

    fn parse_composite(&self, items: &[Value]) -> Result<Condition> {
        let mut any_of = false;
        let mut children = Vec::with_capacity(items.len());

        for item in items {
            match item {
                Value::String(token) if token.eq_ignore_ascii_case("or") => any_of = true,
                Value::String(token) => {
                    tracing::debug!(token = %token, "ignoring unrecognised logic token");
                }
                nested => children.push(self.parse(nested)?),
            }
        }

        Ok(if any_of {
            Condition::Or(children)
        } else {
            Condition::And(children)
        })
    }
}

/// Parse a raw spec against the process-wide registry and operator config
pub fn parse(spec: &Value) -> Result<Condition> {
    let condition = Parser::global().parse(spec)?;
    tracing::debug!(leaves = condition.leaf_count(), "condition compiled");
    Ok(condition)
}

/// Parse a JSON document holding a raw spec
pub fn parse_str(spec: &str) -> Result<Condition> {
    let value: Value = serde_json::from_str(spec)
        .map_err(|e| FilterError::DeserializationError(e.to_string()))?;
    parse(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OperatorConfig;
    use serde_json::json;
    use std::collections::HashMap;

    fn parse_default(spec: Value) -> Result<Condition> {
        let registry = MatchRegistry::with_builtins();
        let resolver = OperatorConfig::default();
        Parser::new(&registry, &resolver).parse(&spec)
    }

    fn children(cond: &Condition) -> &[Condition] {
        match cond {
            Condition::And(children) | Condition::Or(children) => children,
            Condition::Leaf(_) => panic!("Expected composite condition"),
        }
    }

    #[test]
    fn test_parse_leaf() {
        let cond = parse_default(json!({"key": "age", "match": "gt", "value": 18})).unwrap();
        match cond {
            Condition::Leaf(leaf) => {
                assert_eq!(leaf.key, "age");
                assert_eq!(leaf.matcher, "gt");
                assert_eq!(leaf.value.raw(), &json!(18));
            }
            _ => panic!("Expected leaf condition"),
        }
    }

    #[test]
    fn test_parse_col_alias() {
        let cond = parse_default(json!({"col": "name", "match": "eq", "value": "x"})).unwrap();
        match cond {
            Condition::Leaf(leaf) => assert_eq!(leaf.key, "name"),
            _ => panic!("Expected leaf condition"),
        }
    }

    #[test]
    fn test_key_checked_before_col() {
        let cond =
            parse_default(json!({"key": "a", "col": "b", "match": "eq", "value": 1})).unwrap();
        match cond {
            Condition::Leaf(leaf) => assert_eq!(leaf.key, "a"),
            _ => panic!("Expected leaf condition"),
        }
    }

    #[test]
    fn test_parse_and_by_default() {
        let cond = parse_default(json!([
            {"key": "a", "match": "eq", "value": 1},
            {"key": "b", "match": "eq", "value": 2}
        ]))
        .unwrap();
        assert!(matches!(cond, Condition::And(_)));
        assert_eq!(children(&cond).len(), 2);
    }

    #[test]
    fn test_or_token_anywhere() {
        let a = json!({"key": "a", "match": "eq", "value": 1});
        let b = json!({"key": "b", "match": "eq", "value": 2});
        let specs = [
            json!(["or", a.clone(), b.clone()]),
            json!([a.clone(), "OR", b.clone()]),
            json!([a.clone(), b.clone(), "Or"]),
        ];
        for spec in specs {
            let cond = parse_default(spec).unwrap();
            assert!(matches!(cond, Condition::Or(_)));
            assert_eq!(children(&cond).len(), 2);
        }
    }

    #[test]
    fn test_other_tokens_ignored() {
        let cond = parse_default(json!(["and", {"key": "a", "match": "eq", "value": 1}])).unwrap();
        assert!(matches!(cond, Condition::And(_)));
        assert_eq!(children(&cond).len(), 1);
    }

    #[test]
    fn test_parse_nested() {
        let cond = parse_default(json!([
            {"key": "a", "match": "eq", "value": 1},
            [{"key": "b", "match": "eq", "value": 2}, "or", {"key": "c", "match": "eq", "value": 3}]
        ]))
        .unwrap();
        assert!(matches!(cond, Condition::And(_)));
        let top = children(&cond);
        assert!(matches!(top[0], Condition::Leaf(_)));
        match &top[1] {
            Condition::Or(inner) => {
                assert_eq!(inner.len(), 2);
                match (&inner[0], &inner[1]) {
                    (Condition::Leaf(b), Condition::Leaf(c)) => {
                        assert_eq!(b.key, "b");
                        assert_eq!(c.key, "c");
                    }
                    _ => panic!("Expected leaves inside OR"),
                }
            }
            _ => panic!("Expected OR as second child"),
        }
        assert_eq!(cond.leaf_count(), 3);
    }

    #[test]
    fn test_empty_sequences() {
        assert!(matches!(parse_default(json!([])).unwrap(), Condition::And(ref c) if c.is_empty()));
        assert!(matches!(parse_default(json!(["or"])).unwrap(), Condition::Or(ref c) if c.is_empty()));
    }

    #[test]
    fn test_missing_key() {
        let err = parse_default(json!({"match": "eq", "value": 1})).unwrap_err();
        assert_eq!(err, FilterError::MissingKey);
        assert_eq!(err.to_string(), "no condition key indicated");
    }

    #[test]
    fn test_key_not_string() {
        let err = parse_default(json!({"key": 5, "match": "eq", "value": 1})).unwrap_err();
        assert_eq!(err, FilterError::KeyNotString("5".to_string()));
    }

    #[test]
    fn test_empty_key() {
        let err = parse_default(json!({"key": "", "match": "eq", "value": 1})).unwrap_err();
        assert_eq!(err, FilterError::EmptyKey);
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_missing_match() {
        let err = parse_default(json!({"key": "age", "value": 1})).unwrap_err();
        assert!(matches!(err, FilterError::MissingMatch(_)));
        assert!(err.to_string().contains("match"));
    }

    #[test]
    fn test_match_not_string() {
        let err = parse_default(json!({"key": "age", "match": 7, "value": 1})).unwrap_err();
        assert_eq!(
            err,
            FilterError::IllegalMatcher {
                key: "age".to_string(),
                matcher: "7".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_value() {
        let err = parse_default(json!({"key": "age", "match": "eq"})).unwrap_err();
        assert!(matches!(err, FilterError::MissingValue(_)));
        assert!(err.to_string().contains("value"));
    }

    #[test]
    fn test_null_value_is_present() {
        assert!(parse_default(json!({"key": "age", "match": "eq", "value": null})).is_ok());
    }

    #[test]
    fn test_unknown_matcher() {
        let err = parse_default(json!({"key": "age", "match": "bigger", "value": 1})).unwrap_err();
        assert_eq!(err.to_string(), "illegal matcher for key `age`, match `bigger`");
    }

    #[test]
    fn test_invalid_shapes() {
        for spec in [json!(5), json!(null), json!(true), json!("or")] {
            let err = parse_default(spec.clone()).unwrap_err();
            assert!(matches!(err, FilterError::InvalidCondition(_)), "spec {}", spec);
        }
        assert_eq!(
            parse_default(json!(3.5)).unwrap_err().to_string(),
            "invalid condition: `3.5`"
        );
    }

    #[test]
    fn test_child_error_aborts_parse() {
        let err = parse_default(json!([
            {"key": "a", "match": "eq", "value": 1},
            [{"key": "b", "match": "eq"}]
        ]))
        .unwrap_err();
        assert_eq!(err, FilterError::MissingValue("b".to_string()));

        let err = parse_default(json!([{"key": "a", "match": "eq", "value": 1}, 42])).unwrap_err();
        assert_eq!(err, FilterError::InvalidCondition("42".to_string()));
    }

    #[test]
    fn test_aliases_resolved_through_config() {
        let registry = MatchRegistry::with_builtins();
        let mut aliases = HashMap::new();
        aliases.insert(">".to_string(), "gt".to_string());
        let resolver = OperatorConfig::new(aliases, false);
        let parser = Parser::new(&registry, &resolver);

        let cond = parser
            .parse(&json!({"key": "age", "match": ">", "value": 18}))
            .unwrap();
        match cond {
            Condition::Leaf(leaf) => assert_eq!(leaf.matcher, ">"),
            _ => panic!("Expected leaf condition"),
        }

        let err = parser
            .parse(&json!({"key": "age", "match": ">>", "value": 18}))
            .unwrap_err();
        assert!(matches!(err, FilterError::IllegalMatcher { .. }));
    }

    #[test]
    fn test_global_parse_str() {
        let cond = parse_str(r#"{"key": "age", "match": "ge", "value": 21}"#).unwrap();
        assert!(matches!(cond, Condition::Leaf(_)));
        assert!(matches!(
            parse_str("{not json"),
            Err(FilterError::DeserializationError(_))
        ));
    }
}
