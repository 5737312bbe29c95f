//! Condition tree built by the parser

use crate::registry::MatchHandler;
use crate::value::CompareValue;
use std::fmt;

/// Node of a parsed condition tree
///
/// Trees are immutable once built and can be evaluated from many threads.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Single field comparison like `{"key": "age", "match": "gt", "value": 18}`
    Leaf(Leaf),
    /// True iff every child is true; empty is true
    And(Vec<Condition>),
    /// True iff any child is true; empty is false
    Or(Vec<Condition>),
}

impl Condition {
    /// Number of leaf comparisons in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            Condition::Leaf(_) => 1,
            Condition::And(children) | Condition::Or(children) => {
                children.iter().map(Condition::leaf_count).sum()
            }
        }
    }
}

/// Single field comparison with its resolved comparator
#[derive(Clone)]
pub struct Leaf {
    /// Field key as written in the spec, never empty
    pub key: String,
    /// Operator name as written in the spec
    pub matcher: String,
    pub value: CompareValue,
    pub(crate) handler: MatchHandler,
}

impl Leaf {
    pub(crate) fn new(key: String, matcher: String, value: CompareValue, handler: MatchHandler) -> Self {
        Self {
            key,
            matcher,
            value,
            handler,
        }
    }
}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("key", &self.key)
            .field("matcher", &self.matcher)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}
