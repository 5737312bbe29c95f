//! Condition evaluator

use crate::condition::ast::{Condition, Leaf};
use crate::error::Result;
use crate::value::Searchable;

/// Evaluate a condition tree against an object
///
/// Children are evaluated left to right. AND stops at the first false child,
/// OR at the first true one, and both stop at the first error, returning it
/// unchanged.
pub fn check(condition: &Condition, obj: &dyn Searchable) -> Result<bool> {
    match condition {
        Condition::Leaf(leaf) => check_leaf(leaf, obj),
        Condition::And(children) => {
            for child in children {
                if !check(child, obj)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Condition::Or(children) => {
            for child in children {
                if check(child, obj)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

#[inline]
fn check_leaf(leaf: &Leaf, obj: &dyn Searchable) -> Result<bool> {
    let matched = (leaf.handler)(obj, &leaf.key, &leaf.value)?;
    tracing::trace!(key = %leaf.key, matcher = %leaf.matcher, matched, "leaf evaluated");
    Ok(matched)
}

impl Condition {
    /// Evaluate this tree against `obj`
    #[inline]
    pub fn evaluate(&self, obj: &dyn Searchable) -> Result<bool> {
        check(self, obj)
    }

    /// Evaluate against any searchable object without naming the trait object
    #[inline]
    pub fn matches<S: Searchable>(&self, obj: &S) -> Result<bool> {
        check(self, obj)
    }
}
