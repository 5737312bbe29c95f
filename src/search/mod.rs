//! Object search over collections
//!
//! Applies one compiled condition to many objects. What happens to objects
//! whose result is indeterminate (a comparator error) is the caller's call.

use crate::condition::Condition;
use crate::error::Result;
use crate::value::Searchable;

/// What to do with an object whose evaluation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop and return the error
    #[default]
    Fail,
    /// Drop the object and keep going
    Exclude,
}

/// Select matching objects, failing on the first comparator error
pub fn select<'a, S, I>(condition: &Condition, items: I) -> Result<Vec<&'a S>>
where
    S: Searchable + 'a,
    I: IntoIterator<Item = &'a S>,
{
    select_with(condition, items, ErrorPolicy::Fail)
}

/// Select matching objects under an explicit error policy
pub fn select_with<'a, S, I>(
    condition: &Condition,
    items: I,
    policy: ErrorPolicy,
) -> Result<Vec<&'a S>>
where
    S: Searchable + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let mut selected = Vec::new();
    for_each_match(condition, items, policy, |_, item| selected.push(item))?;
    Ok(selected)
}

/// Call `on_match` with the index and object of every match, in order
fn for_each_match<'a, S, I, F>(
    condition: &Condition,
    items: I,
    policy: ErrorPolicy,
    mut on_match: F,
) -> Result<()>
where
    S: Searchable + 'a,
    I: IntoIterator<Item = &'a S>,
    F: FnMut(usize, &'a S),
{
    for (index, item) in items.into_iter().enumerate() {
        match condition.matches(item) {
            Ok(true) => on_match(index, item),
            Ok(false) => {}
            Err(err) if policy == ErrorPolicy::Exclude => {
                tracing::warn!(index, error = %err, "excluding object with indeterminate result");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

/// Count matching objects, failing on the first comparator error
pub fn count<'a, S, I>(condition: &Condition, items: I) -> Result<usize>
where
    S: Searchable + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let mut total = 0;
    for item in items {
        if condition.matches(item)? {
            total += 1;
        }
    }
    Ok(total)
}

/// Indices of matching objects, for callers that keep their own storage
pub fn positions<'a, S, I>(condition: &Condition, items: I, policy: ErrorPolicy) -> Result<Vec<usize>>
where
    S: Searchable + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let mut found = Vec::new();
    for_each_match(condition, items, policy, |index, _| found.push(index))?;
    Ok(found)
}
