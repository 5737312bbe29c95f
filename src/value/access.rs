//! Field access on the objects being filtered

use serde_json::{Map, Value};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::HashMap;

/// An object that comparators can pull field values out of
///
/// Keys are opaque to the engine. The implementations shipped here read
/// dotted paths such as `owner.name` or `tags.0`.
pub trait Searchable {
    /// Resolve `key` against this object, `None` when absent
    fn lookup(&self, key: &str) -> Option<Cow<'_, Value>>;
}

/// Split a dotted path into its segments
#[inline]
fn segments(key: &str) -> SmallVec<[&str; 4]> {
    key.split('.').collect()
}

/// Walk `path` down from `root`
fn walk<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = root;
    for segment in path {
        current = match current {
            Value::Object(map) => map.get(*segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

impl Searchable for Value {
    fn lookup(&self, key: &str) -> Option<Cow<'_, Value>> {
        walk(self, &segments(key)).map(Cow::Borrowed)
    }
}

impl Searchable for Map<String, Value> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, Value>> {
        let path = segments(key);
        let (head, rest) = path.split_first()?;
        walk(self.get(*head)?, rest).map(Cow::Borrowed)
    }
}

impl Searchable for HashMap<String, Value> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, Value>> {
        let path = segments(key);
        let (head, rest) = path.split_first()?;
        walk(self.get(*head)?, rest).map(Cow::Borrowed)
    }
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn lookup(&self, key: &str) -> Option<Cow<'_, Value>> {
        (**self).lookup(key)
    }
}
