//! Compiled condition cache - keyed by the canonical text of the spec

use crate::condition::ast::Condition;
use crate::condition::parser;
use crate::error::Result;
use crate::value::Searchable;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

/// Global condition cache with fast hashing (ahash)
static CONDITION_CACHE: Lazy<RwLock<AHashMap<String, Arc<Condition>>>> = Lazy::new(|| {
    let map = AHashMap::with_capacity(256);
    RwLock::new(map)
});

/// Get or parse a raw spec, using the cache for repeated specs
///
/// Specs are parsed against the process-wide registry and operator config,
/// which are frozen on first use, so cached trees never go stale.
#[inline]
pub fn get_or_parse(spec: &Value) -> Result<Arc<Condition>> {
    let key = spec.to_string();

    // Fast path: check read lock first
    {
        let cache = CONDITION_CACHE.read();
        if let Some(condition) = cache.get(&key) {
            return Ok(Arc::clone(condition));
        }
    }

    // Slow path: parse and cache
    let condition = Arc::new(parser::parse(spec)?);

    let mut cache = CONDITION_CACHE.write();
    Ok(Arc::clone(cache.entry(key).or_insert(condition)))
}

/// Check a raw spec against an object, using the cached tree
#[inline]
pub fn check_condition(spec: &Value, obj: &dyn Searchable) -> Result<bool> {
    let condition = get_or_parse(spec)?;
    condition.evaluate(obj)
}

/// Clear the condition cache
pub fn clear_cache() {
    let mut cache = CONDITION_CACHE.write();
    cache.clear();
}

/// Get cache statistics
pub fn cache_size() -> usize {
    let cache = CONDITION_CACHE.read();
    cache.len()
}
