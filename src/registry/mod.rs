//! Match handler registry
//!
//! Maps canonical operator keys to comparator functions. A registry is built
//! and filled by its owner, then frozen: either handed to a `Parser`
//! directly or installed once as the process-wide registry.

mod builtin;

pub use builtin::*;

use crate::error::{FilterError, Result};
use crate::value::{CompareValue, Searchable};
use ahash::AHashMap;
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// Comparator for one named operator: `(object, field key, literal) -> matched`
pub type MatchHandler =
    Arc<dyn Fn(&dyn Searchable, &str, &CompareValue) -> Result<bool> + Send + Sync>;

/// Canonical operator key -> comparator
#[derive(Clone, Default)]
pub struct MatchRegistry {
    handlers: AHashMap<String, MatchHandler>,
}

impl MatchRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in comparator
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry);
        registry
    }

    /// Register `handler` under `name`, replacing any previous handler
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&dyn Searchable, &str, &CompareValue) -> Result<bool> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.handlers.insert(name.clone(), Arc::new(handler)).is_some() {
            tracing::debug!(operator = %name, "match handler replaced");
        }
        self
    }

    #[inline]
    pub fn lookup(&self, name: &str) -> Option<MatchHandler> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered operator keys, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for MatchRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchRegistry")
            .field("operators", &self.names())
            .finish()
    }
}

/// Process-wide registry, frozen once set
static GLOBAL_REGISTRY: OnceCell<MatchRegistry> = OnceCell::new();

/// Install the process-wide registry (call once at startup, before parsing)
pub fn install(registry: MatchRegistry) -> Result<()> {
    let count = registry.len();
    GLOBAL_REGISTRY
        .set(registry)
        .map_err(|_| FilterError::AlreadyInitialized("match registry"))?;
    tracing::debug!(operators = count, "match registry installed");
    Ok(())
}

/// The installed registry, or the built-in one frozen on first use
pub fn global() -> &'static MatchRegistry {
    GLOBAL_REGISTRY.get_or_init(|| {
        tracing::debug!("no match registry installed, freezing built-in comparators");
        MatchRegistry::with_builtins()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = MatchRegistry::new();
        assert!(registry.lookup("always").is_none());

        registry.register("always", |_, _, _| Ok(true));
        let handler = registry.lookup("always").unwrap();
        let obj = json!({});
        assert!(handler(&obj, "x", &CompareValue::new(json!(1))).unwrap());
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = MatchRegistry::with_builtins();
        assert!(registry.contains("eq"));
        assert!(!registry.contains("EQ"));
        assert!(!registry.contains("=="));
    }

    #[test]
    fn test_replace_handler() {
        let mut registry = MatchRegistry::new();
        registry
            .register("flag", |_, _, _| Ok(false))
            .register("flag", |_, _, _| Ok(true));
        assert_eq!(registry.len(), 1);

        let obj = json!({});
        let handler = registry.lookup("flag").unwrap();
        assert!(handler(&obj, "x", &CompareValue::new(json!(null))).unwrap());
    }

    #[test]
    fn test_builtin_names() {
        let registry = MatchRegistry::with_builtins();
        for name in ["eq", "ne", "gt", "ge", "lt", "le", "in", "nin", "regex", "exists"] {
            assert!(registry.contains(name), "missing builtin {}", name);
        }
        let names = registry.names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_global_is_frozen_after_first_use() {
        assert!(global().contains("eq"));
        assert!(matches!(
            install(MatchRegistry::new()),
            Err(FilterError::AlreadyInitialized(_))
        ));
    }
}
