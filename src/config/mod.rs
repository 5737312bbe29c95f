//! Operator configuration
//!
//! This module maps the operator spellings used in condition specs onto the
//! canonical keys of the match registry. The engine itself knows no aliases;
//! they come from the embedding configuration.

use crate::error::{FilterError, Result};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::HashMap;

/// Resolve a user-facing operator name to a canonical registry key
pub trait OperatorResolver: Send + Sync {
    fn resolve<'a>(&'a self, alias: &'a str) -> Cow<'a, str>;
}

impl<F> OperatorResolver for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn resolve<'a>(&'a self, alias: &'a str) -> Cow<'a, str> {
        Cow::Owned(self(alias))
    }
}

/// Operator alias table
///
/// Expected format: `{"aliases": {"==": "eq", ">": "gt"}, "case_insensitive": true}`.
/// Names without an alias resolve to themselves.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperatorConfig {
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    #[serde(default)]
    pub case_insensitive: bool,
}

impl OperatorConfig {
    pub fn new(aliases: HashMap<String, String>, case_insensitive: bool) -> Self {
        let aliases = if case_insensitive {
            aliases
                .into_iter()
                .map(|(alias, key)| (alias.to_lowercase(), key))
                .collect()
        } else {
            aliases
        };
        Self {
            aliases,
            case_insensitive,
        }
    }

    /// Load from a JSON document
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: OperatorConfig = serde_json::from_str(text)
            .map_err(|e| FilterError::DeserializationError(e.to_string()))?;
        Ok(Self::new(raw.aliases, raw.case_insensitive))
    }

    /// Load from an already decoded value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let raw: OperatorConfig = serde_json::from_value(value)
            .map_err(|e| FilterError::DeserializationError(e.to_string()))?;
        Ok(Self::new(raw.aliases, raw.case_insensitive))
    }
}

impl OperatorResolver for OperatorConfig {
    fn resolve<'a>(&'a self, alias: &'a str) -> Cow<'a, str> {
        if self.case_insensitive {
            let lowered = alias.to_lowercase();
            match self.aliases.get(&lowered) {
                Some(key) => Cow::Borrowed(key.as_str()),
                None => Cow::Owned(lowered),
            }
        } else {
            match self.aliases.get(alias) {
                Some(key) => Cow::Borrowed(key.as_str()),
                None => Cow::Borrowed(alias),
            }
        }
    }
}

/// Process-wide operator configuration
static OPERATOR_CONFIG: OnceCell<OperatorConfig> = OnceCell::new();

/// Install the process-wide operator configuration (call once at startup)
pub fn install(config: OperatorConfig) -> Result<()> {
    OPERATOR_CONFIG
        .set(config)
        .map_err(|_| FilterError::AlreadyInitialized("operator config"))?;
    tracing::debug!("operator config installed");
    Ok(())
}

/// Check if a configuration has been installed or frozen
pub fn is_initialized() -> bool {
    OPERATOR_CONFIG.get().is_some()
}

/// The installed configuration, or the identity configuration on first use
pub fn global() -> &'static OperatorConfig {
    OPERATOR_CONFIG.get_or_init(OperatorConfig::default)
}
