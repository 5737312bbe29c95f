//! Object Search Core - Condition-based object filter engine
//!
//! This crate compiles nested search criteria (maps and lists, as they come
//! out of a configuration file or a query payload) into a predicate tree and
//! evaluates that tree against objects one at a time. Python bindings are
//! available behind the `python` feature.
//!
//! ```
//! use objsearch_core::parse;
//! use serde_json::json;
//!
//! let adult = parse(&json!({"key": "age", "match": "ge", "value": 18})).unwrap();
//! assert!(adult.matches(&json!({"age": 20})).unwrap());
//! ```

pub mod condition;
pub mod config;
pub mod error;
pub mod registry;
pub mod search;
pub mod value;

#[cfg(feature = "python")]
mod bindings;

pub use condition::{check, parse, parse_str, Condition, Leaf, Parser};
pub use config::{OperatorConfig, OperatorResolver};
pub use error::{FilterError, Result};
pub use registry::{MatchHandler, MatchRegistry};
pub use search::{select, select_with, ErrorPolicy};
pub use value::{CompareValue, Searchable};
