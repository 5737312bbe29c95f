//! Condition parsing and evaluation module
//!
//! This module compiles raw condition specs such as
//! `[{"key": "age", "match": "gt", "value": 18}, "or", {...}]` into a
//! `Condition` tree and evaluates that tree against searchable objects.

mod ast;
pub mod cache;
mod evaluator;
pub mod parser;


pub use ast::*;
pub use cache::*;
pub use evaluator::*;
pub use parser::*;
