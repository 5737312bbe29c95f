//! Error types for the object filter engine

use thiserror::Error;

/// Main error type for the object filter engine
///
/// Variants up to `InvalidCondition` are structural: they are raised while a
/// raw spec is parsed and abort tree construction. The rest surface while a
/// tree is evaluated or while the process-wide state is set up.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("no condition key indicated")]
    MissingKey,

    #[error("condition key must be a string, not {0}")]
    KeyNotString(String),

    #[error("condition key must not be empty")]
    EmptyKey,

    #[error("match not indicated for key `{0}`")]
    MissingMatch(String),

    #[error("illegal matcher for key `{key}`, match `{matcher}`")]
    IllegalMatcher { key: String, matcher: String },

    #[error("value not indicated for key `{0}`")]
    MissingValue(String),

    #[error("invalid condition: `{0}`")]
    InvalidCondition(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: String },

    #[error("field `{0}` not found")]
    FieldNotFound(String),

    #[error("comparison failed for key `{key}`: {reason}")]
    Comparison { key: String, reason: String },

    #[error("{0} already initialized")]
    AlreadyInitialized(&'static str),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl FilterError {
    /// True for errors detected while parsing a spec, before any evaluation
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            FilterError::MissingKey
                | FilterError::KeyNotString(_)
                | FilterError::EmptyKey
                | FilterError::MissingMatch(_)
                | FilterError::IllegalMatcher { .. }
                | FilterError::MissingValue(_)
                | FilterError::InvalidCondition(_)
        )
    }
}

#[cfg(feature = "python")]
impl From<FilterError> for pyo3::PyErr {
    fn from(err: FilterError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyTypeError, PyValueError};

        let msg = err.to_string();
        match err {
            _ if err.is_structural() => PyValueError::new_err(msg),
            FilterError::FieldNotFound(_) => PyKeyError::new_err(msg),
            FilterError::TypeMismatch { .. } => PyTypeError::new_err(msg),
            FilterError::DeserializationError(_) => PyValueError::new_err(msg),
            _ => PyRuntimeError::new_err(msg),
        }
    }
}

/// Result type alias for the object filter engine
pub type Result<T> = std::result::Result<T, FilterError>;
