//! Error types for the expression engine

use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::PyErr;
use thiserror::Error;

/// Main error type for conversion and evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// Unbalanced brackets, missing operands or leftover operands
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),

    /// An operand identifier had no entry in the variable mapping
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl From<ExpressionError> for PyErr {
    fn from(err: ExpressionError) -> PyErr {
        match err {
            ExpressionError::UnknownVariable(name) => {
                PyKeyError::new_err(format!("Unknown variable: {}", name))
            }
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

/// Result type alias for the expression engine
pub type Result<T> = std::result::Result<T, ExpressionError>;
