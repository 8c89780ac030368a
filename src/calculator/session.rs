//! ExpressionSession - compiled expression handle for the Python boundary
//!
//! The postfix sequence stays in Rust heap memory; Python evaluates it as many
//! times as it likes without converting the expression again.

use pyo3::prelude::*;
use std::collections::HashMap;

use crate::expression::CompiledExpression;

/// Compiled expression exposed to Python
#[pyclass]
pub struct ExpressionSession {
    compiled: CompiledExpression,
}

impl ExpressionSession {
    pub fn new(compiled: CompiledExpression) -> Self {
        Self { compiled }
    }

    pub fn compiled(&self) -> &CompiledExpression {
        &self.compiled
    }
}

// ============================================================================
// PyMethods Implementation
// ============================================================================

#[pymethods]
impl ExpressionSession {
    /// Original expression line
    #[getter]
    fn source(&self) -> String {
        self.compiled.source.to_string()
    }

    /// Postfix tokens
    #[getter]
    fn postfix(&self) -> Vec<String> {
        self.compiled.postfix.to_vec()
    }

    /// Variable names the expression needs, in first-appearance order
    #[getter]
    fn variables(&self) -> Vec<String> {
        self.compiled.variables.to_vec()
    }

    /// Postfix tokens joined by single spaces
    #[getter]
    fn postfix_string(&self) -> String {
        self.compiled.postfix_string()
    }

    /// Evaluate against a dict of variable values
    ///
    /// # Raises
    /// KeyError for a missing variable, ValueError for a malformed expression
    fn evaluate(&self, variables: HashMap<String, f64>) -> PyResult<f64> {
        Ok(self.compiled.evaluate(&variables)?)
    }

    fn __repr__(&self) -> String {
        format!(
            "ExpressionSession(source={:?}, postfix={:?})",
            &*self.compiled.source,
            self.compiled.postfix_string()
        )
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
