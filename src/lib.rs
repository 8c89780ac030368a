//! Postfix Calc Core - infix to postfix conversion and postfix evaluation
//!
//! This crate converts whitespace separated infix expressions into postfix
//! order with the shunting-yard algorithm and evaluates them against variable
//! values, with Python bindings via PyO3.

use pyo3::prelude::*;

pub mod calculator;
pub mod config;
pub mod error;
pub mod expression;
pub mod operator;

use crate::calculator::{ExpressionEngine, ExpressionSession};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use pyo3::types::PyDict;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Cached Engine
// ============================================================================

/// Global engine shared by every Python call
static CACHED_ENGINE: OnceCell<Arc<RwLock<Arc<ExpressionEngine>>>> = OnceCell::new();

/// Whether `init_config` has been called
static CONFIGURED: OnceCell<()> = OnceCell::new();

/// Current engine, creating the default one on first use
fn current_engine() -> Arc<ExpressionEngine> {
    CACHED_ENGINE
        .get_or_init(|| Arc::new(RwLock::new(Arc::new(ExpressionEngine::default()))))
        .read()
        .clone()
}

// ============================================================================
// Python Functions
// ============================================================================

/// Initialize the engine configuration
///
/// Replaces the engine used by every other function, which also drops all
/// cached conversions.
///
/// # Arguments
/// * `config` - Optional dict with `precedence` ({symbol: rank}) and
///   `cache_capacity` keys
#[pyfunction]
#[pyo3(signature = (config=None))]
fn init_config(config: Option<&Bound<'_, PyDict>>) -> PyResult<()> {
    let engine_config = match config {
        Some(dict) => config::deserialize_engine_config(dict)?,
        None => config::EngineConfig::default(),
    };
    let engine = Arc::new(ExpressionEngine::new(&engine_config)?);

    // If already initialized, swap the engine
    let slot = CACHED_ENGINE.get_or_init(|| Arc::new(RwLock::new(engine.clone())));
    *slot.write() = engine;
    let _ = CONFIGURED.set(());

    debug!("engine configuration initialized");
    Ok(())
}

/// Check if config is initialized
#[pyfunction]
fn is_config_initialized() -> bool {
    CONFIGURED.get().is_some()
}

/// Convert infix tokens to postfix tokens
///
/// # Raises
/// ValueError on unbalanced brackets
#[pyfunction]
fn convert_to_postfix(tokens: Vec<String>) -> PyResult<Vec<String>> {
    Ok(current_engine().convert(&tokens)?)
}

/// Evaluate postfix tokens against a dict of variable values
///
/// # Raises
/// KeyError for a missing variable, ValueError for a malformed sequence
#[pyfunction]
fn evaluate_postfix(postfix: Vec<String>, variables: HashMap<String, f64>) -> PyResult<f64> {
    Ok(current_engine().evaluate_postfix(&postfix, &variables)?)
}

/// Split, convert and evaluate an infix expression line
#[pyfunction]
fn evaluate(expression: &str, variables: HashMap<String, f64>) -> PyResult<f64> {
    Ok(current_engine().evaluate(expression, &variables)?)
}

/// Variable names an expression line needs values for
#[pyfunction]
fn required_variables(expression: &str) -> Vec<String> {
    current_engine().required_variables(expression)
}

/// Compile an expression line into a reusable ExpressionSession
#[pyfunction]
fn compile(expression: &str) -> PyResult<ExpressionSession> {
    let compiled = current_engine().compile(expression)?;
    Ok(ExpressionSession::new(compiled))
}

/// Evaluate an expression line asynchronously
///
/// The evaluation runs on Tokio's blocking pool so the asyncio event loop
/// stays responsive for large batches.
///
/// # Example (Python)
/// ```python
/// result = await evaluate_async("( a + b ) * c", {"a": 1, "b": 2, "c": 3})
/// ```
#[pyfunction]
fn evaluate_async<'py>(
    py: Python<'py>,
    expression: String,
    variables: HashMap<String, f64>,
) -> PyResult<Bound<'py, PyAny>> {
    let engine = current_engine();

    pyo3_async_runtimes::tokio::future_into_py(py, async move {
        let result = tokio::task::spawn_blocking(move || {
            engine
                .evaluate(&expression, &variables)
                .map_err(PyErr::from)
        })
        .await
        .map_err(|e| {
            PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!(
                "Evaluation task panicked: {}",
                e
            ))
        })??;

        Ok(result)
    })
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn postfix_calc_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_config, m)?)?;
    m.add_function(wrap_pyfunction!(is_config_initialized, m)?)?;
    m.add_function(wrap_pyfunction!(convert_to_postfix, m)?)?;
    m.add_function(wrap_pyfunction!(evaluate_postfix, m)?)?;
    m.add_function(wrap_pyfunction!(evaluate, m)?)?;
    m.add_function(wrap_pyfunction!(required_variables, m)?)?;
    m.add_function(wrap_pyfunction!(compile, m)?)?;
    m.add_function(wrap_pyfunction!(evaluate_async, m)?)?;
    m.add_class::<ExpressionSession>()?;
    Ok(())
}
