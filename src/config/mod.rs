//! Engine configuration
//!
//! This module handles deserialization of engine settings from JSON text or
//! from Python dicts.

use crate::error::{ExpressionError, Result};
use crate::expression::DEFAULT_CACHE_CAPACITY;
use pyo3::types::{PyAnyMethods, PyDict, PyDictMethods};
use pyo3::Bound;
use serde::Deserialize;
use std::collections::HashMap;

/// Settings used to build an `ExpressionEngine`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Precedence overrides keyed by operator symbol, e.g. {"and": 2}
    pub precedence: HashMap<String, u8>,
    /// Number of compiled expressions kept in memory; 0 disables the cache
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            precedence: HashMap::new(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON text
    ///
    /// Expected format: {"precedence": {"^": 5}, "cache_capacity": 512}
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ExpressionError::DeserializationError(e.to_string()))
    }
}

/// Deserialize an engine config from a Python dict
///
/// Missing keys fall back to their defaults.
pub fn deserialize_engine_config(config: &Bound<'_, PyDict>) -> pyo3::PyResult<EngineConfig> {
    let mut engine_config = EngineConfig::default();

    if let Some(precedence) = config.get_item("precedence")? {
        if !precedence.is_none() {
            let precedence: HashMap<String, u8> = precedence.extract().map_err(|_| {
                ExpressionError::DeserializationError(
                    "precedence must map operator symbols to small integers".to_string(),
                )
            })?;
            engine_config.precedence = precedence;
        }
    }

    if let Some(capacity) = config.get_item("cache_capacity")? {
        if !capacity.is_none() {
            engine_config.cache_capacity = capacity.extract().map_err(|_| {
                ExpressionError::DeserializationError(
                    "cache_capacity must be a non-negative integer".to_string(),
                )
            })?;
        }
    }

    Ok(engine_config)
}
