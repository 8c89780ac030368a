//! Main expression engine

use crate::config::EngineConfig;
use crate::error::Result;
use crate::expression::{
    collect_variables, convert_to_postfix, evaluate_postfix, tokenize, CompiledExpression,
    ConversionCache, VariableSource,
};
use crate::operator::OperatorTable;
use tracing::debug;

/// Owns an operator table and a cache of compiled expressions.
///
/// All methods take `&self`; the engine can be shared between threads.
#[derive(Debug, Default)]
pub struct ExpressionEngine {
    table: OperatorTable,
    cache: ConversionCache,
}

impl ExpressionEngine {
    /// Build an engine from a config
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let table = OperatorTable::with_overrides(&config.precedence)?;
        debug!(
            overrides = config.precedence.len(),
            cache_capacity = config.cache_capacity,
            "created expression engine"
        );

        Ok(Self {
            table,
            cache: ConversionCache::with_capacity(config.cache_capacity),
        })
    }

    /// Build an engine around an existing table
    pub fn with_table(table: OperatorTable, cache_capacity: usize) -> Self {
        Self {
            table,
            cache: ConversionCache::with_capacity(cache_capacity),
        }
    }

    pub fn table(&self) -> &OperatorTable {
        &self.table
    }

    /// Convert pre-split infix tokens to postfix
    pub fn convert<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Vec<String>> {
        convert_to_postfix(tokens, &self.table)
    }

    /// Evaluate a postfix sequence
    pub fn evaluate_postfix<S, V>(&self, postfix: &[S], variables: &V) -> Result<f64>
    where
        S: AsRef<str>,
        V: VariableSource + ?Sized,
    {
        evaluate_postfix(postfix, variables)
    }

    /// Compile an expression line, reusing a cached result when available
    pub fn compile(&self, expression: &str) -> Result<CompiledExpression> {
        let table = &self.table;
        self.cache
            .get_or_compile(expression, |source| CompiledExpression::compile(source, table))
    }

    /// Compile and evaluate an expression line in one step
    pub fn evaluate<V: VariableSource + ?Sized>(&self, expression: &str, variables: &V) -> Result<f64> {
        self.compile(expression)?.evaluate(variables)
    }

    /// Variable names an expression line needs values for.
    ///
    /// Works on unbalanced input too, since no conversion takes place.
    pub fn required_variables(&self, expression: &str) -> Vec<String> {
        collect_variables(&tokenize(expression), &self.table)
    }

    /// Clear the compiled expression cache
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
