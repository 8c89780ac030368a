//! Compiled expression cache - keyed by the raw expression line

use crate::error::Result;
use crate::expression::converter::convert_to_postfix;
use crate::expression::evaluator::{evaluate_postfix, VariableSource};
use crate::expression::token::{collect_variables, format_postfix, tokenize};
use crate::operator::OperatorTable;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::trace;

/// Default number of expressions kept before the cache is flushed
pub const DEFAULT_CACHE_CAPACITY: usize = 2048;

/// An expression line already converted to postfix.
///
/// Cheap to clone; the token lists are shared.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    pub source: Arc<str>,
    pub postfix: Arc<[String]>,
    /// Variable names the expression needs, in first-appearance order
    pub variables: Arc<[String]>,
}

impl CompiledExpression {
    /// Tokenize, convert and collect the variables of one expression line
    pub fn compile(source: &str, table: &OperatorTable) -> Result<Self> {
        let tokens = tokenize(source);
        let postfix = convert_to_postfix(&tokens, table)?;
        let variables = collect_variables(&tokens, table);

        Ok(Self {
            source: Arc::from(source),
            postfix: postfix.into(),
            variables: variables.into(),
        })
    }

    /// Evaluate the stored postfix sequence
    #[inline]
    pub fn evaluate<V: VariableSource + ?Sized>(&self, variables: &V) -> Result<f64> {
        evaluate_postfix(&self.postfix[..], variables)
    }

    /// Postfix sequence as a space separated line
    pub fn postfix_string(&self) -> String {
        format_postfix(&self.postfix[..])
    }
}

/// Thread-safe cache of compiled expressions
#[derive(Debug)]
pub struct ConversionCache {
    entries: RwLock<AHashMap<String, CompiledExpression>>,
    capacity: usize,
}

impl Default for ConversionCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl ConversionCache {
    /// Create a cache holding at most `capacity` expressions; 0 disables caching
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(AHashMap::with_capacity(capacity.min(DEFAULT_CACHE_CAPACITY))),
            capacity,
        }
    }

    /// Get a compiled expression, compiling and storing it on a miss.
    ///
    /// Failed compilations are not stored.
    #[inline]
    pub fn get_or_compile<F>(&self, source: &str, compile: F) -> Result<CompiledExpression>
    where
        F: FnOnce(&str) -> Result<CompiledExpression>,
    {
        // Fast path: check read lock first
        {
            let entries = self.entries.read();
            if let Some(compiled) = entries.get(source) {
                trace!(source, "conversion cache hit");
                return Ok(compiled.clone());
            }
        }

        // Slow path: compile and cache
        let compiled = compile(source)?;
        trace!(source, "conversion cache miss");

        if self.capacity > 0 {
            let mut entries = self.entries.write();
            if entries.len() >= self.capacity && !entries.contains_key(source) {
                trace!(capacity = self.capacity, "conversion cache full, flushing");
                entries.clear();
            }
            entries.insert(source.to_string(), compiled.clone());
        }

        Ok(compiled)
    }

    /// Clear all cached expressions
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExpressionError;
    use std::collections::HashMap;

    fn compile(source: &str) -> Result<CompiledExpression> {
        CompiledExpression::compile(source, &OperatorTable::default())
    }

    #[test]
    fn test_compile() {
        let compiled = compile("( a + B ) * a").unwrap();
        assert_eq!(&*compiled.postfix, ["a", "B", "+", "a", "*"]);
        assert_eq!(&*compiled.variables, ["a", "B"]);
        assert_eq!(compiled.postfix_string(), "a B + a *");

        let mut values = HashMap::new();
        values.insert("a".to_string(), 2.0);
        values.insert("B".to_string(), 3.0);
        assert_eq!(compiled.evaluate(&values).unwrap(), 10.0);
    }

    #[test]
    fn test_cache_hit() {
        let cache = ConversionCache::default();

        let first = cache.get_or_compile("x > 5", compile).unwrap();
        assert_eq!(cache.len(), 1);

        // A second lookup must not compile again
        let second = cache
            .get_or_compile("x > 5", |_| panic!("compiled twice"))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = ConversionCache::default();

        let err = cache.get_or_compile("( a", compile).unwrap_err();
        assert!(matches!(err, ExpressionError::MalformedExpression(_)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_flushes() {
        let cache = ConversionCache::with_capacity(2);

        cache.get_or_compile("a", compile).unwrap();
        cache.get_or_compile("b", compile).unwrap();
        assert_eq!(cache.len(), 2);

        cache.get_or_compile("c", compile).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let cache = ConversionCache::with_capacity(0);

        cache.get_or_compile("a + b", compile).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = ConversionCache::default();
        cache.get_or_compile("a", compile).unwrap();
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
