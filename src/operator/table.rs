//! Precedence table

use crate::error::{ExpressionError, Result};
use crate::operator::Operator;
use std::collections::HashMap;

/// Open bracket token
pub const OPEN_BRACKET: &str = "(";
/// Close bracket token
pub const CLOSE_BRACKET: &str = ")";
/// Rank of `(` on the operator stack. Lower than any operator, so only a
/// matching `)` ever removes it.
pub const BRACKET_PRECEDENCE: u8 = 0;

/// Immutable operator -> precedence rank mapping
#[derive(Debug, Clone)]
pub struct OperatorTable {
    /// Indexed by `Operator::index`; every operator has a rank
    ranks: [u8; Operator::COUNT],
}

impl Default for OperatorTable {
    fn default() -> Self {
        let mut ranks = [0; Operator::COUNT];
        for op in Operator::ALL {
            ranks[op.index()] = op.default_precedence();
        }
        Self { ranks }
    }
}

impl OperatorTable {
    /// Build the default table with some ranks replaced.
    ///
    /// Keys are operator symbols (matched case-insensitively). Brackets cannot
    /// be re-ranked, rank 0 is reserved for `(` and an operator may only be
    /// given once, whatever its spelling.
    pub fn with_overrides(overrides: &HashMap<String, u8>) -> Result<Self> {
        let mut table = Self::default();
        let mut given: [Option<&str>; Operator::COUNT] = [None; Operator::COUNT];

        for (symbol, rank) in overrides {
            let lower = symbol.to_lowercase();
            let op = Operator::from_symbol(&lower).ok_or_else(|| {
                ExpressionError::InvalidConfig(format!("Unknown operator: {}", symbol))
            })?;
            if let Some(previous) = given[op.index()].replace(symbol.as_str()) {
                return Err(ExpressionError::InvalidConfig(format!(
                    "Precedence of '{}' given more than once ('{}' and '{}')",
                    op, previous, symbol
                )));
            }
            if *rank <= BRACKET_PRECEDENCE {
                return Err(ExpressionError::InvalidConfig(format!(
                    "Precedence of '{}' must be above {}",
                    symbol, BRACKET_PRECEDENCE
                )));
            }
            table.ranks[op.index()] = *rank;
        }

        Ok(table)
    }

    /// Resolve a lowercase token to an operator
    #[inline]
    pub fn lookup(&self, lowercase: &str) -> Option<Operator> {
        Operator::from_symbol(lowercase)
    }

    /// Precedence rank of an operator
    #[inline]
    pub fn precedence(&self, op: Operator) -> u8 {
        self.ranks[op.index()]
    }

    /// Whether a lowercase token is an operator or a bracket
    pub fn is_reserved(&self, lowercase: &str) -> bool {
        lowercase == OPEN_BRACKET || lowercase == CLOSE_BRACKET || self.lookup(lowercase).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = OperatorTable::default();
        assert_eq!(table.precedence(Operator::Power), 4);
        assert_eq!(table.precedence(Operator::Multiply), 3);
        assert_eq!(table.precedence(Operator::Add), 2);
        assert_eq!(table.precedence(Operator::Equal), 1);
        assert_eq!(table.lookup("and"), Some(Operator::And));
        assert_eq!(table.lookup("x"), None);
    }

    #[test]
    fn test_reserved_tokens() {
        let table = OperatorTable::default();
        assert!(table.is_reserved("("));
        assert!(table.is_reserved(")"));
        assert!(table.is_reserved("=!"));
        assert!(!table.is_reserved("!="));
        assert!(!table.is_reserved("abc"));
    }

    #[test]
    fn test_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert("AND".to_string(), 2);
        overrides.insert("^".to_string(), 9);

        let table = OperatorTable::with_overrides(&overrides).unwrap();
        assert_eq!(table.precedence(Operator::And), 2);
        assert_eq!(table.precedence(Operator::Power), 9);
        assert_eq!(table.precedence(Operator::Or), 1);
    }

    #[test]
    fn test_overrides_reject_unknown_symbol() {
        let mut overrides = HashMap::new();
        overrides.insert("%".to_string(), 3);

        let err = OperatorTable::with_overrides(&overrides).unwrap_err();
        assert!(matches!(err, ExpressionError::InvalidConfig(_)));
    }

    #[test]
    fn test_overrides_reject_duplicate_spellings() {
        let mut overrides = HashMap::new();
        overrides.insert("AND".to_string(), 2);
        overrides.insert("and".to_string(), 5);

        let err = OperatorTable::with_overrides(&overrides).unwrap_err();
        assert!(matches!(err, ExpressionError::InvalidConfig(ref msg) if msg.contains("more than once")));

        // distinct operators sharing a rank are fine
        let mut overrides = HashMap::new();
        overrides.insert("AND".to_string(), 2);
        overrides.insert("Or".to_string(), 2);
        assert!(OperatorTable::with_overrides(&overrides).is_ok());
    }

    #[test]
    fn test_overrides_reject_bracket_rank() {
        let mut overrides = HashMap::new();
        overrides.insert("+".to_string(), 0);
        assert!(OperatorTable::with_overrides(&overrides).is_err());

        let mut overrides = HashMap::new();
        overrides.insert("(".to_string(), 5);
        assert!(OperatorTable::with_overrides(&overrides).is_err());
    }
}
