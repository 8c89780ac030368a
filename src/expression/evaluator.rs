//! Postfix evaluator

use crate::error::{ExpressionError, Result};
use crate::expression::token::parse_number;
use crate::operator::{Operator, CLOSE_BRACKET, OPEN_BRACKET};
use ahash::AHashMap;
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use tracing::{debug, trace};

/// Variable name -> value mapping consulted during evaluation
pub trait VariableSource {
    /// Value bound to an exact name
    fn lookup(&self, name: &str) -> Option<f64>;
}

impl<S: BuildHasher> VariableSource for HashMap<String, f64, S> {
    #[inline]
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl VariableSource for AHashMap<String, f64> {
    #[inline]
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl VariableSource for BTreeMap<String, f64> {
    #[inline]
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// Literal name first, then the lowercased name
#[inline]
fn resolve<V: VariableSource + ?Sized>(variables: &V, raw: &str, lower: &str) -> Option<f64> {
    variables
        .lookup(raw)
        .or_else(|| if lower != raw { variables.lookup(lower) } else { None })
}

/// Evaluate a postfix sequence.
///
/// Each token is tried as a number, then as a variable, then as an operator.
/// An operator pops `right` and then `left`; when only one value is on the
/// stack `left` defaults to 0, which is how `x not` works.
///
/// # Errors
/// - `UnknownVariable` for a token that is neither a number, a bound
///   variable nor an operator
/// - `MalformedExpression` for an operator with no operands, a bracket in the
///   sequence, or anything other than exactly one value left at the end
pub fn evaluate_postfix<S, V>(postfix: &[S], variables: &V) -> Result<f64>
where
    S: AsRef<str>,
    V: VariableSource + ?Sized,
{
    let mut stack: SmallVec<[f64; 16]> = SmallVec::new();

    for token in postfix {
        let raw = token.as_ref();
        let lower = raw.to_lowercase();

        if let Some(value) = parse_number(&lower) {
            stack.push(value);
        } else if let Some(value) = resolve(variables, raw, &lower) {
            stack.push(value);
        } else if let Some(op) = Operator::from_symbol(&lower) {
            let right = stack.pop().ok_or_else(|| {
                ExpressionError::MalformedExpression(format!("Operator '{}' has no operands", op))
            })?;
            let left = stack.pop().unwrap_or(0.0);
            let result = op.apply(left, right);
            trace!(%op, left, right, result, "applied operator");
            stack.push(result);
        } else if lower == OPEN_BRACKET || lower == CLOSE_BRACKET {
            return Err(ExpressionError::MalformedExpression(format!(
                "Bracket '{}' in postfix expression",
                raw
            )));
        } else {
            return Err(ExpressionError::UnknownVariable(raw.to_string()));
        }
    }

    match stack.as_slice() {
        [result] => {
            debug!(tokens = postfix.len(), result, "evaluated postfix");
            Ok(*result)
        }
        [] => Err(ExpressionError::MalformedExpression(
            "Empty expression".to_string(),
        )),
        rest => Err(ExpressionError::MalformedExpression(format!(
            "{} values left after evaluation",
            rest.len()
        ))),
    }
}
