//! Infix to postfix conversion (shunting-yard)

use crate::error::{ExpressionError, Result};
use crate::expression::token::{classify, TokenKind};
use crate::operator::{Operator, OperatorTable, BRACKET_PRECEDENCE};
use smallvec::SmallVec;
use tracing::debug;

/// Entry on the pending operator stack
#[derive(Debug, Clone, Copy, PartialEq)]
enum Pending {
    OpenBracket,
    Operator(Operator),
}

impl Pending {
    #[inline]
    fn rank(self, table: &OperatorTable) -> u8 {
        match self {
            Pending::OpenBracket => BRACKET_PRECEDENCE,
            Pending::Operator(op) => table.precedence(op),
        }
    }
}

/// Convert infix tokens into postfix order.
///
/// Operands keep their original text; operators are written with their
/// lowercase symbol. Every operator is left-associative: an incoming operator
/// first pops everything on the stack with an equal or higher rank, so
/// `a ^ b ^ c` becomes `a b ^ c ^`.
///
/// # Errors
/// `MalformedExpression` when a `)` has no matching `(` or a `(` is never
/// closed.
pub fn convert_to_postfix<S: AsRef<str>>(tokens: &[S], table: &OperatorTable) -> Result<Vec<String>> {
    let mut stack: SmallVec<[Pending; 16]> = SmallVec::new();
    let mut output = Vec::with_capacity(tokens.len());

    for token in tokens {
        let raw = token.as_ref();

        match classify(raw, table) {
            TokenKind::Number(_) | TokenKind::Operand => output.push(raw.to_string()),
            TokenKind::OpenBracket => stack.push(Pending::OpenBracket),
            TokenKind::CloseBracket => loop {
                match stack.pop() {
                    Some(Pending::OpenBracket) => break,
                    Some(Pending::Operator(op)) => output.push(op.symbol().to_string()),
                    None => {
                        return Err(ExpressionError::MalformedExpression(
                            "')' without matching '('".to_string(),
                        ))
                    }
                }
            },
            TokenKind::Operator(incoming) => {
                let rank = table.precedence(incoming);
                while let Some(&top) = stack.last() {
                    if top.rank(table) < rank {
                        break;
                    }
                    // '(' ranks below every operator, so only operators get here
                    if let Pending::Operator(op) = top {
                        output.push(op.symbol().to_string());
                    }
                    stack.pop();
                }
                stack.push(Pending::Operator(incoming));
            }
        }
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Operator(op) => output.push(op.symbol().to_string()),
            Pending::OpenBracket => {
                return Err(ExpressionError::MalformedExpression(
                    "'(' is never closed".to_string(),
                ))
            }
        }
    }

    debug!(tokens = tokens.len(), postfix = output.len(), "converted infix to postfix");
    Ok(output)
}
