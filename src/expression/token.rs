//! Token classification
//!
//! Tokens carry no type of their own. Every stage re-derives the class from
//! the raw text: operators and brackets are matched on a lowercased copy while
//! operands keep their original casing.

use crate::operator::{Operator, OperatorTable, CLOSE_BRACKET, OPEN_BRACKET};
use ahash::AHashSet;

/// Class of a raw token
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    /// Decimal literal
    Number(f64),
    /// Variable name
    Operand,
    Operator(Operator),
    OpenBracket,
    CloseBracket,
}

impl TokenKind {
    /// Numbers and variable names both go straight to postfix output
    #[inline]
    pub fn is_operand(&self) -> bool {
        matches!(self, TokenKind::Number(_) | TokenKind::Operand)
    }
}

/// Parse a token as a decimal floating point literal.
///
/// Only digits, signs, `.` and an exponent `e` are accepted, so spellings such
/// as `inf` or `nan` stay variable names.
#[inline]
pub fn parse_number(lowercase: &str) -> Option<f64> {
    let decimal = lowercase
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e'));
    if !decimal || !lowercase.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    lowercase.parse::<f64>().ok()
}

/// Classify a raw token against an operator table
pub fn classify(raw: &str, table: &OperatorTable) -> TokenKind {
    let lower = raw.to_lowercase();

    if let Some(value) = parse_number(&lower) {
        return TokenKind::Number(value);
    }

    match lower.as_str() {
        OPEN_BRACKET => TokenKind::OpenBracket,
        CLOSE_BRACKET => TokenKind::CloseBracket,
        other => table
            .lookup(other)
            .map(TokenKind::Operator)
            .unwrap_or(TokenKind::Operand),
    }
}

/// Split an expression line into tokens on runs of whitespace
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Variable names a caller has to supply values for.
///
/// Returned in order of first appearance with duplicates removed. Names keep
/// their original casing.
pub fn collect_variables<S: AsRef<str>>(tokens: &[S], table: &OperatorTable) -> Vec<String> {
    let mut seen = AHashSet::with_capacity(tokens.len());
    let mut variables = Vec::new();

    for token in tokens {
        let raw = token.as_ref();
        if classify(raw, table) == TokenKind::Operand && seen.insert(raw) {
            variables.push(raw.to_string());
        }
    }

    variables
}

/// Render a postfix sequence as a single space separated line
pub fn format_postfix<S: AsRef<str>>(postfix: &[S]) -> String {
    postfix
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}
