//! Property tests for calculator module
//!
//! The engine's cached path must give the same answers as running the
//! converter and evaluator by hand, and must be usable from many threads.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use crate::calculator::ExpressionEngine;
use crate::expression::{convert_to_postfix, evaluate_postfix, tokenize};
use crate::operator::OperatorTable;

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

/// Generate operand tokens: variables x, y, z or small integers
fn operand_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("x".to_string()),
        Just("y".to_string()),
        Just("Z".to_string()),
        (0..=9i32).prop_map(|n| n.to_string()),
    ]
}

/// Generate operator tokens in mixed case
fn operator_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("+"),
        Just("-"),
        Just("*"),
        Just("/"),
        Just("^"),
        Just("AND"),
        Just("or"),
        Just("<"),
        Just(">="),
        Just("="),
        Just("=!"),
    ]
}

/// Generate an unbracketed infix line like "x + 3 * Z"
fn line_strategy() -> impl Strategy<Value = String> {
    (
        operand_strategy(),
        prop::collection::vec((operator_strategy(), operand_strategy()), 0..=6),
    )
        .prop_map(|(first, rest)| {
            let mut line = first;
            for (op, operand) in rest {
                line.push(' ');
                line.push_str(op);
                line.push(' ');
                line.push_str(&operand);
            }
            line
        })
}

/// Generate variable values
fn variables_strategy() -> impl Strategy<Value = HashMap<String, f64>> {
    (-10.0..10.0f64, -10.0..10.0f64, -10.0..10.0f64).prop_map(|(x, y, z)| {
        let mut values = HashMap::new();
        values.insert("x".to_string(), x);
        values.insert("y".to_string(), y);
        values.insert("Z".to_string(), z);
        values
    })
}

fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// Cached evaluation equals a manual convert + evaluate
    #[test]
    fn prop_engine_matches_manual_pipeline(line in line_strategy(), values in variables_strategy()) {
        let engine = ExpressionEngine::default();

        let postfix = convert_to_postfix(&tokenize(&line), &OperatorTable::default()).unwrap();
        let manual = evaluate_postfix(&postfix, &values).unwrap();

        // Twice: once on a cache miss, once on a hit
        for _ in 0..2 {
            let result = engine.evaluate(&line, &values).unwrap();
            prop_assert!(same_value(result, manual), "{}: {} != {}", line, result, manual);
        }
        prop_assert_eq!(engine.cache_size(), 1);
    }

    /// Compiled variables are exactly the identifiers of the line
    #[test]
    fn prop_required_variables_are_identifiers(line in line_strategy()) {
        let engine = ExpressionEngine::default();
        let compiled = engine.compile(&line).unwrap();

        prop_assert_eq!(compiled.variables.to_vec(), engine.required_variables(&line));
        for name in compiled.variables.iter() {
            prop_assert!(["x", "y", "Z"].contains(&name.as_str()));
            prop_assert!(line.split_whitespace().any(|t| t == name));
        }
    }

    /// Every token of an unbracketed line survives conversion
    #[test]
    fn prop_conversion_keeps_token_count(line in line_strategy()) {
        let engine = ExpressionEngine::default();
        let compiled = engine.compile(&line).unwrap();
        prop_assert_eq!(compiled.postfix.len(), tokenize(&line).len());
    }
}

#[test]
fn test_shared_engine_across_threads() {
    let engine = Arc::new(ExpressionEngine::default());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                let mut values = HashMap::new();
                values.insert("n".to_string(), i as f64);
                engine.evaluate("( n + 1 ) * 2", &values).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), (i as f64 + 1.0) * 2.0);
    }
    assert_eq!(engine.cache_size(), 1);
}
