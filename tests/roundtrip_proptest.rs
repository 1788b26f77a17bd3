//! Property-based tests for the expression parser
//!
//! Random trees are rendered with `Display`, parsed back, and compared.
//! Literals are nonnegative because the lexer never produces signed numbers.

use exprtree::{parse_expression, tokenize, BinOp, Expr, PostfixOp, PrefixOp, TokenKind};
use proptest::prelude::*;

fn literal() -> impl Strategy<Value = Expr> {
    prop_oneof![
        (0..=i64::MAX).prop_map(Expr::integer),
        (0.0f64..1e12).prop_map(Expr::real),
    ]
}

fn variable() -> impl Strategy<Value = Expr> {
    proptest::char::range('a', 'z').prop_map(Expr::variable)
}

fn function_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("sin"),
        Just("cos"),
        Just("f"),
        Just("log_2"),
        Just("Gamma"),
    ]
}

fn bin_op() -> impl Strategy<Value = BinOp> {
    prop_oneof![
        Just(BinOp::Add),
        Just(BinOp::Sub),
        Just(BinOp::Mul),
        Just(BinOp::Div),
        Just(BinOp::Pow),
    ]
}

fn expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![literal(), variable()];
    leaf.prop_recursive(6, 48, 2, |inner| {
        prop_oneof![
            (bin_op(), inner.clone(), inner.clone())
                .prop_map(|(op, left, right)| Expr::binary(op, left, right)),
            inner.clone().prop_map(|e| Expr::prefix(PrefixOp::Minus, e)),
            inner.clone().prop_map(|e| Expr::prefix(PrefixOp::Plus, e)),
            inner.clone().prop_map(|e| Expr::postfix(PostfixOp::Factorial, e)),
            (function_name(), inner).prop_map(|(name, e)| Expr::apply(name, e)),
        ]
    })
}

proptest! {
    #[test]
    fn test_rendered_tree_parses_back(tree in expr()) {
        let text = tree.to_string();
        let parsed = parse_expression(&text);
        prop_assert!(parsed.is_ok(), "failed to parse {:?}: {:?}", text, parsed);
        prop_assert_eq!(parsed.unwrap(), tree);
    }

    #[test]
    fn test_rendering_is_a_fixed_point(tree in expr()) {
        let once = tree.to_string();
        let twice = parse_expression(&once).unwrap().to_string();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_form_rebuilds_tree(tree in expr()) {
        prop_assert_eq!(tree.to_nested().to_expr().unwrap(), tree);
    }

    #[test]
    fn test_integer_literal_round_trip(n in 0..=i64::MAX) {
        prop_assert_eq!(parse_expression(&n.to_string()).unwrap(), Expr::integer(n));
    }

    #[test]
    fn test_lexer_never_panics(source in "\\PC{0,40}") {
        if let Ok(tokens) = tokenize(&source) {
            prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::End));
        }
    }

    #[test]
    fn test_parser_never_panics(source in "[0-9a-z+*/^!(). -]{0,30}") {
        let _ = parse_expression(&source);
    }

    #[test]
    fn test_node_count_matches_nested_size(tree in expr()) {
        fn atoms(nested: &exprtree::Nested) -> usize {
            match nested {
                exprtree::Nested::Atom(_) => 1,
                exprtree::Nested::Seq(items) => items.iter().map(atoms).sum(),
            }
        }
        // every node contributes one atom: a literal, a variable, or its operator
        prop_assert_eq!(atoms(&tree.to_nested()), tree.node_count());
    }
}
