use super::*;
use hfx_ast::analyze;

fn fold(node: &NodeRef) -> NodeRef {
    ConstantFolding.transform(node, &AnalysisResult::default())
}

fn num(n: f64) -> LiteralValue {
    LiteralValue::Number(n)
}

#[test]
fn test_fold_addition() {
    let out = fold(&Node::binary("+", Node::literal(5), Node::literal(3)));
    assert_eq!(out, Node::literal(8));
}

#[test]
fn test_division_by_zero_stays_unfolded() {
    let expr = Node::binary("/", Node::literal(1), Node::literal(0));
    let out = fold(&expr);
    assert!(Arc::ptr_eq(&out, &expr), "expected the original node back");

    let modulo = Node::binary("%", Node::literal(7), Node::literal(0));
    assert!(Arc::ptr_eq(&fold(&modulo), &modulo));
}

#[test]
fn test_concatenation_stringifies_operands() {
    let out = fold(&Node::binary("&", Node::literal("x"), Node::literal(5)));
    assert_eq!(out, Node::literal("x5"));

    let out = fold(&Node::binary("&", Node::literal(true), Node::literal(LiteralValue::Null)));
    assert_eq!(out, Node::literal("truenull"));
}

#[test]
fn test_arithmetic_and_comparison_table() {
    assert_eq!(fold_binary("-", &num(5.0), &num(8.0)), Some(num(-3.0)));
    assert_eq!(fold_binary("*", &num(2.5), &num(4.0)), Some(num(10.0)));
    assert_eq!(fold_binary("/", &num(9.0), &num(2.0)), Some(num(4.5)));
    assert_eq!(fold_binary("%", &num(-7.0), &num(3.0)), Some(num(-1.0)));
    assert_eq!(fold_binary("<", &num(1.0), &num(2.0)), Some(LiteralValue::Bool(true)));
    assert_eq!(fold_binary(">=", &num(1.0), &num(2.0)), Some(LiteralValue::Bool(false)));
    assert_eq!(fold_binary("<=", &num(2.0), &num(2.0)), Some(LiteralValue::Bool(true)));
}

#[test]
fn test_numeric_operators_require_numbers() {
    assert_eq!(fold_binary("+", &LiteralValue::from("1"), &num(2.0)), None);
    assert_eq!(fold_binary("<", &LiteralValue::Bool(true), &num(2.0)), None);
}

#[test]
fn test_logical_operators_return_operands() {
    let empty = LiteralValue::from("");
    let word = LiteralValue::from("yes");

    assert_eq!(fold_binary("and", &empty, &word), Some(empty.clone()));
    assert_eq!(fold_binary("&&", &word, &num(0.0)), Some(num(0.0)));
    assert_eq!(fold_binary("or", &empty, &word), Some(word.clone()));
    assert_eq!(fold_binary("||", &num(3.0), &word), Some(num(3.0)));
}

#[test]
fn test_equality_is_strict() {
    assert_eq!(
        fold_binary("is", &num(5.0), &LiteralValue::from("5")),
        Some(LiteralValue::Bool(false))
    );
    assert_eq!(
        fold_binary("==", &num(5.0), &num(5.0)),
        Some(LiteralValue::Bool(true))
    );
    assert_eq!(
        fold_binary("is not", &num(5.0), &LiteralValue::from("5")),
        Some(LiteralValue::Bool(true))
    );
    assert_eq!(
        fold_binary("!=", &LiteralValue::Null, &LiteralValue::Null),
        Some(LiteralValue::Bool(false))
    );
}

#[test]
fn test_unknown_operator_is_left_alone() {
    assert_eq!(fold_binary("matches", &num(1.0), &num(1.0)), None);
    assert_eq!(fold_binary("**", &num(2.0), &num(3.0)), None);
}

#[test]
fn test_folding_is_bottom_up() {
    // (1 + 2) * 3
    let expr = Node::binary(
        "*",
        Node::binary("+", Node::literal(1), Node::literal(2)),
        Node::literal(3),
    );
    assert_eq!(fold(&expr), Node::literal(9));
}

#[test]
fn test_partial_fold_keeps_folded_children() {
    // x + (2 * 3)
    let expr = Node::binary(
        "+",
        Node::identifier("x"),
        Node::binary("*", Node::literal(2), Node::literal(3)),
    );
    let out = fold(&expr);
    assert_eq!(
        out,
        Node::binary("+", Node::identifier("x"), Node::literal(6))
    );
}

#[test]
fn test_folds_inside_statements() {
    let tree = Node::event(
        "click",
        Default::default(),
        vec![Node::if_else(
            Node::binary(">", Node::literal(2), Node::literal(1)),
            vec![Node::command(
                "log",
                vec![Node::binary("&", Node::literal("n="), Node::literal(4))],
            )],
            None,
        )],
    );
    let out = fold(&tree);
    let expected = Node::event(
        "click",
        Default::default(),
        vec![Node::if_else(
            Node::literal(true),
            vec![Node::command("log", vec![Node::literal("n=4")])],
            None,
        )],
    );
    assert_eq!(out, expected);
}

#[test]
fn test_idempotent_without_literal_pairs() {
    let tree = Node::event(
        "click",
        Default::default(),
        vec![Node::command(
            "log",
            vec![Node::binary("+", Node::identifier("x"), Node::literal(1))],
        )],
    );
    let once = fold(&tree);
    assert!(Arc::ptr_eq(&once, &tree));
    let twice = fold(&once);
    assert!(Arc::ptr_eq(&twice, &tree));
}

#[test]
fn test_should_run_needs_pure_expressions() {
    let plain = Node::command("log", vec![Node::identifier("x")]);
    assert!(!ConstantFolding.should_run(&analyze(&plain)));

    let foldable = Node::command("log", vec![Node::binary("+", Node::literal(1), Node::literal(1))]);
    assert!(ConstantFolding.should_run(&analyze(&foldable)));
}
