use super::*;
use hfx_ast::{CommandNode, analyze};

fn add_active() -> NodeRef {
    Node::command("add", vec![Node::selector(".active")])
}

fn unroll(tree: &NodeRef) -> NodeRef {
    LoopUnrolling.transform(tree, &AnalysisResult::default())
}

#[test]
fn test_small_repeat_becomes_sequence() {
    let tree = Node::repeat(Some(Node::literal(3)), vec![add_active()]);
    let out = unroll(&tree);

    let Node::Sequence(seq) = out.as_ref() else {
        panic!("expected sequence, got {}", out.kind());
    };
    assert!(seq.unrolled);
    assert_eq!(seq.commands.len(), 3);
    for command in &seq.commands {
        assert_eq!(command, &add_active());
    }
}

#[test]
fn test_unrolled_copies_are_independent() {
    let body = add_active();
    let tree = Node::repeat(Some(Node::literal(3)), vec![Arc::clone(&body)]);
    let out = unroll(&tree);
    drop(tree);

    let Node::Sequence(mut seq) = Arc::unwrap_or_clone(out) else {
        panic!("expected sequence");
    };
    assert!(!Arc::ptr_eq(&seq.commands[0], &seq.commands[1]));
    assert!(!Arc::ptr_eq(&seq.commands[0], &body));

    let Some(Node::Command(first)) = Arc::get_mut(&mut seq.commands[0]) else {
        panic!("first copy should be uniquely owned");
    };
    first.name = "remove".to_string();

    let Node::Command(CommandNode { name, .. }) = seq.commands[1].as_ref() else {
        panic!("expected command");
    };
    assert_eq!(name, "add");
    assert_eq!(body, add_active());
}

#[test]
fn test_count_above_ceiling_is_not_unrolled() {
    let tree = Node::repeat(Some(Node::literal(6)), vec![add_active()]);
    assert!(Arc::ptr_eq(&unroll(&tree), &tree));

    let at_ceiling = Node::repeat(Some(Node::literal(5)), vec![add_active()]);
    assert!(matches!(unroll(&at_ceiling).as_ref(), Node::Sequence(_)));
}

#[test]
fn test_index_reference_blocks_unrolling() {
    for name in ["index", ":index"] {
        let tree = Node::repeat(
            Some(Node::literal(2)),
            vec![Node::command(
                "log",
                vec![Node::binary("+", Node::literal("#"), Node::variable(name))],
            )],
        );
        assert!(
            Arc::ptr_eq(&unroll(&tree), &tree),
            "`{name}` reference must keep the loop"
        );
    }
}

#[test]
fn test_large_body_is_not_unrolled() {
    let tree = Node::repeat(
        Some(Node::literal(2)),
        vec![add_active(), add_active(), add_active(), add_active()],
    );
    assert!(Arc::ptr_eq(&unroll(&tree), &tree));
}

#[test]
fn test_non_literal_or_fractional_count_is_not_unrolled() {
    let dynamic = Node::repeat(Some(Node::identifier("n")), vec![add_active()]);
    assert!(Arc::ptr_eq(&unroll(&dynamic), &dynamic));

    let forever = Node::repeat(None, vec![add_active()]);
    assert!(Arc::ptr_eq(&unroll(&forever), &forever));

    let fractional = Node::repeat(Some(Node::literal(2.5)), vec![add_active()]);
    assert!(Arc::ptr_eq(&unroll(&fractional), &fractional));

    let text = Node::repeat(Some(Node::literal("3")), vec![add_active()]);
    assert!(Arc::ptr_eq(&unroll(&text), &text));
}

#[test]
fn test_nested_repeats_unroll_inside_out() {
    let inner = Node::repeat(Some(Node::literal(2)), vec![add_active()]);
    let outer = Node::repeat(Some(Node::literal(2)), vec![inner]);
    let out = unroll(&outer);

    let Node::Sequence(seq) = out.as_ref() else {
        panic!("expected outer sequence");
    };
    assert_eq!(seq.commands.len(), 2);
    for copy in &seq.commands {
        let Node::Sequence(inner) = copy.as_ref() else {
            panic!("expected inner sequence");
        };
        assert_eq!(inner.commands.len(), 2);
    }
}

#[test]
fn test_zero_count_yields_empty_sequence() {
    let tree = Node::repeat(Some(Node::literal(0)), vec![add_active()]);
    let Node::Sequence(seq) = unroll(&tree).as_ref().clone() else {
        panic!("expected sequence");
    };
    assert!(seq.commands.is_empty());
}

#[test]
fn test_should_run_requires_loops() {
    assert!(!LoopUnrolling.should_run(&analyze(&add_active())));
    let tree = Node::repeat(Some(Node::literal(2)), vec![add_active()]);
    assert!(LoopUnrolling.should_run(&analyze(&tree)));
}
