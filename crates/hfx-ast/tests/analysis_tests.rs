use super::*;
use crate::node::EventModifiers;

fn handler(modifiers: EventModifiers, body: Vec<NodeRef>) -> NodeRef {
    Node::event("click", modifiers, body)
}

#[test]
fn test_empty_handler_has_no_facts() {
    let result = analyze(&handler(EventModifiers::default(), vec![]));
    assert_eq!(result, AnalysisResult::default());
}

#[test]
fn test_control_flow_flags() {
    let result = analyze(&handler(
        EventModifiers::default(),
        vec![
            Node::command("wait", vec![Node::literal(100)]),
            Node::repeat(Some(Node::literal(2)), vec![Node::command("halt", vec![])]),
        ],
    ));
    assert!(result.control_flow.has_async);
    assert!(result.control_flow.can_throw);
    assert!(result.control_flow.has_loops);
}

#[test]
fn test_plain_commands_cannot_throw() {
    let result = analyze(&handler(
        EventModifiers::default(),
        vec![Node::command("log", vec![Node::literal("x")])],
    ));
    assert!(!result.control_flow.can_throw);
    assert!(!result.control_flow.has_async);
}

#[test]
fn test_literal_binaries_are_reported_pure() {
    let folded = Node::binary("+", Node::literal(1), Node::literal(2));
    let dynamic = Node::binary("+", Node::identifier("x"), Node::literal(2));
    let result = analyze(&handler(
        EventModifiers::default(),
        vec![Node::command("log", vec![folded.clone(), dynamic])],
    ));
    assert_eq!(result.expressions.pure, vec![folded]);
    assert!(result.has_pure_expressions());
}

#[test]
fn test_selector_usages_are_grouped_in_first_seen_order() {
    let result = analyze(&handler(
        EventModifiers::default(),
        vec![
            Node::command("add", vec![Node::selector(".b")]),
            Node::command("add", vec![Node::selector(".a")]),
            Node::command("remove", vec![Node::selector(".b")]),
            Node::command("toggle", vec![Node::selector("#item-${id}")]),
            Node::command("toggle", vec![Node::selector("#item-${id}")]),
        ],
    ));

    let selectors = &result.expressions.selectors;
    let names: Vec<&str> = selectors.iter().map(|s| s.selector.as_str()).collect();
    assert_eq!(names, vec![".b", ".a", "#item-${id}"]);
    assert_eq!(selectors[0].usages.len(), 2);
    assert!(selectors[0].is_cache_candidate());
    assert!(!selectors[1].is_cache_candidate(), "single use");
    assert!(!selectors[2].can_cache, "template selectors are dynamic");
    assert!(result.has_cacheable_selectors());
}

#[test]
fn test_modifier_helpers_are_listed_once() {
    let modifiers = EventModifiers {
        debounce: Some(200.0),
        throttle: Some(50.0),
        from: Some("li".to_string()),
        ..EventModifiers::default()
    };
    let result = analyze(&handler(modifiers, vec![]));
    assert_eq!(
        result.dependencies.runtime_helpers,
        vec!["debounce", "throttle", "delegate"]
    );
}

#[test]
fn test_analysis_round_trips_through_camel_case_json() {
    let json = r#"{
        "controlFlow": { "hasAsync": true, "canThrow": false, "hasLoops": true },
        "expressions": {
            "pure": [],
            "selectors": [{ "selector": ".x", "usages": [], "canCache": true }]
        },
        "dependencies": { "runtimeHelpers": ["debounce"] }
    }"#;
    let result: AnalysisResult = serde_json::from_str(json).expect("valid analysis");
    assert!(result.control_flow.has_async);
    assert!(result.control_flow.has_loops);
    assert!(result.expressions.selectors[0].can_cache);
    assert_eq!(result.dependencies.runtime_helpers, vec!["debounce"]);

    let partial: AnalysisResult =
        serde_json::from_str(r#"{"controlFlow":{"canThrow":true}}"#).expect("partial analysis");
    assert!(partial.control_flow.can_throw);
    assert!(partial.expressions.selectors.is_empty());
}
