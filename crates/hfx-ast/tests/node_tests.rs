use super::*;

#[test]
fn test_decode_event_handler_from_json() {
    let json = r#"{
        "type": "event",
        "event": "click",
        "modifiers": { "once": true, "debounce": 300, "from": ".item" },
        "body": [
            { "type": "command", "name": "add", "args": [{ "type": "selector", "value": ".active" }] },
            { "type": "command", "name": "halt" }
        ]
    }"#;

    let node: Node = serde_json::from_str(json).expect("valid event node");
    let Node::Event(handler) = node else {
        panic!("expected event node");
    };
    assert_eq!(handler.event, "click");
    assert!(handler.modifiers.once);
    assert!(!handler.modifiers.capture);
    assert_eq!(handler.modifiers.debounce_ms(), Some(300.0));
    assert_eq!(handler.modifiers.delegate_selector(), Some(".item"));
    assert_eq!(handler.body.len(), 2);
    assert!(handler.body[1].is_terminator());
}

#[test]
fn test_absent_modifiers_and_body_default_to_empty() {
    let node: Node = serde_json::from_str(r#"{"type":"event","event":"load"}"#)
        .expect("event without modifiers");
    let Node::Event(handler) = node else {
        panic!("expected event node");
    };
    assert_eq!(handler.modifiers, EventModifiers::default());
    assert!(handler.body.is_empty());
}

#[test]
fn test_unknown_node_kind_decodes_to_unknown() {
    let node: Node = serde_json::from_str(r#"{"type":"behaviorInstall","name":"Draggable"}"#)
        .expect("unknown kinds are tolerated");
    assert_eq!(node, Node::Unknown);
    assert_eq!(node.kind(), "unknown");
}

#[test]
fn test_foreach_tag_and_then_branch_field_names() {
    let json = r#"{
        "type": "foreach",
        "itemName": "x",
        "collection": { "type": "selector", "value": "li" },
        "body": [{
            "type": "if",
            "condition": { "type": "literal", "value": true },
            "thenBranch": [{ "type": "command", "name": "log" }]
        }]
    }"#;
    let node: Node = serde_json::from_str(json).expect("valid foreach node");
    let Node::ForEach(stmt) = node else {
        panic!("expected foreach node");
    };
    assert_eq!(stmt.item_name, "x");
    let Node::If(branch) = stmt.body[0].as_ref() else {
        panic!("expected if statement");
    };
    assert_eq!(branch.then_branch.len(), 1);
    assert!(branch.else_branch.is_none());
}

#[test]
fn test_annotations_serialize_with_underscore_names() {
    let node = Node::Selector(SelectorNode {
        value: ".a".to_string(),
        cache_key: Some("_sel__a".to_string()),
    });
    let json = serde_json::to_value(&node).expect("serializable");
    assert_eq!(json["type"], "selector");
    assert_eq!(json["_cached"], true);
    assert_eq!(json["_cacheKey"], "_sel__a");

    let plain = serde_json::to_value(Node::selector(".a").as_ref()).expect("serializable");
    assert!(plain.get("_cached").is_none());
    assert!(plain.get("_cacheKey").is_none());

    let decoded: Node = serde_json::from_value(json).expect("round trip");
    assert_eq!(decoded, node);
}

#[test]
fn test_zero_rate_limits_read_as_unset() {
    let modifiers = EventModifiers {
        debounce: Some(0.0),
        throttle: Some(0.0),
        from: Some(String::new()),
        ..EventModifiers::default()
    };
    assert_eq!(modifiers.debounce_ms(), None);
    assert_eq!(modifiers.throttle_ms(), None);
    assert_eq!(modifiers.delegate_selector(), None);
}

#[test]
fn test_loop_index_references() {
    assert!(Node::identifier("index").is_loop_index_ref());
    assert!(Node::variable(":index").is_loop_index_ref());
    assert!(!Node::identifier("indexes").is_loop_index_ref());
    assert!(!Node::literal("index").is_loop_index_ref());
}

#[test]
fn test_fractional_and_negative_rate_limits() {
    let node: Node = serde_json::from_str(
        r#"{"type": "event", "event": "input", "modifiers": {"debounce": 250.5, "throttle": -10}}"#,
    )
    .expect("any JSON number is accepted");
    let Node::Event(handler) = node else {
        panic!("expected event node");
    };
    assert_eq!(handler.modifiers.debounce_ms(), Some(250.5));
    assert_eq!(handler.modifiers.throttle_ms(), None, "negative reads as unset");

    let nan = EventModifiers {
        debounce: Some(f64::NAN),
        ..EventModifiers::default()
    };
    assert_eq!(nan.debounce_ms(), None);
}
