//! Hyperscript AST nodes.
//!
//! The tree is produced upstream by the parser and arrives as JSON with a
//! `type` discriminator. Children are held behind `Arc` so that rewrites can
//! share every subtree they do not touch.
//!
//! Compiler annotations (`_cached`/`_cacheKey`, `_unrolled`) are explicit
//! fields on the node kinds they apply to. They are consumed by codegen and
//! are never written into generated JavaScript verbatim.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::value::LiteralValue;

/// Shared handle to an immutable node.
pub type NodeRef = Arc<Node>;

/// Commands after which nothing else in the same statement list can run.
pub const TERMINATING_COMMANDS: &[&str] = &["halt", "exit", "return", "throw"];

/// Identifier spellings that refer to the implicit loop index.
pub const LOOP_INDEX_NAMES: &[&str] = &["index", ":index"];

/// A hyperscript AST node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Command(CommandNode),
    If(IfNode),
    Repeat(RepeatNode),
    #[serde(rename = "foreach")]
    ForEach(ForEachNode),
    While(WhileNode),
    Event(EventHandlerNode),
    Literal(LiteralNode),
    Binary(BinaryNode),
    Unary(UnaryNode),
    Selector(SelectorNode),
    Identifier(IdentifierNode),
    Variable(VariableNode),
    Member(MemberNode),
    Sequence(SequenceNode),
    /// Any node kind this compiler does not model. Codegen skips it.
    #[serde(other)]
    Unknown,
}

/// `add .active to me`, `log x`, `halt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<NodeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<NodeRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfNode {
    pub condition: NodeRef,
    #[serde(default)]
    pub then_branch: Vec<NodeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_branch: Option<Vec<NodeRef>>,
}

/// `repeat 3 times ... end`. A missing count means `repeat forever`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<NodeRef>,
    #[serde(default)]
    pub body: Vec<NodeRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForEachNode {
    pub item_name: String,
    pub collection: NodeRef,
    #[serde(default)]
    pub body: Vec<NodeRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhileNode {
    pub condition: NodeRef,
    #[serde(default)]
    pub body: Vec<NodeRef>,
}

/// `on click[.modifiers] ... end`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventHandlerNode {
    pub event: String,
    #[serde(default)]
    pub modifiers: EventModifiers,
    #[serde(default)]
    pub body: Vec<NodeRef>,
}

/// Event handler modifiers. Absent fields read as unset.
///
/// `debounce`/`throttle` are milliseconds. Zero, negative and NaN values
/// behave as unset.
/// `from` is a CSS selector for delegated listeners.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventModifiers {
    #[serde(skip_serializing_if = "is_false")]
    pub once: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub passive: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub capture: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub prevent: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub stop: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throttle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl EventModifiers {
    pub fn debounce_ms(&self) -> Option<f64> {
        self.debounce.filter(|ms| *ms > 0.0)
    }

    pub fn throttle_ms(&self) -> Option<f64> {
        self.throttle.filter(|ms| *ms > 0.0)
    }

    /// Delegation selector, ignoring an empty string.
    pub fn delegate_selector(&self) -> Option<&str> {
        self.from.as_deref().filter(|sel| !sel.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralNode {
    #[serde(default)]
    pub value: LiteralValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryNode {
    pub operator: String,
    pub left: NodeRef,
    pub right: NodeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryNode {
    pub operator: String,
    pub operand: NodeRef,
}

/// A CSS selector reference such as `.active` or `#menu`.
///
/// On the wire a cached selector carries `"_cached": true` next to its
/// `_cacheKey`; in memory the key alone marks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SelectorWire", into = "SelectorWire")]
pub struct SelectorNode {
    pub value: String,
    /// Set by selector caching: name of the hoisted query result.
    pub cache_key: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct SelectorWire {
    value: String,
    #[serde(rename = "_cached", default, skip_serializing_if = "is_false")]
    cached: bool,
    #[serde(rename = "_cacheKey", default, skip_serializing_if = "Option::is_none")]
    cache_key: Option<String>,
}

impl From<SelectorWire> for SelectorNode {
    fn from(wire: SelectorWire) -> Self {
        SelectorNode {
            value: wire.value,
            cache_key: wire.cache_key,
        }
    }
}

impl From<SelectorNode> for SelectorWire {
    fn from(node: SelectorNode) -> Self {
        SelectorWire {
            cached: node.cache_key.is_some(),
            value: node.value,
            cache_key: node.cache_key,
        }
    }
}

impl SelectorNode {
    pub fn is_cached(&self) -> bool {
        self.cache_key.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierNode {
    pub name: String,
}

/// Local (`:name`) or element-scoped variable reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableNode {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberNode {
    pub object: NodeRef,
    pub property: String,
}

/// A flat statement list. Loop unrolling produces these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceNode {
    #[serde(default)]
    pub commands: Vec<NodeRef>,
    #[serde(rename = "_unrolled", default, skip_serializing_if = "is_false")]
    pub unrolled: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Node {
    /// The `type` discriminator as it appears in JSON.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Command(_) => "command",
            Node::If(_) => "if",
            Node::Repeat(_) => "repeat",
            Node::ForEach(_) => "foreach",
            Node::While(_) => "while",
            Node::Event(_) => "event",
            Node::Literal(_) => "literal",
            Node::Binary(_) => "binary",
            Node::Unary(_) => "unary",
            Node::Selector(_) => "selector",
            Node::Identifier(_) => "identifier",
            Node::Variable(_) => "variable",
            Node::Member(_) => "member",
            Node::Sequence(_) => "sequence",
            Node::Unknown => "unknown",
        }
    }

    pub fn as_command(&self) -> Option<&CommandNode> {
        match self {
            Node::Command(cmd) => Some(cmd),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&LiteralValue> {
        match self {
            Node::Literal(lit) => Some(&lit.value),
            _ => None,
        }
    }

    /// True for `halt`, `exit`, `return` and `throw` commands.
    pub fn is_terminator(&self) -> bool {
        self.as_command()
            .is_some_and(|cmd| TERMINATING_COMMANDS.contains(&cmd.name.as_str()))
    }

    /// True for an identifier or variable naming the implicit loop index.
    pub fn is_loop_index_ref(&self) -> bool {
        match self {
            Node::Identifier(IdentifierNode { name }) | Node::Variable(VariableNode { name }) => {
                LOOP_INDEX_NAMES.contains(&name.as_str())
            }
            _ => false,
        }
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn command(name: impl Into<String>, args: Vec<NodeRef>) -> NodeRef {
        Arc::new(Node::Command(CommandNode {
            name: name.into(),
            args,
            target: None,
        }))
    }

    pub fn command_on(name: impl Into<String>, args: Vec<NodeRef>, target: NodeRef) -> NodeRef {
        Arc::new(Node::Command(CommandNode {
            name: name.into(),
            args,
            target: Some(target),
        }))
    }

    pub fn literal(value: impl Into<LiteralValue>) -> NodeRef {
        Arc::new(Node::Literal(LiteralNode {
            value: value.into(),
        }))
    }

    pub fn binary(operator: impl Into<String>, left: NodeRef, right: NodeRef) -> NodeRef {
        Arc::new(Node::Binary(BinaryNode {
            operator: operator.into(),
            left,
            right,
        }))
    }

    pub fn selector(value: impl Into<String>) -> NodeRef {
        Arc::new(Node::Selector(SelectorNode {
            value: value.into(),
            cache_key: None,
        }))
    }

    pub fn identifier(name: impl Into<String>) -> NodeRef {
        Arc::new(Node::Identifier(IdentifierNode { name: name.into() }))
    }

    pub fn variable(name: impl Into<String>) -> NodeRef {
        Arc::new(Node::Variable(VariableNode { name: name.into() }))
    }

    pub fn if_else(
        condition: NodeRef,
        then_branch: Vec<NodeRef>,
        else_branch: Option<Vec<NodeRef>>,
    ) -> NodeRef {
        Arc::new(Node::If(IfNode {
            condition,
            then_branch,
            else_branch,
        }))
    }

    pub fn repeat(count: Option<NodeRef>, body: Vec<NodeRef>) -> NodeRef {
        Arc::new(Node::Repeat(RepeatNode { count, body }))
    }

    pub fn while_loop(condition: NodeRef, body: Vec<NodeRef>) -> NodeRef {
        Arc::new(Node::While(WhileNode { condition, body }))
    }

    pub fn for_each(item_name: impl Into<String>, collection: NodeRef, body: Vec<NodeRef>) -> NodeRef {
        Arc::new(Node::ForEach(ForEachNode {
            item_name: item_name.into(),
            collection,
            body,
        }))
    }

    pub fn event(event: impl Into<String>, modifiers: EventModifiers, body: Vec<NodeRef>) -> NodeRef {
        Arc::new(Node::Event(EventHandlerNode {
            event: event.into(),
            modifiers,
            body,
        }))
    }
}

#[cfg(test)]
#[path = "../tests/node_tests.rs"]
mod tests;
