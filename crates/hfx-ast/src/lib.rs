//! AST model for the hfx hyperscript compiler.
//!
//! This crate provides the types shared by every compilation stage:
//! - The closed node sum type (`Node`) and its shared handle (`NodeRef`)
//! - Literal values with JavaScript evaluation semantics (`LiteralValue`)
//! - The child-slot schema used by every tree rewrite (`visit`)
//! - Static analysis facts consumed by the optimizer and codegen (`analysis`)

// Node model
pub mod node;
pub use node::{
    BinaryNode, CommandNode, EventHandlerNode, EventModifiers, ForEachNode, IdentifierNode,
    IfNode, LiteralNode, MemberNode, Node, NodeRef, RepeatNode, SelectorNode, SequenceNode,
    UnaryNode, VariableNode, WhileNode,
};

// Literal values and JavaScript coercions
pub mod value;
pub use value::{LiteralValue, format_js_number};

// Child-slot schema and copy-on-write rewriting
pub mod visit;
pub use visit::{ChildRewriter, deep_clone, rewrite_children};

// Static analysis
pub mod analysis;
pub use analysis::{
    AnalysisResult, ControlFlowInfo, DependencyInfo, ExpressionInfo, SelectorInfo, analyze,
};
