//! Child-slot schema and copy-on-write rewriting.
//!
//! Every node kind declares its child slots here, once, in one of three
//! shapes:
//!
//! | Slot shape | Fields |
//! |------------|--------|
//! | single     | `condition`, `left`, `right`, `operand`, `object`, `collection`, `count`, `target` |
//! | block      | `body`, `thenBranch`, `elseBranch` (statement sequences) |
//! | list       | `args`, `commands` (node lists that are not statement sequences) |
//!
//! Rewrites implement [`ChildRewriter`] and call [`rewrite_children`] to
//! rebuild a node. When no child changes, the original `Arc` is returned, so
//! untouched subtrees stay shared between the input and output trees.
//!
//! Adding a node kind means adding it to the matches below; there is no
//! catch-all arm, so a forgotten slot is a compile error.

use std::sync::Arc;

use crate::node::{
    BinaryNode, CommandNode, EventHandlerNode, ForEachNode, IfNode, MemberNode, Node, NodeRef,
    RepeatNode, SequenceNode, UnaryNode, WhileNode,
};

/// Callbacks used by [`rewrite_children`] for each slot shape.
pub trait ChildRewriter {
    fn rewrite_node(&mut self, node: &NodeRef) -> NodeRef;

    /// Rewrite a statement sequence (`body`, `thenBranch`, `elseBranch`).
    fn rewrite_block(&mut self, statements: &[NodeRef]) -> Vec<NodeRef> {
        statements.iter().map(|stmt| self.rewrite_node(stmt)).collect()
    }

    /// Rewrite a node list that is not a statement sequence (`args`, `commands`).
    fn rewrite_list(&mut self, items: &[NodeRef]) -> Vec<NodeRef> {
        items.iter().map(|item| self.rewrite_node(item)).collect()
    }
}

struct Rebuild<'r, R: ChildRewriter + ?Sized> {
    rewriter: &'r mut R,
    changed: bool,
}

impl<R: ChildRewriter + ?Sized> Rebuild<'_, R> {
    fn single(&mut self, child: &NodeRef) -> NodeRef {
        let next = self.rewriter.rewrite_node(child);
        if !Arc::ptr_eq(&next, child) {
            self.changed = true;
        }
        next
    }

    fn optional(&mut self, child: &Option<NodeRef>) -> Option<NodeRef> {
        child.as_ref().map(|c| self.single(c))
    }

    fn block(&mut self, statements: &[NodeRef]) -> Vec<NodeRef> {
        let next = self.rewriter.rewrite_block(statements);
        if !same_refs(&next, statements) {
            self.changed = true;
        }
        next
    }

    fn list(&mut self, items: &[NodeRef]) -> Vec<NodeRef> {
        let next = self.rewriter.rewrite_list(items);
        if !same_refs(&next, items) {
            self.changed = true;
        }
        next
    }
}

fn same_refs(a: &[NodeRef], b: &[NodeRef]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
}

/// Rebuild `node` with every child slot passed through `rewriter`.
///
/// Returns `node` itself (same allocation) when no slot changed.
pub fn rewrite_children<R: ChildRewriter + ?Sized>(node: &NodeRef, rewriter: &mut R) -> NodeRef {
    let mut rb = Rebuild {
        rewriter,
        changed: false,
    };

    let rebuilt = match node.as_ref() {
        Node::Command(cmd) => Node::Command(CommandNode {
            name: cmd.name.clone(),
            args: rb.list(&cmd.args),
            target: rb.optional(&cmd.target),
        }),
        Node::If(stmt) => Node::If(IfNode {
            condition: rb.single(&stmt.condition),
            then_branch: rb.block(&stmt.then_branch),
            else_branch: stmt.else_branch.as_ref().map(|branch| rb.block(branch)),
        }),
        Node::Repeat(stmt) => Node::Repeat(RepeatNode {
            count: rb.optional(&stmt.count),
            body: rb.block(&stmt.body),
        }),
        Node::ForEach(stmt) => Node::ForEach(ForEachNode {
            item_name: stmt.item_name.clone(),
            collection: rb.single(&stmt.collection),
            body: rb.block(&stmt.body),
        }),
        Node::While(stmt) => Node::While(WhileNode {
            condition: rb.single(&stmt.condition),
            body: rb.block(&stmt.body),
        }),
        Node::Event(handler) => Node::Event(EventHandlerNode {
            event: handler.event.clone(),
            modifiers: handler.modifiers.clone(),
            body: rb.block(&handler.body),
        }),
        Node::Binary(expr) => Node::Binary(BinaryNode {
            operator: expr.operator.clone(),
            left: rb.single(&expr.left),
            right: rb.single(&expr.right),
        }),
        Node::Unary(expr) => Node::Unary(UnaryNode {
            operator: expr.operator.clone(),
            operand: rb.single(&expr.operand),
        }),
        Node::Member(expr) => Node::Member(MemberNode {
            object: rb.single(&expr.object),
            property: expr.property.clone(),
        }),
        Node::Sequence(seq) => Node::Sequence(SequenceNode {
            commands: rb.list(&seq.commands),
            unrolled: seq.unrolled,
        }),
        Node::Literal(_)
        | Node::Selector(_)
        | Node::Identifier(_)
        | Node::Variable(_)
        | Node::Unknown => return Arc::clone(node),
    };

    if rb.changed {
        Arc::new(rebuilt)
    } else {
        Arc::clone(node)
    }
}

/// Visit the direct children of `node` in slot order.
pub fn for_each_child(node: &Node, f: &mut dyn FnMut(&NodeRef)) {
    fn all(nodes: &[NodeRef], f: &mut dyn FnMut(&NodeRef)) {
        for n in nodes {
            f(n);
        }
    }

    match node {
        Node::Command(cmd) => {
            all(&cmd.args, f);
            if let Some(target) = &cmd.target {
                f(target);
            }
        }
        Node::If(stmt) => {
            f(&stmt.condition);
            all(&stmt.then_branch, f);
            if let Some(branch) = &stmt.else_branch {
                all(branch, f);
            }
        }
        Node::Repeat(stmt) => {
            if let Some(count) = &stmt.count {
                f(count);
            }
            all(&stmt.body, f);
        }
        Node::ForEach(stmt) => {
            f(&stmt.collection);
            all(&stmt.body, f);
        }
        Node::While(stmt) => {
            f(&stmt.condition);
            all(&stmt.body, f);
        }
        Node::Event(handler) => all(&handler.body, f),
        Node::Binary(expr) => {
            f(&expr.left);
            f(&expr.right);
        }
        Node::Unary(expr) => f(&expr.operand),
        Node::Member(expr) => f(&expr.object),
        Node::Sequence(seq) => all(&seq.commands, f),
        Node::Literal(_)
        | Node::Selector(_)
        | Node::Identifier(_)
        | Node::Variable(_)
        | Node::Unknown => {}
    }
}

/// True if `pred` holds for `node` or any node beneath it.
pub fn any_in_subtree(node: &NodeRef, pred: &dyn Fn(&Node) -> bool) -> bool {
    if pred(node) {
        return true;
    }
    let mut found = false;
    for_each_child(node, &mut |child| {
        if !found && any_in_subtree(child, pred) {
            found = true;
        }
    });
    found
}

struct DeepCloner;

impl ChildRewriter for DeepCloner {
    fn rewrite_node(&mut self, node: &NodeRef) -> NodeRef {
        deep_clone(node)
    }
}

/// Copy `node` and every descendant into fresh allocations.
///
/// The result shares no `Arc` with the input, so each copy can be taken
/// apart with `Arc::get_mut` independently.
pub fn deep_clone(node: &NodeRef) -> NodeRef {
    let rebuilt = rewrite_children(node, &mut DeepCloner);
    if Arc::ptr_eq(&rebuilt, node) {
        // Leaf, or a node whose slots are all empty.
        Arc::new(node.as_ref().clone())
    } else {
        rebuilt
    }
}

#[cfg(test)]
#[path = "../tests/visit_tests.rs"]
mod tests;
