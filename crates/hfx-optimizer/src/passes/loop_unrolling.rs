//! Loop Unrolling
//!
//! Replaces a small fixed-count `repeat` with a flat `sequence` holding one
//! independent copy of the body per iteration:
//!
//! ```text
//! repeat 3 times             add .active
//!     add .active      =>    add .active
//! end                        add .active
//! ```
//!
//! A loop is unrolled only when all of the following hold:
//! - the count is a numeric literal and a whole number no greater than
//!   [`MAX_UNROLL_COUNT`]
//! - the body has at most [`MAX_UNROLL_BODY_LEN`] top-level statements
//! - nothing in the body reads the loop index (`index` or `:index`)

use std::sync::Arc;

use hfx_ast::visit::any_in_subtree;
use hfx_ast::{
    AnalysisResult, ChildRewriter, Node, NodeRef, RepeatNode, SequenceNode, deep_clone,
    rewrite_children,
};

use crate::pipeline::OptimizationPass;

/// Largest iteration count that is unrolled.
pub const MAX_UNROLL_COUNT: usize = 5;

/// Largest number of top-level body statements that is unrolled.
pub const MAX_UNROLL_BODY_LEN: usize = 3;

pub struct LoopUnrolling;

impl OptimizationPass for LoopUnrolling {
    fn name(&self) -> &'static str {
        "loop-unrolling"
    }

    fn should_run(&self, analysis: &AnalysisResult) -> bool {
        analysis.control_flow.has_loops
    }

    fn transform(&self, ast: &NodeRef, _analysis: &AnalysisResult) -> NodeRef {
        Unroller.rewrite_node(ast)
    }
}

struct Unroller;

impl ChildRewriter for Unroller {
    fn rewrite_node(&mut self, node: &NodeRef) -> NodeRef {
        let node = rewrite_children(node, self);
        let Node::Repeat(repeat) = node.as_ref() else {
            return node;
        };
        let Some(count) = unroll_count(repeat) else {
            return node;
        };

        let commands = (0..count)
            .flat_map(|_| repeat.body.iter().map(deep_clone))
            .collect();
        Arc::new(Node::Sequence(SequenceNode {
            commands,
            unrolled: true,
        }))
    }
}

/// Iteration count if `repeat` qualifies for unrolling.
fn unroll_count(repeat: &RepeatNode) -> Option<usize> {
    let count = repeat.count.as_ref()?.as_literal()?.as_number()?;

    if !(count >= 0.0 && count.fract() == 0.0 && count <= MAX_UNROLL_COUNT as f64) {
        tracing::trace!(count, "[loop-unrolling] count out of range");
        return None;
    }
    if repeat.body.len() > MAX_UNROLL_BODY_LEN {
        tracing::trace!(
            statements = repeat.body.len(),
            "[loop-unrolling] body too large"
        );
        return None;
    }
    if repeat
        .body
        .iter()
        .any(|stmt| any_in_subtree(stmt, &|n| n.is_loop_index_ref()))
    {
        tracing::trace!("[loop-unrolling] body reads the loop index");
        return None;
    }

    Some(count as usize)
}

#[cfg(test)]
#[path = "../../tests/loop_unrolling_tests.rs"]
mod tests;
