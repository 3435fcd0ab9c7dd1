//! Dead Code Elimination
//!
//! Drops statements that follow a terminator (`halt`, `exit`, `return`,
//! `throw`) in the same statement sequence:
//!
//! ```text
//! log "a"            log "a"
//! halt          =>   halt
//! log "b"
//! ```
//!
//! Only statement sequences (`body`, `thenBranch`, `elseBranch`) are
//! truncated. Nested sequences are processed before the enclosing one, and
//! a terminator inside a branch does not end the enclosing sequence.

use hfx_ast::{AnalysisResult, ChildRewriter, NodeRef, rewrite_children};

use crate::pipeline::OptimizationPass;

pub struct DeadCodeElimination;

impl OptimizationPass for DeadCodeElimination {
    fn name(&self) -> &'static str {
        "dead-code-elimination"
    }

    fn should_run(&self, analysis: &AnalysisResult) -> bool {
        analysis.control_flow.can_throw
    }

    fn transform(&self, ast: &NodeRef, _analysis: &AnalysisResult) -> NodeRef {
        Eliminator.rewrite_node(ast)
    }
}

struct Eliminator;

impl ChildRewriter for Eliminator {
    fn rewrite_node(&mut self, node: &NodeRef) -> NodeRef {
        rewrite_children(node, self)
    }

    fn rewrite_block(&mut self, statements: &[NodeRef]) -> Vec<NodeRef> {
        let mut live = Vec::with_capacity(statements.len());
        for stmt in statements {
            let stmt = self.rewrite_node(stmt);
            let terminates = stmt.is_terminator();
            live.push(stmt);
            if terminates {
                break;
            }
        }
        if live.len() < statements.len() {
            tracing::trace!(
                dropped = statements.len() - live.len(),
                "[dead-code-elimination] truncated after terminator"
            );
        }
        live
    }

    // Argument lists are expressions, not statements.
    fn rewrite_list(&mut self, items: &[NodeRef]) -> Vec<NodeRef> {
        items.to_vec()
    }
}

#[cfg(test)]
#[path = "../../tests/dead_code_tests.rs"]
mod tests;
