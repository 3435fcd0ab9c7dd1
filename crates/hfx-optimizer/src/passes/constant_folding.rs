//! Constant Folding
//!
//! Evaluates `binary` nodes whose operands are both literals:
//!
//! ```text
//! log 5 + 3          =>  log 8
//! log "x" & 5        =>  log "x5"
//! log 1 / 0          =>  unchanged
//! ```
//!
//! Folding is bottom-up, so `(1 + 2) * 3` folds the inner node first and
//! then the outer one. Operators and preconditions:
//!
//! | Operator | Precondition | Result |
//! |----------|--------------|--------|
//! | `+ - * / % < > <= >=` | both numbers; `/` `%` need a non-zero divisor | number or boolean |
//! | `&` | none | string concatenation |
//! | `and` `&&` / `or` `\|\|` | none | one of the operands, by JS truthiness |
//! | `is` `==` / `is not` `!=` | none | strict equality (`===`) or its negation |

use std::sync::Arc;

use hfx_ast::{
    AnalysisResult, ChildRewriter, LiteralNode, LiteralValue, Node, NodeRef, rewrite_children,
};

use crate::pipeline::{OptimizationLevel, OptimizationPass};

pub struct ConstantFolding;

impl OptimizationPass for ConstantFolding {
    fn name(&self) -> &'static str {
        "constant-folding"
    }

    fn min_level(&self) -> OptimizationLevel {
        OptimizationLevel::Basic
    }

    fn should_run(&self, analysis: &AnalysisResult) -> bool {
        analysis.has_pure_expressions()
    }

    fn transform(&self, ast: &NodeRef, _analysis: &AnalysisResult) -> NodeRef {
        Folder.rewrite_node(ast)
    }
}

struct Folder;

impl ChildRewriter for Folder {
    fn rewrite_node(&mut self, node: &NodeRef) -> NodeRef {
        let node = rewrite_children(node, self);
        fold_node(&node).unwrap_or(node)
    }
}

/// Fold `node` if it is a binary expression over two literals.
fn fold_node(node: &NodeRef) -> Option<NodeRef> {
    let Node::Binary(expr) = node.as_ref() else {
        return None;
    };
    let left = expr.left.as_literal()?;
    let right = expr.right.as_literal()?;

    let Some(value) = fold_binary(&expr.operator, left, right) else {
        tracing::trace!(operator = %expr.operator, "[constant-folding] left unfolded");
        return None;
    };
    Some(Arc::new(Node::Literal(LiteralNode { value })))
}

/// Evaluate `left <operator> right`, or `None` when the operator is unknown
/// or its precondition fails.
pub fn fold_binary(operator: &str, left: &LiteralValue, right: &LiteralValue) -> Option<LiteralValue> {
    use LiteralValue::{Bool, Number};

    match operator {
        "+" | "-" | "*" | "/" | "%" | "<" | ">" | "<=" | ">=" => {
            let l = left.as_number()?;
            let r = right.as_number()?;
            let value = match operator {
                "+" => Number(l + r),
                "-" => Number(l - r),
                "*" => Number(l * r),
                "/" if r != 0.0 => Number(l / r),
                "%" if r != 0.0 => Number(l % r),
                "<" => Bool(l < r),
                ">" => Bool(l > r),
                "<=" => Bool(l <= r),
                ">=" => Bool(l >= r),
                _ => return None,
            };
            Some(value)
        }
        "&" => Some(LiteralValue::String(format!(
            "{}{}",
            left.to_js_string(),
            right.to_js_string()
        ))),
        "and" | "&&" => Some(if left.is_truthy() { right } else { left }.clone()),
        "or" | "||" => Some(if left.is_truthy() { left } else { right }.clone()),
        "is" | "==" => Some(Bool(left.strict_equals(right))),
        "is not" | "!=" => Some(Bool(!left.strict_equals(right))),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/constant_folding_tests.rs"]
mod tests;
