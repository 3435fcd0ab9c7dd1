//! Expression emission for `BasicStatementCodegen`.

use hfx_ast::{LiteralValue, Node, NodeRef, format_js_number};

use crate::context::CodegenContext;
use crate::literals::{is_identifier, js_string_literal};
use crate::runtime::{CONTEXT_VAR, EVENT_PARAM};

/// Loop counter declared by generated `repeat` loops.
pub(crate) const LOOP_INDEX_VAR: &str = "_index";

/// JavaScript for `node`, or `None` when it has no expression form here.
pub(crate) fn generate_expression(node: &NodeRef, ctx: &mut CodegenContext) -> Option<String> {
    if node.is_loop_index_ref() {
        return Some(LOOP_INDEX_VAR.to_string());
    }

    match node.as_ref() {
        Node::Literal(lit) => Some(literal(&lit.value)),
        Node::Identifier(ident) => identifier(&ident.name),
        Node::Variable(var) => {
            let name = var.name.trim_start_matches(':');
            Some(format!("{CONTEXT_VAR}.locals[{}]", js_string_literal(name)))
        }
        Node::Selector(sel) => match &sel.cache_key {
            Some(key) => {
                ctx.cache_selector(key, &sel.value);
                Some(key.clone())
            }
            None => Some(query_all(&sel.value)),
        },
        Node::Binary(expr) => {
            let left = generate_expression(&expr.left, ctx)?;
            let right = generate_expression(&expr.right, ctx)?;
            Some(match expr.operator.as_str() {
                "&" => format!("(String({left}) + String({right}))"),
                op => format!("({left} {} {right})", binary_operator(op)?),
            })
        }
        Node::Unary(expr) => {
            let operand = generate_expression(&expr.operand, ctx)?;
            let op = match expr.operator.as_str() {
                "not" | "no" | "!" => "!",
                "-" => "-",
                "+" => "+",
                _ => return None,
            };
            Some(format!("({op}{operand})"))
        }
        Node::Member(expr) => {
            let object = generate_expression(&expr.object, ctx)?;
            if is_identifier(&expr.property) {
                Some(format!("{object}.{}", expr.property))
            } else {
                Some(format!("{object}[{}]", js_string_literal(&expr.property)))
            }
        }
        _ => None,
    }
}

/// `document.querySelectorAll("<selector>")`
pub(crate) fn query_all(selector: &str) -> String {
    format!("document.querySelectorAll({})", js_string_literal(selector))
}

fn literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Null => "null".to_string(),
        LiteralValue::Bool(b) => b.to_string(),
        LiteralValue::Number(n) if *n < 0.0 => format!("({})", format_js_number(*n)),
        LiteralValue::Number(n) => format_js_number(*n),
        LiteralValue::String(s) => js_string_literal(s),
    }
}

fn identifier(name: &str) -> Option<String> {
    match name {
        "me" | "my" | "I" => Some(format!("{CONTEXT_VAR}.me")),
        "it" | "its" | "result" => Some(format!("{CONTEXT_VAR}.it")),
        "event" => Some(EVENT_PARAM.to_string()),
        "target" => Some(format!("{EVENT_PARAM}.target")),
        "document" | "window" => Some(name.to_string()),
        other if is_identifier(other) => Some(other.to_string()),
        _ => None,
    }
}

/// Hyperscript operator to JavaScript operator.
fn binary_operator(op: &str) -> Option<&'static str> {
    Some(match op {
        "+" => "+",
        "-" => "-",
        "*" => "*",
        "/" => "/",
        "%" => "%",
        "<" => "<",
        ">" => ">",
        "<=" => "<=",
        ">=" => ">=",
        "and" | "&&" => "&&",
        "or" | "||" => "||",
        "is" | "==" => "==",
        "is not" | "!=" => "!=",
        "===" => "===",
        "!==" => "!==",
        _ => return None,
    })
}
