//! Statement-level code generation.
//!
//! `EventHandlerCodegen` owns dispatch over node kinds; everything that
//! turns a single command or control-flow node into JavaScript goes through
//! [`StatementCodegen`]. Control-flow methods get a continuation that
//! generates nested statement lists, so implementations never recurse into
//! the dispatcher themselves.

use hfx_ast::{CommandNode, ForEachNode, IfNode, Node, NodeRef, RepeatNode, WhileNode};

use crate::context::CodegenContext;
use crate::expressions::{LOOP_INDEX_VAR, generate_expression, query_all};
use crate::literals::{is_identifier, js_string_literal};
use crate::runtime::{self, CONTEXT_VAR, EXIT, HALT};
use crate::writer::{SourceWriter, indent_block};

/// Generates JavaScript for a nested statement list.
pub type BodyGenerator<'a> = dyn FnMut(&[NodeRef], &mut CodegenContext) -> String + 'a;

/// Per-statement JavaScript generation.
///
/// Returning `None` means "emit nothing" for that statement.
pub trait StatementCodegen {
    fn generate_command(&self, cmd: &CommandNode, ctx: &mut CodegenContext) -> Option<String>;

    fn generate_if(
        &self,
        node: &IfNode,
        ctx: &mut CodegenContext,
        body: &mut BodyGenerator<'_>,
    ) -> Option<String>;

    fn generate_repeat(
        &self,
        node: &RepeatNode,
        ctx: &mut CodegenContext,
        body: &mut BodyGenerator<'_>,
    ) -> Option<String>;

    fn generate_for_each(
        &self,
        node: &ForEachNode,
        ctx: &mut CodegenContext,
        body: &mut BodyGenerator<'_>,
    ) -> Option<String>;

    fn generate_while(
        &self,
        node: &WhileNode,
        ctx: &mut CodegenContext,
        body: &mut BodyGenerator<'_>,
    ) -> Option<String>;
}

/// Core command set: `halt`, `exit`, `return`, `throw`, `log`,
/// `add`/`remove`/`toggle` of a class, `set` of a variable and `wait`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicStatementCodegen;

impl StatementCodegen for BasicStatementCodegen {
    fn generate_command(&self, cmd: &CommandNode, ctx: &mut CodegenContext) -> Option<String> {
        match cmd.name.as_str() {
            "halt" => Some(format!("throw {};", runtime::member(HALT))),
            "exit" => Some(format!("throw {};", runtime::member(EXIT))),
            "return" => match cmd.args.first() {
                Some(value) => Some(format!("return {};", generate_expression(value, ctx)?)),
                None => Some("return;".to_string()),
            },
            "throw" => {
                let value = generate_expression(cmd.args.first()?, ctx)?;
                Some(format!("throw {value};"))
            }
            "log" => {
                let args = cmd
                    .args
                    .iter()
                    .map(|arg| generate_expression(arg, ctx))
                    .collect::<Option<Vec<_>>>()?;
                Some(format!("console.log({});", args.join(", ")))
            }
            "add" | "remove" | "toggle" => class_list_command(cmd, ctx),
            "set" => {
                let [place, value] = cmd.args.as_slice() else {
                    return None;
                };
                let Node::Variable(_) = place.as_ref() else {
                    return None;
                };
                let place = generate_expression(place, ctx)?;
                let value = generate_expression(value, ctx)?;
                Some(format!("{place} = {value};"))
            }
            "wait" => {
                let ms = generate_expression(cmd.args.first()?, ctx)?;
                Some(format!(
                    "await new Promise((resolve) => setTimeout(resolve, {ms}));"
                ))
            }
            _ => None,
        }
    }

    fn generate_if(
        &self,
        node: &IfNode,
        ctx: &mut CodegenContext,
        body: &mut BodyGenerator<'_>,
    ) -> Option<String> {
        let condition = generate_expression(&node.condition, ctx)?;
        let mut w = SourceWriter::new();
        w.write_line(&format!("if ({condition}) {{"));
        write_nested(&mut w, &body(node.then_branch.as_slice(), ctx));
        match &node.else_branch {
            Some(else_branch) => {
                w.write_line("} else {");
                write_nested(&mut w, &body(else_branch.as_slice(), ctx));
                w.write_line("}");
            }
            None => w.write_line("}"),
        }
        Some(w.finish())
    }

    fn generate_repeat(
        &self,
        node: &RepeatNode,
        ctx: &mut CodegenContext,
        body: &mut BodyGenerator<'_>,
    ) -> Option<String> {
        let header = match &node.count {
            Some(count) => {
                let count = generate_expression(count, ctx)?;
                format!(
                    "for (let {LOOP_INDEX_VAR} = 0; {LOOP_INDEX_VAR} < {count}; {LOOP_INDEX_VAR}++) {{"
                )
            }
            None => "while (true) {".to_string(),
        };
        Some(block(&header, &body(node.body.as_slice(), ctx)))
    }

    fn generate_for_each(
        &self,
        node: &ForEachNode,
        ctx: &mut CodegenContext,
        body: &mut BodyGenerator<'_>,
    ) -> Option<String> {
        let item = node.item_name.trim_start_matches(':');
        let collection = generate_expression(&node.collection, ctx)?;
        let header = if is_identifier(item) {
            format!("for (const {item} of {collection}) {{")
        } else {
            format!(
                "for (const _item of {collection}) {{\n  {CONTEXT_VAR}.locals[{}] = _item;",
                js_string_literal(item)
            )
        };
        Some(block(&header, &body(node.body.as_slice(), ctx)))
    }

    fn generate_while(
        &self,
        node: &WhileNode,
        ctx: &mut CodegenContext,
        body: &mut BodyGenerator<'_>,
    ) -> Option<String> {
        let condition = generate_expression(&node.condition, ctx)?;
        Some(block(&format!("while ({condition}) {{"), &body(node.body.as_slice(), ctx)))
    }
}

/// `add .active to #menu` and friends. Only class arguments are supported.
fn class_list_command(cmd: &CommandNode, ctx: &mut CodegenContext) -> Option<String> {
    let Node::Selector(class) = cmd.args.first()?.as_ref() else {
        return None;
    };
    let class_name = class.value.strip_prefix('.')?;
    let method = cmd.name.as_str();
    let call = format!("classList.{method}({})", js_string_literal(class_name));

    match cmd.target.as_deref() {
        None => Some(format!("{CONTEXT_VAR}.me.{call};")),
        Some(Node::Selector(target)) => {
            let elements = match &target.cache_key {
                Some(key) => {
                    ctx.cache_selector(key, &target.value);
                    key.clone()
                }
                None => query_all(&target.value),
            };
            Some(format!("{elements}.forEach((el) => el.{call});"))
        }
        Some(_) => {
            let target = generate_expression(cmd.target.as_ref()?, ctx)?;
            Some(format!("{target}.{call};"))
        }
    }
}

fn block(header: &str, inner: &str) -> String {
    let mut w = SourceWriter::new();
    w.write_lines(header);
    write_nested(&mut w, inner);
    w.write_line("}");
    w.finish()
}

fn write_nested(w: &mut SourceWriter, inner: &str) {
    if !inner.is_empty() {
        w.write_lines(&indent_block(inner));
    }
}

#[cfg(test)]
#[path = "../tests/statements_tests.rs"]
mod tests;
