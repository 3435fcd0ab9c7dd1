//! Event handler assembly: function, binding, cleanup and imports.

use hfx_ast::{AnalysisResult, EventHandlerNode, EventModifiers, Node, NodeRef, format_js_number};
use serde::Serialize;
use smallvec::SmallVec;

use crate::context::{CodegenContext, HelperRegistry};
use crate::expressions::query_all;
use crate::literals::js_string_literal;
use crate::runtime::{
    self, CREATE_CONTEXT, DEBOUNCE, DELEGATE, ELEMENT, EVENT_PARAM, EXIT, HALT, THROTTLE,
    handler_function_name,
};
use crate::statements::StatementCodegen;
use crate::writer::SourceWriter;

/// JavaScript fragments for one compiled handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedHandler {
    pub handler_code: String,
    pub binding_code: String,
    /// `None` when the listener removes itself (`once`).
    pub cleanup: Option<String>,
    #[serde(rename = "async")]
    pub is_async: bool,
    pub imports: Vec<String>,
}

/// Generates handlers, delegating individual statements to `statements`.
pub struct EventHandlerCodegen<'s> {
    statements: &'s dyn StatementCodegen,
}

impl<'s> EventHandlerCodegen<'s> {
    pub fn new(statements: &'s dyn StatementCodegen) -> Self {
        EventHandlerCodegen { statements }
    }

    pub fn generate(
        &self,
        node: &EventHandlerNode,
        ctx: &mut CodegenContext,
        analysis: &AnalysisResult,
    ) -> GeneratedHandler {
        let handler_id = ctx.handler_id().to_string();
        let is_async = analysis.control_flow.has_async;

        let body = self.generate_body(&node.body, ctx);
        let handler_code = self.handler_function(&handler_id, node, body, ctx, analysis);
        let binding_code = generate_binding(&handler_id, &node.event, &node.modifiers, ctx);
        let cleanup = generate_cleanup(&handler_id, &node.event, &node.modifiers);
        let imports = collect_imports(ctx, analysis);

        tracing::debug!(
            handler_id = %handler_id,
            event = %node.event,
            is_async,
            imports = imports.len(),
            "[codegen] handler generated"
        );

        GeneratedHandler {
            handler_code,
            binding_code,
            cleanup,
            is_async,
            imports,
        }
    }

    /// Statement list to JavaScript, one statement per line group.
    ///
    /// Unrecognized commands and unknown node kinds produce no output.
    pub fn generate_body(&self, nodes: &[NodeRef], ctx: &mut CodegenContext) -> String {
        let parts: Vec<String> = nodes
            .iter()
            .filter_map(|node| self.generate_statement(node, ctx))
            .filter(|code| !code.is_empty())
            .collect();
        parts.join("\n")
    }

    fn generate_statement(&self, node: &NodeRef, ctx: &mut CodegenContext) -> Option<String> {
        let mut nested = |body: &[NodeRef], ctx: &mut CodegenContext| self.generate_body(body, ctx);
        match node.as_ref() {
            Node::Command(cmd) => {
                let code = self.statements.generate_command(cmd, ctx);
                if code.is_none() {
                    tracing::trace!(command = %cmd.name, "[codegen] no output for command");
                }
                code
            }
            Node::If(stmt) => self.statements.generate_if(stmt, ctx, &mut nested),
            Node::Repeat(stmt) => self.statements.generate_repeat(stmt, ctx, &mut nested),
            Node::ForEach(stmt) => self.statements.generate_for_each(stmt, ctx, &mut nested),
            Node::While(stmt) => self.statements.generate_while(stmt, ctx, &mut nested),
            Node::Sequence(seq) => Some(self.generate_body(&seq.commands, ctx)),
            other => {
                tracing::trace!(kind = other.kind(), "[codegen] skipping node");
                None
            }
        }
    }

    fn handler_function(
        &self,
        handler_id: &str,
        node: &EventHandlerNode,
        body: String,
        ctx: &mut CodegenContext,
        analysis: &AnalysisResult,
    ) -> String {
        let name = handler_function_name(handler_id);
        let prefix = if analysis.control_flow.has_async {
            "async "
        } else {
            ""
        };

        let mut w = SourceWriter::new();
        w.write_line(&format!("{prefix}function {name}({EVENT_PARAM}) {{"));
        w.increase_indent();
        w.write_line(&format!(
            "const {} = {}({EVENT_PARAM}, this);",
            runtime::CONTEXT_VAR,
            runtime::member(CREATE_CONTEXT)
        ));
        for (key, selector) in ctx.take_cached_selectors() {
            w.write_line(&format!("const {key} = {};", query_all(&selector)));
        }

        let can_throw = analysis.control_flow.can_throw;
        if can_throw {
            w.write_line("try {");
            w.increase_indent();
        }
        if node.modifiers.prevent {
            w.write_line(&format!("{EVENT_PARAM}.preventDefault();"));
        }
        if node.modifiers.stop {
            w.write_line(&format!("{EVENT_PARAM}.stopPropagation();"));
        }
        if !body.is_empty() {
            w.write_lines(&body);
        }
        if can_throw {
            w.decrease_indent();
            w.write_line("} catch (_err) {");
            w.increase_indent();
            w.write_line(&format!("if (_err === {}) {{", runtime::member(HALT)));
            w.write_line(&format!("  {EVENT_PARAM}.preventDefault();"));
            w.write_line("  return;");
            w.write_line("}");
            w.write_line(&format!("if (_err === {}) {{", runtime::member(EXIT)));
            w.write_line("  return;");
            w.write_line("}");
            w.write_line("throw _err;");
            w.decrease_indent();
            w.write_line("}");
        }
        w.decrease_indent();
        w.write_line("}");
        w.finish()
    }
}

/// Flags for the `AddEventListenerOptions` literal. Only set flags appear.
pub fn listener_options(modifiers: &EventModifiers) -> SmallVec<[&'static str; 3]> {
    let mut flags = SmallVec::new();
    if modifiers.once {
        flags.push("once");
    }
    if modifiers.passive {
        flags.push("passive");
    }
    if modifiers.capture {
        flags.push("capture");
    }
    flags
}

/// `{ once: true, capture: true }`, or `None` when no flag is set.
pub fn options_literal(modifiers: &EventModifiers) -> Option<String> {
    let flags = listener_options(modifiers);
    if flags.is_empty() {
        return None;
    }
    let fields: Vec<String> = flags.iter().map(|flag| format!("{flag}: true")).collect();
    Some(format!("{{ {} }}", fields.join(", ")))
}

/// `handler_name` wrapped for rate limiting: debounce innermost, throttle
/// outermost. Each wrapper registers its helper.
pub fn handler_reference(
    handler_name: &str,
    modifiers: &EventModifiers,
    helpers: &mut HelperRegistry,
) -> String {
    let mut handler_ref = handler_name.to_string();
    if let Some(ms) = modifiers.debounce_ms() {
        helpers.require(DEBOUNCE);
        handler_ref = format!(
            "{}({handler_ref}, {})",
            runtime::member(DEBOUNCE),
            format_js_number(ms)
        );
    }
    if let Some(ms) = modifiers.throttle_ms() {
        helpers.require(THROTTLE);
        handler_ref = format!(
            "{}({handler_ref}, {})",
            runtime::member(THROTTLE),
            format_js_number(ms)
        );
    }
    handler_ref
}

/// Listener registration on the element expression `target`, without the
/// trailing semicolon. Delegated when `modifiers.from` is set.
pub fn listener_call(
    target: &str,
    event: &str,
    handler_ref: String,
    modifiers: &EventModifiers,
    helpers: &mut HelperRegistry,
) -> String {
    let event = js_string_literal(event);
    let options = options_literal(modifiers);

    match modifiers.delegate_selector() {
        Some(selector) => {
            helpers.require(DELEGATE);
            let mut args = vec![
                target.to_string(),
                event,
                js_string_literal(selector),
                handler_ref,
            ];
            args.extend(options);
            format!("{}({})", runtime::member(DELEGATE), args.join(", "))
        }
        None => {
            let mut args = vec![event, handler_ref];
            args.extend(options);
            format!("{target}.addEventListener({})", args.join(", "))
        }
    }
}

/// Statement attaching `_handler_<id>` to `_el`.
pub fn generate_binding(
    handler_id: &str,
    event: &str,
    modifiers: &EventModifiers,
    ctx: &mut CodegenContext,
) -> String {
    let helpers = ctx.helpers_mut();
    let handler_ref = handler_reference(&handler_function_name(handler_id), modifiers, helpers);
    format!(
        "{};",
        listener_call(ELEMENT, event, handler_ref, modifiers, helpers)
    )
}

/// Statement detaching the handler, or `None` for `once` listeners.
pub fn generate_cleanup(handler_id: &str, event: &str, modifiers: &EventModifiers) -> Option<String> {
    if modifiers.once {
        return None;
    }
    let name = handler_function_name(handler_id);
    let event = js_string_literal(event);
    Some(if modifiers.capture {
        format!("{ELEMENT}.removeEventListener({event}, {name}, true);")
    } else {
        format!("{ELEMENT}.removeEventListener({event}, {name});")
    })
}

/// `createContext`, then context helpers, then analysis helpers; no repeats.
pub fn collect_imports(ctx: &CodegenContext, analysis: &AnalysisResult) -> Vec<String> {
    let mut imports: Vec<String> = vec![CREATE_CONTEXT.to_string()];
    let candidates = ctx
        .required_helpers()
        .iter()
        .chain(analysis.dependencies.runtime_helpers.iter().map(String::as_str));
    for name in candidates {
        if !imports.iter().any(|existing| existing == name) {
            imports.push(name.to_string());
        }
    }
    imports
}

#[cfg(test)]
#[path = "../tests/handler_tests.rs"]
mod tests;
