//! Binding many handlers at once from a module's init code.

use hfx_ast::EventModifiers;

use crate::context::HelperRegistry;
use crate::handler::{handler_reference, listener_call};
use crate::literals::js_string_literal;
use crate::runtime::{self, READY};
use crate::writer::SourceWriter;

/// Where a batch-bound handler is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingTarget {
    /// Every element matching a CSS selector.
    Selector(String),
    /// A JavaScript expression evaluating to a single element.
    Element(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandlerBinding {
    pub target: BindingTarget,
    pub event: String,
    /// Name of the generated handler function, e.g. `_handler_h1`.
    pub handler_name: String,
    pub modifiers: EventModifiers,
}

impl HandlerBinding {
    fn statement(&self, helpers: &mut HelperRegistry) -> String {
        let handler_ref = handler_reference(&self.handler_name, &self.modifiers, helpers);
        match &self.target {
            BindingTarget::Selector(selector) => {
                let call = listener_call("el", &self.event, handler_ref, &self.modifiers, helpers);
                format!(
                    "document.querySelectorAll({}).forEach(el => {call});",
                    js_string_literal(selector)
                )
            }
            BindingTarget::Element(element) => {
                let call = listener_call(element, &self.event, handler_ref, &self.modifiers, helpers);
                format!("{call};")
            }
        }
    }
}

/// One registration statement per binding, in input order.
///
/// Rate limiting and delegation are applied exactly as for a single
/// handler's `binding_code`.
pub fn generate_bindings(handlers: &[HandlerBinding]) -> String {
    generate_bindings_with(handlers, &mut HelperRegistry::default())
}

/// [`generate_bindings`], recording the runtime helpers the statements use.
pub fn generate_bindings_with(handlers: &[HandlerBinding], helpers: &mut HelperRegistry) -> String {
    let mut w = SourceWriter::new();
    for binding in handlers {
        w.write_line(&binding.statement(helpers));
    }
    w.finish()
}

/// [`generate_bindings`] deferred until the DOM is ready.
pub fn generate_initialization(handlers: &[HandlerBinding]) -> String {
    let bindings = generate_bindings(handlers);
    let mut w = SourceWriter::new();
    w.write_line(&format!("{}(() => {{", runtime::member(READY)));
    w.increase_indent();
    w.write_lines(&bindings);
    w.decrease_indent();
    w.write_line("});");
    w.finish()
}

#[cfg(test)]
#[path = "../tests/batch_tests.rs"]
mod tests;
