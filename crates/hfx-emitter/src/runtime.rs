//! Names of the runtime surface referenced by generated code.
//!
//! Generated code reaches the runtime through the `_rt` namespace. Helper
//! names are what `CodegenContext::require_helper` records and what ends up
//! in `GeneratedHandler::imports`.

pub const NAMESPACE: &str = "_rt";

/// Builds the per-invocation execution context; always imported.
pub const CREATE_CONTEXT: &str = "createContext";
pub const DEBOUNCE: &str = "debounce";
pub const THROTTLE: &str = "throttle";
pub const DELEGATE: &str = "delegate";
pub const READY: &str = "ready";

/// Sentinel thrown by `halt`.
pub const HALT: &str = "HALT";
/// Sentinel thrown by `exit`.
pub const EXIT: &str = "EXIT";

/// Identifier of the event parameter in every handler.
pub const EVENT_PARAM: &str = "_event";
/// Identifier of the element the handler is bound to.
pub const ELEMENT: &str = "_el";
/// Identifier of the execution context created in the prologue.
pub const CONTEXT_VAR: &str = "_ctx";

/// `_rt.<name>`
pub fn member(name: &str) -> String {
    format!("{NAMESPACE}.{name}")
}

/// Name of the generated function for `handler_id`.
pub fn handler_function_name(handler_id: &str) -> String {
    format!("_handler_{handler_id}")
}
