//! JavaScript code generation for hyperscript event handlers.
//!
//! The entry point is [`EventHandlerCodegen`], which turns one `event` node
//! into a [`GeneratedHandler`]: the handler function, the statement that
//! binds it, the statement that unbinds it, and the runtime helpers it
//! needs. Per-command output comes from a [`StatementCodegen`]
//! implementation; [`BasicStatementCodegen`] covers a small core set.
//!
//! Every fragment is plain text meant to be concatenated into an output
//! module that provides `_rt` (the runtime) and `_el` (the bound element).

pub mod runtime;

pub mod context;
pub use context::{CodegenContext, HelperRegistry};

pub mod literals;
pub use literals::js_string_literal;

pub mod writer;
pub use writer::SourceWriter;

pub mod statements;
pub use statements::{BasicStatementCodegen, BodyGenerator, StatementCodegen};

mod expressions;

pub mod handler;
pub use handler::{EventHandlerCodegen, GeneratedHandler};

pub mod batch;
pub use batch::{
    BindingTarget, HandlerBinding, generate_bindings, generate_bindings_with, generate_initialization,
};
