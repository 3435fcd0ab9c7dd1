//! Ahead-of-time compilation of hyperscript event handlers to JavaScript.
//!
//! The work is split across three crates, re-exported here:
//!
//! - [`ast`]: node model, JS value semantics and static analysis
//! - [`optimizer`]: the four-pass AST optimizer
//! - [`emitter`]: event handler and binding code generation
//!
//! [`Compiler`] ties them together: for each handler it derives (or takes)
//! an analysis, optimizes the tree and generates a [`GeneratedHandler`].
//!
//! ```no_run
//! use hyperfixi_aot::{Compiler, CompilerOptions, ModuleInput};
//!
//! # fn main() -> anyhow::Result<()> {
//! let input = ModuleInput::from_json(r#"{"type":"event","event":"click"}"#)?;
//! let module = Compiler::new(CompilerOptions::default()).compile_module(&input)?;
//! println!("{}", module.to_javascript());
//! # Ok(())
//! # }
//! ```

pub use hfx_ast as ast;
pub use hfx_emitter as emitter;
pub use hfx_optimizer as optimizer;

pub use hfx_emitter::GeneratedHandler;
pub use hfx_optimizer::OptimizationLevel;

pub mod config;
pub use config::{CompilerOptions, load_config, parse_config};

mod compiler;
pub use compiler::{CompiledHandler, CompiledModule, Compiler, HandlerInput, ModuleInput};

pub mod tracing_config;

#[cfg(feature = "cli")]
pub mod cli;
