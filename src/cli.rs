//! Command-line interface for `hfx-aot`.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hfx_optimizer::OptimizationLevel;
use std::path::PathBuf;

use crate::compiler::{Compiler, ModuleInput};
use crate::config::{CompilerOptions, load_config};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Handler functions plus a DOM-ready binding block.
    #[default]
    Js,
    /// One JSON record per generated handler.
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "hfx-aot",
    version,
    about = "Compile hyperscript event handler ASTs to JavaScript"
)]
pub struct CliArgs {
    /// JSON file holding one event node or `{"handlers": [...]}`.
    pub input: PathBuf,

    /// Optimization level: 0 (none), 1 (basic) or 2 (full).
    #[arg(short = 'O', long = "opt-level", value_parser = parse_level)]
    pub optimization_level: Option<OptimizationLevel>,

    /// Compiler options file (JSON).
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Js)]
    pub format: OutputFormat,

    /// Write output here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Skip an optimization pass by name. Repeatable.
    #[arg(long = "disable-pass", value_name = "PASS")]
    pub disabled_passes: Vec<String>,

    /// Prefix for generated handler ids.
    #[arg(long)]
    pub handler_id_prefix: Option<String>,
}

fn parse_level(value: &str) -> Result<OptimizationLevel, String> {
    let level: u8 = value
        .parse()
        .map_err(|_| format!("`{value}` is not an optimization level"))?;
    OptimizationLevel::try_from(level)
}

impl CliArgs {
    /// Config file values with command-line flags applied on top.
    pub fn resolve_options(&self) -> Result<CompilerOptions> {
        let mut options = match &self.config {
            Some(path) => load_config(path)?,
            None => CompilerOptions::default(),
        };
        if let Some(level) = self.optimization_level {
            options.optimization_level = level;
        }
        if let Some(prefix) = &self.handler_id_prefix {
            options.handler_id_prefix = prefix.clone();
        }
        for pass in &self.disabled_passes {
            if !options.disabled_passes.contains(pass) {
                options.disabled_passes.push(pass.clone());
            }
        }
        Ok(options)
    }
}

/// Compile the input file and render it in the requested format.
pub fn run(args: &CliArgs) -> Result<String> {
    let options = args.resolve_options()?;
    let source = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read input: {}", args.input.display()))?;
    let module = ModuleInput::from_json(&source)
        .with_context(|| format!("failed to parse input: {}", args.input.display()))?;

    let compiled = Compiler::new(options).compile_module(&module)?;
    match args.format {
        OutputFormat::Js => Ok(compiled.to_javascript()),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&compiled.handlers)
                .context("failed to serialize handlers")?;
            json.push('\n');
            Ok(json)
        }
    }
}
