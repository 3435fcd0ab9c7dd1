//! Compiler options and their JSON file format.
//!
//! ```json
//! {
//!   "optimizationLevel": 1,
//!   "handlerIdPrefix": "nav",
//!   "disabledPasses": ["loop-unrolling"]
//! }
//! ```
//!
//! Every key is optional. Unknown keys are rejected so typos surface early.

use anyhow::{Context, Result};
use hfx_optimizer::OptimizationLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_HANDLER_ID_PREFIX: &str = "h";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CompilerOptions {
    pub optimization_level: OptimizationLevel,
    /// Handler ids are `<prefix><n>`, counting from 1.
    pub handler_id_prefix: String,
    /// Pass names skipped even when the level selects them.
    pub disabled_passes: Vec<String>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            optimization_level: OptimizationLevel::default(),
            handler_id_prefix: DEFAULT_HANDLER_ID_PREFIX.to_string(),
            disabled_passes: Vec::new(),
        }
    }
}

pub fn parse_config(source: &str) -> Result<CompilerOptions> {
    let options: CompilerOptions =
        serde_json::from_str(source).context("invalid compiler options")?;
    Ok(options)
}

pub fn load_config(path: &Path) -> Result<CompilerOptions> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("failed to parse config: {}", path.display()))
}
