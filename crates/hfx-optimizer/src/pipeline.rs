//! The ordered pass list and its driver.

use std::sync::Arc;

use hfx_ast::{AnalysisResult, NodeRef};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::passes::{ConstantFolding, DeadCodeElimination, LoopUnrolling, SelectorCaching};

/// How much optimization to apply.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum OptimizationLevel {
    /// Return the input untouched.
    None = 0,
    /// Constant folding and selector caching only.
    Basic = 1,
    /// Every pass.
    #[default]
    Full = 2,
}

impl TryFrom<u8> for OptimizationLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Basic),
            2 => Ok(Self::Full),
            other => Err(format!("optimization level must be 0, 1 or 2, got {other}")),
        }
    }
}

impl From<OptimizationLevel> for u8 {
    fn from(level: OptimizationLevel) -> Self {
        level as u8
    }
}

/// A single AST rewrite.
pub trait OptimizationPass: Send + Sync {
    /// Name recorded in `OptimizedAst::optimizations` when the pass runs.
    fn name(&self) -> &'static str;

    /// Lowest level at which the pass is selected.
    fn min_level(&self) -> OptimizationLevel {
        OptimizationLevel::Full
    }

    /// Cheap precondition; avoids walking trees the pass cannot change.
    fn should_run(&self, analysis: &AnalysisResult) -> bool;

    /// Produce a new tree. Must not mutate `ast`.
    fn transform(&self, ast: &NodeRef, analysis: &AnalysisResult) -> NodeRef;
}

/// Optimizer output: the rewritten tree plus the passes that ran, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedAst {
    #[serde(flatten)]
    pub ast: NodeRef,
    #[serde(rename = "_optimizations", skip_serializing_if = "Vec::is_empty")]
    pub optimizations: Vec<&'static str>,
}

impl OptimizedAst {
    pub fn applied(&self, pass: &str) -> bool {
        self.optimizations.iter().any(|name| *name == pass)
    }
}

/// Runs the registered passes in order.
pub struct Optimizer {
    passes: Vec<Box<dyn OptimizationPass>>,
    disabled: FxHashSet<String>,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer {
    /// Pipeline with the four built-in passes in their fixed order.
    pub fn new() -> Self {
        Optimizer {
            passes: vec![
                Box::new(ConstantFolding),
                Box::new(SelectorCaching),
                Box::new(DeadCodeElimination),
                Box::new(LoopUnrolling),
            ],
            disabled: FxHashSet::default(),
        }
    }

    /// Pipeline with no passes registered.
    pub fn empty() -> Self {
        Optimizer {
            passes: Vec::new(),
            disabled: FxHashSet::default(),
        }
    }

    /// Append a pass after the existing ones.
    pub fn add_pass(&mut self, pass: Box<dyn OptimizationPass>) {
        self.passes.push(pass);
    }

    /// Skip the named pass regardless of level.
    pub fn disable_pass(&mut self, name: impl Into<String>) {
        self.disabled.insert(name.into());
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    pub fn optimize(
        &self,
        ast: &NodeRef,
        analysis: &AnalysisResult,
        level: OptimizationLevel,
    ) -> OptimizedAst {
        if level == OptimizationLevel::None {
            return OptimizedAst {
                ast: Arc::clone(ast),
                optimizations: Vec::new(),
            };
        }

        let mut current = Arc::clone(ast);
        let mut applied = Vec::new();

        for pass in &self.passes {
            let name = pass.name();
            if pass.min_level() > level {
                continue;
            }
            if self.disabled.contains(name) {
                tracing::trace!(pass = name, "[optimizer] disabled by configuration");
                continue;
            }
            if !pass.should_run(analysis) {
                tracing::trace!(pass = name, "[optimizer] precondition not met");
                continue;
            }

            let next = pass.transform(&current, analysis);
            tracing::debug!(
                pass = name,
                changed = !Arc::ptr_eq(&next, &current),
                "[optimizer] pass ran"
            );
            current = next;
            applied.push(name);
        }

        OptimizedAst {
            ast: current,
            optimizations: applied,
        }
    }
}

#[cfg(test)]
#[path = "../tests/pipeline_tests.rs"]
mod tests;
