//! Optimization pipeline for the hfx hyperscript compiler.
//!
//! Passes are pure AST-to-AST rewrites. Each one is gated by a cheap
//! precondition on the `AnalysisResult` and by the requested
//! `OptimizationLevel`:
//!
//! | Pass | Level | Runs when |
//! |------|-------|-----------|
//! | `constant-folding` | basic | any pure expression is reported |
//! | `selector-caching` | basic | a cacheable selector is used more than once |
//! | `dead-code-elimination` | full | the script can throw |
//! | `loop-unrolling` | full | the script has loops |

pub mod pipeline;
pub use pipeline::{OptimizationLevel, OptimizationPass, OptimizedAst, Optimizer};

pub mod passes;
pub use passes::{ConstantFolding, DeadCodeElimination, LoopUnrolling, SelectorCaching};
