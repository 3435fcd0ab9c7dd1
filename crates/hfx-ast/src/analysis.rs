//! Static analysis facts about a script.
//!
//! `AnalysisResult` is normally produced upstream alongside the AST and is
//! read-only for the optimizer and codegen. [`analyze`] derives a
//! conservative result locally for inputs that arrive without one.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeRef, TERMINATING_COMMANDS};
use crate::visit::for_each_child;

/// Commands that suspend inside the runtime and force an `async` handler.
pub const ASYNC_COMMANDS: &[&str] = &["wait", "fetch", "settle", "transition", "call", "send"];

/// Commands that may raise at runtime besides the terminators.
pub const THROWING_COMMANDS: &[&str] = &["call"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    pub control_flow: ControlFlowInfo,
    pub expressions: ExpressionInfo,
    pub dependencies: DependencyInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlFlowInfo {
    pub has_async: bool,
    pub can_throw: bool,
    pub has_loops: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpressionInfo {
    /// Expressions with no side effects.
    pub pure: Vec<NodeRef>,
    pub selectors: Vec<SelectorInfo>,
}

/// One distinct selector string and every place it is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorInfo {
    pub selector: String,
    #[serde(default)]
    pub usages: Vec<NodeRef>,
    #[serde(default)]
    pub can_cache: bool,
}

impl SelectorInfo {
    /// Used more than once and safe to hoist.
    pub fn is_cache_candidate(&self) -> bool {
        self.usages.len() > 1 && self.can_cache
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DependencyInfo {
    pub runtime_helpers: Vec<String>,
}

impl AnalysisResult {
    pub fn has_pure_expressions(&self) -> bool {
        !self.expressions.pure.is_empty()
    }

    pub fn has_cacheable_selectors(&self) -> bool {
        self.expressions
            .selectors
            .iter()
            .any(SelectorInfo::is_cache_candidate)
    }
}

/// Derive an `AnalysisResult` by walking `root`.
pub fn analyze(root: &NodeRef) -> AnalysisResult {
    let mut analyzer = Analyzer::default();
    analyzer.visit(root);

    let result = AnalysisResult {
        control_flow: ControlFlowInfo {
            has_async: analyzer.has_async,
            can_throw: analyzer.can_throw,
            has_loops: analyzer.has_loops,
        },
        expressions: ExpressionInfo {
            pure: analyzer.pure,
            selectors: analyzer
                .selectors
                .into_iter()
                .map(|(selector, usages)| SelectorInfo {
                    can_cache: is_static_selector(&selector),
                    selector,
                    usages,
                })
                .collect(),
        },
        dependencies: DependencyInfo {
            runtime_helpers: analyzer.helpers.into_iter().collect(),
        },
    };

    tracing::debug!(
        has_async = result.control_flow.has_async,
        can_throw = result.control_flow.can_throw,
        has_loops = result.control_flow.has_loops,
        pure = result.expressions.pure.len(),
        selectors = result.expressions.selectors.len(),
        "[analysis] derived"
    );
    result
}

/// Template selectors (`<${x}/>`, `#{id}`) change between invocations.
fn is_static_selector(selector: &str) -> bool {
    !selector.contains('$') && !selector.contains('{')
}

#[derive(Default)]
struct Analyzer {
    has_async: bool,
    can_throw: bool,
    has_loops: bool,
    pure: Vec<NodeRef>,
    selectors: IndexMap<String, Vec<NodeRef>>,
    helpers: IndexSet<String>,
}

impl Analyzer {
    fn visit(&mut self, node: &NodeRef) {
        match node.as_ref() {
            Node::Command(cmd) => {
                let name = cmd.name.as_str();
                if TERMINATING_COMMANDS.contains(&name) || THROWING_COMMANDS.contains(&name) {
                    self.can_throw = true;
                }
                if ASYNC_COMMANDS.contains(&name) {
                    self.has_async = true;
                }
            }
            Node::Repeat(_) | Node::ForEach(_) | Node::While(_) => self.has_loops = true,
            Node::Binary(expr) => {
                if expr.left.as_literal().is_some() && expr.right.as_literal().is_some() {
                    self.pure.push(NodeRef::clone(node));
                }
            }
            Node::Selector(sel) => {
                self.selectors
                    .entry(sel.value.clone())
                    .or_default()
                    .push(NodeRef::clone(node));
            }
            Node::Event(handler) => {
                let modifiers = &handler.modifiers;
                if modifiers.debounce_ms().is_some() {
                    self.helpers.insert("debounce".to_string());
                }
                if modifiers.throttle_ms().is_some() {
                    self.helpers.insert("throttle".to_string());
                }
                if modifiers.delegate_selector().is_some() {
                    self.helpers.insert("delegate".to_string());
                }
            }
            _ => {}
        }

        for_each_child(node, &mut |child| self.visit(child));
    }
}

#[cfg(test)]
#[path = "../tests/analysis_tests.rs"]
mod tests;
