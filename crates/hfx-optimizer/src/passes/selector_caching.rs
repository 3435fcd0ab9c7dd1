//! Selector Caching
//!
//! Marks every use of a selector that the analysis reports as used more than
//! once and safe to hoist. Codegen reads the mark and queries the DOM once
//! per handler invocation instead of once per use.
//!
//! The cache key is a slug of the selector: runs of non-alphanumeric
//! characters become one `_`, the slug is cut to 20 characters, and `_sel_`
//! is prepended (`.menu > li` becomes `_sel__menu_li`).
//!
//! Two distinct selectors can truncate to the same key. The first one (in
//! analysis order) keeps the key; later ones are left uncached.

use std::sync::Arc;

use hfx_ast::{AnalysisResult, ChildRewriter, Node, NodeRef, SelectorNode, rewrite_children};
use rustc_hash::FxHashMap;

use crate::pipeline::{OptimizationLevel, OptimizationPass};

const CACHE_KEY_PREFIX: &str = "_sel_";
const MAX_SLUG_LEN: usize = 20;

pub struct SelectorCaching;

impl OptimizationPass for SelectorCaching {
    fn name(&self) -> &'static str {
        "selector-caching"
    }

    fn min_level(&self) -> OptimizationLevel {
        OptimizationLevel::Basic
    }

    fn should_run(&self, analysis: &AnalysisResult) -> bool {
        analysis.has_cacheable_selectors()
    }

    fn transform(&self, ast: &NodeRef, analysis: &AnalysisResult) -> NodeRef {
        let keys = assign_cache_keys(analysis);
        if keys.is_empty() {
            return Arc::clone(ast);
        }
        Annotator { keys: &keys }.rewrite_node(ast)
    }
}

/// Deterministic cache variable name for `selector`.
pub fn cache_key(selector: &str) -> String {
    let mut slug = String::with_capacity(selector.len());
    let mut in_run = false;
    for ch in selector.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            in_run = false;
        } else if !in_run {
            slug.push('_');
            in_run = true;
        }
    }
    // The slug is pure ASCII, so byte truncation is char-safe.
    slug.truncate(MAX_SLUG_LEN);
    format!("{CACHE_KEY_PREFIX}{slug}")
}

/// Map each qualifying selector to its key, dropping key collisions.
fn assign_cache_keys(analysis: &AnalysisResult) -> FxHashMap<String, String> {
    let mut by_selector = FxHashMap::default();
    let mut owner_of_key: FxHashMap<String, &str> = FxHashMap::default();

    for info in &analysis.expressions.selectors {
        if !info.is_cache_candidate() || by_selector.contains_key(&info.selector) {
            continue;
        }
        let key = cache_key(&info.selector);
        if let Some(owner) = owner_of_key.get(&key) {
            tracing::debug!(
                selector = %info.selector,
                key = %key,
                owner = %owner,
                "[selector-caching] key collision, leaving selector uncached"
            );
            continue;
        }
        owner_of_key.insert(key.clone(), &info.selector);
        by_selector.insert(info.selector.clone(), key);
    }

    by_selector
}

struct Annotator<'k> {
    keys: &'k FxHashMap<String, String>,
}

impl ChildRewriter for Annotator<'_> {
    fn rewrite_node(&mut self, node: &NodeRef) -> NodeRef {
        let Node::Selector(sel) = node.as_ref() else {
            return rewrite_children(node, self);
        };
        match self.keys.get(&sel.value) {
            Some(key) if sel.cache_key.as_ref() != Some(key) => {
                Arc::new(Node::Selector(SelectorNode {
                    value: sel.value.clone(),
                    cache_key: Some(key.clone()),
                }))
            }
            _ => Arc::clone(node),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/selector_caching_tests.rs"]
mod tests;
