//! Per-compilation-unit codegen state.

use indexmap::{IndexMap, IndexSet};

/// Runtime helpers required so far, in first-request order.
#[derive(Debug, Clone, Default)]
pub struct HelperRegistry {
    names: IndexSet<String>,
}

impl HelperRegistry {
    /// Record `name`. Requesting the same helper twice is a no-op.
    pub fn require(&mut self, name: &str) {
        if !self.names.contains(name) {
            self.names.insert(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// State shared by every handler generated for one output module.
///
/// `handler_id` names the handler currently being generated; the helper
/// registry only grows. Cached selectors are collected while a handler
/// body is generated and drained when the handler is assembled.
#[derive(Debug, Clone)]
pub struct CodegenContext {
    handler_id: String,
    helpers: HelperRegistry,
    cached_selectors: IndexMap<String, String>,
}

impl CodegenContext {
    pub fn new(handler_id: impl Into<String>) -> Self {
        CodegenContext {
            handler_id: handler_id.into(),
            helpers: HelperRegistry::default(),
            cached_selectors: IndexMap::new(),
        }
    }

    pub fn handler_id(&self) -> &str {
        &self.handler_id
    }

    /// Move on to the next handler in the same unit.
    pub fn set_handler_id(&mut self, handler_id: impl Into<String>) {
        self.handler_id = handler_id.into();
        self.cached_selectors.clear();
    }

    pub fn require_helper(&mut self, name: &str) {
        self.helpers.require(name);
    }

    pub fn required_helpers(&self) -> &HelperRegistry {
        &self.helpers
    }

    pub fn helpers_mut(&mut self) -> &mut HelperRegistry {
        &mut self.helpers
    }

    /// Note that `selector` is read through the hoisted variable `key`.
    pub fn cache_selector(&mut self, key: &str, selector: &str) {
        if !self.cached_selectors.contains_key(key) {
            self.cached_selectors
                .insert(key.to_string(), selector.to_string());
        }
    }

    /// Cached selectors used by the current handler, as `(key, selector)`.
    pub fn take_cached_selectors(&mut self) -> Vec<(String, String)> {
        self.cached_selectors.drain(..).collect()
    }
}

#[cfg(test)]
#[path = "../tests/context_tests.rs"]
mod tests;
