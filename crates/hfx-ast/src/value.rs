//! Literal values and the JavaScript coercions constant folding relies on.

use serde::{Deserialize, Serialize};

/// The value carried by a `literal` node.
///
/// Deserialized untagged, so JSON `null`, booleans, numbers and strings map
/// directly onto the variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum LiteralValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl LiteralValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            LiteralValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// JavaScript truthiness.
    pub fn is_truthy(&self) -> bool {
        match self {
            LiteralValue::Null => false,
            LiteralValue::Bool(b) => *b,
            LiteralValue::Number(n) => *n != 0.0 && !n.is_nan(),
            LiteralValue::String(s) => !s.is_empty(),
        }
    }

    /// `String(value)` in JavaScript.
    pub fn to_js_string(&self) -> String {
        match self {
            LiteralValue::Null => "null".to_string(),
            LiteralValue::Bool(b) => b.to_string(),
            LiteralValue::Number(n) => format_js_number(*n),
            LiteralValue::String(s) => s.clone(),
        }
    }

    /// `===` in JavaScript: same type and same value, `NaN` never equal.
    pub fn strict_equals(&self, other: &LiteralValue) -> bool {
        match (self, other) {
            (LiteralValue::Null, LiteralValue::Null) => true,
            (LiteralValue::Bool(a), LiteralValue::Bool(b)) => a == b,
            (LiteralValue::Number(a), LiteralValue::Number(b)) => a == b,
            (LiteralValue::String(a), LiteralValue::String(b)) => a == b,
            _ => false,
        }
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Number(value)
    }
}

impl From<i32> for LiteralValue {
    fn from(value: i32) -> Self {
        LiteralValue::Number(f64::from(value))
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Bool(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::String(value)
    }
}

/// Format a number the way `Number.prototype.toString()` does.
pub fn format_js_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // Covers -0 as well.
        return "0".to_string();
    }

    let abs = n.abs();
    if n.fract() == 0.0 && abs < 1e21 {
        return format!("{n:.0}");
    }
    if abs >= 1e21 || abs < 1e-6 {
        // Rust writes `1e21` / `1.5e-7`; JavaScript always signs the exponent.
        let formatted = format!("{n:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        };
    }
    format!("{n}")
}

#[cfg(test)]
#[path = "../tests/value_tests.rs"]
mod tests;
