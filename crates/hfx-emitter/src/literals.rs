//! JavaScript string literal escaping.

use std::fmt::Write;

/// Quote `text` as a double-quoted JavaScript string literal.
pub fn js_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    push_escaped(&mut out, text, '"');
    out.push('"');
    out
}

/// Append `text` to `out`, escaped for a literal delimited by `quote`.
pub fn push_escaped(out: &mut String, text: &str, quote: char) {
    for ch in text.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            // Line terminators inside string literals are a syntax error in older engines.
            '\u{2028}' | '\u{2029}' => {
                let _ = write!(out, "\\u{:04X}", ch as u32);
            }
            c if (c as u32) < 0x20 || c == '\x7F' => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
}

/// True if `name` can be written as a bare JavaScript identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !is_reserved_word(name)
}

fn is_reserved_word(name: &str) -> bool {
    matches!(
        name,
        "break" | "case" | "catch" | "class" | "const" | "continue" | "debugger" | "default"
            | "delete" | "do" | "else" | "export" | "extends" | "false" | "finally" | "for"
            | "function" | "if" | "import" | "in" | "instanceof" | "let" | "new" | "null"
            | "return" | "super" | "switch" | "this" | "throw" | "true" | "try" | "typeof"
            | "var" | "void" | "while" | "with" | "yield" | "await" | "enum"
    )
}

#[cfg(test)]
#[path = "../tests/literals_tests.rs"]
mod tests;
