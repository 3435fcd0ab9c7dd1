//! Indenting text writer for generated JavaScript.

const INDENT_UNIT: &str = "  ";

#[derive(Debug, Default)]
pub struct SourceWriter {
    output: String,
    indent: usize,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current indentation.
    pub fn write_line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.output.push_str(INDENT_UNIT);
            }
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    /// Write a multi-line fragment, indenting every line.
    pub fn write_lines(&mut self, text: &str) {
        for line in text.lines() {
            self.write_line(line);
        }
    }

    pub fn increase_indent(&mut self) {
        self.indent += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// The written text without the final newline.
    pub fn finish(mut self) -> String {
        if self.output.ends_with('\n') {
            self.output.pop();
        }
        self.output
    }
}

/// Indent every line of `text` by one level.
pub fn indent_block(text: &str) -> String {
    let mut writer = SourceWriter::new();
    writer.increase_indent();
    writer.write_lines(text);
    writer.finish()
}
