/// Tracks indentation while emitting one source file.
#[derive(Debug, Clone)]
pub struct EmitContext {
    indent_level: usize,
    /// Spaces per indent level
    indent_width: usize,
}

/// Indentation of a target framework's code base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentStyle {
    pub width: usize,
}

impl IndentStyle {
    pub const fn spaces(width: usize) -> Self {
        Self { width }
    }
}

impl EmitContext {
    pub fn new(style: IndentStyle) -> Self {
        Self {
            indent_level: 0,
            indent_width: style.width,
        }
    }

    /// Current indentation string.
    pub fn indent(&self) -> String {
        " ".repeat(self.indent_level * self.indent_width)
    }

    pub fn push_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn pop_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    pub fn set_indent_level(&mut self, level: usize) {
        self.indent_level = level;
    }

    /// One line at the current indentation, newline-terminated.
    /// Blank input yields a bare newline.
    pub fn line(&self, text: &str) -> String {
        if text.is_empty() {
            "\n".to_string()
        } else {
            format!("{}{}\n", self.indent(), text)
        }
    }

    /// Re-indent a multi-line block at the current level. Relative
    /// indentation inside the block is kept.
    pub fn lines(&self, block: &str) -> String {
        block.lines().map(|l| self.line(l)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_spaces() {
        let mut ctx = EmitContext::new(IndentStyle::spaces(4));
        assert_eq!(ctx.indent(), "");
        ctx.push_indent();
        assert_eq!(ctx.indent(), "    ");
        ctx.pop_indent();
        ctx.pop_indent();
        assert_eq!(ctx.indent_level(), 0);
        ctx.set_indent_level(2);
        assert_eq!(ctx.indent(), "        ");
    }

    #[test]
    fn test_line_and_lines() {
        let mut ctx = EmitContext::new(IndentStyle::spaces(2));
        ctx.push_indent();
        assert_eq!(ctx.line("x;"), "  x;\n");
        assert_eq!(ctx.line(""), "\n");
        assert_eq!(ctx.lines("if (a)\n  b();\n\nc();"), "  if (a)\n    b();\n\n  c();\n");
    }
}
