//! Source positions
//!
//! Every object, enumeration and attribute remembers where it came from so
//! diagnostics can be mapped back onto the editor buffer. Lines and columns are
//! 1-based; spans are half-open (`end` is exclusive). Columns count characters of
//! the line, offsets count bytes of the whole input.

use serde::{Deserialize, Serialize};

/// Half-open range `[start, end)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

/// A location inside the markdown source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: Span,
    pub offset: Span,
}

/// Byte offsets of every line start, used to turn line numbers into positions.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut starts = vec![0];
        for (idx, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                starts.push(idx + 1);
            }
        }
        LineIndex { source, starts }
    }

    /// Number of lines, counting a trailing partial line.
    pub fn line_count(&self) -> usize {
        if self.source.ends_with('\n') {
            self.starts.len() - 1
        } else {
            self.starts.len()
        }
    }

    /// Text of a 1-based line without its line terminator.
    pub fn line_text(&self, line: usize) -> &'a str {
        if line == 0 || line > self.starts.len() {
            return "";
        }
        let start = self.starts[line - 1];
        let end = self
            .starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(self.source.len());
        let text = &self.source[start..end.max(start)];
        text.strip_suffix('\r').unwrap_or(text)
    }

    /// Byte offset where a 1-based line begins.
    pub fn line_start(&self, line: usize) -> usize {
        if line == 0 {
            return 0;
        }
        self.starts
            .get(line - 1)
            .copied()
            .unwrap_or(self.source.len())
    }

    /// Position covering the visible content of a line (leading indentation skipped).
    pub fn line_position(&self, line: usize) -> SourcePosition {
        let text = self.line_text(line);
        let indent = text.len() - text.trim_start().len();
        let content = text.trim_end();
        let byte_end = content.len().max(indent);
        self.position_for_bytes(line, indent, byte_end)
    }

    /// Position for the byte range `[start, end)` of a 1-based line.
    pub fn position_for_bytes(&self, line: usize, start: usize, end: usize) -> SourcePosition {
        let text = self.line_text(line);
        let start = clamp_to_char_boundary(text, start);
        let end = clamp_to_char_boundary(text, end.max(start));
        let col_start = text[..start].chars().count() + 1;
        let col_end = col_start + text[start..end].chars().count();
        let base = self.line_start(line);
        SourcePosition {
            line,
            column: Span::new(col_start, col_end),
            offset: Span::new(base + start, base + end),
        }
    }
}

fn clamp_to_char_boundary(text: &str, idx: usize) -> usize {
    let mut idx = idx.min(text.len());
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_text_strips_terminators() {
        let index = LineIndex::new("### A\r\n- x\n");
        assert_eq!(index.line_text(1), "### A");
        assert_eq!(index.line_text(2), "- x");
        assert_eq!(index.line_text(3), "");
        assert_eq!(index.line_count(), 2);
    }

    #[test]
    fn test_line_position_skips_indentation() {
        let source = "### A\n- x\n  - Type: Missing\n";
        let index = LineIndex::new(source);
        let pos = index.line_position(3);

        assert_eq!(pos.line, 3);
        assert_eq!(pos.column, Span::new(3, 18));
        assert_eq!(&source[pos.offset.start..pos.offset.end], "- Type: Missing");
    }

    #[test]
    fn test_columns_count_characters() {
        let index = LineIndex::new("### Größe\n");
        let pos = index.position_for_bytes(1, 4, "### Größe".len());
        assert_eq!(pos.column, Span::new(5, 10));
        assert_eq!(pos.offset, Span::new(4, 11));
    }

    #[test]
    fn test_out_of_range_line_is_empty() {
        let index = LineIndex::new("");
        assert_eq!(index.line_text(5), "");
        assert_eq!(index.line_count(), 1);
    }
}
