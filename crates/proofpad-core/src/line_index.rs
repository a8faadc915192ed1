//! Logical line index
//!
//! Rope-backed line access used to resolve line/column coordinates into character offsets.

use ropey::Rope;

/// Logical line index - implemented using Rope data structure
///
/// Rope provides O(log N) line access, insertion, and deletion performance. All offsets are
/// character offsets (Unicode scalar values) and all line numbers are 0-based.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an empty line index (one empty line).
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build line index from text
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Get total line count
    ///
    /// An empty document has one line; N newlines produce N+1 lines.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get total character count
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Character offset of the first character of `line` (0-based).
    ///
    /// Returns `None` if the line does not exist.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        if line >= self.rope.len_lines() {
            return None;
        }
        Some(self.rope.line_to_char(line))
    }

    /// Insert text (at specified character offset)
    pub fn insert(&mut self, char_offset: usize, text: &str) {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.insert(char_offset, text);
    }

    /// Delete text range (character offset)
    pub fn delete(&mut self, start_char: usize, len_chars: usize) {
        let start_char = start_char.min(self.rope.len_chars());
        let end_char = (start_char + len_chars).min(self.rope.len_chars());

        if start_char < end_char {
            self.rope.remove(start_char..end_char);
        }
    }

    /// Text of the character range `start..end`, clamped to the document.
    pub fn slice_text(&self, start: usize, end: usize) -> String {
        let len = self.rope.len_chars();
        let end = end.min(len);
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    /// Get complete text
    pub fn get_text(&self) -> String {
        self.rope.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_line_index() {
        let index = LineIndex::new();
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.char_count(), 0);
        assert_eq!(index.line_start(0), Some(0));
    }

    #[test]
    fn test_line_start() {
        let index = LineIndex::from_text("proof triv: T =\nbegin\nT\nend;");

        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_start(0), Some(0));
        assert_eq!(index.line_start(1), Some(16));
        assert_eq!(index.line_start(2), Some(22));
        assert_eq!(index.line_start(3), Some(24));
        assert_eq!(index.line_start(4), None);
    }

    #[test]
    fn test_trailing_newline_adds_line() {
        let index = LineIndex::from_text("a\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_start(1), Some(2));
    }

    #[test]
    fn test_utf8_cjk() {
        let index = LineIndex::from_text("你好\n世界");

        assert_eq!(index.line_count(), 2);
        assert_eq!(index.char_count(), 5);
        assert_eq!(index.line_start(1), Some(3));
    }

    #[test]
    fn test_insert_delete_text() {
        let mut index = LineIndex::from_text("Hello World");

        index.insert(6, "Beautiful ");
        assert_eq!(index.get_text(), "Hello Beautiful World");

        index.delete(6, 10);
        assert_eq!(index.get_text(), "Hello World");
        assert_eq!(index.slice_text(0, 5), "Hello");
    }
}
