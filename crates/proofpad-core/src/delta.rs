//! Structured text change deltas.
//!
//! Every document change is described as an ordered list of edits expressed in **character
//! offsets** (Unicode scalar values). Consumers that keep offsets into the document (highlight
//! overlays, cursors, pending requests) move them through a change with
//! [`TextDelta::map_offset`] instead of diffing old and new text.

/// A single text edit expressed in character offsets.
///
/// Semantics:
/// - `start` is a character offset in the document **at the time this edit is applied**.
/// - The deleted range is defined by the length (in `char`s) of `deleted_text`.
/// - Edits inside a [`TextDelta`] must be applied **in order** to transform the "before" document
///   into the "after" document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDeltaEdit {
    /// Start character offset of the edit.
    pub start: usize,
    /// Exact deleted text (may be empty).
    pub deleted_text: String,
    /// Exact inserted text (may be empty).
    pub inserted_text: String,
}

impl TextDeltaEdit {
    /// Create an edit replacing `deleted_text` at `start` with `inserted_text`.
    pub fn new(
        start: usize,
        deleted_text: impl Into<String>,
        inserted_text: impl Into<String>,
    ) -> Self {
        Self {
            start,
            deleted_text: deleted_text.into(),
            inserted_text: inserted_text.into(),
        }
    }

    /// Length of `deleted_text` in characters.
    pub fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    /// Length of `inserted_text` in characters.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Exclusive end character offset in the pre-edit document.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.deleted_len())
    }

    /// Map an offset in the pre-edit document to the post-edit document.
    ///
    /// - offsets before `start` are unchanged
    /// - offsets at or after the end of the deleted range shift by `inserted - deleted`
    ///   (an insertion at an offset pushes it forward)
    /// - offsets inside the deleted range collapse to the end of the inserted text
    pub fn map_offset(&self, offset: usize) -> usize {
        if offset < self.start {
            return offset;
        }

        let end = self.end();
        if offset >= end {
            offset - self.deleted_len() + self.inserted_len()
        } else {
            self.start + self.inserted_len()
        }
    }
}

/// A structured description of a document text change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDelta {
    /// Character count before applying `edits`.
    pub before_char_count: usize,
    /// Character count after applying `edits`.
    pub after_char_count: usize,
    /// Ordered list of edits that transforms the "before" document into the "after" document.
    pub edits: Vec<TextDeltaEdit>,
}

impl TextDelta {
    /// Build a single-edit delta against a document of `before_char_count` characters.
    pub fn single(before_char_count: usize, edit: TextDeltaEdit) -> Self {
        let after_char_count =
            before_char_count.saturating_sub(edit.deleted_len()) + edit.inserted_len();
        Self {
            before_char_count,
            after_char_count,
            edits: vec![edit],
        }
    }

    /// Delta replacing the whole of `old_text` with `new_text`.
    pub fn replace_all(old_text: &str, new_text: &str) -> Self {
        Self::single(
            old_text.chars().count(),
            TextDeltaEdit::new(0, old_text, new_text),
        )
    }

    /// Returns `true` if this delta contains no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Map an offset in the "before" document through every edit, in order.
    pub fn map_offset(&self, offset: usize) -> usize {
        self.edits
            .iter()
            .fold(offset, |offset, edit| edit.map_offset(offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_shifts_offsets_at_or_after() {
        let delta = TextDelta::single(10, TextDeltaEdit::new(4, "", "abc"));

        assert_eq!(delta.after_char_count, 13);
        assert_eq!(delta.map_offset(3), 3);
        assert_eq!(delta.map_offset(4), 7);
        assert_eq!(delta.map_offset(9), 12);
    }

    #[test]
    fn test_deletion_collapses_inner_offsets() {
        let delta = TextDelta::single(10, TextDeltaEdit::new(2, "xyz", ""));

        assert_eq!(delta.map_offset(1), 1);
        assert_eq!(delta.map_offset(2), 2);
        assert_eq!(delta.map_offset(4), 2);
        assert_eq!(delta.map_offset(5), 2);
        assert_eq!(delta.map_offset(8), 5);
    }

    #[test]
    fn test_replacement_maps_inner_offsets_past_insert() {
        let delta = TextDelta::single(10, TextDeltaEdit::new(2, "xy", "hello"));

        assert_eq!(delta.map_offset(3), 7);
        assert_eq!(delta.map_offset(4), 7);
        assert_eq!(delta.map_offset(5), 8);
    }

    #[test]
    fn test_edits_apply_in_order() {
        let delta = TextDelta {
            before_char_count: 5,
            after_char_count: 6,
            edits: vec![
                TextDeltaEdit::new(0, "", "ab"),
                TextDeltaEdit::new(4, "x", ""),
            ],
        };

        // 3 -> 5 after the insert, then the deletion at 4..5 pulls it back to 4.
        assert_eq!(delta.map_offset(3), 4);
        assert_eq!(delta.map_offset(0), 2);
    }

    #[test]
    fn test_replace_all_counts_chars() {
        let delta = TextDelta::replace_all("你好", "abc");
        assert_eq!(delta.before_char_count, 2);
        assert_eq!(delta.after_char_count, 3);
        assert_eq!(delta.map_offset(1), 3);
    }
}
