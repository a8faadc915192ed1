//! Host editor surface.
//!
//! The synchronization core does not own document storage. It talks to the host editor through
//! [`EditorSurface`]: it reads the live text, occasionally replaces a range of it, and pushes the
//! current highlight set for rendering. The host, in turn, reports every content change as an
//! [`EditUpdate`].
//!
//! [`Document`] is a rope-backed in-memory implementation suitable for headless hosts and tests.

use std::fmt;

use thiserror::Error;
use tracing::trace;

use crate::delta::{TextDelta, TextDeltaEdit};
use crate::line_index::LineIndex;
use crate::overlay::HighlightRange;

/// Notification describing one content change of the host document.
#[derive(Debug, Clone)]
pub struct EditUpdate {
    /// Document text after the change.
    pub snapshot: LineIndex,
    /// Structured description of the change.
    pub delta: TextDelta,
    /// Host document version after the change.
    pub version: u64,
}

impl EditUpdate {
    /// Full document text after the change.
    pub fn text(&self) -> String {
        self.snapshot.get_text()
    }
}

/// Errors produced by host document edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// The edited range is not inside the document.
    #[error("range {start}..{end} is out of bounds (document has {len} chars)")]
    OutOfBounds {
        /// Range start.
        start: usize,
        /// Range end.
        end: usize,
        /// Document length in chars.
        len: usize,
    },
}

/// Capabilities the synchronization core needs from the host editor.
pub trait EditorSurface {
    /// Current document text.
    fn snapshot(&self) -> LineIndex;

    /// Replace the character range `start..end` with `text`.
    fn replace(&mut self, start: usize, end: usize, text: &str) -> Result<EditUpdate, EditError>;

    /// Render `ranges` as the current decoration set, replacing any previous set.
    fn apply_decorations(&mut self, ranges: &[HighlightRange]);
}

/// Document change callback function type
pub type ChangeCallback = Box<dyn FnMut(&EditUpdate) + Send>;

/// Rope-backed in-memory document.
pub struct Document {
    index: LineIndex,
    version: u64,
    decorations: Vec<HighlightRange>,
    callbacks: Vec<ChangeCallback>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("chars", &self.index.char_count())
            .field("version", &self.version)
            .field("decorations", &self.decorations.len())
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Document {
    /// Create a document holding `text`.
    pub fn new(text: &str) -> Self {
        Self {
            index: LineIndex::from_text(text),
            version: 0,
            decorations: Vec::new(),
            callbacks: Vec::new(),
        }
    }

    /// Full text.
    pub fn text(&self) -> String {
        self.index.get_text()
    }

    /// Line index over the current text.
    pub fn line_index(&self) -> &LineIndex {
        &self.index
    }

    /// Length in chars.
    pub fn char_count(&self) -> usize {
        self.index.char_count()
    }

    /// Version number, incremented on every content change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Decoration set last pushed by [`EditorSurface::apply_decorations`].
    pub fn decorations(&self) -> &[HighlightRange] {
        &self.decorations
    }

    /// Subscribe to content changes.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&EditUpdate) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Insert `text` at `offset`.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<EditUpdate, EditError> {
        self.replace_range(offset, offset, text)
    }

    /// Delete the range `start..end`.
    pub fn delete(&mut self, start: usize, end: usize) -> Result<EditUpdate, EditError> {
        self.replace_range(start, end, "")
    }

    /// Replace the whole document with `text`.
    pub fn set_text(&mut self, text: &str) -> EditUpdate {
        let old_text = self.index.get_text();
        self.index = LineIndex::from_text(text);
        self.commit(TextDelta::replace_all(&old_text, text))
    }

    /// Replace the range `start..end` with `text`.
    pub fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
    ) -> Result<EditUpdate, EditError> {
        let len = self.index.char_count();
        if start > end || end > len {
            return Err(EditError::OutOfBounds { start, end, len });
        }

        let deleted = self.index.slice_text(start, end);
        self.index.delete(start, end - start);
        self.index.insert(start, text);

        let delta = TextDelta::single(len, TextDeltaEdit::new(start, deleted, text));
        Ok(self.commit(delta))
    }

    fn commit(&mut self, delta: TextDelta) -> EditUpdate {
        self.version += 1;
        let update = EditUpdate {
            snapshot: self.index.clone(),
            delta,
            version: self.version,
        };
        trace!(
            version = self.version,
            chars = update.delta.after_char_count,
            "document.changed"
        );
        for callback in &mut self.callbacks {
            callback(&update);
        }
        update
    }
}

impl EditorSurface for Document {
    fn snapshot(&self) -> LineIndex {
        self.index.clone()
    }

    fn replace(&mut self, start: usize, end: usize, text: &str) -> Result<EditUpdate, EditError> {
        self.replace_range(start, end, text)
    }

    fn apply_decorations(&mut self, ranges: &[HighlightRange]) {
        self.decorations.clear();
        self.decorations.extend_from_slice(ranges);
    }
}
