//! Annotation overlay: highlighted ranges derived from the latest analysis.
//!
//! The overlay is a small state machine over a single value, the current set of highlighted
//! ranges. It changes in two ways:
//!
//! - [`AnnotationOverlay::remap`] moves every range through a raw text change, dropping ranges
//!   whose text was deleted. It never adds ranges.
//! - [`AnnotationOverlay::apply`] replaces the whole set with the outcome of an
//!   [`OverlayEffect`]. Replacement is total: ranges are never merged or patched.
//!
//! The overlay decides *which* ranges are highlighted and *what kind* they are. Rendering is up
//! to the host, usually by mapping [`HighlightKind::class_name`] to a style.

use crate::delta::TextDelta;
use crate::line_index::LineIndex;
use crate::position::{PositionError, SourceSpan, map_span};
use tracing::{trace, warn};

/// What a highlighted range means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HighlightKind {
    /// Location of a syntax error.
    Error,
    /// A proof step that was justified.
    Justified,
    /// A proof step that could not be justified.
    NotJustified,
}

impl HighlightKind {
    /// Stable class name for hosts that style decorations by class.
    pub fn class_name(self) -> &'static str {
        match self {
            HighlightKind::Error => "errormark",
            HighlightKind::Justified => "justifiedmark",
            HighlightKind::NotJustified => "notjustifiedmark",
        }
    }
}

/// A half-open character-offset range (`from..to`) with a highlight kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightRange {
    /// Range start offset (inclusive), in `char`s from the start of the document.
    pub from: usize,
    /// Range end offset (exclusive), in `char`s from the start of the document.
    pub to: usize,
    /// Highlight kind.
    pub kind: HighlightKind,
}

impl HighlightRange {
    /// Create a new range. Endpoints are normalized so that `from <= to`.
    pub fn new(from: usize, to: usize, kind: HighlightKind) -> Self {
        Self {
            from: from.min(to),
            to: from.max(to),
            kind,
        }
    }

    /// Width of the range in characters.
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    /// Returns `true` if the range covers no characters.
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// A resolved justification highlight, carried by [`OverlayEffect::SetJustifications`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JustificationMark {
    /// Start offset.
    pub from: usize,
    /// End offset (exclusive).
    pub to: usize,
    /// Whether the step was justified.
    pub justified: bool,
}

/// A replace-everything transition of the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEffect {
    /// Replace the overlay with a single error range.
    SetError {
        /// Start offset.
        from: usize,
        /// End offset (exclusive).
        to: usize,
    },
    /// Replace the overlay with one range per justification.
    SetJustifications(Vec<JustificationMark>),
    /// Remove every range.
    Clear,
}

impl OverlayEffect {
    /// Build a [`OverlayEffect::SetError`] from an engine span.
    ///
    /// Fails if the span does not resolve against `index`; callers should fall back to
    /// [`OverlayEffect::Clear`].
    pub fn error(index: &LineIndex, span: &SourceSpan) -> Result<Self, PositionError> {
        let (from, to) = map_span(index, span)?;
        Ok(OverlayEffect::SetError { from, to })
    }

    /// Build a [`OverlayEffect::SetJustifications`] from `(span, justified)` entries.
    ///
    /// Entries whose span does not resolve against `index` are dropped.
    pub fn justifications<'a, I>(index: &LineIndex, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a SourceSpan, bool)>,
    {
        let marks = entries
            .into_iter()
            .filter_map(|(span, justified)| match map_span(index, span) {
                Ok((from, to)) => Some(JustificationMark {
                    from,
                    to,
                    justified,
                }),
                Err(err) => {
                    warn!(error = %err, "overlay.unresolved_span");
                    None
                }
            })
            .collect();
        OverlayEffect::SetJustifications(marks)
    }
}

/// The current set of highlighted ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationOverlay {
    ranges: Vec<HighlightRange>,
}

impl AnnotationOverlay {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current ranges, ascending by `from`.
    pub fn ranges(&self) -> &[HighlightRange] {
        &self.ranges
    }

    /// Number of highlighted ranges.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` if nothing is highlighted.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Move every range through a text change.
    ///
    /// Ranges that collapse to zero width (their text was deleted) are dropped. Relative order is
    /// preserved because offset mapping is monotonic.
    pub fn remap(&mut self, delta: &TextDelta) {
        if self.ranges.is_empty() || delta.is_empty() {
            return;
        }

        let before = self.ranges.len();
        self.ranges.retain_mut(|range| {
            range.from = delta.map_offset(range.from);
            range.to = delta.map_offset(range.to);
            range.from < range.to
        });

        trace!(
            before,
            after = self.ranges.len(),
            edits = delta.edits.len(),
            "overlay.remap"
        );
    }

    /// Replace the overlay according to `effect`.
    pub fn apply(&mut self, effect: OverlayEffect) {
        match effect {
            OverlayEffect::SetError { from, to } => self.set_error(from, to),
            OverlayEffect::SetJustifications(marks) => self.set_justifications(marks),
            OverlayEffect::Clear => self.clear(),
        }
    }

    /// Replace the overlay with a single [`HighlightKind::Error`] range.
    pub fn set_error(&mut self, from: usize, to: usize) {
        self.ranges.clear();
        self.ranges
            .push(HighlightRange::new(from, to, HighlightKind::Error));
        trace!(from, to, "overlay.set_error");
    }

    /// Replace the overlay with one range per mark, sorted by `from`.
    pub fn set_justifications(&mut self, marks: Vec<JustificationMark>) {
        let mut ranges: Vec<HighlightRange> = marks
            .into_iter()
            .map(|mark| {
                let kind = if mark.justified {
                    HighlightKind::Justified
                } else {
                    HighlightKind::NotJustified
                };
                HighlightRange::new(mark.from, mark.to, kind)
            })
            .collect();
        ranges.sort_by_key(|r| (r.from, r.to));

        trace!(count = ranges.len(), "overlay.set_justifications");
        self.ranges = ranges;
    }

    /// Remove every range.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }
}
