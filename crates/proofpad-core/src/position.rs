//! Source coordinates reported by analysis engines, and their mapping onto character offsets.
//!
//! Engines report 1-based `(line, column)` pairs. The editor works in 0-based character offsets.
//! A [`SourceSpan`] must always be resolved against a [`LineIndex`] built from the exact text the
//! engine analyzed.

use crate::line_index::LineIndex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 1-based `(line, column)` coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number, starting at 1.
    pub column: usize,
}

impl SourcePosition {
    /// Create a new source position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A region of analyzed text, half-open once mapped to offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    /// First position covered by the span.
    pub start: SourcePosition,
    /// Position just past the span.
    pub end: SourcePosition,
}

impl SourceSpan {
    /// Create a new span.
    pub fn new(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }
}

/// Errors produced while resolving source coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    /// The position refers to a line past the end of the document.
    #[error("line {line} is out of range (document has {line_count} lines)")]
    LineOutOfRange {
        /// Requested 1-based line.
        line: usize,
        /// Number of lines in the document.
        line_count: usize,
    },
    /// Line or column 0 (coordinates are 1-based).
    #[error("invalid source position {line}:{column}")]
    InvalidPosition {
        /// Requested line.
        line: usize,
        /// Requested column.
        column: usize,
    },
}

/// Convert a 1-based source position into an absolute character offset.
///
/// `offset = line_start(pos.line) + (pos.column - 1)`. The column is not clamped to the line
/// length.
pub fn map_position(index: &LineIndex, pos: SourcePosition) -> Result<usize, PositionError> {
    if pos.line == 0 || pos.column == 0 {
        return Err(PositionError::InvalidPosition {
            line: pos.line,
            column: pos.column,
        });
    }

    let line_start = index
        .line_start(pos.line - 1)
        .ok_or(PositionError::LineOutOfRange {
            line: pos.line,
            line_count: index.line_count(),
        })?;

    Ok(line_start + (pos.column - 1))
}

/// Convert both endpoints of a span into a `(from, to)` character offset pair.
pub fn map_span(index: &LineIndex, span: &SourceSpan) -> Result<(usize, usize), PositionError> {
    Ok((map_position(index, span.start)?, map_position(index, span.end)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: &str = "proof triv: T =\nbegin\nT\nend;";

    #[test]
    fn test_map_position_first_line() {
        let index = LineIndex::from_text(PROGRAM);
        assert_eq!(map_position(&index, SourcePosition::new(1, 1)), Ok(0));
        assert_eq!(map_position(&index, SourcePosition::new(1, 7)), Ok(6));
    }

    #[test]
    fn test_map_span_third_line() {
        let index = LineIndex::from_text(PROGRAM);
        let span = SourceSpan::new(SourcePosition::new(3, 1), SourcePosition::new(3, 2));
        let line_start = index.line_start(2).unwrap();

        assert_eq!(map_span(&index, &span), Ok((line_start, line_start + 1)));
    }

    #[test]
    fn test_span_across_lines() {
        let index = LineIndex::from_text(PROGRAM);
        let span = SourceSpan::new(SourcePosition::new(2, 1), SourcePosition::new(4, 5));
        assert_eq!(map_span(&index, &span), Ok((16, 28)));
    }

    #[test]
    fn test_line_out_of_range() {
        let index = LineIndex::from_text(PROGRAM);
        assert_eq!(
            map_position(&index, SourcePosition::new(5, 1)),
            Err(PositionError::LineOutOfRange {
                line: 5,
                line_count: 4
            })
        );
    }

    #[test]
    fn test_zero_coordinates_rejected() {
        let index = LineIndex::from_text(PROGRAM);
        assert!(matches!(
            map_position(&index, SourcePosition::new(0, 1)),
            Err(PositionError::InvalidPosition { .. })
        ));
        assert!(matches!(
            map_position(&index, SourcePosition::new(1, 0)),
            Err(PositionError::InvalidPosition { .. })
        ));
    }
}
