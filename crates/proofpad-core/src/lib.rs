#![warn(missing_docs)]
//! Proofpad Core - debounced analysis sync and annotation overlay
//!
//! # Overview
//!
//! `proofpad-core` is the headless heart of an interactive proof editor. It continuously
//! re-analyzes edited text and overlays the results as highlighted ranges on the live document,
//! without re-analyzing on every keystroke.
//!
//! It does not parse, render, or store the host widget's text. It decides *when* to analyze,
//! makes sure a stale result never overwrites a newer one, and keeps highlight ranges correctly
//! positioned while the text keeps changing.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  SyncSession (orchestrator)                 │  ← Public API
//! ├──────────────────────┬──────────────────────┤
//! │  Debouncer           │  AnnotationOverlay   │  ← Settle detection / highlights
//! ├──────────────────────┴──────────────────────┤
//! │  Position mapping + TextDelta offset maps   │  ← Coordinates
//! ├─────────────────────────────────────────────┤
//! │  Line Index (Rope-based)                    │  ← Line Access
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use proofpad_core::{
//!     AnalysisEngine, AnalysisError, Document, HighlightKind, Justification,
//!     JustificationKind, SourcePosition, SourceSpan, SyncOptions, SyncSession,
//! };
//!
//! /// Justifies the first character of the document.
//! struct FirstChar;
//!
//! impl AnalysisEngine for FirstChar {
//!     type Ast = ();
//!     fn parse(&mut self, _text: &str) -> Result<(), AnalysisError> {
//!         Ok(())
//!     }
//!     fn evaluate(&mut self, _ast: &()) -> Result<Vec<Justification>, AnalysisError> {
//!         Ok(vec![Justification {
//!             loc: SourceSpan::new(SourcePosition::new(1, 1), SourcePosition::new(1, 2)),
//!             kind: JustificationKind::Justified,
//!             rule: None,
//!         }])
//!     }
//! }
//!
//! let mut session = SyncSession::new(Document::new(""), FirstChar, SyncOptions::default());
//! let t0 = Instant::now();
//! session.load("T", t0).unwrap();
//!
//! let ranges = session.surface().decorations();
//! assert_eq!(ranges.len(), 1);
//! assert_eq!(ranges[0].kind, HighlightKind::Justified);
//!
//! // Typing starts a new settle cycle; nothing is analyzed until the pause elapses.
//! session.edit(1, 1, "\nT", t0).unwrap();
//! assert!(session.is_pending());
//! assert!(!session.poll(t0 + Duration::from_millis(10)));
//! assert!(session.poll(t0 + Duration::from_millis(1000)));
//! ```
//!
//! # Module Description
//!
//! - [`line_index`] - Rope based line index
//! - [`position`] - engine source spans and the position mapper
//! - [`delta`] - structured change deltas and offset mapping
//! - [`overlay`] - highlight overlay state machine
//! - [`debounce`] - generic settle detection
//! - [`analysis`] - analysis engine interface
//! - [`document`] - host editor surface and an in-memory document
//! - [`session`] - the orchestrator
//!
//! # Unicode Support
//!
//! All offsets are character offsets (Unicode scalar values). Engine columns are interpreted in
//! the same unit.

pub mod analysis;
pub mod debounce;
pub mod delta;
pub mod document;
pub mod line_index;
pub mod overlay;
pub mod position;
pub mod session;

pub use analysis::{
    AnalysisEngine, AnalysisError, Justification, JustificationKind, ParseError, analyze,
    sort_by_position,
};
pub use debounce::{Debouncer, ProcessFn};
pub use delta::{TextDelta, TextDeltaEdit};
pub use document::{ChangeCallback, Document, EditError, EditUpdate, EditorSurface};
pub use line_index::LineIndex;
pub use overlay::{
    AnnotationOverlay, HighlightKind, HighlightRange, JustificationMark, OverlayEffect,
};
pub use position::{PositionError, SourcePosition, SourceSpan, map_position, map_span};
pub use session::{AnalysisState, AnalysisStatus, DEFAULT_PAUSE, SyncOptions, SyncSession};
