//! Synchronization between a host editor, a debouncer, an analysis engine, and the overlay.
//!
//! [`SyncSession`] is the orchestrator. Data flows one way:
//!
//! ```text
//! host edit ──► handle_edit ──► overlay.remap + debouncer.submit
//!                                            │ (quiet for `pause`)
//!                                            ▼
//!                          poll ──► engine ──► AnalysisState + OverlayEffect ──► host decorations
//! ```
//!
//! The session keeps two separate views of the analysis result:
//!
//! - [`SyncSession::result`]: the last known result, replaced only when a commit is analyzed
//! - [`SyncSession::displayed`]: what a presentation layer should show, which is
//!   [`AnalysisState::Waiting`] while input is still settling
//!
//! # Example
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use proofpad_core::{
//!     AnalysisEngine, AnalysisError, AnalysisState, Document, Justification, SyncOptions,
//!     SyncSession,
//! };
//!
//! struct NoProofs;
//!
//! impl AnalysisEngine for NoProofs {
//!     type Ast = ();
//!     fn parse(&mut self, _text: &str) -> Result<(), AnalysisError> {
//!         Ok(())
//!     }
//!     fn evaluate(&mut self, _ast: &()) -> Result<Vec<Justification>, AnalysisError> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! let options = SyncOptions::default().with_pause(Duration::from_millis(200));
//! let mut session = SyncSession::new(Document::new(""), NoProofs, options);
//!
//! let t0 = Instant::now();
//! session.edit(0, 0, "proof", t0).unwrap();
//! assert_eq!(session.displayed(), &AnalysisState::Waiting);
//!
//! assert!(session.poll(t0 + Duration::from_millis(200)));
//! assert_eq!(session.displayed(), &AnalysisState::HasJustifications(Vec::new()));
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::analysis::{
    AnalysisEngine, AnalysisError, Justification, ParseError, analyze, sort_by_position,
};
use crate::debounce::Debouncer;
use crate::document::{EditError, EditUpdate, EditorSurface};
use crate::line_index::LineIndex;
use crate::overlay::{AnnotationOverlay, OverlayEffect};

/// Default quiet period before edited text is analyzed.
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Options controlling a [`SyncSession`].
pub struct SyncOptions {
    /// Quiet period after the last edit before analysis runs.
    pub pause: Duration,
    /// If `true`, highlights are cleared as soon as new input starts settling. If `false`, they
    /// stay visible (and are remapped) until the next analysis replaces them.
    pub clear_on_pending: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            pause: DEFAULT_PAUSE,
            clear_on_pending: true,
        }
    }
}

impl SyncOptions {
    /// Set the debounce pause.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Set whether highlights are cleared while input is settling.
    pub fn with_clear_on_pending(mut self, clear: bool) -> Self {
        self.clear_on_pending = clear;
        self
    }
}

/// Result of the most recent analysis, as seen by a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisState {
    /// No result yet, or input is still settling.
    Waiting,
    /// Evaluation succeeded; verdicts sorted by source position.
    HasJustifications(Vec<Justification>),
    /// The engine reported a structured parse error.
    ExpectedError(ParseError),
    /// The engine failed in some other way.
    UnexpectedError(String),
}

/// Coarse summary of an [`AnalysisState`], e.g. for a status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    /// Waiting for input to settle.
    Waiting,
    /// Syntax error.
    SyntaxError,
    /// Unexpected engine failure.
    UnexpectedError,
    /// At least one step is not justified.
    SomeUnjustified,
    /// Every step is justified.
    AllJustified,
}

impl AnalysisState {
    /// Summarize the state.
    pub fn status(&self) -> AnalysisStatus {
        match self {
            AnalysisState::Waiting => AnalysisStatus::Waiting,
            AnalysisState::ExpectedError(_) => AnalysisStatus::SyntaxError,
            AnalysisState::UnexpectedError(_) => AnalysisStatus::UnexpectedError,
            AnalysisState::HasJustifications(list) => {
                if list.iter().all(Justification::is_justified) {
                    AnalysisStatus::AllJustified
                } else {
                    AnalysisStatus::SomeUnjustified
                }
            }
        }
    }
}

static WAITING: AnalysisState = AnalysisState::Waiting;

/// Orchestrates debounced analysis of a host document and the resulting highlight overlay.
pub struct SyncSession<S, E> {
    surface: S,
    engine: E,
    options: SyncOptions,
    debouncer: Debouncer<EditUpdate, String>,
    overlay: AnnotationOverlay,
    result: AnalysisState,
}

impl<S, E> fmt::Debug for SyncSession<S, E>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncSession")
            .field("surface", &self.surface)
            .field("options", &self.options)
            .field("pending", &self.debouncer.is_pending())
            .field("overlay", &self.overlay.len())
            .field("result", &self.result.status())
            .finish()
    }
}

impl<S, E> SyncSession<S, E>
where
    S: EditorSurface,
    E: AnalysisEngine,
{
    /// Create a session over `surface`. No analysis runs until the first commit or
    /// [`SyncSession::load`].
    pub fn new(surface: S, engine: E, options: SyncOptions) -> Self {
        let initial = surface.snapshot().get_text();
        Self {
            surface,
            engine,
            options,
            debouncer: Debouncer::new(initial, options.pause, EditUpdate::text),
            overlay: AnnotationOverlay::new(),
            result: AnalysisState::Waiting,
        }
    }

    /// The host surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the host surface.
    ///
    /// Content changes made through this handle must be reported via
    /// [`SyncSession::handle_edit`].
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The analysis engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Session options.
    pub fn options(&self) -> SyncOptions {
        self.options
    }

    /// Current highlight overlay.
    pub fn overlay(&self) -> &AnnotationOverlay {
        &self.overlay
    }

    /// Last known analysis result (not gated by pending input).
    pub fn result(&self) -> &AnalysisState {
        &self.result
    }

    /// Result to present: [`AnalysisState::Waiting`] while input is settling.
    pub fn displayed(&self) -> &AnalysisState {
        if self.debouncer.is_pending() {
            &WAITING
        } else {
            &self.result
        }
    }

    /// `true` while an edit is waiting for the debounce pause to elapse.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Text of the most recent commit.
    pub fn committed_text(&self) -> &str {
        self.debouncer.value()
    }

    /// When the host should call [`SyncSession::poll`] next.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    /// Process a content-change notification from the host.
    ///
    /// If the previous burst had already settled at `now` but was never polled, it is analyzed
    /// first, so its highlights are remapped through this edit like any others.
    pub fn handle_edit(&mut self, update: EditUpdate, now: Instant) {
        self.poll(now);
        self.overlay.remap(&update.delta);

        let was_pending = self.debouncer.is_pending();
        // Anything due at `now` was committed by the poll above.
        let _ = self.debouncer.submit(update, now);
        let generation = self.debouncer.generation();

        if !was_pending && self.options.clear_on_pending {
            self.overlay.clear();
        }
        debug!(generation, was_pending, "sync.edit");
        self.render();
    }

    /// Replace `start..end` in the host document with `text` and process the change.
    pub fn edit(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
        now: Instant,
    ) -> Result<(), EditError> {
        let update = self.surface.replace(start, end, text)?;
        self.handle_edit(update, now);
        Ok(())
    }

    /// Fire the debounce timer if it is due; analyzes the committed text if input has settled.
    ///
    /// Returns `true` if an analysis ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(text) = self.debouncer.poll(now) else {
            return false;
        };
        self.run_analysis(&text);
        true
    }

    /// Bring the host document in line with `canonical`.
    ///
    /// If the live text differs, the whole document is replaced and the change goes through the
    /// normal edit path. Returns `true` if the document was replaced.
    pub fn reconcile(&mut self, canonical: &str, now: Instant) -> Result<bool, EditError> {
        let live = self.surface.snapshot();
        if live.get_text() == canonical {
            return Ok(false);
        }

        debug!(
            live_chars = live.char_count(),
            canonical_chars = canonical.chars().count(),
            "sync.reconcile"
        );
        let update = self.surface.replace(0, live.char_count(), canonical)?;
        self.handle_edit(update, now);
        Ok(true)
    }

    /// Load `text` into the host and analyze it right away, without waiting for the pause.
    pub fn load(&mut self, text: &str, now: Instant) -> Result<(), EditError> {
        self.reconcile(text, now)?;
        self.debouncer.settle(text.to_string());
        self.run_analysis(text);
        Ok(())
    }

    fn run_analysis(&mut self, text: &str) {
        // Spans are resolved against the exact text the engine saw.
        let index = LineIndex::from_text(text);

        let (state, effect) = match analyze(&mut self.engine, text) {
            Ok(mut list) => {
                sort_by_position(&mut list);
                let effect = OverlayEffect::justifications(
                    &index,
                    list.iter().map(|j| (&j.loc, j.is_justified())),
                );
                debug!(verdicts = list.len(), "sync.commit.justifications");
                (AnalysisState::HasJustifications(list), effect)
            }
            Err(AnalysisError::Parse(err)) => {
                let effect = match &err.loc {
                    Some(span) => OverlayEffect::error(&index, span).unwrap_or_else(|e| {
                        warn!(error = %e, "sync.commit.unresolved_error_span");
                        OverlayEffect::Clear
                    }),
                    None => OverlayEffect::Clear,
                };
                debug!(message = %err.message, has_loc = err.loc.is_some(), "sync.commit.parse_error");
                (AnalysisState::ExpectedError(err), effect)
            }
            Err(AnalysisError::Unexpected(message)) => {
                warn!(%message, "sync.commit.unexpected_error");
                (AnalysisState::UnexpectedError(message), OverlayEffect::Clear)
            }
        };

        self.result = state;
        self.overlay.apply(effect);
        self.render();
    }

    fn render(&mut self) {
        self.surface.apply_decorations(self.overlay.ranges());
    }
}
