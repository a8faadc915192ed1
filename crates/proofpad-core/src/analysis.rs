//! Interface to external analysis engines.
//!
//! An engine parses document text into an AST and evaluates the AST into a list of
//! [`Justification`] verdicts. `proofpad-core` never parses anything itself: it only calls an
//! [`AnalysisEngine`] and interprets the result or failure shape.
//!
//! Failures come in two flavours:
//! - [`AnalysisError::Parse`]: a recognized, structured parse error with a message and an optional
//!   span. This is the normal outcome for malformed input.
//! - [`AnalysisError::Unexpected`]: anything else. A panicking engine is reported the same way.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::position::SourceSpan;

/// Verdict kind of an evaluated proof step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JustificationKind {
    /// The step follows from the rules.
    Justified,
    /// The step could not be justified.
    NotJustified,
}

/// One evaluated proof step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Justification {
    /// Where the step is in the analyzed text.
    pub loc: SourceSpan,
    /// Verdict.
    #[serde(rename = "type")]
    pub kind: JustificationKind,
    /// Name of the justifying rule, if the engine reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl Justification {
    /// Returns `true` for [`JustificationKind::Justified`].
    pub fn is_justified(&self) -> bool {
        self.kind == JustificationKind::Justified
    }
}

/// Sort verdicts by source position (line, then column).
pub fn sort_by_position(justifications: &mut [Justification]) {
    justifications.sort_by_key(|j| j.loc.start);
}

/// A structured parse error reported by an engine.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ParseError {
    /// Human-readable description.
    pub message: String,
    /// Location of the error, when the engine knows it.
    #[serde(default)]
    pub loc: Option<SourceSpan>,
}

impl ParseError {
    /// Create a parse error.
    pub fn new(message: impl Into<String>, loc: Option<SourceSpan>) -> Self {
        Self {
            message: message.into(),
            loc,
        }
    }
}

/// Errors produced by an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// A recognized parse error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    /// Any other engine failure, with a best-effort description.
    #[error("{0}")]
    Unexpected(String),
}

impl AnalysisError {
    /// Wrap an arbitrary error as an unexpected failure.
    pub fn unexpected(err: impl std::fmt::Display) -> Self {
        AnalysisError::Unexpected(format!("Unexpected error: {err}"))
    }
}

/// An external parser/evaluator.
pub trait AnalysisEngine {
    /// Parsed representation of a document.
    type Ast;

    /// Parse document text.
    fn parse(&mut self, text: &str) -> Result<Self::Ast, AnalysisError>;

    /// Evaluate a parsed document into verdicts.
    fn evaluate(&mut self, ast: &Self::Ast) -> Result<Vec<Justification>, AnalysisError>;
}

impl<E: AnalysisEngine + ?Sized> AnalysisEngine for Box<E> {
    type Ast = E::Ast;

    fn parse(&mut self, text: &str) -> Result<Self::Ast, AnalysisError> {
        (**self).parse(text)
    }

    fn evaluate(&mut self, ast: &Self::Ast) -> Result<Vec<Justification>, AnalysisError> {
        (**self).evaluate(ast)
    }
}

/// Parse and evaluate `text`, converting an engine panic into [`AnalysisError::Unexpected`].
///
/// The panic hook still runs before the panic is caught, so the default hook prints the usual
/// `thread panicked` message to stderr. Hosts that want recovered engine panics to stay quiet
/// should install their own hook with [`std::panic::set_hook`].
pub fn analyze<E: AnalysisEngine>(
    engine: &mut E,
    text: &str,
) -> Result<Vec<Justification>, AnalysisError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let ast = engine.parse(text)?;
        engine.evaluate(&ast)
    }));

    outcome.unwrap_or_else(|payload| Err(AnalysisError::unexpected(panic_message(&*payload))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "engine panicked".to_string()
    }
}
