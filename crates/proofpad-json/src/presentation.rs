//! JSON and text projections of [`AnalysisState`] for presentation layers.

use proofpad_core::{AnalysisState, AnalysisStatus, Justification, JustificationKind, ParseError};
use serde::Serialize;
use serde_json::{Value, json};

use crate::bridge::PARSING_ERROR_NAME;

/// Placeholder shown while input is settling.
pub const WAITING_TEXT: &str = "...";

/// A parse error as engines report it: the error fields plus its `name`.
#[derive(Serialize)]
struct NamedParseError<'a> {
    name: &'static str,
    #[serde(flatten)]
    error: &'a ParseError,
}

/// Encode a verdict in the engine's wire shape.
pub fn justification_to_value(j: &Justification) -> Value {
    json!(j)
}

/// Encode a parse error in the engine's wire shape (`loc` is `null` when unknown).
pub fn parse_error_to_value(err: &ParseError) -> Value {
    let named = NamedParseError {
        name: PARSING_ERROR_NAME,
        error: err,
    };
    json!(named)
}

/// Tagged JSON form of a state: `{ "state": "...", ... }`.
///
/// `Waiting` has no payload, `UnexpectedError` carries `msg`, `ExpectedError` carries
/// `contents`, and `HasJustifications` carries `justifications`.
pub fn state_to_value(state: &AnalysisState) -> Value {
    match state {
        AnalysisState::Waiting => json!({ "state": "Waiting" }),
        AnalysisState::UnexpectedError(msg) => json!({ "state": "UnexpectedError", "msg": msg }),
        AnalysisState::ExpectedError(err) => json!({
            "state": "ExpectedError",
            "contents": parse_error_to_value(err),
        }),
        AnalysisState::HasJustifications(list) => json!({
            "state": "HasJustifications",
            "justifications": list,
        }),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Raw result panel text: `...` while waiting, the pretty-printed error contents or verdict
/// array, or the message of an unexpected failure.
pub fn render_state(state: &AnalysisState) -> String {
    match state {
        AnalysisState::Waiting => WAITING_TEXT.to_string(),
        AnalysisState::ExpectedError(err) => pretty(&parse_error_to_value(err)),
        AnalysisState::UnexpectedError(msg) => msg.clone(),
        AnalysisState::HasJustifications(list) => pretty(&json!(list)),
    }
}

/// Status bar label.
pub fn status_label(status: AnalysisStatus) -> &'static str {
    match status {
        AnalysisStatus::Waiting => "Waiting...",
        AnalysisStatus::SyntaxError => "Syntax error",
        AnalysisStatus::UnexpectedError => "Unexpected error!",
        AnalysisStatus::SomeUnjustified => "Some unjustified inferences",
        AnalysisStatus::AllJustified => "All inferences justified",
    }
}

/// One human-readable line per verdict.
pub fn describe_justification(j: &Justification) -> String {
    let line = j.loc.start.line;
    match (j.kind, j.rule.as_deref()) {
        (JustificationKind::NotJustified, _) => format!("Line {line}: Not justified"),
        (JustificationKind::Justified, None | Some("")) => format!("Line {line}: Justified proof"),
        (JustificationKind::Justified, Some(rule)) => format!("Line {line}: Justified by {rule}"),
    }
}

/// Detail lines for a state. Verdicts are listed in source order.
pub fn describe_state(state: &AnalysisState) -> Vec<String> {
    match state {
        AnalysisState::Waiting => vec![WAITING_TEXT.to_string()],
        AnalysisState::ExpectedError(err) => match &err.loc {
            Some(loc) => vec![format!("{} on line {}", err.message, loc.start.line)],
            None => vec![err.message.clone()],
        },
        AnalysisState::UnexpectedError(msg) => vec![msg.clone()],
        AnalysisState::HasJustifications(list) => {
            let mut sorted: Vec<&Justification> = list.iter().collect();
            sorted.sort_by_key(|j| j.loc.start);
            sorted.into_iter().map(describe_justification).collect()
        }
    }
}
