//! Decoding engine payloads.
//!
//! Engines that speak JSON report verdicts as an array of `{ loc, type, rule? }` objects and
//! failures as an error object. An error object whose `name` is `"ParsingError"` is a structured
//! parse error (`{ name, message, loc }`, `loc` may be `null`); any other payload is treated as an
//! unexpected failure and carried verbatim in the message.

use proofpad_core::{AnalysisEngine, AnalysisError, Justification, ParseError, SourceSpan};
use serde_json::Value;
use thiserror::Error;
use tracing::{trace, warn};

/// Error `name` that marks a structured parse error.
pub const PARSING_ERROR_NAME: &str = "ParsingError";

/// Errors produced while decoding engine payloads.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The verdict payload was not a JSON array.
    #[error("expected an array of verdicts, got {found}")]
    NotAnArray {
        /// JSON type of the payload.
        found: &'static str,
    },
    /// One entry of the verdict array did not have the expected shape.
    #[error("malformed verdict at index {index}: {source}")]
    MalformedVerdict {
        /// Position of the entry in the array.
        index: usize,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decode an engine verdict array.
pub fn justifications_from_value(value: &Value) -> Result<Vec<Justification>, BridgeError> {
    let Some(entries) = value.as_array() else {
        return Err(BridgeError::NotAnArray {
            found: json_type_name(value),
        });
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value::<Justification>(entry.clone())
                .map_err(|source| BridgeError::MalformedVerdict { index, source })
        })
        .collect()
}

/// Classify an engine error payload.
///
/// Only payloads named [`PARSING_ERROR_NAME`] become [`AnalysisError::Parse`]. A parse error
/// whose `loc` is missing, `null`, or malformed carries no location.
pub fn analysis_error_from_value(value: &Value) -> AnalysisError {
    let name = value.get("name").and_then(Value::as_str);
    if name != Some(PARSING_ERROR_NAME) {
        return AnalysisError::unexpected(value);
    }

    match serde_json::from_value::<ParseError>(value.clone()) {
        Ok(err) => err.into(),
        Err(source) => {
            warn!(error = %source, "bridge.malformed_parse_error");
            salvage_parse_error(value).into()
        }
    }
}

/// Keep whatever part of a malformed parse error still decodes: a missing message becomes empty
/// and a malformed `loc` is dropped.
fn salvage_parse_error(value: &Value) -> ParseError {
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let loc = value
        .get("loc")
        .filter(|loc| !loc.is_null())
        .and_then(|loc| serde_json::from_value::<SourceSpan>(loc.clone()).ok());
    ParseError::new(message, loc)
}

/// Callback type for the parse half of a [`JsonEngine`].
pub type ParseFn = Box<dyn FnMut(&str) -> Result<Value, Value>>;
/// Callback type for the evaluate half of a [`JsonEngine`].
pub type EvaluateFn = Box<dyn FnMut(&Value) -> Result<Value, Value>>;

/// An [`AnalysisEngine`] backed by two JSON-speaking callbacks.
///
/// `parse` turns text into an opaque JSON AST, `evaluate` turns that AST into a verdict array.
/// Either may fail with an error payload, which is classified by [`analysis_error_from_value`].
pub struct JsonEngine<P = ParseFn, V = EvaluateFn> {
    parse: P,
    evaluate: V,
}

impl<P, V> std::fmt::Debug for JsonEngine<P, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonEngine").finish_non_exhaustive()
    }
}

impl<P, V> JsonEngine<P, V>
where
    P: FnMut(&str) -> Result<Value, Value>,
    V: FnMut(&Value) -> Result<Value, Value>,
{
    /// Create an engine from its two halves.
    pub fn new(parse: P, evaluate: V) -> Self {
        Self { parse, evaluate }
    }
}

impl<P, V> AnalysisEngine for JsonEngine<P, V>
where
    P: FnMut(&str) -> Result<Value, Value>,
    V: FnMut(&Value) -> Result<Value, Value>,
{
    type Ast = Value;

    fn parse(&mut self, text: &str) -> Result<Value, AnalysisError> {
        (self.parse)(text).map_err(|payload| analysis_error_from_value(&payload))
    }

    fn evaluate(&mut self, ast: &Value) -> Result<Vec<Justification>, AnalysisError> {
        let verdicts = (self.evaluate)(ast).map_err(|payload| analysis_error_from_value(&payload))?;
        let list = justifications_from_value(&verdicts).map_err(AnalysisError::unexpected)?;
        trace!(verdicts = list.len(), "bridge.evaluate");
        Ok(list)
    }
}
