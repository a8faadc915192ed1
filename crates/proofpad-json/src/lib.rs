#![warn(missing_docs)]
//! `proofpad-json` - JSON integration for `proofpad-core`.
//!
//! This crate bridges engines that exchange JSON payloads into `proofpad-core`'s
//! [`AnalysisEngine`](proofpad_core::AnalysisEngine) interface, and projects
//! [`AnalysisState`](proofpad_core::AnalysisState) back into JSON and text for presentation
//! layers.

pub mod bridge;
pub mod presentation;

pub use bridge::{
    BridgeError, EvaluateFn, JsonEngine, PARSING_ERROR_NAME, ParseFn, analysis_error_from_value,
    justifications_from_value,
};
pub use presentation::{
    WAITING_TEXT, describe_justification, describe_state, justification_to_value,
    parse_error_to_value, render_state, state_to_value, status_label,
};
