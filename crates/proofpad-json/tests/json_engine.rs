use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use proofpad_core::{
    AnalysisState, AnalysisStatus, Document, HighlightKind, HighlightRange, SyncOptions,
    SyncSession,
};
use proofpad_json::{JsonEngine, render_state, state_to_value};
use serde_json::{Value, json};

const PROGRAM: &str = "proof triv: T =\nbegin\nT\nend;";
const PAUSE: Duration = Duration::from_millis(1000);

/// A fake engine: programs without `end;` fail to parse at the last non-empty line, the text
/// `crash` fails with a non-parse error, and every line equal to `T` is justified by `hyp`.
fn fake_engine() -> JsonEngine<
    impl FnMut(&str) -> Result<Value, Value>,
    impl FnMut(&Value) -> Result<Value, Value>,
> {
    JsonEngine::new(
        |text: &str| {
            if text == "crash" {
                return Err(json!({ "name": "RangeError", "message": "too deep" }));
            }
            let lines: Vec<&str> = text.split('\n').collect();
            if !lines.contains(&"end;") {
                let line = lines.iter().rposition(|l| !l.is_empty()).unwrap_or(0) + 1;
                return Err(json!({
                    "name": "ParsingError",
                    "message": "Expected 'end;'",
                    "loc": {
                        "start": { "line": line, "column": 1 },
                        "end": { "line": line, "column": 2 }
                    }
                }));
            }
            Ok(json!(lines))
        },
        |ast: &Value| {
            let lines = ast.as_array().cloned().unwrap_or_default();
            let verdicts: Vec<Value> = lines
                .iter()
                .enumerate()
                .filter(|(_, l)| l.as_str() == Some("T"))
                .map(|(i, _)| {
                    json!({
                        "loc": {
                            "start": { "line": i + 1, "column": 1 },
                            "end": { "line": i + 1, "column": 2 }
                        },
                        "type": "Justified",
                        "rule": "hyp"
                    })
                })
                .collect();
            Ok(Value::Array(verdicts))
        },
    )
}

#[test]
fn test_json_engine_drives_session() {
    let mut s = SyncSession::new(
        Document::new(""),
        fake_engine(),
        SyncOptions::default().with_pause(PAUSE),
    );
    let t0 = Instant::now();
    s.load(PROGRAM, t0).unwrap();

    // `T` on line 1 (inside "proof triv: T =") is not a whole line; only line 3 is.
    assert_eq!(
        s.surface().decorations(),
        &[HighlightRange::new(22, 23, HighlightKind::Justified)]
    );
    assert_eq!(
        state_to_value(s.displayed()),
        json!({
            "state": "HasJustifications",
            "justifications": [{
                "loc": { "start": { "line": 3, "column": 1 }, "end": { "line": 3, "column": 2 } },
                "type": "Justified",
                "rule": "hyp"
            }]
        })
    );
}

#[test]
fn test_parse_error_payload_marks_error() {
    let mut s = SyncSession::new(
        Document::new(""),
        fake_engine(),
        SyncOptions::default().with_pause(PAUSE),
    );
    let t0 = Instant::now();
    s.load(PROGRAM, t0).unwrap();

    // Delete "end;".
    let len = s.surface().char_count();
    s.edit(len - 4, len, "", t0).unwrap();
    assert_eq!(render_state(s.displayed()), "...");

    assert!(s.poll(t0 + PAUSE));
    assert_eq!(s.displayed().status(), AnalysisStatus::SyntaxError);
    assert_eq!(
        s.overlay().ranges(),
        &[HighlightRange::new(22, 23, HighlightKind::Error)]
    );
    assert!(matches!(
        s.result(),
        AnalysisState::ExpectedError(e) if e.message == "Expected 'end;'"
    ));
}

#[test]
fn test_non_parse_payload_is_unexpected() {
    let mut s = SyncSession::new(
        Document::new(""),
        fake_engine(),
        SyncOptions::default().with_pause(PAUSE),
    );
    s.load("crash", Instant::now()).unwrap();

    assert!(s.overlay().is_empty());
    assert_eq!(
        render_state(s.displayed()),
        r#"Unexpected error: {"message":"too deep","name":"RangeError"}"#
    );
}

#[test]
fn test_render_expected_error_is_pretty_json() {
    let state = AnalysisState::ExpectedError(proofpad_core::ParseError::new("bad", None));
    let rendered = render_state(&state);

    let parsed: Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(
        parsed,
        json!({ "name": "ParsingError", "message": "bad", "loc": null })
    );
    assert!(rendered.contains('\n'));
}
