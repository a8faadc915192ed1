//! Settle replay example
//!
//! Replays a typing session against a toy proof checker with a simulated clock, printing what a
//! presentation layer would show after every step.

use std::time::{Duration, Instant};

use proofpad_core::{
    AnalysisEngine, AnalysisError, AnalysisState, Document, Justification, JustificationKind,
    ParseError, SourcePosition, SourceSpan, SyncOptions, SyncSession,
};

const INIT_PROGRAM: &str = "proof triv: T =\nbegin\nT\nend;";

/// Toy checker: every line between `begin` and `end;` is a step. `T` is always justified, any
/// other step is justified only if it already appeared as an earlier step.
struct ToyChecker;

struct Step {
    line: usize,
    text: String,
}

impl AnalysisEngine for ToyChecker {
    type Ast = Vec<Step>;

    fn parse(&mut self, text: &str) -> Result<Vec<Step>, AnalysisError> {
        let lines: Vec<&str> = text.lines().collect();
        let Some(begin) = lines.iter().position(|l| l.trim() == "begin") else {
            return Err(ParseError::new("Expected 'begin'", None).into());
        };
        let Some(end) = lines.iter().rposition(|l| l.trim() == "end;") else {
            let line = lines.len().max(1);
            let loc = SourceSpan::new(SourcePosition::new(line, 1), SourcePosition::new(line, 2));
            return Err(ParseError::new("Expected 'end;'", Some(loc)).into());
        };

        Ok(lines[begin + 1..end.max(begin + 1)]
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(i, l)| Step {
                line: begin + i + 2,
                text: l.trim().to_string(),
            })
            .collect())
    }

    fn evaluate(&mut self, ast: &Vec<Step>) -> Result<Vec<Justification>, AnalysisError> {
        let mut known: Vec<&str> = Vec::new();
        let mut out = Vec::new();
        for step in ast {
            let justified = step.text == "T" || known.contains(&step.text.as_str());
            out.push(Justification {
                loc: SourceSpan::new(
                    SourcePosition::new(step.line, 1),
                    SourcePosition::new(step.line, step.text.chars().count() + 1),
                ),
                kind: if justified {
                    JustificationKind::Justified
                } else {
                    JustificationKind::NotJustified
                },
                rule: justified.then(|| "hyp".to_string()),
            });
            known.push(&step.text);
        }
        Ok(out)
    }
}

fn show(label: &str, session: &SyncSession<Document, ToyChecker>) {
    println!("{label}");
    println!("  text: {:?}", session.surface().text());
    match session.displayed() {
        AnalysisState::Waiting => println!("  state: waiting..."),
        AnalysisState::ExpectedError(err) => println!("  state: syntax error: {err}"),
        AnalysisState::UnexpectedError(msg) => println!("  state: {msg}"),
        AnalysisState::HasJustifications(list) => {
            println!("  state: {} verdicts ({:?})", list.len(), session.displayed().status())
        }
    }
    for range in session.surface().decorations() {
        println!(
            "  [{}..{}) {}",
            range.from,
            range.to,
            range.kind.class_name()
        );
    }
}

fn main() {
    let pause = Duration::from_millis(500);
    let mut document = Document::new("");
    document.subscribe(|update| {
        for edit in &update.delta.edits {
            println!(
                "  [v{}] {:?} -> {:?} at {}",
                update.version, edit.deleted_text, edit.inserted_text, edit.start
            );
        }
    });

    let mut session = SyncSession::new(
        document,
        ToyChecker,
        SyncOptions::default().with_pause(pause),
    );

    let t0 = Instant::now();
    if let Err(err) = session.load(INIT_PROGRAM, t0) {
        eprintln!("failed to load initial program: {err}");
        return;
    }
    show("1. Initial program:", &session);

    // Type "\nQ" after the `T` step, one keystroke every 100ms.
    let insert_at = INIT_PROGRAM.find("T\nend").map(|i| i + 1).unwrap_or(0);
    let mut now = t0;
    for (i, ch) in "\nQ".chars().enumerate() {
        now += Duration::from_millis(100);
        if let Err(err) = session.edit(insert_at + i, insert_at + i, &ch.to_string(), now) {
            eprintln!("edit failed: {err}");
            return;
        }
        session.poll(now);
    }
    show("\n2. While typing:", &session);

    now += pause;
    session.poll(now);
    show("\n3. After the pause:", &session);

    // Break the program by deleting `end;`.
    let text = session.surface().text();
    let end = text.chars().count();
    if session.edit(end - 4, end, "", now).is_ok() {
        now += pause;
        session.poll(now);
    }
    show("\n4. Missing end:", &session);
}
