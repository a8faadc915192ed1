use std::time::{Duration, Instant};

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use proofpad_core::{
    AnnotationOverlay, Debouncer, Document, JustificationMark, LineIndex, OverlayEffect,
    SourcePosition, SourceSpan,
};

fn large_proof(step_count: usize) -> String {
    let mut out = String::with_capacity(step_count * 32);
    out.push_str("proof big: A & B => B & A =\nbegin\n");
    for i in 0..step_count {
        out.push_str(&format!("[ A & B; A; B; step{i:05} ];\n"));
    }
    out.push_str("end;");
    out
}

fn overlay_for(index: &LineIndex) -> AnnotationOverlay {
    let spans: Vec<SourceSpan> = (3..index.line_count())
        .map(|line| SourceSpan::new(SourcePosition::new(line, 1), SourcePosition::new(line, 10)))
        .collect();

    let mut overlay = AnnotationOverlay::new();
    overlay.apply(OverlayEffect::justifications(
        index,
        spans.iter().map(|s| (s, true)),
    ));
    overlay
}

fn bench_set_justifications(c: &mut Criterion) {
    let text = large_proof(5_000);
    let index = LineIndex::from_text(&text);

    c.bench_function("overlay/set_justifications_5k", |b| {
        b.iter(|| black_box(overlay_for(&index)).len())
    });
}

fn bench_remap_typing(c: &mut Criterion) {
    let text = large_proof(5_000);
    let index = LineIndex::from_text(&text);

    c.bench_function("overlay/remap_100_inserts", |b| {
        b.iter_batched(
            || (Document::new(&text), overlay_for(&index)),
            |(mut doc, mut overlay)| {
                let mut offset = doc.char_count() / 2;
                for _ in 0..100 {
                    if let Ok(update) = doc.insert(offset, "x") {
                        overlay.remap(&update.delta);
                    }
                    offset += 1;
                }
                black_box(overlay.len());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_clear_and_replace(c: &mut Criterion) {
    let marks: Vec<JustificationMark> = (0..5_000)
        .map(|i| JustificationMark {
            from: i * 10,
            to: i * 10 + 5,
            justified: i % 3 != 0,
        })
        .collect();

    c.bench_function("overlay/replace_then_clear", |b| {
        b.iter_batched(
            || marks.clone(),
            |marks| {
                let mut overlay = AnnotationOverlay::new();
                overlay.apply(OverlayEffect::SetJustifications(marks));
                overlay.apply(OverlayEffect::Clear);
                black_box(overlay.is_empty());
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_debounce_burst(c: &mut Criterion) {
    c.bench_function("debounce/burst_1000", |b| {
        b.iter(|| {
            let t0 = Instant::now();
            let mut debouncer: Debouncer<usize, usize> =
                Debouncer::new(0, Duration::from_millis(100), |u: &usize| *u);
            for i in 0..1_000u64 {
                debouncer.submit(i as usize, t0 + Duration::from_millis(i));
            }
            black_box(debouncer.poll(t0 + Duration::from_secs(5)))
        })
    });
}

criterion_group!(
    benches,
    bench_set_justifications,
    bench_remap_typing,
    bench_clear_and_replace,
    bench_debounce_burst
);
criterion_main!(benches);
