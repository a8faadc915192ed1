use proofpad_core::{
    AnnotationOverlay, Document, HighlightKind, JustificationMark, OverlayEffect,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_overlay(rng: &mut StdRng, len: usize) -> AnnotationOverlay {
    let mut marks = Vec::new();
    let mut cursor = 0;
    while cursor + 2 < len {
        let from = rng.gen_range(cursor..len - 1);
        let to = rng.gen_range(from + 1..len);
        marks.push(JustificationMark {
            from,
            to,
            justified: rng.gen_bool(0.5),
        });
        cursor = to;
    }

    let mut overlay = AnnotationOverlay::new();
    overlay.apply(OverlayEffect::SetJustifications(marks));
    overlay
}

#[test]
fn test_remap_never_grows_range_count() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..200 {
        let mut doc = Document::new(&"proof step\n".repeat(8));
        let mut overlay = random_overlay(&mut rng, doc.char_count());

        for _ in 0..20 {
            let len = doc.char_count();
            let start = rng.gen_range(0..=len);
            let end = rng.gen_range(start..=len.min(start + 6));
            let insert = if rng.gen_bool(0.5) { "xy\n" } else { "" };

            let update = doc.replace_range(start, end, insert).unwrap();
            let before = overlay.len();
            overlay.remap(&update.delta);

            assert!(overlay.len() <= before);
            for range in overlay.ranges() {
                assert!(range.from < range.to);
                assert!(range.to <= doc.char_count());
            }
            assert!(
                overlay
                    .ranges()
                    .windows(2)
                    .all(|w| w[0].from <= w[1].from)
            );
        }
    }
}

#[test]
fn test_remap_tracks_highlighted_text() {
    let mut doc = Document::new("proof triv: T =\nbegin\nT\nend;");
    let mut overlay = AnnotationOverlay::new();
    overlay.apply(OverlayEffect::SetError { from: 16, to: 21 });

    let update = doc.insert(0, "% comment\n").unwrap();
    overlay.remap(&update.delta);

    let range = overlay.ranges()[0];
    assert_eq!(range.kind, HighlightKind::Error);
    assert_eq!(doc.line_index().slice_text(range.from, range.to), "begin");

    let update = doc.delete(range.from, range.to).unwrap();
    overlay.remap(&update.delta);
    assert!(overlay.is_empty());
}
