//! Property tests for the document model and its persisted encoding.

use std::collections::HashSet;

use art_core::{decode, encode, Document, GlyphId, Position};
use proptest::prelude::*;
use url::Url;

/// One user intent against the pure mutation API.
#[derive(Debug, Clone)]
enum Op {
    Add { text: String, x: i32, y: i32, size: u32 },
    Move { id: u64, dx: i32, dy: i32 },
    Scale { id: u64, factor: f64 },
    Remove { id: u64 },
    Background(Option<String>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => ("[⭐🍎🍋🥝a-z]{1,3}", -500i32..500, -500i32..500, 1u32..200)
            .prop_map(|(text, x, y, size)| Op::Add { text, x, y, size }),
        2 => (0u64..12, -50i32..50, -50i32..50).prop_map(|(id, dx, dy)| Op::Move { id, dx, dy }),
        2 => (0u64..12, 0.1f64..4.0).prop_map(|(id, factor)| Op::Scale { id, factor }),
        1 => (0u64..12).prop_map(|id| Op::Remove { id }),
        1 => proptest::option::of("[a-z]{1,8}")
            .prop_map(|name| Op::Background(name.map(|n| format!("https://{n}.example/bg.png")))),
    ]
}

fn apply(doc: Document, op: Op) -> Document {
    match op {
        Op::Add { text, x, y, size } => doc.add_glyph(text, Position::new(x, y), size).0,
        Op::Move { id, dx, dy } => doc.move_glyph(GlyphId::new(id), Position::new(dx, dy)),
        Op::Scale { id, factor } => doc.scale_glyph(GlyphId::new(id), factor),
        Op::Remove { id } => doc.remove_glyph(GlyphId::new(id)),
        Op::Background(url) => {
            doc.set_background(url.map(|u| Url::parse(&u).expect("generated url is valid")))
        }
    }
}

proptest! {
    #[test]
    fn prop_round_trip_is_lossless(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let doc = ops.into_iter().fold(Document::new(), apply);
        let bytes = encode(&doc).expect("encode");
        let decoded = decode(&bytes).expect("decode");
        prop_assert_eq!(decoded, doc);
    }

    #[test]
    fn prop_identities_stay_unique(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let doc = ops.into_iter().fold(Document::new(), apply);
        let ids: HashSet<_> = doc.glyphs().iter().map(|g| g.id()).collect();
        prop_assert_eq!(ids.len(), doc.len());
        prop_assert!(doc.glyphs().iter().all(|g| g.id() < doc.next_glyph_id()));
        prop_assert!(doc.glyphs().iter().all(|g| g.size() > 0));
    }

    #[test]
    fn prop_n_adds_yield_n_glyphs(n in 0usize..60) {
        let doc = (0..n).fold(Document::new(), |doc, i| {
            doc.add_glyph("⭐", Position::new(i32::try_from(i).unwrap_or(0), 0), 40).0
        });
        prop_assert_eq!(doc.len(), n);
        let ids: HashSet<_> = doc.glyphs().iter().map(|g| g.id()).collect();
        prop_assert_eq!(ids.len(), n);
    }

    #[test]
    fn prop_unknown_identity_is_noop(
        ops in proptest::collection::vec(op_strategy(), 0..20),
        dx in -100i32..100,
        factor in 0.1f64..5.0,
    ) {
        let doc = ops.into_iter().fold(Document::new(), apply);
        let missing = doc.next_glyph_id();
        prop_assert_eq!(&doc.clone().move_glyph(missing, Position::new(dx, dx)), &doc);
        prop_assert_eq!(&doc.clone().scale_glyph(missing, factor), &doc);
        prop_assert_eq!(&doc.clone().remove_glyph(missing), &doc);
    }
}

#[test]
fn test_identities_not_reused_after_reload() {
    let (doc, first) = Document::new().add_glyph("⭐", Position::ORIGIN, 40);
    let (doc, second) = doc.add_glyph("🍎", Position::ORIGIN, 40);
    let second = second.expect("second id");
    let doc = doc.remove_glyph(second);

    let reloaded = decode(&encode(&doc).expect("encode")).expect("decode");
    let (reloaded, third) = reloaded.add_glyph("🍋", Position::ORIGIN, 40);
    let third = third.expect("third id");

    assert_ne!(Some(third), first);
    assert_ne!(third, second);
    assert_eq!(reloaded.len(), 2);
}

#[test]
fn test_end_to_end_scenario() {
    let (doc, id) = Document::new().add_glyph("⭐", Position::new(0, 0), 40);
    let id = id.expect("first id");
    assert_eq!(id, GlyphId::new(1));
    assert_eq!(doc.len(), 1);

    let doc = doc.move_glyph(id, Position::new(10, -5));
    assert_eq!(doc.glyph(id).map(|g| g.position()), Some(Position::new(10, -5)));

    let doc = doc.scale_glyph(id, 2.0);
    assert_eq!(doc.glyph(id).map(|g| g.size()), Some(80));

    let decoded = decode(&encode(&doc).expect("encode")).expect("decode");
    let glyph = decoded.glyph(id).expect("glyph survives");
    assert_eq!(glyph.text(), "⭐");
    assert_eq!(glyph.position(), Position::new(10, -5));
    assert_eq!(glyph.size(), 80);
}
