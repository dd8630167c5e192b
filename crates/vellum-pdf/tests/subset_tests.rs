//! Integration tests for font parsing, subsetting, and materialization.

mod common;

use vellum_pdf::{
    FontCatalog, FontLibrary, GlyphUsage, PdfDocument, ResolvedFont, build_subset, shape_run,
    subset_tag,
};
use vellum_style::{ComputedStyle, FontStyle};

fn library_with_sample() -> (FontLibrary, vellum_pdf::FaceId) {
    let mut library = FontLibrary::new();
    let id = library
        .add_face(common::sample_font(), "Test Sans", 400, FontStyle::Normal)
        .expect("fixture font must parse");
    (library, id)
}

fn style() -> ComputedStyle {
    ComputedStyle {
        font_family: "Test Sans".to_string(),
        font_size: 16.0,
        ..ComputedStyle::default()
    }
}

#[test]
fn fixture_face_parses_with_metrics_and_cmap() {
    let (library, id) = library_with_sample();
    let face = library.face(id);
    assert_eq!(face.units_per_em, 1000);
    assert_eq!(face.glyph_count, 5);
    assert_eq!(face.glyph_index('H'), Some(1));
    assert_eq!(face.glyph_index('o'), Some(4));
    assert_eq!(face.glyph_index('Z'), None);
    // 600/1000 × 16px per glyph.
    assert!((face.text_advance("Ho", 16.0, 0.0) - 19.2).abs() < 1e-4);
}

#[test]
fn shaping_maps_unmapped_codepoints_to_notdef() {
    let (library, id) = library_with_sample();
    let face = library.face(id);
    let run = shape_run(id, face, "HZ", 16.0, 0.0);
    assert_eq!(run.glyph_ids, vec![1, 0]);
    assert_eq!(run.chars, vec!['H', 'Z']);
}

#[test]
fn subset_contains_exactly_the_registered_glyphs() {
    let (library, id) = library_with_sample();
    let face = library.face(id);

    let mut usage = GlyphUsage::new();
    for (gid, ch) in [(1u16, 'H'), (2, 'e'), (3, 'l'), (4, 'o')] {
        usage.register(gid, Some(ch));
    }
    let subset = build_subset(face, &usage).expect("subsetting must succeed");

    // I5: the gid map covers the registered set exactly (no composites
    // in the fixture).
    let gids: Vec<u16> = subset.gid_map.keys().copied().collect();
    assert_eq!(gids, vec![1, 2, 3, 4]);
    // Injective, cid 0 reserved.
    let mut cids: Vec<u16> = subset.gid_map.values().copied().collect();
    cids.sort_unstable();
    cids.dedup();
    assert_eq!(cids.len(), 4);
    assert!(!cids.contains(&0));

    // The subset font file is itself a parseable TrueType face with one
    // glyph per cid (plus .notdef).
    let reparsed = ttf_parser::Face::parse(&subset.font_file, 0)
        .expect("subset bytes must be a valid font");
    assert_eq!(reparsed.number_of_glyphs(), 5);

    // ToUnicode covers every subset cid with the exact code points.
    let cmap_text = String::from_utf8_lossy(&subset.to_unicode);
    assert!(cmap_text.contains("<0001> <0048>")); // H
    assert!(cmap_text.contains("<0002> <0065>")); // e
    assert!(cmap_text.contains("<0003> <006c>")); // l
    assert!(cmap_text.contains("<0004> <006f>")); // o
}

#[test]
fn subset_tags_are_stable_and_set_sensitive() {
    let mut a = GlyphUsage::new();
    let mut b = GlyphUsage::new();
    for gid in [1u16, 2, 3] {
        a.register(gid, None);
        b.register(gid, None);
    }
    assert_eq!(subset_tag(&a), subset_tag(&b));

    b.register(4, None);
    assert_ne!(subset_tag(&a), subset_tag(&b));
}

#[test]
fn rendering_the_same_text_twice_yields_one_type0_font() {
    let (library, id) = library_with_sample();
    let mut catalog = FontCatalog::new();
    let mut doc = PdfDocument::new();

    // "Hello" shown twice with the same face.
    for _ in 0..2 {
        let face = library.face(id);
        let run = shape_run(id, face, "Hello", 16.0, 0.0);
        catalog.register_run(&run);
    }
    catalog.materialize(&mut doc, &library).unwrap();

    let refs = catalog.font_refs();
    assert_eq!(refs.len(), 1, "one Type0 object for one used glyph set");

    // A second materialization with unchanged usage must not mint a new
    // object.
    let before = doc.object_count();
    catalog.materialize(&mut doc, &library).unwrap();
    assert_eq!(doc.object_count(), before);
}

#[test]
fn growing_usage_materializes_a_fresh_ref() {
    let (library, id) = library_with_sample();
    let mut catalog = FontCatalog::new();
    let mut doc = PdfDocument::new();

    let run = shape_run(id, library.face(id), "He", 16.0, 0.0);
    catalog.register_run(&run);
    catalog.materialize(&mut doc, &library).unwrap();
    let first = *catalog.font_refs().values().next().unwrap();

    // New glyphs grow the set: the alias must move to a fresh ref while
    // existing cids stay stable.
    let cid_h = catalog.cid(id, 1);
    let run = shape_run(id, library.face(id), "lo", 16.0, 0.0);
    catalog.register_run(&run);
    catalog.materialize(&mut doc, &library).unwrap();
    let second = *catalog.font_refs().values().next().unwrap();

    assert_ne!(first, second);
    assert_eq!(catalog.cid(id, 1), cid_h);
}

#[test]
fn base14_fallback_for_unregistered_families() {
    let library = FontLibrary::new();
    let catalog = FontCatalog::new();
    let resolved = catalog.resolve(&library, &style(), "Hello");
    assert!(matches!(resolved, ResolvedFont::Base14(_)));
}

#[test]
fn subset_file_checksum_balances() {
    let (library, id) = library_with_sample();
    let mut usage = GlyphUsage::new();
    usage.register(1, Some('H'));
    let subset = build_subset(library.face(id), &usage).unwrap();

    // With checkSumAdjustment in place, the whole file sums to the
    // TrueType magic constant.
    let mut sum: u32 = 0;
    for chunk in subset.font_file.chunks(4) {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum = sum.wrapping_add(u32::from_be_bytes(word));
    }
    assert_eq!(sum, 0xB1B0_AFBA);
}
