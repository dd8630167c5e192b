//! The text shaper: code points to positioned glyphs.
//!
//! Shaping here is simple CMAP lookup plus advance accumulation — no
//! ligatures, no kerning, no bidi. The run it produces feeds both the
//! text renderer (positions, bytes) and the subsetter (glyph lifetimes).

use vellum_common::warn_once;

use crate::font::face::{FaceId, FontFace};

/// A shaped run: glyphs, per-glyph pen positions, and the source text.
#[derive(Debug, Clone)]
pub struct GlyphRun {
    /// The face the glyphs index into.
    pub face: FaceId,
    /// Glyph ids in visual order.
    pub glyph_ids: Vec<u16>,
    /// Pen position of each glyph, px, relative to the run origin.
    pub positions: Vec<(f32, f32)>,
    /// The character each glyph was mapped from (for ToUnicode).
    pub chars: Vec<char>,
    /// The source text.
    pub text: String,
    /// Font size in px.
    pub font_size: f32,
    /// Total advance in px.
    pub advance: f32,
}

/// Shape `text` against a face: per code point, look up the gid via the
/// CMAP; the advance is the glyph advance scaled to the font size plus
/// `letter_spacing`.
///
/// A code point with no glyph maps to `.notdef` (gid 0) and logs once —
/// the document still renders.
#[must_use]
pub fn shape_run(
    face_id: FaceId,
    face: &FontFace,
    text: &str,
    font_size: f32,
    letter_spacing: f32,
) -> GlyphRun {
    let scale = face.scale(font_size);
    let mut glyph_ids = Vec::new();
    let mut positions = Vec::new();
    let mut chars = Vec::new();
    let mut pen_x = 0.0_f32;

    for ch in text.chars() {
        if ch.is_control() {
            continue;
        }
        let gid = match face.glyph_index(ch) {
            Some(gid) => gid,
            None => {
                warn_once(
                    "Font",
                    &format!(
                        "no glyph for U+{:04X} in '{}', using .notdef",
                        ch as u32, face.family
                    ),
                );
                0
            }
        };
        glyph_ids.push(gid);
        positions.push((pen_x, 0.0));
        chars.push(ch);
        pen_x += f32::from(face.advance(gid)).mul_add(scale, letter_spacing);
    }

    GlyphRun {
        face: face_id,
        glyph_ids,
        positions,
        chars,
        text: text.to_string(),
        font_size,
        advance: pen_x,
    }
}
