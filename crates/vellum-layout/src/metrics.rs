//! Font metrics interface for text measurement during layout.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! Implementors provide per-glyph advance widths and ascent values; the
//! layout engine calls these to measure text for line breaking and run
//! placement. The render pipeline supplies an implementation backed by the
//! actual font faces so that layout measurement matches the advances the
//! PDF text operators will produce.

use vellum_style::ComputedStyle;

/// Text measurement backed by real (or approximated) font data.
pub trait FontMetrics {
    /// Measure the total advance width of `text` styled by `style`.
    ///
    /// This should sum the advance width of each glyph — including
    /// `letter-spacing` per glyph — matching the cursor advancement used
    /// during text rendering.
    fn text_width(&self, text: &str, style: &ComputedStyle) -> f32;

    /// The ascent above the alphabetic baseline at `style.font_size`, if
    /// real font metrics are available.
    ///
    /// Layout falls back to `0.75 × font-size` when this returns `None`.
    fn ascent(&self, style: &ComputedStyle) -> Option<f32>;
}

/// Approximate font metrics using fixed ratios.
///
/// Implementation note: without access to actual font data we use fixed
/// ratio approximations. The average advance width of Latin glyphs in a
/// proportional font is approximately 0.6× the font size (typical for
/// Helvetica/Arial body text). No ascent is claimed, so layout uses its
/// 0.75 × font-size fallback.
///
/// Used when no face resolves for a style, and in tests.
pub struct ApproximateFontMetrics;

/// Average glyph advance as a fraction of font size.
pub const ESTIMATED_ADVANCE_RATIO: f32 = 0.6;

impl FontMetrics for ApproximateFontMetrics {
    fn text_width(&self, text: &str, style: &ComputedStyle) -> f32 {
        let per_char = style
            .font_size
            .mul_add(ESTIMATED_ADVANCE_RATIO, style.letter_spacing);
        text.chars().filter(|ch| !ch.is_control()).count() as f32 * per_char
    }

    fn ascent(&self, _style: &ComputedStyle) -> Option<f32> {
        None
    }
}

/// The baseline fallback: ascent as a fraction of font size when no real
/// metrics exist.
pub const FALLBACK_ASCENT_RATIO: f32 = 0.75;

/// Resolve the ascent for a style: real metrics when available, else the
/// 0.75 × font-size fallback.
#[must_use]
pub fn resolve_ascent(metrics: &dyn FontMetrics, style: &ComputedStyle) -> f32 {
    metrics
        .ascent(style)
        .unwrap_or(style.font_size * FALLBACK_ASCENT_RATIO)
}
