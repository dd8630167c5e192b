//! Font metrics backed by the font library for accurate text measurement
//! during layout.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! This implementation queries the registered faces for exact per-glyph
//! advance widths, so layout measurement matches the advances the PDF
//! text operators later produce. Styles that resolve to no face fall back
//! to the same fixed-ratio estimator the Base14 path renders with.

use vellum_layout::metrics::{ESTIMATED_ADVANCE_RATIO, FontMetrics};
use vellum_pdf::FontLibrary;
use vellum_style::ComputedStyle;

/// [`FontMetrics`] implementation over a [`FontLibrary`].
pub struct LibraryFontMetrics<'a> {
    library: &'a FontLibrary,
}

impl<'a> LibraryFontMetrics<'a> {
    /// Measure against the given library.
    #[must_use]
    pub const fn new(library: &'a FontLibrary) -> Self {
        Self { library }
    }
}

impl FontMetrics for LibraryFontMetrics<'_> {
    fn text_width(&self, text: &str, style: &ComputedStyle) -> f32 {
        match self
            .library
            .resolve(&style.font_family, style.font_weight, style.font_style)
        {
            Some(id) => self.library.face(id).text_advance(
                text,
                style.font_size,
                style.letter_spacing,
            ),
            None => {
                // Estimator fallback, matching the Base14 render path.
                let per_char = style
                    .font_size
                    .mul_add(ESTIMATED_ADVANCE_RATIO, style.letter_spacing);
                text.chars().filter(|ch| !ch.is_control()).count() as f32 * per_char
            }
        }
    }

    fn ascent(&self, style: &ComputedStyle) -> Option<f32> {
        self.library
            .resolve(&style.font_family, style.font_weight, style.font_style)
            .map(|id| self.library.face(id).ascent_px(style.font_size))
    }
}
