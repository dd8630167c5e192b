//! Font selection values.
//!
//! [CSS Fonts Module Level 4](https://www.w3.org/TR/css-fonts-4/)

use serde::Serialize;

/// [§ 2.4 'font-weight'](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
///
/// Numeric weight for `font-weight: normal`.
pub const WEIGHT_NORMAL: u16 = 400;

/// [§ 2.4 'font-weight'](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
///
/// Numeric weight for `font-weight: bold`.
pub const WEIGHT_BOLD: u16 = 700;

/// [§ 2.3 'font-style'](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
///
/// "The 'font-style' property allows italic or oblique faces to be selected."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum FontStyle {
    /// "Selects a face that is classified as a normal face."
    #[default]
    Normal,
    /// "Selects a font that is labeled as an italic face."
    Italic,
    /// "Selects a font that is labeled as an oblique face."
    Oblique,
}

impl FontStyle {
    /// True for italic or oblique faces.
    #[must_use]
    pub const fn is_slanted(&self) -> bool {
        !matches!(self, FontStyle::Normal)
    }
}

/// [§ 6.1 'font-variant-caps'](https://www.w3.org/TR/css-fonts-4/#font-variant-caps-prop)
///
/// Only the CSS 2 subset is carried: `small-caps` is approximated at shaping
/// time by uppercasing (true small-cap glyph selection needs OpenType
/// features, which are out of scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FontVariant {
    /// "None of the features listed below are enabled."
    #[default]
    Normal,
    /// "Enables display of small capitals."
    SmallCaps,
}
