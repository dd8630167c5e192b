//! Text, whitespace, and float values.
//!
//! [CSS Text Module Level 3](https://www.w3.org/TR/css-text-3/)
//! [CSS Text Decoration Module Level 3](https://www.w3.org/TR/css-text-decoration-3/)

use serde::Serialize;

use crate::color::Rgba;

/// [§ 16.2 Alignment: the 'text-align' property](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
///
/// "This property describes how inline-level content of a block container
/// is aligned."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TextAlign {
    /// "Inline-level content is aligned to the left line edge."
    #[default]
    Left,
    /// Logical start edge; equivalent to left under the supported
    /// left-to-right direction.
    Start,
    /// "Inline-level content is centered within the line box."
    Center,
    /// "Inline-level content is aligned to the right line edge."
    Right,
    /// Logical end edge; equivalent to right under LTR.
    End,
    /// "Text is justified ... except for the last line."
    Justify,
}

/// [§ 16.6 'white-space'](https://www.w3.org/TR/CSS2/text.html#white-space-prop)
///
/// "This property declares how white space inside the element is handled."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WhiteSpace {
    /// "Sequences of white space are collapsed. Lines are broken as
    /// necessary to fill line boxes."
    #[default]
    Normal,
    /// "Collapses white space as for 'normal', but suppresses line breaks."
    Nowrap,
    /// "Sequences of white space are preserved. Lines are only broken at
    /// preserved newline characters."
    Pre,
    /// "Sequences of white space are preserved. Lines are broken at
    /// preserved newline characters, and as necessary to fill line boxes."
    PreWrap,
    /// "Sequences of white space are collapsed. Lines are broken at
    /// preserved newline characters, and as necessary to fill line boxes."
    PreLine,
}

impl WhiteSpace {
    /// True when runs of spaces and tabs collapse to a single space.
    #[must_use]
    pub const fn collapses_spaces(&self) -> bool {
        matches!(
            self,
            WhiteSpace::Normal | WhiteSpace::Nowrap | WhiteSpace::PreLine
        )
    }

    /// True when newline characters force a line break.
    #[must_use]
    pub const fn preserves_newlines(&self) -> bool {
        matches!(
            self,
            WhiteSpace::Pre | WhiteSpace::PreWrap | WhiteSpace::PreLine
        )
    }

    /// True when soft wrapping is suppressed.
    #[must_use]
    pub const fn suppresses_wrapping(&self) -> bool {
        matches!(self, WhiteSpace::Nowrap | WhiteSpace::Pre)
    }
}

/// [§ 2.1 'text-transform'](https://www.w3.org/TR/css-text-3/#text-transform-property)
///
/// "This property transforms text for styling purposes."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TextTransform {
    /// "No effects."
    #[default]
    None,
    /// "Puts all letters in uppercase."
    Uppercase,
    /// "Puts all letters in lowercase."
    Lowercase,
    /// "Puts the first letter of each word, if lowercase, in titlecase."
    Capitalize,
}

impl TextTransform {
    /// Apply the transform to a text fragment.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        match self {
            TextTransform::None => text.to_string(),
            TextTransform::Uppercase => text.to_uppercase(),
            TextTransform::Lowercase => text.to_lowercase(),
            TextTransform::Capitalize => {
                // Titlecase the first letter of each whitespace-delimited
                // word, leaving the rest untouched.
                let mut out = String::with_capacity(text.len());
                let mut at_word_start = true;
                for ch in text.chars() {
                    if ch.is_whitespace() {
                        at_word_start = true;
                        out.push(ch);
                    } else if at_word_start {
                        at_word_start = false;
                        out.extend(ch.to_uppercase());
                    } else {
                        out.push(ch);
                    }
                }
                out
            }
        }
    }
}

/// [§ 3 Text Decoration Lines](https://www.w3.org/TR/css-text-decoration-3/#text-decoration-line-property)
///
/// "Specifies what line decorations, if any, are added to the element."
///
/// Multiple values combine (e.g. `underline line-through`); `Default` gives
/// all `false` = `none`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TextDecorationLine {
    /// "Each line of text has an underline."
    pub underline: bool,
    /// "Each line of text has a line over it."
    pub overline: bool,
    /// "Each line of text has a line through the middle."
    pub line_through: bool,
}

impl TextDecorationLine {
    /// True when any decoration line is set.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.underline || self.overline || self.line_through
    }
}

/// [§ 4 'text-shadow'](https://www.w3.org/TR/css-text-decoration-3/#text-shadow-property)
///
/// "This property accepts a comma-separated list of shadow effects to be
/// applied to the text of the element."
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextShadow {
    /// Horizontal offset in pixels.
    pub offset_x: f32,
    /// Vertical offset in pixels.
    pub offset_y: f32,
    /// Blur radius in pixels (0 = sharp).
    pub blur: f32,
    /// Shadow color.
    pub color: Rgba,
}

/// [§ 5.5 'overflow-wrap'](https://www.w3.org/TR/css-text-3/#overflow-wrap-property)
///
/// "This property specifies whether the UA may break at otherwise disallowed
/// points within a line to prevent overflow."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OverflowWrap {
    /// "Lines may break only at allowed break points."
    #[default]
    Normal,
    /// "An otherwise unbreakable sequence of characters may be broken at an
    /// arbitrary point if there are no otherwise-acceptable break points in
    /// the line."
    BreakWord,
}

/// [§ 9.5.1 'float'](https://www.w3.org/TR/CSS2/visuren.html#float-position)
///
/// "The element generates a block box that is floated to the left [or
/// right]."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Float {
    /// "The box is not floated."
    #[default]
    None,
    /// Floated to the left.
    Left,
    /// Floated to the right.
    Right,
}

impl Float {
    /// True for a floated box.
    #[must_use]
    pub const fn is_floated(&self) -> bool {
        !matches!(self, Float::None)
    }
}

/// [§ 9.5.2 'clear'](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
///
/// "This property indicates which sides of an element's box(es) may not be
/// adjacent to an earlier floating box."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Clear {
    /// "No constraint on the box's position with respect to floats."
    #[default]
    None,
    /// "The top border edge must be below any left-floating boxes."
    Left,
    /// "The top border edge must be below any right-floating boxes."
    Right,
    /// "The top border edge must be below any floating boxes."
    Both,
}
