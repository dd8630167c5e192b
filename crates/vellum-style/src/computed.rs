//! The computed style record.
//!
//! [§ 6 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//!
//! "The computed value is the result of resolving the specified value ...
//! as far as possible without laying out the document."
//!
//! Cascade, inheritance, and unit resolution happen upstream; a
//! [`ComputedStyle`] carries only what layout and painting read. Every
//! field defaults to its CSS initial value.

use serde::Serialize;

use crate::color::Rgba;
use crate::display::Display;
use crate::flex::{
    AlignContent, AlignItems, AlignSelf, FlexDirection, FlexWrap, JustifyContent,
};
use crate::font::{FontStyle, FontVariant, WEIGHT_NORMAL};
use crate::length::Length;
use crate::text::{
    Clear, Float, OverflowWrap, TextAlign, TextDecorationLine, TextShadow, TextTransform,
    WhiteSpace,
};

/// [§ 9.3.1 'position'](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
///
/// "The 'position' and 'float' properties determine which of the CSS 2
/// positioning algorithms is used to calculate the position of a box."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Position {
    /// "The box is a normal box, laid out according to the normal flow."
    #[default]
    Static,
    /// "The box's position is calculated according to the normal flow ...
    /// then offset relative to its normal position."
    Relative,
    /// "The box's position is specified with the inset properties" relative
    /// to its containing block.
    Absolute,
    /// "The box's position is calculated according to the 'absolute' model,
    /// but ... fixed with respect to the viewport."
    Fixed,
    /// Sticky positioning; laid out as relative (scroll-driven stickiness
    /// does not apply to paginated output).
    Sticky,
}

impl Position {
    /// [§ 9.3.2](https://www.w3.org/TR/CSS2/visuren.html#position-props)
    ///
    /// "An element is said to be positioned if its 'position' property has
    /// a value other than 'static'."
    #[must_use]
    pub const fn is_positioned(&self) -> bool {
        !matches!(self, Position::Static)
    }

    /// True for the out-of-flow positioning schemes.
    #[must_use]
    pub const fn is_out_of_flow(&self) -> bool {
        matches!(self, Position::Absolute | Position::Fixed)
    }
}

/// [§ 11.1.1 'overflow'](https://www.w3.org/TR/CSS2/visufx.html#overflow)
///
/// "This property specifies whether content of a block container element is
/// clipped when it overflows the element's box."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Overflow {
    /// "Content is not clipped."
    #[default]
    Visible,
    /// "Content is clipped."
    Hidden,
    /// Clipped, with scrolling affordances (equivalent to hidden on paper).
    Auto,
    /// Clipped, always showing a scrolling mechanism (same on paper).
    Scroll,
    /// Clipped at the overflow clip edge with no scrolling at all.
    Clip,
}

impl Overflow {
    /// True when content is clipped to the padding box.
    #[must_use]
    pub const fn clips(&self) -> bool {
        !matches!(self, Overflow::Visible)
    }
}

/// [§ 9.9.1 'z-index'](https://www.w3.org/TR/CSS2/visuren.html#z-index)
///
/// "For a positioned box, the 'z-index' property specifies: 1. The stack
/// level of the box in the current stacking context. 2. Whether the box
/// establishes a stacking context."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ZIndex {
    /// "The stack level of the generated box in the current stacking
    /// context is 0. The box does not establish a new stacking context."
    #[default]
    Auto,
    /// "This integer is the stack level of the generated box ... The box
    /// also establishes a new stacking context."
    Integer(i32),
}

impl ZIndex {
    /// Stack level for sorting; `auto` sorts as level 0.
    #[must_use]
    pub const fn level(&self) -> i32 {
        match self {
            ZIndex::Auto => 0,
            ZIndex::Integer(z) => *z,
        }
    }
}

/// [§ 4.4 box-sizing](https://www.w3.org/TR/css-box-4/#box-sizing)
///
/// "The box-sizing property defines whether the width and height ...
/// include padding and borders or not."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BoxSizing {
    /// Specified sizes set the content box.
    #[default]
    ContentBox,
    /// Specified sizes set the border box.
    BorderBox,
}

/// [§ 11.2 'visibility'](https://www.w3.org/TR/CSS2/visufx.html#visibility)
///
/// "Invisible boxes still affect layout."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Visibility {
    /// "The generated box is visible."
    #[default]
    Visible,
    /// "The generated box is invisible (fully transparent, nothing is
    /// drawn), but still affects layout."
    Hidden,
}

/// [§ 17.6 Borders](https://www.w3.org/TR/CSS2/tables.html#borders)
///
/// "There are two distinct models for setting borders on table cells."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BorderModel {
    /// "Each cell has an individual border."
    #[default]
    Separate,
    /// "Borders are collapsed into a common border."
    Collapse,
}

/// A filter list entry.
///
/// [Filter Effects Module Level 1 § 10.9](https://www.w3.org/TR/filter-effects-1/#opacityEquivalent)
///
/// Only `opacity()` entries participate in this pipeline; they compose
/// multiplicatively with the `opacity` property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Filter {
    /// "Applies a transparency to the input image."
    Opacity(f32),
}

/// One side of a border.
///
/// [§ 8.5 Border properties](https://www.w3.org/TR/CSS2/box.html#border-properties)
///
/// "The border properties specify the width, color, and style of the border."
/// All styles render as solid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BorderSide {
    /// Border width.
    pub width: Length,
    /// Border color.
    pub color: Rgba,
}

impl BorderSide {
    /// A solid border of the given pixel width and color.
    #[must_use]
    pub const fn new(width: f32, color: Rgba) -> Self {
        Self {
            width: Length::Px(width),
            color,
        }
    }
}

/// [§ 5.1 'border-radius'](https://www.w3.org/TR/css-backgrounds-3/#border-radius)
///
/// Per-corner radii in pixels (circular corners only).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BorderRadius {
    /// Top-left corner radius.
    pub top_left: f32,
    /// Top-right corner radius.
    pub top_right: f32,
    /// Bottom-right corner radius.
    pub bottom_right: f32,
    /// Bottom-left corner radius.
    pub bottom_left: f32,
}

impl BorderRadius {
    /// The same radius on all four corners.
    #[must_use]
    pub const fn uniform(radius: f32) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_right: radius,
            bottom_left: radius,
        }
    }

    /// True when every corner is square.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.top_left == 0.0
            && self.top_right == 0.0
            && self.bottom_right == 0.0
            && self.bottom_left == 0.0
    }
}

/// A color stop in a gradient.
///
/// [§ 3.4.1 Color stops](https://www.w3.org/TR/css-images-3/#color-stop-syntax)
///
/// "If a color stop ... has no position, set its position to be equal
/// halfway between the preceding and following positions" — positions are
/// therefore optional here and interpolated by the shading manager.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    /// Stop position in [0, 1], if specified.
    pub offset: Option<f32>,
    /// Stop color.
    pub color: Rgba,
}

/// The geometry flavor of a gradient.
///
/// [§ 3.1 Linear gradients / § 3.2 Radial gradients](https://www.w3.org/TR/css-images-3/#gradients)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GradientKind {
    /// A linear gradient along the given angle (degrees; 180 = top-to-bottom
    /// as in `linear-gradient(to bottom, ...)`).
    Linear {
        /// Gradient line angle in degrees.
        angle_deg: f32,
    },
    /// A radial gradient from the box center to its farthest corner.
    Radial,
}

/// A background gradient: kind plus stop list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    /// Linear or radial.
    pub kind: GradientKind,
    /// At least two stops; missing positions are interpolated.
    pub stops: Vec<GradientStop>,
}

/// Per-side length values for margin, padding, or inset properties.
///
/// [§ 8 Box model](https://www.w3.org/TR/CSS2/box.html)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LengthEdges {
    /// Top edge.
    pub top: Length,
    /// Right edge.
    pub right: Length,
    /// Bottom edge.
    pub bottom: Length,
    /// Left edge.
    pub left: Length,
}

impl LengthEdges {
    /// The same value on all four sides.
    #[must_use]
    pub const fn uniform(length: Length) -> Self {
        Self {
            top: length,
            right: length,
            bottom: length,
            left: length,
        }
    }
}

/// The computed style of one box: everything layout and painting read.
///
/// [§ 6 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
///
/// `Default` is the CSS initial value for every property (with `font-size`
/// at the conventional 16px medium).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedStyle {
    // ===== Box generation =====
    /// [§ 2 The display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
    pub display: Display,
    /// [§ 9.3.1 'position'](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
    pub position: Position,
    /// [§ 9.5.1 'float'](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    pub float: Float,
    /// [§ 9.5.2 'clear'](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    pub clear: Clear,
    /// [§ 11.1.1 'overflow-x'](https://www.w3.org/TR/css-overflow-3/#overflow-properties)
    pub overflow_x: Overflow,
    /// [§ 11.1.1 'overflow-y'](https://www.w3.org/TR/css-overflow-3/#overflow-properties)
    pub overflow_y: Overflow,
    /// [§ 11.2 'visibility'](https://www.w3.org/TR/CSS2/visufx.html#visibility)
    pub visibility: Visibility,
    /// [§ 4.4 box-sizing](https://www.w3.org/TR/css-box-4/#box-sizing)
    pub box_sizing: BoxSizing,

    // ===== Sizing =====
    /// [§ 10.2 'width'](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
    pub width: Length,
    /// [§ 10.5 'height'](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
    pub height: Length,
    /// [§ 10.4 'min-width'](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
    pub min_width: Length,
    /// [§ 10.4 'max-width'](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
    pub max_width: Length,
    /// [§ 10.7 'min-height'](https://www.w3.org/TR/CSS2/visudet.html#min-max-heights)
    pub min_height: Length,
    /// [§ 10.7 'max-height'](https://www.w3.org/TR/CSS2/visudet.html#min-max-heights)
    pub max_height: Length,

    // ===== Edges =====
    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    ///
    /// "The value 'auto' is discussed in the section on calculating widths
    /// and margins." Margins can be auto; percentages resolve against the
    /// containing block width.
    pub margin: LengthEdges,
    /// [§ 8.4 Padding properties](https://www.w3.org/TR/CSS2/box.html#padding-properties)
    ///
    /// "Unlike margin properties, values for padding values cannot be
    /// negative" and cannot be auto.
    pub padding: LengthEdges,
    /// [§ 8.5 Border properties](https://www.w3.org/TR/CSS2/box.html#border-properties)
    ///
    /// `None` means the side has no explicit border (width 0 in layout;
    /// table layout substitutes per-model defaults for cell tags).
    pub border_top: Option<BorderSide>,
    /// Right border, see [`ComputedStyle::border_top`].
    pub border_right: Option<BorderSide>,
    /// Bottom border, see [`ComputedStyle::border_top`].
    pub border_bottom: Option<BorderSide>,
    /// Left border, see [`ComputedStyle::border_top`].
    pub border_left: Option<BorderSide>,
    /// [§ 5.1 'border-radius'](https://www.w3.org/TR/css-backgrounds-3/#border-radius)
    pub border_radius: BorderRadius,
    /// [§ 17.6 Border models](https://www.w3.org/TR/CSS2/tables.html#borders)
    pub border_model: BorderModel,

    // ===== Positioning offsets =====
    /// [§ 9.3.2 Box offsets](https://www.w3.org/TR/CSS2/visuren.html#position-props)
    ///
    /// top/right/bottom/left inset values for positioned boxes.
    pub inset: LengthEdges,

    // ===== Flex =====
    /// [§ 5.1 'flex-direction'](https://www.w3.org/TR/css-flexbox-1/#flex-direction-property)
    pub flex_direction: FlexDirection,
    /// [§ 5.2 'flex-wrap'](https://www.w3.org/TR/css-flexbox-1/#flex-wrap-property)
    pub flex_wrap: FlexWrap,
    /// [§ 7.2 'flex-grow'](https://www.w3.org/TR/css-flexbox-1/#flex-grow-property)
    pub flex_grow: f32,
    /// [§ 7.3 'flex-shrink'](https://www.w3.org/TR/css-flexbox-1/#flex-shrink-property)
    pub flex_shrink: f32,
    /// [§ 7.1 'flex-basis'](https://www.w3.org/TR/css-flexbox-1/#flex-basis-property)
    ///
    /// `Auto` means "use the item's width/content size".
    pub flex_basis: Length,
    /// [§ 8.2 'justify-content'](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
    pub justify_content: JustifyContent,
    /// [§ 8.3 'align-items'](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
    pub align_items: AlignItems,
    /// [§ 8.3 'align-self'](https://www.w3.org/TR/css-flexbox-1/#propdef-align-self)
    pub align_self: AlignSelf,
    /// [§ 8.4 'align-content'](https://www.w3.org/TR/css-flexbox-1/#align-content-property)
    pub align_content: AlignContent,
    /// [CSS Box Alignment § 8 'row-gap'](https://www.w3.org/TR/css-align-3/#gap-legacy)
    pub row_gap: Length,
    /// [CSS Box Alignment § 8 'column-gap'](https://www.w3.org/TR/css-align-3/#gap-legacy)
    pub column_gap: Length,

    // ===== Text =====
    /// [§ 2.1 'font-family'](https://www.w3.org/TR/css-fonts-4/#font-family-prop)
    ///
    /// A single resolved family name (generic-family fallback happened
    /// upstream).
    pub font_family: String,
    /// [§ 2.4 'font-weight'](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
    pub font_weight: u16,
    /// [§ 2.3 'font-style'](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
    pub font_style: FontStyle,
    /// [§ 6.1 'font-variant-caps'](https://www.w3.org/TR/css-fonts-4/#font-variant-caps-prop)
    pub font_variant: FontVariant,
    /// [§ 2.5 'font-size'](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
    ///
    /// Resolved pixels.
    pub font_size: f32,
    /// [§ 10.8 'line-height'](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// `Auto` means `normal` (resolved as 1.2 × font-size); percentages
    /// resolve against font-size.
    pub line_height: Length,
    /// [§ 8.2 'letter-spacing'](https://www.w3.org/TR/css-text-3/#letter-spacing-property)
    pub letter_spacing: f32,
    /// [§ 8.1 'word-spacing'](https://www.w3.org/TR/css-text-3/#word-spacing-property)
    pub word_spacing: f32,
    /// [§ 9.1 'text-indent'](https://www.w3.org/TR/css-text-3/#text-indent-property)
    pub text_indent: Length,
    /// [§ 16.2 'text-align'](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
    pub text_align: TextAlign,
    /// [§ 2.1 'text-transform'](https://www.w3.org/TR/css-text-3/#text-transform-property)
    pub text_transform: TextTransform,
    /// [§ 3 'text-decoration-line'](https://www.w3.org/TR/css-text-decoration-3/#text-decoration-line-property)
    pub text_decoration: TextDecorationLine,
    /// [§ 4 'text-shadow'](https://www.w3.org/TR/css-text-decoration-3/#text-shadow-property)
    pub text_shadows: Vec<TextShadow>,
    /// [§ 16.6 'white-space'](https://www.w3.org/TR/CSS2/text.html#white-space-prop)
    pub white_space: WhiteSpace,
    /// [§ 5.5 'overflow-wrap'](https://www.w3.org/TR/css-text-3/#overflow-wrap-property)
    pub overflow_wrap: OverflowWrap,

    // ===== Paint =====
    /// [§ 3.1 'color'](https://www.w3.org/TR/css-color-4/#the-color-property)
    pub color: Rgba,
    /// [§ 3.2 'background-color'](https://www.w3.org/TR/css-backgrounds-3/#background-color)
    pub background_color: Option<Rgba>,
    /// [§ 3.1 'background-image'](https://www.w3.org/TR/css-backgrounds-3/#background-image)
    ///
    /// A source key into the image store.
    pub background_image: Option<String>,
    /// A gradient background (takes precedence over `background_image`).
    pub background_gradient: Option<Gradient>,
    /// [§ 9.9.1 'z-index'](https://www.w3.org/TR/CSS2/visuren.html#z-index)
    pub z_index: ZIndex,
    /// [§ 3.2 'opacity'](https://www.w3.org/TR/css-color-4/#transparency)
    pub opacity: f32,
    /// Filter list (opacity entries only).
    pub filter: Vec<Filter>,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::default(),
            position: Position::default(),
            float: Float::default(),
            clear: Clear::default(),
            overflow_x: Overflow::default(),
            overflow_y: Overflow::default(),
            visibility: Visibility::default(),
            box_sizing: BoxSizing::default(),
            width: Length::Auto,
            height: Length::Auto,
            min_width: Length::Zero,
            max_width: Length::Auto,
            min_height: Length::Zero,
            max_height: Length::Auto,
            margin: LengthEdges::default(),
            padding: LengthEdges::default(),
            border_top: None,
            border_right: None,
            border_bottom: None,
            border_left: None,
            border_radius: BorderRadius::default(),
            border_model: BorderModel::default(),
            inset: LengthEdges::uniform(Length::Auto),
            flex_direction: FlexDirection::default(),
            flex_wrap: FlexWrap::default(),
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: Length::Auto,
            justify_content: JustifyContent::default(),
            align_items: AlignItems::default(),
            align_self: AlignSelf::default(),
            align_content: AlignContent::default(),
            row_gap: Length::Zero,
            column_gap: Length::Zero,
            font_family: String::new(),
            font_weight: WEIGHT_NORMAL,
            font_style: FontStyle::default(),
            font_variant: FontVariant::default(),
            font_size: 16.0,
            line_height: Length::Auto,
            letter_spacing: 0.0,
            word_spacing: 0.0,
            text_indent: Length::Zero,
            text_align: TextAlign::default(),
            text_transform: TextTransform::default(),
            text_decoration: TextDecorationLine::default(),
            text_shadows: Vec::new(),
            white_space: WhiteSpace::default(),
            overflow_wrap: OverflowWrap::default(),
            color: Rgba::BLACK,
            background_color: None,
            background_image: None,
            background_gradient: None,
            z_index: ZIndex::default(),
            opacity: 1.0,
            filter: Vec::new(),
        }
    }
}

impl ComputedStyle {
    /// The used value for `line-height: normal`, as a ratio of font-size.
    ///
    /// [§ 10.8.1](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// "We recommend a used value for 'normal' between 1.0 and 1.2."
    pub const NORMAL_LINE_HEIGHT_RATIO: f32 = 1.2;

    /// [§ 10.8 'line-height'](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// The resolved line height in pixels. Percentages resolve against
    /// font-size; `auto` means `normal`.
    #[must_use]
    pub fn resolved_line_height(&self) -> f32 {
        match self.line_height {
            Length::Auto => self.font_size * Self::NORMAL_LINE_HEIGHT_RATIO,
            other => other.resolve(self.font_size, crate::length::AutoPolicy::Zero),
        }
    }

    /// [§ 9.3.2](https://www.w3.org/TR/CSS2/visuren.html#position-props)
    ///
    /// True for a positioned box.
    #[must_use]
    pub const fn is_positioned(&self) -> bool {
        self.position.is_positioned()
    }

    /// The border width of a side (0 when the side has no border).
    #[must_use]
    pub fn border_width(&self, side: Option<BorderSide>, reference: f32) -> f32 {
        side.map_or(0.0, |b| {
            b.width.resolve(reference, crate::length::AutoPolicy::Zero)
        })
    }

    /// Effective group opacity: the `opacity` property multiplied by every
    /// `filter: opacity()` entry, clamped to [0, 1].
    #[must_use]
    pub fn effective_opacity(&self) -> f32 {
        let mut alpha = self.opacity;
        for filter in &self.filter {
            let Filter::Opacity(value) = filter;
            alpha *= value;
        }
        alpha.clamp(0.0, 1.0)
    }

    /// [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
    ///
    /// True when this box establishes a stacking context: a positioned box
    /// with explicit z-index, effective opacity below 1, or a non-empty
    /// filter list.
    #[must_use]
    pub fn establishes_stacking_context(&self) -> bool {
        (self.is_positioned() && !matches!(self.z_index, ZIndex::Auto))
            || self.effective_opacity() < 1.0
            || !self.filter.is_empty()
    }

    /// [§ 9.4.1](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    ///
    /// True when this box establishes a new block formatting context:
    /// floats, out-of-flow positioning, clipping overflow, and the
    /// `inline-block` / `table` / `inline-table` / `flow-root` display
    /// values all do.
    #[must_use]
    pub fn establishes_bfc(&self) -> bool {
        self.float.is_floated()
            || self.position.is_out_of_flow()
            || self.overflow_x.clips()
            || self.overflow_y.clips()
            || matches!(
                self.display,
                Display::InlineBlock | Display::Table | Display::InlineTable | Display::FlowRoot
            )
    }
}
