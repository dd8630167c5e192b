//! Flex container and item values.
//!
//! [CSS Flexible Box Layout Module Level 1](https://www.w3.org/TR/css-flexbox-1/)

use serde::Serialize;

/// [§ 5.1 'flex-direction'](https://www.w3.org/TR/css-flexbox-1/#flex-direction-property)
///
/// "The flex-direction property specifies how flex items are placed in the
/// flex container, by setting the direction of the flex container's main
/// axis."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FlexDirection {
    /// "The flex container's main axis has the same orientation as the
    /// inline axis."
    #[default]
    Row,
    /// Row with reversed main-start and main-end.
    RowReverse,
    /// "The flex container's main axis has the same orientation as the
    /// block axis."
    Column,
    /// Column with reversed main-start and main-end.
    ColumnReverse,
}

impl FlexDirection {
    /// True when the main axis is horizontal.
    #[must_use]
    pub const fn is_row(&self) -> bool {
        matches!(self, FlexDirection::Row | FlexDirection::RowReverse)
    }

    /// True for the reversed variants.
    #[must_use]
    pub const fn is_reverse(&self) -> bool {
        matches!(self, FlexDirection::RowReverse | FlexDirection::ColumnReverse)
    }
}

/// [§ 5.2 'flex-wrap'](https://www.w3.org/TR/css-flexbox-1/#flex-wrap-property)
///
/// "The flex-wrap property controls whether the flex container is
/// single-line or multi-line."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FlexWrap {
    /// "The flex container is single-line."
    #[default]
    NoWrap,
    /// "The flex container is multi-line."
    Wrap,
    /// Multi-line with reversed cross axis (treated as `Wrap` for line
    /// packing; line order reversal is applied at placement).
    WrapReverse,
}

impl FlexWrap {
    /// True when items may wrap onto additional lines.
    #[must_use]
    pub const fn allows_wrapping(&self) -> bool {
        !matches!(self, FlexWrap::NoWrap)
    }
}

/// [§ 8.2 'justify-content'](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
///
/// "The justify-content property aligns flex items along the main axis of
/// the current line of the flex container."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum JustifyContent {
    /// "Flex items are packed toward the start of the line."
    #[default]
    FlexStart,
    /// "Flex items are packed toward the end of the line."
    FlexEnd,
    /// "Flex items are packed toward the center of the line."
    Center,
    /// "Flex items are evenly distributed in the line", first and last
    /// flush with the edges.
    SpaceBetween,
    /// Evenly distributed "with half-size spaces on either end."
    SpaceAround,
    /// Evenly distributed with equal spacing around every item.
    SpaceEvenly,
}

/// [§ 8.3 'align-items' / 'align-self'](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
///
/// "Flex items can be aligned in the cross axis of the current line of the
/// flex container."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AlignItems {
    /// "Stretch to fill the container" (the initial value).
    #[default]
    Stretch,
    /// "Cross-start margin edge placed flush with the line's cross-start."
    FlexStart,
    /// "Cross-end margin edge placed flush with the line's cross-end."
    FlexEnd,
    /// "Margin box centered in the cross axis."
    Center,
    /// "Participates in baseline alignment" (approximated as flex-start;
    /// mixed-baseline flex lines are out of scope).
    Baseline,
}

/// [§ 8.3 'align-self'](https://www.w3.org/TR/css-flexbox-1/#propdef-align-self)
///
/// Per-item override of the container's `align-items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AlignSelf {
    /// "Computes to the parent's align-items value."
    #[default]
    Auto,
    /// See [`AlignItems::Stretch`].
    Stretch,
    /// See [`AlignItems::FlexStart`].
    FlexStart,
    /// See [`AlignItems::FlexEnd`].
    FlexEnd,
    /// See [`AlignItems::Center`].
    Center,
    /// See [`AlignItems::Baseline`].
    Baseline,
}

impl AlignSelf {
    /// Resolve against the container's `align-items` fallback.
    #[must_use]
    pub const fn resolve(&self, fallback: AlignItems) -> AlignItems {
        match self {
            AlignSelf::Auto => fallback,
            AlignSelf::Stretch => AlignItems::Stretch,
            AlignSelf::FlexStart => AlignItems::FlexStart,
            AlignSelf::FlexEnd => AlignItems::FlexEnd,
            AlignSelf::Center => AlignItems::Center,
            AlignSelf::Baseline => AlignItems::Baseline,
        }
    }
}

/// [§ 8.4 'align-content'](https://www.w3.org/TR/css-flexbox-1/#align-content-property)
///
/// "The align-content property aligns a flex container's lines within the
/// flex container when there is extra space in the cross-axis."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AlignContent {
    /// "Lines stretch to take up the remaining space."
    #[default]
    Stretch,
    /// "Lines are packed toward the start of the flex container."
    FlexStart,
    /// "Lines are packed toward the end of the flex container."
    FlexEnd,
    /// "Lines are packed toward the center of the flex container."
    Center,
    /// "Lines are evenly distributed in the flex container."
    SpaceBetween,
    /// Evenly distributed with half-size spaces at the edges.
    SpaceAround,
    /// Evenly distributed with equal spacing everywhere.
    SpaceEvenly,
}
