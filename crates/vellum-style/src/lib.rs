//! Computed style model for the Vellum renderer.
//!
//! The layout and render crates consume a box tree whose nodes carry
//! *computed* style — cascading, inheritance, and parsing have already
//! happened upstream. This crate defines the value types those computed
//! styles are made of:
//!
//! - [`length`] - Lengths and the policy-driven resolver
//! - [`color`] - RGBA colors
//! - [`display`] - The display property
//! - [`font`] - Font selection values
//! - [`text`] - Text and whitespace values
//! - [`flex`] - Flex container and item values
//! - [`computed`] - The [`ComputedStyle`] record itself
//!
//! # Relevant Specifications
//!
//! - [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//! - [CSS Display Module Level 3](https://www.w3.org/TR/css-display-3/)
//! - [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)

pub mod color;
pub mod computed;
pub mod display;
pub mod error;
pub mod flex;
pub mod font;
pub mod length;
pub mod text;

// Re-exports for convenience
pub use color::Rgba;
pub use computed::{
    BorderModel, BorderRadius, BorderSide, BoxSizing, ComputedStyle, Filter, Gradient,
    GradientKind, GradientStop, LengthEdges, Overflow, Position, Visibility, ZIndex,
};
pub use display::Display;
pub use error::StyleError;
pub use flex::{AlignContent, AlignItems, AlignSelf, FlexDirection, FlexWrap, JustifyContent};
pub use font::{FontStyle, FontVariant};
pub use length::{AutoPolicy, Length, adjust_for_box_sizing, clamp_min_max};
pub use text::{
    Clear, Float, OverflowWrap, TextAlign, TextDecorationLine, TextShadow, TextTransform,
    WhiteSpace,
};
