//! CSS length values and the layout-time resolver.
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//!
//! Lengths arrive computed: relative units (em, rem, vw, vh) were already
//! resolved upstream, so the only remaining variants are absolute pixels,
//! percentages of a containing-block reference, and `auto`.

use serde::Serialize;

use crate::computed::BoxSizing;
use crate::error::StyleError;

/// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths)
///
/// A computed length value.
///
/// "Lengths refer to distance measurements and are denoted by `<length>` in
/// the property definitions."
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum Length {
    /// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
    ///
    /// "1px = 1/96th of 1in"
    Px(f32),

    /// [§ 4.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    ///
    /// "Percentage values are always relative to another quantity."
    ///
    /// Stored as a fraction of 100 (so `50%` is `Percent(50.0)`); resolved
    /// against a containing-block reference during layout.
    Percent(f32),

    /// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
    ///
    /// "This keyword allows the user agent to compute the value based on
    /// other properties."
    Auto,

    /// The zero sentinel: the initial value of most length properties.
    ///
    /// Distinct from `Px(0.0)` only so that `Default` is a `const`-friendly
    /// unit variant; it resolves to zero under every policy.
    #[default]
    Zero,
}

/// How `auto` resolves when a length is forced to a pixel value.
///
/// [§ 10.3 Calculating widths and margins](https://www.w3.org/TR/CSS2/visudet.html#Computing_widths_and_margins)
///
/// The meaning of `auto` depends on the property and the layout pass: an
/// auto margin is zero until the centering step runs, an auto width fills
/// the containing block, and some call sites must have eliminated `auto`
/// before resolving at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoPolicy {
    /// `auto` resolves to zero (margins, offsets, gaps).
    Zero,
    /// `auto` resolves to the full reference (block widths).
    Reference,
    /// `auto` is a caller bug at this point; resolution fails.
    Explicit,
}

impl Length {
    /// Returns true for the `auto` keyword.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Length::Auto)
    }

    /// Returns true for a definite (non-auto) value.
    #[must_use]
    pub const fn is_definite(&self) -> bool {
        !self.is_auto()
    }

    /// [§ 6.1 Used Values](https://www.w3.org/TR/css-cascade-4/#used)
    ///
    /// Resolve to pixels against a containing-block reference.
    ///
    /// "The used value is the result of taking the computed value and
    /// completing any remaining calculations to make it the absolute
    /// theoretical value used in the layout of the document."
    ///
    /// Percentages multiply the reference; `auto` follows `policy`. With
    /// [`AutoPolicy::Explicit`], `auto` resolves to zero — use
    /// [`Length::try_resolve`] to surface the error instead.
    #[must_use]
    pub fn resolve(&self, reference: f32, policy: AutoPolicy) -> f32 {
        match self {
            Length::Px(px) => *px,
            Length::Percent(pct) => reference * pct / 100.0,
            Length::Zero => 0.0,
            Length::Auto => match policy {
                AutoPolicy::Zero | AutoPolicy::Explicit => 0.0,
                AutoPolicy::Reference => reference,
            },
        }
    }

    /// Resolve to pixels, failing on `auto` under [`AutoPolicy::Explicit`].
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::BadLength`] when the value is `auto` and the
    /// caller declared it must already have been eliminated.
    pub fn try_resolve(&self, reference: f32, policy: AutoPolicy) -> Result<f32, StyleError> {
        if self.is_auto() && policy == AutoPolicy::Explicit {
            return Err(StyleError::BadLength(
                "'auto' reached an explicit-only resolution site".to_string(),
            ));
        }
        Ok(self.resolve(reference, policy))
    }

    /// Resolve a definite value, or fall back when `auto`.
    #[must_use]
    pub fn resolve_or(&self, reference: f32, fallback: f32) -> f32 {
        if self.is_auto() {
            fallback
        } else {
            self.resolve(reference, AutoPolicy::Zero)
        }
    }
}

/// [§ 10.4 Minimum and maximum widths](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
///
/// Apply CSS min/max clamping.
///
/// "The following algorithm describes how the two properties influence the
/// used value of the 'width' property: ... if the computed value of
/// 'min-width' is greater than the value of 'max-width', max-width is set
/// to the value of min-width."
///
/// Min therefore wins when the two conflict.
#[must_use]
pub fn clamp_min_max(value: f32, min: Option<f32>, max: Option<f32>) -> f32 {
    let mut v = value;
    if let Some(max) = max
        && v > max
    {
        v = max;
    }
    if let Some(min) = min
        && v < min
    {
        v = min;
    }
    v
}

/// [§ 4.4 box-sizing](https://www.w3.org/TR/css-box-4/#box-sizing)
///
/// Convert a specified size to a content-box size.
///
/// "The box-sizing property defines whether the width and height ... on an
/// element include padding and borders or not."
///
/// `extras` is the sum of padding and border on the relevant axis. Under
/// `border-box` the specified value includes them, so they are subtracted
/// (clamped at zero); under `content-box` the value passes through.
#[must_use]
pub fn adjust_for_box_sizing(value: f32, mode: BoxSizing, extras: f32) -> f32 {
    match mode {
        BoxSizing::ContentBox => value,
        BoxSizing::BorderBox => (value - extras).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_resolves_against_reference() {
        assert_eq!(Length::Percent(50.0).resolve(400.0, AutoPolicy::Zero), 200.0);
    }

    #[test]
    fn auto_follows_policy() {
        assert_eq!(Length::Auto.resolve(400.0, AutoPolicy::Zero), 0.0);
        assert_eq!(Length::Auto.resolve(400.0, AutoPolicy::Reference), 400.0);
    }

    #[test]
    fn explicit_policy_rejects_auto() {
        assert!(Length::Auto.try_resolve(400.0, AutoPolicy::Explicit).is_err());
        assert_eq!(
            Length::Px(12.0).try_resolve(400.0, AutoPolicy::Explicit),
            Ok(12.0)
        );
    }

    #[test]
    fn min_wins_over_max() {
        // min-width: 200, max-width: 100 — min takes precedence.
        assert_eq!(clamp_min_max(150.0, Some(200.0), Some(100.0)), 200.0);
        assert_eq!(clamp_min_max(150.0, None, Some(100.0)), 100.0);
        assert_eq!(clamp_min_max(50.0, Some(80.0), None), 80.0);
    }

    #[test]
    fn border_box_subtracts_extras() {
        assert_eq!(adjust_for_box_sizing(100.0, BoxSizing::BorderBox, 30.0), 70.0);
        assert_eq!(adjust_for_box_sizing(100.0, BoxSizing::ContentBox, 30.0), 100.0);
        // Never goes negative.
        assert_eq!(adjust_for_box_sizing(10.0, BoxSizing::BorderBox, 30.0), 0.0);
    }
}
