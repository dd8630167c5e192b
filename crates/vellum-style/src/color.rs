//! RGBA color values.
//!
//! [CSS Color Module Level 4](https://www.w3.org/TR/css-color-4/)

use serde::Serialize;

/// An 8-bit-per-channel RGBA color.
///
/// [§ 4.1 The RGB functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
///
/// Colors arrive pre-parsed; this type only carries them through layout and
/// converts to the unit-interval channels PDF color operators expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgba {
    /// Red channel (0-255).
    pub r: u8,
    /// Green channel (0-255).
    pub g: u8,
    /// Blue channel (0-255).
    pub b: u8,
    /// Alpha channel (0 = transparent, 255 = opaque).
    pub a: u8,
}

impl Rgba {
    /// Opaque black, the initial `color` value in practice.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Construct an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Construct a color with explicit alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// True when the alpha channel is zero.
    #[must_use]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// True when the alpha channel is 255.
    #[must_use]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Alpha as a unit-interval fraction.
    #[must_use]
    pub fn alpha_f32(&self) -> f32 {
        f32::from(self.a) / 255.0
    }

    /// RGB channels as unit-interval fractions, the form the PDF `rg`/`RG`
    /// operators take.
    #[must_use]
    pub fn to_unit_rgb(&self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}
