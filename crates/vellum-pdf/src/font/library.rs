//! The font library: registered faces and (family, weight, style)
//! resolution.
//!
//! [CSS Fonts § 5.2 Matching font styles](https://www.w3.org/TR/css-fonts-4/#font-style-matching)
//!
//! Resolution walks: exact family match (case-insensitive), then style
//! preference (exact style, then normal, then anything), then nearest
//! weight by absolute distance. Fallback through other families is the
//! caller's concern (the catalog falls back to Base14).

use vellum_style::FontStyle;

use crate::error::FontError;
use crate::font::face::{FaceId, FontFace};

/// All faces available to a render.
#[derive(Debug, Default)]
pub struct FontLibrary {
    faces: Vec<FontFace>,
}

impl FontLibrary {
    /// An empty library (every resolution will fall back to Base14).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and register a face.
    ///
    /// # Errors
    ///
    /// Propagates [`FontError::UnparsableFace`] from parsing.
    pub fn add_face(
        &mut self,
        data: Vec<u8>,
        family: &str,
        weight: u16,
        style: FontStyle,
    ) -> Result<FaceId, FontError> {
        let face = FontFace::parse(data, family, weight, style)?;
        self.faces.push(face);
        Ok(FaceId(self.faces.len() - 1))
    }

    /// Number of registered faces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// True when no face is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Borrow a face.
    ///
    /// # Panics
    /// Panics when `id` is out of bounds.
    #[must_use]
    pub fn face(&self, id: FaceId) -> &FontFace {
        &self.faces[id.0]
    }

    /// Resolve a family/weight/style triple to the best registered face.
    #[must_use]
    pub fn resolve(&self, family: &str, weight: u16, style: FontStyle) -> Option<FaceId> {
        let candidates: Vec<usize> = self
            .faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.family.eq_ignore_ascii_case(family))
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            return None;
        }

        // Style preference: exact, then normal, then whatever exists.
        let style_matches = |wanted: FontStyle| -> Vec<usize> {
            candidates
                .iter()
                .copied()
                .filter(|&i| self.faces[i].style == wanted)
                .collect()
        };
        let mut pool = style_matches(style);
        if pool.is_empty() && style != FontStyle::Normal {
            pool = style_matches(FontStyle::Normal);
        }
        if pool.is_empty() {
            pool = candidates;
        }

        // Nearest weight wins; ties break toward the earlier registration.
        pool.into_iter()
            .min_by_key(|&i| {
                let d = i32::from(self.faces[i].weight) - i32::from(weight);
                d.abs()
            })
            .map(FaceId)
    }
}
