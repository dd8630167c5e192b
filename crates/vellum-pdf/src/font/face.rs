//! A loaded TrueType face.
//!
//! Parsed once at registration: character map and horizontal metrics are
//! pulled into plain lookup structures so later measurement and shaping
//! never re-parse, while the raw bytes stay around for the subsetter.

use std::collections::BTreeMap;

use vellum_style::FontStyle;

use crate::error::FontError;

/// Index of a face inside a [`crate::font::FontLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceId(pub usize);

/// A parsed TrueType face with its raw bytes.
#[derive(Debug, Clone)]
pub struct FontFace {
    /// The raw font file bytes (the subsetter reads tables from these).
    pub data: Vec<u8>,
    /// Family name this face was registered under.
    pub family: String,
    /// Weight (400 normal, 700 bold).
    pub weight: u16,
    /// Style this face was registered under.
    pub style: FontStyle,
    /// Font design units per em square.
    pub units_per_em: u16,
    /// Typographic ascender in font units.
    pub ascent: i16,
    /// Typographic descender in font units (negative below baseline).
    pub descent: i16,
    /// Capital height in font units.
    pub cap_height: i16,
    /// x-height in font units.
    pub x_height: i16,
    /// Global bounding box `(x_min, y_min, x_max, y_max)` in font units.
    pub bbox: (i16, i16, i16, i16),
    /// True for italic/oblique faces.
    pub italic: bool,
    /// True for fixed-pitch faces.
    pub monospaced: bool,
    /// Number of glyphs.
    pub glyph_count: u16,
    /// PostScript name (used as the PDF BaseFont).
    pub postscript_name: String,
    cmap: BTreeMap<u32, u16>,
    advances: Vec<u16>,
}

impl FontFace {
    /// Parse a TrueType font file.
    ///
    /// # Errors
    ///
    /// [`FontError::UnparsableFace`] when `ttf-parser` rejects the bytes.
    pub fn parse(
        data: Vec<u8>,
        family: &str,
        weight: u16,
        style: FontStyle,
    ) -> Result<Self, FontError> {
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| FontError::UnparsableFace(e.to_string()))?;

        let units_per_em = face.units_per_em();
        let ascent = face.ascender();
        let descent = face.descender();
        let cap_height = face.capital_height().unwrap_or(ascent);
        let x_height = face.x_height().unwrap_or(ascent / 2);
        let bounding = face.global_bounding_box();
        let glyph_count = face.number_of_glyphs();

        // Flatten the unicode cmap subtables into one map; later subtables
        // do not override earlier entries.
        let mut cmap: BTreeMap<u32, u16> = BTreeMap::new();
        if let Some(table) = face.tables().cmap {
            for subtable in table.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|cp| {
                    if let Some(glyph) = subtable.glyph_index(cp) {
                        let _ = cmap.entry(cp).or_insert(glyph.0);
                    }
                });
            }
        }

        let advances: Vec<u16> = (0..glyph_count)
            .map(|g| {
                face.glyph_hor_advance(ttf_parser::GlyphId(g))
                    .unwrap_or(0)
            })
            .collect();

        let postscript_name = find_postscript_name(&face)
            .unwrap_or_else(|| family.split_whitespace().collect::<String>());

        Ok(Self {
            family: family.to_string(),
            weight,
            style,
            units_per_em,
            ascent,
            descent,
            cap_height,
            x_height,
            bbox: (
                bounding.x_min,
                bounding.y_min,
                bounding.x_max,
                bounding.y_max,
            ),
            italic: face.is_italic() || style.is_slanted(),
            monospaced: face.is_monospaced(),
            glyph_count,
            postscript_name,
            cmap,
            advances,
            data,
        })
    }

    /// Look up the glyph id for a code point via the cmap.
    #[must_use]
    pub fn glyph_index(&self, ch: char) -> Option<u16> {
        self.cmap.get(&(ch as u32)).copied()
    }

    /// Advance width of a glyph in font units.
    #[must_use]
    pub fn advance(&self, gid: u16) -> u16 {
        self.advances.get(gid as usize).copied().unwrap_or(0)
    }

    /// Scale factor from font units to px at the given font size.
    #[must_use]
    pub fn scale(&self, font_size: f32) -> f32 {
        if self.units_per_em == 0 {
            0.0
        } else {
            font_size / f32::from(self.units_per_em)
        }
    }

    /// Ascent in px at the given font size.
    #[must_use]
    pub fn ascent_px(&self, font_size: f32) -> f32 {
        f32::from(self.ascent) * self.scale(font_size)
    }

    /// Descent in px at the given font size (negative below baseline).
    #[must_use]
    pub fn descent_px(&self, font_size: f32) -> f32 {
        f32::from(self.descent) * self.scale(font_size)
    }

    /// Scale a font-unit value to the PDF glyph space of 1000 units/em.
    #[must_use]
    pub fn to_thousandths(&self, value: i16) -> f32 {
        if self.units_per_em == 0 {
            0.0
        } else {
            f32::from(value) * 1000.0 / f32::from(self.units_per_em)
        }
    }

    /// Sum the advance of `text` at `font_size`, adding `letter_spacing`
    /// per glyph. Unmapped code points contribute the `.notdef` advance.
    #[must_use]
    pub fn text_advance(&self, text: &str, font_size: f32, letter_spacing: f32) -> f32 {
        let scale = self.scale(font_size);
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| {
                let gid = self.glyph_index(ch).unwrap_or(0);
                f32::from(self.advance(gid)).mul_add(scale, letter_spacing)
            })
            .sum()
    }
}

fn find_postscript_name(face: &ttf_parser::Face<'_>) -> Option<String> {
    let names = face.names();
    for i in 0..names.len() {
        if let Some(name) = names.get(i)
            && name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME
            && let Some(value) = name.to_string()
            && !value.is_empty()
        {
            return Some(value);
        }
    }
    None
}
