//! Text emission: font resolution, shaping, shadows, decorations.
//!
//! [PDF 32000-1:2008 § 9.4 Text objects]
//!
//! For each inline run the renderer resolves a font resource, shapes the
//! text (simple CMAP lookup), registers every glyph with the subset
//! registry, draws text shadows beneath the run (rasterized through
//! fontdue when they blur or fade, plain offset text otherwise), emits
//! the `BT … ET` block, and finally the decoration rectangles.

use std::collections::BTreeMap;
use std::io::Write;

use image::RgbaImage;

use vellum_common::warn_once;
use vellum_layout::InlineRun;
use vellum_layout::metrics::ESTIMATED_ADVANCE_RATIO;
use vellum_style::{ComputedStyle, Rgba, TextShadow};

use crate::font::base14::encode_win_ansi_lossy;
use crate::font::face::FaceId;
use crate::font::registry::{FontCatalog, ResolvedFont};
use crate::font::shape::{GlyphRun, shape_run};
use crate::font::library::FontLibrary;
use crate::graphics::GraphicsStateManager;
use crate::image::{ImageRenderer, SHADOW_SRC_PREFIX};
use crate::object::format_number;
use crate::transform::CoordinateTransformer;

/// Mutable collaborators the text renderer works against.
pub struct TextEnv<'a> {
    /// Font registry (names, usage, materialization bookkeeping).
    pub catalog: &'a mut FontCatalog,
    /// Available faces.
    pub library: &'a FontLibrary,
    /// ExtGState allocation for translucent fills.
    pub gs: &'a mut GraphicsStateManager,
    /// px → pt conversion for the current page.
    pub transform: &'a CoordinateTransformer,
    /// Image registration for rasterized shadows.
    pub images: &'a mut ImageRenderer,
}

/// What `Tj` will show.
enum Payload {
    /// WinAnsi bytes for a Base14 font.
    WinAnsi(Vec<u8>),
    /// Two-byte big-endian subset CIDs for an embedded face.
    Cids(Vec<u16>),
}

/// Writes the text layer of one page.
#[derive(Default)]
pub struct TextRenderer {
    /// The accumulated text-layer content fragment.
    pub commands: Vec<u8>,
    /// (text, base font, size, blur, color) → registered image source.
    shadow_cache: BTreeMap<String, String>,
    raster_fonts: BTreeMap<FaceId, fontdue::Font>,
}

impl TextRenderer {
    /// A renderer with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw one inline run at its laid-out position.
    pub fn draw_run(&mut self, env: &mut TextEnv<'_>, run: &InlineRun, style: &ComputedStyle) {
        if run.text.is_empty() || !run.start_x.is_finite() || !run.baseline.is_finite() {
            if !run.text.is_empty() {
                warn_once("Render", "skipped text run with non-finite position");
            }
            return;
        }

        // STEP 1: Resolve the font resource for this run's style and text.
        let resolved = env.catalog.resolve(env.library, style, &run.text);
        let font_name = env.catalog.font_name(resolved);

        // STEP 2: Shape (or encode) the run.
        let (payload, shaped, natural_advance) = match resolved {
            ResolvedFont::Face(face_id) => {
                let face = env.library.face(face_id);
                let glyph_run = shape_run(
                    face_id,
                    face,
                    &run.text,
                    style.font_size,
                    style.letter_spacing,
                );
                // STEP 3: Every glyph id feeds the subset registry.
                env.catalog.register_run(&glyph_run);
                let cids: Vec<u16> = glyph_run
                    .glyph_ids
                    .iter()
                    .map(|&gid| env.catalog.cid(face_id, gid))
                    .collect();
                let advance = glyph_run.advance;
                (Payload::Cids(cids), Some(glyph_run), advance)
            }
            ResolvedFont::Base14(_) => {
                let advance = estimate_advance(&run.text, style);
                (Payload::WinAnsi(encode_win_ansi_lossy(&run.text)), None, advance)
            }
        };

        // Word spacing: layout folded `word-spacing` and any justification
        // stretch into the run width; the difference against the natural
        // shaped advance, spread over the space tokens, is the `Tw` value.
        let tw_px = if run.space_count > 0 {
            let delta = run.width - natural_advance;
            if delta.abs() > 0.01 {
                delta / run.space_count as f32
            } else {
                0.0
            }
        } else {
            0.0
        };

        // STEP 4: Shadows paint beneath the main run.
        for shadow in style.text_shadows.iter().rev() {
            self.draw_shadow(env, run, style, shadow, shaped.as_ref(), &payload, tw_px);
        }

        // STEP 5: The main run.
        self.emit_text(
            env,
            &font_name,
            style.font_size,
            run.start_x,
            run.baseline,
            &payload,
            tw_px,
            style.color,
        );

        // STEP 6: Decorations derive from font size and baseline.
        self.draw_decorations(env, run, style);
    }

    /// Emit one `BT … ET` block at a px position.
    fn emit_text(
        &mut self,
        env: &mut TextEnv<'_>,
        font_name: &str,
        font_size_px: f32,
        x_px: f32,
        baseline_px: f32,
        payload: &Payload,
        tw_px: f32,
        color: Rgba,
    ) {
        let size_pt = env.transform.length_pt(font_size_px);
        let x_pt = env.transform.x_pt(x_px);
        let y_pt = env.transform.y_pt(baseline_px);
        if !(x_pt.is_finite() && y_pt.is_finite()) {
            warn_once("Render", "skipped text with non-finite coordinates");
            return;
        }

        self.op("q");
        if !color.is_opaque() {
            let gs = env.gs.ensure_fill_alpha(color.alpha_f32());
            self.op(&format!("/{gs} gs"));
        }
        let (r, g, b) = color.to_unit_rgb();
        self.op(&format!(
            "{} {} {} rg",
            format_number(r),
            format_number(g),
            format_number(b)
        ));
        self.op("BT");
        if tw_px != 0.0 {
            self.op(&format!("{} Tw", format_number(env.transform.length_pt(tw_px))));
        }
        self.op(&format!("/{font_name} {} Tf", format_number(size_pt)));
        self.op(&format!(
            "1 0 0 1 {} {} Tm",
            format_number(x_pt),
            format_number(y_pt)
        ));
        let mut line = Vec::new();
        match payload {
            Payload::WinAnsi(bytes) => write_string_literal(&mut line, bytes),
            Payload::Cids(cids) => {
                let mut bytes = Vec::with_capacity(cids.len() * 2);
                for cid in cids {
                    bytes.extend_from_slice(&cid.to_be_bytes());
                }
                write_string_literal(&mut line, &bytes);
            }
        }
        line.extend_from_slice(b" Tj");
        self.commands.extend_from_slice(&line);
        self.commands.push(b'\n');
        if tw_px != 0.0 {
            self.op("0 Tw");
        }
        self.op("ET");
        self.op("Q");
    }

    /// Draw one text shadow.
    ///
    /// Blurred or translucent shadows rasterize into an RGBA image placed
    /// beneath the shapes layer; sharp opaque shadows are plain offset
    /// text in the text layer (which already precedes the main run).
    fn draw_shadow(
        &mut self,
        env: &mut TextEnv<'_>,
        run: &InlineRun,
        style: &ComputedStyle,
        shadow: &TextShadow,
        shaped: Option<&GlyphRun>,
        payload: &Payload,
        tw_px: f32,
    ) {
        let rasterize = shadow.blur > 0.0 || !shadow.color.is_opaque();
        if rasterize
            && let Some(glyph_run) = shaped
            && self.draw_raster_shadow(env, run, style, shadow, glyph_run)
        {
            return;
        }

        // Vector fallback: the same payload, offset and tinted.
        let resolved = env.catalog.resolve(env.library, style, &run.text);
        let font_name = env.catalog.font_name(resolved);
        self.emit_text(
            env,
            &font_name,
            style.font_size,
            run.start_x + shadow.offset_x,
            run.baseline + shadow.offset_y,
            payload,
            tw_px,
            shadow.color,
        );
    }

    /// Rasterize the whole run into a blurred, tinted RGBA image.
    /// Returns false when rasterization is not possible (no face data).
    fn draw_raster_shadow(
        &mut self,
        env: &mut TextEnv<'_>,
        run: &InlineRun,
        style: &ComputedStyle,
        shadow: &TextShadow,
        glyph_run: &GlyphRun,
    ) -> bool {
        let face = env.library.face(glyph_run.face);
        let cache_key = format!(
            "{}|{}|{:.1}|{}|{:02x}{:02x}{:02x}{:02x}",
            run.text,
            face.postscript_name,
            style.font_size,
            shadow.blur.round(),
            shadow.color.r,
            shadow.color.g,
            shadow.color.b,
            shadow.color.a,
        );

        let name = if let Some(name) = self.shadow_cache.get(&cache_key) {
            name.clone()
        } else {
            let font = match self.raster_font(glyph_run.face, face) {
                Some(font) => font,
                None => return false,
            };

            let ascent = face.ascent_px(style.font_size);
            let descent = face.descent_px(style.font_size);
            let pad = (shadow.blur.ceil() as u32) + 2;
            let width = (glyph_run.advance.ceil() as u32).max(1) + pad * 2;
            let height = ((ascent - descent).ceil() as u32).max(1) + pad * 2;
            let baseline_row = pad as f32 + ascent;

            // Composite every glyph's coverage into one alpha buffer.
            let mut coverage = vec![0u8; (width * height) as usize];
            for (index, ch) in glyph_run.chars.iter().enumerate() {
                let (metrics, bitmap) = font.rasterize(*ch, style.font_size);
                let pen_x = glyph_run.positions[index].0;
                let origin_x = pad as f32 + pen_x + metrics.xmin as f32;
                let origin_y = baseline_row - (metrics.ymin + metrics.height as i32) as f32;
                blend_coverage(
                    &mut coverage,
                    width,
                    height,
                    &bitmap,
                    metrics.width as u32,
                    metrics.height as u32,
                    origin_x as i32,
                    origin_y as i32,
                );
            }

            // A box blur applied three times approximates the Gaussian
            // with σ ≈ blur/2 closely enough at these radii.
            let radius = ((shadow.blur / 2.0).round() as u32).max(1);
            if shadow.blur > 0.0 {
                for _ in 0..3 {
                    box_blur(&mut coverage, width, height, radius);
                }
            }

            // Tint with the shadow color.
            let image = tint(&coverage, width, height, shadow.color);
            let src = format!("{SHADOW_SRC_PREFIX}{cache_key}");
            let name = env.images.register(&src, width, height, image.into_raw());
            let _ = self.shadow_cache.insert(cache_key, name.clone());
            name
        };

        let face = env.library.face(glyph_run.face);
        let ascent = face.ascent_px(style.font_size);
        let descent = face.descent_px(style.font_size);
        let pad = (shadow.blur.ceil() as u32) + 2;
        let width_px = (glyph_run.advance.ceil()).max(1.0) + (pad * 2) as f32;
        let height_px = ((ascent - descent).ceil()).max(1.0) + (pad * 2) as f32;
        let left_px = run.start_x + shadow.offset_x - pad as f32;
        let top_px = run.baseline - ascent + shadow.offset_y - pad as f32;

        env.images.draw(
            &name,
            env.transform.x_pt(left_px),
            env.transform.y_pt(top_px + height_px),
            env.transform.length_pt(width_px),
            env.transform.length_pt(height_px),
        );
        true
    }

    fn raster_font(&mut self, id: FaceId, face: &crate::font::FontFace) -> Option<&fontdue::Font> {
        if !self.raster_fonts.contains_key(&id) {
            match fontdue::Font::from_bytes(face.data.clone(), fontdue::FontSettings::default()) {
                Ok(font) => {
                    let _ = self.raster_fonts.insert(id, font);
                }
                Err(message) => {
                    warn_once("Font", &format!("shadow rasterization unavailable: {message}"));
                    return None;
                }
            }
        }
        self.raster_fonts.get(&id)
    }

    /// Underline / line-through / overline rectangles.
    ///
    /// [CSS Text Decoration § 3](https://www.w3.org/TR/css-text-decoration-3/#text-decoration-line-property)
    fn draw_decorations(&mut self, env: &mut TextEnv<'_>, run: &InlineRun, style: &ComputedStyle) {
        if !style.text_decoration.any() || run.width <= 0.0 {
            return;
        }
        let thickness = (style.font_size / 14.0).max(0.5);
        let mut lines: Vec<f32> = Vec::new();
        if style.text_decoration.underline {
            lines.push(run.baseline + style.font_size * 0.12);
        }
        if style.text_decoration.line_through {
            lines.push(run.baseline - style.font_size * 0.3);
        }
        if style.text_decoration.overline {
            lines.push(run.baseline - style.font_size * 0.85);
        }

        let (r, g, b) = style.color.to_unit_rgb();
        for top in lines {
            let x = env.transform.x_pt(run.start_x);
            let y = env.transform.y_pt(top + thickness);
            let w = env.transform.length_pt(run.width);
            let h = env.transform.length_pt(thickness);
            self.op("q");
            self.op(&format!(
                "{} {} {} rg",
                format_number(r),
                format_number(g),
                format_number(b)
            ));
            self.op(&format!(
                "{} {} {} {} re",
                format_number(x),
                format_number(y),
                format_number(w),
                format_number(h)
            ));
            self.op("f");
            self.op("Q");
        }
    }

    fn op(&mut self, text: &str) {
        self.commands.extend_from_slice(text.as_bytes());
        self.commands.push(b'\n');
    }
}

/// Estimated advance for Base14 text (matches the layout estimator so
/// `Tw` derivation stays consistent).
fn estimate_advance(text: &str, style: &ComputedStyle) -> f32 {
    let per_char = style
        .font_size
        .mul_add(ESTIMATED_ADVANCE_RATIO, style.letter_spacing);
    text.chars().filter(|ch| !ch.is_control()).count() as f32 * per_char
}

/// Write a literal string `(...)` escaping delimiters and non-printable
/// bytes (octal form), per the PDF literal string rules.
fn write_string_literal(out: &mut Vec<u8>, bytes: &[u8]) {
    out.push(b'(');
    for &byte in bytes {
        match byte {
            b'(' => out.extend_from_slice(b"\\("),
            b')' => out.extend_from_slice(b"\\)"),
            b'\\' => out.extend_from_slice(b"\\\\"),
            0x20..=0x7E => out.push(byte),
            _ => {
                let _ = write!(out, "\\{byte:03o}");
            }
        }
    }
    out.push(b')');
}

/// Max-blend a glyph coverage bitmap into the combined buffer.
fn blend_coverage(
    buffer: &mut [u8],
    buf_width: u32,
    buf_height: u32,
    bitmap: &[u8],
    width: u32,
    height: u32,
    origin_x: i32,
    origin_y: i32,
) {
    for row in 0..height {
        for col in 0..width {
            let x = origin_x + col as i32;
            let y = origin_y + row as i32;
            if x < 0 || y < 0 || x >= buf_width as i32 || y >= buf_height as i32 {
                continue;
            }
            let src = bitmap[(row * width + col) as usize];
            let dst = &mut buffer[(y as u32 * buf_width + x as u32) as usize];
            *dst = (*dst).max(src);
        }
    }
}

/// One separable box-blur pass over an alpha buffer.
fn box_blur(buffer: &mut [u8], width: u32, height: u32, radius: u32) {
    let r = radius as i32;
    let window = (2 * r + 1) as u32;

    // Horizontal.
    let mut pass = vec![0u8; buffer.len()];
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let mut sum: u32 = 0;
            for dx in -r..=r {
                let sx = (x + dx).clamp(0, width as i32 - 1);
                sum += u32::from(buffer[(y * width as i32 + sx) as usize]);
            }
            pass[(y * width as i32 + x) as usize] = (sum / window) as u8;
        }
    }
    // Vertical.
    for x in 0..width as i32 {
        for y in 0..height as i32 {
            let mut sum: u32 = 0;
            for dy in -r..=r {
                let sy = (y + dy).clamp(0, height as i32 - 1);
                sum += u32::from(pass[(sy * width as i32 + x) as usize]);
            }
            buffer[(y * width as i32 + x) as usize] = (sum / window) as u8;
        }
    }
}

/// Coverage tinted with the shadow color, as a straight-alpha RGBA image.
fn tint(coverage: &[u8], width: u32, height: u32, color: Rgba) -> RgbaImage {
    let mut out = RgbaImage::new(width, height);
    let shadow_alpha = f32::from(color.a) / 255.0;
    for (pixel, &a) in out.pixels_mut().zip(coverage) {
        *pixel = image::Rgba([
            color.r,
            color.g,
            color.b,
            (f32::from(a) * shadow_alpha) as u8,
        ]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_escaping_covers_binary() {
        let mut out = Vec::new();
        write_string_literal(&mut out, &[0x00, b'A', b'(', 0xFF]);
        assert_eq!(String::from_utf8(out).unwrap(), "(\\000A\\(\\377)");
    }

    #[test]
    fn box_blur_spreads_coverage() {
        let mut buf = vec![0u8; 25];
        buf[12] = 255;
        box_blur(&mut buf, 5, 5, 1);
        assert!(buf[12] > 0);
        assert!(buf[7] > 0); // one row up
        assert!(buf[12] < 255); // energy spread out
    }
}
