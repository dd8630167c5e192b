//! Shape emission: rectangles, rounded rectangles, paths, rings, clips.
//!
//! [PDF 32000-1:2008 § 8.5 Path construction and painting]
//!
//! All coordinates here are PDF points with the origin at the bottom-left
//! (the caller converts from layout px). Painting with alpha goes through
//! an ExtGState name supplied by the caller; state changes are always
//! bracketed with `q`/`Q` so nothing leaks into later commands.

use std::io::Write;

use vellum_common::warn_once;
use vellum_style::{BorderRadius, Rgba};

use crate::object::format_number;

/// Bézier circle-quadrant approximation constant.
///
/// A quarter circle of radius r is approximated by a cubic whose control
/// points sit at distance `KAPPA × r` along the tangents.
pub const KAPPA: f32 = 0.552_284_749_830_793_6;

/// Writes path and paint operators into a page's shape command buffer.
#[derive(Debug, Default)]
pub struct ShapeRenderer {
    /// The accumulated content-stream fragment.
    pub commands: Vec<u8>,
    clip_depth: usize,
}

/// One rounded rectangle in PDF space: `(x, y)` is the bottom-left corner;
/// radii are named by their CSS (top-left-origin) corners.
#[derive(Debug, Clone, Copy)]
pub struct RoundedRect {
    /// Bottom-left X.
    pub x: f32,
    /// Bottom-left Y.
    pub y: f32,
    /// Width in points.
    pub width: f32,
    /// Height in points.
    pub height: f32,
    /// Corner radii in points (CSS corner naming).
    pub radii: BorderRadius,
}

impl RoundedRect {
    /// A square-cornered rectangle.
    #[must_use]
    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            radii: BorderRadius::default(),
        }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

impl ShapeRenderer {
    /// A renderer with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn op(&mut self, text: &str) {
        self.commands.extend_from_slice(text.as_bytes());
        self.commands.push(b'\n');
    }

    fn num(value: f32) -> String {
        format_number(value)
    }

    /// Emit the non-stroking color.
    pub fn set_fill_color(&mut self, color: Rgba) {
        let (r, g, b) = color.to_unit_rgb();
        self.op(&format!(
            "{} {} {} rg",
            Self::num(r),
            Self::num(g),
            Self::num(b)
        ));
    }

    /// Emit the stroking color.
    pub fn set_stroke_color(&mut self, color: Rgba) {
        let (r, g, b) = color.to_unit_rgb();
        self.op(&format!(
            "{} {} {} RG",
            Self::num(r),
            Self::num(g),
            Self::num(b)
        ));
    }

    /// Fill a rectangle, optionally through an ExtGState alpha.
    ///
    /// Non-finite geometry is a local failure: the command is skipped and
    /// a warning recorded.
    pub fn fill_rect(&mut self, rect: RoundedRect, color: Rgba, gs_name: Option<&str>) {
        if !rect.is_finite() {
            warn_once("Render", "skipped fill with non-finite coordinates");
            return;
        }
        if rect.width <= 0.0 || rect.height <= 0.0 || color.is_transparent() {
            return;
        }
        self.op("q");
        if let Some(name) = gs_name {
            self.op(&format!("/{name} gs"));
        }
        self.set_fill_color(color);
        if rect.radii.is_zero() {
            self.op(&format!(
                "{} {} {} {} re",
                Self::num(rect.x),
                Self::num(rect.y),
                Self::num(rect.width),
                Self::num(rect.height)
            ));
        } else {
            self.rounded_path(rect);
        }
        self.op("f");
        self.op("Q");
    }

    /// Stroke a rectangle outline (hairline width).
    pub fn stroke_rect(&mut self, rect: RoundedRect, color: Rgba) {
        if !rect.is_finite() {
            warn_once("Render", "skipped stroke with non-finite coordinates");
            return;
        }
        self.op("q");
        self.set_stroke_color(color);
        self.op(&format!(
            "{} {} {} {} re",
            Self::num(rect.x),
            Self::num(rect.y),
            Self::num(rect.width),
            Self::num(rect.height)
        ));
        self.op("S");
        self.op("Q");
    }

    /// [§ 8.5.2.2] Begin a path at a point.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.op(&format!("{} {} m", Self::num(x), Self::num(y)));
    }

    /// Append a line segment.
    pub fn line_to(&mut self, x: f32, y: f32) {
        self.op(&format!("{} {} l", Self::num(x), Self::num(y)));
    }

    /// Append a cubic Bézier segment.
    pub fn curve_to(&mut self, c1: (f32, f32), c2: (f32, f32), end: (f32, f32)) {
        self.op(&format!(
            "{} {} {} {} {} {} c",
            Self::num(c1.0),
            Self::num(c1.1),
            Self::num(c2.0),
            Self::num(c2.1),
            Self::num(end.0),
            Self::num(end.1)
        ));
    }

    /// Close the current subpath.
    pub fn close_path(&mut self) {
        self.op("h");
    }

    /// Fill the current path (nonzero winding).
    pub fn fill_path(&mut self) {
        self.op("f");
    }

    /// Fill a polygon given its vertices.
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        if points.iter().any(|p| !p.0.is_finite() || !p.1.is_finite()) {
            warn_once("Render", "skipped polygon with non-finite coordinates");
            return;
        }
        self.op("q");
        self.set_fill_color(color);
        self.move_to(points[0].0, points[0].1);
        for p in &points[1..] {
            self.line_to(p.0, p.1);
        }
        self.close_path();
        self.fill_path();
        self.op("Q");
    }

    /// Fill the difference between an outer and an inner rounded
    /// rectangle (a border ring) with the even-odd rule.
    ///
    /// Building both subpaths and filling with `f*` renders correctly at
    /// any radius, where four side trapezoids would seam.
    pub fn fill_ring(
        &mut self,
        outer: RoundedRect,
        inner: RoundedRect,
        color: Rgba,
        gs_name: Option<&str>,
    ) {
        if !outer.is_finite() || !inner.is_finite() {
            warn_once("Render", "skipped border ring with non-finite coordinates");
            return;
        }
        self.op("q");
        if let Some(name) = gs_name {
            self.op(&format!("/{name} gs"));
        }
        self.set_fill_color(color);
        self.rounded_path(outer);
        self.rounded_path(inner);
        self.op("f*");
        self.op("Q");
    }

    /// Push a rectangular (optionally rounded) clip. Every push must be
    /// balanced by [`ShapeRenderer::pop_clip`].
    pub fn push_clip(&mut self, rect: RoundedRect) {
        self.op("q");
        if rect.radii.is_zero() {
            self.op(&format!(
                "{} {} {} {} re",
                Self::num(rect.x),
                Self::num(rect.y),
                Self::num(rect.width),
                Self::num(rect.height)
            ));
        } else {
            self.rounded_path(rect);
        }
        self.op("W n");
        self.clip_depth += 1;
    }

    /// Pop the innermost clip. Unbalanced pops are ignored (the depth
    /// counter prevents a stray `Q` from corrupting the graphics state).
    pub fn pop_clip(&mut self) {
        if self.clip_depth == 0 {
            warn_once("Render", "ignored unbalanced clip pop");
            return;
        }
        self.clip_depth -= 1;
        self.op("Q");
    }

    /// Current clip nesting depth.
    #[must_use]
    pub fn clip_depth(&self) -> usize {
        self.clip_depth
    }

    /// Paint a registered shading inside a clip rectangle:
    /// `q <clip> W n /Name sh Q`.
    pub fn draw_shading(&mut self, name: &str, clip: RoundedRect) {
        if !clip.is_finite() {
            warn_once("Render", "skipped shading with non-finite coordinates");
            return;
        }
        self.op("q");
        if clip.radii.is_zero() {
            self.op(&format!(
                "{} {} {} {} re",
                Self::num(clip.x),
                Self::num(clip.y),
                Self::num(clip.width),
                Self::num(clip.height)
            ));
        } else {
            self.rounded_path(clip);
        }
        self.op("W n");
        self.op(&format!("/{name} sh"));
        self.op("Q");
    }

    /// Append a full rounded-rectangle subpath.
    ///
    /// Radii use CSS corner naming (top-left-origin); in PDF space the
    /// CSS top edge is at `y + height`.
    fn rounded_path(&mut self, rect: RoundedRect) {
        let RoundedRect {
            x,
            y,
            width: w,
            height: h,
            radii,
        } = rect;
        let clamp = |r: f32| r.clamp(0.0, (w / 2.0).min(h / 2.0));
        let tl = clamp(radii.top_left);
        let tr = clamp(radii.top_right);
        let br = clamp(radii.bottom_right);
        let bl = clamp(radii.bottom_left);

        // Counterclockwise from the bottom edge, corner arcs as single
        // cubics.
        self.move_to(x + bl, y);
        self.line_to(x + w - br, y);
        self.curve_to(
            (x + w - br + KAPPA * br, y),
            (x + w, y + br - KAPPA * br),
            (x + w, y + br),
        );
        self.line_to(x + w, y + h - tr);
        self.curve_to(
            (x + w, y + h - tr + KAPPA * tr),
            (x + w - tr + KAPPA * tr, y + h),
            (x + w - tr, y + h),
        );
        self.line_to(x + tl, y + h);
        self.curve_to(
            (x + tl - KAPPA * tl, y + h),
            (x, y + h - tl + KAPPA * tl),
            (x, y + h - tl),
        );
        self.line_to(x, y + bl);
        self.curve_to(
            (x, y + bl - KAPPA * bl),
            (x + bl - KAPPA * bl, y),
            (x + bl, y),
        );
        self.close_path();
    }
}

/// Format helper shared with other sub-renderers.
pub(crate) fn write_op(buf: &mut Vec<u8>, text: &str) {
    let _ = writeln!(buf, "{text}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fill_uses_re_f() {
        let mut shapes = ShapeRenderer::new();
        shapes.fill_rect(
            RoundedRect::rect(10.0, 20.0, 100.0, 50.0),
            Rgba::rgb(255, 0, 0),
            None,
        );
        let text = String::from_utf8(shapes.commands).unwrap();
        assert!(text.contains("1 0 0 rg"));
        assert!(text.contains("10 20 100 50 re"));
        assert!(text.contains("\nf\n"));
    }

    #[test]
    fn rounded_fill_uses_curves() {
        let mut shapes = ShapeRenderer::new();
        let mut rect = RoundedRect::rect(0.0, 0.0, 100.0, 50.0);
        rect.radii = BorderRadius::uniform(8.0);
        shapes.fill_rect(rect, Rgba::BLACK, None);
        let text = String::from_utf8(shapes.commands).unwrap();
        assert!(text.contains(" c\n"));
        assert!(!text.contains(" re\n"));
    }

    #[test]
    fn clip_depth_guards_unbalanced_pops() {
        let mut shapes = ShapeRenderer::new();
        shapes.push_clip(RoundedRect::rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(shapes.clip_depth(), 1);
        shapes.pop_clip();
        shapes.pop_clip(); // ignored
        assert_eq!(shapes.clip_depth(), 0);
        let text = String::from_utf8(shapes.commands).unwrap();
        assert_eq!(text.matches("W n").count(), 1);
        assert_eq!(text.matches('Q').count(), 1);
    }

    #[test]
    fn non_finite_geometry_is_skipped() {
        let mut shapes = ShapeRenderer::new();
        shapes.fill_rect(
            RoundedRect::rect(f32::NAN, 0.0, 10.0, 10.0),
            Rgba::BLACK,
            None,
        );
        assert!(shapes.commands.is_empty());
    }
}
