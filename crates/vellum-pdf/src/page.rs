//! The per-page content-stream renderer and result combiner.
//!
//! Executes a paint-order instruction list against the laid-out box tree.
//! Four sub-streams accumulate independently — rasterized shadow images,
//! shapes, text, and other images — sharing one graphics-state manager
//! and one coordinate transformer; the combiner concatenates them so
//! shadows sit beneath shapes, shapes beneath text, and content images on
//! top.

use std::f32::consts::PI;

use vellum_layout::box_model::Rect;
use vellum_layout::stacking::PaintInstruction;
use vellum_layout::tree::{BoxId, BoxTree};
use vellum_style::{BorderSide, ComputedStyle, Gradient, GradientKind, Visibility};

use crate::document::{Page, PageResources, PdfDocument};
use crate::font::library::FontLibrary;
use crate::font::registry::FontCatalog;
use crate::graphics::GraphicsStateManager;
use crate::image::{ImageRenderer, ImageSource};
use crate::shading::{ShadingManager, normalize_stops};
use crate::shape::{RoundedRect, ShapeRenderer};
use crate::text::{TextEnv, TextRenderer};
use crate::transform::CoordinateTransformer;

/// Renders one page's content stream from paint instructions.
pub struct PageRenderer<'a> {
    transform: CoordinateTransformer,
    page_width_pt: f32,
    shapes: ShapeRenderer,
    text: TextRenderer,
    images: ImageRenderer,
    gs: GraphicsStateManager,
    shadings: ShadingManager,
    opacity_depth: usize,
    library: &'a FontLibrary,
    image_source: &'a dyn ImageSource,
}

impl<'a> PageRenderer<'a> {
    /// A renderer for one page.
    #[must_use]
    pub fn new(
        transform: CoordinateTransformer,
        page_width_pt: f32,
        library: &'a FontLibrary,
        image_source: &'a dyn ImageSource,
    ) -> Self {
        Self {
            transform,
            page_width_pt,
            shapes: ShapeRenderer::new(),
            text: TextRenderer::new(),
            images: ImageRenderer::new(),
            gs: GraphicsStateManager::new(),
            shadings: ShadingManager::new(),
            opacity_depth: 0,
            library,
            image_source,
        }
    }

    /// Execute the instruction list, then combine the sub-streams and
    /// collect this page's resources (fonts are filled in by the caller
    /// once the catalog materializes).
    pub fn render(
        mut self,
        tree: &BoxTree,
        instructions: &[PaintInstruction],
        catalog: &mut FontCatalog,
        doc: &mut PdfDocument,
    ) -> Page {
        for instruction in instructions {
            match instruction {
                PaintInstruction::Box(id) => self.paint_box(tree, *id, catalog, doc),
                PaintInstruction::BeginOpacity(alpha) => self.begin_opacity(*alpha),
                PaintInstruction::EndOpacity => self.end_opacity(),
            }
        }
        // Unbalanced opacity scopes would corrupt the graphics state of
        // everything after them; close any left open.
        while self.opacity_depth > 0 {
            self.end_opacity();
        }

        // The combiner: shadow images beneath shapes, then text, then
        // content images.
        let mut content = Vec::new();
        content.extend_from_slice(&self.images.shadow_commands);
        content.extend_from_slice(&self.shapes.commands);
        content.extend_from_slice(&self.text.commands);
        content.extend_from_slice(&self.images.commands);

        let resources = PageResources {
            fonts: std::collections::BTreeMap::new(),
            xobjects: self.images.materialize(doc),
            ext_g_states: self.gs.resource_entries(),
            shadings: self.shadings.resource_entries(),
            patterns: std::collections::BTreeMap::new(),
        };

        Page {
            width_pt: self.page_width_pt,
            height_pt: self.transform.page_height_pt(),
            content,
            resources,
        }
    }

    /// Open an opacity scope in every sub-stream.
    ///
    /// Each stream gets a `q /GSn gs` bracket so fills inside the scope
    /// composite with the group alpha regardless of which stream they
    /// land in.
    fn begin_opacity(&mut self, alpha: f32) {
        let name = self.gs.ensure_fill_alpha(alpha);
        for buffer in [
            &mut self.shapes.commands,
            &mut self.text.commands,
            &mut self.images.commands,
            &mut self.images.shadow_commands,
        ] {
            buffer.extend_from_slice(b"q\n");
            buffer.extend_from_slice(format!("/{name} gs\n").as_bytes());
        }
        self.opacity_depth += 1;
    }

    fn end_opacity(&mut self) {
        if self.opacity_depth == 0 {
            return;
        }
        self.opacity_depth -= 1;
        for buffer in [
            &mut self.shapes.commands,
            &mut self.text.commands,
            &mut self.images.commands,
            &mut self.images.shadow_commands,
        ] {
            buffer.extend_from_slice(b"Q\n");
        }
    }

    /// Paint one box: background, borders, text runs, replaced content.
    fn paint_box(
        &mut self,
        tree: &BoxTree,
        id: BoxId,
        catalog: &mut FontCatalog,
        doc: &mut PdfDocument,
    ) {
        let node = tree.node(id);
        let style = &node.style;

        // [§ 11.2 'visibility'](https://www.w3.org/TR/CSS2/visufx.html#visibility)
        //
        // "The generated box is invisible ... but still affects layout."
        // Descendants paint through their own instructions and may
        // override back to visible, so only this box's output is skipped.
        if style.visibility == Visibility::Hidden {
            return;
        }

        let border_box = node.geometry.border_box();
        let padding_box = node.geometry.padding_box();
        let content_box = node.geometry.content_box();

        self.paint_background(style, border_box, doc);
        self.paint_borders(style, border_box, padding_box);

        // Text runs.
        if !node.runs.is_empty() {
            let mut env = TextEnv {
                catalog,
                library: self.library,
                gs: &mut self.gs,
                transform: &self.transform,
                images: &mut self.images,
            };
            for run in &node.runs {
                self.text.draw_run(&mut env, run, style);
            }
        }

        // Replaced content.
        if let Some(src) = &node.replaced_src
            && let Some(decoded) = self.image_source.get(src)
        {
            let name = self.images.register(
                src,
                decoded.width,
                decoded.height,
                decoded.rgba.clone(),
            );
            let rect = self.pdf_rect(content_box, style);
            self.images
                .draw(&name, rect.x, rect.y, rect.width, rect.height);
        }
    }

    /// Convert a layout rect (px, top-left origin) into PDF space, with
    /// the style's corner radii scaled to points.
    fn pdf_rect(&self, rect: Rect, style: &ComputedStyle) -> RoundedRect {
        let mut radii = style.border_radius;
        radii.top_left = self.transform.length_pt(radii.top_left);
        radii.top_right = self.transform.length_pt(radii.top_right);
        radii.bottom_right = self.transform.length_pt(radii.bottom_right);
        radii.bottom_left = self.transform.length_pt(radii.bottom_left);
        RoundedRect {
            x: self.transform.x_pt(rect.x),
            y: self.transform.y_pt(rect.y + rect.height),
            width: self.transform.length_pt(rect.width),
            height: self.transform.length_pt(rect.height),
            radii,
        }
    }

    /// Background: gradient wins over image wins over color.
    fn paint_background(&mut self, style: &ComputedStyle, border_box: Rect, doc: &mut PdfDocument) {
        if border_box.is_empty() {
            return;
        }
        let clip = self.pdf_rect(border_box, style);

        if let Some(gradient) = &style.background_gradient {
            self.paint_gradient(gradient, border_box, clip, doc);
            return;
        }

        if let Some(src) = &style.background_image {
            if let Some(decoded) = self.image_source.get(src) {
                let name = self.images.register(
                    src,
                    decoded.width,
                    decoded.height,
                    decoded.rgba.clone(),
                );
                let dest = RoundedRect {
                    radii: vellum_style::BorderRadius::default(),
                    ..clip
                };
                self.images.draw_background(&name, dest, clip);
                return;
            }
            // Missing decode falls through to the background color.
        }

        if let Some(color) = style.background_color
            && !color.is_transparent()
        {
            let gs_name = if color.is_opaque() {
                None
            } else {
                Some(self.gs.ensure_fill_alpha(color.alpha_f32()))
            };
            self.shapes.fill_rect(clip, color, gs_name.as_deref());
        }
    }

    /// Emit a gradient background via the shading manager.
    fn paint_gradient(
        &mut self,
        gradient: &Gradient,
        border_box: Rect,
        clip: RoundedRect,
        doc: &mut PdfDocument,
    ) {
        let stops = normalize_stops(&gradient.stops);
        if stops.len() < 2 {
            return;
        }
        let name = match gradient.kind {
            GradientKind::Linear { angle_deg } => {
                // [CSS Images § 3.1] The gradient line passes through the
                // box center; 0deg points up, 90deg right, 180deg down.
                let theta = angle_deg * PI / 180.0;
                let (dx, dy) = (theta.sin(), -theta.cos());
                let half = (border_box.width * dx.abs() + border_box.height * dy.abs()) / 2.0;
                let cx = border_box.x + border_box.width / 2.0;
                let cy = border_box.y + border_box.height / 2.0;
                let start = (cx - dx * half, cy - dy * half);
                let end = (cx + dx * half, cy + dy * half);
                self.shadings.ensure_axial(
                    doc,
                    (
                        self.transform.x_pt(start.0),
                        self.transform.y_pt(start.1),
                        self.transform.x_pt(end.0),
                        self.transform.y_pt(end.1),
                    ),
                    &stops,
                )
            }
            GradientKind::Radial => {
                let cx = border_box.x + border_box.width / 2.0;
                let cy = border_box.y + border_box.height / 2.0;
                let radius = (border_box.width / 2.0).hypot(border_box.height / 2.0);
                self.shadings.ensure_radial(
                    doc,
                    (self.transform.x_pt(cx), self.transform.y_pt(cy)),
                    self.transform.length_pt(radius),
                    &stops,
                )
            }
        };
        self.shapes.draw_shading(&name, clip);
    }

    /// Borders: a rounded box paints an even-odd ring; square boxes paint
    /// one rectangle per side (corners merge into the horizontal sides).
    fn paint_borders(&mut self, style: &ComputedStyle, border_box: Rect, padding_box: Rect) {
        let widths = [
            style.border_top,
            style.border_right,
            style.border_bottom,
            style.border_left,
        ];
        if widths.iter().all(|side| effective_width(*side) <= 0.0) {
            return;
        }

        if !style.border_radius.is_zero() {
            // Rounded: outer path minus inner path, filled even-odd. The
            // ring takes one color (the first drawn side's).
            let color = widths
                .iter()
                .find_map(|side| side.map(|b| b.color))
                .unwrap_or(vellum_style::Rgba::BLACK);
            let outer = self.pdf_rect(border_box, style);
            let mut inner = self.pdf_rect(padding_box, style);
            let trim = self.transform.length_pt(
                (border_box.width - padding_box.width).max(0.0) / 2.0,
            );
            inner.radii.top_left = (outer.radii.top_left - trim).max(0.0);
            inner.radii.top_right = (outer.radii.top_right - trim).max(0.0);
            inner.radii.bottom_right = (outer.radii.bottom_right - trim).max(0.0);
            inner.radii.bottom_left = (outer.radii.bottom_left - trim).max(0.0);
            self.shapes.fill_ring(outer, inner, color, None);
            return;
        }

        let top = border_box.y;
        let left = border_box.x;
        let right = border_box.right();
        let bottom = border_box.bottom();
        let pad_top = padding_box.y;
        let pad_left = padding_box.x;
        let pad_right = padding_box.right();
        let pad_bottom = padding_box.bottom();

        if let Some(side) = style.border_top
            && effective_width(Some(side)) > 0.0
        {
            self.fill_px_rect(
                Rect::new(left, top, right - left, pad_top - top),
                side.color,
            );
        }
        if let Some(side) = style.border_bottom
            && effective_width(Some(side)) > 0.0
        {
            self.fill_px_rect(
                Rect::new(left, pad_bottom, right - left, bottom - pad_bottom),
                side.color,
            );
        }
        if let Some(side) = style.border_left
            && effective_width(Some(side)) > 0.0
        {
            self.fill_px_rect(
                Rect::new(left, pad_top, pad_left - left, pad_bottom - pad_top),
                side.color,
            );
        }
        if let Some(side) = style.border_right
            && effective_width(Some(side)) > 0.0
        {
            self.fill_px_rect(
                Rect::new(pad_right, pad_top, right - pad_right, pad_bottom - pad_top),
                side.color,
            );
        }
    }

    fn fill_px_rect(&mut self, rect: Rect, color: vellum_style::Rgba) {
        if rect.is_empty() {
            return;
        }
        let pdf = RoundedRect::rect(
            self.transform.x_pt(rect.x),
            self.transform.y_pt(rect.y + rect.height),
            self.transform.length_pt(rect.width),
            self.transform.length_pt(rect.height),
        );
        self.shapes.fill_rect(pdf, color, None);
    }
}

fn effective_width(side: Option<BorderSide>) -> f32 {
    side.map_or(0.0, |b| {
        b.width.resolve(0.0, vellum_style::AutoPolicy::Zero)
    })
}
