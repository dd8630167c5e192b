//! The Vellum rendering pipeline.
//!
//! # Scope
//!
//! This crate wires the stages together:
//! - **Layout** - the styled box tree is laid out against the page
//!   content width
//! - **Paint order** - stacking contexts resolve to a flat instruction
//!   list
//! - **Content streams** - each page renders the instructions through the
//!   PDF sub-renderers
//! - **Assembly** - fonts materialize, pages register, the document
//!   serializes
//!
//! The caller supplies the styled [`BoxTree`], a [`FontLibrary`], and an
//! [`ImageStore`]; HTML/CSS parsing, font file acquisition, and image
//! decoding all happen upstream.
//!
//! ```no_run
//! use vellum_layout::{BoxNode, BoxTree};
//! use vellum_pdf::FontLibrary;
//! use vellum_render::{ImageStore, RenderOptions, render_to_pdf};
//!
//! let mut tree = BoxTree::new(BoxNode::element("html", Default::default()));
//! let library = FontLibrary::new();
//! let images = ImageStore::new();
//! let pdf = render_to_pdf(&mut tree, &library, &images, &RenderOptions::default()).unwrap();
//! std::fs::write("out.pdf", pdf).unwrap();
//! ```

pub mod images;
pub mod metrics;

use anyhow::{Context, Result};

use vellum_common::clear_warnings;
use vellum_layout::box_model::{EdgeSizes, Rect};
use vellum_layout::engine::{LayoutEnv, layout_document};
use vellum_layout::stacking::paint_order;
use vellum_layout::tree::BoxTree;
use vellum_pdf::{
    CoordinateTransformer, DEFAULT_PX_TO_PT, DocumentMetadata, FontCatalog, FontLibrary,
    PageRenderer, PdfDocument,
};

pub use images::ImageStore;
pub use metrics::LibraryFontMetrics;
pub use vellum_pdf::DecodedImage;

/// Page geometry in CSS pixels.
#[derive(Debug, Clone, Copy)]
pub struct PageSetup {
    /// Page width in px.
    pub width: f32,
    /// Page height in px.
    pub height: f32,
    /// Page margins in px; layout happens inside them.
    pub margins: EdgeSizes,
}

impl Default for PageSetup {
    /// US Letter at 96 dpi with a half-inch margin.
    fn default() -> Self {
        Self {
            width: 816.0,
            height: 1056.0,
            margins: EdgeSizes {
                top: 48.0,
                right: 48.0,
                bottom: 48.0,
                left: 48.0,
            },
        }
    }
}

impl PageSetup {
    /// The content-box width between the margins.
    #[must_use]
    pub fn content_width(&self) -> f32 {
        (self.width - self.margins.horizontal()).max(0.0)
    }

    /// The content-box height between the margins.
    #[must_use]
    pub fn content_height(&self) -> f32 {
        (self.height - self.margins.vertical()).max(1.0)
    }
}

/// Everything configurable about a render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// The viewport the tree is laid out against (defaults to the page
    /// content box).
    pub viewport: Option<Rect>,
    /// Page size and margins.
    pub page: PageSetup,
    /// px→pt conversion factor (default 72/96).
    pub px_to_pt: f32,
    /// Document information dictionary fields.
    pub metadata: DocumentMetadata,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            viewport: None,
            page: PageSetup::default(),
            px_to_pt: DEFAULT_PX_TO_PT,
            metadata: DocumentMetadata::default(),
        }
    }
}

/// Render a styled box tree to PDF bytes.
///
/// Synchronous and single-threaded: it either returns a complete document
/// or an error. Per-box and per-glyph problems recover locally (the
/// document still emits); only PDF assembly failures are fatal.
///
/// # Errors
///
/// Font subsetting failures and PDF assembly failures propagate.
pub fn render_to_pdf(
    tree: &mut BoxTree,
    library: &FontLibrary,
    images: &ImageStore,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    clear_warnings();

    // STEP 1: Layout against the page content box (or explicit viewport).
    let viewport = options.viewport.unwrap_or(Rect {
        x: 0.0,
        y: 0.0,
        width: options.page.content_width(),
        height: options.page.content_height(),
    });
    let metrics = LibraryFontMetrics::new(library);
    let env = LayoutEnv {
        viewport,
        metrics: &metrics,
    };
    layout_document(tree, &env);

    // Shift the whole laid-out tree to the page's left margin; the top
    // margin is handled by the per-page transformer offset.
    let root = tree.root();
    tree.offset_subtree(root, options.page.margins.left, 0.0);

    // STEP 2: Resolve paint order once; it is shared by every page.
    let instructions = paint_order(tree);

    // STEP 3: Paginate. Document height comes from the root's margin box
    // and its scrollable overflow.
    let root_geometry = &tree.node(root).geometry;
    let document_height = root_geometry
        .margin_box()
        .bottom()
        .max(root_geometry.y + root_geometry.scroll_height)
        .max(1.0);
    let slice_height = options.page.content_height();
    let page_count = (document_height / slice_height).ceil().max(1.0) as usize;

    // STEP 4: Render each page's content streams.
    let mut catalog = FontCatalog::new();
    let mut doc = PdfDocument::new();
    doc.metadata = options.metadata.clone();

    let mut pages = Vec::with_capacity(page_count);
    for page_index in 0..page_count {
        let offset = page_index as f32 * slice_height - options.page.margins.top;
        let transform = CoordinateTransformer::new(options.px_to_pt, options.page.height, offset);
        let renderer = PageRenderer::new(
            transform,
            options.page.width * options.px_to_pt,
            library,
            images,
        );
        pages.push(renderer.render(tree, &instructions, &mut catalog, &mut doc));
    }

    // STEP 5: Materialize fonts (subsets cover every page's glyphs), hand
    // each page the final font aliases, and assemble.
    catalog
        .materialize(&mut doc, library)
        .context("font subsetting failed")?;
    let font_refs = catalog.font_refs();
    for mut page in pages {
        page.resources.fonts = font_refs.clone();
        doc.add_page(page);
    }

    doc.finalize().context("PDF assembly failed")
}
