//! The arena box tree.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! "Each box is associated with its generating element."
//!
//! # Design
//!
//! Boxes live in an arena and refer to each other through [`BoxId`]
//! indices. The parent field is an index, not an owning reference, which
//! eliminates cycles and keeps the whole tree trivially traversable while
//! layout mutates per-box geometry in place. Sibling order is document
//! order and is significant: it breaks ties in paint ordering.

use serde::Serialize;

use vellum_style::ComputedStyle;

use crate::box_model::{EdgeSizes, Rect};

/// A type-safe index into the box tree.
///
/// Provides O(1) access to any box without borrow-checker entanglement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BoxId(pub usize);

impl BoxId {
    /// The root box is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// One line's worth of text belonging to a box.
///
/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// "When an inline box exceeds the width of a line box, it is split into
/// several boxes and these boxes are distributed across several line
/// boxes." — a text-emitting box therefore carries one run per line it
/// occupies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineRun {
    /// 0-based index of this run among the owner's lines.
    pub line_index: usize,
    /// Absolute X of the run's first glyph origin.
    pub start_x: f32,
    /// Absolute Y of the alphabetic baseline.
    pub baseline: f32,
    /// The text of this run (post text-transform, post whitespace
    /// collapsing).
    pub text: String,
    /// The measured advance width of the run, including any justification
    /// stretch.
    pub width: f32,
    /// The content width of the whole line this run sits on.
    pub line_width: f32,
    /// The width the line had available (the band width); justification
    /// stretches `line_width` toward this.
    pub target_width: f32,
    /// Number of space tokens inside this run, for justification.
    pub space_count: usize,
    /// True on the owner's final line.
    pub is_last_line: bool,
}

/// Cached intrinsic (content-based) sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntrinsicSizes {
    /// Max-content inline size.
    pub inline: f32,
    /// Content block size at that inline size (0 when not measured).
    pub block: f32,
}

/// The mutable geometry record of a box.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// `(x, y)` is the *content box* origin in absolute page coordinates. The
/// derived border/margin box sizes are maintained by the setters so that
/// `border_box_width = content_width + padding + border` holds at all
/// times, and `scroll_width >= content_width`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoxGeometry {
    /// Content box origin X.
    pub x: f32,
    /// Content box origin Y.
    pub y: f32,
    /// Content box width.
    pub content_width: f32,
    /// Content box height.
    pub content_height: f32,
    /// Content + padding + border width.
    pub border_box_width: f32,
    /// Content + padding + border height.
    pub border_box_height: f32,
    /// Border box + margin width.
    pub margin_box_width: f32,
    /// Border box + margin height.
    pub margin_box_height: f32,
    /// Scrollable overflow width (at least `content_width`).
    pub scroll_width: f32,
    /// Scrollable overflow height (at least `content_height`).
    pub scroll_height: f32,
    /// Absolute Y of the box's first baseline (content bottom when the box
    /// has no text).
    pub baseline: f32,
    /// Resolved margin edges.
    pub margin: EdgeSizes,
    /// Resolved border edges.
    pub border: EdgeSizes,
    /// Resolved padding edges.
    pub padding: EdgeSizes,
}

impl BoxGeometry {
    /// Install the resolved edges and recompute the derived box sizes.
    pub fn set_edges(&mut self, margin: EdgeSizes, border: EdgeSizes, padding: EdgeSizes) {
        self.margin = margin;
        self.border = border;
        self.padding = padding;
        self.refresh_derived();
    }

    /// Set the content size and recompute the derived box sizes.
    pub fn set_content_size(&mut self, width: f32, height: f32) {
        // Negative sizes and NaN are invariant violations; clamp locally
        // rather than propagating.
        self.content_width = sanitize(width);
        self.content_height = sanitize(height);
        self.refresh_derived();
    }

    /// Grow the scrollable overflow to cover a descendant extent, given in
    /// coordinates relative to the content origin.
    pub fn extend_scroll(&mut self, right: f32, bottom: f32) {
        if right > self.scroll_width {
            self.scroll_width = right;
        }
        if bottom > self.scroll_height {
            self.scroll_height = bottom;
        }
    }

    fn refresh_derived(&mut self) {
        self.border_box_width =
            self.content_width + self.padding.horizontal() + self.border.horizontal();
        self.border_box_height =
            self.content_height + self.padding.vertical() + self.border.vertical();
        self.margin_box_width = self.border_box_width + self.margin.horizontal();
        self.margin_box_height = self.border_box_height + self.margin.vertical();
        if self.scroll_width < self.content_width {
            self.scroll_width = self.content_width;
        }
        if self.scroll_height < self.content_height {
            self.scroll_height = self.content_height;
        }
    }

    /// The content box rectangle.
    #[must_use]
    pub const fn content_box(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.content_width,
            height: self.content_height,
        }
    }

    /// The padding box rectangle.
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        Rect {
            x: self.x - self.padding.left,
            y: self.y - self.padding.top,
            width: self.content_width + self.padding.horizontal(),
            height: self.content_height + self.padding.vertical(),
        }
    }

    /// The border box rectangle.
    #[must_use]
    pub fn border_box(&self) -> Rect {
        Rect {
            x: self.x - self.padding.left - self.border.left,
            y: self.y - self.padding.top - self.border.top,
            width: self.border_box_width,
            height: self.border_box_height,
        }
    }

    /// The margin box rectangle.
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        Rect {
            x: self.x - self.padding.left - self.border.left - self.margin.left,
            y: self.y - self.padding.top - self.border.top - self.margin.top,
            width: self.margin_box_width,
            height: self.margin_box_height,
        }
    }
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// A node in the box tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxNode {
    /// Tag identifier of the generating element (lowercase; `""` for
    /// anonymous boxes).
    pub tag: String,
    /// The computed style.
    pub style: ComputedStyle,
    /// Parent index (`None` at the root).
    pub parent: Option<BoxId>,
    /// Children in document order.
    pub children: Vec<BoxId>,
    /// Text content for text-emitting boxes.
    pub text: Option<String>,
    /// Source key of replaced image content (e.g. `<img>`), drawn by the
    /// image renderer and sized from [`BoxNode::intrinsic`].
    pub replaced_src: Option<String>,
    /// Inline runs written by inline layout, one per occupied line.
    pub runs: Vec<InlineRun>,
    /// Cached intrinsic sizes, filled on demand.
    pub intrinsic: Option<IntrinsicSizes>,
    /// The mutable geometry record.
    pub geometry: BoxGeometry,
}

impl BoxNode {
    /// An element box with the given tag and style.
    #[must_use]
    pub fn element(tag: &str, style: ComputedStyle) -> Self {
        Self {
            tag: tag.to_string(),
            style,
            parent: None,
            children: Vec::new(),
            text: None,
            replaced_src: None,
            runs: Vec::new(),
            intrinsic: None,
            geometry: BoxGeometry::default(),
        }
    }

    /// A text-carrying inline box.
    ///
    /// [§ 9.2.1.1 Anonymous inline boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-inline)
    ///
    /// "Any text that is directly contained inside a block container
    /// element ... must be treated as an anonymous inline element."
    #[must_use]
    pub fn text(style: ComputedStyle, text: &str) -> Self {
        let mut node = Self::element("", style);
        node.text = Some(text.to_string());
        node
    }

    /// True when this box emits text of its own.
    #[must_use]
    pub fn has_text(&self) -> bool {
        self.text.as_ref().is_some_and(|t| !t.is_empty())
    }
}

/// Arena-based box tree with O(1) node access.
///
/// All relationships are indices; the root is always [`BoxId::ROOT`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct BoxTree {
    nodes: Vec<BoxNode>,
}

impl BoxTree {
    /// Create a tree holding only the given root box.
    #[must_use]
    pub fn new(root: BoxNode) -> Self {
        Self { nodes: vec![root] }
    }

    /// The root box id.
    #[must_use]
    pub const fn root(&self) -> BoxId {
        BoxId::ROOT
    }

    /// Number of boxes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds no boxes (never the case after `new`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a child box under `parent`, returning its id.
    ///
    /// # Panics
    /// Panics when `parent` is out of bounds.
    pub fn insert(&mut self, parent: BoxId, mut node: BoxNode) -> BoxId {
        let id = BoxId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Borrow a box.
    ///
    /// # Panics
    /// Panics when `id` is out of bounds.
    #[must_use]
    pub fn node(&self, id: BoxId) -> &BoxNode {
        &self.nodes[id.0]
    }

    /// Mutably borrow a box.
    ///
    /// # Panics
    /// Panics when `id` is out of bounds.
    #[must_use]
    pub fn node_mut(&mut self, id: BoxId) -> &mut BoxNode {
        &mut self.nodes[id.0]
    }

    /// Borrow a box's computed style.
    #[must_use]
    pub fn style(&self, id: BoxId) -> &ComputedStyle {
        &self.node(id).style
    }

    /// Clone out a box's child list (cheap: a vector of indices), so the
    /// caller can iterate while mutating the tree.
    #[must_use]
    pub fn child_ids(&self, id: BoxId) -> Vec<BoxId> {
        self.node(id).children.clone()
    }

    /// All box ids in preorder starting at `id`.
    #[must_use]
    pub fn descendants(&self, id: BoxId) -> Vec<BoxId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            // Push in reverse so children pop in document order.
            for &child in self.node(next).children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Walk up from `id` collecting ancestors, nearest first (excluding
    /// `id` itself).
    #[must_use]
    pub fn ancestors(&self, id: BoxId) -> Vec<BoxId> {
        let mut out = Vec::new();
        let mut current = self.node(id).parent;
        while let Some(p) = current {
            out.push(p);
            current = self.node(p).parent;
        }
        out
    }

    /// Translate a box and its whole subtree by `(dx, dy)` in one pass.
    ///
    /// Updates every descendant's origin, baseline, and any existing
    /// inline runs, so a subtree laid out against a provisional origin can
    /// be moved to its final position without re-layout.
    pub fn offset_subtree(&mut self, id: BoxId, dx: f32, dy: f32) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        for target in self.descendants(id) {
            let node = self.node_mut(target);
            node.geometry.x += dx;
            node.geometry.y += dy;
            node.geometry.baseline += dy;
            for run in &mut node.runs {
                run.start_x += dx;
                run.baseline += dy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_sizes_follow_content() {
        let mut g = BoxGeometry::default();
        g.set_edges(
            EdgeSizes {
                top: 1.0,
                right: 2.0,
                bottom: 3.0,
                left: 4.0,
            },
            EdgeSizes {
                top: 1.0,
                right: 1.0,
                bottom: 1.0,
                left: 1.0,
            },
            EdgeSizes {
                top: 5.0,
                right: 5.0,
                bottom: 5.0,
                left: 5.0,
            },
        );
        g.set_content_size(100.0, 50.0);
        assert_eq!(g.border_box_width, 100.0 + 10.0 + 2.0);
        assert_eq!(g.margin_box_width, g.border_box_width + 6.0);
        assert_eq!(g.border_box_height, 50.0 + 10.0 + 2.0);
        assert!(g.scroll_width >= g.content_width);
    }

    #[test]
    fn offset_subtree_moves_runs() {
        let mut tree = BoxTree::new(BoxNode::element("div", Default::default()));
        let child = tree.insert(tree.root(), BoxNode::text(Default::default(), "hi"));
        tree.node_mut(child).runs.push(InlineRun {
            line_index: 0,
            start_x: 10.0,
            baseline: 20.0,
            text: "hi".to_string(),
            width: 12.0,
            line_width: 12.0,
            target_width: 100.0,
            space_count: 0,
            is_last_line: true,
        });
        tree.offset_subtree(tree.root(), 5.0, 7.0);
        let run = &tree.node(child).runs[0];
        assert_eq!(run.start_x, 15.0);
        assert_eq!(run.baseline, 27.0);
    }
}
