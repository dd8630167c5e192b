//! Layout strategy selection and dispatch.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! "The display property determines the type of box or boxes that are
//! generated for an element."
//!
//! Strategies are plain functions behind a tagged variant; the selector is
//! a pure function of `display`, so there is no virtual dispatch and no
//! per-box strategy state.

use vellum_style::Display;

use crate::block;
use crate::box_model::Rect;
use crate::flex;
use crate::float::FloatContext;
use crate::inline::InlineFragment;
use crate::metrics::FontMetrics;
use crate::positioned;
use crate::table;
use crate::tree::{BoxId, BoxTree};

/// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
///
/// "The position and size of an element's box(es) are sometimes calculated
/// relative to a certain rectangle, called the containing block."
///
/// `y` is the Y at which the box's margin box starts; `height` is `None`
/// when the containing block height is not yet definite (percentages
/// against it then behave as auto).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainingBlock {
    /// Content-edge X of the containing block.
    pub x: f32,
    /// Y at which the laid-out box's margin box begins.
    pub y: f32,
    /// Containing block width.
    pub width: f32,
    /// Containing block height, when definite.
    pub height: Option<f32>,
}

/// The layout strategy for a box, selected purely from `display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStrategy {
    /// Block container in normal flow.
    Block,
    /// Flex container.
    Flex,
    /// Table wrapper.
    Table,
    /// Inline-level container laid out with a shrink-to-fit width.
    InlineWrapper,
}

/// Select the strategy for a display value.
#[must_use]
pub const fn strategy_for(display: Display) -> LayoutStrategy {
    match display {
        Display::Flex | Display::InlineFlex => LayoutStrategy::Flex,
        Display::Table | Display::InlineTable => LayoutStrategy::Table,
        Display::Inline | Display::InlineBlock | Display::InlineGrid => {
            LayoutStrategy::InlineWrapper
        }
        // Grid layout is out of scope: grid containers lay out as blocks.
        _ => LayoutStrategy::Block,
    }
}

/// Shared, immutable layout inputs.
pub struct LayoutEnv<'a> {
    /// The viewport (initial containing block) in px.
    pub viewport: Rect,
    /// Text measurement provider.
    pub metrics: &'a dyn FontMetrics,
}

/// Lay out the whole document: the root box against the viewport, then the
/// out-of-flow post-pass.
pub fn layout_document(tree: &mut BoxTree, env: &LayoutEnv<'_>) {
    let root = tree.root();
    let cb = ContainingBlock {
        x: 0.0,
        y: 0.0,
        width: env.viewport.width,
        height: Some(env.viewport.height),
    };
    // The initial containing block establishes the outermost block
    // formatting context.
    let mut floats = FloatContext::new();
    layout_box(tree, root, &cb, env, &mut floats);

    // [§ 9.6 Absolute positioning](https://www.w3.org/TR/CSS2/visuren.html#absolute-positioning)
    //
    // Absolutely positioned boxes were skipped during flow layout; place
    // them now that every potential containing block has its geometry.
    positioned::layout_out_of_flow(tree, env);
}

/// Lay out one box with the strategy its display selects.
///
/// `floats` is the float context of the block formatting context this box
/// *participates in* (strategies open fresh contexts for BFC roots they
/// establish).
pub fn layout_box(
    tree: &mut BoxTree,
    id: BoxId,
    cb: &ContainingBlock,
    env: &LayoutEnv<'_>,
    floats: &mut FloatContext,
) {
    match strategy_for(tree.style(id).display) {
        LayoutStrategy::Block => block::layout_block(tree, id, cb, env, floats),
        LayoutStrategy::InlineWrapper => block::layout_inline_wrapper(tree, id, cb, env),
        LayoutStrategy::Flex => flex::layout_flex(tree, id, cb, env),
        LayoutStrategy::Table => table::layout_table(tree, id, cb, env),
    }
}

/// [§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// Collect inline fragments from a run of inline-level participants.
///
/// Recursively descends inline subtrees. `display: none` and floated
/// children are skipped (floats are out of flow and already placed by the
/// block strategy). Atomic inlines are pre-measured here by running their
/// own strategy against the available width; pure `display: inline` boxes
/// contribute text fragments and descend.
pub fn collect_inline_fragments(
    tree: &mut BoxTree,
    ids: &[BoxId],
    available_width: f32,
    env: &LayoutEnv<'_>,
    out: &mut Vec<InlineFragment>,
) {
    let mut prev_ends_open = false;
    collect_recursive(tree, ids, available_width, env, out, &mut prev_ends_open);
}

fn collect_recursive(
    tree: &mut BoxTree,
    ids: &[BoxId],
    available_width: f32,
    env: &LayoutEnv<'_>,
    out: &mut Vec<InlineFragment>,
    prev_ends_open: &mut bool,
) {
    for &id in ids {
        let style = tree.style(id);
        if style.display == Display::None {
            continue;
        }
        if style.float.is_floated() || style.position.is_out_of_flow() {
            // Out of flow: not a participant of this inline context.
            continue;
        }

        if style.display.is_atomic_inline() {
            // [§ 9.2.4](https://www.w3.org/TR/css-display-3/#atomic-inline)
            //
            // Pre-measure by running the box's own strategy at a
            // provisional origin; the line breaker moves the subtree to
            // its final place.
            let cb = ContainingBlock {
                x: 0.0,
                y: 0.0,
                width: available_width,
                height: None,
            };
            let mut scratch_floats = FloatContext::new();
            layout_box(tree, id, &cb, env, &mut scratch_floats);
            let margin_box = tree.node(id).geometry.margin_box();
            out.push(InlineFragment::Atomic {
                owner: id,
                width: margin_box.width,
                height: margin_box.height,
            });
            *prev_ends_open = true;
            continue;
        }

        if style.display.is_inline_flow() || tree.node(id).has_text() {
            let node = tree.node(id);
            if let Some(text) = node.text.clone()
                && !text.is_empty()
            {
                // Whitespace collapsing across fragment boundaries: a
                // leading collapsed space only survives when something was
                // emitted before it that did not already end in a space.
                let preserve_leading =
                    text.starts_with(char::is_whitespace) && !out.is_empty() && *prev_ends_open;
                let preserve_trailing = text.ends_with(char::is_whitespace);
                *prev_ends_open = !preserve_trailing;
                out.push(InlineFragment::Text {
                    owner: id,
                    text,
                    preserve_leading,
                    preserve_trailing,
                });
            }
            let children = tree.child_ids(id);
            collect_recursive(tree, &children, available_width, env, out, prev_ends_open);
            continue;
        }

        // Other display modes nested inside inline participants: descend
        // into their children.
        let children = tree.child_ids(id);
        collect_recursive(tree, &children, available_width, env, out, prev_ends_open);
    }
}
