//! Block layout.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, boxes are laid out one after the other,
//! vertically, beginning at the top of a containing block. The vertical
//! distance between two sibling boxes is determined by the 'margin'
//! properties."

use vellum_style::{
    AutoPolicy, BoxSizing, Clear, ComputedStyle, Display, Float, Length, Position,
    adjust_for_box_sizing, clamp_min_max,
};

use crate::box_model::EdgeSizes;
use crate::engine::{ContainingBlock, LayoutEnv, collect_inline_fragments, layout_box};
use crate::float::{FloatContext, FloatSide};
use crate::inline::{layout_items, tokenize};
use crate::intrinsic::max_content_inline_size;
use crate::tree::{BoxId, BoxTree};

/// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
///
/// "When two or more margins collapse, the resulting margin width is the
/// maximum of the collapsing margins' widths. In the case of negative
/// margins, the maximum of the absolute values of the negative adjoining
/// margins is deducted from the maximum of the positive adjoining margins."
#[must_use]
pub fn collapse_two_margins(a: f32, b: f32) -> f32 {
    if a >= 0.0 && b >= 0.0 {
        a.max(b)
    } else if a < 0.0 && b < 0.0 {
        a.min(b)
    } else {
        a + b
    }
}

/// Lay out a block-level box in normal flow.
///
/// `floats` is the float context of the formatting context this box
/// participates in; when the box establishes a new BFC its descendants get
/// a fresh, isolated context.
pub fn layout_block(
    tree: &mut BoxTree,
    id: BoxId,
    cb: &ContainingBlock,
    env: &LayoutEnv<'_>,
    floats: &mut FloatContext,
) {
    layout_block_impl(tree, id, cb, env, Some(floats), false);
}

/// Lay out an inline-level block container (inline-block and friends):
/// identical to block layout except that an `auto` width shrinks to fit
/// the content.
///
/// [§ 10.3.9 'Inline-block', non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#inlineblock-width)
///
/// "If 'width' is 'auto' ... the used value is the shrink-to-fit width."
pub fn layout_inline_wrapper(
    tree: &mut BoxTree,
    id: BoxId,
    cb: &ContainingBlock,
    env: &LayoutEnv<'_>,
) {
    layout_block_impl(tree, id, cb, env, None, true);
}

/// Resolve an optional min/max constraint against the containing block.
fn constraint(
    length: Length,
    reference: f32,
    box_sizing: BoxSizing,
    extras: f32,
) -> Option<f32> {
    match length {
        Length::Auto => None,
        other => Some(adjust_for_box_sizing(
            other.resolve(reference, AutoPolicy::Zero),
            box_sizing,
            extras,
        )),
    }
}

/// Resolve a specified height against a possibly-indefinite reference.
///
/// [§ 10.5](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
///
/// "If the height of the containing block is not specified explicitly ...
/// the value computes to 'auto'."
pub(crate) fn specified_height(length: Length, reference: Option<f32>) -> Option<f32> {
    match length {
        Length::Auto => None,
        Length::Percent(p) => reference.map(|h| h * p / 100.0),
        other => Some(other.resolve(0.0, AutoPolicy::Zero)),
    }
}

/// The resolved frame of a block-level container: edges installed, width
/// and content origin fixed, height still pending.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BlockFrame {
    /// Content box origin X.
    pub content_x: f32,
    /// Content box origin Y.
    pub content_y: f32,
    /// Used content width.
    pub content_width: f32,
    /// Horizontal padding + border.
    pub extras_h: f32,
    /// Vertical padding + border.
    pub extras_v: f32,
}

/// Resolve a container's edges, width (honoring auto margins), and content
/// origin, and write them into the geometry record. Shared by the block,
/// flex, and table strategies.
///
/// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
///
/// "'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
/// 'padding-right' + 'border-right-width' + 'margin-right' = width of
/// containing block"
pub(crate) fn establish_frame(
    tree: &mut BoxTree,
    id: BoxId,
    cb: &ContainingBlock,
    env: &LayoutEnv<'_>,
    shrink_to_fit: bool,
) -> BlockFrame {
    let style = tree.style(id).clone();

    // STEP 1: Resolve the box edges against the containing block width.
    //
    // [§ 8.3 / § 8.4](https://www.w3.org/TR/CSS2/box.html) — percentages
    // on margins and padding resolve against the containing block width.
    let border = EdgeSizes {
        top: style.border_width(style.border_top, cb.width),
        right: style.border_width(style.border_right, cb.width),
        bottom: style.border_width(style.border_bottom, cb.width),
        left: style.border_width(style.border_left, cb.width),
    };
    let padding = EdgeSizes::resolve(&style.padding, cb.width, AutoPolicy::Zero);
    let extras_h = padding.horizontal() + border.horizontal();
    let extras_v = padding.vertical() + border.vertical();
    let margin_top = style.margin.top.resolve(cb.width, AutoPolicy::Zero);
    let margin_bottom = style.margin.bottom.resolve(cb.width, AutoPolicy::Zero);

    let min_w = constraint(style.min_width, cb.width, style.box_sizing, extras_h);
    let max_w = constraint(style.max_width, cb.width, style.box_sizing, extras_h);

    // STEP 2: Resolve the used width and horizontal margins.
    let left_auto = style.margin.left.is_auto();
    let right_auto = style.margin.right.is_auto();
    let (content_width, margin_left, margin_right);

    if style.width.is_auto() {
        if shrink_to_fit {
            // [§ 10.3.5](https://www.w3.org/TR/CSS2/visudet.html#float-width)
            //
            // shrink-to-fit width: min(max-content, available).
            let ml = style.margin.left.resolve(cb.width, AutoPolicy::Zero);
            let mr = style.margin.right.resolve(cb.width, AutoPolicy::Zero);
            let available = (cb.width - ml - mr - extras_h).max(0.0);
            let max_content =
                (max_content_inline_size(tree, id, env.metrics) - extras_h).max(0.0);
            content_width = clamp_min_max(max_content.min(available), min_w, max_w);
            margin_left = ml;
            margin_right = mr;
        } else {
            // "If 'width' is 'auto', any other 'auto' values become '0'
            // and 'width' follows from the resulting equality."
            let ml = style.margin.left.resolve(cb.width, AutoPolicy::Zero);
            let mr = style.margin.right.resolve(cb.width, AutoPolicy::Zero);
            let w = (cb.width - ml - mr - extras_h).max(0.0);
            content_width = clamp_min_max(w, min_w, max_w);
            margin_left = ml;
            margin_right = mr;
        }
    } else {
        let mut w = style.width.resolve(cb.width, AutoPolicy::Zero);
        w = adjust_for_box_sizing(w, style.box_sizing, extras_h);
        w = clamp_min_max(w, min_w, max_w);
        content_width = w;

        let remaining = cb.width - w - extras_h;
        if left_auto && right_auto {
            // "If both 'margin-left' and 'margin-right' are 'auto', their
            // used values are equal. This horizontally centers the element."
            let half = (remaining / 2.0).max(0.0);
            margin_left = half;
            margin_right = half;
        } else if left_auto {
            margin_right = style.margin.right.resolve(cb.width, AutoPolicy::Zero);
            margin_left = remaining - margin_right;
        } else if right_auto {
            margin_left = style.margin.left.resolve(cb.width, AutoPolicy::Zero);
            margin_right = remaining - margin_left;
        } else {
            margin_left = style.margin.left.resolve(cb.width, AutoPolicy::Zero);
            margin_right = style.margin.right.resolve(cb.width, AutoPolicy::Zero);
        }
    }

    // STEP 3: Position the content box.
    let content_x = cb.x + margin_left + border.left + padding.left;
    let content_y = cb.y + margin_top + border.top + padding.top;
    let geometry = &mut tree.node_mut(id).geometry;
    geometry.x = content_x;
    geometry.y = content_y;
    geometry.set_edges(
        EdgeSizes {
            top: margin_top,
            right: margin_right,
            bottom: margin_bottom,
            left: margin_left,
        },
        border,
        padding,
    );
    geometry.set_content_size(content_width, 0.0);

    BlockFrame {
        content_x,
        content_y,
        content_width,
        extras_h,
        extras_v,
    }
}

fn layout_block_impl(
    tree: &mut BoxTree,
    id: BoxId,
    cb: &ContainingBlock,
    env: &LayoutEnv<'_>,
    parent_floats: Option<&mut FloatContext>,
    shrink_to_fit: bool,
) {
    let style = tree.style(id).clone();
    let frame = establish_frame(tree, id, cb, env, shrink_to_fit);
    let BlockFrame {
        content_x,
        content_y,
        content_width,
        extras_h: _,
        extras_v,
    } = frame;

    // STEP 4: Lay out children.
    //
    // [§ 9.4.1](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    //
    // A BFC root isolates floats: descendants use a fresh context and the
    // parent context never sees them.
    let establishes = style.establishes_bfc() || parent_floats.is_none();
    let mut own_floats = FloatContext::new();
    let child_floats: &mut FloatContext = if establishes {
        &mut own_floats
    } else {
        parent_floats.expect("in-flow block without a parent float context")
    };

    let child_height_ref = specified_height(style.height, cb.height)
        .map(|h| adjust_for_box_sizing(h, style.box_sizing, extras_v));

    let mut cursor = content_y;
    let mut prev_margin_bottom: Option<f32> = None;
    let mut pending_inline: Vec<BoxId> = Vec::new();
    let mut scroll_right: f32 = 0.0;
    let mut scroll_bottom: f32 = 0.0;

    for child in tree.child_ids(id) {
        let child_style = tree.style(child);
        let child_display = child_style.display;
        if child_display == Display::None {
            continue;
        }
        if child_style.position.is_out_of_flow() {
            // [§ 9.6](https://www.w3.org/TR/CSS2/visuren.html#absolute-positioning)
            //
            // Absolutely positioned boxes are laid out in a post-pass
            // rooted at the nearest positioned ancestor.
            continue;
        }

        if child_style.float.is_floated() {
            // [§ 9.5](https://www.w3.org/TR/CSS2/visuren.html#floats)
            //
            // Measure the float first (floats shrink to fit), then shift
            // it into the band. It does not advance the flow cursor.
            let float_side = match child_style.float {
                Float::Left => FloatSide::Left,
                _ => FloatSide::Right,
            };
            layout_inline_wrapper(
                tree,
                child,
                &ContainingBlock {
                    x: content_x,
                    y: cursor,
                    width: content_width,
                    height: None,
                },
                env,
            );
            let margin_box = tree.node(child).geometry.margin_box();
            let placed = child_floats.place(
                float_side,
                content_x,
                content_width,
                margin_box.width,
                margin_box.height,
                cursor,
            );
            tree.offset_subtree(child, placed.x - margin_box.x, placed.y - margin_box.y);
            scroll_right = scroll_right.max(placed.x + placed.width - content_x);
            scroll_bottom = scroll_bottom.max(placed.y + placed.height - content_y);
            continue;
        }

        let is_inline =
            child_display.is_inline_level() || tree.node(child).has_text();
        if is_inline {
            pending_inline.push(child);
            continue;
        }

        // A block-level child: first flush any accumulated inline run
        // into its own inline formatting context.
        //
        // [§ 9.2.1.1](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
        if !pending_inline.is_empty() {
            cursor = run_inline_group(
                tree,
                id,
                &std::mem::take(&mut pending_inline),
                child_floats,
                content_x,
                content_width,
                cursor,
                env,
            );
            prev_margin_bottom = None;
        }

        // [§ 9.5.2](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
        let clear = tree.style(child).clear;
        let mut child_y = cursor;
        if clear != Clear::None {
            let cleared = child_floats.clearance(clear, child_y);
            if cleared > child_y {
                child_y = cleared;
                prev_margin_bottom = None;
            }
        }

        // [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
        //
        // Adjacent vertical margins of in-flow siblings collapse. The
        // previous child's bottom margin is already inside `cursor`, so
        // the start Y is adjusted such that the child's own top margin
        // lands it at `previous border bottom + collapsed`.
        let child_margin_top = tree
            .style(child)
            .margin
            .top
            .resolve(cb.width, AutoPolicy::Zero);
        if let Some(prev) = prev_margin_bottom {
            let collapsed = collapse_two_margins(prev, child_margin_top);
            child_y = child_y - prev + collapsed - child_margin_top;
        }

        layout_box(
            tree,
            child,
            &ContainingBlock {
                x: content_x,
                y: child_y,
                width: content_width,
                height: child_height_ref,
            },
            env,
            child_floats,
        );

        let child_geometry = &tree.node(child).geometry;
        let border_box = child_geometry.border_box();
        // Advance by the child's margin-box height from the position it
        // was given, so relative offsets do not disturb the flow.
        cursor = child_y + child_geometry.margin_box_height;
        prev_margin_bottom = Some(child_geometry.margin.bottom);
        scroll_right = scroll_right.max(border_box.right() - content_x);
        scroll_bottom = scroll_bottom.max(border_box.bottom() - content_y);
    }

    if !pending_inline.is_empty() {
        cursor = run_inline_group(
            tree,
            id,
            &std::mem::take(&mut pending_inline),
            child_floats,
            content_x,
            content_width,
            cursor,
            env,
        );
    }

    // STEP 5: Resolve the used height.
    //
    // [§ 10.6.3](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
    //
    // Auto height reaches from the top content edge to the bottom of the
    // last in-flow child; a BFC root additionally contains its floats.
    let mut content_height = (cursor - content_y).max(0.0);
    if establishes {
        let floats_bottom = own_floats
            .bottom(FloatSide::Left)
            .max(own_floats.bottom(FloatSide::Right));
        content_height = content_height.max((floats_bottom - content_y).max(0.0));
    }
    if let Some(h) = specified_height(style.height, cb.height) {
        content_height = adjust_for_box_sizing(h, style.box_sizing, extras_v);
    }
    let min_h = constraint_height(style.min_height, cb.height, style.box_sizing, extras_v);
    let max_h = constraint_height(style.max_height, cb.height, style.box_sizing, extras_v);
    content_height = clamp_min_max(content_height, min_h, max_h);

    {
        let geometry = &mut tree.node_mut(id).geometry;
        geometry.set_content_size(content_width, content_height);
        geometry.extend_scroll(scroll_right, scroll_bottom);
        if geometry.baseline == 0.0 {
            // No text baseline inside: the content bottom serves.
            geometry.baseline = geometry.y + geometry.content_height;
        }
    }

    // STEP 6: Relative positioning offsets the finished subtree.
    //
    // [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
    //
    // "Once a box has been laid out according to the normal flow, it may
    // be shifted relative to this position."
    if matches!(style.position, Position::Relative | Position::Sticky) {
        let (dx, dy) = relative_offsets(&style, cb);
        tree.offset_subtree(id, dx, dy);
    }
}

/// Min/max height constraint resolution.
fn constraint_height(
    length: Length,
    reference: Option<f32>,
    box_sizing: BoxSizing,
    extras: f32,
) -> Option<f32> {
    specified_height(length, reference)
        .map(|h| adjust_for_box_sizing(h, box_sizing, extras))
}

/// [§ 9.4.3](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
///
/// "If both 'left' and 'right' are not auto, 'right' is ignored (for
/// left-to-right direction)."
fn relative_offsets(style: &ComputedStyle, cb: &ContainingBlock) -> (f32, f32) {
    let dx = if style.inset.left.is_definite() {
        style.inset.left.resolve(cb.width, AutoPolicy::Zero)
    } else if style.inset.right.is_definite() {
        -style.inset.right.resolve(cb.width, AutoPolicy::Zero)
    } else {
        0.0
    };
    let height_ref = cb.height.unwrap_or(0.0);
    let dy = if style.inset.top.is_definite() {
        style.inset.top.resolve(height_ref, AutoPolicy::Zero)
    } else if style.inset.bottom.is_definite() {
        -style.inset.bottom.resolve(height_ref, AutoPolicy::Zero)
    } else {
        0.0
    };
    (dx, dy)
}

/// Open an inline formatting context for a run of inline-level siblings
/// and return the new flow cursor.
fn run_inline_group(
    tree: &mut BoxTree,
    container: BoxId,
    group: &[BoxId],
    floats: &FloatContext,
    content_x: f32,
    content_width: f32,
    cursor: f32,
    env: &LayoutEnv<'_>,
) -> f32 {
    let mut fragments = Vec::new();
    collect_inline_fragments(tree, group, content_width, env, &mut fragments);
    let items = tokenize(tree, &fragments, env.metrics);
    let result = layout_items(
        tree,
        container,
        items,
        floats,
        content_x,
        content_width,
        cursor,
        env.metrics,
    );
    result.new_cursor_y
}
