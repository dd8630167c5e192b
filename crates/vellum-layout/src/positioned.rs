//! Positioned layout: the out-of-flow post-pass.
//!
//! [§ 9.6 Absolute positioning](https://www.w3.org/TR/CSS2/visuren.html#absolute-positioning)
//!
//! "In the absolute positioning model, a box is explicitly offset with
//! respect to its containing block. It is removed from the normal flow
//! entirely."
//!
//! Flow layout skips absolutely positioned boxes; once every potential
//! containing block has final geometry, this pass walks the tree in
//! preorder (so positioned ancestors resolve before their positioned
//! descendants) and places each out-of-flow box.

use vellum_style::{AutoPolicy, Display};

use crate::block::{layout_block, layout_inline_wrapper};
use crate::box_model::Rect;
use crate::engine::{ContainingBlock, LayoutEnv};
use crate::float::FloatContext;
use crate::tree::{BoxId, BoxTree};

/// Lay out every `position: absolute` / `position: fixed` box.
pub fn layout_out_of_flow(tree: &mut BoxTree, env: &LayoutEnv<'_>) {
    for id in tree.descendants(tree.root()) {
        let style = tree.style(id);
        if style.display == Display::None || !style.position.is_out_of_flow() {
            continue;
        }
        place_out_of_flow(tree, id, env);
    }
}

/// [§ 10.1](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
///
/// "If the element has 'position: absolute', the containing block is
/// established by the nearest ancestor with a 'position' of 'absolute',
/// 'relative' or 'fixed'", using its padding box. Fixed boxes use the
/// viewport.
fn containing_rect(tree: &BoxTree, id: BoxId, env: &LayoutEnv<'_>) -> Rect {
    let style = tree.style(id);
    if style.position == vellum_style::Position::Fixed {
        return env.viewport;
    }
    for ancestor in tree.ancestors(id) {
        if tree.style(ancestor).is_positioned() {
            return tree.node(ancestor).geometry.padding_box();
        }
    }
    env.viewport
}

fn place_out_of_flow(tree: &mut BoxTree, id: BoxId, env: &LayoutEnv<'_>) {
    let style = tree.style(id).clone();
    let cb_rect = containing_rect(tree, id, env);

    let left_definite = style.inset.left.is_definite();
    let right_definite = style.inset.right.is_definite();
    let top_definite = style.inset.top.is_definite();
    let bottom_definite = style.inset.bottom.is_definite();

    let left = style.inset.left.resolve(cb_rect.width, AutoPolicy::Zero);
    let right = style.inset.right.resolve(cb_rect.width, AutoPolicy::Zero);
    let top = style.inset.top.resolve(cb_rect.height, AutoPolicy::Zero);
    let bottom = style.inset.bottom.resolve(cb_rect.height, AutoPolicy::Zero);

    // [§ 10.3.7](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-width)
    //
    // With auto width and both horizontal insets definite, the insets
    // determine the width; otherwise the box shrinks to fit.
    let mut scratch = FloatContext::new();
    if style.width.is_auto() && left_definite && right_definite {
        let cb = ContainingBlock {
            x: cb_rect.x + left,
            y: cb_rect.y,
            width: (cb_rect.width - left - right).max(0.0),
            height: Some(cb_rect.height),
        };
        layout_block(tree, id, &cb, env, &mut scratch);
    } else {
        let cb = ContainingBlock {
            x: cb_rect.x,
            y: cb_rect.y,
            width: cb_rect.width,
            height: Some(cb_rect.height),
        };
        layout_inline_wrapper(tree, id, &cb, env);
    }

    // Offset the finished subtree so the margin box honors the insets.
    // With neither inset definite on an axis, the box stays at the
    // position flow layout would have given it (approximated by the
    // containing block origin).
    let margin_box = tree.node(id).geometry.margin_box();
    let target_x = if left_definite {
        cb_rect.x + left
    } else if right_definite {
        cb_rect.x + cb_rect.width - right - margin_box.width
    } else {
        margin_box.x
    };
    let target_y = if top_definite {
        cb_rect.y + top
    } else if bottom_definite {
        cb_rect.y + cb_rect.height - bottom - margin_box.height
    } else {
        margin_box.y
    };
    tree.offset_subtree(id, target_x - margin_box.x, target_y - margin_box.y);
}
