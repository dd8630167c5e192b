//! Stacking contexts and paint ordering.
//!
//! [CSS 2.1 Appendix E: Elaborate description of Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! "Each box belongs to one stacking context. Each positioned box in a
//! given stacking context has an integer stack level, which is its
//! position on the z-axis relative to other stack levels within the same
//! stacking context."
//!
//! The resolver walks the laid-out tree into a stacking-context map, then
//! flattens it to an instruction list the content-stream renderer consumes
//! directly. Contexts are atomic: a nested context's instructions are
//! contiguous, bracketed by opacity scopes when its effective opacity is
//! below one.

use serde::Serialize;

use vellum_style::Display;

use crate::tree::{BoxId, BoxTree};

/// An atomic painting instruction.
///
/// [Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PaintInstruction {
    /// Paint one box: backgrounds, borders, text runs, replaced content.
    Box(BoxId),
    /// Open a group with the given alpha; everything until the matching
    /// [`PaintInstruction::EndOpacity`] composites through it.
    BeginOpacity(f32),
    /// Close the innermost opacity group.
    EndOpacity,
}

/// A stacking context in the painting order.
///
/// [§ 9.9 Layered presentation](https://www.w3.org/TR/CSS2/visuren.html#layers)
#[derive(Debug)]
pub struct StackingContext {
    /// The box establishing this context.
    pub root: BoxId,
    /// The stack level of this context (from z-index; auto acts as 0).
    pub z: i32,
    /// Child stacking contexts, in document order.
    pub children: Vec<StackingContext>,
    /// Descendant boxes that belong to this context without starting
    /// their own, in document order.
    pub boxes: Vec<BoxId>,
}

/// Build the stacking-context tree rooted at the box-tree root.
///
/// "Stacking contexts can be formed by: the root element of the document;
/// positioned elements with z-index other than 'auto'; elements with
/// opacity less than 1; elements with filter."
#[must_use]
pub fn build_stacking_tree(tree: &BoxTree) -> StackingContext {
    let root = tree.root();
    let mut context = StackingContext {
        root,
        z: tree.style(root).z_index.level(),
        children: Vec::new(),
        boxes: Vec::new(),
    };
    collect(tree, root, &mut context);
    context
}

fn collect(tree: &BoxTree, id: BoxId, context: &mut StackingContext) {
    for &child in &tree.node(id).children {
        let style = tree.style(child);
        if style.display == Display::None {
            continue;
        }
        if style.establishes_stacking_context() {
            let mut nested = StackingContext {
                root: child,
                z: style.z_index.level(),
                children: Vec::new(),
                boxes: Vec::new(),
            };
            collect(tree, child, &mut nested);
            context.children.push(nested);
        } else {
            context.boxes.push(child);
            collect(tree, child, context);
        }
    }
}

/// Resolve the full document paint order into a flat instruction list.
///
/// [Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// Within each stacking context:
/// 1. the context root itself,
/// 2. child contexts with negative stack levels, most negative first,
/// 3. in-flow and z-auto descendants in document order,
/// 4. child contexts with non-negative stack levels, ascending.
///
/// Document order breaks every tie (the sort is stable over the
/// document-ordered child list).
#[must_use]
pub fn paint_order(tree: &BoxTree) -> Vec<PaintInstruction> {
    let root_context = build_stacking_tree(tree);
    let mut out = Vec::new();
    emit_context(tree, &root_context, &mut out);
    out
}

fn emit_context(tree: &BoxTree, context: &StackingContext, out: &mut Vec<PaintInstruction>) {
    out.push(PaintInstruction::Box(context.root));

    // Stable sort keeps document order among equal stack levels.
    let mut ordered: Vec<&StackingContext> = context.children.iter().collect();
    ordered.sort_by_key(|c| c.z);

    for child in ordered.iter().filter(|c| c.z < 0) {
        emit_child(tree, child, out);
    }
    for &id in &context.boxes {
        out.push(PaintInstruction::Box(id));
    }
    for child in ordered.iter().filter(|c| c.z >= 0) {
        emit_child(tree, child, out);
    }
}

/// Emit a nested context atomically, bracketed by an opacity scope when
/// its effective opacity (style opacity × filter opacity entries) is
/// below one.
fn emit_child(tree: &BoxTree, context: &StackingContext, out: &mut Vec<PaintInstruction>) {
    let alpha = tree.style(context.root).effective_opacity();
    if alpha < 1.0 {
        out.push(PaintInstruction::BeginOpacity(alpha));
        emit_context(tree, context, out);
        out.push(PaintInstruction::EndOpacity);
    } else {
        emit_context(tree, context, out);
    }
}
