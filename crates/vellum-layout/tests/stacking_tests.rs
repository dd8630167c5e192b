//! Integration tests for stacking contexts and paint ordering.

use vellum_layout::stacking::{PaintInstruction, paint_order};
use vellum_layout::tree::{BoxId, BoxNode, BoxTree};
use vellum_style::{ComputedStyle, Position, ZIndex};

fn positioned(z: ZIndex) -> ComputedStyle {
    ComputedStyle {
        position: Position::Absolute,
        z_index: z,
        ..ComputedStyle::default()
    }
}

fn box_position(instructions: &[PaintInstruction], id: BoxId) -> usize {
    instructions
        .iter()
        .position(|i| matches!(i, PaintInstruction::Box(b) if *b == id))
        .expect("box must be painted")
}

#[test]
fn z_indices_paint_ascending_regardless_of_dom_order() {
    // DOM order: z=3, z=1, z=2 — paint order must be 1, 2, 3.
    let mut tree = BoxTree::new(BoxNode::element("html", ComputedStyle::default()));
    let z3 = tree.insert(tree.root(), BoxNode::element("div", positioned(ZIndex::Integer(3))));
    let z1 = tree.insert(tree.root(), BoxNode::element("div", positioned(ZIndex::Integer(1))));
    let z2 = tree.insert(tree.root(), BoxNode::element("div", positioned(ZIndex::Integer(2))));

    let order = paint_order(&tree);
    let p1 = box_position(&order, z1);
    let p2 = box_position(&order, z2);
    let p3 = box_position(&order, z3);
    assert!(p1 < p2 && p2 < p3);
}

#[test]
fn equal_z_ties_break_in_dom_order() {
    let mut tree = BoxTree::new(BoxNode::element("html", ComputedStyle::default()));
    let first = tree.insert(tree.root(), BoxNode::element("div", positioned(ZIndex::Integer(5))));
    let second = tree.insert(tree.root(), BoxNode::element("div", positioned(ZIndex::Integer(5))));

    let order = paint_order(&tree);
    assert!(box_position(&order, first) < box_position(&order, second));
}

#[test]
fn negative_z_paints_beneath_normal_flow() {
    let mut tree = BoxTree::new(BoxNode::element("html", ComputedStyle::default()));
    let behind = tree.insert(
        tree.root(),
        BoxNode::element("div", positioned(ZIndex::Integer(-1))),
    );
    let normal = tree.insert(tree.root(), BoxNode::element("div", ComputedStyle::default()));

    let order = paint_order(&tree);
    let root_at = box_position(&order, tree.root());
    let behind_at = box_position(&order, behind);
    let normal_at = box_position(&order, normal);
    assert!(root_at < behind_at, "root background first");
    assert!(behind_at < normal_at, "negative z beneath normal flow");
}

#[test]
fn opacity_wraps_the_nested_context_atomically() {
    let mut tree = BoxTree::new(BoxNode::element("html", ComputedStyle::default()));
    let translucent = tree.insert(
        tree.root(),
        BoxNode::element(
            "div",
            ComputedStyle {
                opacity: 0.5,
                ..ComputedStyle::default()
            },
        ),
    );
    let child = tree.insert(translucent, BoxNode::element("div", ComputedStyle::default()));

    let order = paint_order(&tree);
    let begin = order
        .iter()
        .position(|i| matches!(i, PaintInstruction::BeginOpacity(a) if (*a - 0.5).abs() < 1e-6))
        .expect("opacity scope must open");
    let end = order
        .iter()
        .position(|i| matches!(i, PaintInstruction::EndOpacity))
        .expect("opacity scope must close");
    let group_root = box_position(&order, translucent);
    let group_child = box_position(&order, child);
    assert!(begin < group_root && group_root < end);
    assert!(begin < group_child && group_child < end, "context is atomic");
}

#[test]
fn filter_opacity_multiplies_into_the_scope_alpha() {
    let mut tree = BoxTree::new(BoxNode::element("html", ComputedStyle::default()));
    let _ = tree.insert(
        tree.root(),
        BoxNode::element(
            "div",
            ComputedStyle {
                opacity: 0.8,
                filter: vec![vellum_style::Filter::Opacity(0.5)],
                ..ComputedStyle::default()
            },
        ),
    );

    let order = paint_order(&tree);
    assert!(order.iter().any(
        |i| matches!(i, PaintInstruction::BeginOpacity(a) if (*a - 0.4).abs() < 1e-6)
    ));
}

#[test]
fn paint_order_is_deterministic() {
    let build = || {
        let mut tree = BoxTree::new(BoxNode::element("html", ComputedStyle::default()));
        for z in [2, -1, 0, 2, 1] {
            let _ = tree.insert(tree.root(), BoxNode::element("div", positioned(ZIndex::Integer(z))));
        }
        paint_order(&tree)
    };
    assert_eq!(build(), build());
}
