//! Integration tests for flex layout.

use vellum_layout::box_model::Rect;
use vellum_layout::engine::{LayoutEnv, layout_document};
use vellum_layout::metrics::ApproximateFontMetrics;
use vellum_layout::tree::{BoxNode, BoxTree};
use vellum_style::{
    AlignItems, ComputedStyle, Display, FlexDirection, FlexWrap, JustifyContent, Length,
};

fn layout(tree: &mut BoxTree, width: f32) {
    let metrics = ApproximateFontMetrics;
    let env = LayoutEnv {
        viewport: Rect::new(0.0, 0.0, width, 800.0),
        metrics: &metrics,
    };
    layout_document(tree, &env);
}

fn flex_container(width: f32) -> ComputedStyle {
    ComputedStyle {
        display: Display::Flex,
        width: Length::Px(width),
        ..ComputedStyle::default()
    }
}

fn item(width: f32, height: f32, grow: f32) -> ComputedStyle {
    ComputedStyle {
        width: Length::Px(width),
        height: Length::Px(height),
        flex_grow: grow,
        ..ComputedStyle::default()
    }
}

#[test]
fn grow_distributes_free_space_proportionally() {
    // Container 300, two grow-1 items of intrinsic width 50 each: both
    // end up at main size 150, placed at offsets 0 and 150.
    let mut tree = BoxTree::new(BoxNode::element("div", flex_container(300.0)));
    let a = tree.insert(tree.root(), BoxNode::element("div", item(50.0, 10.0, 1.0)));
    let b = tree.insert(tree.root(), BoxNode::element("div", item(50.0, 10.0, 1.0)));

    layout(&mut tree, 300.0);

    let box_a = tree.node(a).geometry.border_box();
    let box_b = tree.node(b).geometry.border_box();
    assert_eq!(box_a.width, 150.0);
    assert_eq!(box_b.width, 150.0);
    assert_eq!(box_a.x, 0.0);
    assert_eq!(box_b.x, 150.0);
}

#[test]
fn unequal_grow_factors_split_proportionally() {
    let mut tree = BoxTree::new(BoxNode::element("div", flex_container(400.0)));
    let a = tree.insert(tree.root(), BoxNode::element("div", item(50.0, 10.0, 3.0)));
    let b = tree.insert(tree.root(), BoxNode::element("div", item(50.0, 10.0, 1.0)));

    layout(&mut tree, 400.0);

    // Free space 300: a gets 225, b gets 75.
    assert_eq!(tree.node(a).geometry.border_box().width, 275.0);
    assert_eq!(tree.node(b).geometry.border_box().width, 125.0);
}

#[test]
fn justify_space_between_pushes_items_apart() {
    let mut container = flex_container(300.0);
    container.justify_content = JustifyContent::SpaceBetween;
    let mut tree = BoxTree::new(BoxNode::element("div", container));
    let a = tree.insert(tree.root(), BoxNode::element("div", item(50.0, 10.0, 0.0)));
    let b = tree.insert(tree.root(), BoxNode::element("div", item(50.0, 10.0, 0.0)));

    layout(&mut tree, 300.0);

    assert_eq!(tree.node(a).geometry.border_box().x, 0.0);
    assert_eq!(tree.node(b).geometry.border_box().x, 250.0);
}

#[test]
fn wrap_packs_greedily_and_stacks_lines() {
    let mut container = flex_container(100.0);
    container.flex_wrap = FlexWrap::Wrap;
    let mut tree = BoxTree::new(BoxNode::element("div", container));
    let a = tree.insert(tree.root(), BoxNode::element("div", item(60.0, 10.0, 0.0)));
    let b = tree.insert(tree.root(), BoxNode::element("div", item(60.0, 10.0, 0.0)));

    layout(&mut tree, 100.0);

    let box_a = tree.node(a).geometry.border_box();
    let box_b = tree.node(b).geometry.border_box();
    assert_eq!(box_a.y, 0.0);
    assert_eq!(box_b.x, 0.0);
    assert!(box_b.y >= 10.0, "second item wraps to the next line");
}

#[test]
fn column_direction_stacks_along_the_block_axis() {
    let mut container = flex_container(200.0);
    container.flex_direction = FlexDirection::Column;
    let mut tree = BoxTree::new(BoxNode::element("div", container));
    let a = tree.insert(tree.root(), BoxNode::element("div", item(50.0, 30.0, 0.0)));
    let b = tree.insert(tree.root(), BoxNode::element("div", item(50.0, 40.0, 0.0)));

    layout(&mut tree, 200.0);

    let box_a = tree.node(a).geometry.border_box();
    let box_b = tree.node(b).geometry.border_box();
    assert_eq!(box_a.y, 0.0);
    assert_eq!(box_b.y, 30.0);
    assert_eq!(tree.node(tree.root()).geometry.content_height, 70.0);
}

#[test]
fn align_center_offsets_on_the_cross_axis() {
    let mut container = flex_container(300.0);
    container.height = Length::Px(100.0);
    container.align_items = AlignItems::Center;
    let mut tree = BoxTree::new(BoxNode::element("div", container));
    let a = tree.insert(tree.root(), BoxNode::element("div", item(50.0, 20.0, 0.0)));

    layout(&mut tree, 300.0);

    let box_a = tree.node(a).geometry.border_box();
    assert_eq!(box_a.y, 40.0, "centered in the 100px cross size");
}

#[test]
fn offsetting_moves_item_descendants_too() {
    let mut tree = BoxTree::new(BoxNode::element("div", flex_container(300.0)));
    let a = tree.insert(tree.root(), BoxNode::element("div", item(50.0, 30.0, 1.0)));
    let inner = tree.insert(a, BoxNode::element("div", item(10.0, 10.0, 0.0)));
    let b = tree.insert(tree.root(), BoxNode::element("div", item(50.0, 30.0, 1.0)));
    let inner_b = tree.insert(b, BoxNode::element("div", item(10.0, 10.0, 0.0)));

    layout(&mut tree, 300.0);

    // The second item landed at x=150; its child must be inside it.
    let outer = tree.node(b).geometry.border_box();
    let nested = tree.node(inner_b).geometry.border_box();
    assert!(nested.x >= outer.x);
    assert!(nested.x + nested.width <= outer.x + outer.width + 1e-3);
    let _ = inner;
    let _ = a;
}
