//! Integration tests for block layout: widths, margins, collapsing.

use vellum_layout::box_model::Rect;
use vellum_layout::engine::{LayoutEnv, layout_document};
use vellum_layout::metrics::ApproximateFontMetrics;
use vellum_layout::tree::{BoxNode, BoxTree};
use vellum_style::{
    BorderSide, BoxSizing, ComputedStyle, Length, LengthEdges, Position, Rgba,
};

fn layout(tree: &mut BoxTree, width: f32) {
    let metrics = ApproximateFontMetrics;
    let env = LayoutEnv {
        viewport: Rect::new(0.0, 0.0, width, 800.0),
        metrics: &metrics,
    };
    layout_document(tree, &env);
}

#[test]
fn both_auto_margins_center_the_box() {
    let mut tree = BoxTree::new(BoxNode::element("body", ComputedStyle::default()));
    let child = tree.insert(
        tree.root(),
        BoxNode::element(
            "div",
            ComputedStyle {
                width: Length::Px(100.0),
                height: Length::Px(10.0),
                margin: LengthEdges {
                    left: Length::Auto,
                    right: Length::Auto,
                    ..LengthEdges::default()
                },
                ..ComputedStyle::default()
            },
        ),
    );

    layout(&mut tree, 400.0);

    let border_box = tree.node(child).geometry.border_box();
    assert_eq!(border_box.x, 150.0);
    assert_eq!(border_box.width, 100.0);
}

#[test]
fn border_box_sizing_subtracts_padding_and_border() {
    let mut tree = BoxTree::new(BoxNode::element("body", ComputedStyle::default()));
    let child = tree.insert(
        tree.root(),
        BoxNode::element(
            "div",
            ComputedStyle {
                width: Length::Px(100.0),
                height: Length::Px(50.0),
                box_sizing: BoxSizing::BorderBox,
                padding: LengthEdges::uniform(Length::Px(10.0)),
                border_top: Some(BorderSide::new(5.0, Rgba::BLACK)),
                border_right: Some(BorderSide::new(5.0, Rgba::BLACK)),
                border_bottom: Some(BorderSide::new(5.0, Rgba::BLACK)),
                border_left: Some(BorderSide::new(5.0, Rgba::BLACK)),
                ..ComputedStyle::default()
            },
        ),
    );

    layout(&mut tree, 400.0);

    let g = &tree.node(child).geometry;
    // 100 − 2×10 padding − 2×5 border = 70 content.
    assert_eq!(g.content_width, 70.0);
    assert_eq!(g.border_box_width, 100.0);
    assert_eq!(g.content_height, 20.0);
    assert_eq!(g.border_box_height, 50.0);
}

#[test]
fn adjacent_sibling_margins_collapse_to_the_max() {
    let mut tree = BoxTree::new(BoxNode::element("body", ComputedStyle::default()));
    let first = tree.insert(
        tree.root(),
        BoxNode::element(
            "div",
            ComputedStyle {
                height: Length::Px(10.0),
                margin: LengthEdges {
                    bottom: Length::Px(20.0),
                    ..LengthEdges::default()
                },
                ..ComputedStyle::default()
            },
        ),
    );
    let second = tree.insert(
        tree.root(),
        BoxNode::element(
            "div",
            ComputedStyle {
                height: Length::Px(10.0),
                margin: LengthEdges {
                    top: Length::Px(30.0),
                    ..LengthEdges::default()
                },
                ..ComputedStyle::default()
            },
        ),
    );

    layout(&mut tree, 400.0);

    let first_bottom = tree.node(first).geometry.border_box().bottom();
    let second_top = tree.node(second).geometry.border_box().y;
    // Separation is max(20, 30), not 50.
    assert_eq!(second_top - first_bottom, 30.0);
}

#[test]
fn min_width_wins_over_max_width() {
    let mut tree = BoxTree::new(BoxNode::element("body", ComputedStyle::default()));
    let child = tree.insert(
        tree.root(),
        BoxNode::element(
            "div",
            ComputedStyle {
                width: Length::Px(150.0),
                min_width: Length::Px(200.0),
                max_width: Length::Px(100.0),
                height: Length::Px(10.0),
                ..ComputedStyle::default()
            },
        ),
    );

    layout(&mut tree, 400.0);
    assert_eq!(tree.node(child).geometry.content_width, 200.0);
}

#[test]
fn relative_position_offsets_without_affecting_flow() {
    let mut tree = BoxTree::new(BoxNode::element("body", ComputedStyle::default()));
    let shifted = tree.insert(
        tree.root(),
        BoxNode::element(
            "div",
            ComputedStyle {
                position: Position::Relative,
                inset: LengthEdges {
                    left: Length::Px(15.0),
                    top: Length::Px(5.0),
                    right: Length::Auto,
                    bottom: Length::Auto,
                },
                height: Length::Px(10.0),
                ..ComputedStyle::default()
            },
        ),
    );
    let after = tree.insert(
        tree.root(),
        BoxNode::element(
            "div",
            ComputedStyle {
                height: Length::Px(10.0),
                ..ComputedStyle::default()
            },
        ),
    );

    layout(&mut tree, 400.0);

    let shifted_box = tree.node(shifted).geometry.border_box();
    assert_eq!(shifted_box.x, 15.0);
    assert_eq!(shifted_box.y, 5.0);
    // The following sibling flows as if the offset never happened.
    assert_eq!(tree.node(after).geometry.border_box().y, 10.0);
}

#[test]
fn absolute_child_resolves_against_positioned_ancestor() {
    let mut tree = BoxTree::new(BoxNode::element("body", ComputedStyle::default()));
    let anchor = tree.insert(
        tree.root(),
        BoxNode::element(
            "div",
            ComputedStyle {
                position: Position::Relative,
                width: Length::Px(200.0),
                height: Length::Px(100.0),
                ..ComputedStyle::default()
            },
        ),
    );
    let abs = tree.insert(
        anchor,
        BoxNode::element(
            "div",
            ComputedStyle {
                position: Position::Absolute,
                width: Length::Px(50.0),
                height: Length::Px(20.0),
                inset: LengthEdges {
                    left: Length::Px(10.0),
                    top: Length::Px(30.0),
                    right: Length::Auto,
                    bottom: Length::Auto,
                },
                ..ComputedStyle::default()
            },
        ),
    );

    layout(&mut tree, 400.0);

    let abs_box = tree.node(abs).geometry.margin_box();
    assert_eq!(abs_box.x, 10.0);
    assert_eq!(abs_box.y, 30.0);
}

#[test]
fn specified_height_overrides_content_height() {
    let mut tree = BoxTree::new(BoxNode::element("body", ComputedStyle::default()));
    let child = tree.insert(
        tree.root(),
        BoxNode::element(
            "div",
            ComputedStyle {
                height: Length::Px(300.0),
                ..ComputedStyle::default()
            },
        ),
    );
    layout(&mut tree, 400.0);
    assert_eq!(tree.node(child).geometry.content_height, 300.0);
}
