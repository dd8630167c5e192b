//! Integration tests for float exclusion in block flow.

use vellum_layout::box_model::Rect;
use vellum_layout::engine::{LayoutEnv, layout_document};
use vellum_layout::metrics::FontMetrics;
use vellum_layout::tree::{BoxNode, BoxTree};
use vellum_style::{ComputedStyle, Display, Float, Length};

struct FixedMetrics {
    char_width: f32,
}

impl FontMetrics for FixedMetrics {
    fn text_width(&self, text: &str, _style: &ComputedStyle) -> f32 {
        text.chars().filter(|ch| !ch.is_control()).count() as f32 * self.char_width
    }

    fn ascent(&self, _style: &ComputedStyle) -> Option<f32> {
        None
    }
}

fn layout(tree: &mut BoxTree, width: f32, char_width: f32) {
    let metrics = FixedMetrics { char_width };
    let env = LayoutEnv {
        viewport: Rect::new(0.0, 0.0, width, 800.0),
        metrics: &metrics,
    };
    layout_document(tree, &env);
}

#[test]
fn left_float_narrows_lines_until_its_bottom() {
    // A 100×50 left float, then text in a 300-wide container. Each word
    // is 150px, so exactly one word fits in the 200px band beside the
    // float; past y=50 the full 300px is available.
    let container = ComputedStyle {
        width: Length::Px(300.0),
        font_size: 16.0,
        line_height: Length::Px(20.0),
        ..ComputedStyle::default()
    };
    let float_style = ComputedStyle {
        float: Float::Left,
        width: Length::Px(100.0),
        height: Length::Px(50.0),
        ..ComputedStyle::default()
    };
    let text_style = ComputedStyle {
        display: Display::Inline,
        font_size: 16.0,
        line_height: Length::Px(20.0),
        ..ComputedStyle::default()
    };

    let mut tree = BoxTree::new(BoxNode::element("div", container));
    let float_box = tree.insert(tree.root(), BoxNode::element("aside", float_style));
    let word = "a".repeat(15); // 150px at 10px per char
    let text = format!("{word} {word} {word} {word}");
    let text_box = tree.insert(tree.root(), BoxNode::text(text_style, &text));

    layout(&mut tree, 300.0, 10.0);

    // The float hugs the top-left corner.
    let float_rect = tree.node(float_box).geometry.margin_box();
    assert_eq!(float_rect.x, 0.0);
    assert_eq!(float_rect.y, 0.0);
    assert_eq!(float_rect.width, 100.0);
    assert_eq!(float_rect.height, 50.0);

    let runs = &tree.node(text_box).runs;
    assert_eq!(runs.len(), 4);
    // Lines beside the float start past it with a 200px band.
    assert_eq!(runs[0].start_x, 100.0);
    assert_eq!(runs[0].target_width, 200.0);
    assert_eq!(runs[1].start_x, 100.0);
    assert_eq!(runs[2].start_x, 100.0);
    // The fourth line starts at y=60, below the float: full width again.
    assert_eq!(runs[3].start_x, 0.0);
    assert_eq!(runs[3].target_width, 300.0);
}

#[test]
fn container_height_contains_flow_content_past_the_float() {
    let container = ComputedStyle {
        width: Length::Px(300.0),
        line_height: Length::Px(20.0),
        ..ComputedStyle::default()
    };
    let float_style = ComputedStyle {
        float: Float::Left,
        width: Length::Px(100.0),
        height: Length::Px(50.0),
        ..ComputedStyle::default()
    };
    let text_style = ComputedStyle {
        display: Display::Inline,
        line_height: Length::Px(20.0),
        ..ComputedStyle::default()
    };

    let mut tree = BoxTree::new(BoxNode::element("div", container));
    let _ = tree.insert(tree.root(), BoxNode::element("aside", float_style));
    let _ = tree.insert(tree.root(), BoxNode::text(text_style, "hi"));

    layout(&mut tree, 300.0, 10.0);

    // One 20px line; the root (outermost BFC) still contains the 50px
    // float.
    let g = &tree.node(tree.root()).geometry;
    assert!(g.content_height >= 20.0);
}

#[test]
fn cleared_block_moves_below_the_float() {
    let container = ComputedStyle {
        width: Length::Px(300.0),
        ..ComputedStyle::default()
    };
    let float_style = ComputedStyle {
        float: Float::Left,
        width: Length::Px(100.0),
        height: Length::Px(50.0),
        ..ComputedStyle::default()
    };
    let cleared = ComputedStyle {
        clear: vellum_style::Clear::Left,
        height: Length::Px(10.0),
        ..ComputedStyle::default()
    };

    let mut tree = BoxTree::new(BoxNode::element("div", container));
    let _ = tree.insert(tree.root(), BoxNode::element("aside", float_style));
    let block = tree.insert(tree.root(), BoxNode::element("div", cleared));

    layout(&mut tree, 300.0, 10.0);

    assert_eq!(tree.node(block).geometry.border_box().y, 50.0);
}
