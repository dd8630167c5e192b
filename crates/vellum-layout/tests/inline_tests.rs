//! Integration tests for inline layout: line breaking, alignment, runs.

use vellum_layout::box_model::Rect;
use vellum_layout::engine::{LayoutEnv, layout_document};
use vellum_layout::metrics::FontMetrics;
use vellum_layout::tree::{BoxNode, BoxTree};
use vellum_style::{ComputedStyle, Display, Length, TextAlign, WhiteSpace};

/// Deterministic metrics: every glyph advances by a fixed width, no real
/// ascent (layout falls back to 0.75 × font-size).
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

fn container_style(width: f32) -> ComputedStyle {
    ComputedStyle {
        width: Length::Px(width),
        font_size: 16.0,
        line_height: Length::Px(20.0),
        ..ComputedStyle::default()
    }
}

fn inline_text_style() -> ComputedStyle {
    ComputedStyle {
        display: Display::Inline,
        font_size: 16.0,
        line_height: Length::Px(20.0),
        ..ComputedStyle::default()
    }
}

fn layout(tree: &mut BoxTree, viewport_width: f32, char_width: f32) {
    let metrics = FixedMetrics { char_width };
    let env = LayoutEnv {
        viewport: Rect::new(0.0, 0.0, viewport_width, 800.0),
        metrics: &metrics,
    };
    layout_document(tree, &env);
}

#[test]
fn single_centered_paragraph() {
    // One 400px block, "Hello world" at 16px/20px, centered.
    let mut style = container_style(400.0);
    style.text_align = TextAlign::Center;
    let mut tree = BoxTree::new(BoxNode::element("p", style));
    let text = tree.insert(tree.root(), BoxNode::text(inline_text_style(), "Hello world"));

    layout(&mut tree, 400.0, 10.0);

    let runs = &tree.node(text).runs;
    assert_eq!(runs.len(), 1);
    let run = &runs[0];
    // 11 glyphs × 10px advance.
    assert_eq!(run.width, 110.0);
    // Centered: (400 − 110) / 2.
    assert_eq!(run.start_x, 145.0);
    // half-leading (20−16)/2 = 2, fallback ascent 0.75 × 16 = 12.
    assert_eq!(run.baseline, 14.0);
    assert!(run.is_last_line);
    assert_eq!(tree.node(text).geometry.content_height, 20.0);
}

#[test]
fn wrap_produces_one_run_per_line() {
    // Width fits "aaa bbb" (70px) but not the following space + "ccc".
    let mut tree = BoxTree::new(BoxNode::element("p", container_style(75.0)));
    let text = tree.insert(tree.root(), BoxNode::text(inline_text_style(), "aaa bbb ccc"));

    layout(&mut tree, 75.0, 10.0);

    let runs = &tree.node(text).runs;
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].line_index, 0);
    assert_eq!(runs[1].line_index, 1);
    assert_eq!(runs[0].text, "aaa bbb");
    assert_eq!(runs[1].text, "ccc");
    assert!(!runs[0].is_last_line);
    assert!(runs[1].is_last_line);
    // Second line sits one line-height below the first.
    assert_eq!(runs[1].baseline - runs[0].baseline, 20.0);
    // content height = line count × line-height.
    assert_eq!(tree.node(text).geometry.content_height, 40.0);
}

#[test]
fn trailing_collapsible_space_is_dropped() {
    let mut tree = BoxTree::new(BoxNode::element("p", container_style(400.0)));
    let text = tree.insert(tree.root(), BoxNode::text(inline_text_style(), "  hi  "));

    layout(&mut tree, 400.0, 10.0);

    let runs = &tree.node(text).runs;
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "hi");
    assert_eq!(runs[0].width, 20.0);
    assert_eq!(runs[0].start_x, 0.0);
}

#[test]
fn preserved_newlines_force_breaks() {
    let mut style = inline_text_style();
    style.white_space = WhiteSpace::Pre;
    let mut tree = BoxTree::new(BoxNode::element("pre", container_style(400.0)));
    let text = tree.insert(tree.root(), BoxNode::text(style, "one\ntwo"));

    layout(&mut tree, 400.0, 10.0);

    let runs = &tree.node(text).runs;
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].text, "one");
    assert_eq!(runs[1].text, "two");
}

#[test]
fn justify_stretches_all_but_the_last_line() {
    // "aa bb cc": the first line holds "aa bb" (50px) in a 55px band.
    let mut style = container_style(55.0);
    style.text_align = TextAlign::Justify;
    let mut tree = BoxTree::new(BoxNode::element("p", style));
    let text = tree.insert(tree.root(), BoxNode::text(inline_text_style(), "aa bb cc"));

    layout(&mut tree, 55.0, 10.0);

    let runs = &tree.node(text).runs;
    assert_eq!(runs.len(), 2);
    // First line stretched to the band width across its one space.
    assert_eq!(runs[0].space_count, 1);
    assert!((runs[0].width - 55.0).abs() < 1e-4);
    assert_eq!(runs[0].target_width, 55.0);
    // Last line stays at its natural width (start-aligned).
    assert_eq!(runs[1].width, 20.0);
    assert_eq!(runs[1].start_x, 0.0);
}

#[test]
fn break_word_splits_at_character_boundaries() {
    let mut style = inline_text_style();
    style.overflow_wrap = vellum_style::OverflowWrap::BreakWord;
    let mut tree = BoxTree::new(BoxNode::element("p", container_style(50.0)));
    let text = tree.insert(
        tree.root(),
        BoxNode::text(style, "aaaaaaaaaa"), // 100px, band is 50px
    );

    layout(&mut tree, 50.0, 10.0);

    let runs = &tree.node(text).runs;
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].text, "aaaaa");
    assert_eq!(runs[1].text, "aaaaa");
}

#[test]
fn inline_span_ancestors_get_bounding_boxes() {
    // <p><span><i>text</i></span></p>: span and i emit no runs themselves
    // but must enclose the text geometry.
    let mut tree = BoxTree::new(BoxNode::element("p", container_style(400.0)));
    let span_style = ComputedStyle {
        display: Display::Inline,
        ..ComputedStyle::default()
    };
    let span = tree.insert(tree.root(), BoxNode::element("span", span_style.clone()));
    let inner = tree.insert(span, BoxNode::element("i", span_style));
    let text = tree.insert(inner, BoxNode::text(inline_text_style(), "nested"));

    layout(&mut tree, 400.0, 10.0);

    let text_box = tree.node(text).geometry.content_box();
    for ancestor in [span, inner] {
        let g = &tree.node(ancestor).geometry;
        assert_eq!(g.x, text_box.x, "ancestor x must enclose the text");
        assert!(g.content_width >= text_box.width);
        assert!(g.content_height >= text_box.height);
    }
}

#[test]
fn geometry_invariants_hold_for_every_box() {
    let mut tree = BoxTree::new(BoxNode::element("p", container_style(300.0)));
    let _ = tree.insert(
        tree.root(),
        BoxNode::text(inline_text_style(), "several words of content here"),
    );

    layout(&mut tree, 300.0, 10.0);

    for id in tree.descendants(tree.root()) {
        let g = &tree.node(id).geometry;
        let expected =
            g.content_width + g.padding.left + g.padding.right + g.border.left + g.border.right;
        assert!(
            (g.border_box_width - expected).abs() < 1e-6,
            "I1 violated for box {id:?}"
        );
        assert!(g.scroll_width >= g.content_width);
        assert!(g.scroll_height >= g.content_height);
    }
}
