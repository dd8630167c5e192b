//! Integration tests for table layout.

use vellum_layout::box_model::Rect;
use vellum_layout::engine::{LayoutEnv, layout_document};
use vellum_layout::metrics::FontMetrics;
use vellum_layout::tree::{BoxNode, BoxTree};
use vellum_style::{
    BorderModel, BorderSide, ComputedStyle, Display, Length, Rgba,
};

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

fn layout(tree: &mut BoxTree, width: f32) {
    let metrics = FixedMetrics { char_width: 10.0 };
    let env = LayoutEnv {
        viewport: Rect::new(0.0, 0.0, width, 800.0),
        metrics: &metrics,
    };
    layout_document(tree, &env);
}

fn display_style(display: Display) -> ComputedStyle {
    ComputedStyle {
        display,
        ..ComputedStyle::default()
    }
}

fn text_style() -> ComputedStyle {
    ComputedStyle {
        display: Display::Inline,
        line_height: Length::Px(20.0),
        ..ComputedStyle::default()
    }
}

/// Build a 2×2 table; returns (tree, cells grid).
fn two_by_two(table_style: ComputedStyle, texts: [[&str; 2]; 2]) -> (BoxTree, [[vellum_layout::BoxId; 2]; 2]) {
    let table_style = ComputedStyle {
        display: Display::Table,
        ..table_style
    };
    let mut tree = BoxTree::new(BoxNode::element("table", table_style));
    let mut cells = [[tree.root(); 2]; 2];
    for (row_index, row_texts) in texts.iter().enumerate() {
        let row = tree.insert(tree.root(), BoxNode::element("tr", display_style(Display::TableRow)));
        for (col, text) in row_texts.iter().enumerate() {
            let cell = tree.insert(row, BoxNode::element("td", display_style(Display::TableCell)));
            let _ = tree.insert(cell, BoxNode::text(text_style(), text));
            cells[row_index][col] = cell;
        }
    }
    (tree, cells)
}

#[test]
fn surplus_width_distributes_proportionally_to_intrinsics() {
    // Column intrinsics: 20px ("aa") vs 60px ("aaaaaa"), table 400px.
    // Separate-model default borders add 2px to each intrinsic (1px per
    // side): 22 and 62; surplus distributes proportionally.
    let style = ComputedStyle {
        width: Length::Px(400.0),
        ..ComputedStyle::default()
    };
    let (mut tree, cells) = two_by_two(style, [["aa", "aaaaaa"], ["aa", "aaaaaa"]]);
    layout(&mut tree, 400.0);

    let narrow = tree.node(cells[0][0]).geometry.border_box();
    let wide = tree.node(cells[0][1]).geometry.border_box();
    assert!(wide.width > narrow.width, "wider intrinsic gets more space");
    // Together they fill the table.
    assert!((narrow.width + wide.width - 400.0).abs() < 0.5);
    // Second column starts where the first ends.
    assert!((wide.x - narrow.right()).abs() < 0.5);
}

#[test]
fn equal_intrinsics_split_equally() {
    let style = ComputedStyle {
        width: Length::Px(200.0),
        ..ComputedStyle::default()
    };
    let (mut tree, cells) = two_by_two(style, [["aa", "aa"], ["aa", "aa"]]);
    layout(&mut tree, 200.0);

    let left = tree.node(cells[0][0]).geometry.border_box();
    let right = tree.node(cells[0][1]).geometry.border_box();
    assert!((left.width - 100.0).abs() < 0.5);
    assert!((right.x - 100.0).abs() < 0.5);
}

#[test]
fn row_height_is_the_tallest_cell() {
    // The first cell holds two preserved lines, the second one line.
    let style = ComputedStyle {
        width: Length::Px(200.0),
        ..ComputedStyle::default()
    };
    let (mut tree, cells) = two_by_two(style, [["aa", "aa"], ["aa", "aa"]]);
    {
        let node = tree.node_mut(cells[0][0]);
        let first_child = node.children[0];
        let text = tree.node_mut(first_child);
        text.text = Some("aa\naa".to_string());
        text.style.white_space = vellum_style::WhiteSpace::Pre;
    }
    layout(&mut tree, 200.0);

    let tall = tree.node(cells[0][0]).geometry.border_box();
    let short = tree.node(cells[0][1]).geometry.border_box();
    assert!(tall.height > short.height, "two lines beat one line");

    // The second row starts below the tallest first-row cell.
    let below = tree.node(cells[1][0]).geometry.border_box();
    assert!(below.y >= tall.bottom() - 0.5);
}

#[test]
fn separate_model_defaults_cells_to_one_pixel_borders() {
    let style = ComputedStyle {
        width: Length::Px(200.0),
        border_model: BorderModel::Separate,
        ..ComputedStyle::default()
    };
    let (mut tree, cells) = two_by_two(style, [["aa", "aa"], ["aa", "aa"]]);
    layout(&mut tree, 200.0);

    let g = &tree.node(cells[0][0]).geometry;
    assert_eq!(g.border.top, 1.0);
    assert_eq!(g.border.left, 1.0);
}

#[test]
fn collapsed_model_keeps_the_wider_shared_edge_once() {
    let style = ComputedStyle {
        width: Length::Px(200.0),
        border_model: BorderModel::Collapse,
        ..ComputedStyle::default()
    };
    let (mut tree, cells) = two_by_two(style, [["aa", "aa"], ["aa", "aa"]]);
    // Give the left cell a fat right border and the right cell a thin
    // left one; the shared edge must take the max and clear the loser.
    tree.node_mut(cells[0][0]).style.border_right = Some(BorderSide::new(4.0, Rgba::BLACK));
    tree.node_mut(cells[0][1]).style.border_left = Some(BorderSide::new(2.0, Rgba::BLACK));
    layout(&mut tree, 200.0);

    let left = &tree.node(cells[0][0]).geometry;
    let right = &tree.node(cells[0][1]).geometry;
    assert_eq!(left.border.right, 4.0);
    assert_eq!(right.border.left, 0.0);
}

#[test]
fn row_groups_wrap_their_rows() {
    let mut tree = BoxTree::new(BoxNode::element(
        "table",
        ComputedStyle {
            display: Display::Table,
            width: Length::Px(100.0),
            ..ComputedStyle::default()
        },
    ));
    let tbody = tree.insert(
        tree.root(),
        BoxNode::element("tbody", display_style(Display::TableRowGroup)),
    );
    let row = tree.insert(tbody, BoxNode::element("tr", display_style(Display::TableRow)));
    let cell = tree.insert(row, BoxNode::element("td", display_style(Display::TableCell)));
    let _ = tree.insert(cell, BoxNode::text(text_style(), "x"));

    layout(&mut tree, 100.0);

    let group = &tree.node(tbody).geometry;
    let row_geometry = &tree.node(row).geometry;
    assert_eq!(group.y, row_geometry.y);
    assert!(group.content_height >= row_geometry.content_height);
}
