//! End-to-end pipeline tests: box tree in, PDF bytes out.

#[path = "../../vellum-pdf/tests/common/mod.rs"]
mod common;

use vellum_layout::tree::{BoxNode, BoxTree};
use vellum_pdf::FontLibrary;
use vellum_render::{ImageStore, RenderOptions, render_to_pdf};
use vellum_style::{ComputedStyle, Display, FontStyle, Length};

fn text_tree(family: &str, text: &str) -> BoxTree {
    let root_style = ComputedStyle {
        font_family: family.to_string(),
        ..ComputedStyle::default()
    };
    let text_style = ComputedStyle {
        display: Display::Inline,
        font_family: family.to_string(),
        font_size: 16.0,
        line_height: Length::Px(20.0),
        ..ComputedStyle::default()
    };
    let mut tree = BoxTree::new(BoxNode::element("body", root_style));
    let _ = tree.insert(tree.root(), BoxNode::text(text_style, text));
    tree
}

fn render(tree: &mut BoxTree, library: &FontLibrary) -> Vec<u8> {
    render_to_pdf(
        tree,
        library,
        &ImageStore::new(),
        &RenderOptions::default(),
    )
    .expect("render must succeed")
}

#[test]
fn base14_text_renders_as_a_literal_string() {
    let library = FontLibrary::new();
    let mut tree = text_tree("Helvetica", "Hello");
    let bytes = render(&mut tree, &library);
    let text = String::from_utf8_lossy(&bytes);

    assert!(text.starts_with("%PDF-1.4"));
    assert!(text.contains("(Hello) Tj"));
    assert!(text.contains("/BaseFont /Helvetica"));
    assert!(text.contains("/Encoding /WinAnsiEncoding"));
    assert!(text.contains("startxref"));
    assert!(text.ends_with("%%EOF\n"));
}

#[test]
fn identical_input_renders_identical_bytes() {
    let library = FontLibrary::new();
    let render_once = || {
        let mut tree = text_tree("Helvetica", "Deterministic output");
        render(&mut tree, &library)
    };
    assert_eq!(render_once(), render_once());
}

#[test]
fn embedded_face_emits_identity_h_subset() {
    let mut library = FontLibrary::new();
    let _ = library
        .add_face(common::sample_font(), "Test Sans", 400, FontStyle::Normal)
        .unwrap();
    let mut tree = text_tree("Test Sans", "Hello");
    let bytes = render(&mut tree, &library);
    let text = String::from_utf8_lossy(&bytes);

    assert!(text.contains("/Subtype /Type0"));
    assert!(text.contains("/Encoding /Identity-H"));
    assert!(text.contains("/Subtype /CIDFontType2"));
    assert!(text.contains("/CIDToGIDMap /Identity"));
    assert!(text.contains("/ToUnicode"));
    // Subset closure: "Hello" shapes to cids 1 2 3 3 4 in first-use
    // order; the text operator carries them as escaped big-endian pairs.
    assert!(text.contains("(\\000\\001\\000\\002\\000\\003\\000\\003\\000\\004) Tj"));
    // The BaseFont name carries a six-letter subset tag.
    let tag_at = text.find("/BaseFont /").and_then(|at| {
        let name = &text[at + 11..at + 30];
        name.find('+').map(|plus| name[..plus].to_string())
    });
    match tag_at {
        Some(tag) => {
            assert_eq!(tag.len(), 6);
            assert!(tag.chars().all(|c| c.is_ascii_uppercase()));
        }
        None => panic!("expected a tagged BaseFont name"),
    }
    // The ToUnicode CMap maps the subset cids back to "Hello"'s chars.
    assert!(text.contains("<0001> <0048>"));
    assert!(text.contains("<0004> <006f>"));
}

#[test]
fn tall_content_paginates() {
    let library = FontLibrary::new();
    let mut tree = BoxTree::new(BoxNode::element("body", ComputedStyle::default()));
    let _ = tree.insert(
        tree.root(),
        BoxNode::element(
            "div",
            ComputedStyle {
                height: Length::Px(2000.0),
                ..ComputedStyle::default()
            },
        ),
    );
    let bytes = render(&mut tree, &library);
    let text = String::from_utf8_lossy(&bytes);

    // 2000px of content against a 960px page content box: three pages.
    assert!(text.contains("/Count 3"));
    assert_eq!(text.matches("/Type /Pages").count(), 1);
    // Three page objects plus the pages node.
    assert_eq!(text.matches("/Type /Page").count(), 4);
}

#[test]
fn background_color_paints_a_rectangle() {
    let library = FontLibrary::new();
    let mut tree = BoxTree::new(BoxNode::element("body", ComputedStyle::default()));
    let _ = tree.insert(
        tree.root(),
        BoxNode::element(
            "div",
            ComputedStyle {
                width: Length::Px(100.0),
                height: Length::Px(50.0),
                background_color: Some(vellum_style::Rgba::rgb(255, 0, 0)),
                ..ComputedStyle::default()
            },
        ),
    );
    let bytes = render(&mut tree, &library);
    let text = String::from_utf8_lossy(&bytes);

    assert!(text.contains("1 0 0 rg"));
    assert!(text.contains(" re\nf\n"));
}

#[test]
fn metadata_lands_in_the_info_dictionary() {
    let library = FontLibrary::new();
    let mut tree = text_tree("Helvetica", "Titled");
    let mut options = RenderOptions::default();
    options.metadata.title = Some("Quarterly Report".to_string());
    options.metadata.producer = Some("vellum".to_string());
    let bytes = render_to_pdf(&mut tree, &library, &ImageStore::new(), &options).unwrap();
    let text = String::from_utf8_lossy(&bytes);

    assert!(text.contains("/Title (Quarterly Report)"));
    assert!(text.contains("/Producer (vellum)"));
    assert!(text.contains("/Info"));
}
