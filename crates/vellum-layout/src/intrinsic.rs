//! Intrinsic (content-based) size measurement.
//!
//! [§ 9.9.1 Flex Item Intrinsic Size Contributions](https://www.w3.org/TR/css-flexbox-1/#intrinsic-item-contributions)
//!
//! Used for shrink-to-fit widths (floats, inline-blocks), flex base sizes,
//! and table column distribution. This is a READ-ONLY measurement: it does
//! not modify positions or store layout results, it only computes the
//! natural max-content width.

use vellum_style::{AutoPolicy, Display, Length};

use crate::metrics::FontMetrics;
use crate::tree::{BoxId, BoxTree};

/// Maximum recursion depth for [`max_content_inline_size`].
///
/// Prevents stack overflow on pathologically deep trees: measurement can
/// run on top of existing layout recursion, so the depth here is capped
/// independently. Boxes beyond the limit are treated as zero-width.
const MAX_MEASURE_DEPTH: usize = 64;

/// Compute a box's max-content inline size without performing layout.
///
/// Words never wrap in a max-content measurement, so text contributes its
/// single-line advance (per line for preserved-newline modes).
#[must_use]
pub fn max_content_inline_size(tree: &BoxTree, id: BoxId, metrics: &dyn FontMetrics) -> f32 {
    measure_inner(tree, id, metrics, 0)
}

fn measure_inner(tree: &BoxTree, id: BoxId, metrics: &dyn FontMetrics, depth: usize) -> f32 {
    let node = tree.node(id);
    let style = &node.style;

    if style.display == Display::None {
        return 0.0;
    }

    // Case 1: text content — the widest unwrapped line.
    if let Some(text) = &node.text
        && !text.is_empty()
    {
        let transformed = style.text_transform.apply(text);
        if style.white_space.preserves_newlines() {
            return transformed
                .split('\n')
                .map(|line| metrics.text_width(line, style))
                .fold(0.0_f32, f32::max);
        }
        let collapsed = transformed.split_whitespace().collect::<Vec<_>>().join(" ");
        return metrics.text_width(&collapsed, style);
    }

    // Case 2: replaced content — intrinsic width.
    if node.replaced_src.is_some() {
        return node.intrinsic.map_or(0.0, |i| i.inline);
    }

    // Case 3: explicit pixel width. Percentages depend on the containing
    // block and contribute nothing definite here.
    if let Length::Px(px) = style.width {
        return px.max(0.0);
    }

    // Depth guard: boxes beyond the limit contribute zero width; callers
    // fall back to distributing remaining space.
    if depth >= MAX_MEASURE_DEPTH {
        return 0.0;
    }

    // Case 4: auto width — derive from children plus horizontal
    // non-content extras.
    let extra = horizontal_extras(tree, id);
    if node.children.is_empty() {
        return extra;
    }

    let all_inline = node
        .children
        .iter()
        .all(|&c| tree.style(c).display.is_inline_level() || tree.node(c).has_text());

    if all_inline {
        // Max-content: inline children lay out on one unbroken line.
        let sum: f32 = node
            .children
            .iter()
            .map(|&c| measure_inner(tree, c, metrics, depth + 1))
            .sum();
        sum + extra
    } else {
        let max = node
            .children
            .iter()
            .map(|&c| measure_inner(tree, c, metrics, depth + 1))
            .fold(0.0_f32, f32::max);
        max + extra
    }
}

/// Horizontal padding + border (definite pixel values only).
fn horizontal_extras(tree: &BoxTree, id: BoxId) -> f32 {
    let style = tree.style(id);
    let pad = style.padding.left.resolve(0.0, AutoPolicy::Zero)
        + style.padding.right.resolve(0.0, AutoPolicy::Zero);
    let border = style.border_width(style.border_left, 0.0)
        + style.border_width(style.border_right, 0.0);
    pad + border
}
