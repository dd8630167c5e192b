//! CSS flexbox layout.
//!
//! [§ 9 Flex Layout Algorithm](https://www.w3.org/TR/css-flexbox-1/#layout-algorithm)
//!
//! Supported: both axes (`row`/`column` and their reverses), wrapping,
//! `flex-grow` distribution with re-layout, `justify-content`,
//! `align-items`/`align-self`, `align-content`, and main/cross gaps.
//! Not supported: the § 9.7 shrink loop (shrink-eligible auto-width items
//! instead shrink to their preferred content width), `order`, baseline
//! alignment across mixed lines.

use vellum_style::{
    AlignContent, AlignItems, AutoPolicy, Display, JustifyContent, Length, adjust_for_box_sizing,
    clamp_min_max,
};

use crate::block::{BlockFrame, establish_frame, specified_height};
use crate::box_model::EdgeSizes;
use crate::engine::{ContainingBlock, LayoutEnv, layout_box};
use crate::float::FloatContext;
use crate::intrinsic::max_content_inline_size;
use crate::tree::{BoxId, BoxTree};

/// Per-item data collected during flex layout.
///
/// [§ 9.2 Line Length Determination](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
struct FlexItem {
    id: BoxId,
    /// Border-box main size after the basis pass.
    main_size: f32,
    /// Border-box cross size after the basis pass.
    cross_size: f32,
    /// (start, end) margins on the main axis (auto treated as zero).
    main_margins: (f32, f32),
    /// (start, end) margins on the cross axis.
    cross_margins: (f32, f32),
    /// flex-grow factor.
    grow: f32,
    /// Padding + border on the main axis (re-layout bookkeeping).
    extras_main: f32,
    /// True when `align-self` resolves to stretch and the cross size is
    /// auto.
    stretchable: bool,
}

impl FlexItem {
    /// Outer main-axis contribution: size plus both margins.
    fn main_contribution(&self) -> f32 {
        self.main_size + self.main_margins.0 + self.main_margins.1
    }

    /// Outer cross-axis contribution.
    fn cross_contribution(&self) -> f32 {
        self.cross_size + self.cross_margins.0 + self.cross_margins.1
    }
}

/// Main entry point for flex layout.
///
/// [§ 9 Flex Layout Algorithm](https://www.w3.org/TR/css-flexbox-1/#layout-algorithm)
pub fn layout_flex(tree: &mut BoxTree, id: BoxId, cb: &ContainingBlock, env: &LayoutEnv<'_>) {
    let style = tree.style(id).clone();
    let is_row = style.flex_direction.is_row();

    // STEP 1 (§ 9.2): Resolve the container's own frame. Inline-level flex
    // containers shrink to fit like inline-blocks.
    let shrink = style.display == Display::InlineFlex && style.width.is_auto();
    let frame: BlockFrame = establish_frame(tree, id, cb, env, shrink);

    let container_main: Option<f32> = if is_row {
        Some(frame.content_width)
    } else {
        specified_height(style.height, cb.height)
            .map(|h| adjust_for_box_sizing(h, style.box_sizing, frame.extras_v))
    };
    let container_cross: Option<f32> = if is_row {
        specified_height(style.height, cb.height)
            .map(|h| adjust_for_box_sizing(h, style.box_sizing, frame.extras_v))
    } else {
        Some(frame.content_width)
    };

    let main_gap_length = if is_row { style.column_gap } else { style.row_gap };
    let main_gap = main_gap_length.resolve(container_main.unwrap_or(0.0), AutoPolicy::Zero);
    let cross_gap_length = if is_row { style.row_gap } else { style.column_gap };
    let cross_gap = cross_gap_length.resolve(container_cross.unwrap_or(0.0), AutoPolicy::Zero);

    // STEP 2 (§ 9.2 step 3): Blockify children, resolve flex base sizes,
    // and lay each item out once against its basis.
    let mut items: Vec<FlexItem> = Vec::new();
    for child in tree.child_ids(id) {
        let child_style = tree.style(child).clone();
        if child_style.display == Display::None {
            continue;
        }
        // [§ 4.1 Absolutely-Positioned Flex Children](https://www.w3.org/TR/css-flexbox-1/#abspos-items)
        //
        // "An absolutely-positioned child of a flex container does not
        // participate in flex layout."
        if child_style.position.is_out_of_flow() {
            continue;
        }

        // [§ 4 Flex Items](https://www.w3.org/TR/css-flexbox-1/#flex-items)
        //
        // "The display value of a flex item is blockified." float has no
        // effect on a flex item either.
        let original_display = child_style.display;
        let effective_display = original_display.blockify();
        {
            let node = tree.node_mut(child);
            node.style.display = effective_display;
            node.style.float = vellum_style::Float::None;
        }

        let margin = EdgeSizes::resolve(&child_style.margin, frame.content_width, AutoPolicy::Zero);
        let (main_margins, cross_margins) = if is_row {
            ((margin.left, margin.right), (margin.top, margin.bottom))
        } else {
            ((margin.top, margin.bottom), (margin.left, margin.right))
        };

        let extras_main = main_axis_extras(tree, child, frame.content_width, is_row);

        // [§ 9.2 step 3](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
        //
        // Determine the flex base size (content-box units here):
        //   A. definite flex-basis → use it;
        //   B. auto basis with a definite main-axis size → that size;
        //   C. otherwise → max-content.
        let main_ref = container_main.unwrap_or(0.0);
        let specified_main = if is_row {
            child_style.width
        } else {
            child_style.height
        };
        let base_content = match child_style.flex_basis {
            Length::Auto => match specified_main {
                Length::Auto => {
                    let measured = max_content_inline_size(tree, child, env.metrics);
                    if is_row {
                        (measured - extras_main).max(0.0)
                    } else {
                        // Column: content block size comes from layout
                        // below; seed with zero so layout derives it.
                        0.0
                    }
                }
                other => adjust_for_box_sizing(
                    other.resolve(main_ref, AutoPolicy::Zero),
                    child_style.box_sizing,
                    extras_main,
                ),
            },
            basis => adjust_for_box_sizing(
                basis.resolve(main_ref, AutoPolicy::Zero),
                child_style.box_sizing,
                extras_main,
            ),
        };

        // Lay the child out against its basis to capture its cross size
        // (and, for column items with auto basis, the content main size).
        let child_cb = if is_row {
            ContainingBlock {
                x: frame.content_x,
                y: frame.content_y,
                width: base_content + main_axis_box_sizing_delta(&child_style, extras_main),
                height: container_cross,
            }
        } else {
            ContainingBlock {
                x: frame.content_x,
                y: frame.content_y,
                width: frame.content_width - cross_margins.0 - cross_margins.1,
                height: container_main,
            }
        };
        let mut scratch = FloatContext::new();
        layout_box(tree, child, &child_cb, env, &mut scratch);

        let border_box = tree.node(child).geometry.border_box();
        let (mut main_size, cross_size) = if is_row {
            (border_box.width, border_box.height)
        } else {
            (border_box.height, border_box.width)
        };
        if is_row {
            // The basis fixes the main size regardless of what layout
            // derived from it.
            main_size = base_content + extras_main;
        } else if !matches!(child_style.flex_basis, Length::Auto)
            || !matches!(specified_main, Length::Auto)
        {
            main_size = base_content + main_axis_extras(tree, child, frame.content_width, false);
        }

        // [§ 9.2 step 3E + § 7.1.1](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
        //
        // Shrink-eligible items (display compatibility rule: the effective
        // display equals the original, or the original was inline) with an
        // auto inline size shrink to their preferred content width.
        let shrink_eligible =
            effective_display == original_display || original_display == Display::Inline;
        if is_row && shrink_eligible && child_style.width.is_auto() {
            let preferred =
                (max_content_inline_size(tree, child, env.metrics)).min(main_size);
            let min_c = match child_style.min_width {
                Length::Auto => None,
                other => Some(other.resolve(main_ref, AutoPolicy::Zero)),
            };
            let max_c = match child_style.max_width {
                Length::Auto => None,
                other => Some(other.resolve(main_ref, AutoPolicy::Zero)),
            };
            main_size = clamp_min_max(preferred, min_c, max_c);
        }

        let stretchable = child_style.align_self.resolve(style.align_items) == AlignItems::Stretch
            && if is_row {
                child_style.height.is_auto()
            } else {
                child_style.width.is_auto()
            };

        items.push(FlexItem {
            id: child,
            main_size,
            cross_size,
            main_margins,
            cross_margins,
            grow: child_style.flex_grow,
            extras_main,
            stretchable,
        });
    }

    if items.is_empty() {
        finish_container(tree, id, &style, frame, cb, 0.0);
        return;
    }

    let used_main = container_main.unwrap_or_else(|| {
        // Indefinite main size (column with auto height, or shrink-to-fit
        // rows): the line holds everything, sized by its contents.
        let total: f32 = items.iter().map(FlexItem::main_contribution).sum();
        total + main_gap * (items.len() - 1) as f32
    });

    // STEP 3 (§ 9.3): Collect items into flex lines.
    let mut lines: Vec<Vec<usize>> = Vec::new();
    if style.flex_wrap.allows_wrapping() {
        let mut current: Vec<usize> = Vec::new();
        let mut current_main = 0.0;
        for (index, item) in items.iter().enumerate() {
            let add = item.main_contribution()
                + if current.is_empty() { 0.0 } else { main_gap };
            if !current.is_empty() && current_main + add > used_main {
                lines.push(std::mem::take(&mut current));
                current_main = 0.0;
                current.push(index);
                current_main += item.main_contribution();
            } else {
                current.push(index);
                current_main += add;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    } else {
        lines.push((0..items.len()).collect());
    }

    // STEP 4 (§ 9.7): Distribute positive free space to flex-grow items
    // and re-lay out each grown item at its target main size.
    for line in &lines {
        let line_main: f32 = line
            .iter()
            .map(|&i| items[i].main_contribution())
            .sum::<f32>()
            + main_gap * (line.len() - 1) as f32;
        let free = used_main - line_main;
        let grow_sum: f32 = line.iter().map(|&i| items[i].grow).sum();
        if free > 0.0 && grow_sum > 0.0 {
            for &i in line {
                let item = &mut items[i];
                if item.grow > 0.0 {
                    item.main_size += free * item.grow / grow_sum;
                }
            }
            // Re-layout grown items so their descendants see the new size.
            for &i in line {
                let item = &items[i];
                if item.grow <= 0.0 {
                    continue;
                }
                relayout_item(tree, env, frame, item, is_row, container_cross);
            }
            // Refresh cross sizes after the re-layout.
            for &i in line {
                let border_box = tree.node(items[i].id).geometry.border_box();
                items[i].cross_size = if is_row {
                    border_box.height
                } else {
                    border_box.width
                };
            }
        }
    }

    // STEP 5 (§ 9.4): Per-line cross sizes, then align-content.
    let line_cross_sizes: Vec<f32> = lines
        .iter()
        .map(|line| {
            line.iter()
                .map(|&i| items[i].cross_contribution())
                .fold(0.0_f32, f32::max)
        })
        .collect();
    let total_cross: f32 =
        line_cross_sizes.iter().sum::<f32>() + cross_gap * (lines.len() - 1) as f32;
    let used_cross = container_cross.unwrap_or(total_cross);
    let cross_free = (used_cross - total_cross).max(0.0);

    let (mut cross_cursor, between_lines, line_grow) =
        align_content_offsets(style.align_content, cross_free, lines.len());

    // STEP 6 (§ 9.5 / § 12): Placement.
    let main_origin = if is_row { frame.content_x } else { frame.content_y };
    let mut line_tops: Vec<f32> = Vec::new();
    for (line_index, line) in lines.iter().enumerate() {
        line_tops.push(cross_cursor);
        let line_cross = line_cross_sizes[line_index] + line_grow;

        let line_main: f32 = line
            .iter()
            .map(|&i| items[i].main_contribution())
            .sum::<f32>()
            + main_gap * (line.len() - 1) as f32;
        let free = (used_main - line_main).max(0.0);
        let (initial, between) =
            justify_offsets(style.justify_content, free, line.len());

        let mut cursor = main_origin + initial;
        let ordered: Vec<usize> = if style.flex_direction.is_reverse() {
            line.iter().rev().copied().collect()
        } else {
            line.clone()
        };
        for (pos, &i) in ordered.iter().enumerate() {
            let item = &items[i];
            if pos > 0 {
                cursor += main_gap + between;
            }

            // Cross offset from align-self (falling back to align-items).
            let align = tree
                .style(item.id)
                .align_self
                .resolve(style.align_items);
            let cross_offset = match align {
                AlignItems::Stretch | AlignItems::FlexStart | AlignItems::Baseline => {
                    item.cross_margins.0
                }
                AlignItems::FlexEnd => line_cross - item.cross_size - item.cross_margins.1,
                AlignItems::Center => {
                    item.cross_margins.0
                        + (line_cross - item.cross_contribution()).max(0.0) / 2.0
                }
            };

            // Stretch: grow an auto cross size to fill the line.
            if item.stretchable && align == AlignItems::Stretch {
                stretch_cross(tree, item, line_cross, is_row);
            }

            // Offset the entire laid-out subtree from its provisional
            // origin to its final position.
            let border_box = tree.node(item.id).geometry.border_box();
            let (target_x, target_y) = if is_row {
                (
                    cursor + item.main_margins.0,
                    frame.content_y + cross_cursor + cross_offset,
                )
            } else {
                (
                    frame.content_x + cross_cursor + cross_offset,
                    cursor + item.main_margins.0,
                )
            };
            tree.offset_subtree(item.id, target_x - border_box.x, target_y - border_box.y);

            cursor += item.main_contribution();
        }

        cross_cursor += line_cross + cross_gap + between_lines;
    }

    // STEP 7: Resolve the container's content size. Width was fixed by the
    // frame; the height comes from the relevant axis.
    let lines_cross_extent = (cross_cursor - cross_gap - between_lines).max(0.0);
    let content_height = if is_row {
        container_cross.unwrap_or(lines_cross_extent)
    } else {
        container_main.unwrap_or(used_main)
    };
    let geometry = &mut tree.node_mut(id).geometry;
    geometry.set_content_size(frame.content_width, content_height.max(0.0));
    if geometry.baseline == 0.0 {
        geometry.baseline = geometry.y + geometry.content_height;
    }
}

/// Finalize minimum bookkeeping for an empty container.
fn finish_container(
    tree: &mut BoxTree,
    id: BoxId,
    style: &vellum_style::ComputedStyle,
    frame: BlockFrame,
    cb: &ContainingBlock,
    content_height: f32,
) {
    let height = specified_height(style.height, cb.height)
        .map_or(content_height, |h| {
            adjust_for_box_sizing(h, style.box_sizing, frame.extras_v)
        });
    let geometry = &mut tree.node_mut(id).geometry;
    geometry.set_content_size(frame.content_width, height.max(0.0));
}

/// Padding + border on the main axis.
fn main_axis_extras(tree: &BoxTree, id: BoxId, reference: f32, is_row: bool) -> f32 {
    let style = tree.style(id);
    let padding = EdgeSizes::resolve(&style.padding, reference, AutoPolicy::Zero);
    let border = EdgeSizes {
        top: style.border_width(style.border_top, reference),
        right: style.border_width(style.border_right, reference),
        bottom: style.border_width(style.border_bottom, reference),
        left: style.border_width(style.border_left, reference),
    };
    if is_row {
        padding.horizontal() + border.horizontal()
    } else {
        padding.vertical() + border.vertical()
    }
}

/// When the child interprets widths as border-box, hand it back the extras
/// that `adjust_for_box_sizing` stripped so its own resolution round-trips.
fn main_axis_box_sizing_delta(style: &vellum_style::ComputedStyle, extras: f32) -> f32 {
    match style.box_sizing {
        vellum_style::BoxSizing::BorderBox => extras,
        vellum_style::BoxSizing::ContentBox => 0.0,
    }
}

/// Re-lay out an item whose target main size changed.
fn relayout_item(
    tree: &mut BoxTree,
    env: &LayoutEnv<'_>,
    frame: BlockFrame,
    item: &FlexItem,
    is_row: bool,
    container_cross: Option<f32>,
) {
    let content_main = (item.main_size - item.extras_main).max(0.0);
    let child_style = tree.style(item.id).clone();
    let mut scratch = FloatContext::new();
    if is_row {
        // Pin the width for the re-layout pass.
        tree.node_mut(item.id).style.width = Length::Px(
            content_main + main_axis_box_sizing_delta(&child_style, item.extras_main),
        );
        let child_cb = ContainingBlock {
            x: frame.content_x,
            y: frame.content_y,
            width: frame.content_width,
            height: container_cross,
        };
        layout_box(tree, item.id, &child_cb, env, &mut scratch);
    } else {
        tree.node_mut(item.id).style.height = Length::Px(
            content_main + main_axis_box_sizing_delta(&child_style, item.extras_main),
        );
        let child_cb = ContainingBlock {
            x: frame.content_x,
            y: frame.content_y,
            width: frame.content_width - item.cross_margins.0 - item.cross_margins.1,
            height: Some(content_main),
        };
        layout_box(tree, item.id, &child_cb, env, &mut scratch);
    }
}

/// Grow an auto cross size to fill the line (stretch alignment).
fn stretch_cross(tree: &mut BoxTree, item: &FlexItem, line_cross: f32, is_row: bool) {
    let target =
        (line_cross - item.cross_margins.0 - item.cross_margins.1).max(0.0);
    let geometry = &mut tree.node_mut(item.id).geometry;
    if is_row {
        let extras = geometry.padding.vertical() + geometry.border.vertical();
        geometry.set_content_size(geometry.content_width, (target - extras).max(0.0));
    } else {
        let extras = geometry.padding.horizontal() + geometry.border.horizontal();
        geometry.set_content_size((target - extras).max(0.0), geometry.content_height);
    }
}

/// [§ 8.2 'justify-content'](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
///
/// Returns `(initial offset, extra gap between items)` for the given free
/// space.
fn justify_offsets(justify: JustifyContent, free: f32, count: usize) -> (f32, f32) {
    if count == 0 {
        return (0.0, 0.0);
    }
    match justify {
        JustifyContent::FlexStart => (0.0, 0.0),
        JustifyContent::FlexEnd => (free, 0.0),
        JustifyContent::Center => (free / 2.0, 0.0),
        JustifyContent::SpaceBetween => {
            if count > 1 {
                (0.0, free / (count - 1) as f32)
            } else {
                (0.0, 0.0)
            }
        }
        JustifyContent::SpaceAround => {
            let slice = free / count as f32;
            (slice / 2.0, slice)
        }
        JustifyContent::SpaceEvenly => {
            let slice = free / (count + 1) as f32;
            (slice, slice)
        }
    }
}

/// [§ 8.4 'align-content'](https://www.w3.org/TR/css-flexbox-1/#align-content-property)
///
/// Returns `(initial cross offset, extra gap between lines, per-line cross
/// growth)`.
fn align_content_offsets(align: AlignContent, free: f32, line_count: usize) -> (f32, f32, f32) {
    if line_count == 0 {
        return (0.0, 0.0, 0.0);
    }
    match align {
        AlignContent::Stretch => (0.0, 0.0, free / line_count as f32),
        AlignContent::FlexStart => (0.0, 0.0, 0.0),
        AlignContent::FlexEnd => (free, 0.0, 0.0),
        AlignContent::Center => (free / 2.0, 0.0, 0.0),
        AlignContent::SpaceBetween => {
            if line_count > 1 {
                (0.0, free / (line_count - 1) as f32, 0.0)
            } else {
                (0.0, 0.0, 0.0)
            }
        }
        AlignContent::SpaceAround => {
            let slice = free / line_count as f32;
            (slice / 2.0, slice, 0.0)
        }
        AlignContent::SpaceEvenly => {
            let slice = free / (line_count + 1) as f32;
            (slice, slice, 0.0)
        }
    }
}
