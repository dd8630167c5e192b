//! CSS table layout.
//!
//! [§ 17 Tables](https://www.w3.org/TR/CSS2/tables.html)
//!
//! A fixed-point subset of automatic table layout: the grid is built from
//! row groups and rows, normalized to a rectangle, borders are resolved
//! per the separate/collapse model, column widths distribute the table
//! width proportionally to intrinsic weights, and row heights derive from
//! cell content.

use vellum_style::{
    AutoPolicy, BorderModel, BorderSide, ComputedStyle, Display, Length, Rgba,
    adjust_for_box_sizing,
};

use crate::block::{establish_frame, specified_height};
use crate::engine::{ContainingBlock, LayoutEnv, layout_box};
use crate::float::FloatContext;
use crate::intrinsic::max_content_inline_size;
use crate::tree::{BoxId, BoxTree};

/// The table grid: rows of optional cells (None = padding cell from a
/// short row), plus the owning row boxes.
struct TableGrid {
    rows: Vec<BoxId>,
    cells: Vec<Vec<Option<BoxId>>>,
    column_count: usize,
}

/// Main entry point for table layout.
///
/// [§ 17.5 Visual layout of table contents](https://www.w3.org/TR/CSS2/tables.html#model)
pub fn layout_table(tree: &mut BoxTree, id: BoxId, cb: &ContainingBlock, env: &LayoutEnv<'_>) {
    let style = tree.style(id).clone();
    let shrink = style.display == Display::InlineTable && style.width.is_auto();
    let frame = establish_frame(tree, id, cb, env, shrink);

    // STEP 1: Build the grid.
    //
    // [§ 17.2 The CSS table model](https://www.w3.org/TR/CSS2/tables.html#table-display)
    //
    // Rows come from row groups (thead/tbody/tfoot display types) and bare
    // rows, in document order; cells are the direct `table-cell` children
    // of each row. Short rows are null-padded to a rectangular matrix.
    let grid = build_grid(tree, id);
    if grid.rows.is_empty() || grid.column_count == 0 {
        let height = specified_height(style.height, cb.height)
            .map_or(0.0, |h| adjust_for_box_sizing(h, style.box_sizing, frame.extras_v));
        tree.node_mut(id)
            .geometry
            .set_content_size(frame.content_width, height);
        return;
    }

    // STEP 2: Resolve per-cell borders (cell → row → table inheritance,
    // then the border model).
    resolve_cell_borders(tree, id, &grid, style.border_model);

    // STEP 3: Column widths.
    //
    // [§ 17.5.2.2 Automatic table layout](https://www.w3.org/TR/CSS2/tables.html#auto-table-layout)
    //
    // Per-column intrinsic width is the max cell max-content contribution;
    // surplus table width distributes proportionally to those weights.
    let mut intrinsic = vec![0.0_f32; grid.column_count];
    for row in &grid.cells {
        for (col, cell) in row.iter().enumerate() {
            if let Some(cell) = *cell {
                let w = max_content_inline_size(tree, cell, env.metrics);
                if w > intrinsic[col] {
                    intrinsic[col] = w;
                }
            }
        }
    }
    let total: f32 = intrinsic.iter().sum();
    let column_widths: Vec<f32> = if total < frame.content_width {
        let surplus = frame.content_width - total;
        if total > 0.0 {
            intrinsic.iter().map(|w| w + surplus * w / total).collect()
        } else {
            // All-zero weights: split equally.
            let each = frame.content_width / grid.column_count as f32;
            vec![each; grid.column_count]
        }
    } else {
        // Wider than the table: column overflow is accepted (no
        // shrinking).
        intrinsic
    };

    // STEP 4: Row heights and placement, row-major.
    //
    // [§ 17.5.3 Table height algorithms](https://www.w3.org/TR/CSS2/tables.html#height-layout)
    //
    // "The height of a row is the maximum of ... the cells' heights."
    let mut cursor_y = frame.content_y;
    for (row_index, row_box) in grid.rows.iter().enumerate() {
        let mut row_height: f32 = 0.0;

        let mut col_x = frame.content_x;
        for (col, cell) in grid.cells[row_index].iter().enumerate() {
            if let Some(cell) = *cell {
                let cell_cb = ContainingBlock {
                    x: col_x,
                    y: cursor_y,
                    width: column_widths[col],
                    height: None,
                };
                let mut scratch = FloatContext::new();
                layout_box(tree, cell, &cell_cb, env, &mut scratch);
                let border_box = tree.node(cell).geometry.border_box();
                if border_box.height > row_height {
                    row_height = border_box.height;
                }
            }
            col_x += column_widths[col];
        }

        // The row box spans the full table width over its cells.
        let row_geometry = &mut tree.node_mut(*row_box).geometry;
        row_geometry.x = frame.content_x;
        row_geometry.y = cursor_y;
        row_geometry.set_content_size(frame.content_width, row_height);

        cursor_y += row_height;
    }

    // Row-group boxes cover the span of their rows.
    for group in tree.child_ids(id) {
        if !tree.style(group).display.is_row_group() {
            continue;
        }
        let mut top: Option<f32> = None;
        let mut bottom: f32 = 0.0;
        for row in tree.child_ids(group) {
            if tree.style(row).display != Display::TableRow {
                continue;
            }
            let g = &tree.node(row).geometry;
            if top.is_none() {
                top = Some(g.y);
            }
            bottom = bottom.max(g.y + g.content_height);
        }
        if let Some(top) = top {
            let geometry = &mut tree.node_mut(group).geometry;
            geometry.x = frame.content_x;
            geometry.y = top;
            geometry.set_content_size(frame.content_width, (bottom - top).max(0.0));
        }
    }

    // STEP 5: Table height.
    let mut content_height = (cursor_y - frame.content_y).max(0.0);
    if let Some(h) = specified_height(style.height, cb.height) {
        content_height =
            content_height.max(adjust_for_box_sizing(h, style.box_sizing, frame.extras_v));
    }
    let total_column_width: f32 = column_widths.iter().sum();
    let geometry = &mut tree.node_mut(id).geometry;
    geometry.set_content_size(frame.content_width, content_height);
    geometry.extend_scroll(total_column_width, content_height);
    if geometry.baseline == 0.0 {
        geometry.baseline = geometry.y + geometry.content_height;
    }
}

/// Collect rows and a rectangular cell matrix.
fn build_grid(tree: &BoxTree, table: BoxId) -> TableGrid {
    let mut rows: Vec<BoxId> = Vec::new();
    for child in &tree.node(table).children {
        let display = tree.style(*child).display;
        if display == Display::TableRow {
            rows.push(*child);
        } else if display.is_row_group() {
            for row in &tree.node(*child).children {
                if tree.style(*row).display == Display::TableRow {
                    rows.push(*row);
                }
            }
        }
    }

    let mut cells: Vec<Vec<Option<BoxId>>> = Vec::new();
    let mut column_count = 0;
    for row in &rows {
        let row_cells: Vec<Option<BoxId>> = tree
            .node(*row)
            .children
            .iter()
            .filter(|&&c| tree.style(c).display == Display::TableCell)
            .map(|&c| Some(c))
            .collect();
        column_count = column_count.max(row_cells.len());
        cells.push(row_cells);
    }
    // Null-pad short rows to the rectangle.
    for row in &mut cells {
        row.resize(column_count, None);
    }

    TableGrid {
        rows,
        cells,
        column_count,
    }
}

/// [§ 17.6 Borders](https://www.w3.org/TR/CSS2/tables.html#borders)
///
/// Resolve every cell's four borders with cell → row → table inheritance,
/// then apply the border model. The resolved sides are written back into
/// the cell styles so measurement, layout, and painting all agree.
fn resolve_cell_borders(tree: &mut BoxTree, table: BoxId, grid: &TableGrid, model: BorderModel) {
    // [§ 17.6.1 / § 17.6.2]
    //
    // "In the separated borders model, each cell has an individual
    // border" — an unstyled cell tag gets the conventional 1px; in the
    // collapsing model the default is none.
    let default_width = match model {
        BorderModel::Separate => 1.0,
        BorderModel::Collapse => 0.0,
    };
    let table_style = tree.style(table).clone();

    // First pass: inheritance.
    for (row_index, row_box) in grid.rows.iter().enumerate() {
        let row_style = tree.style(*row_box).clone();
        for cell in grid.cells[row_index].iter().flatten() {
            let cell_style = tree.style(*cell).clone();
            let resolved = [
                inherit_side(cell_style.border_top, row_style.border_top, table_style.border_top),
                inherit_side(
                    cell_style.border_right,
                    row_style.border_right,
                    table_style.border_right,
                ),
                inherit_side(
                    cell_style.border_bottom,
                    row_style.border_bottom,
                    table_style.border_bottom,
                ),
                inherit_side(
                    cell_style.border_left,
                    row_style.border_left,
                    table_style.border_left,
                ),
            ];
            let node = tree.node_mut(*cell);
            let fallback = BorderSide::new(default_width, Rgba::BLACK);
            node.style.border_top = Some(resolved[0].unwrap_or(fallback));
            node.style.border_right = Some(resolved[1].unwrap_or(fallback));
            node.style.border_bottom = Some(resolved[2].unwrap_or(fallback));
            node.style.border_left = Some(resolved[3].unwrap_or(fallback));
        }
    }

    if model != BorderModel::Collapse {
        return;
    }

    // Second pass (collapse): every shared edge keeps the wider border on
    // one side and clears the redundant one.
    //
    // "The border width of a collapsed border is the widest of the
    // borders that collapse at that point."
    for row_index in 0..grid.cells.len() {
        for col in 0..grid.column_count {
            let Some(cell) = grid.cells[row_index][col] else {
                continue;
            };
            // Vertical edge with the right neighbor.
            if col + 1 < grid.column_count
                && let Some(neighbor) = grid.cells[row_index][col + 1]
            {
                let right = side_width(tree.style(cell).border_right);
                let left = side_width(tree.style(neighbor).border_left);
                let winner = right.max(left);
                set_side_width(tree, cell, Side::Right, winner);
                set_side_width(tree, neighbor, Side::Left, 0.0);
            }
            // Horizontal edge with the row below.
            if row_index + 1 < grid.cells.len()
                && let Some(neighbor) = grid.cells[row_index + 1][col]
            {
                let bottom = side_width(tree.style(cell).border_bottom);
                let top = side_width(tree.style(neighbor).border_top);
                let winner = bottom.max(top);
                set_side_width(tree, cell, Side::Bottom, winner);
                set_side_width(tree, neighbor, Side::Top, 0.0);
            }
        }
    }
}

fn inherit_side(
    cell: Option<BorderSide>,
    row: Option<BorderSide>,
    table: Option<BorderSide>,
) -> Option<BorderSide> {
    cell.or(row).or(table)
}

fn side_width(side: Option<BorderSide>) -> f32 {
    side.map_or(0.0, |b| b.width.resolve(0.0, AutoPolicy::Zero))
}

enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

fn set_side_width(tree: &mut BoxTree, cell: BoxId, side: Side, width: f32) {
    let style: &mut ComputedStyle = &mut tree.node_mut(cell).style;
    let slot = match side {
        Side::Top => &mut style.border_top,
        Side::Right => &mut style.border_right,
        Side::Bottom => &mut style.border_bottom,
        Side::Left => &mut style.border_left,
    };
    match slot {
        Some(existing) => existing.width = Length::Px(width),
        None => {
            if width > 0.0 {
                *slot = Some(BorderSide::new(width, Rgba::BLACK));
            }
        }
    }
}
