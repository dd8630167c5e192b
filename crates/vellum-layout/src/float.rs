//! CSS float layout.
//!
//! [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
//!
//! "A float is a box that is shifted to the left or right on the current
//! line. The most interesting characteristic of a float is that content
//! may flow along its side (or be prohibited from doing so by the 'clear'
//! property)."

use serde::Serialize;

use vellum_style::Clear;

use crate::box_model::Rect;

/// Which side a float was placed on.
///
/// [§ 9.5.1](https://www.w3.org/TR/CSS2/visuren.html#float-position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FloatSide {
    /// "The element generates a block box that is floated to the left."
    Left,
    /// "The element generates a block box that is floated to the right."
    Right,
}

/// A single float that has been placed in the flow.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedFloat {
    /// Which side this float is on.
    pub side: FloatSide,
    /// The margin box of the float (absolute coordinates).
    pub margin_box: Rect,
}

/// The horizontal band available to inline content at some vertical range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InlineOffsets {
    /// Offset of the band's left edge from the container's content edge.
    pub start: f32,
    /// Offset of the band's right edge from the container's content edge.
    pub end: f32,
}

impl InlineOffsets {
    /// The band width (never negative).
    #[must_use]
    pub fn width(&self) -> f32 {
        (self.end - self.start).max(0.0)
    }
}

/// Tracks placed floats within one block formatting context.
///
/// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
///
/// "Since a float is not in the flow, non-positioned block boxes created
/// before and after the float box flow vertically as if the float did not
/// exist. However, the current and subsequent line boxes created next to
/// the float are shortened as necessary to make room for the margin box
/// of the float."
///
/// Floats added later never affect earlier-placed content: callers query
/// the band before placing a line, and only floats already in the lists
/// participate.
#[derive(Debug, Default)]
pub struct FloatContext {
    /// All left floats that have been placed, in placement order.
    pub left_floats: Vec<PlacedFloat>,
    /// All right floats that have been placed, in placement order.
    pub right_floats: Vec<PlacedFloat>,
}

impl FloatContext {
    /// Create an empty float context for a new block formatting context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            left_floats: Vec::new(),
            right_floats: Vec::new(),
        }
    }

    /// Returns true if there are no placed floats in this context.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.left_floats.is_empty() && self.right_floats.is_empty()
    }

    /// Record an already-positioned float.
    pub fn add(&mut self, side: FloatSide, margin_box: Rect) {
        let placed = PlacedFloat { side, margin_box };
        match side {
            FloatSide::Left => self.left_floats.push(placed),
            FloatSide::Right => self.right_floats.push(placed),
        }
    }

    /// [§ 9.5](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// The horizontal band available for inline content over the vertical
    /// range `[y_top, y_bottom)`.
    ///
    /// "The current and subsequent line boxes created next to the float
    /// are shortened as necessary to make room for the margin box of the
    /// float."
    ///
    /// Overlapping floats on the same side stack inward: the band
    /// collapses by the **sum** of their widths, matching side-by-side
    /// float placement.
    #[must_use]
    pub fn inline_offsets(&self, y_top: f32, y_bottom: f32, container_width: f32) -> InlineOffsets {
        let mut start: f32 = 0.0;
        for f in &self.left_floats {
            if f.margin_box.vertically_overlaps(y_top, y_bottom) {
                start += f.margin_box.width;
            }
        }

        let mut end: f32 = container_width;
        for f in &self.right_floats {
            if f.margin_box.vertically_overlaps(y_top, y_bottom) {
                end -= f.margin_box.width;
            }
        }

        InlineOffsets { start, end }
    }

    /// The smallest `y > y_top` at which the band widens: the nearest
    /// bottom edge of any float overlapping `[y_top, y_bottom)`.
    ///
    /// Used to skip past a float when a line does not fit beside it.
    /// Returns `None` when no overlapping float ends below `y_top`.
    #[must_use]
    pub fn next_unblocked_y(&self, y_top: f32, y_bottom: f32) -> Option<f32> {
        let mut next: Option<f32> = None;
        for f in self.left_floats.iter().chain(self.right_floats.iter()) {
            if !f.margin_box.vertically_overlaps(y_top, y_bottom) {
                continue;
            }
            let bottom = f.margin_box.bottom();
            if bottom > y_top && next.is_none_or(|n| bottom < n) {
                next = Some(bottom);
            }
        }
        next
    }

    /// [§ 10.6.7](https://www.w3.org/TR/CSS2/visudet.html#root-height)
    ///
    /// The bottom edge of the lowest float on a side (0 when the side has
    /// no floats).
    ///
    /// "If the element has any floating descendants whose bottom margin
    /// edge is below the element's bottom content edge, then the height is
    /// increased to include those edges."
    #[must_use]
    pub fn bottom(&self, side: FloatSide) -> f32 {
        let list = match side {
            FloatSide::Left => &self.left_floats,
            FloatSide::Right => &self.right_floats,
        };
        list.iter()
            .map(|f| f.margin_box.bottom())
            .fold(0.0_f32, f32::max)
    }

    /// [§ 9.5.2 The 'clear' property](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    ///
    /// "This property indicates which sides of an element's box(es) may
    /// not be adjacent to an earlier floating box."
    ///
    /// Returns the Y the cleared element must move down to (at least
    /// `current_y`).
    #[must_use]
    pub fn clearance(&self, clear: Clear, current_y: f32) -> f32 {
        let mut cleared = current_y;
        if matches!(clear, Clear::Left | Clear::Both) {
            cleared = cleared.max(self.bottom(FloatSide::Left));
        }
        if matches!(clear, Clear::Right | Clear::Both) {
            cleared = cleared.max(self.bottom(FloatSide::Right));
        }
        cleared
    }

    /// [§ 9.5.1 Positioning the float](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    ///
    /// Find a position for a new float of the given margin-box size, no
    /// higher than `current_y`, record it, and return its margin box.
    ///
    /// The placement rules covered:
    /// - Rule 4/8: placed as high as possible, at or below `current_y`.
    /// - Rule 9: left floats as far left as possible, right floats as far
    ///   right (inward of earlier same-side floats).
    /// - Rules 2/3/7: floats do not overlap each other — the candidate Y
    ///   advances past float bottoms until the box fits in the band.
    pub fn place(
        &mut self,
        side: FloatSide,
        content_x: f32,
        container_width: f32,
        box_width: f32,
        box_height: f32,
        current_y: f32,
    ) -> Rect {
        let mut y = current_y.max(0.0);

        loop {
            let band = self.inline_offsets(y, y + box_height.max(1.0), container_width);
            let fits = band.width() >= box_width || band.width() >= container_width;
            let no_escape = self.next_unblocked_y(y, y + box_height.max(1.0)).is_none();

            if fits || no_escape {
                // Rule 9: hug the relevant edge of the band.
                let x = match side {
                    FloatSide::Left => content_x + band.start,
                    FloatSide::Right => content_x + (band.end - box_width).max(0.0),
                };
                let rect = Rect::new(x, y, box_width, box_height);
                self.add(side, rect);
                return rect;
            }

            // Doesn't fit here; advance to the next float bottom edge.
            // (`no_escape` above guarantees this is Some.)
            if let Some(next) = self.next_unblocked_y(y, y + box_height.max(1.0)) {
                y = next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_shrinks_from_both_sides() {
        let mut ctx = FloatContext::new();
        ctx.add(FloatSide::Left, Rect::new(0.0, 0.0, 100.0, 50.0));
        ctx.add(FloatSide::Right, Rect::new(260.0, 0.0, 40.0, 30.0));

        let band = ctx.inline_offsets(0.0, 20.0, 300.0);
        assert_eq!(band.start, 100.0);
        assert_eq!(band.end, 260.0);
        assert_eq!(band.width(), 160.0);

        // Below the right float but still beside the left one.
        let band = ctx.inline_offsets(35.0, 45.0, 300.0);
        assert_eq!(band.start, 100.0);
        assert_eq!(band.end, 300.0);
    }

    #[test]
    fn same_side_floats_collapse_by_sum() {
        let mut ctx = FloatContext::new();
        ctx.add(FloatSide::Left, Rect::new(0.0, 0.0, 60.0, 40.0));
        ctx.add(FloatSide::Left, Rect::new(60.0, 0.0, 30.0, 20.0));

        let band = ctx.inline_offsets(0.0, 10.0, 300.0);
        assert_eq!(band.start, 90.0);
    }

    #[test]
    fn next_unblocked_y_is_nearest_bottom() {
        let mut ctx = FloatContext::new();
        ctx.add(FloatSide::Left, Rect::new(0.0, 0.0, 100.0, 50.0));
        ctx.add(FloatSide::Right, Rect::new(270.0, 0.0, 30.0, 20.0));

        assert_eq!(ctx.next_unblocked_y(0.0, 10.0), Some(20.0));
        assert_eq!(ctx.next_unblocked_y(25.0, 35.0), Some(50.0));
        assert_eq!(ctx.next_unblocked_y(60.0, 70.0), None);
    }

    #[test]
    fn clearance_moves_below_floats() {
        let mut ctx = FloatContext::new();
        ctx.add(FloatSide::Left, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(ctx.clearance(Clear::Left, 10.0), 50.0);
        assert_eq!(ctx.clearance(Clear::Right, 10.0), 10.0);
        assert_eq!(ctx.clearance(Clear::Both, 80.0), 80.0);
    }

    #[test]
    fn place_skips_past_blocking_float() {
        let mut ctx = FloatContext::new();
        ctx.add(FloatSide::Left, Rect::new(0.0, 0.0, 250.0, 40.0));

        // A 100-wide float cannot fit beside the 250-wide one in a
        // 300-wide container; it should drop below y=40.
        let rect = ctx.place(FloatSide::Left, 0.0, 300.0, 100.0, 30.0, 0.0);
        assert_eq!(rect.y, 40.0);
        assert_eq!(rect.x, 0.0);
    }
}
