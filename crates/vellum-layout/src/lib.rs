//! Layout engine for the Vellum renderer.
//!
//! Converts a styled box tree into positioned boxes with inline runs, and
//! resolves the order in which those boxes paint.
//!
//! # Relevant Specifications
//!
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS Display Module Level 3](https://www.w3.org/TR/css-display-3/)
//! - [CSS Flexible Box Layout Module Level 1](https://www.w3.org/TR/css-flexbox-1/)
//! - [CSS Text Module Level 3](https://www.w3.org/TR/css-text-3/)
//! - [CSS 2.1 Appendix E (stacking)](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! # Module Structure
//!
//! - [`box_model`] - Rectangles and edge sizes
//! - [`tree`] - The arena box tree with per-box geometry
//! - [`metrics`] - Font measurement interface
//! - [`float`] - Float exclusion bands per block formatting context
//! - [`inline`] - The inline formatting context (tokenize, break, place)
//! - [`intrinsic`] - Max-content measurement
//! - [`engine`] - Strategy selection and dispatch
//! - [`block`] - Block layout (and shrink-to-fit inline wrappers)
//! - [`flex`] - Flex layout
//! - [`table`] - Table layout
//! - [`positioned`] - Absolute/fixed post-pass
//! - [`stacking`] - Stacking contexts and the paint-order instruction list

pub mod block;
pub mod box_model;
pub mod engine;
pub mod flex;
pub mod float;
pub mod inline;
pub mod intrinsic;
pub mod metrics;
pub mod positioned;
pub mod stacking;
pub mod table;
pub mod tree;

// Re-exports for convenience
pub use box_model::{EdgeSizes, Rect};
pub use engine::{ContainingBlock, LayoutEnv, LayoutStrategy, layout_box, layout_document, strategy_for};
pub use float::{FloatContext, FloatSide, InlineOffsets, PlacedFloat};
pub use inline::{InlineFragment, InlineLayoutResult, LayoutItem};
pub use intrinsic::max_content_inline_size;
pub use metrics::{ApproximateFontMetrics, FontMetrics, resolve_ascent};
pub use stacking::{PaintInstruction, StackingContext, build_stacking_tree, paint_order};
pub use tree::{BoxGeometry, BoxId, BoxNode, BoxTree, InlineRun, IntrinsicSizes};
