//! The display property.
//!
//! [CSS Display Module Level 3](https://www.w3.org/TR/css-display-3/)

use serde::Serialize;

/// [§ 2 The display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// "The display property defines an element's display type, which consists
/// of the two basic qualities of how an element generates boxes: the outer
/// display type ... and the inner display type."
///
/// The styled tree arrives with final keyword values, so the two qualities
/// are carried as one flat enum with predicates for each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Display {
    /// "The element and its descendants generate no boxes or text runs."
    None,
    /// Block-level block container.
    #[default]
    Block,
    /// Inline-level; contents participate in the parent's inline context.
    Inline,
    /// [§ 9.2.4 Atomic inline-level boxes](https://www.w3.org/TR/css-display-3/#atomic-inline)
    ///
    /// "An inline-level box that is not an inline box ... participates in
    /// its inline formatting context as a single opaque box."
    InlineBlock,
    /// Inline-level flex container.
    InlineFlex,
    /// Inline-level grid container (laid out as inline-block — grid layout
    /// is out of scope).
    InlineGrid,
    /// Inline-level table wrapper.
    InlineTable,
    /// Block-level flex container.
    Flex,
    /// Block-level grid container (laid out as a block — grid layout is out
    /// of scope).
    Grid,
    /// Table wrapper box.
    Table,
    /// Table row.
    TableRow,
    /// Table row group (`<tbody>`).
    TableRowGroup,
    /// Table header group (`<thead>`).
    TableHeaderGroup,
    /// Table footer group (`<tfoot>`).
    TableFooterGroup,
    /// Table cell.
    TableCell,
    /// [§ 2.4 flow-root](https://www.w3.org/TR/css-display-3/#valdef-display-flow-root)
    ///
    /// "The element generates a block container box, and lays out its
    /// contents using flow layout. It always establishes a new block
    /// formatting context."
    FlowRoot,
}

impl Display {
    /// [§ 2.1 Outer display roles](https://www.w3.org/TR/css-display-3/#outer-role)
    ///
    /// True for inline-level boxes (those that participate in an inline
    /// formatting context).
    #[must_use]
    pub const fn is_inline_level(&self) -> bool {
        matches!(
            self,
            Display::Inline
                | Display::InlineBlock
                | Display::InlineFlex
                | Display::InlineGrid
                | Display::InlineTable
        )
    }

    /// True for the non-replaced inline box itself (`display: inline`), the
    /// only inline-level value whose contents flow through the parent's
    /// inline formatting context rather than forming an opaque box.
    #[must_use]
    pub const fn is_inline_flow(&self) -> bool {
        matches!(self, Display::Inline)
    }

    /// [§ 9.2.4](https://www.w3.org/TR/css-display-3/#atomic-inline)
    ///
    /// True for atomic inline-level boxes.
    #[must_use]
    pub const fn is_atomic_inline(&self) -> bool {
        matches!(
            self,
            Display::InlineBlock | Display::InlineFlex | Display::InlineGrid | Display::InlineTable
        )
    }

    /// True for flex containers (either outer display).
    #[must_use]
    pub const fn is_flex_container(&self) -> bool {
        matches!(self, Display::Flex | Display::InlineFlex)
    }

    /// True for table wrapper boxes (either outer display).
    #[must_use]
    pub const fn is_table_container(&self) -> bool {
        matches!(self, Display::Table | Display::InlineTable)
    }

    /// True for the internal table display types.
    #[must_use]
    pub const fn is_table_internal(&self) -> bool {
        matches!(
            self,
            Display::TableRow
                | Display::TableRowGroup
                | Display::TableHeaderGroup
                | Display::TableFooterGroup
                | Display::TableCell
        )
    }

    /// True for row groups (`<tbody>`/`<thead>`/`<tfoot>` display types).
    #[must_use]
    pub const fn is_row_group(&self) -> bool {
        matches!(
            self,
            Display::TableRowGroup | Display::TableHeaderGroup | Display::TableFooterGroup
        )
    }

    /// [§ 2.7 Automatic blockification](https://www.w3.org/TR/css-display-3/#blockify)
    ///
    /// "Some layout effects require blockification ... If a layout-internal
    /// box is blockified, its inner display type converts to flow so that
    /// it becomes a block container."
    ///
    /// Used when an element becomes a flex item or is floated/absolutely
    /// positioned.
    #[must_use]
    pub const fn blockify(&self) -> Display {
        match self {
            Display::Inline | Display::InlineBlock | Display::FlowRoot => Display::Block,
            Display::InlineFlex => Display::Flex,
            Display::InlineGrid => Display::Grid,
            Display::InlineTable => Display::Table,
            other => *other,
        }
    }
}
