//! Inline layout: tokenization, line breaking, alignment, run placement.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."
//!
//! The flow is: fragments (collected by the strategy layer) are tokenized
//! into words, spaces, newlines, and atomic boxes; the line breaker packs
//! items into lines honoring float bands; alignment shifts each committed
//! line; placement writes [`InlineRun`]s into the owning boxes and
//! propagates bounding boxes to non-text inline ancestors.

use std::collections::HashMap;

use vellum_common::warn_once;
use vellum_style::{AutoPolicy, ComputedStyle, FontVariant, OverflowWrap, TextAlign};

use crate::box_model::Rect;
use crate::float::FloatContext;
use crate::metrics::{FontMetrics, resolve_ascent};
use crate::tree::{BoxId, BoxTree, InlineRun};

/// A collected inline participant, ready for tokenization.
///
/// [§ 9.2.1.1 Anonymous inline boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-inline)
#[derive(Debug, Clone)]
pub enum InlineFragment {
    /// A run of text belonging to an inline box.
    Text {
        /// The box that owns the text (its style drives measurement).
        owner: BoxId,
        /// Raw text content.
        text: String,
        /// A collapsed leading space survives at the fragment boundary.
        preserve_leading: bool,
        /// A collapsed trailing space survives at the fragment boundary.
        preserve_trailing: bool,
    },
    /// [§ 9.2.4 Atomic inline-level boxes](https://www.w3.org/TR/css-display-3/#atomic-inline)
    ///
    /// "An inline-level box that is not an inline box ... participates in
    /// its inline formatting context as a single opaque box."
    ///
    /// Pre-measured by the strategy layer; width/height are margin-box
    /// dimensions.
    Atomic {
        /// The atomic box.
        owner: BoxId,
        /// Margin-box width.
        width: f32,
        /// Margin-box height.
        height: f32,
    },
}

/// An item produced from fragments by tokenization.
#[derive(Debug, Clone)]
pub enum LayoutItem {
    /// An unbreakable word with a measured advance.
    Word {
        /// Owning box.
        owner: BoxId,
        /// Word text (post text-transform).
        text: String,
        /// Measured advance width.
        width: f32,
    },
    /// One or more space characters.
    Space {
        /// Owning box.
        owner: BoxId,
        /// Number of space characters (1 when collapsed).
        count: usize,
        /// The literal spaces carried into the run text.
        text: String,
        /// Measured advance width including word-spacing.
        width: f32,
    },
    /// A forced line break (preserved newline).
    Newline,
    /// An atomic inline box (margin-box metrics).
    Box {
        /// The atomic box.
        owner: BoxId,
        /// Margin-box width.
        width: f32,
        /// Margin-box height.
        height: f32,
    },
}

/// Result of laying out an inline formatting context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InlineLayoutResult {
    /// The Y below the last line (equals the start Y when nothing was
    /// placed).
    pub new_cursor_y: f32,
    /// Number of committed lines.
    pub line_count: usize,
    /// Widest committed line (content width, including indent).
    pub max_line_width: f32,
}

/// [§ 4 White space processing](https://www.w3.org/TR/css-text-3/#white-space-rules)
///
/// Tokenize collected fragments into layout items, applying
/// `text-transform` and the owner's white-space mode, and measuring each
/// segment with the font metrics provider.
#[must_use]
pub fn tokenize(
    tree: &BoxTree,
    fragments: &[InlineFragment],
    metrics: &dyn FontMetrics,
) -> Vec<LayoutItem> {
    let mut items = Vec::new();

    for fragment in fragments {
        match fragment {
            InlineFragment::Atomic {
                owner,
                width,
                height,
            } => {
                items.push(LayoutItem::Box {
                    owner: *owner,
                    width: *width,
                    height: *height,
                });
            }
            InlineFragment::Text {
                owner,
                text,
                preserve_leading,
                preserve_trailing,
            } => {
                let style = tree.style(*owner);
                let mut transformed = style.text_transform.apply(text);
                if style.font_variant == FontVariant::SmallCaps {
                    // Approximated by uppercasing; true small-cap glyph
                    // selection needs OpenType features.
                    transformed = transformed.to_uppercase();
                }
                tokenize_text(
                    *owner,
                    &transformed,
                    style,
                    *preserve_leading,
                    *preserve_trailing,
                    metrics,
                    &mut items,
                );
            }
        }
    }

    items
}

/// Tokenize one text fragment under its white-space mode.
fn tokenize_text(
    owner: BoxId,
    text: &str,
    style: &ComputedStyle,
    preserve_leading: bool,
    preserve_trailing: bool,
    metrics: &dyn FontMetrics,
    items: &mut Vec<LayoutItem>,
) {
    let mode = style.white_space;

    if mode.preserves_newlines() {
        // [§ 16.6](https://www.w3.org/TR/CSS2/text.html#white-space-prop)
        //
        // pre / pre-wrap / pre-line: newlines force breaks. pre and
        // pre-wrap additionally preserve internal space runs.
        for (i, segment) in text.split('\n').enumerate() {
            if i > 0 {
                items.push(LayoutItem::Newline);
            }
            if mode.collapses_spaces() {
                // pre-line collapses spaces within each line.
                tokenize_collapsed(owner, segment, style, false, false, metrics, items);
            } else {
                tokenize_preserved(owner, segment, style, metrics, items);
            }
        }
    } else {
        // normal / nowrap: newlines are just whitespace.
        tokenize_collapsed(
            owner,
            text,
            style,
            preserve_leading,
            preserve_trailing,
            metrics,
            items,
        );
    }
}

/// Space advance for one collapsed space, including word-spacing.
fn space_advance(style: &ComputedStyle, metrics: &dyn FontMetrics) -> f32 {
    metrics.text_width(" ", style) + style.word_spacing
}

/// Collapsing tokenizer: runs of whitespace become single space items.
fn tokenize_collapsed(
    owner: BoxId,
    text: &str,
    style: &ComputedStyle,
    preserve_leading: bool,
    preserve_trailing: bool,
    metrics: &dyn FontMetrics,
    items: &mut Vec<LayoutItem>,
) {
    let space_w = space_advance(style, metrics);
    let push_space = |items: &mut Vec<LayoutItem>| {
        items.push(LayoutItem::Space {
            owner,
            count: 1,
            text: " ".to_string(),
            width: space_w,
        });
    };

    let mut words = text.split_whitespace().peekable();
    if words.peek().is_none() {
        // Whitespace-only fragment: survives as a single space when either
        // boundary preserves it.
        if (preserve_leading || preserve_trailing) && !text.is_empty() {
            push_space(items);
        }
        return;
    }

    if preserve_leading && text.starts_with(char::is_whitespace) {
        push_space(items);
    }
    let mut first = true;
    for word in words {
        if !first {
            push_space(items);
        }
        first = false;
        items.push(LayoutItem::Word {
            owner,
            text: word.to_string(),
            width: metrics.text_width(word, style),
        });
    }
    if preserve_trailing && text.ends_with(char::is_whitespace) {
        push_space(items);
    }
}

/// Preserving tokenizer (pre / pre-wrap): space runs keep their count.
fn tokenize_preserved(
    owner: BoxId,
    text: &str,
    style: &ComputedStyle,
    metrics: &dyn FontMetrics,
    items: &mut Vec<LayoutItem>,
) {
    let space_w = space_advance(style, metrics);
    let mut chars = text.chars().peekable();
    let mut buffer = String::new();

    let flush_word =
        |buffer: &mut String, items: &mut Vec<LayoutItem>| {
            if !buffer.is_empty() {
                items.push(LayoutItem::Word {
                    owner,
                    text: buffer.clone(),
                    width: metrics.text_width(buffer, style),
                });
                buffer.clear();
            }
        };

    while let Some(&ch) = chars.peek() {
        if ch == ' ' || ch == '\t' {
            flush_word(&mut buffer, items);
            let mut count = 0_usize;
            while let Some(&c) = chars.peek() {
                if c == ' ' || c == '\t' {
                    // Tabs count as a single space; tab stops are not
                    // supported.
                    count += 1;
                    let _ = chars.next();
                } else {
                    break;
                }
            }
            items.push(LayoutItem::Space {
                owner,
                count,
                text: " ".repeat(count),
                width: count as f32 * space_w,
            });
        } else {
            buffer.push(ch);
            let _ = chars.next();
        }
    }
    flush_word(&mut buffer, items);
}

// ── Line breaking ────────────────────────────────────────────────────

/// An item placed on a line, with its offset from the band content start.
#[derive(Debug, Clone)]
struct PlacedItem {
    item: LayoutItem,
    offset: f32,
}

/// A committed line.
#[derive(Debug, Clone)]
struct Line {
    top: f32,
    height: f32,
    /// Band start offset from the content edge (indent already folded in).
    band_start: f32,
    /// Width available to this line (band width minus indent).
    target_width: f32,
    /// Content width (post-justification).
    width: f32,
    /// Horizontal shift applied by text-align.
    shift: f32,
    parts: Vec<PlacedItem>,
    is_last: bool,
}

/// Working state for the line breaker.
struct LineBreaker<'a> {
    tree: &'a BoxTree,
    floats: &'a FloatContext,
    content_width: f32,
    base_line_height: f32,
    text_align: TextAlign,
    indent: f32,
    lines: Vec<Line>,
    line_top: f32,
    line_height: f32,
    cursor: f32,
    parts: Vec<PlacedItem>,
    band_start: f32,
    band_width: f32,
}

impl<'a> LineBreaker<'a> {
    /// Recompute the available band for the current line, skipping floats
    /// when the band has collapsed to nothing.
    ///
    /// [§ 9.5](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// "The current and subsequent line boxes created next to the float
    /// are shortened as necessary."
    fn refresh_band(&mut self) {
        loop {
            let band = self.floats.inline_offsets(
                self.line_top,
                self.line_top + self.line_height,
                self.content_width,
            );
            if band.width() > 0.0 {
                self.band_start = band.start;
                self.band_width = band.width();
                break;
            }
            match self
                .floats
                .next_unblocked_y(self.line_top, self.line_top + self.line_height)
            {
                Some(y) => self.line_top = y,
                None => {
                    // Nothing to skip past: allow overflow on this line.
                    self.band_start = 0.0;
                    self.band_width = self.content_width;
                    break;
                }
            }
        }
        // [§ 9.1 'text-indent'](https://www.w3.org/TR/css-text-3/#text-indent-property)
        //
        // "Gives the amount of the indent as an absolute length" applied
        // to the first formatted line only.
        if self.lines.is_empty() {
            let indent = self.indent.min(self.band_width);
            self.band_start += indent;
            self.band_width -= indent;
        }
    }

    fn item_line_height(&self, item: &LayoutItem) -> f32 {
        match item {
            LayoutItem::Word { owner, .. } | LayoutItem::Space { owner, .. } => {
                self.tree.style(*owner).resolved_line_height()
            }
            LayoutItem::Box { height, .. } => *height,
            LayoutItem::Newline => 0.0,
        }
    }

    fn push(&mut self, item: LayoutItem) {
        let advance = match &item {
            LayoutItem::Word { width, .. }
            | LayoutItem::Space { width, .. }
            | LayoutItem::Box { width, .. } => *width,
            LayoutItem::Newline => 0.0,
        };
        let lh = self.item_line_height(&item);
        if lh > self.line_height {
            self.line_height = lh;
        }
        self.parts.push(PlacedItem {
            item,
            offset: self.cursor,
        });
        self.cursor += advance;
    }

    /// [§ 4.1.3](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
    ///
    /// "A sequence of collapsible spaces at the end of a line is removed."
    fn drop_trailing_spaces(&mut self) {
        while let Some(last) = self.parts.last() {
            let collapsible = match &last.item {
                LayoutItem::Space { owner, .. } => {
                    self.tree.style(*owner).white_space.collapses_spaces()
                }
                _ => false,
            };
            if !collapsible {
                break;
            }
            if let Some(part) = self.parts.pop()
                && let LayoutItem::Space { width, .. } = part.item
            {
                self.cursor -= width;
            }
        }
    }

    /// Commit the current line and open a fresh one below it.
    fn commit(&mut self, is_last: bool) {
        self.drop_trailing_spaces();

        let mut width = self.cursor;
        let target_width = self.band_width;
        let mut parts = std::mem::take(&mut self.parts);

        // [§ 16.2](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
        //
        // "When the total width of the inline-level boxes on a line is
        // less than the width of the line box containing them, their
        // horizontal distribution within the line box is determined by
        // the 'text-align' property."
        let slack = (target_width - width).max(0.0);
        let mut shift = 0.0;
        match self.text_align {
            TextAlign::Left | TextAlign::Start => {}
            TextAlign::Center => shift = slack / 2.0,
            TextAlign::Right | TextAlign::End => shift = slack,
            TextAlign::Justify => {
                // "Text is justified ... except for the last line", which
                // falls back to start alignment.
                if !is_last && slack > 0.0 {
                    let total_spaces: usize = parts
                        .iter()
                        .map(|p| match &p.item {
                            LayoutItem::Space { count, .. } => *count,
                            _ => 0,
                        })
                        .sum();
                    if total_spaces > 0 {
                        let extra = slack / total_spaces as f32;
                        let mut added = 0.0;
                        for part in &mut parts {
                            part.offset += added;
                            if let LayoutItem::Space { count, width, .. } = &mut part.item {
                                let grow = extra * *count as f32;
                                *width += grow;
                                added += grow;
                            }
                        }
                        width += added;
                    }
                }
            }
        }

        self.lines.push(Line {
            top: self.line_top,
            height: self.line_height,
            band_start: self.band_start,
            target_width,
            width,
            shift,
            parts,
            is_last,
        });

        self.line_top += self.line_height;
        self.line_height = self.base_line_height;
        self.cursor = 0.0;
        self.refresh_band();
    }
}

/// Lay out tokenized items into lines and write the resulting runs and
/// geometry into the tree.
///
/// [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// `content_x`/`content_width` describe the container's content box;
/// `start_y` is the Y at which the first line top sits. The float context
/// is queried (never mutated): floats placed later must not affect these
/// lines.
pub fn layout_items(
    tree: &mut BoxTree,
    container: BoxId,
    items: Vec<LayoutItem>,
    floats: &FloatContext,
    content_x: f32,
    content_width: f32,
    start_y: f32,
    metrics: &dyn FontMetrics,
) -> InlineLayoutResult {
    if items.is_empty() {
        return InlineLayoutResult {
            new_cursor_y: start_y,
            line_count: 0,
            max_line_width: 0.0,
        };
    }

    let container_style = tree.style(container).clone();
    let indent = if container_style.display.is_inline_flow() {
        0.0
    } else {
        container_style
            .text_indent
            .resolve(content_width, AutoPolicy::Zero)
    };

    let lines = break_lines(
        tree,
        items,
        floats,
        content_width,
        start_y,
        &container_style,
        indent,
        metrics,
    );
    if lines.is_empty() {
        // Every item was dropped (e.g. collapsible whitespace only).
        return InlineLayoutResult {
            new_cursor_y: start_y,
            line_count: 0,
            max_line_width: 0.0,
        };
    }

    place_lines(tree, container, &lines, content_x, metrics)
}

/// The line-breaking loop.
fn break_lines(
    tree: &BoxTree,
    mut items: Vec<LayoutItem>,
    floats: &FloatContext,
    content_width: f32,
    start_y: f32,
    container_style: &ComputedStyle,
    indent: f32,
    metrics: &dyn FontMetrics,
) -> Vec<Line> {
    let mut breaker = LineBreaker {
        tree,
        floats,
        content_width,
        base_line_height: container_style.resolved_line_height(),
        text_align: container_style.text_align,
        indent,
        lines: Vec::new(),
        line_top: start_y,
        line_height: container_style.resolved_line_height(),
        cursor: 0.0,
        parts: Vec::new(),
        band_start: 0.0,
        band_width: content_width,
    };
    breaker.refresh_band();

    let mut i = 0;
    while i < items.len() {
        match items[i].clone() {
            LayoutItem::Newline => {
                breaker.commit(false);
                i += 1;
            }
            item @ LayoutItem::Space { .. } => {
                let LayoutItem::Space { owner, width, .. } = &item else {
                    unreachable!()
                };
                let collapsible = tree.style(*owner).white_space.collapses_spaces();
                // "A sequence of collapsible spaces at the beginning of a
                // line is removed."
                if breaker.parts.is_empty() && collapsible {
                    i += 1;
                    continue;
                }
                if breaker.cursor + width > breaker.band_width && collapsible {
                    // The space itself triggers the wrap and is dropped.
                    breaker.commit(false);
                    i += 1;
                    continue;
                }
                breaker.push(item);
                i += 1;
            }
            item @ LayoutItem::Word { .. } => {
                let LayoutItem::Word { owner, width, text } = &item else {
                    unreachable!()
                };
                let owner_style = tree.style(*owner);
                let no_wrap = owner_style.white_space.suppresses_wrapping();

                if no_wrap || breaker.cursor + width <= breaker.band_width {
                    breaker.push(item);
                    i += 1;
                } else if breaker.cursor > 0.0 {
                    // Wrap and retry the word on the fresh line.
                    breaker.commit(false);
                } else if owner_style.overflow_wrap != OverflowWrap::Normal {
                    // [§ 5.5 'overflow-wrap'](https://www.w3.org/TR/css-text-3/#overflow-wrap-property)
                    //
                    // "An otherwise unbreakable sequence of characters may
                    // be broken at an arbitrary point."
                    //
                    // Break at the largest character boundary that fits.
                    // This is a char-level split, not grapheme clusters: a
                    // combining mark can in principle be separated from
                    // its base at extreme widths.
                    let (head, tail) =
                        split_word_to_fit(text, breaker.band_width, owner_style, metrics);
                    match tail {
                        Some(rest) => {
                            let head_width = metrics.text_width(&head, owner_style);
                            breaker.push(LayoutItem::Word {
                                owner: *owner,
                                text: head,
                                width: head_width,
                            });
                            breaker.commit(false);
                            let rest_width = metrics.text_width(&rest, owner_style);
                            items[i] = LayoutItem::Word {
                                owner: *owner,
                                text: rest,
                                width: rest_width,
                            };
                        }
                        None => {
                            // Not even one char fits; place overflowing.
                            breaker.push(item);
                            i += 1;
                        }
                    }
                } else if breaker.band_width < content_width
                    && breaker
                        .floats
                        .next_unblocked_y(
                            breaker.line_top,
                            breaker.line_top + breaker.line_height,
                        )
                        .is_some()
                {
                    // Narrowed by a float: move the whole line below it.
                    let next = breaker
                        .floats
                        .next_unblocked_y(breaker.line_top, breaker.line_top + breaker.line_height)
                        .unwrap_or(breaker.line_top);
                    breaker.line_top = next;
                    breaker.refresh_band();
                } else {
                    // Wider than the full container: place overflowing.
                    warn_once("Layout", "word wider than its container placed with overflow");
                    breaker.push(item);
                    i += 1;
                }
            }
            item @ LayoutItem::Box { .. } => {
                let LayoutItem::Box { width, .. } = &item else {
                    unreachable!()
                };
                if breaker.cursor + width <= breaker.band_width {
                    breaker.push(item);
                    i += 1;
                } else if breaker.cursor > 0.0 {
                    // Commit the current line and retry the box.
                    breaker.commit(false);
                } else if breaker.band_width < content_width
                    && breaker
                        .floats
                        .next_unblocked_y(
                            breaker.line_top,
                            breaker.line_top + breaker.line_height,
                        )
                        .is_some()
                {
                    let next = breaker
                        .floats
                        .next_unblocked_y(breaker.line_top, breaker.line_top + breaker.line_height)
                        .unwrap_or(breaker.line_top);
                    breaker.line_top = next;
                    breaker.refresh_band();
                } else {
                    // Over-wide atomic inline with no float to skip:
                    // place overflowing.
                    warn_once(
                        "Layout",
                        "atomic inline wider than its container placed with overflow",
                    );
                    breaker.push(item);
                    i += 1;
                }
            }
        }
    }

    if !breaker.parts.is_empty() {
        breaker.commit(true);
    } else if let Some(last) = breaker.lines.last_mut() {
        last.is_last = true;
    }

    breaker.lines
}

/// Find the largest char boundary of `word` whose prefix fits `max_width`.
///
/// Returns `(head, Some(tail))` on a split, or `(word, None)` when not
/// even the first character fits.
fn split_word_to_fit(
    word: &str,
    max_width: f32,
    style: &ComputedStyle,
    metrics: &dyn FontMetrics,
) -> (String, Option<String>) {
    let mut best: Option<usize> = None;
    for (idx, _) in word.char_indices().skip(1) {
        if metrics.text_width(&word[..idx], style) <= max_width {
            best = Some(idx);
        } else {
            break;
        }
    }
    match best {
        Some(idx) if idx < word.len() => {
            (word[..idx].to_string(), Some(word[idx..].to_string()))
        }
        _ => (word.to_string(), None),
    }
}

/// Accumulated per-owner placement state.
#[derive(Default)]
struct OwnerAccumulator {
    runs: Vec<InlineRun>,
    min_x: f32,
    min_top: f32,
    started: bool,
}

/// Write runs and geometry into the tree from committed lines.
fn place_lines(
    tree: &mut BoxTree,
    container: BoxId,
    lines: &[Line],
    content_x: f32,
    metrics: &dyn FontMetrics,
) -> InlineLayoutResult {
    let mut owners: HashMap<BoxId, OwnerAccumulator> = HashMap::new();
    let mut owner_order: Vec<BoxId> = Vec::new();
    let mut max_line_width: f32 = 0.0;
    let mut container_baseline: Option<f32> = None;

    for line in lines {
        max_line_width = max_line_width.max(line.band_start + line.width);
        let origin = content_x + line.band_start + line.shift;

        // Group consecutive word/space parts by owner into runs.
        let mut idx = 0;
        while idx < line.parts.len() {
            match &line.parts[idx].item {
                LayoutItem::Box { owner, height, .. } => {
                    // Atomic inline: bottom-align the margin box to the
                    // line box bottom and move the laid-out subtree there.
                    let target_x = origin + line.parts[idx].offset;
                    let target_y = line.top + line.height - height;
                    let current = tree.node(*owner).geometry.margin_box();
                    tree.offset_subtree(*owner, target_x - current.x, target_y - current.y);
                    idx += 1;
                }
                LayoutItem::Newline => {
                    idx += 1;
                }
                LayoutItem::Word { owner, .. } | LayoutItem::Space { owner, .. } => {
                    let run_owner = *owner;
                    let start_offset = line.parts[idx].offset;
                    let mut text = String::new();
                    let mut width = 0.0;
                    let mut space_count = 0;
                    while idx < line.parts.len() {
                        match &line.parts[idx].item {
                            LayoutItem::Word {
                                owner,
                                text: t,
                                width: w,
                            } if *owner == run_owner => {
                                text.push_str(t);
                                width += w;
                                idx += 1;
                            }
                            LayoutItem::Space {
                                owner,
                                text: t,
                                width: w,
                                count,
                            } if *owner == run_owner => {
                                text.push_str(t);
                                width += w;
                                space_count += count;
                                idx += 1;
                            }
                            _ => break,
                        }
                    }

                    let style = tree.style(run_owner).clone();
                    let ascent = resolve_ascent(metrics, &style);
                    let half_leading = (line.height - style.font_size) / 2.0;
                    let baseline = line.top + half_leading + ascent;
                    if container_baseline.is_none() {
                        container_baseline = Some(baseline);
                    }

                    let acc = owners.entry(run_owner).or_default();
                    if !acc.started {
                        owner_order.push(run_owner);
                        acc.started = true;
                        acc.min_x = f32::MAX;
                        acc.min_top = f32::MAX;
                    }
                    let start_x = origin + start_offset;
                    acc.min_x = acc.min_x.min(start_x);
                    acc.min_top = acc.min_top.min(line.top);
                    let line_index = acc.runs.len();
                    acc.runs.push(InlineRun {
                        line_index,
                        start_x,
                        baseline,
                        text,
                        width,
                        line_width: line.width,
                        target_width: line.target_width,
                        space_count,
                        is_last_line: line.is_last,
                    });
                }
            }
        }
    }

    // Write owner geometry and runs.
    //
    // Per box: content height = line count × resolved line-height; content
    // width = max over runs of max(line width, run width); origin = the
    // minimum over all runs.
    for owner in &owner_order {
        let acc = owners.remove(owner).unwrap_or_default();
        if acc.runs.is_empty() {
            continue;
        }
        let style_line_height = tree.style(*owner).resolved_line_height();
        let line_count = acc.runs.iter().map(|r| r.line_index).max().unwrap_or(0) + 1;
        let content_height = line_count as f32 * style_line_height;
        let content_width = acc
            .runs
            .iter()
            .map(|r| r.line_width.max(r.width))
            .fold(0.0_f32, f32::max);
        let first_baseline = acc.runs[0].baseline;

        let node = tree.node_mut(*owner);
        node.geometry.x = acc.min_x;
        node.geometry.y = acc.min_top;
        node.geometry.set_content_size(content_width, content_height);
        node.geometry.baseline = first_baseline;
        node.runs = acc.runs;
    }

    // Bounding-box propagation: non-text inline ancestors enclose their
    // descendants' runs even though they emit no runs of their own.
    propagate_bounds(tree, container, &owner_order);

    let new_cursor_y = lines
        .last()
        .map_or_else(|| 0.0, |line| line.top + line.height);
    let line_count = lines.len();
    if let Some(baseline) = container_baseline {
        let node = tree.node_mut(container);
        if node.geometry.baseline == 0.0 {
            node.geometry.baseline = baseline;
        }
    }

    InlineLayoutResult {
        new_cursor_y,
        line_count,
        max_line_width,
    }
}

/// [§ 10.6.1 Inline, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-non-replaced)
///
/// Union each text owner's content box into every non-text `display:inline`
/// ancestor between the owner and the IFC container (exclusive).
fn propagate_bounds(tree: &mut BoxTree, container: BoxId, owners: &[BoxId]) {
    let mut unions: HashMap<BoxId, Rect> = HashMap::new();

    for owner in owners {
        let owner_box = tree.node(*owner).geometry.content_box();
        for ancestor in tree.ancestors(*owner) {
            if ancestor == container {
                break;
            }
            let node = tree.node(ancestor);
            if !node.style.display.is_inline_flow() || node.has_text() {
                continue;
            }
            let entry = unions.entry(ancestor).or_insert(owner_box);
            *entry = entry.union(&owner_box);
        }
    }

    for (ancestor, rect) in unions {
        let node = tree.node_mut(ancestor);
        node.geometry.x = rect.x;
        node.geometry.y = rect.y;
        node.geometry.set_content_size(rect.width, rect.height);
    }
}
