//! Shared test fixture: a tiny synthetic TrueType face.
//!
//! Five glyphs (`.notdef`, H, e, l, o), 1000 units/em, 600-unit advances,
//! a format-12 cmap, and empty outlines — enough for `ttf-parser` to
//! parse and for the subsetter to chew on, without shipping a binary
//! fixture.

/// Big-endian helpers.
fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn push_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn head_table() -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0001_0000); // version
    push_u32(&mut t, 0x0001_0000); // fontRevision
    push_u32(&mut t, 0); // checkSumAdjustment
    push_u32(&mut t, 0x5F0F_3CF5); // magicNumber
    push_u16(&mut t, 0b11); // flags
    push_u16(&mut t, 1000); // unitsPerEm
    t.extend_from_slice(&[0; 8]); // created
    t.extend_from_slice(&[0; 8]); // modified
    push_i16(&mut t, 0); // xMin
    push_i16(&mut t, -200); // yMin
    push_i16(&mut t, 800); // xMax
    push_i16(&mut t, 800); // yMax
    push_u16(&mut t, 0); // macStyle
    push_u16(&mut t, 8); // lowestRecPPEM
    push_i16(&mut t, 2); // fontDirectionHint
    push_i16(&mut t, 1); // indexToLocFormat (long)
    push_i16(&mut t, 0); // glyphDataFormat
    t
}

fn hhea_table(num_glyphs: u16) -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0001_0000); // version
    push_i16(&mut t, 800); // ascender
    push_i16(&mut t, -200); // descender
    push_i16(&mut t, 0); // lineGap
    push_u16(&mut t, 600); // advanceWidthMax
    push_i16(&mut t, 0); // minLeftSideBearing
    push_i16(&mut t, 0); // minRightSideBearing
    push_i16(&mut t, 600); // xMaxExtent
    push_i16(&mut t, 1); // caretSlopeRise
    push_i16(&mut t, 0); // caretSlopeRun
    push_i16(&mut t, 0); // caretOffset
    for _ in 0..4 {
        push_i16(&mut t, 0); // reserved
    }
    push_i16(&mut t, 0); // metricDataFormat
    push_u16(&mut t, num_glyphs); // numberOfHMetrics
    t
}

fn maxp_table(num_glyphs: u16) -> Vec<u8> {
    let mut t = Vec::new();
    push_u32(&mut t, 0x0001_0000); // version 1.0
    push_u16(&mut t, num_glyphs);
    for _ in 0..13 {
        push_u16(&mut t, 0);
    }
    t
}

fn hmtx_table(num_glyphs: u16) -> Vec<u8> {
    let mut t = Vec::new();
    for _ in 0..num_glyphs {
        push_u16(&mut t, 600); // advance
        push_i16(&mut t, 50); // left side bearing
    }
    t
}

fn loca_table(num_glyphs: u16) -> Vec<u8> {
    // All glyphs empty: every offset is zero.
    let mut t = Vec::new();
    for _ in 0..=num_glyphs {
        push_u32(&mut t, 0);
    }
    t
}

fn cmap_table(mappings: &[(u32, u16)]) -> Vec<u8> {
    let mut t = Vec::new();
    push_u16(&mut t, 0); // version
    push_u16(&mut t, 1); // numTables
    push_u16(&mut t, 3); // platform: Windows
    push_u16(&mut t, 10); // encoding: Unicode full
    push_u32(&mut t, 12); // subtable offset

    // Format 12 (segmented coverage), one group per mapping.
    let length = 16 + mappings.len() as u32 * 12;
    push_u16(&mut t, 12); // format
    push_u16(&mut t, 0); // reserved
    push_u32(&mut t, length);
    push_u32(&mut t, 0); // language
    push_u32(&mut t, mappings.len() as u32);
    for (code_point, gid) in mappings {
        push_u32(&mut t, *code_point);
        push_u32(&mut t, *code_point);
        push_u32(&mut t, u32::from(*gid));
    }
    t
}

fn table_checksum(data: &[u8]) -> u32 {
    let mut sum: u32 = 0;
    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        sum = sum.wrapping_add(u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    let rest = chunks.remainder();
    if !rest.is_empty() {
        let mut tail = [0u8; 4];
        tail[..rest.len()].copy_from_slice(rest);
        sum = sum.wrapping_add(u32::from_be_bytes(tail));
    }
    sum
}

/// Assemble the fixture font. Glyph ids: H=1, e=2, l=3, o=4.
#[must_use]
pub fn sample_font() -> Vec<u8> {
    let num_glyphs = 5;
    let tables: Vec<([u8; 4], Vec<u8>)> = {
        let mut t = vec![
            (*b"cmap", cmap_table(&[(0x48, 1), (0x65, 2), (0x6C, 3), (0x6F, 4)])),
            (*b"glyf", vec![0, 0, 0, 0]),
            (*b"head", head_table()),
            (*b"hhea", hhea_table(num_glyphs)),
            (*b"hmtx", hmtx_table(num_glyphs)),
            (*b"loca", loca_table(num_glyphs)),
            (*b"maxp", maxp_table(num_glyphs)),
        ];
        t.sort_by_key(|(tag, _)| *tag);
        t
    };

    let num_tables = tables.len() as u16;
    let mut entry_selector: u16 = 0;
    while (2u32 << entry_selector) <= u32::from(num_tables) {
        entry_selector += 1;
    }
    let search_range = (1u16 << entry_selector) * 16;

    let mut out = Vec::new();
    push_u32(&mut out, 0x0001_0000);
    push_u16(&mut out, num_tables);
    push_u16(&mut out, search_range);
    push_u16(&mut out, entry_selector);
    push_u16(&mut out, num_tables * 16 - search_range);

    let mut offset = 12 + tables.len() * 16;
    for (tag, data) in &tables {
        out.extend_from_slice(tag);
        push_u32(&mut out, table_checksum(data));
        push_u32(&mut out, offset as u32);
        push_u32(&mut out, data.len() as u32);
        offset += data.len().div_ceil(4) * 4;
    }
    for (_, data) in &tables {
        out.extend_from_slice(data);
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }
    out
}
