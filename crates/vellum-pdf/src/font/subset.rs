//! TrueType subsetting with glyph lifetime tracking.
//!
//! The registry accumulates every glyph id a face shows on any page and
//! assigns subset CIDs in first-use order (CID 0 stays `.notdef`), so a
//! grown subset never renumbers CIDs already encoded into earlier pages.
//!
//! The subset *writer* is hand-rolled: composite glyphs are closed over
//! (a used glyph keeps its components alive), `glyf` entries are copied
//! with component ids remapped, `loca`/`hmtx`/`maxp`/`head`/`hhea` are
//! rebuilt, hinting tables (`cvt `, `fpgm`, `prep`) are carried when
//! present, and the sfnt is reassembled with correct table checksums.
//! `ttf-parser` is used strictly as the table reader.

use std::collections::BTreeMap;

use crate::error::FontError;
use crate::font::cmap::build_to_unicode;
use crate::font::face::FontFace;

/// Per-face glyph usage: a monotonically growing set with stable CIDs.
#[derive(Debug, Clone, Default)]
pub struct GlyphUsage {
    /// Used gids (excluding 0) in first-use order; index + 1 is the CID.
    order: Vec<u16>,
    map: BTreeMap<u16, u16>,
    /// CID → source text for the ToUnicode CMap.
    unicode: BTreeMap<u16, String>,
}

impl GlyphUsage {
    /// Empty usage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing but `.notdef` would be in the subset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Record one glyph (and the character it renders, when known).
    pub fn register(&mut self, gid: u16, ch: Option<char>) {
        if gid == 0 {
            return;
        }
        let cid = match self.map.get(&gid) {
            Some(cid) => *cid,
            None => {
                let cid = (self.order.len() + 1) as u16;
                self.order.push(gid);
                let _ = self.map.insert(gid, cid);
                cid
            }
        };
        if let Some(ch) = ch {
            let _ = self.unicode.entry(cid).or_insert_with(|| ch.to_string());
        }
    }

    /// The subset CID for a gid (0 when the gid was never registered —
    /// which renders `.notdef`, matching the recovery policy).
    #[must_use]
    pub fn cid(&self, gid: u16) -> u16 {
        if gid == 0 {
            return 0;
        }
        self.map.get(&gid).copied().unwrap_or(0)
    }

    /// The gid → cid map.
    #[must_use]
    pub fn gid_map(&self) -> &BTreeMap<u16, u16> {
        &self.map
    }

    /// Glyph ids in CID order, `.notdef` first.
    #[must_use]
    pub fn glyphs_in_cid_order(&self) -> Vec<u16> {
        let mut out = Vec::with_capacity(self.order.len() + 1);
        out.push(0);
        out.extend_from_slice(&self.order);
        out
    }

    /// A stable fingerprint of the used set (drives the subset tag and
    /// re-subsetting detection).
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        // FNV-1a over the gid sequence.
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for gid in &self.order {
            for byte in gid.to_be_bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
            }
        }
        hash
    }
}

/// A materialized subset.
#[derive(Debug, Clone)]
pub struct FontSubset {
    /// Six-uppercase-letter subset tag.
    pub tag: String,
    /// Original gid → subset cid (injective; cid 0 reserved).
    pub gid_map: BTreeMap<u16, u16>,
    /// The subset TrueType file.
    pub font_file: Vec<u8>,
    /// The ToUnicode CMap stream.
    pub to_unicode: Vec<u8>,
    /// Per-CID advance widths in 1000-unit glyph space, CID order.
    pub widths: Vec<f32>,
}

/// Compute the six-letter tag from the usage fingerprint: identical glyph
/// sets reuse the same tag.
#[must_use]
pub fn subset_tag(usage: &GlyphUsage) -> String {
    let mut value = usage.fingerprint();
    let mut tag = String::with_capacity(6);
    for _ in 0..6 {
        let letter = (value % 26) as u8;
        tag.push(char::from(b'A' + letter));
        value /= 26;
    }
    tag
}

/// Build the subset font file plus its maps for one face.
///
/// # Errors
///
/// [`FontError::MissingTable`] when a required TrueType table is absent;
/// [`FontError::GlyphOutOfRange`] / [`FontError::MalformedGlyph`] for
/// corrupt glyph records.
pub fn build_subset(face: &FontFace, usage: &GlyphUsage) -> Result<FontSubset, FontError> {
    let raw = ttf_parser::RawFace::parse(&face.data, 0)
        .map_err(|e| FontError::UnparsableFace(e.to_string()))?;
    let table = |tag: &[u8; 4]| raw.table(ttf_parser::Tag::from_bytes(tag));

    let head = table(b"head").ok_or(FontError::MissingTable("head"))?;
    let loca = table(b"loca").ok_or(FontError::MissingTable("loca"))?;
    let glyf = table(b"glyf").ok_or(FontError::MissingTable("glyf"))?;
    let hhea = table(b"hhea").ok_or(FontError::MissingTable("hhea"))?;
    let hmtx = table(b"hmtx").ok_or(FontError::MissingTable("hmtx"))?;
    let maxp = table(b"maxp").ok_or(FontError::MissingTable("maxp"))?;

    let long_loca = read_i16(head, 50).ok_or(FontError::MissingTable("head"))? == 1;
    let num_glyphs = read_u16(maxp, 4).ok_or(FontError::MissingTable("maxp"))?;
    let num_h_metrics = read_u16(hhea, 34).ok_or(FontError::MissingTable("hhea"))?;

    let glyph_range = |gid: u16| -> Result<(usize, usize), FontError> {
        if gid >= num_glyphs {
            return Err(FontError::GlyphOutOfRange {
                gid,
                count: num_glyphs,
            });
        }
        let (start, end) = if long_loca {
            let s = read_u32(loca, gid as usize * 4).ok_or(FontError::MalformedGlyph(gid))?;
            let e = read_u32(loca, gid as usize * 4 + 4).ok_or(FontError::MalformedGlyph(gid))?;
            (s as usize, e as usize)
        } else {
            let s = read_u16(loca, gid as usize * 2).ok_or(FontError::MalformedGlyph(gid))?;
            let e = read_u16(loca, gid as usize * 2 + 2).ok_or(FontError::MalformedGlyph(gid))?;
            (s as usize * 2, e as usize * 2)
        };
        if start > end || end > glyf.len() {
            return Err(FontError::MalformedGlyph(gid));
        }
        Ok((start, end))
    };

    // STEP 1: Close the used set over composite components (glyph
    // lifetime tracking): a kept composite keeps its components alive.
    let mut ordered = usage.glyphs_in_cid_order();
    let mut full_map: BTreeMap<u16, u16> = ordered
        .iter()
        .enumerate()
        .map(|(cid, gid)| (*gid, cid as u16))
        .collect();
    let mut cursor = 0;
    while cursor < ordered.len() {
        let gid = ordered[cursor];
        cursor += 1;
        let (start, end) = glyph_range(gid)?;
        for component in composite_components(&glyf[start..end], gid)? {
            if !full_map.contains_key(&component) {
                let cid = ordered.len() as u16;
                ordered.push(component);
                let _ = full_map.insert(component, cid);
            }
        }
    }

    // STEP 2: Rebuild glyf (remapping composite component ids) and a
    // long-format loca.
    let mut new_glyf: Vec<u8> = Vec::new();
    let mut new_loca: Vec<u8> = Vec::new();
    for &gid in &ordered {
        new_loca.extend_from_slice(&(new_glyf.len() as u32).to_be_bytes());
        let (start, end) = glyph_range(gid)?;
        let mut data = glyf[start..end].to_vec();
        remap_components(&mut data, gid, &full_map)?;
        new_glyf.extend_from_slice(&data);
        while new_glyf.len() % 4 != 0 {
            new_glyf.push(0);
        }
    }
    new_loca.extend_from_slice(&(new_glyf.len() as u32).to_be_bytes());
    if new_glyf.is_empty() {
        // All kept glyphs are empty; keep the table itself non-empty so
        // strict readers do not reject a zero-length record.
        new_glyf.extend_from_slice(&[0; 4]);
    }

    // STEP 3: Rebuild hmtx with one full metric per subset glyph.
    let mut new_hmtx: Vec<u8> = Vec::new();
    for &gid in &ordered {
        let advance = face.advance(gid);
        let lsb = left_side_bearing(hmtx, num_h_metrics, gid).unwrap_or(0);
        new_hmtx.extend_from_slice(&advance.to_be_bytes());
        new_hmtx.extend_from_slice(&lsb.to_be_bytes());
    }

    // STEP 4: Patch head (long loca, zeroed checksum adjustment), hhea
    // (metric count), and maxp (glyph count).
    let mut new_head = head.to_vec();
    write_u32(&mut new_head, 8, 0);
    write_i16(&mut new_head, 50, 1);
    let mut new_hhea = hhea.to_vec();
    write_u16(&mut new_hhea, 34, ordered.len() as u16);
    let mut new_maxp = maxp.to_vec();
    write_u16(&mut new_maxp, 4, ordered.len() as u16);

    // STEP 5: Assemble the sfnt. Hinting tables ride along when present.
    let mut tables: Vec<([u8; 4], Vec<u8>)> = vec![
        (*b"glyf", new_glyf),
        (*b"head", new_head),
        (*b"hhea", new_hhea),
        (*b"hmtx", new_hmtx),
        (*b"loca", new_loca),
        (*b"maxp", new_maxp),
    ];
    for tag in [b"cvt ", b"fpgm", b"prep"] {
        if let Some(data) = table(tag) {
            tables.push((*tag, data.to_vec()));
        }
    }
    tables.sort_by_key(|(tag, _)| *tag);
    let font_file = assemble_sfnt(tables);

    // ToUnicode covers every mapped cid.
    let mappings: Vec<(u16, String)> = usage
        .unicode
        .iter()
        .map(|(cid, text)| (*cid, text.clone()))
        .collect();

    let widths = ordered
        .iter()
        .map(|&gid| {
            let advance = face.advance(gid);
            if face.units_per_em == 0 {
                0.0
            } else {
                f32::from(advance) * 1000.0 / f32::from(face.units_per_em)
            }
        })
        .collect();

    Ok(FontSubset {
        tag: subset_tag(usage),
        gid_map: full_map.into_iter().filter(|(gid, _)| *gid != 0).collect(),
        font_file,
        to_unicode: build_to_unicode(&mappings),
        widths,
    })
}

/// Component gids referenced by a composite glyph (empty for simple and
/// empty glyphs).
fn composite_components(data: &[u8], gid: u16) -> Result<Vec<u16>, FontError> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let contours = read_i16(data, 0).ok_or(FontError::MalformedGlyph(gid))?;
    if contours >= 0 {
        return Ok(Vec::new());
    }

    let mut components = Vec::new();
    let mut offset = 10;
    loop {
        let flags = read_u16(data, offset).ok_or(FontError::MalformedGlyph(gid))?;
        let component = read_u16(data, offset + 2).ok_or(FontError::MalformedGlyph(gid))?;
        components.push(component);
        offset += 4;
        offset += component_argument_size(flags);
        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }
    Ok(components)
}

/// Rewrite the component gids of a composite glyph in place.
fn remap_components(
    data: &mut [u8],
    gid: u16,
    map: &BTreeMap<u16, u16>,
) -> Result<(), FontError> {
    if data.is_empty() {
        return Ok(());
    }
    let contours = read_i16(data, 0).ok_or(FontError::MalformedGlyph(gid))?;
    if contours >= 0 {
        return Ok(());
    }

    let mut offset = 10;
    loop {
        let flags = read_u16(data, offset).ok_or(FontError::MalformedGlyph(gid))?;
        let component = read_u16(data, offset + 2).ok_or(FontError::MalformedGlyph(gid))?;
        let new_gid = map
            .get(&component)
            .copied()
            .ok_or(FontError::MalformedGlyph(gid))?;
        write_u16(data, offset + 2, new_gid);
        offset += 4;
        offset += component_argument_size(flags);
        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }
    Ok(())
}

const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

/// Byte length of a composite component's arguments + transform.
fn component_argument_size(flags: u16) -> usize {
    let mut size = if flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
    if flags & WE_HAVE_A_SCALE != 0 {
        size += 2;
    } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
        size += 4;
    } else if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
        size += 8;
    }
    size
}

/// Left side bearing from the original hmtx.
fn left_side_bearing(hmtx: &[u8], num_h_metrics: u16, gid: u16) -> Option<i16> {
    if gid < num_h_metrics {
        read_i16(hmtx, gid as usize * 4 + 2)
    } else {
        let base = num_h_metrics as usize * 4;
        read_i16(hmtx, base + (gid - num_h_metrics) as usize * 2)
    }
}

/// Assemble table records + data into a checksummed sfnt.
fn assemble_sfnt(tables: Vec<([u8; 4], Vec<u8>)>) -> Vec<u8> {
    let num_tables = tables.len() as u16;
    let mut entry_selector: u16 = 0;
    while (2u32 << entry_selector) <= u32::from(num_tables) {
        entry_selector += 1;
    }
    let search_range: u16 = (1 << entry_selector) * 16;
    let range_shift = num_tables * 16 - search_range;

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(&0x0001_0000_u32.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());

    // Directory entries first (offsets computed up front), then data.
    let directory_len = 12 + tables.len() * 16;
    let mut offset = directory_len;
    let mut head_offset: Option<usize> = None;
    for (tag, data) in &tables {
        let checksum = table_checksum(data);
        out.extend_from_slice(tag);
        out.extend_from_slice(&checksum.to_be_bytes());
        out.extend_from_slice(&(offset as u32).to_be_bytes());
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        if tag == b"head" {
            head_offset = Some(offset);
        }
        offset += padded_len(data.len());
    }
    for (_, data) in &tables {
        out.extend_from_slice(data);
        while out.len() % 4 != 0 {
            out.push(0);
        }
    }

    // head.checkSumAdjustment = 0xB1B0AFBA − checksum(file).
    if let Some(head_at) = head_offset {
        let file_sum = table_checksum(&out);
        let adjustment = 0xB1B0_AFBA_u32.wrapping_sub(file_sum);
        write_u32(&mut out, head_at + 8, adjustment);
    }
    out
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(4) * 4
}

/// Big-endian u32 sum over the 4-padded table.
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

fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn read_i16(data: &[u8], offset: usize) -> Option<i16> {
    read_u16(data, offset).map(|v| v as i16)
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn write_u16(data: &mut [u8], offset: usize, value: u16) {
    if offset + 2 <= data.len() {
        data[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
    }
}

fn write_i16(data: &mut [u8], offset: usize, value: i16) {
    write_u16(data, offset, value as u16);
}

fn write_u32(data: &mut [u8], offset: usize, value: u32) {
    if offset + 4 <= data.len() {
        data[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cids_are_stable_across_growth() {
        let mut usage = GlyphUsage::new();
        usage.register(40, Some('H'));
        usage.register(70, Some('e'));
        assert_eq!(usage.cid(40), 1);
        assert_eq!(usage.cid(70), 2);
        // A later, smaller gid must not renumber existing cids.
        usage.register(10, Some('!'));
        assert_eq!(usage.cid(40), 1);
        assert_eq!(usage.cid(10), 3);
    }

    #[test]
    fn identical_sets_share_a_tag() {
        let mut a = GlyphUsage::new();
        let mut b = GlyphUsage::new();
        for gid in [5u16, 9, 12] {
            a.register(gid, None);
            b.register(gid, None);
        }
        assert_eq!(subset_tag(&a), subset_tag(&b));
        assert_eq!(subset_tag(&a).len(), 6);
        assert!(subset_tag(&a).chars().all(|c| c.is_ascii_uppercase()));

        let mut c = GlyphUsage::new();
        c.register(6, None);
        assert_ne!(subset_tag(&a), subset_tag(&c));
    }

    #[test]
    fn composite_argument_sizes() {
        assert_eq!(component_argument_size(0), 2);
        assert_eq!(component_argument_size(ARG_1_AND_2_ARE_WORDS), 4);
        assert_eq!(
            component_argument_size(ARG_1_AND_2_ARE_WORDS | WE_HAVE_A_TWO_BY_TWO),
            12
        );
    }

    #[test]
    fn checksum_pads_the_tail() {
        assert_eq!(table_checksum(&[0, 0, 0, 1]), 1);
        assert_eq!(table_checksum(&[0, 0, 0, 1, 0x80]), 1 + 0x8000_0000);
    }
}
