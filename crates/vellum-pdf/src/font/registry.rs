//! The font catalog: resource resolution and object materialization.
//!
//! [PDF 32000-1:2008 § 9.6/§ 9.7 Simple and composite fonts]
//!
//! Base14 fonts materialize lazily as Type1 dictionaries. Every embedded
//! face tracks glyph usage and materializes one Type0/CIDFontType2 object
//! per distinct used glyph set; when the set grows after materialization,
//! the next materialization produces a fresh object ref and the alias
//! moves to it, so readers always see the most complete subset.

use std::collections::BTreeMap;

use vellum_common::warn_once;
use vellum_style::ComputedStyle;

use crate::document::PdfDocument;
use crate::error::FontError;
use crate::font::base14::{Base14, is_win_ansi};
use crate::font::face::FaceId;
use crate::font::library::FontLibrary;
use crate::font::shape::GlyphRun;
use crate::font::subset::{FontSubset, GlyphUsage, build_subset};
use crate::object::{ObjRef, Object};

/// How a style+text pair resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedFont {
    /// A standard Type1 font with WinAnsi encoding.
    Base14(Base14),
    /// An embedded face shown through Identity-H.
    Face(FaceId),
}

#[derive(Debug)]
struct Base14Slot {
    name: String,
    font: Base14,
    obj: Option<ObjRef>,
}

#[derive(Debug)]
struct FaceSlot {
    name: String,
    usage: GlyphUsage,
    obj: Option<ObjRef>,
    materialized_fingerprint: Option<u64>,
}

/// The per-document font registry.
#[derive(Debug, Default)]
pub struct FontCatalog {
    base14: BTreeMap<&'static str, Base14Slot>,
    faces: BTreeMap<FaceId, FaceSlot>,
    next_index: usize,
}

impl FontCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a font resource for a style and the text it must show.
    ///
    /// A registered face for the family wins. Without one, the text falls
    /// back to a Base14 font — and if it needs codepoints outside
    /// WinAnsi, those characters degrade to `?` with a warning (an
    /// embedded face is the only lossless path for them).
    #[must_use]
    pub fn resolve(&self, library: &FontLibrary, style: &ComputedStyle, text: &str) -> ResolvedFont {
        if let Some(id) = library.resolve(&style.font_family, style.font_weight, style.font_style)
        {
            return ResolvedFont::Face(id);
        }
        if !is_win_ansi(text) {
            warn_once(
                "Font",
                &format!(
                    "no embedded face for '{}'; non-WinAnsi text degrades",
                    style.font_family
                ),
            );
        }
        ResolvedFont::Base14(Base14::select(
            &style.font_family,
            style.font_weight,
            style.font_style,
        ))
    }

    /// The stable resource name for a resolved font (allocating on first
    /// use: `F0`, `F1`, ...).
    pub fn font_name(&mut self, resolved: ResolvedFont) -> String {
        match resolved {
            ResolvedFont::Base14(font) => {
                if let Some(slot) = self.base14.get(font.base_name()) {
                    return slot.name.clone();
                }
                let name = self.allocate_name();
                let _ = self.base14.insert(
                    font.base_name(),
                    Base14Slot {
                        name: name.clone(),
                        font,
                        obj: None,
                    },
                );
                name
            }
            ResolvedFont::Face(id) => {
                if let Some(slot) = self.faces.get(&id) {
                    return slot.name.clone();
                }
                let name = self.allocate_name();
                let _ = self.faces.insert(
                    id,
                    FaceSlot {
                        name: name.clone(),
                        usage: GlyphUsage::new(),
                        obj: None,
                        materialized_fingerprint: None,
                    },
                );
                name
            }
        }
    }

    fn allocate_name(&mut self) -> String {
        let name = format!("F{}", self.next_index);
        self.next_index += 1;
        name
    }

    /// Record every glyph of a shaped run against its face's subset.
    pub fn register_run(&mut self, run: &GlyphRun) {
        let _ = self.font_name(ResolvedFont::Face(run.face));
        if let Some(slot) = self.faces.get_mut(&run.face) {
            for (index, gid) in run.glyph_ids.iter().enumerate() {
                slot.usage.register(*gid, run.chars.get(index).copied());
            }
        }
    }

    /// The subset CID for a glyph of a face (0 when unregistered).
    #[must_use]
    pub fn cid(&self, face: FaceId, gid: u16) -> u16 {
        self.faces.get(&face).map_or(0, |slot| slot.usage.cid(gid))
    }

    /// Glyph usage for a face (tests and invariant checks).
    #[must_use]
    pub fn usage(&self, face: FaceId) -> Option<&GlyphUsage> {
        self.faces.get(&face).map(|slot| &slot.usage)
    }

    /// Materialize every pending font object.
    ///
    /// Base14 slots become Type1 dictionaries once. A face whose usage
    /// fingerprint changed since its last materialization gets a fresh
    /// Type0 object graph and its alias moves to the new ref.
    ///
    /// # Errors
    ///
    /// Propagates subsetting failures ([`FontError`]).
    pub fn materialize(
        &mut self,
        doc: &mut PdfDocument,
        library: &FontLibrary,
    ) -> Result<(), FontError> {
        for slot in self.base14.values_mut() {
            if slot.obj.is_some() {
                continue;
            }
            let dict = Object::dict([
                ("Type", Object::Name("Font".to_string())),
                ("Subtype", Object::Name("Type1".to_string())),
                ("BaseFont", Object::Name(slot.font.base_name().to_string())),
                ("Encoding", Object::Name("WinAnsiEncoding".to_string())),
            ]);
            slot.obj = Some(doc.register(dict));
        }

        for (face_id, slot) in &mut self.faces {
            if slot.usage.is_empty() {
                continue;
            }
            let fingerprint = slot.usage.fingerprint();
            if slot.materialized_fingerprint == Some(fingerprint) {
                continue;
            }
            let face = library.face(*face_id);
            let subset = build_subset(face, &slot.usage)?;
            slot.obj = Some(materialize_type0(doc, face, &subset));
            slot.materialized_fingerprint = Some(fingerprint);
        }
        Ok(())
    }

    /// All materialized font resources: name → latest ref.
    #[must_use]
    pub fn font_refs(&self) -> BTreeMap<String, ObjRef> {
        let mut out = BTreeMap::new();
        for slot in self.base14.values() {
            if let Some(obj) = slot.obj {
                let _ = out.insert(slot.name.clone(), obj);
            }
        }
        for slot in self.faces.values() {
            if let Some(obj) = slot.obj {
                let _ = out.insert(slot.name.clone(), obj);
            }
        }
        out
    }
}

/// Build the Type0 object graph for one subset and return the root ref.
///
/// [§ 9.7.6 Type 0 font dictionaries]
fn materialize_type0(doc: &mut PdfDocument, face: &crate::font::FontFace, subset: &FontSubset) -> ObjRef {
    let tagged_name = format!("{}+{}", subset.tag, face.postscript_name);

    // FontFile2: the raw subset bytes.
    let mut stream_headers = BTreeMap::new();
    let _ = stream_headers.insert(
        "Length1".to_string(),
        Object::Integer(subset.font_file.len() as i64),
    );
    let font_file = doc.register_stream(subset.font_file.clone(), stream_headers);

    // FontDescriptor. Flag bits: 1 FixedPitch, 2 Serif, 3 Symbolic,
    // 6 Nonsymbolic, 7 Italic (PDF numbers bits from 1).
    let mut flags = 0_i64;
    if face.monospaced {
        flags |= 1;
    }
    let serif = {
        let lower = face.family.to_ascii_lowercase();
        lower.contains("times") || (lower.contains("serif") && !lower.contains("sans"))
    };
    if serif {
        flags |= 1 << 1;
    }
    // Faces are shown through a Unicode cmap, so nonsymbolic.
    flags |= 1 << 5;
    if face.italic {
        flags |= 1 << 6;
    }

    let descriptor = doc.register(Object::dict([
        ("Type", Object::Name("FontDescriptor".to_string())),
        ("FontName", Object::Name(tagged_name.clone())),
        ("Flags", Object::Integer(flags)),
        (
            "FontBBox",
            Object::Array(vec![
                Object::Real(face.to_thousandths(face.bbox.0)),
                Object::Real(face.to_thousandths(face.bbox.1)),
                Object::Real(face.to_thousandths(face.bbox.2)),
                Object::Real(face.to_thousandths(face.bbox.3)),
            ]),
        ),
        ("ItalicAngle", Object::Integer(if face.italic { -12 } else { 0 })),
        ("Ascent", Object::Real(face.to_thousandths(face.ascent))),
        ("Descent", Object::Real(face.to_thousandths(face.descent))),
        ("CapHeight", Object::Real(face.to_thousandths(face.cap_height))),
        ("XHeight", Object::Real(face.to_thousandths(face.x_height))),
        ("StemV", Object::Integer(80)),
        ("FontFile2", font_file.into()),
    ]));

    // CIDFontType2 descendant with run-length-encoded widths.
    let cid_font = doc.register(Object::dict([
        ("Type", Object::Name("Font".to_string())),
        ("Subtype", Object::Name("CIDFontType2".to_string())),
        ("BaseFont", Object::Name(tagged_name.clone())),
        (
            "CIDSystemInfo",
            Object::dict([
                ("Registry", Object::Literal("Adobe".to_string())),
                ("Ordering", Object::Literal("Identity".to_string())),
                ("Supplement", Object::Integer(0)),
            ]),
        ),
        ("FontDescriptor", descriptor.into()),
        ("DW", Object::Integer(1000)),
        ("W", encode_widths(&subset.widths)),
        ("CIDToGIDMap", Object::Name("Identity".to_string())),
    ]));

    let to_unicode = doc.register_stream(subset.to_unicode.clone(), BTreeMap::new());

    doc.register(Object::dict([
        ("Type", Object::Name("Font".to_string())),
        ("Subtype", Object::Name("Type0".to_string())),
        ("BaseFont", Object::Name(tagged_name)),
        ("Encoding", Object::Name("Identity-H".to_string())),
        ("DescendantFonts", Object::Array(vec![cid_font.into()])),
        ("ToUnicode", to_unicode.into()),
    ]))
}

/// [§ 9.7.4.3 Glyph metrics in CIDFonts]
///
/// Run-length encode the per-CID widths: a run of ≥ 3 equal widths emits
/// `start end width`, anything else a `start [w ...]` group.
fn encode_widths(widths: &[f32]) -> Object {
    let mut out: Vec<Object> = Vec::new();
    let mut index = 0;
    while index < widths.len() {
        // Length of the equal-width run starting here.
        let mut run = 1;
        while index + run < widths.len() && (widths[index + run] - widths[index]).abs() < 0.01 {
            run += 1;
        }
        if run >= 3 {
            out.push(Object::Integer(index as i64));
            out.push(Object::Integer((index + run - 1) as i64));
            out.push(Object::Real(widths[index]));
            index += run;
        } else {
            // Collect a mixed group until the next long run.
            let start = index;
            let mut list: Vec<Object> = Vec::new();
            while index < widths.len() {
                let mut lookahead = 1;
                while index + lookahead < widths.len()
                    && (widths[index + lookahead] - widths[index]).abs() < 0.01
                {
                    lookahead += 1;
                }
                if lookahead >= 3 {
                    break;
                }
                for _ in 0..lookahead {
                    list.push(Object::Real(widths[index]));
                    index += 1;
                }
            }
            out.push(Object::Integer(start as i64));
            out.push(Object::Array(list));
        }
    }
    Object::Array(out)
}
