//! The PDF document assembler.
//!
//! [PDF 32000-1:2008 § 7.5 File structure](https://opensource.adobe.com/dam/cmiat/en/devnet/pdf/pdfs/PDF32000_2008.pdf)
//!
//! Maintains the object registry, the page list, and document metadata;
//! `finalize` serializes everything, emits the cross-reference table and
//! trailer, and returns the complete byte buffer.

use std::collections::BTreeMap;
use std::io::Write;

use crate::error::PdfError;
use crate::object::{ObjRef, Object};

/// PDF caps object numbers at 8,388,607 (§ Annex C).
const MAX_OBJECTS: usize = 8_388_607;

/// Document information dictionary fields.
///
/// [§ 14.3.3 Document information dictionary]
#[derive(Debug, Clone, Default)]
pub struct DocumentMetadata {
    /// `/Title`.
    pub title: Option<String>,
    /// `/Author`.
    pub author: Option<String>,
    /// `/Subject`.
    pub subject: Option<String>,
    /// `/Keywords`.
    pub keywords: Option<String>,
    /// `/Producer`.
    pub producer: Option<String>,
}

impl DocumentMetadata {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
            && self.producer.is_none()
    }
}

/// Per-page resource name → object maps.
///
/// [§ 7.8.3 Resource dictionaries]
#[derive(Debug, Clone, Default)]
pub struct PageResources {
    /// `/Font` entries.
    pub fonts: BTreeMap<String, ObjRef>,
    /// `/XObject` entries.
    pub xobjects: BTreeMap<String, ObjRef>,
    /// `/ExtGState` entries (inline dictionaries).
    pub ext_g_states: BTreeMap<String, Object>,
    /// `/Shading` entries.
    pub shadings: BTreeMap<String, ObjRef>,
    /// `/Pattern` entries.
    pub patterns: BTreeMap<String, ObjRef>,
}

/// One finished page: size in points, raw content stream, resources.
#[derive(Debug, Clone)]
pub struct Page {
    /// MediaBox width in points.
    pub width_pt: f32,
    /// MediaBox height in points.
    pub height_pt: f32,
    /// The content stream bytes.
    pub content: Vec<u8>,
    /// Resources referenced by the content stream.
    pub resources: PageResources,
}

/// A registered object body.
#[derive(Debug, Clone)]
enum Body {
    Direct(Object),
    Stream {
        dict: BTreeMap<String, Object>,
        data: Vec<u8>,
    },
    Pending,
}

/// The in-progress document: object registry plus page list.
#[derive(Debug, Default)]
pub struct PdfDocument {
    objects: Vec<Body>,
    pages: Vec<Page>,
    /// Document information fields, serialized into `/Info` when any is
    /// set.
    pub metadata: DocumentMetadata,
}

impl PdfDocument {
    /// A fresh, empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered objects so far.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Allocate an object number without a body yet. The body must be
    /// supplied via [`PdfDocument::set_object`] or
    /// [`PdfDocument::set_stream`] before `finalize`.
    pub fn allocate(&mut self) -> ObjRef {
        self.objects.push(Body::Pending);
        ObjRef(self.objects.len() as u32)
    }

    /// Register a direct object, returning its reference.
    pub fn register(&mut self, object: Object) -> ObjRef {
        self.objects.push(Body::Direct(object));
        ObjRef(self.objects.len() as u32)
    }

    /// Register a binary stream with extra header entries. `/Length` is
    /// filled in automatically.
    pub fn register_stream(
        &mut self,
        data: Vec<u8>,
        extra_headers: BTreeMap<String, Object>,
    ) -> ObjRef {
        self.objects.push(Body::Stream {
            dict: extra_headers,
            data,
        });
        ObjRef(self.objects.len() as u32)
    }

    /// Fill in a previously allocated object.
    ///
    /// # Panics
    /// Panics when `r` was never allocated.
    pub fn set_object(&mut self, r: ObjRef, object: Object) {
        self.objects[(r.0 - 1) as usize] = Body::Direct(object);
    }

    /// Fill in a previously allocated object with a stream body.
    ///
    /// # Panics
    /// Panics when `r` was never allocated.
    pub fn set_stream(&mut self, r: ObjRef, data: Vec<u8>, extra_headers: BTreeMap<String, Object>) {
        self.objects[(r.0 - 1) as usize] = Body::Stream {
            dict: extra_headers,
            data,
        };
    }

    /// Append a finished page.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Serialize the document: objects, cross-reference table, trailer.
    ///
    /// Object numbers are assigned in registration order and dictionaries
    /// are sorted maps, so identical input produces identical bytes.
    ///
    /// # Errors
    ///
    /// [`PdfError::RegistryOverflow`] past the PDF object-number cap;
    /// [`PdfError::UnresolvedObject`] when an allocated object was never
    /// materialized.
    pub fn finalize(mut self) -> Result<Vec<u8>, PdfError> {
        // STEP 1: Serialize metadata into the information dictionary.
        let info_ref = if self.metadata.is_empty() {
            None
        } else {
            let mut info = BTreeMap::new();
            let fields = [
                ("Title", self.metadata.title.clone()),
                ("Author", self.metadata.author.clone()),
                ("Subject", self.metadata.subject.clone()),
                ("Keywords", self.metadata.keywords.clone()),
                ("Producer", self.metadata.producer.clone()),
            ];
            // `Object::Literal` escapes at serialization time.
            for (key, value) in fields {
                if let Some(value) = value {
                    let _ = info.insert(key.to_string(), Object::Literal(value));
                }
            }
            Some(self.register(Object::Dictionary(info)))
        };

        // STEP 2: Materialize page objects under a shared Pages node.
        let pages_root = self.allocate();
        let mut kids: Vec<Object> = Vec::new();
        let pages = std::mem::take(&mut self.pages);
        for page in pages {
            let content_ref = self.register_stream(page.content, BTreeMap::new());
            let resources = resources_dict(&page.resources);
            let page_ref = self.register(Object::dict([
                ("Type", Object::Name("Page".to_string())),
                ("Parent", pages_root.into()),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(page.width_pt),
                        Object::Real(page.height_pt),
                    ]),
                ),
                ("Contents", content_ref.into()),
                ("Resources", resources),
            ]));
            kids.push(page_ref.into());
        }
        let kid_count = kids.len() as i64;
        self.set_object(
            pages_root,
            Object::dict([
                ("Type", Object::Name("Pages".to_string())),
                ("Kids", Object::Array(kids)),
                ("Count", Object::Integer(kid_count)),
            ]),
        );

        // STEP 3: The catalog.
        let catalog = self.register(Object::dict([
            ("Type", Object::Name("Catalog".to_string())),
            ("Pages", pages_root.into()),
        ]));

        if self.objects.len() > MAX_OBJECTS {
            return Err(PdfError::RegistryOverflow(self.objects.len()));
        }

        // STEP 4: Stream all objects sequentially, recording byte offsets.
        let mut buf: Vec<u8> = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n");
        // Binary marker comment so transports treat the file as binary.
        buf.extend_from_slice(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n']);

        let mut offsets: Vec<usize> = Vec::with_capacity(self.objects.len());
        for (index, body) in self.objects.iter().enumerate() {
            offsets.push(buf.len());
            let number = index + 1;
            let _ = write!(buf, "{number} 0 obj\n");
            match body {
                Body::Direct(object) => {
                    object.write(&mut buf);
                    buf.extend_from_slice(b"\nendobj\n");
                }
                Body::Stream { dict, data } => {
                    let mut full = dict.clone();
                    let _ = full.insert("Length".to_string(), Object::Integer(data.len() as i64));
                    Object::Dictionary(full).write(&mut buf);
                    buf.extend_from_slice(b"\nstream\n");
                    buf.extend_from_slice(data);
                    buf.extend_from_slice(b"\nendstream\nendobj\n");
                }
                Body::Pending => {
                    return Err(PdfError::UnresolvedObject(number as u32));
                }
            }
        }

        // STEP 5: Cross-reference table and trailer.
        let xref_start = buf.len();
        let _ = write!(buf, "xref\n0 {}\n", offsets.len() + 1);
        buf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            let _ = write!(buf, "{offset:010} 00000 n \n");
        }

        buf.extend_from_slice(b"trailer\n");
        let mut trailer = BTreeMap::new();
        let _ = trailer.insert(
            "Size".to_string(),
            Object::Integer(offsets.len() as i64 + 1),
        );
        let _ = trailer.insert("Root".to_string(), Object::Reference(catalog));
        if let Some(info) = info_ref {
            let _ = trailer.insert("Info".to_string(), Object::Reference(info));
        }
        Object::Dictionary(trailer).write(&mut buf);
        let _ = write!(buf, "\nstartxref\n{xref_start}\n");
        buf.extend_from_slice(b"%%EOF\n");

        Ok(buf)
    }
}

/// Build a page's `/Resources` dictionary from its name→ref maps.
fn resources_dict(resources: &PageResources) -> Object {
    let mut dict: BTreeMap<String, Object> = BTreeMap::new();
    if !resources.fonts.is_empty() {
        let _ = dict.insert("Font".to_string(), ref_map(&resources.fonts));
    }
    if !resources.xobjects.is_empty() {
        let _ = dict.insert("XObject".to_string(), ref_map(&resources.xobjects));
    }
    if !resources.ext_g_states.is_empty() {
        let _ = dict.insert(
            "ExtGState".to_string(),
            Object::Dictionary(resources.ext_g_states.clone()),
        );
    }
    if !resources.shadings.is_empty() {
        let _ = dict.insert("Shading".to_string(), ref_map(&resources.shadings));
    }
    if !resources.patterns.is_empty() {
        let _ = dict.insert("Pattern".to_string(), ref_map(&resources.patterns));
    }
    Object::Dictionary(dict)
}

fn ref_map(map: &BTreeMap<String, ObjRef>) -> Object {
    Object::Dictionary(
        map.iter()
            .map(|(name, r)| (name.clone(), Object::Reference(*r)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_page() -> Page {
        Page {
            width_pt: 612.0,
            height_pt: 792.0,
            content: b"BT ET".to_vec(),
            resources: PageResources::default(),
        }
    }

    #[test]
    fn finalize_produces_well_formed_shell() {
        let mut doc = PdfDocument::new();
        doc.add_page(single_page());
        let bytes = doc.finalize().unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.contains("/Type /Catalog"));
        assert!(text.contains("/Type /Pages"));
        assert!(text.contains("startxref"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn xref_offsets_point_at_objects() {
        let mut doc = PdfDocument::new();
        doc.add_page(single_page());
        let bytes = doc.finalize().unwrap();
        let text = String::from_utf8_lossy(&bytes).to_string();

        // Every "N 0000000000 n" style entry must point at "N 0 obj".
        let xref_at = text.find("xref\n").unwrap();
        let entries: Vec<&str> = text[xref_at..]
            .lines()
            .skip(2)
            .take_while(|l| l.ends_with("n ") || l.ends_with("f "))
            .collect();
        for (index, entry) in entries.iter().enumerate().skip(1) {
            let offset: usize = entry[..10].parse().unwrap();
            let expected = format!("{index} 0 obj");
            assert_eq!(&text[offset..offset + expected.len()], expected.as_str());
        }
    }

    #[test]
    fn identical_input_identical_bytes() {
        let build = || {
            let mut doc = PdfDocument::new();
            doc.metadata.title = Some("Report".to_string());
            doc.add_page(single_page());
            doc.finalize().unwrap()
        };
        assert_eq!(build(), build());
    }
}
