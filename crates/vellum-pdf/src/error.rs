//! PDF-side error types.

use thiserror::Error;

/// Font loading, resolution, and subsetting failures.
///
/// Per-glyph failures recover locally (`.notdef` plus a warning);
/// per-face failures fall back to a Base14 font. Only the caller decides
/// whether a `FontError` is fatal.
#[derive(Debug, Error)]
pub enum FontError {
    /// The face bytes could not be parsed as a TrueType font.
    #[error("unparsable font face: {0}")]
    UnparsableFace(String),

    /// A required TrueType table is missing from the face.
    #[error("font face is missing required table '{0}'")]
    MissingTable(&'static str),

    /// A glyph id is out of range for the face.
    #[error("glyph id {gid} out of range (face has {count} glyphs)")]
    GlyphOutOfRange {
        /// The offending glyph id.
        gid: u16,
        /// Number of glyphs in the face.
        count: u16,
    },

    /// The glyf table contained a malformed glyph record.
    #[error("malformed glyph record for gid {0}")]
    MalformedGlyph(u16),
}

/// Fatal PDF assembly failures.
///
/// Anything here aborts the whole render: a document with a broken
/// cross-reference table is worse than no document.
#[derive(Debug, Error)]
pub enum PdfError {
    /// The object registry exceeded the PDF limit on object numbers.
    #[error("object registry overflow ({0} objects)")]
    RegistryOverflow(usize),

    /// An object was allocated but never materialized before `finalize`.
    #[error("object {0} was allocated but never written")]
    UnresolvedObject(u32),
}
