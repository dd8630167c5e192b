//! Font resources: faces, resolution, shaping, subsetting, registry.
//!
//! - [`face`] - A parsed TrueType face (metrics, cmap, raw bytes)
//! - [`library`] - Registered faces and (family, weight, style) matching
//! - [`base14`] - The standard fonts and WinAnsi encoding
//! - [`shape`] - CMAP-lookup shaping into glyph runs
//! - [`subset`] - Glyph usage tracking and the TrueType subset writer
//! - [`cmap`] - ToUnicode CMap generation
//! - [`registry`] - The per-document catalog and PDF object materialization

pub mod base14;
pub mod cmap;
pub mod face;
pub mod library;
pub mod registry;
pub mod shape;
pub mod subset;

pub use base14::{Base14, encode_win_ansi, encode_win_ansi_lossy, is_win_ansi};
pub use face::{FaceId, FontFace};
pub use library::FontLibrary;
pub use registry::{FontCatalog, ResolvedFont};
pub use shape::{GlyphRun, shape_run};
pub use subset::{FontSubset, GlyphUsage, build_subset, subset_tag};
