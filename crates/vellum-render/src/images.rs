//! Decoded image storage.
//!
//! Image decoding happens before rendering begins; the store only hands
//! finished RGBA buffers to the renderer, keyed by the source string the
//! styled tree references.

use std::collections::BTreeMap;

use vellum_pdf::{DecodedImage, ImageSource};

/// Decoded pixel buffers keyed by source.
#[derive(Debug, Default)]
pub struct ImageStore {
    images: BTreeMap<String, DecodedImage>,
}

impl ImageStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register decoded pixels for a source key.
    pub fn insert(&mut self, src: &str, width: u32, height: u32, rgba: Vec<u8>) {
        let _ = self.images.insert(
            src.to_string(),
            DecodedImage {
                width,
                height,
                rgba,
            },
        );
    }

    /// Number of stored images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// True when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageSource for ImageStore {
    fn get(&self, src: &str) -> Option<&DecodedImage> {
        self.images.get(src)
    }
}
