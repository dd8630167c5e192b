//! Image XObjects: registration, deduplication, draw emission.
//!
//! [PDF 32000-1:2008 § 8.9 Images]
//!
//! Decoded RGBA buffers are registered once per `(source, byte length)`
//! pair and drawn any number of times with `q cm Do Q`. Alpha channels
//! become `/SMask` grayscale streams. Rasterized text shadows register
//! under the reserved `internal:shadow:` source prefix, which the page
//! combiner uses to order them beneath shapes.

use std::collections::BTreeMap;

use vellum_common::warn_once;

use crate::document::PdfDocument;
use crate::object::{ObjRef, Object, format_number};
use crate::shape::{RoundedRect, write_op};

/// Source prefix marking rasterized shadow images.
pub const SHADOW_SRC_PREFIX: &str = "internal:shadow:";

/// A decoded image: dimensions plus straight-alpha RGBA pixels.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// RGBA bytes, row-major, 4 bytes per pixel.
    pub rgba: Vec<u8>,
}

/// Supplier of decoded pixel buffers, keyed by source string.
///
/// Image *decoding* happens before rendering begins (it is the caller's
/// collaborator); the renderer only consumes finished pixels.
pub trait ImageSource {
    /// The decoded pixels for a source key, if known.
    fn get(&self, src: &str) -> Option<&DecodedImage>;
}

/// An image source with no images (useful default).
pub struct NoImages;

impl ImageSource for NoImages {
    fn get(&self, _src: &str) -> Option<&DecodedImage> {
        None
    }
}

/// One registered image.
#[derive(Debug, Clone)]
struct RegisteredImage {
    src: String,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    name: String,
}

/// Registers image data and writes draw operators.
#[derive(Debug, Default)]
pub struct ImageRenderer {
    /// Draw commands for regular (content/background) images.
    pub commands: Vec<u8>,
    /// Draw commands for shadow images (combined beneath shapes).
    pub shadow_commands: Vec<u8>,
    images: Vec<RegisteredImage>,
    dedupe: BTreeMap<(String, usize), usize>,
}

impl ImageRenderer {
    /// A renderer with no images yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register decoded RGBA pixels, returning the XObject resource name.
    /// Re-registering the same `(src, byte length)` reuses the entry.
    pub fn register(&mut self, src: &str, width: u32, height: u32, rgba: Vec<u8>) -> String {
        let key = (src.to_string(), rgba.len());
        if let Some(&index) = self.dedupe.get(&key) {
            return self.images[index].name.clone();
        }
        let name = format!("Im{}", self.images.len());
        self.images.push(RegisteredImage {
            src: src.to_string(),
            width,
            height,
            rgba,
            name: name.clone(),
        });
        let _ = self.dedupe.insert(key, self.images.len() - 1);
        name
    }

    /// True when an image name refers to a rasterized shadow.
    #[must_use]
    pub fn is_shadow(&self, name: &str) -> bool {
        self.images
            .iter()
            .any(|image| image.name == name && image.src.starts_with(SHADOW_SRC_PREFIX))
    }

    /// Draw a registered image into the given PDF-space rectangle
    /// (`x`, `y` bottom-left, in points): `q / cm / Do / Q`.
    pub fn draw(&mut self, name: &str, x: f32, y: f32, width: f32, height: f32) {
        if !(x.is_finite() && y.is_finite() && width.is_finite() && height.is_finite()) {
            warn_once("Render", "skipped image draw with non-finite coordinates");
            return;
        }
        let shadow = self.is_shadow(name);
        let buf = if shadow {
            &mut self.shadow_commands
        } else {
            &mut self.commands
        };
        write_op(buf, "q");
        write_op(
            buf,
            &format!(
                "{} 0 0 {} {} {} cm",
                format_number(width),
                format_number(height),
                format_number(x),
                format_number(y)
            ),
        );
        write_op(buf, &format!("/{name} Do"));
        write_op(buf, "Q");
    }

    /// Draw a background image clipped to a (possibly rounded) rectangle;
    /// the clip path is emitted before the image matrix.
    pub fn draw_background(&mut self, name: &str, dest: RoundedRect, clip: RoundedRect) {
        let mut clip_shapes = crate::shape::ShapeRenderer::new();
        clip_shapes.push_clip(clip);
        self.commands.extend_from_slice(&clip_shapes.commands);
        self.draw(name, dest.x, dest.y, dest.width, dest.height);
        write_op(&mut self.commands, "Q");
    }

    /// True when no image was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Materialize every registered image as an XObject stream (with an
    /// `/SMask` when the alpha channel is non-trivial) and return the
    /// name → ref resource map.
    pub fn materialize(&mut self, doc: &mut PdfDocument) -> BTreeMap<String, ObjRef> {
        let mut out = BTreeMap::new();
        let images = std::mem::take(&mut self.images);
        for image in &images {
            let pixel_count = (image.width as usize) * (image.height as usize);
            let mut rgb = Vec::with_capacity(pixel_count * 3);
            let mut alpha = Vec::with_capacity(pixel_count);
            let mut has_alpha = false;
            for pixel in image.rgba.chunks_exact(4) {
                rgb.extend_from_slice(&pixel[..3]);
                alpha.push(pixel[3]);
                if pixel[3] != 255 {
                    has_alpha = true;
                }
            }

            let smask = if has_alpha {
                let mut headers = BTreeMap::new();
                let _ = headers.insert("Type".to_string(), Object::Name("XObject".to_string()));
                let _ = headers.insert("Subtype".to_string(), Object::Name("Image".to_string()));
                let _ = headers.insert("Width".to_string(), Object::Integer(i64::from(image.width)));
                let _ = headers.insert(
                    "Height".to_string(),
                    Object::Integer(i64::from(image.height)),
                );
                let _ = headers.insert(
                    "ColorSpace".to_string(),
                    Object::Name("DeviceGray".to_string()),
                );
                let _ = headers.insert("BitsPerComponent".to_string(), Object::Integer(8));
                Some(doc.register_stream(alpha, headers))
            } else {
                None
            };

            let mut headers = BTreeMap::new();
            let _ = headers.insert("Type".to_string(), Object::Name("XObject".to_string()));
            let _ = headers.insert("Subtype".to_string(), Object::Name("Image".to_string()));
            let _ = headers.insert("Width".to_string(), Object::Integer(i64::from(image.width)));
            let _ = headers.insert(
                "Height".to_string(),
                Object::Integer(i64::from(image.height)),
            );
            let _ = headers.insert(
                "ColorSpace".to_string(),
                Object::Name("DeviceRGB".to_string()),
            );
            let _ = headers.insert("BitsPerComponent".to_string(), Object::Integer(8));
            if let Some(smask) = smask {
                let _ = headers.insert("SMask".to_string(), Object::Reference(smask));
            }
            let r = doc.register_stream(rgb, headers);
            let _ = out.insert(image.name.clone(), r);
        }
        self.images = images;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_dedupes_by_src_and_length() {
        let mut images = ImageRenderer::new();
        let a = images.register("cat.png", 2, 2, vec![0; 16]);
        let b = images.register("cat.png", 2, 2, vec![0; 16]);
        let c = images.register("dog.png", 2, 2, vec![0; 16]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn draws_emit_cm_do() {
        let mut images = ImageRenderer::new();
        let name = images.register("cat.png", 2, 2, vec![255; 16]);
        images.draw(&name, 10.0, 20.0, 100.0, 50.0);
        let text = String::from_utf8(images.commands.clone()).unwrap();
        assert!(text.contains("100 0 0 50 10 20 cm"));
        assert!(text.contains("/Im0 Do"));
    }

    #[test]
    fn shadow_images_go_to_the_shadow_stream() {
        let mut images = ImageRenderer::new();
        let name = images.register("internal:shadow:abc", 1, 1, vec![0, 0, 0, 128]);
        images.draw(&name, 0.0, 0.0, 1.0, 1.0);
        assert!(images.commands.is_empty());
        assert!(!images.shadow_commands.is_empty());
    }
}
