//! Decoded image type and the backend trait that produces it.
//!
//! The [`ImageBackend`] trait defines the two operations the rest of the
//! crate needs from an image decoder: `identify` (header-only dimensions)
//! and `decode` (full pixel buffer).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure-Rust decoders.

use image::RgbaImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Failed to decode {0}: {1}")]
    Unsupported(PathBuf, String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A fully decoded raster.
///
/// Pixels are normalized to 8-bit RGBA on decode, so two images compare
/// equal regardless of the container format or channel layout they were
/// stored in. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pixels: RgbaImage,
}

impl Image {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.pixels.width(),
            height: self.pixels.height(),
        }
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = &image::Rgba<u8>> {
        self.pixels.pixels()
    }
}

/// Trait for image decoding backends.
///
/// `identify` must agree with `decode(..).dimensions()` for every file the
/// backend can decode; callers use it to skip full decodes.
pub trait ImageBackend {
    /// Read image dimensions without decoding pixel data.
    fn identify(&self, path: &Path) -> Result<Dimensions, DecodeError>;

    /// Decode the whole image into memory.
    fn decode(&self, path: &Path) -> Result<Image, DecodeError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Mock backend serving images from memory and recording every call.
    #[derive(Default)]
    pub struct MockBackend {
        pub images: HashMap<PathBuf, Image>,
        pub calls: RefCell<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(PathBuf),
        Decode(PathBuf),
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_image(mut self, path: impl Into<PathBuf>, image: Image) -> Self {
            self.images.insert(path.into(), image);
            self
        }

        pub fn decode_count(&self) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|op| matches!(op, RecordedOp::Decode(_)))
                .count()
        }

        fn lookup(&self, path: &Path) -> Result<&Image, DecodeError> {
            self.images
                .get(path)
                .ok_or_else(|| DecodeError::Unsupported(path.to_path_buf(), "no mock image".into()))
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, DecodeError> {
            self.calls
                .borrow_mut()
                .push(RecordedOp::Identify(path.to_path_buf()));
            self.lookup(path).map(Image::dimensions)
        }

        fn decode(&self, path: &Path) -> Result<Image, DecodeError> {
            self.calls
                .borrow_mut()
                .push(RecordedOp::Decode(path.to_path_buf()));
            self.lookup(path).cloned()
        }
    }

    /// Solid-color image of the given size.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Image {
        Image::from_rgba(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    #[test]
    fn image_reports_dimensions() {
        let img = solid(30, 20, [1, 2, 3, 255]);
        assert_eq!(
            img.dimensions(),
            Dimensions {
                width: 30,
                height: 20
            }
        );
        assert_eq!(img.pixels().count(), 600);
    }

    #[test]
    fn mock_records_decode_and_identify() {
        let backend = MockBackend::new().with_image("/a.jpg", solid(4, 4, [0, 0, 0, 255]));

        let dims = backend.identify(Path::new("/a.jpg")).unwrap();
        assert_eq!(dims.width, 4);
        backend.decode(Path::new("/a.jpg")).unwrap();

        assert_eq!(
            *backend.calls.borrow(),
            vec![
                RecordedOp::Identify("/a.jpg".into()),
                RecordedOp::Decode("/a.jpg".into())
            ]
        );
        assert_eq!(backend.decode_count(), 1);
    }

    #[test]
    fn mock_missing_image_errors() {
        let backend = MockBackend::new();
        assert!(matches!(
            backend.decode(Path::new("/missing.jpg")),
            Err(DecodeError::Unsupported(..))
        ));
    }
}
