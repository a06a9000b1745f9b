//! Pure Rust decoding backend built on the `image` crate.
//!
//! Formats are sniffed from file content rather than trusted from the
//! extension: Spotlight assets are stored extensionless and get a literal
//! `.jpg` suffix when archived, and the Windows transcoded wallpaper has no
//! extension at all.

use super::backend::{DecodeError, Dimensions, Image, ImageBackend};
use image::ImageReader;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn open(path: &Path) -> Result<ImageReader<BufReader<File>>, DecodeError> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| DecodeError::Io(path.to_path_buf(), e))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, DecodeError> {
        let (width, height) = open(path)?
            .into_dimensions()
            .map_err(|e| DecodeError::Unsupported(path.to_path_buf(), e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, path: &Path) -> Result<Image, DecodeError> {
        let decoded = open(path)?
            .decode()
            .map_err(|e| DecodeError::Unsupported(path.to_path_buf(), e.to_string()))?;
        Ok(Image::from_rgba(decoded.to_rgba8()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{write_blob, write_jpeg, write_png};

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_jpeg(&path, 200, 150);

        let dims = RustBackend::new().identify(&path).unwrap();
        assert_eq!(dims.width, 200);
        assert_eq!(dims.height, 150);
    }

    #[test]
    fn decode_extensionless_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("a1b2c3d4e5");
        write_jpeg(&path, 64, 48);

        let img = RustBackend::new().decode(&path).unwrap();
        assert_eq!(
            img.dimensions(),
            Dimensions {
                width: 64,
                height: 48
            }
        );
    }

    #[test]
    fn decode_png_with_jpg_suffix() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("asset.jpg");
        write_png(&path, 10, 20, [9, 8, 7]);

        let img = RustBackend::new().decode(&path).unwrap();
        assert_eq!(img.dimensions().height, 20);
        assert!(img.pixels().all(|p| p.0 == [9, 8, 7, 255]));
    }

    #[test]
    fn decode_nonexistent_file_is_io_error() {
        let result = RustBackend::new().decode(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(DecodeError::Io(..))));
    }

    #[test]
    fn decode_garbage_is_unsupported() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("garbage.jpg");
        write_blob(&path, 4096);

        let result = RustBackend::new().decode(&path);
        assert!(matches!(result, Err(DecodeError::Unsupported(..))));
    }
}
