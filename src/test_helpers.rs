//! Shared test utilities for the spotwall test suite.
//!
//! Provides synthetic image writers, fake Spotlight asset caches, and
//! archive-tree builders so each test gets an isolated filesystem fixture.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let cache = tmp.path().join("Assets");
//! add_asset(&cache, "abc", 400, 300, [255, 0, 0]);
//! ```

use chrono::NaiveDate;
use image::{ImageEncoder, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

// =========================================================================
// Image writers
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Write a small valid JPEG with a gradient fill.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a lossless PNG filled with a single color.
///
/// PNG keeps pixels exact, so tests can build pixel-identical copies.
pub fn write_png(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    let img = RgbImage::from_pixel(width, height, image::Rgb(rgb));
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

/// Write `len` bytes of non-image data.
pub fn write_blob(path: &Path, len: usize) {
    let bytes: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    fs::write(path, bytes).unwrap();
}

/// Pad an existing file with trailing zero bytes until it is at least `len` long.
///
/// Decoders stop at the end-of-image marker, so padding keeps the file decodable.
pub fn pad_to(path: &Path, len: u64) {
    let file = fs::OpenOptions::new().append(true).open(path).unwrap();
    let current = file.metadata().unwrap().len();
    if current < len {
        file.set_len(len).unwrap();
    }
}

pub fn set_modified(path: &Path, time: SystemTime) {
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(time).unwrap();
}

// =========================================================================
// Fixture builders
// =========================================================================

/// Add an extensionless PNG asset to a fake Spotlight cache, padded past the
/// default 100 KB threshold.
pub fn add_asset(cache: &Path, name: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
    fs::create_dir_all(cache).unwrap();
    let path = cache.join(name);
    write_png(&path, width, height, rgb);
    pad_to(&path, 200 * 1024);
    path
}

/// Place a PNG directly into an archive orientation folder.
pub fn add_archived(
    base: &Path,
    day: &str,
    orientation_dir: &str,
    name: &str,
    rgb: [u8; 3],
) -> PathBuf {
    let dir = base.join(day).join(orientation_dir);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    write_png(&path, 16, 9, rgb);
    path
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// File names directly inside `dir`, sorted. Empty if `dir` is missing.
pub fn file_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
