//! Pixel-exact image equality.

use super::backend::Image;

/// Returns true when both images have the same dimensions and identical
/// pixels.
///
/// Dimensions are checked first. Pixels are walked in row-major order and
/// the walk stops at the first mismatch; no difference buffer is built.
pub fn images_equal(a: &Image, b: &Image) -> bool {
    if a.dimensions() != b.dimensions() {
        return false;
    }
    a.pixels().zip(b.pixels()).all(|(p, q)| p == q)
}
