//! Image loading and comparison in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` (header only) |
//! | **Decode** | `ImageReader::decode` → RGBA8 |
//! | **Compare** | [`images_equal`], row-major short-circuit walk |
//!
//! The module is split into:
//! - **Backend**: [`Image`], [`ImageBackend`] trait + [`RustBackend`]
//! - **Compare**: exact pixel equality between two decoded images

pub mod backend;
mod compare;
pub mod rust_backend;

pub use backend::{DecodeError, Dimensions, Image, ImageBackend};
pub use compare::images_equal;
pub use rust_backend::RustBackend;
