#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for file access and encoding/decoding failures.
pub mod error;

/// High-level image reading functions.
///
/// See [`functional::read_image_any_rgba8`] for automatic format detection.
pub mod functional;

/// PNG image encoding and decoding.
///
/// Every PNG colour type and bit depth is read as 8-bit RGBA.
pub mod png;

pub use crate::error::IoError;
pub use crate::functional::read_image_any_rgba8;
pub use crate::png::{
    decode_image_png_rgba8, encode_image_png_rgba8, read_image_png_rgba8, write_image_png_rgba8,
};
