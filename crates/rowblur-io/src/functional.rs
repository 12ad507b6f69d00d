use std::{fs, path::Path};

use rowblur_image::{Image, ImageSize};

use crate::{
    error::IoError,
    png::{decode_image_png_rgba8, is_png},
};

/// Reads an image from the given file path as four channels (rgba8).
///
/// The decoder is chosen from the file contents, never from its name. PNG data goes
/// through [`decode_image_png_rgba8`]; any other format the image crate recognises
/// is decoded and converted to RGBA.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// A RGBA image with four channels (rgba8).
pub fn read_image_any_rgba8(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = fs::read(file_path)?;
    if is_png(&bytes) {
        return decode_image_png_rgba8(&bytes);
    }

    let img = image::load_from_memory(&bytes)?.to_rgba8();
    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_raw())?)
}
