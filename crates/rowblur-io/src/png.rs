use std::{
    fs,
    io::{Read, Write},
    path::Path,
};

use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use rowblur_image::{Image, ImageSize};

use crate::error::IoError;

/// The eight bytes every PNG file starts with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Whether `bytes` starts with the PNG signature.
pub fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_SIGNATURE)
}

/// Read a PNG image as four channels (rgba8).
///
/// Grayscale, grayscale-alpha, RGB and palette images are expanded to RGBA, 16-bit
/// samples are reduced to 8 bits and a missing alpha channel is filled with 255.
/// The file name plays no part: any file holding PNG data is read.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A RGBA image with four channels (rgba8).
pub fn read_image_png_rgba8(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let file = fs::File::open(file_path)?;
    read_png_impl(file)
}

/// Decodes a PNG image as four channels (rgba8) from raw bytes.
///
/// # Arguments
///
/// - `bytes` - Raw bytes of the png file
pub fn decode_image_png_rgba8(bytes: &[u8]) -> Result<Image<u8, 4>, IoError> {
    read_png_impl(bytes)
}

/// Writes the given PNG _(rgba8)_ data to the given file path.
///
/// The image is encoded in memory and written to a temporary file next to
/// `file_path`, which is then renamed over `file_path`. On failure the destination
/// is left as it was and no partial file remains.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image to write.
pub fn write_image_png_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let bytes = encode_image_png_rgba8(image)?;

    let dir = match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(file_path).map_err(|e| e.error)?;

    Ok(())
}

/// Encodes the given image as an 8-bit RGBA PNG.
///
/// # Arguments
///
/// - `image` - The image to encode.
///
/// # Returns
///
/// The bytes of the PNG file.
pub fn encode_image_png_rgba8(image: &Image<u8, 4>) -> Result<Vec<u8>, IoError> {
    encode_png_impl(
        image.as_slice(),
        image.size(),
        BitDepth::Eight,
        ColorType::Rgba,
    )
}

// decode any png into rgba8, normalizing bit depth and colour type
fn read_png_impl<R: Read>(source: R) -> Result<Image<u8, 4>, IoError> {
    let mut decoder = Decoder::new(source);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != BitDepth::Eight {
        return Err(IoError::PngDecodeError(format!(
            "unexpected bit depth after expansion: {:?}",
            info.bit_depth
        )));
    }

    log::debug!(
        "decoded png {}x{} ({:?})",
        info.width,
        info.height,
        info.color_type
    );

    let rgba = expand_to_rgba8(buf, info.color_type)?;
    let size = ImageSize {
        width: info.width as usize,
        height: info.height as usize,
    };

    Ok(Image::new(size, rgba)?)
}

fn expand_to_rgba8(buf: Vec<u8>, color_type: ColorType) -> Result<Vec<u8>, IoError> {
    let rgba = match color_type {
        ColorType::Rgba => buf,
        ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
            .collect(),
        ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, u8::MAX]).collect(),
        ColorType::Indexed => {
            return Err(IoError::PngDecodeError(
                "palette image was not expanded".to_string(),
            ))
        }
    };

    Ok(rgba)
}

fn encode_png_impl(
    image_data: &[u8],
    image_size: ImageSize,
    depth: BitDepth,
    color_type: ColorType,
) -> Result<Vec<u8>, IoError> {
    let mut bytes = Vec::new();

    let mut encoder = Encoder::new(&mut bytes, image_size.width as u32, image_size.height as u32);
    encoder.set_color(color_type);
    encoder.set_depth(depth);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image_data)
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;

    Ok(bytes)
}
