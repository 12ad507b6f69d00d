/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images that must share a shape do not.
    #[error("Image size mismatch: expected {expected}, got {actual}")]
    InvalidImageSize {
        /// The size the operation required.
        expected: crate::ImageSize,
        /// The size it was given.
        actual: crate::ImageSize,
    },

    /// Error when a pixel coordinate is outside the image.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when a row index is outside the image.
    #[error("Row index {0} is out of bounds (height {1})")]
    RowIndexOutOfBounds(usize, usize),

    /// Error when a channel index is outside the image.
    #[error("Channel index {0} is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),
}
