use std::ops::Range;

use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use rowblur_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents an image with pixel data.
///
/// The pixels live in one owned, contiguous, row-major buffer of
/// `height * width * CHANNELS` elements with interleaved channels. Channel `c`
/// of the pixel at row `r`, column `x` is stored at `r * width * CHANNELS +
/// x * CHANNELS + c`.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowblur_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 4>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u8; 10 * 20 * 4],
    /// ).unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 4);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        let expected = size.width * size.height * CHANNELS;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size, every element set to `val`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowblur_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 4>::from_size_val([3, 2].into(), 7u8).unwrap();
    ///
    /// assert_eq!(image.width(), 3);
    /// assert_eq!(image.height(), 2);
    /// assert!(image.as_slice().iter().all(|&v| v == 7));
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * CHANNELS];
        Image::new(size, data)
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.width()
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.height()
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// Number of elements between the start of two consecutive rows.
    pub fn row_stride(&self) -> usize {
        self.size.width * CHANNELS
    }

    /// Flat buffer offset of channel `ch` of the pixel at (`row`, `col`).
    ///
    /// No bounds are checked; use [`Image::get`] for a checked lookup.
    #[inline]
    pub fn offset(&self, row: usize, col: usize, ch: usize) -> usize {
        row * self.row_stride() + col * CHANNELS + ch
    }

    /// The pixel data as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The pixel data as a flat mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the image and return its flat buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get the elements of one row.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::RowIndexOutOfBounds`] if `row >= height`.
    pub fn row(&self, row: usize) -> Result<&[T], ImageError> {
        self.rows_slice(row..row + 1)
            .map_err(|_| ImageError::RowIndexOutOfBounds(row, self.height()))
    }

    /// Get the contiguous elements of a half-open range of rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowblur_image::Image;
    ///
    /// let image = Image::<u8, 1>::new([2, 3].into(), vec![0, 1, 2, 3, 4, 5]).unwrap();
    /// assert_eq!(image.rows_slice(1..3).unwrap(), &[2, 3, 4, 5]);
    /// ```
    pub fn rows_slice(&self, rows: Range<usize>) -> Result<&[T], ImageError> {
        let stride = self.row_stride();
        if rows.end > self.height() {
            return Err(ImageError::RowIndexOutOfBounds(rows.end, self.height()));
        }
        if rows.start > rows.end {
            return Err(ImageError::RowIndexOutOfBounds(rows.start, self.height()));
        }
        Ok(&self.data[rows.start * stride..rows.end * stride])
    }

    /// Get the element at `[row, col, ch]`, or `None` if any index is out of bounds.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        let [row, col, ch] = index;
        if row >= self.height() || col >= self.width() || ch >= CHANNELS {
            return None;
        }
        self.data.get(self.offset(row, col, ch))
    }

    /// Get the pixel data of the image.
    ///
    /// # Arguments
    ///
    /// * `x` - The x-coordinate of the pixel.
    /// * `y` - The y-coordinate of the pixel.
    /// * `ch` - The channel index of the pixel.
    ///
    /// # Returns
    ///
    /// The pixel value at the given coordinates.
    pub fn get_pixel(&self, x: usize, y: usize, ch: usize) -> Result<T, ImageError>
    where
        T: Copy,
    {
        if x >= self.width() || y >= self.height() {
            return Err(ImageError::PixelIndexOutOfBounds(
                x,
                y,
                self.width(),
                self.height(),
            ));
        }

        if ch >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(ch, CHANNELS));
        }

        Ok(self.data[self.offset(y, x, ch)])
    }
}
