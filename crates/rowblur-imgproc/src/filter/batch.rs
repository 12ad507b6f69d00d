use std::ops::Range;

use rowblur_image::{ImageError, ImageSize};

use crate::parallel::RowRange;

/// Number of interleaved channels (R, G, B, A) the box blur works on.
pub const RGBA_CHANNELS: usize = 4;

/// Which source rows a batch may read when averaging its border rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeamPolicy {
    /// Only the batch's own rows are read. The first and last row of every batch
    /// are treated like image borders, so the output shows seams between batches.
    #[default]
    Isolated,

    /// Rows above the batch may be read, rows below it may not. Only the last row
    /// of each batch is treated like an image border.
    OpenAbove,

    /// Every image row may be read. The output does not depend on the number of
    /// batches.
    Continuous,
}

impl SeamPolicy {
    /// The source rows readable by the batch covering `range` in an image of `height` rows.
    pub fn visible_rows(&self, range: RowRange, height: usize) -> Range<usize> {
        match self {
            SeamPolicy::Isolated => range.start..range.end,
            SeamPolicy::OpenAbove => 0..range.end,
            SeamPolicy::Continuous => 0..height,
        }
    }
}

/// One unit of blur work: a row range, the whole source image and the destination rows
/// of that range.
///
/// The source is shared read-only between all batches. The destination slice is
/// owned exclusively by this batch and holds exactly its rows.
#[derive(Debug)]
pub struct BlurBatch<'a> {
    range: RowRange,
    size: ImageSize,
    src: &'a [u8],
    dst: &'a mut [u8],
}

impl<'a> BlurBatch<'a> {
    /// Create a new unit of blur work.
    ///
    /// # Arguments
    ///
    /// * `range` - The rows this batch writes.
    /// * `size` - The size of the whole image.
    /// * `src` - The RGBA pixels of the whole source image.
    /// * `dst` - The RGBA pixels of the destination rows `range`, and nothing else.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidChannelShape`] if a buffer length does not match
    /// the image size or the range, and [`ImageError::RowIndexOutOfBounds`] if the
    /// range ends past the image.
    pub fn new(
        range: RowRange,
        size: ImageSize,
        src: &'a [u8],
        dst: &'a mut [u8],
    ) -> Result<Self, ImageError> {
        let stride = size.width * RGBA_CHANNELS;
        if src.len() != size.height * stride {
            return Err(ImageError::InvalidChannelShape(
                src.len(),
                size.height * stride,
            ));
        }
        if range.end > size.height {
            return Err(ImageError::RowIndexOutOfBounds(range.end, size.height));
        }
        if range.start > range.end {
            return Err(ImageError::RowIndexOutOfBounds(range.start, size.height));
        }
        if dst.len() != range.len() * stride {
            return Err(ImageError::InvalidChannelShape(
                dst.len(),
                range.len() * stride,
            ));
        }

        Ok(Self {
            range,
            size,
            src,
            dst,
        })
    }

    /// The rows this batch writes.
    pub fn range(&self) -> RowRange {
        self.range
    }
}

/// Blur the rows of one batch with a 3x3 box filter.
///
/// For every pixel of the batch the R, G and B channels become the truncated mean of
/// the 3x3 neighbourhood, counting only neighbours inside the image columns and inside
/// the rows `seam` makes visible to the batch. The alpha channel is copied from the
/// source pixel.
///
/// # Arguments
///
/// * `batch` - The unit of work, consumed by the call.
/// * `seam` - The rows the batch may read across its borders.
pub fn blur_batch(batch: BlurBatch<'_>, seam: SeamPolicy) {
    let BlurBatch {
        range,
        size,
        src,
        dst,
    } = batch;

    let width = size.width;
    let stride = width * RGBA_CHANNELS;
    if stride == 0 {
        return;
    }

    let visible = seam.visible_rows(range, size.height);

    for (row, dst_row) in range.as_range().zip(dst.chunks_exact_mut(stride)) {
        let rows = row.saturating_sub(1).max(visible.start)..(row + 2).min(visible.end);

        for (col, dst_pixel) in dst_row.chunks_exact_mut(RGBA_CHANNELS).enumerate() {
            let cols = col.saturating_sub(1)..(col + 2).min(width);

            let mut sum = [0u32; 3];
            let mut count = 0u32;
            for r in rows.clone() {
                let neighbours = &src[r * stride + cols.start * RGBA_CHANNELS
                    ..r * stride + cols.end * RGBA_CHANNELS];
                for pixel in neighbours.chunks_exact(RGBA_CHANNELS) {
                    sum[0] += pixel[0] as u32;
                    sum[1] += pixel[1] as u32;
                    sum[2] += pixel[2] as u32;
                    count += 1;
                }
            }

            // the pixel itself is always visible, so count >= 1
            dst_pixel[0] = (sum[0] / count) as u8;
            dst_pixel[1] = (sum[1] / count) as u8;
            dst_pixel[2] = (sum[2] / count) as u8;
            dst_pixel[3] = src[row * stride + col * RGBA_CHANNELS + 3];
        }
    }
}
