use std::time::Instant;

use rowblur_image::{Image, ImageError};
use thiserror::Error;

use super::{blur_batch, BlurBatch, SeamPolicy, RGBA_CHANNELS};
use crate::parallel::{execute_batches, partition_rows, ExecutionStrategy, ParallelError, RowRange};

/// Errors returned by the batched box blur.
#[derive(Error, Debug, PartialEq)]
pub enum BlurError {
    /// The rows could not be partitioned or the workers could not be started.
    #[error(transparent)]
    Parallel(#[from] ParallelError),

    /// The source and destination images are inconsistent.
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Runtime options of the batched box blur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoxBlurConfig {
    /// How the batches are scheduled.
    pub strategy: ExecutionStrategy,
    /// Which rows a batch may read across its borders.
    pub seam: SeamPolicy,
}

impl BoxBlurConfig {
    /// Set the execution strategy.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the seam policy.
    pub fn with_seam(mut self, seam: SeamPolicy) -> Self {
        self.seam = seam;
        self
    }
}

/// Blur an RGBA image with a 3x3 box filter, split into `num_batches` row batches.
///
/// The rows are partitioned with [`partition_rows`], each batch is handed to its own
/// worker together with the rows of `dst` it owns, and the call returns once every
/// worker has finished. Since each batch writes only its own rows of `dst`, `dst`
/// holds the assembled image at that point.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, 4).
/// * `dst` - The destination image with shape (H, W, 4).
/// * `num_batches` - The number of row batches, and therefore of workers.
/// * `config` - The execution strategy and seam policy.
///
/// # Errors
///
/// Returns [`BlurError::Image`] if `src` and `dst` differ in size and
/// [`BlurError::Parallel`] if `num_batches` is not in `1..=H`. Nothing is spawned
/// and `dst` is left untouched in both cases.
///
/// # Examples
///
/// ```
/// use rowblur_image::Image;
/// use rowblur_imgproc::filter::{box_blur_batched, BoxBlurConfig};
///
/// let src = Image::<u8, 4>::from_size_val([4, 4].into(), 128).unwrap();
/// let mut dst = Image::<u8, 4>::from_size_val(src.size(), 0).unwrap();
///
/// box_blur_batched(&src, &mut dst, 2, BoxBlurConfig::default()).unwrap();
/// assert_eq!(dst, src);
/// ```
pub fn box_blur_batched(
    src: &Image<u8, RGBA_CHANNELS>,
    dst: &mut Image<u8, RGBA_CHANNELS>,
    num_batches: usize,
    config: BoxBlurConfig,
) -> Result<(), BlurError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize {
            expected: src.size(),
            actual: dst.size(),
        }
        .into());
    }

    let ranges = partition_rows(src.height(), num_batches)?;

    let size = src.size();
    let stride = src.row_stride();
    let batches = split_batches(&ranges, src, dst.as_slice_mut(), stride)?;

    log::info!(
        "blurring {}x{} image in {} batches ({:?}, {:?} seams)",
        size.width,
        size.height,
        num_batches,
        config.strategy,
        config.seam
    );

    let start = Instant::now();
    execute_batches(config.strategy, batches, |batch| {
        let range = batch.range();
        log::debug!(
            "batch {} blurring rows {}..{}",
            range.index,
            range.start,
            range.end
        );
        blur_batch(batch, config.seam);
    })?;

    log::info!("blurred {} batches in {:?}", num_batches, start.elapsed());

    Ok(())
}

/// Blur an RGBA image with a 3x3 box filter in `num_batches` row batches and return the result.
///
/// Uses the default [`BoxBlurConfig`]: one thread per batch and isolated seams.
pub fn box_blur(
    src: &Image<u8, RGBA_CHANNELS>,
    num_batches: usize,
) -> Result<Image<u8, RGBA_CHANNELS>, BlurError> {
    let mut dst = Image::from_size_val(src.size(), 0u8)?;
    box_blur_batched(src, &mut dst, num_batches, BoxBlurConfig::default())?;
    Ok(dst)
}

// carve the destination buffer into one exclusive row slice per range, in row order
fn split_batches<'a>(
    ranges: &[RowRange],
    src: &'a Image<u8, RGBA_CHANNELS>,
    dst: &'a mut [u8],
    stride: usize,
) -> Result<Vec<BlurBatch<'a>>, ImageError> {
    let mut rest = dst;
    let mut batches = Vec::with_capacity(ranges.len());
    for range in ranges {
        let len = range.len() * stride;
        if len > rest.len() {
            return Err(ImageError::InvalidChannelShape(rest.len(), len));
        }
        let (rows, tail) = std::mem::take(&mut rest).split_at_mut(len);
        batches.push(BlurBatch::new(*range, src.size(), src.as_slice(), rows)?);
        rest = tail;
    }

    Ok(batches)
}
