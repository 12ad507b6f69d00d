use rand::{rngs::StdRng, Rng, SeedableRng};

use rowblur_image::{Image, ImageSize};
use rowblur_imgproc::filter::{box_blur, box_blur_batched, BlurError, BoxBlurConfig, SeamPolicy};
use rowblur_imgproc::parallel::{partition_rows, ExecutionStrategy};

fn random_image(size: ImageSize, seed: u64) -> Result<Image<u8, 4>, BlurError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..size.width * size.height * 4)
        .map(|_| rng.random::<u8>())
        .collect();
    Ok(Image::new(size, data)?)
}

// red channel grows by 10 per row, everything else constant
fn vertical_gradient(size: ImageSize) -> Result<Image<u8, 4>, BlurError> {
    let mut data = Vec::with_capacity(size.width * size.height * 4);
    for row in 0..size.height {
        for _ in 0..size.width {
            data.extend_from_slice(&[(row * 10) as u8, 50, 100, 255]);
        }
    }
    Ok(Image::new(size, data)?)
}

// straightforward per-pixel blur over rows lo..hi, written with signed offsets
fn reference_blur(src: &Image<u8, 4>, dst: &mut [u8], lo: usize, hi: usize) {
    let width = src.width() as i64;
    for row in lo..hi {
        for col in 0..src.width() {
            let mut sum = [0u32; 3];
            let mut count = 0;
            for di in -1i64..=1 {
                for dj in -1i64..=1 {
                    let r = row as i64 + di;
                    let c = col as i64 + dj;
                    if r >= lo as i64 && r < hi as i64 && c >= 0 && c < width {
                        for (ch, s) in sum.iter_mut().enumerate() {
                            *s += src.as_slice()[src.offset(r as usize, c as usize, ch)] as u32;
                        }
                        count += 1;
                    }
                }
            }
            for (ch, s) in sum.iter().enumerate() {
                dst[src.offset(row, col, ch)] = (s / count) as u8;
            }
            dst[src.offset(row, col, 3)] = src.as_slice()[src.offset(row, col, 3)];
        }
    }
}

#[test]
fn one_batch_equals_sequential_blur() -> Result<(), BlurError> {
    for (i, size) in [[1, 1], [1, 7], [7, 1], [5, 4], [16, 9]].into_iter().enumerate() {
        let src = random_image(size.into(), i as u64)?;
        let out = box_blur(&src, 1)?;

        let mut expected = vec![0u8; src.as_slice().len()];
        reference_blur(&src, &mut expected, 0, src.height());
        assert_eq!(out.as_slice(), expected.as_slice(), "size {size:?}");
    }
    Ok(())
}

#[test]
fn batches_match_per_batch_sequential_blur() -> Result<(), BlurError> {
    let src = random_image([13, 17].into(), 42)?;
    for num_batches in 1..=src.height() {
        let out = box_blur(&src, num_batches)?;

        let mut expected = vec![0u8; src.as_slice().len()];
        for range in partition_rows(src.height(), num_batches)? {
            reference_blur(&src, &mut expected, range.start, range.end);
        }
        assert_eq!(out.as_slice(), expected.as_slice(), "{num_batches} batches");
    }
    Ok(())
}

#[test]
fn single_pixel_is_unchanged() -> Result<(), BlurError> {
    let src = Image::<u8, 4>::new([1, 1].into(), vec![12, 34, 56, 78])?;
    let out = box_blur(&src, 1)?;
    assert_eq!(out.as_slice(), &[12, 34, 56, 78]);
    Ok(())
}

#[test]
fn uniform_image_is_unchanged() -> Result<(), BlurError> {
    let mut data = Vec::new();
    for _ in 0..(9 * 11) {
        data.extend_from_slice(&[17, 99, 203, 64]);
    }
    let src = Image::<u8, 4>::new([9, 11].into(), data)?;
    for num_batches in 1..=src.height() {
        let out = box_blur(&src, num_batches)?;
        assert_eq!(out, src, "{num_batches} batches");
    }
    Ok(())
}

#[test]
fn batch_count_changes_only_seam_rows() -> Result<(), BlurError> {
    let size: ImageSize = [6, 12].into();
    let src = vertical_gradient(size)?;
    let whole = box_blur(&src, 1)?;

    for num_batches in 2..=4 {
        let out = box_blur(&src, num_batches)?;
        let ranges = partition_rows(size.height, num_batches)?;

        let mut seam_rows = Vec::new();
        for range in &ranges {
            if range.start != 0 {
                seam_rows.push(range.start);
            }
            if range.end != size.height {
                seam_rows.push(range.end - 1);
            }
        }
        seam_rows.sort_unstable();
        seam_rows.dedup();

        let mut changed_rows = Vec::new();
        for row in 0..size.height {
            if whole.row(row)? != out.row(row)? {
                changed_rows.push(row);
            }
        }
        assert_eq!(changed_rows, seam_rows, "{num_batches} batches");
    }
    Ok(())
}

#[test]
fn seam_rows_average_within_the_batch() -> Result<(), BlurError> {
    // rows 0..3 and 3..6; rows 2 and 3 only see their own batch
    let src = vertical_gradient([3, 6].into())?;
    let out = box_blur(&src, 2)?;
    assert_eq!(out.get([2, 1, 0]), Some(&15)); // (10 + 20) / 2
    assert_eq!(out.get([3, 1, 0]), Some(&35)); // (30 + 40) / 2
    assert_eq!(out.get([1, 1, 0]), Some(&10)); // (0 + 10 + 20) / 3
    Ok(())
}

#[test]
fn strategies_produce_identical_output() -> Result<(), BlurError> {
    let src = random_image([31, 23].into(), 7)?;
    for num_batches in [1, 2, 5, 23] {
        let mut outputs = Vec::new();
        for strategy in [
            ExecutionStrategy::Serial,
            ExecutionStrategy::GlobalPool,
            ExecutionStrategy::ThreadPerBatch,
        ] {
            let mut dst = Image::from_size_val(src.size(), 0u8)?;
            let config = BoxBlurConfig::default().with_strategy(strategy);
            box_blur_batched(&src, &mut dst, num_batches, config)?;
            outputs.push(dst);
        }
        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[0], outputs[2]);
    }
    Ok(())
}

#[test]
fn continuous_seams_ignore_batch_count() -> Result<(), BlurError> {
    let src = random_image([10, 14].into(), 3)?;
    let config = BoxBlurConfig::default().with_seam(SeamPolicy::Continuous);

    let mut reference = Image::from_size_val(src.size(), 0u8)?;
    box_blur_batched(&src, &mut reference, 1, config)?;

    for num_batches in 2..=src.height() {
        let mut dst = Image::from_size_val(src.size(), 0u8)?;
        box_blur_batched(&src, &mut dst, num_batches, config)?;
        assert_eq!(dst, reference, "{num_batches} batches");
    }

    // with a single batch every policy sees the whole image
    assert_eq!(box_blur(&src, 1)?, reference);
    Ok(())
}

#[test]
fn open_above_differs_only_at_batch_tops() -> Result<(), BlurError> {
    let size: ImageSize = [4, 9].into();
    let src = vertical_gradient(size)?;

    let mut isolated = Image::from_size_val(size, 0u8)?;
    box_blur_batched(&src, &mut isolated, 3, BoxBlurConfig::default())?;

    let mut open_above = Image::from_size_val(size, 0u8)?;
    let config = BoxBlurConfig::default().with_seam(SeamPolicy::OpenAbove);
    box_blur_batched(&src, &mut open_above, 3, config)?;

    let mut changed_rows = Vec::new();
    for row in 0..size.height {
        if isolated.row(row)? != open_above.row(row)? {
            changed_rows.push(row);
        }
    }
    assert_eq!(changed_rows, vec![3, 6]);
    Ok(())
}

#[test]
fn too_many_batches_fails() -> Result<(), BlurError> {
    let src = random_image([8, 3].into(), 1)?;
    let err = box_blur(&src, 4).err();
    assert!(err.is_some());
    assert_eq!(
        err.map(|e| e.to_string()),
        Some("cannot split 3 rows into 4 batches, the batch count must be in 1..=3".to_string())
    );
    Ok(())
}
