use parallax_image::{Image, ImageError};
use rayon::prelude::*;

/// Apply a separable filter to an image.
///
/// The filter runs a horizontal 1D convolution followed by a vertical one,
/// replicating the border pixels.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal convolution kernel.
/// * `kernel_y` - The vertical convolution kernel.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
/// PRECONDITION: the kernels are non-empty.
pub fn separable_filter<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (rows, cols) = (src.rows(), src.cols());
    let half_x = (kernel_x.len() / 2) as isize;
    let half_y = (kernel_y.len() / 2) as isize;

    // horizontal pass into a temporary buffer
    let mut tmp = Image::<f32, C>::from_size_val(src.size(), 0.0)?;
    let src_data = src.as_slice();

    tmp.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .enumerate()
        .for_each(|(r, tmp_row)| {
            for c in 0..cols {
                for ch in 0..C {
                    let mut acc = 0.0;
                    for (i, &k) in kernel_x.iter().enumerate() {
                        let cc = (c as isize + i as isize - half_x).clamp(0, cols as isize - 1);
                        acc += k * src_data[(r * cols + cc as usize) * C + ch];
                    }
                    tmp_row[c * C + ch] = acc;
                }
            }
        });

    // vertical pass into the destination
    let tmp_data = tmp.as_slice();

    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .enumerate()
        .for_each(|(r, dst_row)| {
            for c in 0..cols {
                for ch in 0..C {
                    let mut acc = 0.0;
                    for (i, &k) in kernel_y.iter().enumerate() {
                        let rr = (r as isize + i as isize - half_y).clamp(0, rows as isize - 1);
                        acc += k * tmp_data[(rr as usize * cols + c) * C + ch];
                    }
                    dst_row[c * C + ch] = acc;
                }
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use parallax_image::{Image, ImageError, ImageSize};

    #[test]
    fn separable_filter_identity() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
        )?;

        let mut filtered = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;

        super::separable_filter(&image, &mut filtered, &[1.0], &[1.0])?;

        assert_eq!(filtered.as_slice(), image.as_slice());

        Ok(())
    }

    #[test]
    fn separable_filter_box_preserves_flat_field() -> Result<(), ImageError> {
        let image = Image::<f32, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            2.0,
        )?;

        let mut filtered = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;

        let kernel = super::super::kernels::box_blur_kernel_1d(3);
        super::separable_filter(&image, &mut filtered, &kernel, &kernel)?;

        // border replication keeps a flat field flat
        for &x in filtered.as_slice() {
            assert!((x - 2.0).abs() < 1e-5);
        }

        Ok(())
    }
}
