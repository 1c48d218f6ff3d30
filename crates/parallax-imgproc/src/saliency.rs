use rustfft::{num_complex::Complex, FftPlanner};

use parallax_image::{Image, ImageError, ImageSize};

use crate::color::gray_from_rgb;
use crate::filter::{box_blur, gaussian_blur};
use crate::interpolation::InterpolationMode;
use crate::normalize::{find_min_max, normalize_min_max};
use crate::resize::resize_native;
use crate::threshold::threshold_binary;

/// Working resolution of the spectral residual estimator.
///
/// The residual is computed on a coarse grid and the saliency map is resized
/// back to the source resolution, as in the original formulation.
const WORK_SIZE: usize = 64;

/// Fraction of the saliency maximum used to binarize the map.
const MASK_THRESHOLD: f32 = 0.3;

/// Guard against `ln(0)` on empty spectrum bins.
const LOG_EPS: f32 = 1e-8;

/// Apply a 2D FFT in place, rows first and then columns.
fn fft_2d(data: &mut [Complex<f32>], cols: usize, rows: usize, inverse: bool) {
    let mut planner = FftPlanner::<f32>::new();

    let fft_row = if inverse {
        planner.plan_fft_inverse(cols)
    } else {
        planner.plan_fft_forward(cols)
    };
    for row in data.chunks_exact_mut(cols) {
        fft_row.process(row);
    }

    let fft_col = if inverse {
        planner.plan_fft_inverse(rows)
    } else {
        planner.plan_fft_forward(rows)
    };
    let mut column = vec![Complex::new(0.0, 0.0); rows];
    for c in 0..cols {
        for r in 0..rows {
            column[r] = data[r * cols + c];
        }
        fft_col.process(&mut column);
        for r in 0..rows {
            data[r * cols + c] = column[r];
        }
    }
}

/// Compute a spectral residual saliency map of a grayscale image.
///
/// Implements the Hou & Zhang estimator: the residual of the log amplitude
/// spectrum against its local average is recombined with the original phase
/// and transformed back to the spatial domain, where its squared magnitude
/// highlights the statistically unexpected regions of the image.
///
/// The output is smoothed and min-max normalized to `[0, 1]`.
///
/// # Arguments
///
/// * `src` - The input grayscale image with values in `[0, 1]`.
/// * `dst` - The output saliency map, same size as `src`.
pub fn spectral_residual(src: &Image<f32, 1>, dst: &mut Image<f32, 1>) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let work_size = ImageSize {
        width: WORK_SIZE,
        height: WORK_SIZE,
    };

    let mut work = Image::<f32, 1>::from_size_val(work_size, 0.0)?;
    resize_native(src, &mut work, InterpolationMode::Bilinear)?;

    // forward transform
    let mut spectrum = work
        .as_slice()
        .iter()
        .map(|&x| Complex::new(x, 0.0))
        .collect::<Vec<_>>();
    fft_2d(&mut spectrum, WORK_SIZE, WORK_SIZE, false);

    // split into log amplitude and unit phase
    let mut phase = Vec::with_capacity(spectrum.len());
    let log_amplitude = Image::<f32, 1>::new(
        work_size,
        spectrum
            .iter()
            .map(|c| {
                let amp = c.norm();
                phase.push(if amp > 0.0 {
                    *c / amp
                } else {
                    Complex::new(1.0, 0.0)
                });
                (amp + LOG_EPS).ln()
            })
            .collect(),
    )?;

    // the residual is the log spectrum minus its local average
    let mut smoothed = Image::<f32, 1>::from_size_val(work_size, 0.0)?;
    box_blur(&log_amplitude, &mut smoothed, (3, 3))?;

    // recombine with the phase and return to the spatial domain
    for (i, bin) in spectrum.iter_mut().enumerate() {
        let residual = log_amplitude.as_slice()[i] - smoothed.as_slice()[i];
        *bin = phase[i] * residual.exp();
    }
    fft_2d(&mut spectrum, WORK_SIZE, WORK_SIZE, true);

    let raw = Image::<f32, 1>::new(
        work_size,
        spectrum.iter().map(|c| c.norm_sqr()).collect(),
    )?;

    let mut blurred = Image::<f32, 1>::from_size_val(work_size, 0.0)?;
    gaussian_blur(&raw, &mut blurred, (9, 9), (2.5, 2.5))?;

    let mut normalized = Image::<f32, 1>::from_size_val(work_size, 0.0)?;
    normalize_min_max(&blurred, &mut normalized, 0.0, 1.0)?;

    resize_native(&normalized, dst, InterpolationMode::Bilinear)
}

/// Select the pixel the synthetic camera should aim at.
///
/// Thresholds the spectral residual saliency map at 30% of its maximum and
/// returns the centroid of the resulting mask. Images without any salient
/// response fall back to the exact image center, so the caller always
/// receives a usable target.
///
/// # Arguments
///
/// * `image` - The input RGB image.
///
/// # Returns
///
/// The target pixel as integer `(u, v)` coordinates.
pub fn select_target(image: &Image<u8, 3>) -> Result<(usize, usize), ImageError> {
    let center = (image.width() / 2, image.height() / 2);

    let image_f32 = image.cast_and_scale::<f32>(1.0 / 255.0)?;
    let mut gray = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;
    gray_from_rgb(&image_f32, &mut gray)?;

    // a structureless image has no salient region by definition
    let (gray_min, gray_max) = find_min_max(&gray)?;
    if gray_max - gray_min <= f32::EPSILON {
        return Ok(center);
    }

    let mut saliency = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;
    spectral_residual(&gray, &mut saliency)?;

    let (_, max) = find_min_max(&saliency)?;
    if max <= 0.0 {
        return Ok(center);
    }

    let mut mask = Image::<f32, 1>::from_size_val(image.size(), 0.0)?;
    threshold_binary(&saliency, &mut mask, MASK_THRESHOLD * max, 1.0)?;

    // center of mass of the binary mask
    let cols = mask.cols();
    let (mut m00, mut m10, mut m01) = (0.0f64, 0.0f64, 0.0f64);
    for (i, &m) in mask.as_slice().iter().enumerate() {
        if m > 0.0 {
            m00 += 1.0;
            m10 += (i % cols) as f64;
            m01 += (i / cols) as f64;
        }
    }

    if m00 == 0.0 {
        return Ok(center);
    }

    Ok(((m10 / m00) as usize, (m01 / m00) as usize))
}

#[cfg(test)]
mod tests {
    use parallax_image::{Image, ImageError, ImageSize};

    #[test]
    fn spectral_residual_range() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 32,
            height: 24,
        };
        let image = Image::<f32, 1>::new(
            size,
            (0..size.width * size.height)
                .map(|i| if i % 17 == 0 { 1.0 } else { (i % 7) as f32 / 7.0 })
                .collect(),
        )?;

        let mut saliency = Image::<f32, 1>::from_size_val(size, 0.0)?;
        super::spectral_residual(&image, &mut saliency)?;

        assert_eq!(saliency.size(), size);
        for &x in saliency.as_slice() {
            assert!(x.is_finite());
            assert!((0.0..=1.0).contains(&x));
        }

        Ok(())
    }

    #[test]
    fn select_target_uniform_falls_back_to_center() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 32,
                height: 20,
            },
            128,
        )?;

        let target = super::select_target(&image)?;
        assert_eq!(target, (16, 10));

        Ok(())
    }

    #[test]
    fn select_target_prefers_structure() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 32,
            height: 32,
        };
        let mut data = vec![0u8; size.width * size.height * 3];
        // bright block in the top-left quadrant
        for v in 4..12 {
            for u in 4..12 {
                for c in 0..3 {
                    data[(v * size.width + u) * 3 + c] = 255;
                }
            }
        }
        let image = Image::<u8, 3>::new(size, data)?;

        let target = super::select_target(&image)?;
        assert!(target.0 < size.width);
        assert!(target.1 < size.height);
        assert_ne!(target, (size.width / 2, size.height / 2));

        Ok(())
    }
}
