use crate::interpolation::{grid::meshgrid_from_fn, remap, InterpolationMode};
use parallax_image::{Image, ImageError};

/// Resize an image to a new size.
///
/// The function resizes an image to the size of the destination image using
/// the specified interpolation mode.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container, sized to the target resolution.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use parallax_image::{Image, ImageSize};
/// use parallax_imgproc::interpolation::InterpolationMode;
/// use parallax_imgproc::resize::resize_native;
///
/// let image = Image::<_, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0f32; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let new_size = ImageSize {
///     width: 2,
///     height: 3,
/// };
///
/// let mut image_resized = Image::<_, 3>::from_size_val(new_size, 0.0).unwrap();
///
/// resize_native(&image, &mut image_resized, InterpolationMode::Nearest).unwrap();
///
/// assert_eq!(image_resized.num_channels(), 3);
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
pub fn resize_native<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if src.size() == dst.size() {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    // map the destination grid onto the source grid, pinning the corners
    let step_x = if dst.cols() > 1 {
        (src.cols() - 1) as f32 / (dst.cols() - 1) as f32
    } else {
        0.0
    };
    let step_y = if dst.rows() > 1 {
        (src.rows() - 1) as f32 / (dst.rows() - 1) as f32
    } else {
        0.0
    };

    let (map_x, map_y) = meshgrid_from_fn(dst.cols(), dst.rows(), |x, y| {
        Ok((x as f32 * step_x, y as f32 * step_y))
    })?;

    remap(src, dst, &map_x, &map_y, interpolation)
}
