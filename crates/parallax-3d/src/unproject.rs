use parallax_image::{Image, ImageError};

use crate::camera::PinholeIntrinsics;
use crate::pointcloud::PointCloud;

/// Iterate over the colored 3D points of a depth map in raster order.
///
/// Pixels with a depth of exactly zero carry no surface and are skipped, so
/// the sequence holds at most `width * height` points. The iterator is lazy
/// and can be restarted by calling the function again.
///
/// PRECONDITION: `image` and `depth` have the same size.
///
/// # Arguments
///
/// * `image` - The RGB image providing the point colors.
/// * `depth` - The normalized depth map in `[0, 1]`.
/// * `intrinsics` - The pinhole camera model used for back-projection.
pub fn depth_points<'a>(
    image: &'a Image<u8, 3>,
    depth: &'a Image<f32, 1>,
    intrinsics: &'a PinholeIntrinsics,
) -> impl Iterator<Item = ([f32; 3], [u8; 3])> + 'a {
    let cols = depth.cols();
    let colors = image.as_slice();

    depth
        .as_slice()
        .iter()
        .enumerate()
        .filter(|(_, &z)| z != 0.0)
        .map(move |(i, &z)| {
            let (v, u) = (i / cols, i % cols);
            let point = intrinsics.backproject(u as f32, v as f32, z);
            let color = [colors[i * 3], colors[i * 3 + 1], colors[i * 3 + 2]];
            ([point.x, point.y, point.z], color)
        })
}

/// Lift an RGB image and its normalized depth map into a colored point cloud.
///
/// # Arguments
///
/// * `image` - The RGB image providing the point colors.
/// * `depth` - The normalized depth map in `[0, 1]`.
/// * `intrinsics` - The pinhole camera model used for back-projection.
///
/// # Errors
///
/// If the image and depth map sizes do not match, an error is returned.
pub fn unproject_depth(
    image: &Image<u8, 3>,
    depth: &Image<f32, 1>,
    intrinsics: &PinholeIntrinsics,
) -> Result<PointCloud, ImageError> {
    if image.size() != depth.size() {
        return Err(ImageError::InvalidImageSize(
            image.cols(),
            image.rows(),
            depth.cols(),
            depth.rows(),
        ));
    }

    let mut points = Vec::with_capacity(depth.as_slice().len());
    let mut colors = Vec::with_capacity(depth.as_slice().len());

    for (point, color) in depth_points(image, depth, intrinsics) {
        points.push(point);
        colors.push(color);
    }

    Ok(PointCloud::new(points, Some(colors)))
}
