use glam::Vec3;
use rayon::prelude::*;

use parallax_3d::camera::PinholeIntrinsics;
use parallax_3d::transforms::yaw_translation_matrix;
use parallax_image::{Image, ImageError, ImageSize};
use parallax_imgproc::inpaint::inpaint_diffusion;
use parallax_imgproc::interpolation::{remap, InterpolationMode};

use crate::easing::raised_cosine;
use crate::error::RenderError;
use crate::motion::MotionPlan;

/// Depth below which a transformed point cannot be projected.
///
/// Zero-depth "no surface" pixels land here after the rigid transform and
/// become reprojection holes instead of dividing by zero.
const MIN_PROJECTION_DEPTH: f32 = 1e-6;

/// Relaxation sweeps used to fill reprojection holes.
const INPAINT_ITERATIONS: usize = 64;

/// Tolerance for sampling coordinates that land a rounding error outside the
/// source grid, as the identity warp at t = 0 does on border pixels.
const BOUNDS_EPS: f32 = 1e-3;

/// Synthesize a depth-parallax frame sequence from a single photograph.
///
/// Every frame applies an eased fraction of the planned camera motion to the
/// full per-pixel 3D grid, reprojects it through the pinhole model into an
/// inverse-warp sampling map, resamples the source colors bilinearly and
/// fills the reprojection holes by diffusion. Frames are rendered
/// independently in parallel and returned ordered by index; the output is
/// bit-reproducible for identical inputs.
///
/// # Arguments
///
/// * `image` - The source RGB image.
/// * `depth` - The normalized depth map in `[0, 1]`, same size as `image`.
/// * `intrinsics` - The pinhole camera model.
/// * `motion` - The full-strength camera motion for the clip.
/// * `n_frames` - The number of frames to synthesize, at least 2.
///
/// # Errors
///
/// Fails if fewer than two frames are requested or if the image and depth
/// map sizes do not match.
pub fn synthesize(
    image: &Image<u8, 3>,
    depth: &Image<f32, 1>,
    intrinsics: &PinholeIntrinsics,
    motion: &MotionPlan,
    n_frames: usize,
) -> Result<Vec<Image<u8, 3>>, RenderError> {
    if n_frames < 2 {
        return Err(RenderError::InvalidFrameCount(n_frames));
    }

    if image.size() != depth.size() {
        return Err(RenderError::Image(ImageError::InvalidImageSize(
            image.cols(),
            image.rows(),
            depth.cols(),
            depth.rows(),
        )));
    }

    // a depth map with no surfaces has nothing to reproject; the clip
    // degrades to the unwarped source
    if depth.as_slice().iter().all(|&z| z == 0.0) {
        return Ok(vec![image.clone(); n_frames]);
    }

    let image_f32 = image.cast_and_scale::<f32>(1.0 / 255.0)?;

    // the full homogeneous point grid, zero-depth pixels included; the
    // rendered-hole mask suppresses them per frame
    let cols = depth.cols();
    let points = depth
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, &z)| intrinsics.backproject((i % cols) as f32, (i / cols) as f32, z))
        .collect::<Vec<_>>();

    log::debug!(
        "synthesizing {} frames at {} (dx={:.4}, dy={:.4}, dz={:.4}, yaw={:.3} deg)",
        n_frames,
        image.size(),
        motion.dx,
        motion.dy,
        motion.dz,
        motion.yaw_deg
    );

    (0..n_frames)
        .into_par_iter()
        .map(|i| {
            let t = raised_cosine(i, n_frames);
            render_frame(&image_f32, &points, image.size(), intrinsics, motion, t)
        })
        .collect()
}

/// Render a single frame at motion fraction `t`.
fn render_frame(
    image_f32: &Image<f32, 3>,
    points: &[Vec3],
    size: ImageSize,
    intrinsics: &PinholeIntrinsics,
    motion: &MotionPlan,
    t: f32,
) -> Result<Image<u8, 3>, RenderError> {
    let dx = motion.dx * t;
    let dy = motion.dy * t;
    let dz = 1.0 + motion.dz * t;
    let yaw = motion.yaw_deg.to_radians() * t;

    let transform = yaw_translation_matrix(yaw, dx, dy);

    // reproject the transformed grid into an inverse-warp sampling map
    let mut map_x = Vec::with_capacity(points.len());
    let mut map_y = Vec::with_capacity(points.len());
    let mut mask = Vec::with_capacity(points.len());

    let (cols_f, rows_f) = (size.width as f32, size.height as f32);

    for point in points.iter() {
        let moved = transform.transform_point3(*point);
        let z_scaled = moved.z * dz;

        if z_scaled > MIN_PROJECTION_DEPTH {
            let (u, v) = intrinsics.project(Vec3::new(moved.x, moved.y, z_scaled));
            let in_bounds = u >= -BOUNDS_EPS
                && u <= cols_f - 1.0 + BOUNDS_EPS
                && v >= -BOUNDS_EPS
                && v <= rows_f - 1.0 + BOUNDS_EPS;
            if in_bounds {
                map_x.push(u.clamp(0.0, cols_f - 1.0));
                map_y.push(v.clamp(0.0, rows_f - 1.0));
                mask.push(0);
                continue;
            }
        }

        map_x.push(-1.0);
        map_y.push(-1.0);
        mask.push(1);
    }

    let map_x = Image::<f32, 1>::new(size, map_x)?;
    let map_y = Image::<f32, 1>::new(size, map_y)?;
    let mask = Image::<u8, 1>::new(size, mask)?;

    let mut warped = Image::<f32, 3>::from_size_val(size, 0.0)?;
    remap(image_f32, &mut warped, &map_x, &map_y, InterpolationMode::Bilinear)?;

    // inpainting is a no-op when the reprojection left no holes
    let has_holes = mask.as_slice().iter().any(|&m| m != 0);
    let frame_f32 = if has_holes {
        let mut filled = Image::<f32, 3>::from_size_val(size, 0.0)?;
        inpaint_diffusion(&warped, &mut filled, &mask, INPAINT_ITERATIONS)?;
        filled
    } else {
        warped
    };

    Ok(frame_f32.scale_and_cast::<u8>(255.0)?)
}
