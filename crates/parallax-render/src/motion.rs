use parallax_image::ImageSize;

/// Maximum camera translation in world units.
///
/// Caps the total camera excursion regardless of how far off-center the
/// target is, which bounds the warp magnitude of the synthesized frames.
pub const MAX_TRANSLATION: f32 = 0.05;

/// Constant zoom offset applied to every clip.
pub const ZOOM_OFFSET: f32 = 0.05;

/// Yaw angle in degrees per unit of normalized horizontal offset.
pub const YAW_GAIN: f32 = 1.5;

/// The full-strength rigid motion the synthetic camera travels toward over
/// the whole clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionPlan {
    /// Horizontal translation in world units.
    pub dx: f32,
    /// Vertical translation in world units.
    pub dy: f32,
    /// Zoom offset, applied as a multiplicative depth scale.
    pub dz: f32,
    /// Rotation about the vertical axis in degrees.
    pub yaw_deg: f32,
}

/// Plan the camera motion toward a target pixel.
///
/// The target's offset from the image center is normalized to `[-0.5, 0.5]`
/// per axis and scaled by [`MAX_TRANSLATION`]; the camera pans toward the
/// subject, yaws slightly in the same direction and always pushes in by the
/// fixed [`ZOOM_OFFSET`].
///
/// # Arguments
///
/// * `size` - The size of the source image.
/// * `target` - The pixel the camera should aim at.
pub fn plan_motion(size: ImageSize, target: (usize, usize)) -> MotionPlan {
    let (width, height) = (size.width as f32, size.height as f32);
    let (cx, cy) = (width / 2.0, height / 2.0);
    let (tx, ty) = (target.0 as f32, target.1 as f32);

    let off_x = (cx - tx) / width;
    let off_y = (cy - ty) / height;

    MotionPlan {
        dx: MAX_TRANSLATION * off_x,
        dy: MAX_TRANSLATION * off_y,
        dz: ZOOM_OFFSET,
        yaw_deg: YAW_GAIN * off_x,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: ImageSize = ImageSize {
        width: 640,
        height: 480,
    };

    #[test]
    fn centered_target_plans_pure_zoom() {
        let plan = plan_motion(SIZE, (320, 240));

        assert_eq!(plan.dx, 0.0);
        assert_eq!(plan.dy, 0.0);
        assert_eq!(plan.dz, ZOOM_OFFSET);
        assert_eq!(plan.yaw_deg, 0.0);
    }

    #[test]
    fn translation_is_bounded() {
        for target in [(0, 0), (639, 479), (0, 479), (639, 0)] {
            let plan = plan_motion(SIZE, target);
            assert!(plan.dx.abs() <= MAX_TRANSLATION);
            assert!(plan.dy.abs() <= MAX_TRANSLATION);
            assert_eq!(plan.dz, ZOOM_OFFSET);
        }
    }

    #[test]
    fn yaw_follows_horizontal_offset() {
        // a subject left of center pans and yaws to the right
        let left = plan_motion(SIZE, (100, 240));
        assert!(left.dx > 0.0);
        assert!(left.yaw_deg > 0.0);

        let right = plan_motion(SIZE, (540, 240));
        assert!(right.dx < 0.0);
        assert!(right.yaw_deg < 0.0);
    }
}
