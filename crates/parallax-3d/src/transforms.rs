use glam::{Mat4, Vec3};

/// Compute the rigid transform for a yaw rotation combined with a translation.
///
/// The rotation is about the vertical (Y) axis through the camera and the
/// translation moves the camera in the image plane.
///
/// # Arguments
///
/// * `yaw` - The rotation angle in radians.
/// * `dx` - The horizontal translation in world units.
/// * `dy` - The vertical translation in world units.
///
/// # Returns
///
/// The 4x4 transformation matrix.
///
/// Example:
///
/// ```
/// use parallax_3d::transforms::yaw_translation_matrix;
///
/// let transform = yaw_translation_matrix(0.0, 0.0, 0.0);
/// assert_eq!(transform, glam::Mat4::IDENTITY);
/// ```
pub fn yaw_translation_matrix(yaw: f32, dx: f32, dy: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(dx, dy, 0.0)) * Mat4::from_rotation_y(yaw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_yaw_translation_identity() {
        let transform = yaw_translation_matrix(0.0, 0.0, 0.0);
        assert_eq!(transform, Mat4::IDENTITY);
    }

    #[test]
    fn test_yaw_translation_quarter_turn() {
        let transform = yaw_translation_matrix(std::f32::consts::FRAC_PI_2, 0.1, -0.2);

        let point = transform.transform_point3(Vec3::new(0.0, 0.0, 1.0));

        assert_relative_eq!(point.x, 1.1, epsilon = 1e-6);
        assert_relative_eq!(point.y, -0.2, epsilon = 1e-6);
        assert_relative_eq!(point.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_translation_only() {
        let transform = yaw_translation_matrix(0.0, 0.05, 0.02);

        let point = transform.transform_point3(Vec3::new(1.0, 2.0, 3.0));

        assert_relative_eq!(point.x, 1.05, epsilon = 1e-6);
        assert_relative_eq!(point.y, 2.02, epsilon = 1e-6);
        assert_relative_eq!(point.z, 3.0, epsilon = 1e-6);
    }
}
