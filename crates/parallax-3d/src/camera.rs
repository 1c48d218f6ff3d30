use glam::Vec3;
use parallax_image::ImageSize;

/// A struct representing the intrinsic parameters of a pinhole camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinholeIntrinsics {
    /// The horizontal focal length in pixels.
    pub fx: f32,
    /// The vertical focal length in pixels.
    pub fy: f32,
    /// The horizontal coordinate of the principal point in pixels.
    pub cx: f32,
    /// The vertical coordinate of the principal point in pixels.
    pub cy: f32,
}

impl PinholeIntrinsics {
    /// Create new pinhole intrinsics from the given parameters.
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Create pinhole intrinsics with a nominal focal length and the
    /// principal point at the image center.
    ///
    /// # Arguments
    ///
    /// * `focal_length` - The focal length in pixels, shared by both axes.
    /// * `size` - The image size the camera observes.
    pub fn from_focal_length(focal_length: f32, size: ImageSize) -> Self {
        Self {
            fx: focal_length,
            fy: focal_length,
            cx: size.width as f32 / 2.0,
            cy: size.height as f32 / 2.0,
        }
    }

    /// Back-project a pixel and its depth to a 3D point in camera coordinates.
    ///
    /// # Arguments
    ///
    /// * `u` - The horizontal pixel coordinate.
    /// * `v` - The vertical pixel coordinate.
    /// * `z` - The depth of the pixel.
    pub fn backproject(&self, u: f32, v: f32, z: f32) -> Vec3 {
        Vec3::new((u - self.cx) * z / self.fx, (v - self.cy) * z / self.fy, z)
    }

    /// Project a 3D point in camera coordinates to pixel coordinates.
    ///
    /// PRECONDITION: `point.z` is non-zero.
    pub fn project(&self, point: Vec3) -> (f32, f32) {
        (
            point.x / point.z * self.fx + self.cx,
            point.y / point.z * self.fy + self.cy,
        )
    }
}
