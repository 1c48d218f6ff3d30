use std::path::{Path, PathBuf};

use parallax_image::{Image, ImageError};
use parallax_imgproc::interpolation::InterpolationMode;
use parallax_imgproc::resize::resize_native;
use parallax_io::png::{read_image_png_mono16, read_image_png_mono8};
use parallax_io::IoError;

/// An error type for the depth estimation module.
#[derive(thiserror::Error, Debug)]
pub enum DepthError {
    /// No depth map is available for the image.
    #[error("No depth map is available for this image: {0}")]
    DepthUnavailable(PathBuf),

    /// Error from reading a depth map file.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Error from an underlying image operation.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The depth model failed.
    #[cfg(feature = "depth-anything")]
    #[error("The depth model failed. {0}")]
    Model(#[from] candle_core::Error),

    /// The model weights could not be fetched.
    #[cfg(feature = "depth-anything")]
    #[error("Failed to fetch the model weights. {0}")]
    ModelFetch(#[from] hf_hub::api::sync::ApiError),
}

/// Produce a raw depth map from an RGB image.
///
/// Implementations may run a model, read precomputed files or return fixed
/// fields; the pipeline only relies on the output matching the input
/// resolution and being normalizable downstream. A failing estimate skips
/// the image, it never aborts a batch.
pub trait DepthEstimator {
    /// Estimate a same-resolution raw depth map for the image.
    fn estimate(&mut self, image: &Image<u8, 3>) -> Result<Image<f32, 1>, DepthError>;
}

/// A depth estimator that reads precomputed depth maps from PNG side files.
///
/// Accepts 8 or 16 bit grayscale files; maps with a different resolution
/// than the photograph are resized bilinearly.
pub struct PngDepthEstimator {
    path: PathBuf,
}

impl PngDepthEstimator {
    /// Create an estimator reading the given depth map file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_owned(),
        }
    }

    /// Create an estimator for the depth map stored alongside an image.
    ///
    /// The depth map is looked up as `<depth_dir>/<stem>_depth.png`.
    pub fn for_image(depth_dir: impl AsRef<Path>, image_path: impl AsRef<Path>) -> Self {
        let stem = image_path
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path: depth_dir.as_ref().join(format!("{stem}_depth.png")),
        }
    }
}

impl DepthEstimator for PngDepthEstimator {
    fn estimate(&mut self, image: &Image<u8, 3>) -> Result<Image<f32, 1>, DepthError> {
        if !self.path.exists() {
            return Err(DepthError::DepthUnavailable(self.path.clone()));
        }

        let raw: Image<f32, 1> = match read_image_png_mono16(&self.path) {
            Ok(depth) => depth.cast()?,
            Err(_) => read_image_png_mono8(&self.path)?.cast()?,
        };

        if raw.size() == image.size() {
            return Ok(raw);
        }

        log::debug!(
            "resizing depth map {} from {} to {}",
            self.path.display(),
            raw.size(),
            image.size()
        );

        let mut resized = Image::from_size_val(image.size(), 0.0)?;
        resize_native(&raw, &mut resized, InterpolationMode::Bilinear)?;

        Ok(resized)
    }
}

/// A depth estimator returning a fixed depth field.
///
/// Decouples pipeline tests from any model runtime.
pub struct ConstantDepth(pub f32);

impl DepthEstimator for ConstantDepth {
    fn estimate(&mut self, image: &Image<u8, 3>) -> Result<Image<f32, 1>, DepthError> {
        Ok(Image::from_size_val(image.size(), self.0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parallax_image::ImageSize;
    use parallax_io::png::write_image_png_mono8;

    #[test]
    fn constant_depth_matches_image_size() -> Result<(), DepthError> {
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 5,
                height: 4,
            },
            0,
        )?;

        let depth = ConstantDepth(0.5).estimate(&image)?;

        assert_eq!(depth.size(), image.size());
        assert!(depth.as_slice().iter().all(|&z| z == 0.5));

        Ok(())
    }

    #[test]
    fn png_estimator_reads_side_file() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let size = ImageSize {
            width: 3,
            height: 2,
        };

        let depth_u8 = Image::<u8, 1>::new(size, vec![0, 50, 100, 150, 200, 250])?;
        write_image_png_mono8(tmp_dir.path().join("photo_depth.png"), &depth_u8)?;

        let image = Image::<u8, 3>::from_size_val(size, 0)?;
        let mut estimator = PngDepthEstimator::for_image(tmp_dir.path(), "photo.jpg");

        let depth = estimator.estimate(&image)?;
        assert_eq!(depth.size(), size);
        assert_eq!(depth.as_slice()[5], 250.0);

        Ok(())
    }

    #[test]
    fn png_estimator_resizes_to_image() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;

        let depth_u8 = Image::<u8, 1>::from_size_val(
            ImageSize {
                width: 4,
                height: 4,
            },
            128,
        )?;
        let depth_path = tmp_dir.path().join("photo_depth.png");
        write_image_png_mono8(&depth_path, &depth_u8)?;

        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 8,
                height: 6,
            },
            0,
        )?;

        let depth = PngDepthEstimator::new(&depth_path).estimate(&image)?;
        assert_eq!(depth.size(), image.size());
        assert!(depth.as_slice().iter().all(|&z| (z - 128.0).abs() < 1e-3));

        Ok(())
    }

    #[test]
    fn png_estimator_missing_file() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let image = Image::<u8, 3>::from_size_val(
            ImageSize {
                width: 2,
                height: 2,
            },
            0,
        )?;

        let mut estimator = PngDepthEstimator::for_image(tmp_dir.path(), "missing.png");
        let result = estimator.estimate(&image);

        assert!(matches!(result, Err(DepthError::DepthUnavailable(_))));

        Ok(())
    }
}
