use std::path::{Path, PathBuf};

use parallax_3d::camera::PinholeIntrinsics;
use parallax_3d::io::ply::{write_ply_ascii, PlyError};
use parallax_3d::unproject::unproject_depth;
use parallax_depth::{DepthError, DepthEstimator};
use parallax_image::{Image, ImageError};
use parallax_imgproc::normalize::normalize_min_max;
use parallax_imgproc::saliency::select_target;
use parallax_io::functional::read_image_any_rgb8;
use parallax_io::png::write_image_png_mono8;
use parallax_io::video::{ImageFormat, VideoCodec, VideoWriter};
use parallax_io::IoError;
use parallax_render::motion::plan_motion;
use parallax_render::synth::synthesize;
use parallax_render::RenderError;

/// Read-only configuration shared by every image in a batch.
///
/// Constructed once at batch start and passed by reference to the workers.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Nominal focal length of the pinhole camera in pixels.
    pub focal_length: f32,
    /// Number of frames per synthesized clip.
    pub n_frames: usize,
    /// Frame rate of the written video.
    pub fps: i32,
}

/// The output directories of a batch run.
pub struct OutputDirs {
    /// Depth visualization PNGs.
    pub depth: PathBuf,
    /// Point cloud PLY files.
    pub ply: PathBuf,
    /// Parallax clip videos.
    pub video: PathBuf,
}

impl OutputDirs {
    /// Create the output directory layout under the given root.
    pub fn create(root: &Path) -> std::io::Result<Self> {
        let dirs = Self {
            depth: root.join("depth"),
            ply: root.join("ply"),
            video: root.join("video"),
        };
        std::fs::create_dir_all(&dirs.depth)?;
        std::fs::create_dir_all(&dirs.ply)?;
        std::fs::create_dir_all(&dirs.video)?;
        Ok(dirs)
    }
}

/// Any error that aborts a single image's pipeline.
///
/// Errors never propagate past the image they belong to; the batch driver
/// reports them and continues.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Error reading the image or writing an artifact.
    #[error(transparent)]
    Io(#[from] IoError),

    /// The depth estimate is unavailable or failed.
    #[error(transparent)]
    Depth(#[from] DepthError),

    /// Error from an image operation.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error from the frame synthesizer.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Error writing the point cloud.
    #[error(transparent)]
    Ply(#[from] PlyError),
}

/// Run the full pipeline for a single photograph.
///
/// Reads the image, estimates and normalizes depth, then writes the depth
/// visualization, the colored point cloud and the saliency-driven parallax
/// clip into the output directories.
pub fn process_image(
    path: &Path,
    config: &PipelineConfig,
    dirs: &OutputDirs,
    estimator: &mut dyn DepthEstimator,
) -> Result<(), PipelineError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let image = read_image_any_rgb8(path)?;
    log::info!("processing {} ({})", path.display(), image.size());

    let raw_depth = estimator.estimate(&image)?;
    let mut depth = Image::from_size_val(image.size(), 0.0f32)?;
    normalize_min_max(&raw_depth, &mut depth, 0.0, 1.0)?;

    // depth visualization
    let depth_viz = depth.scale_and_cast::<u8>(255.0)?;
    let depth_path = dirs.depth.join(format!("{stem}_depth.png"));
    write_image_png_mono8(&depth_path, &depth_viz)?;

    // colored point cloud
    let intrinsics = PinholeIntrinsics::from_focal_length(config.focal_length, image.size());
    let cloud = unproject_depth(&image, &depth, &intrinsics)?;
    log::debug!(
        "point cloud with {} points, bounds {} .. {}",
        cloud.len(),
        cloud.get_min_bound(),
        cloud.get_max_bound()
    );
    let ply_path = dirs.ply.join(format!("{stem}.ply"));
    write_ply_ascii(&ply_path, &cloud)?;

    // aim the camera at the salient subject and render the clip
    let target = select_target(&image)?;
    let motion = plan_motion(image.size(), target);
    log::debug!("camera target {:?}, motion {:?}", target, motion);

    let frames = synthesize(&image, &depth, &intrinsics, &motion, config.n_frames)?;

    let video_path = dirs.video.join(format!("{stem}_kenburns.mp4"));
    let mut writer = VideoWriter::new(
        &video_path,
        VideoCodec::H264,
        ImageFormat::Rgb8,
        config.fps,
        image.size(),
    )?;
    writer.start()?;
    for frame in frames.iter() {
        writer.write(frame)?;
    }
    writer.close()?;

    log::info!(
        "wrote {}, {} and {}",
        depth_path.display(),
        ply_path.display(),
        video_path.display()
    );

    Ok(())
}
