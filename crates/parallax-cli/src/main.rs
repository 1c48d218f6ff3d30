use std::path::{Path, PathBuf};

use clap::Parser;
use rayon::prelude::*;

use parallax_depth::PngDepthEstimator;

mod pipeline;
use pipeline::{process_image, OutputDirs, PipelineConfig};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

#[derive(Parser)]
#[command(
    name = "parallax",
    about = "Turn photographs into depth maps, point clouds and parallax clips",
    version
)]
struct Args {
    /// Directory of input photographs
    #[arg(short, long)]
    input_dir: PathBuf,

    /// Root of the output directory tree
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Directory with precomputed `<stem>_depth.png` depth maps
    #[arg(long)]
    depth_dir: Option<PathBuf>,

    /// Number of frames per clip
    #[arg(long, default_value_t = 48)]
    frames: usize,

    /// Frame rate of the written videos
    #[arg(long, default_value_t = 24)]
    fps: i32,

    /// Nominal focal length in pixels
    #[arg(long, default_value_t = 500.0)]
    focal: f32,

    /// Worker threads for the image pool (0 uses one per core)
    #[arg(long, default_value_t = 0)]
    jobs: usize,
}

fn scan_images(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut images = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect::<Vec<_>>();
    images.sort();
    Ok(images)
}

/// Process the batch with per-image depth map files.
///
/// Every worker owns a private estimator, so the pool shares nothing mutable
/// beyond the read-only configuration.
fn run_with_depth_files(
    images: &[PathBuf],
    depth_dir: &Path,
    config: &PipelineConfig,
    dirs: &OutputDirs,
) -> usize {
    images
        .par_iter()
        .map(|path| {
            let mut estimator = PngDepthEstimator::for_image(depth_dir, path);
            match process_image(path, config, dirs, &mut estimator) {
                Ok(()) => 1,
                Err(e) => {
                    log::warn!("skipping {}: {e}", path.display());
                    0
                }
            }
        })
        .sum()
}

/// Process the batch with the bundled depth model.
///
/// The model holds mutable inference state, so images run through it
/// sequentially.
#[cfg(feature = "depth-anything")]
fn run_with_model(
    images: &[PathBuf],
    config: &PipelineConfig,
    dirs: &OutputDirs,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut estimator = parallax_depth::DepthAnything::new(None, None)?;

    Ok(images
        .iter()
        .map(|path| match process_image(path, config, dirs, &mut estimator) {
            Ok(()) => 1,
            Err(e) => {
                log::warn!("skipping {}: {e}", path.display());
                0
            }
        })
        .sum())
}

#[cfg(not(feature = "depth-anything"))]
fn run_with_model(
    _images: &[PathBuf],
    _config: &PipelineConfig,
    _dirs: &OutputDirs,
) -> Result<usize, Box<dyn std::error::Error>> {
    Err("no depth source: pass --depth-dir or build with the depth-anything feature".into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let config = PipelineConfig {
        focal_length: args.focal,
        n_frames: args.frames,
        fps: args.fps,
    };
    let dirs = OutputDirs::create(&args.output_dir)?;

    let images = scan_images(&args.input_dir)?;
    if images.is_empty() {
        log::warn!("no images found in {}", args.input_dir.display());
        return Ok(());
    }

    if args.jobs > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.jobs)
            .build_global()?;
    }

    let succeeded = match &args.depth_dir {
        Some(depth_dir) => run_with_depth_files(&images, depth_dir, &config, &dirs),
        None => run_with_model(&images, &config, &dirs)?,
    };

    log::info!("processed {}/{} images", succeeded, images.len());

    if succeeded == 0 {
        return Err("no image could be processed".into());
    }

    Ok(())
}
