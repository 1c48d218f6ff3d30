use std::io::{BufWriter, Write};
use std::path::Path;

use crate::pointcloud::PointCloud;

/// Error types for the PLY module.
#[derive(Debug, thiserror::Error)]
pub enum PlyError {
    /// Failed to write PLY file
    #[error("Failed to write PLY file")]
    Io(#[from] std::io::Error),
}

/// Color written for point clouds without color data.
const DEFAULT_COLOR: [u8; 3] = [255, 255, 255];

/// Write a point cloud as an ASCII PLY vertex list.
///
/// The format is the interchange flavor used by the external viewers this
/// pipeline feeds: a single `element vertex <N>` header line followed by one
/// `x y z r g b` line per point, coordinates with six decimal places.
///
/// # Arguments
///
/// * `path` - The path to save the PLY file.
/// * `pointcloud` - The point cloud to write.
pub fn write_ply_ascii(path: impl AsRef<Path>, pointcloud: &PointCloud) -> Result<(), PlyError> {
    let file = std::fs::File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "element vertex {}", pointcloud.len())?;

    for (i, point) in pointcloud.points().iter().enumerate() {
        let [r, g, b] = pointcloud
            .colors()
            .map(|colors| colors[i])
            .unwrap_or(DEFAULT_COLOR);
        writeln!(
            writer,
            "{:.6} {:.6} {:.6} {} {} {}",
            point[0], point[1], point[2], r, g, b
        )?;
    }

    writer.flush()?;

    Ok(())
}
