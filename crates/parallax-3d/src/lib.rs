#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// pinhole camera intrinsics and projection.
pub mod camera;

/// point cloud file formats.
pub mod io;

/// point cloud container.
pub mod pointcloud;

/// rigid transformation helpers.
pub mod transforms;

/// depth map to point cloud unprojection.
pub mod unproject;
