mod bilinear;
mod nearest;

/// utilities to generate sampling grids.
pub mod grid;

mod interpolate;
pub use interpolate::{interpolate_pixel, InterpolationMode};

mod remap;
pub use remap::remap;
