#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// easing curves for motion interpolation.
pub mod easing;

/// Error types for the render module.
pub mod error;

/// camera motion planning from a 2D target.
pub mod motion;

/// depth-parallax frame synthesis.
pub mod synth;

pub use crate::error::RenderError;
