#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// the depth estimator capability and file-backed implementations.
pub mod estimator;

/// Depth Anything v2 estimator running on candle (feature-gated).
#[cfg(feature = "depth-anything")]
pub mod depth_anything;

#[cfg(feature = "depth-anything")]
pub use crate::depth_anything::DepthAnything;
pub use crate::estimator::{ConstantDepth, DepthError, DepthEstimator, PngDepthEstimator};
