/// An error type for the render module.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Error when fewer than two frames are requested.
    #[error("The frame count must be at least 2, got {0}")]
    InvalidFrameCount(usize),

    /// Error from an underlying image operation.
    #[error(transparent)]
    Image(#[from] parallax_image::ImageError),
}
