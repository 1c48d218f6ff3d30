/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] parallax_image::ImageError),

    /// Error to decode the image.
    #[error("Failed to decode the image. {0}")]
    ImageDecodeError(#[from] image::ImageError),

    /// The image color type is not supported.
    #[error("Unsupported image format")]
    UnsupportedImageFormat,

    /// Error to encode the PNG image.
    #[error("Failed to encode the png image. {0}")]
    PngEncodingError(String),

    /// Error to decode the PNG image.
    #[error("Failed to decode the png image. {0}")]
    PngDecodeError(String),

    /// The ffmpeg executable could not be located.
    #[error("Failed to locate the ffmpeg executable. {0}")]
    FfmpegNotFound(#[from] which::Error),

    /// The ffmpeg process reported a failure.
    #[error("The ffmpeg process failed. {0}")]
    FfmpegFailed(String),

    /// The video writer received an incompatible image.
    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),

    /// The video writer was used before being started.
    #[error("The video writer has not been started")]
    WriterNotStarted,
}
