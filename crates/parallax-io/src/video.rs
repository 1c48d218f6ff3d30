use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use parallax_image::{Image, ImageSize};

use crate::error::IoError;

/// The codec to use for the video writer.
pub enum VideoCodec {
    /// H.264 codec.
    H264,
}

/// The format of the image to write to the video file.
pub enum ImageFormat {
    /// 8-bit RGB format.
    Rgb8,
    /// 8-bit mono format.
    Mono8,
}

/// A struct for writing video files.
///
/// Frames are piped as raw video into an ffmpeg child process, which muxes
/// them into an mp4 container at a constant frame rate.
pub struct VideoWriter {
    ffmpeg: PathBuf,
    path: PathBuf,
    codec: &'static str,
    format: ImageFormat,
    fps: i32,
    size: ImageSize,
    child: Option<Child>,
    counter: u64,
}

impl VideoWriter {
    /// Create a new VideoWriter.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to save the video file.
    /// * `codec` - The codec to use for the video writer.
    /// * `format` - The expected image format.
    /// * `fps` - The frames per second of the video.
    /// * `size` - The size of the video.
    ///
    /// # Errors
    ///
    /// Fails if no ffmpeg executable can be located on the PATH.
    pub fn new(
        path: impl AsRef<Path>,
        codec: VideoCodec,
        format: ImageFormat,
        fps: i32,
        size: ImageSize,
    ) -> Result<Self, IoError> {
        let ffmpeg = which::which("ffmpeg")?;

        let codec = match codec {
            VideoCodec::H264 => "libx264",
        };

        Ok(Self {
            ffmpeg,
            path: path.as_ref().to_owned(),
            codec,
            format,
            fps,
            size,
            child: None,
            counter: 0,
        })
    }

    /// Start the video writer.
    ///
    /// Spawns the encoder process with its input connected to a pipe.
    pub fn start(&mut self) -> Result<(), IoError> {
        let pixel_format = match self.format {
            ImageFormat::Mono8 => "gray",
            ImageFormat::Rgb8 => "rgb24",
        };

        let child = Command::new(&self.ffmpeg)
            .args(["-hide_banner", "-loglevel", "error", "-y"])
            .args(["-f", "rawvideo"])
            .args(["-pixel_format", pixel_format])
            .args([
                "-video_size",
                &format!("{}x{}", self.size.width, self.size.height),
            ])
            .args(["-framerate", &self.fps.to_string()])
            .args(["-i", "-"])
            .args(["-c:v", self.codec])
            .args(["-pix_fmt", "yuv420p"])
            .arg(&self.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        self.child = Some(child);

        Ok(())
    }

    /// Write an image to the video file.
    ///
    /// # Arguments
    ///
    /// * `img` - The image to write to the video file.
    pub fn write<const C: usize>(&mut self, img: &Image<u8, C>) -> Result<(), IoError> {
        // check if the image channels are correct
        match self.format {
            ImageFormat::Mono8 => {
                if C != 1 {
                    return Err(IoError::InvalidImageFormat(format!(
                        "Invalid number of channels: expected 1, got {C}"
                    )));
                }
            }
            ImageFormat::Rgb8 => {
                if C != 3 {
                    return Err(IoError::InvalidImageFormat(format!(
                        "Invalid number of channels: expected 3, got {C}"
                    )));
                }
            }
        }

        if img.size() != self.size {
            return Err(IoError::InvalidImageFormat(format!(
                "Invalid frame size: expected {}, got {}",
                self.size,
                img.size()
            )));
        }

        let child = self.child.as_mut().ok_or(IoError::WriterNotStarted)?;
        let stdin = child.stdin.as_mut().ok_or(IoError::WriterNotStarted)?;

        stdin.write_all(img.as_slice())?;
        self.counter += 1;

        Ok(())
    }

    /// Close the video writer.
    ///
    /// Closes the input pipe and waits for the encoder to finish the file.
    pub fn close(&mut self) -> Result<(), IoError> {
        if let Some(mut child) = self.child.take() {
            // closing stdin signals end of stream
            drop(child.stdin.take());

            let output = child.wait_with_output()?;
            if !output.status.success() {
                return Err(IoError::FfmpegFailed(
                    String::from_utf8_lossy(&output.stderr).trim().to_string(),
                ));
            }

            log::debug!(
                "wrote {} frames to {}",
                self.counter,
                self.path.display()
            );
        }

        Ok(())
    }
}

impl Drop for VideoWriter {
    fn drop(&mut self) {
        if self.child.is_some() {
            if let Err(e) = self.close() {
                log::error!("failed to close the video writer: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageFormat, VideoCodec, VideoWriter};
    use parallax_image::{Image, ImageSize};

    #[test]
    fn video_writer_rejects_wrong_channels() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("test.mp4");

        let size = ImageSize {
            width: 6,
            height: 4,
        };

        let Ok(mut writer) =
            VideoWriter::new(&file_path, VideoCodec::H264, ImageFormat::Rgb8, 24, size)
        else {
            // no ffmpeg on this machine
            return Ok(());
        };

        let img = Image::<u8, 1>::new(size, vec![0; size.width * size.height])?;
        assert!(writer.write(&img).is_err());

        Ok(())
    }

    #[ignore = "needs ffmpeg in CI"]
    #[test]
    fn video_writer_rgb8u() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("test.mp4");

        let size = ImageSize {
            width: 6,
            height: 4,
        };

        let mut writer =
            VideoWriter::new(&file_path, VideoCodec::H264, ImageFormat::Rgb8, 24, size)?;
        writer.start()?;

        let img = Image::<u8, 3>::new(size, vec![0; size.width * size.height * 3])?;
        writer.write(&img)?;
        writer.close()?;

        assert!(file_path.exists(), "File does not exist: {file_path:?}");

        Ok(())
    }
}
