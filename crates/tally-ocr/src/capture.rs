use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use tally_types::ImageBlob;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("{0} capture is not available in this build")]
    Unavailable(String),

    #[error("Device error: {0}")]
    Device(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Frame grabber stopped")]
    Stopped,
}

/// Anything that can hand out the frame it is currently showing
pub trait VideoSource {
    /// Human readable name for logs
    fn describe(&self) -> String;

    /// Current pixel size, `(0, 0)` when the source is not streaming
    fn dimensions(&self) -> (u32, u32);

    fn grab_frame(&mut self) -> Result<RgbaImage, CaptureError>;
}

/// Turns the current frame of a video source into a PNG blob
pub struct FrameCapturer;

impl FrameCapturer {
    pub fn capture(source: &mut dyn VideoSource) -> Result<ImageBlob, CaptureError> {
        let (width, height) = source.dimensions();
        if width == 0 || height == 0 {
            tracing::warn!("{} has no pixels, capturing an empty frame", source.describe());
            return Ok(ImageBlob::empty());
        }

        let frame = source.grab_frame()?;
        let start = std::time::Instant::now();
        let data = encode_png(&frame)?;
        tracing::debug!(
            "encoded {}x{} frame to {} bytes in {:?}",
            frame.width(),
            frame.height(),
            data.len(),
            start.elapsed()
        );

        Ok(ImageBlob::png(data, frame.width(), frame.height()))
    }
}

pub(crate) fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, CaptureError> {
    let mut buffer = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buffer).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(buffer)
}
