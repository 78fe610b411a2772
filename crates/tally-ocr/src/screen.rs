use image::RgbaImage;
use xcap::Monitor;

use crate::capture::{CaptureError, VideoSource};

/// Primary monitor treated as a video source
pub struct ScreenSource {
    monitor: Monitor,
}

impl ScreenSource {
    pub fn primary() -> Result<Self, CaptureError> {
        let monitors = Monitor::all().map_err(|e| CaptureError::Device(e.to_string()))?;
        let monitor = monitors
            .into_iter()
            .next()
            .ok_or_else(|| CaptureError::Device("No monitor found".to_string()))?;

        Ok(Self { monitor })
    }
}

impl VideoSource for ScreenSource {
    fn describe(&self) -> String {
        format!("monitor {}", self.monitor.name())
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.monitor.width(), self.monitor.height())
    }

    fn grab_frame(&mut self) -> Result<RgbaImage, CaptureError> {
        let image = self
            .monitor
            .capture_image()
            .map_err(|e| CaptureError::Device(format!("Failed to capture screen: {e}")))?;

        let (width, height) = (image.width(), image.height());
        RgbaImage::from_raw(width, height, image.into_raw())
            .ok_or_else(|| CaptureError::Device("screen capture has wrong size".to_string()))
    }
}
