use image::{DynamicImage, RgbImage, RgbaImage};
use nokhwa::Camera;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use tally_config::camera::{CameraConfig, Facing};

use crate::capture::{CaptureError, VideoSource};

/// Live camera opened at the resolution closest to the configured ideal
pub struct CameraSource {
    camera: Camera,
    index: u32,
}

impl CameraSource {
    pub fn open(config: &CameraConfig) -> Result<Self, CaptureError> {
        let index = preferred_index(config);
        let ideal = CameraFormat::new(
            Resolution::new(config.ideal_width, config.ideal_height),
            FrameFormat::MJPEG,
            30,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(ideal));

        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .map_err(|e| CaptureError::Device(e.to_string()))?;
        camera
            .open_stream()
            .map_err(|e| CaptureError::Device(e.to_string()))?;

        let resolution = camera.resolution();
        tracing::info!(
            "camera {} streaming at {}x{} (asked for {}x{})",
            index,
            resolution.width(),
            resolution.height(),
            config.ideal_width,
            config.ideal_height
        );

        Ok(Self { camera, index })
    }
}

/// Camera backends do not report which way a device points, so a user facing
/// request falls back to the first device and the rear camera to the
/// configured index.
fn preferred_index(config: &CameraConfig) -> u32 {
    match config.facing {
        Facing::Environment => config.index,
        Facing::User => 0,
    }
}

impl VideoSource for CameraSource {
    fn describe(&self) -> String {
        format!("camera {}", self.index)
    }

    fn dimensions(&self) -> (u32, u32) {
        if !self.camera.is_stream_open() {
            return (0, 0);
        }
        let resolution = self.camera.resolution();
        (resolution.width(), resolution.height())
    }

    fn grab_frame(&mut self) -> Result<RgbaImage, CaptureError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| CaptureError::Device(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CaptureError::Device(e.to_string()))?;

        let (width, height) = (decoded.width(), decoded.height());
        let rgb = RgbImage::from_raw(width, height, decoded.into_raw())
            .ok_or_else(|| CaptureError::Device("camera frame has wrong size".to_string()))?;
        Ok(DynamicImage::ImageRgb8(rgb).to_rgba8())
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        let _ = self.camera.stop_stream();
    }
}
