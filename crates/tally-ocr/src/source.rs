use std::path::PathBuf;

use image::RgbaImage;
use tally_config::camera::{CameraConfig, SourceKind};

use crate::capture::{CaptureError, VideoSource};

/// Image file on disk, re-read on every grab
pub struct StillImageSource {
    path: PathBuf,
}

impl StillImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VideoSource for StillImageSource {
    fn describe(&self) -> String {
        format!("image file {}", self.path.display())
    }

    fn dimensions(&self) -> (u32, u32) {
        match image::image_dimensions(&self.path) {
            Ok(size) => size,
            Err(e) => {
                tracing::warn!("cannot read {}: {}", self.path.display(), e);
                (0, 0)
            }
        }
    }

    fn grab_frame(&mut self) -> Result<RgbaImage, CaptureError> {
        Ok(image::open(&self.path)?.to_rgba8())
    }
}

/// Fixed in-memory frame
pub struct StaticFrame {
    frame: RgbaImage,
}

impl StaticFrame {
    pub fn new(frame: RgbaImage) -> Self {
        Self { frame }
    }
}

impl VideoSource for StaticFrame {
    fn describe(&self) -> String {
        format!("static {}x{} frame", self.frame.width(), self.frame.height())
    }

    fn dimensions(&self) -> (u32, u32) {
        self.frame.dimensions()
    }

    fn grab_frame(&mut self) -> Result<RgbaImage, CaptureError> {
        Ok(self.frame.clone())
    }
}

/// Open the source named by the configuration.
///
/// Sources that are not compiled into this build fail with
/// [`CaptureError::Unavailable`].
pub fn open_source(config: &CameraConfig) -> Result<Box<dyn VideoSource>, CaptureError> {
    match &config.source {
        SourceKind::File(path) => Ok(Box::new(StillImageSource::new(path))),
        SourceKind::Camera => open_camera(config),
        SourceKind::Screen => open_screen(),
    }
}

#[cfg(feature = "camera")]
fn open_camera(config: &CameraConfig) -> Result<Box<dyn VideoSource>, CaptureError> {
    Ok(Box::new(crate::camera::CameraSource::open(config)?))
}

#[cfg(not(feature = "camera"))]
fn open_camera(_config: &CameraConfig) -> Result<Box<dyn VideoSource>, CaptureError> {
    Err(CaptureError::Unavailable("camera".to_string()))
}

#[cfg(windows)]
fn open_screen() -> Result<Box<dyn VideoSource>, CaptureError> {
    Ok(Box::new(crate::screen::ScreenSource::primary()?))
}

#[cfg(not(windows))]
fn open_screen() -> Result<Box<dyn VideoSource>, CaptureError> {
    Err(CaptureError::Unavailable("screen".to_string()))
}
