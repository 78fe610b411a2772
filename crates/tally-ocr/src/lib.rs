mod adapter;
#[cfg(feature = "camera")]
mod camera;
mod capture;
#[cfg(windows)]
mod com;
mod engine;
mod grabber;
mod output;
#[cfg(windows)]
mod screen;
mod source;
mod tesseract;
#[cfg(windows)]
mod windows_ocr;

pub use adapter::OcrAdapter;
#[cfg(feature = "camera")]
pub use camera::CameraSource;
pub use capture::{CaptureError, FrameCapturer, VideoSource};
#[cfg(windows)]
pub use com::ComGuard;
pub use engine::{EngineFactory, OcrEngine, OcrError, factory_for};
pub use grabber::FrameGrabber;
pub use output::OcrOutput;
#[cfg(windows)]
pub use screen::ScreenSource;
pub use source::{StaticFrame, StillImageSource, open_source};
pub use tesseract::{TesseractEngine, TesseractFactory};
#[cfg(windows)]
pub use windows_ocr::{WindowsOcrEngine, WindowsOcrFactory};
