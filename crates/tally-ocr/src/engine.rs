use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tally_config::ocr::{OcrConfig, OcrEngineKind};
use tally_types::ImageBlob;

use crate::output::OcrOutput;

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine '{0}' is not available: {1}")]
    Unavailable(String, String),

    #[error("OCR engine failed: {0}")]
    Engine(String),

    #[error("OCR timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text recognition backend, one instance per recognition request
#[async_trait]
pub trait OcrEngine: Send {
    fn name(&self) -> &str;

    async fn recognize(&mut self, image: &ImageBlob) -> Result<OcrOutput, OcrError>;

    /// Release whatever the engine holds on to
    async fn terminate(&mut self) {}
}

/// Builds engines for a language
pub trait EngineFactory: Send + Sync {
    fn create(&self, language: &str) -> Result<Box<dyn OcrEngine>, OcrError>;
}

/// Engine factory for the configured engine kind
pub fn factory_for(config: &OcrConfig) -> Result<Arc<dyn EngineFactory>, OcrError> {
    match config.engine {
        OcrEngineKind::Tesseract => Ok(Arc::new(crate::tesseract::TesseractFactory::new(
            config.tesseract_path.clone(),
        ))),
        OcrEngineKind::Windows => windows_factory(),
    }
}

#[cfg(windows)]
fn windows_factory() -> Result<Arc<dyn EngineFactory>, OcrError> {
    Ok(Arc::new(crate::windows_ocr::WindowsOcrFactory))
}

#[cfg(not(windows))]
fn windows_factory() -> Result<Arc<dyn EngineFactory>, OcrError> {
    Err(OcrError::Unavailable(
        "windows".to_string(),
        "Windows.Media.Ocr only exists on Windows".to_string(),
    ))
}
