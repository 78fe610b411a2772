use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// User asked for a frame to be captured and scanned
    Capture,
    /// User asked for the running total to go back to zero
    Reset,
    Quit,
    /// OCR finished for one capture
    LinesRecognized {
        capture_id: Uuid,
        lines: Vec<RecognizedLine>,
    },
    /// Video source is streaming, capture can be offered
    SourceReady {
        description: String,
    },
    TotalChanged(f64),
    CaptureStatus {
        status: String,
        capturing: bool,
    },
}

/// One line of text as transcribed by the OCR engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedLine {
    pub text: String,
    pub confidence: Option<f32>,
}

impl RecognizedLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }
}

impl From<&str> for RecognizedLine {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Encoded still image plus its media type
#[derive(Debug, Clone, Default)]
pub struct ImageBlob {
    pub data: Vec<u8>,
    pub media_type: String,
    pub width: u32,
    pub height: u32,
}

impl ImageBlob {
    pub const PNG: &'static str = "image/png";

    pub fn png(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            media_type: Self::PNG.to_string(),
            width,
            height,
        }
    }

    /// Blob produced from a source with no pixels
    pub fn empty() -> Self {
        Self::png(Vec::new(), 0, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty() || self.width == 0 || self.height == 0
    }
}
