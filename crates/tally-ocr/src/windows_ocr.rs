use anyhow::Context;
use async_trait::async_trait;
use tally_types::{ImageBlob, RecognizedLine};
use windows::{
    Globalization::Language,
    Graphics::Imaging::BitmapDecoder,
    Media::Ocr::OcrEngine as WinOcrEngine,
    Storage::Streams::{DataWriter, InMemoryRandomAccessStream},
    core::HSTRING,
};

use crate::com::ComGuard;
use crate::engine::{EngineFactory, OcrEngine, OcrError};
use crate::output::OcrOutput;

/// Windows.Media.Ocr wants BCP-47 tags, tesseract style codes are mapped
fn language_tag(language: &str) -> &str {
    match language {
        "eng" => "en",
        "deu" => "de",
        "fra" => "fr",
        "spa" => "es",
        "jpn" => "ja",
        other => other,
    }
}

pub struct WindowsOcrEngine {
    engine: WinOcrEngine,
}

impl WindowsOcrEngine {
    /// Create a new OCR engine for the specified language (e.g., "en", "eng")
    pub fn new(language: &str) -> anyhow::Result<Self> {
        let language = Language::CreateLanguage(&HSTRING::from(language_tag(language)))
            .context("Failed to create language")?;

        let engine = WinOcrEngine::TryCreateFromLanguage(&language)
            .context("Failed to create OCR engine for language")?;

        Ok(Self { engine })
    }

    fn recognize_blocking(engine: &WinOcrEngine, image_bytes: &[u8]) -> anyhow::Result<OcrOutput> {
        let _com = ComGuard::initialize()?;

        let stream = InMemoryRandomAccessStream::new().context("Failed to create stream")?;
        let writer = DataWriter::CreateDataWriter(&stream).context("Failed to create writer")?;

        writer
            .WriteBytes(image_bytes)
            .context("Failed to write image bytes")?;
        writer
            .StoreAsync()
            .context("Failed to store async")?
            .get()
            .context("Failed to store data")?;
        writer.FlushAsync().context("Failed to flush")?.get()?;

        stream.Seek(0).context("Failed to seek")?;

        let decoder = BitmapDecoder::CreateAsync(&stream)
            .context("Failed to create decoder async")?
            .get()
            .context("Failed to get decoder")?;

        let bitmap = decoder
            .GetSoftwareBitmapAsync()
            .context("Failed to get bitmap async")?
            .get()
            .context("Failed to get software bitmap")?;

        let result = engine
            .RecognizeAsync(&bitmap)
            .context("Failed to recognize async")?
            .get()
            .context("Failed to get OCR result")?;

        let mut lines = Vec::new();
        for line in result.Lines().context("Failed to get lines")? {
            let text = line.Text().context("Failed to get line text")?.to_string();
            if !text.trim().is_empty() {
                lines.push(RecognizedLine::new(text));
            }
        }

        Ok(OcrOutput::from_lines(lines))
    }
}

#[async_trait]
impl OcrEngine for WindowsOcrEngine {
    fn name(&self) -> &str {
        "windows"
    }

    async fn recognize(&mut self, image: &ImageBlob) -> Result<OcrOutput, OcrError> {
        if image.is_empty() {
            return Ok(OcrOutput::default());
        }

        let engine = self.engine.clone();
        let data = image.data.clone();
        tokio::task::spawn_blocking(move || Self::recognize_blocking(&engine, &data))
            .await
            .map_err(|e| OcrError::Engine(format!("OCR task failed: {e}")))?
            .map_err(|e| OcrError::Engine(format!("{e:#}")))
    }
}

pub struct WindowsOcrFactory;

impl EngineFactory for WindowsOcrFactory {
    fn create(&self, language: &str) -> Result<Box<dyn OcrEngine>, OcrError> {
        WindowsOcrEngine::new(language)
            .map(|engine| Box::new(engine) as Box<dyn OcrEngine>)
            .map_err(|e| OcrError::Unavailable("windows".to_string(), format!("{e:#}")))
    }
}
