use std::io::ErrorKind;
use std::process::Stdio;

use async_trait::async_trait;
use tally_types::ImageBlob;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::engine::{EngineFactory, OcrEngine, OcrError};
use crate::output::OcrOutput;

/// Runs the `tesseract` executable, feeding the image on stdin
pub struct TesseractEngine {
    program: String,
    language: String,
}

impl TesseractEngine {
    pub fn new(program: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["stdin", "stdout", "-l", &self.language])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&mut self, image: &ImageBlob) -> Result<OcrOutput, OcrError> {
        if image.is_empty() {
            tracing::debug!("empty image, nothing to recognize");
            return Ok(OcrOutput::default());
        }

        let mut child = self.command().spawn().map_err(|e| match e.kind() {
            ErrorKind::NotFound => OcrError::Unavailable(self.program.clone(), e.to_string()),
            _ => OcrError::Io(e),
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OcrError::Engine("tesseract stdin unavailable".to_string()))?;

        let feed = async move {
            let result = stdin.write_all(&image.data).await;
            drop(stdin);
            result
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if let Err(e) = fed {
            tracing::warn!("tesseract closed stdin early: {}", e);
        }

        Ok(OcrOutput::from_text(String::from_utf8_lossy(&output.stdout)))
    }
}

pub struct TesseractFactory {
    program: String,
}

impl TesseractFactory {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl EngineFactory for TesseractFactory {
    fn create(&self, language: &str) -> Result<Box<dyn OcrEngine>, OcrError> {
        Ok(Box::new(TesseractEngine::new(self.program.clone(), language)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_image_short_circuits() {
        let mut engine = TesseractEngine::new("tesseract-does-not-exist", "eng");
        let output = engine.recognize(&ImageBlob::empty()).await.unwrap();
        assert!(output.lines.is_empty());
    }

    #[tokio::test]
    async fn test_missing_executable_is_unavailable() {
        let mut engine = TesseractEngine::new("tesseract-does-not-exist", "eng");
        let blob = ImageBlob::png(vec![1, 2, 3], 1, 1);
        let result = engine.recognize(&blob).await;
        assert!(matches!(result, Err(OcrError::Unavailable(..))));
    }
}
