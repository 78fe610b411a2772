use std::sync::Arc;
use std::time::Duration;

use tally_config::ocr::OcrConfig;
use tally_types::ImageBlob;

use crate::engine::{EngineFactory, OcrError, factory_for};
use crate::output::OcrOutput;

/// Runs one recognition per call on a freshly created engine
#[derive(Clone)]
pub struct OcrAdapter {
    factory: Arc<dyn EngineFactory>,
    language: String,
    timeout: Option<Duration>,
}

impl OcrAdapter {
    pub fn new(factory: Arc<dyn EngineFactory>, language: impl Into<String>) -> Self {
        Self {
            factory,
            language: language.into(),
            timeout: None,
        }
    }

    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let adapter = Self::new(factory_for(config)?, config.language.clone());
        Ok(match config.timeout_seconds {
            0 => adapter,
            secs => adapter.with_timeout(Duration::from_secs(secs)),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Create an engine, recognize `image`, then release the engine whatever the outcome
    pub async fn recognize(&self, image: &ImageBlob) -> Result<OcrOutput, OcrError> {
        let mut engine = self.factory.create(&self.language)?;
        let start = std::time::Instant::now();

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, engine.recognize(image))
                .await
                .unwrap_or(Err(OcrError::Timeout(limit))),
            None => engine.recognize(image).await,
        };

        engine.terminate().await;

        match &result {
            Ok(output) => tracing::debug!(
                "{} recognized {} lines in {:?}",
                engine.name(),
                output.lines.len(),
                start.elapsed()
            ),
            Err(e) => tracing::warn!("{} failed after {:?}: {}", engine.name(), start.elapsed(), e),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::engine::OcrEngine;

    #[derive(Default)]
    struct Journal {
        created: Vec<String>,
        terminated: usize,
    }

    struct ScriptedEngine {
        journal: Arc<Mutex<Journal>>,
        reply: Option<String>,
        delay: Duration,
    }

    #[async_trait]
    impl OcrEngine for ScriptedEngine {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn recognize(&mut self, _image: &ImageBlob) -> Result<OcrOutput, OcrError> {
            tokio::time::sleep(self.delay).await;
            match &self.reply {
                Some(text) => Ok(OcrOutput::from_text(text.clone())),
                None => Err(OcrError::Engine("unreadable".to_string())),
            }
        }

        async fn terminate(&mut self) {
            self.journal.lock().unwrap().terminated += 1;
        }
    }

    struct ScriptedFactory {
        journal: Arc<Mutex<Journal>>,
        reply: Option<String>,
        delay: Duration,
    }

    impl EngineFactory for ScriptedFactory {
        fn create(&self, language: &str) -> Result<Box<dyn OcrEngine>, OcrError> {
            self.journal.lock().unwrap().created.push(language.to_string());
            Ok(Box::new(ScriptedEngine {
                journal: self.journal.clone(),
                reply: self.reply.clone(),
                delay: self.delay,
            }))
        }
    }

    fn adapter(reply: Option<&str>, delay: Duration) -> (OcrAdapter, Arc<Mutex<Journal>>) {
        let journal = Arc::new(Mutex::new(Journal::default()));
        let factory = ScriptedFactory {
            journal: journal.clone(),
            reply: reply.map(str::to_string),
            delay,
        };
        (OcrAdapter::new(Arc::new(factory), "eng"), journal)
    }

    #[tokio::test]
    async fn test_engine_created_per_call_and_released() {
        let (adapter, journal) = adapter(Some("TOTAL 3.00"), Duration::ZERO);
        let blob = ImageBlob::png(vec![0], 1, 1);

        for _ in 0..2 {
            let output = adapter.recognize(&blob).await.unwrap();
            assert_eq!(output.lines[0].text, "TOTAL 3.00");
        }

        let journal = journal.lock().unwrap();
        assert_eq!(journal.created, vec!["eng", "eng"]);
        assert_eq!(journal.terminated, 2);
    }

    #[tokio::test]
    async fn test_engine_released_after_failure() {
        let (adapter, journal) = adapter(None, Duration::ZERO);
        let result = adapter.recognize(&ImageBlob::png(vec![0], 1, 1)).await;

        assert!(matches!(result, Err(OcrError::Engine(_))));
        assert_eq!(journal.lock().unwrap().terminated, 1);
    }

    #[tokio::test]
    async fn test_timeout_releases_engine() {
        let (adapter, journal) = adapter(Some("late"), Duration::from_secs(5));
        let adapter = adapter.with_timeout(Duration::from_millis(20));

        let result = adapter.recognize(&ImageBlob::png(vec![0], 1, 1)).await;

        assert!(matches!(result, Err(OcrError::Timeout(_))));
        assert_eq!(journal.lock().unwrap().terminated, 1);
    }
}
