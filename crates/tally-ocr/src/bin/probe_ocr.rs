//! OCR smoke test - run with: cargo run -p tally-ocr --bin probe_ocr -- receipt.png

use anyhow::{Context, Result};
use tally_config::ocr::OcrConfig;
use tally_ocr::{FrameCapturer, OcrAdapter, StillImageSource};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .context("usage: probe_ocr <image>")?;

    tracing::info!("1. Capturing {}", path);
    let start = std::time::Instant::now();
    let mut source = StillImageSource::new(&path);
    let blob = FrameCapturer::capture(&mut source)?;
    tracing::info!(
        "   {}x{}, {} bytes in {:?}",
        blob.width,
        blob.height,
        blob.data.len(),
        start.elapsed()
    );

    let config = OcrConfig::new();
    tracing::info!("2. Running OCR ({}, {})", config.engine, config.language);
    let adapter = OcrAdapter::from_config(&config)?;
    let start = std::time::Instant::now();
    match adapter.recognize(&blob).await {
        Ok(output) => {
            tracing::info!("   {:?} - {} lines", start.elapsed(), output.lines.len());
            for line in &output.lines {
                tracing::info!("   > {}", line.text);
            }
        }
        Err(e) => tracing::error!("   Failed: {}", e),
    }

    Ok(())
}
