use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tally_config::Config;
use tally_config::logging::LoggingConfig;
use tally_core::{TotalAccumulator, TotalDisplay, format_total};
use tally_ocr::{FrameCapturer, OcrAdapter, StillImageSource};
use tokio::signal;
use tracing::Instrument;
use uuid::Uuid;

pub mod cli;
pub mod controller;
pub mod display;
pub mod events;
pub mod io;
pub mod logging;
pub mod ocr_context;
pub mod state;
pub mod status;
pub mod stream;
pub mod ui;

#[cfg(test)]
mod tests {
    mod pipeline_tests;
    mod session_tests;
}

use self::cli::{Cli, Command};
use self::controller::AppController;
use self::display::TerminalDisplay;
use self::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let _log_guard = logging::init_logging(&LoggingConfig::new());
    if let Ok(path) = dotenv {
        tracing::debug!("loaded environment from {}", path.display());
    }

    let mut config = Config::new();
    cli.apply(&mut config);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(config).await,
        Command::Scan { images } => scan(config, images).await,
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

pub fn accumulator_for(config: &Config) -> TotalAccumulator {
    if config.ocr.normalize_text {
        TotalAccumulator::normalized()
    } else {
        TotalAccumulator::new()
    }
}

/// Interactive session until quit, end of input or Ctrl+C
pub async fn run(config: Config) -> anyhow::Result<()> {
    let adapter = OcrAdapter::from_config(&config.ocr).context("OCR engine unavailable")?;
    tracing::info!(
        "OCR engine {} ({})",
        config.ocr.engine,
        adapter.language()
    );

    let accumulator = accumulator_for(&config);

    let state = Arc::new(AppState::new());
    let controller = AppController::new(state, config.action_queue);
    let cancel = controller.cancel_token();

    let grabber = stream::start_stream(config.camera, controller.ui_sender()).await;
    let input_rx = io::spawn_stdin_reader().context("Failed to read stdin")?;

    let mut tasks = controller.spawn_tasks(
        grabber,
        adapter,
        accumulator,
        input_rx,
        TerminalDisplay::new(std::io::stdout()),
    );

    tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("failed to listen for ctrl+c: {e}");
            }
            tracing::info!("Shutdown requested");
        }
        _ = cancel.cancelled() => {}
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::warn!("task exited"),
                Ok(Err(e)) => tracing::error!("task failed: {e:#}"),
                Err(e) => tracing::error!("task panicked: {e}"),
            }
        }
    }
    cancel.cancel();

    let drain = async {
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!("task failed: {e:#}"),
                Err(e) => tracing::error!("task panicked: {e}"),
            }
        }
    };
    let drained = tokio::time::timeout(Duration::from_secs(2), drain).await.is_ok();
    if !drained {
        tracing::warn!("tasks did not stop in time, aborting");
        tasks.abort_all();
    }

    Ok(())
}

/// One capture per image file, printing the running total as it changes
pub async fn scan(config: Config, images: Vec<PathBuf>) -> anyhow::Result<()> {
    let adapter = OcrAdapter::from_config(&config.ocr).context("OCR engine unavailable")?;
    let mut accumulator = accumulator_for(&config);
    let mut display = TerminalDisplay::new(std::io::stdout());
    display.show(accumulator.value());

    for path in images {
        let span = tracing::info_span!("capture", capture_id = %Uuid::new_v4());
        scan_one(&adapter, &mut accumulator, &mut display, path)
            .instrument(span)
            .await?;
    }

    Ok(())
}

async fn scan_one<D: TotalDisplay>(
    adapter: &OcrAdapter,
    accumulator: &mut TotalAccumulator,
    display: &mut D,
    path: PathBuf,
) -> anyhow::Result<()> {
    let mut source = StillImageSource::new(&path);
    let captured = tokio::task::spawn_blocking(move || FrameCapturer::capture(&mut source))
        .await
        .context("capture task failed")?;

    let blob = match captured {
        Ok(blob) => blob,
        Err(e) => {
            tracing::error!("cannot capture {}: {}", path.display(), e);
            return Ok(());
        }
    };

    let output = match adapter.recognize(&blob).await {
        Ok(output) => output,
        Err(e) => {
            tracing::error!("OCR failed for {}: {}", path.display(), e);
            return Ok(());
        }
    };

    let summary = accumulator.apply_lines(&output.lines, display);
    tracing::info!(
        "{}: {} lines, {} TOTAL, total now {}",
        path.display(),
        summary.lines,
        summary.matched,
        format_total(accumulator.value())
    );

    Ok(())
}
