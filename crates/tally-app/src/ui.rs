use std::io::Write;

use kanal::AsyncReceiver;
use tally_core::TotalDisplay;
use tally_types::AppEvent;

use crate::display::TerminalDisplay;

/// Render events coming from the app until the channel closes
pub async fn ui_loop<W: Write>(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    mut display: TerminalDisplay<W>,
) -> anyhow::Result<()> {
    while let Ok(event) = app_to_ui_rx.recv().await {
        match event {
            AppEvent::TotalChanged(total) => display.show(total),
            AppEvent::SourceReady { description } => {
                display.message(&format!(
                    "Capturing from {description}. Commands: [c]apture, [r]eset, [q]uit"
                ));
            }
            AppEvent::CaptureStatus { status, capturing } => {
                tracing::debug!("capture status: {} (capturing: {})", status, capturing);
                display.message(&format!("[{status}]"));
            }
            // Backend-only events
            AppEvent::Capture
            | AppEvent::Reset
            | AppEvent::Quit
            | AppEvent::LinesRecognized { .. } => {}
        }
    }

    tracing::debug!("ui loop stopping");
    Ok(())
}
