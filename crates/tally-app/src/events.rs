use kanal::AsyncReceiver;
use tally_core::{TotalAccumulator, TotalDisplay};
use tally_types::AppEvent;
use tokio_util::sync::CancellationToken;

use crate::display::ChannelDisplay;
use crate::ocr_context::CaptureContext;

pub mod capture;
pub mod lines;
pub mod reset;

use capture::handle_capture;
use lines::handle_recognized_lines;
use reset::handle_reset;

/// App's main loop, sole owner of the running total
pub async fn event_loop(
    ctx: CaptureContext,
    events_rx: AsyncReceiver<AppEvent>,
    mut accumulator: TotalAccumulator,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut display = ChannelDisplay::new(ctx.ui_tx.clone());

    // Initial render
    display.show(accumulator.value());
    display.flush().await;

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            event = events_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => break,
            },
            _ = cancel.cancelled() => break,
        };

        tracing::debug!("[EVENT_LOOP] event: {:?}", std::mem::discriminant(&event));
        match event {
            AppEvent::Capture => handle_capture(&ctx).await,
            AppEvent::Reset => handle_reset(&mut accumulator, &mut display),
            AppEvent::LinesRecognized { capture_id, lines } => {
                handle_recognized_lines(&ctx, &mut accumulator, &mut display, capture_id, &lines)
                    .await
            }
            AppEvent::Quit => {
                tracing::info!("Quit requested");
                cancel.cancel();
                break;
            }
            // UI-only events, ignore in backend
            AppEvent::SourceReady { .. }
            | AppEvent::TotalChanged(_)
            | AppEvent::CaptureStatus { .. } => {}
        }
        // A long receipt can outrun the ui queue, the last total must still land
        display.flush().await;
    }

    let stats = ctx.state.status.capture.read().await.clone();
    tracing::info!(
        captures = stats.capture_count,
        errors = stats.error_count,
        rejected = stats.rejected_count,
        last_capture = ?stats.last_capture_time,
        "[EVENT_LOOP] stopped, final total {}",
        accumulator.value()
    );
    Ok(())
}
