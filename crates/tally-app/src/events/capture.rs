use std::sync::Arc;
use std::time::SystemTime;

use tally_ocr::FrameGrabber;
use tally_types::AppEvent;
use tracing::Instrument;
use uuid::Uuid;

use crate::ocr_context::CaptureContext;
use crate::state::CaptureSlot;

/// Start a capture unless one is already running or there is nothing to capture from
pub async fn handle_capture(ctx: &CaptureContext) {
    let Some(grabber) = ctx.grabber.clone() else {
        tracing::warn!(">>> [CAPTURE] No video source, ignoring capture");
        ctx.send_status("No video source", false).await;
        return;
    };

    let Some(slot) = CaptureSlot::try_acquire(&ctx.state) else {
        tracing::info!(">>> [CAPTURE] Already capturing, request rejected");
        ctx.state.status.capture.write().await.rejected_count += 1;
        ctx.send_status("Busy, capture already running", true).await;
        return;
    };

    let capture_id = Uuid::new_v4();
    let span = tracing::info_span!("capture", %capture_id);
    let ctx = ctx.clone();

    tokio::spawn(
        async move {
            // Held until the recognized lines are queued for the event loop
            let _slot = slot;
            run_capture(&ctx, &grabber, capture_id).await;
        }
        .instrument(span),
    );
}

async fn run_capture(ctx: &CaptureContext, grabber: &Arc<FrameGrabber>, capture_id: Uuid) {
    ctx.send_status("Capturing", true).await;

    let blob = match grabber.capture().await {
        Ok(blob) => blob,
        Err(e) => {
            tracing::error!(">>> [CAPTURE] Failed: {}", e);
            record_failure(ctx, format!("Failed: {e}")).await;
            return;
        }
    };
    tracing::debug!(
        ">>> [CAPTURE] Captured {}x{} ({} bytes)",
        blob.width,
        blob.height,
        blob.data.len()
    );

    ctx.send_status("Recognizing", true).await;
    let output = match ctx.adapter.recognize(&blob).await {
        Ok(output) => output,
        Err(e) => {
            tracing::error!(">>> [OCR] Failed: {}", e);
            record_failure(ctx, format!("Failed: {e}")).await;
            return;
        }
    };
    drop(blob);

    tracing::debug!(">>> [OCR] Got {} lines", output.lines.len());
    for line in &output.lines {
        tracing::trace!(">>> [OCR] {}", line.text);
    }

    {
        let mut stats = ctx.state.status.capture.write().await;
        stats.capture_count += 1;
        stats.last_capture_time = Some(SystemTime::now());
    }

    if let Err(e) = ctx
        .event_tx
        .send(AppEvent::LinesRecognized {
            capture_id,
            lines: output.lines,
        })
        .await
    {
        tracing::warn!(">>> [CAPTURE] Event loop gone, dropping lines: {}", e);
    }
}

async fn record_failure(ctx: &CaptureContext, status: String) {
    ctx.state.status.capture.write().await.error_count += 1;
    ctx.send_status(status, false).await;
}
