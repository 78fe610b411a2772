use tally_core::{TotalAccumulator, format_total};
use tally_types::RecognizedLine;
use uuid::Uuid;

use crate::display::ChannelDisplay;
use crate::ocr_context::CaptureContext;

pub async fn handle_recognized_lines(
    ctx: &CaptureContext,
    accumulator: &mut TotalAccumulator,
    display: &mut ChannelDisplay,
    capture_id: Uuid,
    lines: &[RecognizedLine],
) {
    let summary = accumulator.apply_lines(lines, display);
    // Total first, then the status describing it
    display.flush().await;
    tracing::info!(
        %capture_id,
        lines = summary.lines,
        matched = summary.matched,
        "capture added {}, total now {}",
        format_total(summary.amount),
        format_total(accumulator.value())
    );

    let status = match (summary.lines, summary.matched) {
        (0, _) => "No text found".to_string(),
        (_, 0) => "No TOTAL line found".to_string(),
        (_, matched) => format!("Added {matched} TOTAL line(s)"),
    };
    ctx.send_status(status, false).await;
}
