use std::sync::Arc;

use kanal::AsyncSender;
use tally_ocr::{FrameGrabber, OcrAdapter};
use tally_types::AppEvent;

use crate::state::AppState;

/// Everything a capture needs, bundled so it can be handed to spawned tasks
#[derive(Clone)]
pub struct CaptureContext {
    pub state: Arc<AppState>,
    /// Back into the event loop (recognized lines)
    pub event_tx: AsyncSender<AppEvent>,
    /// Towards the display (status, totals)
    pub ui_tx: AsyncSender<AppEvent>,
    /// `None` when no video source could be opened
    pub grabber: Option<Arc<FrameGrabber>>,
    pub adapter: OcrAdapter,
}

impl CaptureContext {
    pub fn new(
        state: Arc<AppState>,
        event_tx: AsyncSender<AppEvent>,
        ui_tx: AsyncSender<AppEvent>,
        grabber: Option<FrameGrabber>,
        adapter: OcrAdapter,
    ) -> Self {
        Self {
            state,
            event_tx,
            ui_tx,
            grabber: grabber.map(Arc::new),
            adapter,
        }
    }

    pub async fn send_status(&self, status: impl Into<String>, capturing: bool) {
        let status = status.into();
        if let Err(e) = self
            .ui_tx
            .send(AppEvent::CaptureStatus { status, capturing })
            .await
        {
            tracing::debug!("display gone, dropping status: {}", e);
        }
    }
}
