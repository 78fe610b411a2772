use std::io::Write;
use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tally_core::TotalAccumulator;
use tally_ocr::{FrameGrabber, OcrAdapter};
use tally_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::display::TerminalDisplay;
use crate::events::event_loop;
use crate::io::input_loop;
use crate::ocr_context::CaptureContext;
use crate::state::AppState;
use crate::ui::ui_loop;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    /// User actions and capture results, consumed by the event loop
    pub events: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new(action_queue: usize) -> Self {
        Self {
            app_to_ui: kanal::bounded_async(256), // one update per OCR line
            events: kanal::bounded_async(action_queue.max(1)),
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>, action_queue: usize) -> Self {
        Self {
            channels: ChannelSet::new(action_queue),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn ui_sender(&self) -> &AsyncSender<AppEvent> {
        &self.channels.app_to_ui.0
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Spawn the event, ui and input loops. Consumes the controller so the ui
    /// loop ends once the event loop and its captures are gone.
    pub fn spawn_tasks<W>(
        self,
        grabber: Option<FrameGrabber>,
        adapter: OcrAdapter,
        accumulator: TotalAccumulator,
        input_rx: AsyncReceiver<String>,
        display: TerminalDisplay<W>,
    ) -> JoinSet<anyhow::Result<()>>
    where
        W: Write + Send + 'static,
    {
        let mut tasks = JoinSet::new();
        let ChannelSet {
            app_to_ui: (ui_tx, ui_rx),
            events: (events_tx, events_rx),
        } = self.channels;

        let ctx = CaptureContext::new(self.state, events_tx.clone(), ui_tx, grabber, adapter);

        // Event loop
        tasks.spawn(event_loop(
            ctx,
            events_rx,
            accumulator,
            self.cancel_token.clone(),
        ));

        // UI loop
        tasks.spawn(ui_loop(ui_rx, display));

        // User input
        tasks.spawn(input_loop(input_rx, self.cancel_token.child_token(), events_tx));

        tasks
    }
}
