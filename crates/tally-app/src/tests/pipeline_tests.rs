//! Capture -> OCR -> total -> display, driven through the event loop

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use image::RgbaImage;
use kanal::{AsyncReceiver, AsyncSender};
use tally_core::TotalAccumulator;
use tally_ocr::{
    CaptureError, EngineFactory, FrameGrabber, OcrAdapter, OcrEngine, OcrError, OcrOutput,
    StaticFrame, VideoSource,
};
use tally_types::{AppEvent, ImageBlob, RecognizedLine};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::controller::ChannelSet;
use crate::events::event_loop;
use crate::ocr_context::CaptureContext;
use crate::state::AppState;

pub(crate) struct ScriptedEngine {
    lines: Vec<String>,
    delay: Duration,
}

#[async_trait]
impl OcrEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn recognize(&mut self, _image: &ImageBlob) -> Result<OcrOutput, OcrError> {
        tokio::time::sleep(self.delay).await;
        Ok(OcrOutput::from_lines(
            self.lines.iter().map(|l| RecognizedLine::new(l.as_str())).collect(),
        ))
    }
}

/// Hands out one scripted receipt per engine, in order
pub(crate) struct ScriptedFactory {
    receipts: Mutex<VecDeque<Vec<String>>>,
    delay: Duration,
}

impl ScriptedFactory {
    pub(crate) fn new(receipts: &[&[&str]], delay: Duration) -> Self {
        let receipts = receipts
            .iter()
            .map(|lines| lines.iter().map(|l| l.to_string()).collect())
            .collect();
        Self {
            receipts: Mutex::new(receipts),
            delay,
        }
    }
}

impl EngineFactory for ScriptedFactory {
    fn create(&self, _language: &str) -> Result<Box<dyn OcrEngine>, OcrError> {
        let lines = self.receipts.lock().unwrap().pop_front().unwrap_or_default();
        Ok(Box::new(ScriptedEngine {
            lines,
            delay: self.delay,
        }))
    }
}

pub(crate) async fn static_grabber() -> FrameGrabber {
    FrameGrabber::start(|| {
        Ok(Box::new(StaticFrame::new(RgbaImage::new(4, 4))) as Box<dyn VideoSource>)
    })
    .await
    .unwrap()
}

struct Harness {
    state: Arc<AppState>,
    events_tx: AsyncSender<AppEvent>,
    ui_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
    handle: JoinHandle<anyhow::Result<()>>,
}

async fn harness(receipts: &[&[&str]], delay: Duration, with_source: bool) -> Harness {
    let grabber = if with_source {
        Some(static_grabber().await)
    } else {
        None
    };
    harness_with(receipts, delay, grabber, kanal::unbounded_async()).await
}

async fn harness_with(
    receipts: &[&[&str]],
    delay: Duration,
    grabber: Option<FrameGrabber>,
    (ui_tx, ui_rx): (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
) -> Harness {
    let state = Arc::new(AppState::new());
    let (events_tx, events_rx) = kanal::bounded_async(16);

    let adapter = OcrAdapter::new(Arc::new(ScriptedFactory::new(receipts, delay)), "eng");
    let ctx = CaptureContext::new(state.clone(), events_tx.clone(), ui_tx, grabber, adapter);

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(event_loop(
        ctx,
        events_rx,
        TotalAccumulator::new(),
        cancel.clone(),
    ));

    Harness {
        state,
        events_tx,
        ui_rx,
        cancel,
        handle,
    }
}

/// Collect totals shown until a status containing `needle` arrives
async fn totals_until_status(ui_rx: &AsyncReceiver<AppEvent>, needle: &str) -> Vec<f64> {
    let mut totals = Vec::new();
    loop {
        let event = timeout(Duration::from_secs(2), ui_rx.recv())
            .await
            .unwrap_or_else(|_| panic!("no status containing {needle:?}, totals so far {totals:?}"))
            .unwrap();
        match event {
            AppEvent::TotalChanged(total) => totals.push(total),
            AppEvent::CaptureStatus { status, .. } if status.contains(needle) => return totals,
            _ => {}
        }
    }
}

async fn next_total(ui_rx: &AsyncReceiver<AppEvent>) -> f64 {
    loop {
        let event = timeout(Duration::from_secs(2), ui_rx.recv())
            .await
            .unwrap()
            .unwrap();
        if let AppEvent::TotalChanged(total) = event {
            return total;
        }
    }
}

#[tokio::test]
async fn test_initial_total_rendered() {
    let h = harness(&[], Duration::ZERO, true).await;
    assert_eq!(next_total(&h.ui_rx).await, 0.0);
}

#[tokio::test]
async fn test_capture_updates_total_per_line() {
    let h = harness(&[&["CORNER SHOP", "TOTAL: $12.50"]], Duration::ZERO, true).await;
    assert_eq!(next_total(&h.ui_rx).await, 0.0);

    h.events_tx.send(AppEvent::Capture).await.unwrap();
    let totals = totals_until_status(&h.ui_rx, "Added 1").await;
    assert_eq!(totals, vec![0.0, 12.5]);

    let stats = h.state.status.capture.read().await;
    assert_eq!(stats.capture_count, 1);
    assert!(stats.last_capture_time.is_some());
}

#[tokio::test]
async fn test_captures_accumulate() {
    let h = harness(&[&["TOTAL $5"], &["TOTAL $7"]], Duration::ZERO, true).await;

    h.events_tx.send(AppEvent::Capture).await.unwrap();
    totals_until_status(&h.ui_rx, "Added").await;
    h.events_tx.send(AppEvent::Capture).await.unwrap();
    let totals = totals_until_status(&h.ui_rx, "Added").await;

    assert_eq!(totals.last(), Some(&12.0));
}

#[tokio::test]
async fn test_unparsable_total_then_reset() {
    let h = harness(&[&["TOTAL abc"]], Duration::ZERO, true).await;

    h.events_tx.send(AppEvent::Capture).await.unwrap();
    let totals = totals_until_status(&h.ui_rx, "Added").await;
    assert!(totals.last().unwrap().is_nan());

    h.events_tx.send(AppEvent::Reset).await.unwrap();
    assert_eq!(next_total(&h.ui_rx).await, 0.0);
}

#[tokio::test]
async fn test_receipt_without_total() {
    let h = harness(&[&["MILK 1.00", "BREAD 2.00"]], Duration::ZERO, true).await;

    h.events_tx.send(AppEvent::Capture).await.unwrap();
    let totals = totals_until_status(&h.ui_rx, "No TOTAL line").await;
    assert!(totals.iter().all(|t| *t == 0.0));
}

#[tokio::test]
async fn test_second_capture_rejected_while_busy() {
    let h = harness(
        &[&["TOTAL 5"], &["TOTAL 7"]],
        Duration::from_millis(200),
        true,
    )
    .await;

    h.events_tx.send(AppEvent::Capture).await.unwrap();
    h.events_tx.send(AppEvent::Capture).await.unwrap();

    totals_until_status(&h.ui_rx, "Busy").await;
    let totals = totals_until_status(&h.ui_rx, "Added").await;
    assert_eq!(totals.last(), Some(&5.0));

    assert_eq!(h.state.status.capture.read().await.rejected_count, 1);

    // Slot frees once the capture task has handed its lines over
    timeout(Duration::from_secs(1), async {
        while h.state.capture_running() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_capture_without_source() {
    let h = harness(&[&["TOTAL 5"]], Duration::ZERO, false).await;

    h.events_tx.send(AppEvent::Capture).await.unwrap();
    let totals = totals_until_status(&h.ui_rx, "No video source").await;
    assert_eq!(totals, vec![0.0]);
}

#[tokio::test]
async fn test_quit_stops_loop_and_cancels() {
    let h = harness(&[], Duration::ZERO, true).await;

    h.events_tx.send(AppEvent::Quit).await.unwrap();
    timeout(Duration::from_secs(1), h.handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(h.cancel.is_cancelled());
}

#[tokio::test]
async fn test_long_receipt_ends_on_current_total() {
    let mut receipt: Vec<String> = (0..300).map(|i| format!("item {i} 1.00")).collect();
    receipt.push("TOTAL: $42.00".to_string());
    let receipt: Vec<&str> = receipt.iter().map(String::as_str).collect();

    let h = harness_with(
        &[receipt.as_slice()],
        Duration::ZERO,
        Some(static_grabber().await),
        ChannelSet::new(16).app_to_ui,
    )
    .await;

    h.events_tx.send(AppEvent::Capture).await.unwrap();
    let totals = totals_until_status(&h.ui_rx, "Added 1").await;
    assert_eq!(totals.last(), Some(&42.0));
}

struct BrokenCamera;

impl VideoSource for BrokenCamera {
    fn describe(&self) -> String {
        "broken camera".to_string()
    }

    fn dimensions(&self) -> (u32, u32) {
        (4, 4)
    }

    fn grab_frame(&mut self) -> Result<RgbaImage, CaptureError> {
        Err(CaptureError::Device("unplugged".to_string()))
    }
}

#[tokio::test]
async fn test_failed_capture_counts_error() {
    let grabber = FrameGrabber::start(|| Ok(Box::new(BrokenCamera) as Box<dyn VideoSource>))
        .await
        .unwrap();
    let h = harness_with(
        &[&["TOTAL 5"]],
        Duration::ZERO,
        Some(grabber),
        kanal::unbounded_async(),
    )
    .await;

    h.events_tx.send(AppEvent::Capture).await.unwrap();
    let totals = totals_until_status(&h.ui_rx, "unplugged").await;
    assert_eq!(totals, vec![0.0]);

    let stats = h.state.status.capture.read().await;
    assert_eq!(stats.error_count, 1);
    assert_eq!(stats.capture_count, 0);
}
