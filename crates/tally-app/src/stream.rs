use kanal::AsyncSender;
use tally_config::camera::CameraConfig;
use tally_ocr::{CaptureError, FrameGrabber, open_source};
use tally_types::AppEvent;

/// Open the configured video source; failures are logged and leave capture disabled
pub async fn start_stream(
    config: CameraConfig,
    ui_tx: &AsyncSender<AppEvent>,
) -> Option<FrameGrabber> {
    tracing::info!(
        "opening {} (ideal {}x{}, facing {:?})",
        config.source,
        config.ideal_width,
        config.ideal_height,
        config.facing
    );

    match FrameGrabber::start(move || open_source(&config)).await {
        Ok(grabber) => {
            let _ = ui_tx
                .send(AppEvent::SourceReady {
                    description: grabber.description().to_string(),
                })
                .await;
            Some(grabber)
        }
        Err(CaptureError::Unavailable(what)) => {
            tracing::warn!("{} capture is not supported here, capture disabled", what);
            None
        }
        Err(e) => {
            tracing::error!("failed to open video source: {}", e);
            None
        }
    }
}
