use std::thread;

use kanal::{AsyncSender, Receiver};
use tally_types::ImageBlob;
use tokio::sync::oneshot;

use crate::capture::{CaptureError, FrameCapturer, VideoSource};

struct FrameRequest {
    reply: oneshot::Sender<Result<ImageBlob, CaptureError>>,
}

/// Owns a video source on a dedicated thread and hands out captured frames.
///
/// Device handles are often tied to the thread that opened them, so the
/// source is created, used and dropped on the grabber thread only.
pub struct FrameGrabber {
    requests: AsyncSender<FrameRequest>,
    description: String,
}

impl FrameGrabber {
    /// Open a source on a new thread, resolving once it streams or fails to open
    pub async fn start<F>(open: F) -> Result<Self, CaptureError>
    where
        F: FnOnce() -> Result<Box<dyn VideoSource>, CaptureError> + Send + 'static,
    {
        let (request_tx, request_rx) = kanal::bounded::<FrameRequest>(1);
        let (ready_tx, ready_rx) = oneshot::channel();

        thread::Builder::new()
            .name("frame-grabber".to_string())
            .spawn(move || match open() {
                Ok(source) => {
                    if ready_tx.send(Ok(source.describe())).is_ok() {
                        serve(source, request_rx);
                    }
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                }
            })
            .map_err(|e| CaptureError::Device(format!("Failed to spawn grabber thread: {e}")))?;

        let description = ready_rx.await.map_err(|_| CaptureError::Stopped)??;
        tracing::info!("frame grabber ready: {}", description);

        Ok(Self {
            requests: request_tx.to_async(),
            description,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Capture the frame the source is showing right now
    pub async fn capture(&self) -> Result<ImageBlob, CaptureError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(FrameRequest { reply })
            .await
            .map_err(|_| CaptureError::Stopped)?;
        response.await.map_err(|_| CaptureError::Stopped)?
    }
}

fn serve(mut source: Box<dyn VideoSource>, requests: Receiver<FrameRequest>) {
    while let Ok(request) = requests.recv() {
        let result = FrameCapturer::capture(source.as_mut());
        if let Err(e) = &result {
            tracing::error!("frame capture failed on {}: {}", source.describe(), e);
        }
        let _ = request.reply.send(result);
    }
    tracing::debug!("frame grabber for {} stopping", source.describe());
}
