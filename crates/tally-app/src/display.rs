use std::io::Write;

use kanal::AsyncSender;
use tally_core::{TotalDisplay, format_total};
use tally_types::AppEvent;

/// Forwards every total to the ui loop.
///
/// `show` never waits. When the ui queue is full the newest total is held
/// back and delivered by [`ChannelDisplay::flush`], so the screen always ends
/// on the current value even if some intermediate ones were skipped.
pub struct ChannelDisplay {
    tx: AsyncSender<AppEvent>,
    pending: Option<f64>,
}

impl ChannelDisplay {
    pub fn new(tx: AsyncSender<AppEvent>) -> Self {
        Self { tx, pending: None }
    }

    /// Deliver the total held back by a full queue, waiting for room
    pub async fn flush(&mut self) {
        let Some(total) = self.pending.take() else {
            return;
        };
        tracing::debug!("display caught up, sending total {}", format_total(total));
        if self.tx.send(AppEvent::TotalChanged(total)).await.is_err() {
            tracing::debug!("display gone, dropping total");
        }
    }
}

impl TotalDisplay for ChannelDisplay {
    fn show(&mut self, total: f64) {
        match self.tx.try_send(AppEvent::TotalChanged(total)) {
            Ok(true) => self.pending = None,
            Ok(false) => {
                if self.pending.is_none() {
                    tracing::warn!("display queue full, holding back totals");
                }
                self.pending = Some(total);
            }
            // No display attached any more
            Err(_) => self.pending = None,
        }
    }
}

/// Writes `Total: <value>` lines, skipping repeats of the value on screen
pub struct TerminalDisplay<W: Write> {
    out: W,
    shown: Option<String>,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out, shown: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn message(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|_| self.out.flush()) {
            tracing::debug!("display write failed: {}", e);
        }
    }
}

impl<W: Write> TotalDisplay for TerminalDisplay<W> {
    fn show(&mut self, total: f64) {
        let text = format_total(total);
        if self.shown.as_deref() == Some(text.as_str()) {
            return;
        }
        self.message(&format!("Total: {text}"));
        self.shown = Some(text);
    }
}
