use std::io::BufRead;
use std::thread;

use kanal::{AsyncReceiver, AsyncSender};
use tally_types::AppEvent;
use tokio_util::sync::CancellationToken;

/// Map a typed command to the action it stands for
pub fn parse_action(line: &str) -> Option<AppEvent> {
    match line.trim().to_ascii_lowercase().as_str() {
        "c" | "capture" | "scan" => Some(AppEvent::Capture),
        "r" | "reset" => Some(AppEvent::Reset),
        "q" | "quit" | "exit" => Some(AppEvent::Quit),
        _ => None,
    }
}

/// Read stdin lines on a plain thread so a pending read never holds up shutdown
pub fn spawn_stdin_reader() -> anyhow::Result<AsyncReceiver<String>> {
    let (tx, rx) = kanal::bounded::<String>(16);

    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("stdin read failed: {}", e);
                        break;
                    }
                }
            }
        })?;

    Ok(rx.to_async())
}

/// Turn typed lines into user actions; end of input means quit
pub async fn input_loop(
    lines_rx: AsyncReceiver<String>,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    loop {
        let line = tokio::select! {
            line = lines_rx.recv() => line,
            _ = cancel.cancelled() => {
                tracing::debug!("input loop stopping");
                return Ok(());
            }
        };

        let Ok(line) = line else {
            tracing::info!("input closed");
            let _ = event_tx.send(AppEvent::Quit).await;
            return Ok(());
        };

        if line.trim().is_empty() {
            continue;
        }

        match parse_action(&line) {
            Some(event) => {
                if event_tx.send(event).await.is_err() {
                    return Ok(());
                }
            }
            None => tracing::warn!("unknown command {:?}, try capture, reset or quit", line.trim()),
        }
    }
}
