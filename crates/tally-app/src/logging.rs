//! Tracing setup.
//!
//! Logs go to stderr (stdout is the display) or, when a log directory is
//! configured, to a daily rolling file written off-thread.

use tally_config::logging::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "receipt-tally.log";

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. The returned guard flushes the
/// file writer and must be held until the program exits.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(env_filter);

    match &config.dir {
        Some(dir) => {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("cannot create log directory {}: {e}", dir.display());
                return None;
            }

            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let result = if config.json {
                registry
                    .with(fmt::layer().json().with_writer(non_blocking))
                    .try_init()
            } else {
                registry
                    .with(
                        fmt::layer()
                            .with_target(true)
                            .with_thread_ids(true)
                            .with_line_number(true)
                            .with_ansi(false)
                            .with_writer(non_blocking),
                    )
                    .try_init()
            };

            if result.is_err() {
                return None;
            }

            tracing::info!(
                "Logging initialized (file {}): level={}, format={}",
                dir.display(),
                config.level,
                if config.json { "json" } else { "text" }
            );
            Some(guard)
        }
        None => {
            let result = if config.json {
                registry
                    .with(fmt::layer().json().with_writer(std::io::stderr))
                    .try_init()
            } else {
                registry
                    .with(
                        fmt::layer()
                            .with_target(false)
                            .with_ansi(atty::is(atty::Stream::Stderr))
                            .with_writer(std::io::stderr),
                    )
                    .try_init()
            };

            if let Err(e) = result {
                eprintln!("logging already initialized: {e}");
            }
            None
        }
    }
}
