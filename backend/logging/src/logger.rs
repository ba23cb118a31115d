//! Subscriber setup for markscan binaries.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name prefix of the daily NDJSON log.
pub const LOG_FILE_PREFIX: &str = "markscan.log";

/// Install the global subscriber: human-readable lines on stderr and NDJSON
/// in `<log_dir>/markscan.log.YYYY-MM-DD`.
///
/// `RUST_LOG` overrides `level`. Stdout stays free for `markscan scan`
/// output. Keep the returned guard alive for the life of the process; the
/// file writer flushes its queue when it drops.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(file_writer)
                .with_ansi(false),
        );

    // Tests and embedders may have installed one already.
    if registry.try_init().is_err() {
        tracing::debug!("Global subscriber already set, keeping it");
    }
    guard
}
