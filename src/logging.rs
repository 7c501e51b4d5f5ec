//! Tracing setup for the service and CLI.
//!
//! Console output is human-readable; the file under [`LOG_DIR`] gets one JSON
//! object per event and rolls over daily. `RUST_LOG` replaces
//! [`DEFAULT_LOG_FILTER`] when set.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_DIR: &str = "logs";
pub const LOG_FILE_PREFIX: &str = "cf_standings.log";
pub const DEFAULT_LOG_FILTER: &str = "cf_standings=info,warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber. Buffered file output is flushed when the
/// returned guard drops, so hold it until `main` returns.
pub fn init_logging() -> WorkerGuard {
    init_logging_in(Path::new(LOG_DIR))
}

pub fn init_logging_in(dir: &Path) -> WorkerGuard {
    if let Err(err) = std::fs::create_dir_all(dir) {
        eprintln!("cannot create log directory {}: {}", dir.display(), err);
    }

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX));

    let registry = tracing_subscriber::registry()
        .with(env_filter())
        .with(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .with(fmt::layer().compact().with_target(true));

    if registry.try_init().is_err() {
        eprintln!("tracing subscriber already installed, keeping it");
    }
    guard
}
