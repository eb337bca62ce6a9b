//! Logging initialization.
//!
//! The TUI owns the terminal, so interactive runs log to a file under
//! ${GRAPHPING_HOME}/logs/; one-shot commands log to stderr. Filtering is
//! controlled by `RUST_LOG`, defaulting to `info`.

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes file logging for the TUI.
///
/// The returned guard must be held for the lifetime of the process, or
/// buffered log lines are lost on exit.
pub fn init_tui() -> Result<WorkerGuard> {
    let dir = crate::config::paths::logs_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::daily(&dir, "graphping.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

/// Initializes stderr logging for one-shot commands.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}
