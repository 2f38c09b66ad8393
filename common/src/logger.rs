//! Tracing bootstrap shared by binaries and integration tests.
//!
//! Emits to a daily-rolling log file, and optionally to stdout when
//! `LOG_TO_STDOUT` is enabled. The returned guard must be held for the
//! lifetime of the process or buffered log lines are lost on exit.

use crate::config::AppConfig;
use tracing_appender::rolling;

/// Initializes the global tracing subscriber from [`AppConfig`].
///
/// The filter is read from the `LOG_LEVEL` environment variable, falling
/// back to the configured `log_level` field.
///
/// # Panics
/// Panics if a global subscriber has already been installed.
pub fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let (log_file, log_level, log_to_stdout) = {
        let cfg = AppConfig::global();
        (
            cfg.log_file.clone(),
            cfg.log_level.clone(),
            cfg.log_to_stdout,
        )
    };

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(true);

    let env_filter =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if log_to_stdout {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}
