//! Logging Infrastructure
//!
//! Console logging for development, optional daily rolling files for the
//! till machine.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "pos-server";

fn env_filter(level: &str) -> EnvFilter {
    // RUST_LOG wins over the configured level
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize console logging at `info`
pub fn init_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_target(false)
        .try_init();
}

/// Initialize the logger with optional JSON format and file output
///
/// With `log_dir` set, logs go to `<log_dir>/pos-server.<date>` instead of
/// stdout. Keep the returned guard alive until shutdown so buffered lines
/// are flushed.
pub fn init_logger_with_file(
    log_level: Option<&str>,
    json: bool,
    log_dir: Option<&str>,
) -> std::io::Result<Option<WorkerGuard>> {
    let filter = env_filter(log_level.unwrap_or("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let Some(dir) = log_dir else {
        if json {
            let _ = builder.json().try_init();
        } else {
            let _ = builder.try_init();
        }
        return Ok(None);
    };

    let log_path = Path::new(dir);
    std::fs::create_dir_all(log_path)?;
    let file_appender = tracing_appender::rolling::daily(log_path, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let builder = builder.with_writer(writer).with_ansi(false);
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
    Ok(Some(guard))
}
