//! Tracing setup for the two ways powerdash runs.
//!
//! The dashboard owns stdout and stderr while it is up, so it logs to the
//! daily file named by [`crate::config::log_file_for`]. One-shot subcommands
//! log to stderr.

use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogLevel, LOG_FILE_PREFIX, LOG_FILE_SUFFIX};

/// Days of dashboard logs kept on disk.
const KEPT_LOG_FILES: usize = 7;

/// Keeps the file writer flushing until dropped at the end of `main`.
pub struct LogGuard {
    _guard: Option<WorkerGuard>,
}

/// The `--log-level` flag wins over the config file.
pub fn effective_level(configured: LogLevel, flag: Option<LogLevel>) -> Option<Level> {
    flag.unwrap_or(configured).as_tracing_level()
}

/// `RUST_LOG` directives still apply on top of `level`.
fn filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

/// Sends dashboard logs to a daily rolling file in `dir`.
///
/// Logging is skipped, with a note on stderr before the terminal is taken
/// over, when the directory cannot be created.
pub fn init_dashboard(level: Option<Level>, dir: &Path) -> LogGuard {
    let Some(level) = level else {
        return LogGuard { _guard: None };
    };

    let appender = std::fs::create_dir_all(dir)
        .map_err(|e| e.to_string())
        .and_then(|_| {
            RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_FILE_PREFIX)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(KEPT_LOG_FILES)
                .build(dir)
                .map_err(|e| e.to_string())
        });

    let appender = match appender {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Warning: logging disabled, cannot write to {}: {e}", dir.display());
            return LogGuard { _guard: None };
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_timer(UtcTime::rfc_3339())
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true);

    let _ = tracing_subscriber::registry()
        .with(filter(level))
        .with(layer)
        .try_init();

    LogGuard {
        _guard: Some(guard),
    }
}

/// Sends subcommand logs to stderr.
pub fn init_command(level: Option<Level>) {
    let Some(level) = level else {
        return;
    };

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(filter(level))
        .with(layer)
        .try_init();
}
