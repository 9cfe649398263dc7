//! Diagnostic logging setup
//!
//! Diagnostics go through `tracing`, separate from the operator-facing status
//! lines of the report sink. Stderr always gets a layer; setting
//! `FTPPROBE_LOG_FILE` adds an append-mode file layer as well.
//!
//! SECURITY: Nothing in the crate passes password values to `tracing`.

use crate::constants::{LOG_FILE_ENV, LOG_FILTER_ENV, MAX_LOG_BYTES};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Verbosity chosen on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    pub verbose: bool,
    pub quiet: bool,
}

impl LogOptions {
    fn level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::WARN
        }
    }
}

/// Move the log file aside once it grows past `max_bytes`
pub fn rotate_if_needed(path: &Path, max_bytes: u64) {
    if let Ok(meta) = fs::metadata(path) {
        if meta.len() > max_bytes {
            let backup = path.with_extension("log.bak");
            let _ = fs::remove_file(&backup);
            let _ = fs::rename(path, &backup);
        }
    }
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    rotate_if_needed(path, MAX_LOG_BYTES);
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Install the global subscriber
///
/// `FTPPROBE_LOG` (an `EnvFilter` directive) overrides the level derived from
/// `options`. Calling this twice is harmless; the second call is ignored.
pub fn init_logger(options: LogOptions) {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(options.level().as_str().to_lowercase()));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let file_layer = std::env::var_os(LOG_FILE_ENV)
        .map(PathBuf::from)
        .and_then(|path| open_log_file(&path))
        .map(|file| {
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
        });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
}
