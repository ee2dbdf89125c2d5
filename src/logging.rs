//! Run log setup.
//!
//! Every run gets its own `<log_dir>/<YYYYmmdd-HHMM>_download_corpus.log`,
//! opened in append mode and mirrored to stdout. Installed once, from `main`.

use crate::error::{FetchError, Result};
use chrono::{Local, NaiveDateTime};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log sink configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory holding the per-run log files
    pub dir: PathBuf,
    /// Level used when `RUST_LOG` is unset
    pub level: Level,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            level: Level::INFO,
        }
    }
}

/// Log file name for a run started at `started`
pub fn log_file_name(started: NaiveDateTime) -> String {
    format!("{}_download_corpus.log", started.format("%Y%m%d-%H%M"))
}

/// Install the global subscriber: console layer plus an ANSI-free file layer.
///
/// Returns the path of the run log.
pub fn init(config: &LogConfig) -> Result<PathBuf> {
    std::fs::create_dir_all(&config.dir)?;
    let path = config.dir.join(log_file_name(Local::now().naive_local()));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(
            fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| FetchError::Config(format!("Failed to install logger: {}", e)))?;

    Ok(path)
}
