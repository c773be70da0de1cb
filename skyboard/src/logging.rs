//! JSON logs to a file; the terminal belongs to the dashboard.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_DIRECTIVE: &str = "skyboard=info,skyboard_core=info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("failed to install log subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber, appending to `path`.
pub fn init_logging(path: &Path) -> Result<(), LoggingError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .try_init()?;

    Ok(())
}
