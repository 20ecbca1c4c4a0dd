//! Tracing subscriber initialization and deduplicated reporting.
//!
//! Logs are written to a file; the markup core never prints. Segment and
//! resource failures go through [`once`] so a bad tag that is measured and
//! drawn every frame produces a single record.

pub mod once;

pub use once::{error_once, has_reported, warn_once};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info";

/// Why the log file subscriber could not be installed.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The directory holding the log file could not be created.
    #[error("cannot create log directory {path:?}: {source}")]
    DirectoryCreation {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The path ends in `..`, a root, or a non-UTF-8 name.
    #[error("log path {0:?} does not name a file")]
    InvalidPath(PathBuf),

    /// Another global subscriber got there first.
    #[error("a global tracing subscriber is already installed")]
    SubscriberAlreadySet,
}

/// Splits `log_path` into the directory to create and the file name the
/// appender writes to. A bare file name logs into the working directory.
fn appender_target(log_path: &Path) -> Result<(&Path, &str), LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;
    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((directory, file_name))
}

/// Install a global `fmt` subscriber writing plain text to `log_path`.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Missing
/// parent directories are created.
///
/// # Errors
///
/// See [`LoggingError`]. Calling this twice in one process always fails
/// with [`LoggingError::SubscriberAlreadySet`] on the second call.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    let (directory, file_name) = appender_target(log_path)?;
    std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.to_path_buf(),
        source,
    })?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(tracing_appender::rolling::never(directory, file_name))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}
