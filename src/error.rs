//src/error.rs

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading logs, ligand structures and summary tables.
#[derive(Debug, Error)]
pub enum DockingError {
    #[error("log file not found: {}", .0.display())]
    LogNotFound(PathBuf),

    #[error("CSV file not found: {}", .0.display())]
    CsvNotFound(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Structure file could not be parsed (bad counts line, truncated block, ...).
    #[error("malformed {format} file {}: {reason}", .path.display())]
    Malformed {
        format: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("unknown element symbol '{0}'")]
    UnknownElement(String),

    /// Chemistry that cannot be made consistent, e.g. an over-valent atom.
    #[error("sanitization failed: {0}")]
    Sanitize(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl DockingError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DockingError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(format: &'static str, path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DockingError::Malformed {
            format,
            path: path.into(),
            reason: reason.into(),
        }
    }
}
