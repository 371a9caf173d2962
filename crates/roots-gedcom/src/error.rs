//! GEDCOM reading errors
//!
//! Malformed content never errors; it becomes findings. Only an input that
//! cannot be read at all is fatal.

use std::path::PathBuf;

/// Errors raised while reading an interchange file
#[derive(Debug, thiserror::Error)]
pub enum GedcomError {
    /// Input file could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl GedcomError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
