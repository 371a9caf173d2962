//! Error types for Roots Core
//!
//! Only unreadable input is fatal: store failures, unreadable files and
//! broken configuration. Everything the data itself gets wrong is a
//! [`roots_model::Finding`].

use roots_gedcom::GedcomError;
use roots_model::StoreError;
use std::path::PathBuf;

/// Main Roots error type
#[derive(Debug, thiserror::Error)]
pub enum RootsError {
    /// Document store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Interchange file could not be read
    #[error("gedcom error: {0}")]
    Gedcom(#[from] GedcomError),

    /// Configuration file is not valid TOML for [`crate::RootsConfig`]
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// IO error outside the store
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl RootsError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, RootsError>;
