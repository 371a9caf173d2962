//! Store errors
//!
//! The only fatal conditions in the pipeline come from the host store:
//! a document that cannot be read or written.

use crate::id::Location;

/// Errors raised by a document store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Document does not exist
    #[error("document not found: {0}")]
    NotFound(Location),

    /// IO error while reading or writing
    #[error("io error at {location}: {source}")]
    Io {
        location: Location,
        #[source]
        source: std::io::Error,
    },

    /// Document exists but its metadata cannot be decoded
    #[error("malformed document {location}: {message}")]
    Malformed { location: Location, message: String },

    /// Store refuses writes
    #[error("store is read-only")]
    ReadOnly,
}

impl StoreError {
    /// Create IO error for location
    pub fn io_error(location: Location, source: std::io::Error) -> Self {
        Self::Io { location, source }
    }

    /// Create malformed-document error
    pub fn malformed(location: Location, message: impl Into<String>) -> Self {
        Self::Malformed {
            location,
            message: message.into(),
        }
    }
}
