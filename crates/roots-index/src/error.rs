//! Index errors

use roots_model::{Location, PersonId};

/// Errors raised while registering documents
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// Canonical id already held by another location
    #[error("id {id} at {location} is already held by {existing}")]
    DuplicateId {
        /// Contested id
        id: PersonId,
        /// Location registered first
        existing: Location,
        /// Location refused the id
        location: Location,
    },

    /// Location is empty
    #[error("cannot register an empty location")]
    EmptyLocation,
}
