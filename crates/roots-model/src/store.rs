//! Document store boundary
//!
//! The core never touches storage directly. Hosts implement
//! [`DocumentStore`] (and [`DocumentSink`] when writes are allowed); the
//! pipeline reads a full snapshot before any build pass begins.

use crate::error::StoreError;
use crate::id::Location;
use crate::metadata::Metadata;
use serde::{Deserialize, Serialize};

/// A person/family document: metadata plus free-text body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    /// Where the document lives
    pub location: Location,
    /// Typed metadata
    pub metadata: Metadata,
    /// Body text
    pub body: String,
}

impl Document {
    /// Create document
    #[inline]
    #[must_use]
    pub fn new(location: Location, metadata: Metadata, body: impl Into<String>) -> Self {
        Self {
            location,
            metadata,
            body: body.into(),
        }
    }
}

/// Kind of change reported by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// New document
    Created,
    /// Metadata or body edited
    Modified,
    /// Moved from another location
    Renamed {
        /// Previous location
        from: Location,
    },
    /// Document removed
    Deleted,
}

/// Change notification: `location` is the current (new) location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Affected location
    pub location: Location,
    /// What happened
    pub kind: ChangeKind,
}

impl ChangeEvent {
    /// Create event
    #[inline]
    #[must_use]
    pub fn new(location: Location, kind: ChangeKind) -> Self {
        Self { location, kind }
    }

    /// Locations that no longer hold the document after this event
    #[must_use]
    pub fn vacated(&self) -> Option<&Location> {
        match &self.kind {
            ChangeKind::Deleted => Some(&self.location),
            ChangeKind::Renamed { from } => Some(from),
            ChangeKind::Created | ChangeKind::Modified => None,
        }
    }
}

/// Read side of the host store
pub trait DocumentStore {
    /// All document locations
    fn list_documents(&self) -> Result<Vec<Location>, StoreError>;

    /// Metadata of one document
    fn read_metadata(&self, location: &Location) -> Result<Metadata, StoreError>;

    /// Body of one document
    fn read_body(&self, location: &Location) -> Result<String, StoreError>;

    /// Drain pending change notifications
    fn poll_changes(&mut self) -> Vec<ChangeEvent> {
        Vec::new()
    }

    /// Read a whole document
    fn read_document(&self, location: &Location) -> Result<Document, StoreError> {
        Ok(Document {
            location: location.clone(),
            metadata: self.read_metadata(location)?,
            body: self.read_body(location)?,
        })
    }
}

/// Write side of the host store
pub trait DocumentSink {
    /// Create or replace a whole document
    fn write_document(&mut self, document: Document) -> Result<(), StoreError>;

    /// Replace the metadata of an existing document, keeping its body
    fn write_metadata(&mut self, location: &Location, metadata: Metadata) -> Result<(), StoreError>;

    /// Whether a document exists at location
    fn exists(&self, location: &Location) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vacated_locations() {
        let deleted = ChangeEvent::new(Location::new("a.md"), ChangeKind::Deleted);
        assert_eq!(deleted.vacated(), Some(&Location::new("a.md")));

        let renamed = ChangeEvent::new(
            Location::new("b.md"),
            ChangeKind::Renamed {
                from: Location::new("a.md"),
            },
        );
        assert_eq!(renamed.vacated(), Some(&Location::new("a.md")));

        let modified = ChangeEvent::new(Location::new("a.md"), ChangeKind::Modified);
        assert_eq!(modified.vacated(), None);
    }
}
