//! In-memory document store
//!
//! Implements both halves of the store boundary and records a change event
//! for every mutation, so it can stand in for a live host in tests and
//! one-shot runs.

use roots_model::{
    ChangeEvent, ChangeKind, Document, DocumentSink, DocumentStore, Location, Metadata, StoreError,
};
use std::collections::BTreeMap;

/// Document store held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: BTreeMap<Location, Document>,
    pending: Vec<ChangeEvent>,
    read_only: bool,
}

impl MemoryStore {
    /// Empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with documents; no change events are queued
    #[must_use]
    pub fn with_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        Self {
            documents: documents
                .into_iter()
                .map(|doc| (doc.location.clone(), doc))
                .collect(),
            ..Self::default()
        }
    }

    /// Refuse writes through [`DocumentSink`]
    #[inline]
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Insert or replace, queueing `Created` or `Modified`
    pub fn insert(&mut self, document: Document) {
        let kind = if self.documents.contains_key(&document.location) {
            ChangeKind::Modified
        } else {
            ChangeKind::Created
        };
        self.pending.push(ChangeEvent::new(document.location.clone(), kind));
        self.documents.insert(document.location.clone(), document);
    }

    /// Remove, queueing `Deleted`
    pub fn remove(&mut self, location: &Location) -> Option<Document> {
        let removed = self.documents.remove(location)?;
        self.pending
            .push(ChangeEvent::new(location.clone(), ChangeKind::Deleted));
        Some(removed)
    }

    /// Move a document, queueing `Renamed`
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] when `from` does not exist.
    pub fn rename(&mut self, from: &Location, to: Location) -> Result<(), StoreError> {
        let mut document = self
            .documents
            .remove(from)
            .ok_or_else(|| StoreError::NotFound(from.clone()))?;
        document.location = to.clone();
        self.documents.insert(to.clone(), document);
        self.pending.push(ChangeEvent::new(
            to,
            ChangeKind::Renamed { from: from.clone() },
        ));
        Ok(())
    }

    /// Document at location
    #[must_use]
    pub fn get(&self, location: &Location) -> Option<&Document> {
        self.documents.get(location)
    }

    /// Every document in location order
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Number of documents
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// No documents
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn document(&self, location: &Location) -> Result<&Document, StoreError> {
        self.documents
            .get(location)
            .ok_or_else(|| StoreError::NotFound(location.clone()))
    }
}

impl DocumentStore for MemoryStore {
    fn list_documents(&self) -> Result<Vec<Location>, StoreError> {
        Ok(self.documents.keys().cloned().collect())
    }

    fn read_metadata(&self, location: &Location) -> Result<Metadata, StoreError> {
        Ok(self.document(location)?.metadata.clone())
    }

    fn read_body(&self, location: &Location) -> Result<String, StoreError> {
        Ok(self.document(location)?.body.clone())
    }

    fn poll_changes(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.pending)
    }
}

impl DocumentSink for MemoryStore {
    fn write_document(&mut self, document: Document) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        self.insert(document);
        Ok(())
    }

    fn write_metadata(&mut self, location: &Location, metadata: Metadata) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        let document = self
            .documents
            .get_mut(location)
            .ok_or_else(|| StoreError::NotFound(location.clone()))?;
        document.metadata = metadata;
        self.pending
            .push(ChangeEvent::new(location.clone(), ChangeKind::Modified));
        Ok(())
    }

    fn exists(&self, location: &Location) -> bool {
        self.documents.contains_key(location)
    }
}
