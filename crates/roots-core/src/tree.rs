//! Resident family tree
//!
//! [`FamilyTree`] owns the last document snapshot together with the
//! identity index and graph derived from it. Change notifications re-read
//! only the locations they name and mark the derived state dirty; the next
//! read rebuilds it synchronously under a single lock, so a reader never
//! sees an index and a graph from different snapshots.

use crate::config::RootsConfig;
use crate::error::Result;
use parking_lot::Mutex;
use roots_graph::{build_graph, plan_fix, read_people, FamilyGraph, FamilyValidator, FixKind, MetadataEdit};
use roots_index::{IdentityIndex, LinkResolution};
use roots_model::{
    ChangeEvent, ChangeKind, Document, DocumentSink, DocumentStore, Finding, FindingCode, Location, StoreError,
};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One location as read from the store
enum Fetched {
    Document(Document),
    Missing,
    Malformed(Finding),
}

#[derive(Debug, Default)]
struct TreeState {
    snapshot: BTreeMap<Location, Document>,
    index: IdentityIndex,
    graph: Arc<FamilyGraph>,
    /// Findings raised while reading documents, before any graph work
    document_findings: Vec<Finding>,
    /// Documents whose metadata could not be decoded, kept out of the snapshot
    unreadable: BTreeMap<Location, Finding>,
    generation: u64,
    dirty: bool,
}

/// Cached snapshot, index and graph over a document store
#[derive(Debug, Default)]
pub struct FamilyTree {
    config: RootsConfig,
    state: Mutex<TreeState>,
}

impl FamilyTree {
    /// Create empty tree
    #[inline]
    #[must_use]
    pub fn new(config: RootsConfig) -> Self {
        Self {
            config,
            state: Mutex::new(TreeState::default()),
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RootsConfig {
        &self.config
    }

    /// Replace the snapshot with every document in `store`
    ///
    /// A document with undecodable metadata is left out of the snapshot and
    /// reported as a `MalformedStructure` finding; the rest still load.
    ///
    /// # Errors
    /// Returns [`crate::RootsError::Store`] when the store cannot be listed
    /// or a listed document fails with an I/O error.
    pub fn load<S: DocumentStore + ?Sized>(&self, store: &S) -> Result<()> {
        let locations = store.list_documents()?;
        let mut snapshot = BTreeMap::new();
        let mut unreadable = BTreeMap::new();
        for location in locations {
            match self.fetch(store, &location)? {
                Fetched::Document(document) => {
                    snapshot.insert(location, document);
                }
                Fetched::Malformed(finding) => {
                    unreadable.insert(location, finding);
                }
                Fetched::Missing => {}
            }
        }

        let mut state = self.state.lock();
        tracing::info!(
            documents = snapshot.len(),
            unreadable = unreadable.len(),
            "snapshot loaded"
        );
        state.snapshot = snapshot;
        state.unreadable = unreadable;
        state.dirty = true;
        Ok(())
    }

    /// Apply one change event, re-reading only the location it names
    ///
    /// A document that vanished between the event and the read is treated
    /// as deleted. One whose metadata no longer decodes leaves the snapshot
    /// and is reported until it is fixed or removed.
    ///
    /// # Errors
    /// Returns [`crate::RootsError::Store`] for I/O failures.
    pub fn notify<S: DocumentStore + ?Sized>(&self, store: &S, event: &ChangeEvent) -> Result<()> {
        let fetched = if event.kind == ChangeKind::Deleted {
            Fetched::Missing
        } else {
            self.fetch(store, &event.location)?
        };

        let mut state = self.state.lock();
        if let Some(vacated) = event.vacated() {
            state.snapshot.remove(vacated);
            state.unreadable.remove(vacated);
            state.index.forget(vacated);
        }
        match fetched {
            Fetched::Document(document) => {
                state.unreadable.remove(&event.location);
                state.snapshot.insert(event.location.clone(), document);
            }
            Fetched::Malformed(finding) => {
                state.snapshot.remove(&event.location);
                state.index.forget(&event.location);
                state.unreadable.insert(event.location.clone(), finding);
            }
            Fetched::Missing => {
                state.snapshot.remove(&event.location);
                state.unreadable.remove(&event.location);
                state.index.forget(&event.location);
            }
        }
        state.dirty = true;
        tracing::debug!(location = %event.location, kind = ?event.kind, "change applied");
        Ok(())
    }

    /// Drain the store's pending changes into the snapshot
    ///
    /// Returns the number of events applied.
    ///
    /// # Errors
    /// See [`FamilyTree::notify`].
    pub fn sync<S: DocumentStore + ?Sized>(&self, store: &mut S) -> Result<usize> {
        let events = store.poll_changes();
        for event in &events {
            self.notify(store, event)?;
        }
        Ok(events.len())
    }

    /// Mark derived state stale without touching the snapshot
    pub fn invalidate(&self) {
        let mut state = self.state.lock();
        state.index.invalidate();
        state.dirty = true;
    }

    /// Current graph, rebuilt first if stale
    #[must_use]
    pub fn graph(&self) -> Arc<FamilyGraph> {
        let mut state = self.state.lock();
        Self::refresh(&mut state);
        Arc::clone(&state.graph)
    }

    /// Every finding for the current snapshot, most severe first
    #[must_use]
    pub fn validate(&self) -> Vec<Finding> {
        let mut state = self.state.lock();
        Self::refresh(&mut state);
        let mut findings = FamilyValidator::new().validate(&state.graph, &state.index);
        findings.extend(state.document_findings.iter().cloned());
        findings.extend(state.unreadable.values().cloned());
        findings.sort_by_key(|f| Reverse(f.severity));
        findings
    }

    /// Resolve a textual link against the current index
    #[must_use]
    pub fn resolve_link(&self, text: &str) -> LinkResolution {
        let mut state = self.state.lock();
        Self::refresh(&mut state);
        state.index.resolve_link(text)
    }

    /// Number of rebuilds so far
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// Whether the next read will rebuild
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }

    /// Number of documents in the snapshot, person or not
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.state.lock().snapshot.len()
    }

    /// Run one fix category against `store`
    ///
    /// Pending changes are synced and the graph rebuilt before planning, so
    /// the edits always reflect the store's current contents. Edits that
    /// would not change a document are skipped. Returns the edits written.
    ///
    /// # Errors
    /// Returns [`crate::RootsError::Store`] when a document cannot be read
    /// or written.
    pub fn apply_fix<S>(&self, kind: FixKind, store: &mut S) -> Result<Vec<MetadataEdit>>
    where
        S: DocumentStore + DocumentSink + ?Sized,
    {
        self.sync(store)?;
        let edits = plan_fix(kind, &self.graph());

        let mut applied = Vec::with_capacity(edits.len());
        for edit in edits {
            let mut metadata = store.read_metadata(edit.location())?;
            if edit.apply(&mut metadata) {
                store.write_metadata(edit.location(), metadata)?;
                applied.push(edit);
            }
        }

        if !applied.is_empty() {
            self.sync(store)?;
            self.invalidate();
        }
        tracing::info!(fix = %kind, edits = applied.len(), "fix applied");
        Ok(applied)
    }

    fn fetch<S: DocumentStore + ?Sized>(&self, store: &S, location: &Location) -> Result<Fetched> {
        match store.read_document(location) {
            Ok(mut document) => {
                if !self.config.aliases.is_empty() {
                    document.metadata = document.metadata.with_aliases(&self.config.aliases);
                }
                Ok(Fetched::Document(document))
            }
            Err(StoreError::NotFound(_)) => Ok(Fetched::Missing),
            Err(StoreError::Malformed { location, message }) => {
                tracing::warn!(%location, %message, "document metadata unreadable");
                let finding = Finding::new(
                    FindingCode::MalformedStructure,
                    format!("metadata cannot be read: {message}"),
                )
                .with_location(location);
                Ok(Fetched::Malformed(finding))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn refresh(state: &mut TreeState) {
        if !state.dirty {
            return;
        }
        let (records, document_findings) = read_people(state.snapshot.values()).into_parts();
        let conflicts = state.index.rebuild(
            records
                .iter()
                .map(|r| (r.location.clone(), r.id.clone(), r.name.clone())),
        );
        let graph = build_graph(&records, &state.index).value;

        state.graph = Arc::new(graph);
        state.document_findings = document_findings;
        state.generation += 1;
        state.dirty = false;
        tracing::info!(
            generation = state.generation,
            people = state.graph.len(),
            id_conflicts = conflicts.len(),
            "family tree rebuilt"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use roots_model::FindingCode;
    use roots_test_utils::PersonDoc;

    fn store() -> MemoryStore {
        MemoryStore::with_documents([
            PersonDoc::new("People/Dad.md").id("d").name("Dad").sex("M").list("children_id", &["k"]).build(),
            PersonDoc::new("People/Kid.md").id("k").name("Kid").text("father_id", "d").build(),
        ])
    }

    #[test]
    fn rebuilds_lazily() {
        let tree = FamilyTree::default();
        tree.load(&store()).unwrap();
        assert!(tree.is_dirty());
        assert_eq!(tree.generation(), 0);

        let graph = tree.graph();
        assert_eq!(graph.len(), 2);
        assert_eq!(tree.generation(), 1);

        let _ = tree.graph();
        assert_eq!(tree.generation(), 1);
    }

    #[test]
    fn sync_reads_only_changed_documents() {
        let mut store = store();
        let tree = FamilyTree::default();
        tree.load(&store).unwrap();
        let _ = tree.graph();

        store.remove(&Location::new("People/Dad.md"));
        assert_eq!(tree.sync(&mut store).unwrap(), 1);
        assert!(tree.is_dirty());

        let graph = tree.graph();
        assert_eq!(graph.len(), 1);
        assert_eq!(tree.document_count(), 1);
        assert!(tree
            .validate()
            .iter()
            .any(|f| f.code == FindingCode::UnresolvedReference));
    }

    #[test]
    fn aliases_apply_on_read() {
        let config = RootsConfig::new().with_alias("dad", "father");
        let store = MemoryStore::with_documents([
            PersonDoc::new("People/Dad.md").id("d").name("Dad").sex("M").build(),
            PersonDoc::new("People/Kid.md").id("k").name("Kid").text("dad", "[[Dad]]").build(),
        ]);
        let tree = FamilyTree::new(config);
        tree.load(&store).unwrap();

        let graph = tree.graph();
        let kid = graph.get(&"k".into()).unwrap();
        assert_eq!(kid.father.as_ref().map(|id| id.as_str()), Some("d"));
    }

    #[test]
    fn fix_writes_through_store_and_invalidates() {
        let mut store = MemoryStore::with_documents([
            PersonDoc::new("People/Dad.md").id("d").name("Dad").sex("M").build(),
            PersonDoc::new("People/Kid.md").id("k").name("Kid").text("father_id", "d").build(),
        ]);
        let tree = FamilyTree::default();
        tree.load(&store).unwrap();

        let applied = tree.apply_fix(FixKind::AddMissingReciprocalLinks, &mut store).unwrap();
        assert_eq!(applied.len(), 1);
        let dad = store.get(&Location::new("People/Dad.md")).unwrap();
        assert_eq!(dad.metadata.text("children_id"), Some("k"));

        assert!(tree.graph().reciprocal_gaps().is_empty());
        assert!(tree
            .apply_fix(FixKind::AddMissingReciprocalLinks, &mut store)
            .unwrap()
            .is_empty());
    }
}
