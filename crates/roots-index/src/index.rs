//! Identity index with radix trie
//!
//! Provides [`IdentityIndex`]: location ↔ canonical id, and display name →
//! set of locations. Locations are kept in a radix trie under their exact
//! text. Path links are matched exactly first, then case-insensitively; a
//! case-insensitive match shared by several locations stays ambiguous.

use crate::error::IndexError;
use crate::link::{name_key, LinkText};
use radix_trie::{Trie, TrieCommon};
use roots_model::{Location, PersonId};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Result of resolving a textual link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResolution {
    /// Exactly one document matches
    Resolved {
        /// Matching document
        location: Location,
        /// Its canonical id, when one is assigned
        id: Option<PersonId>,
    },
    /// Two or more documents match; none is picked
    Ambiguous {
        /// Every candidate, sorted
        candidates: Vec<Location>,
    },
    /// No document matches
    Unresolved,
}

impl LinkResolution {
    /// Whether a single document matched
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Indexed document
#[derive(Debug, Clone)]
struct Entry {
    location: Location,
    id: Option<PersonId>,
    names: BTreeSet<String>,
}

/// Entry returned from index lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Document location
    pub location: Location,
    /// Canonical id, when assigned
    pub id: Option<PersonId>,
}

/// Versioned identity index
///
/// An invalidated index is empty until rebuilt: it never answers from
/// mappings that predate the invalidation.
#[derive(Debug)]
pub struct IdentityIndex {
    /// Exact location → entry
    by_path: Trie<String, Entry>,
    /// Lower-cased location without extension → locations folding to it
    by_folded_path: HashMap<String, BTreeSet<Location>>,
    /// Canonical id → location (first registration wins)
    by_id: HashMap<PersonId, Location>,
    /// Name key → locations bearing that name
    by_name: HashMap<String, BTreeSet<Location>>,
    generation: u64,
    stale: bool,
}

impl Default for IdentityIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityIndex {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_path: Trie::new(),
            by_folded_path: HashMap::new(),
            by_id: HashMap::new(),
            by_name: HashMap::new(),
            generation: 0,
            stale: false,
        }
    }

    fn path_key(location: &Location) -> String {
        location.as_str().to_string()
    }

    fn folded_key(path: &str) -> String {
        path.to_lowercase()
    }

    /// Register a document
    ///
    /// Idempotent. The document is indexed by its display name and by its
    /// file base name. Re-registering a location replaces its previous
    /// mappings.
    ///
    /// # Errors
    /// Returns [`IndexError::DuplicateId`] when another location already
    /// holds `id`. The location and its names are indexed either way; only
    /// the id mapping is refused.
    pub fn register(
        &mut self,
        location: Location,
        id: Option<PersonId>,
        display_name: &str,
    ) -> Result<(), IndexError> {
        if location.as_str().is_empty() {
            return Err(IndexError::EmptyLocation);
        }
        self.forget(&location);

        let mut names = BTreeSet::new();
        for name in [display_name, location.display_name()] {
            let key = name_key(name);
            if !key.is_empty() {
                names.insert(key);
            }
        }
        for key in &names {
            self.by_name
                .entry(key.clone())
                .or_default()
                .insert(location.clone());
        }

        let mut conflict = None;
        let id = match id {
            Some(id) => match self.by_id.get(&id) {
                Some(existing) => {
                    conflict = Some(IndexError::DuplicateId {
                        id: id.clone(),
                        existing: existing.clone(),
                        location: location.clone(),
                    });
                    None
                }
                None => {
                    self.by_id.insert(id.clone(), location.clone());
                    Some(id)
                }
            },
            None => None,
        };

        self.by_folded_path
            .entry(Self::folded_key(location.without_extension()))
            .or_default()
            .insert(location.clone());
        self.by_path.insert(
            Self::path_key(&location),
            Entry {
                location,
                id,
                names,
            },
        );

        conflict.map_or(Ok(()), Err)
    }

    /// Evict a location immediately (deleted or renamed away)
    ///
    /// Returns whether the location was indexed.
    pub fn forget(&mut self, location: &Location) -> bool {
        let Some(entry) = self.by_path.remove(&Self::path_key(location)) else {
            return false;
        };
        debug_assert_eq!(&entry.location, location);

        let folded = Self::folded_key(entry.location.without_extension());
        if let Some(set) = self.by_folded_path.get_mut(&folded) {
            set.remove(&entry.location);
            if set.is_empty() {
                self.by_folded_path.remove(&folded);
            }
        }

        if let Some(id) = &entry.id {
            if self.by_id.get(id) == Some(&entry.location) {
                self.by_id.remove(id);
            }
        }
        for key in &entry.names {
            if let Some(set) = self.by_name.get_mut(key) {
                set.remove(&entry.location);
                if set.is_empty() {
                    self.by_name.remove(key);
                }
            }
        }
        true
    }

    /// Drop every mapping and mark the index stale
    pub fn invalidate(&mut self) {
        self.by_path = Trie::new();
        self.by_folded_path.clear();
        self.by_id.clear();
        self.by_name.clear();
        self.generation += 1;
        self.stale = true;
        tracing::debug!(generation = self.generation, "identity index invalidated");
    }

    /// Rebuild from scratch
    ///
    /// Returns the id conflicts met while registering.
    pub fn rebuild<I>(&mut self, documents: I) -> Vec<IndexError>
    where
        I: IntoIterator<Item = (Location, Option<PersonId>, String)>,
    {
        self.invalidate();
        let conflicts: Vec<IndexError> = documents
            .into_iter()
            .filter_map(|(location, id, name)| self.register(location, id, &name).err())
            .collect();
        self.stale = false;
        tracing::info!(
            generation = self.generation,
            documents = self.len(),
            conflicts = conflicts.len(),
            "identity index rebuilt"
        );
        conflicts
    }

    /// Resolve a textual link
    ///
    /// Paths are matched exactly first, then ignoring case; otherwise the
    /// base name is looked up among display and file names. Two or more
    /// matches at the deciding step are always
    /// [`LinkResolution::Ambiguous`].
    #[must_use]
    pub fn resolve_link(&self, text: &str) -> LinkResolution {
        let Some(link) = LinkText::parse(text) else {
            return LinkResolution::Unresolved;
        };
        self.resolve(&link)
    }

    /// Resolve an already-parsed link
    #[must_use]
    pub fn resolve(&self, link: &LinkText) -> LinkResolution {
        if link.has_path() {
            if let Some(set) = self.by_folded_path.get(&Self::folded_key(&link.target)) {
                let exact: Vec<&Location> = set
                    .iter()
                    .filter(|l| l.without_extension() == link.target)
                    .collect();
                if let [only] = exact.as_slice() {
                    return self.resolved(only);
                }
                if !set.is_empty() {
                    return self.pick(set.iter().cloned().collect());
                }
            }
        }

        let candidates: Vec<Location> = self
            .by_name
            .get(&name_key(link.base_name()))
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        self.pick(candidates)
    }

    fn resolved(&self, location: &Location) -> LinkResolution {
        LinkResolution::Resolved {
            location: location.clone(),
            id: self.id_of(location).cloned(),
        }
    }

    fn pick(&self, candidates: Vec<Location>) -> LinkResolution {
        match candidates.as_slice() {
            [] => LinkResolution::Unresolved,
            [only] => self.resolved(only),
            _ => LinkResolution::Ambiguous { candidates },
        }
    }

    /// Canonical id registered for a location
    #[must_use]
    pub fn id_of(&self, location: &Location) -> Option<&PersonId> {
        self.by_path
            .get(&Self::path_key(location))
            .and_then(|entry| entry.id.as_ref())
    }

    /// Location holding a canonical id
    #[inline]
    #[must_use]
    pub fn location_of(&self, id: &PersonId) -> Option<&Location> {
        self.by_id.get(id)
    }

    /// Locations bearing a display or file name
    #[must_use]
    pub fn locations_named(&self, name: &str) -> Vec<Location> {
        self.by_name
            .get(&name_key(name))
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether a location is indexed
    #[inline]
    #[must_use]
    pub fn contains(&self, location: &Location) -> bool {
        self.by_path.get(&Self::path_key(location)).is_some()
    }

    /// Entries under a folder prefix
    #[must_use]
    pub fn entries_under(&self, folder: &str) -> Vec<IndexEntry> {
        let prefix = folder.trim_matches('/');
        let entries: Vec<&Entry> = if prefix.is_empty() {
            self.by_path.values().collect()
        } else {
            self.by_path
                .get_raw_descendant(&format!("{prefix}/"))
                .map(|sub| sub.values().collect())
                .unwrap_or_default()
        };
        let mut out: Vec<IndexEntry> = entries
            .into_iter()
            .map(|e| IndexEntry {
                location: e.location.clone(),
                id: e.id.clone(),
            })
            .collect();
        out.sort_by(|a, b| a.location.cmp(&b.location));
        out
    }

    /// Names shared by two or more documents, with their locations
    #[must_use]
    pub fn ambiguous_names(&self) -> BTreeMap<String, Vec<Location>> {
        self.by_name
            .iter()
            .filter(|(_, set)| set.len() > 1)
            .map(|(name, set)| (name.clone(), set.iter().cloned().collect()))
            .collect()
    }

    /// Number of indexed documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// No indexed documents
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bumped on every invalidation
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalidated and not yet rebuilt
    #[inline]
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn loc(s: &str) -> Location {
        Location::new(s)
    }

    fn pid(s: &str) -> Option<PersonId> {
        Some(PersonId::new(s))
    }

    #[test]
    fn index_register_and_resolve() {
        let mut index = IdentityIndex::new();
        index.register(loc("People/John Smith.md"), pid("j1"), "John Smith").unwrap();

        let resolved = index.resolve_link("[[John Smith]]");
        assert_eq!(
            resolved,
            LinkResolution::Resolved {
                location: loc("People/John Smith.md"),
                id: pid("j1"),
            }
        );
        assert_eq!(index.location_of(&PersonId::new("j1")), Some(&loc("People/John Smith.md")));
    }

    #[test]
    fn index_register_is_idempotent() {
        let mut index = IdentityIndex::new();
        index.register(loc("a.md"), pid("a"), "Ann").unwrap();
        index.register(loc("a.md"), pid("a"), "Ann").unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.locations_named("ann"), vec![loc("a.md")]);
    }

    #[test]
    fn index_reregister_replaces_name() {
        let mut index = IdentityIndex::new();
        index.register(loc("a.md"), pid("a"), "Ann").unwrap();
        index.register(loc("a.md"), pid("a"), "Anne").unwrap();
        assert!(index.locations_named("Ann").is_empty());
        assert_eq!(index.locations_named("Anne"), vec![loc("a.md")]);
    }

    #[test]
    fn index_same_name_is_ambiguous() {
        let mut index = IdentityIndex::new();
        index.register(loc("People/John Smith.md"), pid("a"), "John Smith").unwrap();
        index.register(loc("People/John Smith 2.md"), pid("b"), "John Smith").unwrap();

        match index.resolve_link("John Smith") {
            LinkResolution::Ambiguous { candidates } => assert_eq!(
                candidates,
                vec![loc("People/John Smith 2.md"), loc("People/John Smith.md")]
            ),
            other => panic!("expected ambiguous, got {other:?}"),
        }
        assert!(index.resolve_link("John Smith 2").is_resolved());
        assert_eq!(index.ambiguous_names().len(), 1);
    }

    #[test]
    fn index_path_match_beats_name() {
        let mut index = IdentityIndex::new();
        index.register(loc("A/John Smith.md"), pid("a"), "John Smith").unwrap();
        index.register(loc("B/John Smith.md"), pid("b"), "John Smith").unwrap();

        assert_eq!(
            index.resolve_link("[[B/John Smith|John]]"),
            LinkResolution::Resolved {
                location: loc("B/John Smith.md"),
                id: pid("b"),
            }
        );
    }

    #[test]
    fn index_unknown_path_falls_back_to_name() {
        let mut index = IdentityIndex::new();
        index.register(loc("People/Jane.md"), pid("j"), "Jane").unwrap();
        assert!(index.resolve_link("Elsewhere/Jane").is_resolved());
    }

    #[test]
    fn index_rejects_duplicate_id() {
        let mut index = IdentityIndex::new();
        index.register(loc("a.md"), pid("same"), "A").unwrap();
        let result = index.register(loc("b.md"), pid("same"), "B");

        assert!(matches!(result, Err(IndexError::DuplicateId { .. })));
        assert_eq!(index.location_of(&PersonId::new("same")), Some(&loc("a.md")));
        assert!(index.contains(&loc("b.md")));
        assert_eq!(index.id_of(&loc("b.md")), None);
    }

    #[test]
    fn index_forget_evicts_immediately() {
        let mut index = IdentityIndex::new();
        index.register(loc("a.md"), pid("a"), "Ann").unwrap();
        assert!(index.forget(&loc("a.md")));

        assert_eq!(index.resolve_link("Ann"), LinkResolution::Unresolved);
        assert_eq!(index.location_of(&PersonId::new("a")), None);
        assert!(!index.forget(&loc("a.md")));
    }

    #[test]
    fn index_invalidate_then_rebuild() {
        let mut index = IdentityIndex::new();
        index.register(loc("a.md"), pid("a"), "Ann").unwrap();
        index.invalidate();
        assert!(index.is_stale());
        assert!(index.is_empty());

        let conflicts = index.rebuild(vec![
            (loc("b.md"), pid("b"), "Bob".to_string()),
            (loc("c.md"), pid("b"), "Cy".to_string()),
        ]);
        assert!(!index.is_stale());
        assert_eq!(index.len(), 2);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(index.generation(), 2);
    }

    #[test]
    fn index_locations_differing_in_case_stay_apart() {
        let mut index = IdentityIndex::new();
        index.register(loc("People/Ann Lee.md"), pid("a"), "Ann Lee").unwrap();
        index.register(loc("people/ann lee.md"), pid("b"), "Ann Lee").unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.location_of(&PersonId::new("a")), Some(&loc("People/Ann Lee.md")));
        assert_eq!(index.location_of(&PersonId::new("b")), Some(&loc("people/ann lee.md")));
        assert_eq!(
            index.resolve_link("[[Ann Lee]]"),
            LinkResolution::Ambiguous {
                candidates: vec![loc("People/Ann Lee.md"), loc("people/ann lee.md")],
            }
        );

        // an exact path still picks one, a case-folded one cannot
        assert_eq!(
            index.resolve_link("[[people/ann lee]]"),
            LinkResolution::Resolved {
                location: loc("people/ann lee.md"),
                id: pid("b"),
            }
        );
        assert!(matches!(
            index.resolve_link("[[PEOPLE/ANN LEE]]"),
            LinkResolution::Ambiguous { .. }
        ));

        assert!(index.forget(&loc("people/ann lee.md")));
        assert!(index.contains(&loc("People/Ann Lee.md")));
        assert_eq!(
            index.resolve_link("[[PEOPLE/ANN LEE]]"),
            LinkResolution::Resolved {
                location: loc("People/Ann Lee.md"),
                id: pid("a"),
            }
        );
    }

    #[test]
    fn index_entries_under_folder() {
        let mut index = IdentityIndex::new();
        index.register(loc("People/A.md"), None, "A").unwrap();
        index.register(loc("People/B.md"), None, "B").unwrap();
        index.register(loc("Other/C.md"), None, "C").unwrap();

        let people = index.entries_under("People");
        assert_eq!(people.len(), 2);
        assert_eq!(index.entries_under("").len(), 3);
    }
}
