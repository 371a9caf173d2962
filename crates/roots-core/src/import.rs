//! GEDCOM import
//!
//! Runs the interchange pipeline, turns every individual into a person
//! document, writes the documents through a [`DocumentSink`] and builds the
//! graph from what was written.
//!
//! Relationships come from family records only; extraction has already
//! reconciled them with the individuals' own `FAMC`/`FAMS` links. Both
//! sides of every relationship are written so the resulting documents are
//! reciprocal from the start.

use crate::config::ImportOptions;
use crate::error::Result;
use roots_gedcom::{read_gedcom, GedcomData, Individual, RefState};
use roots_graph::document::{CHILDREN_PEDIGREE_KEY, ID_KEY, PERSON_TYPE, TYPE_KEY};
use roots_graph::{build_graph, read_people, FamilyGraph, RelationKind};
use roots_index::{wikilink, IdentityIndex};
use roots_model::{
    CancelToken, Document, DocumentSink, FieldValue, Finding, Location, Metadata, Pedigree, PersonId, Sex,
};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Characters that cannot appear in a document file name or a wikilink
const UNSAFE_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', '[', ']', '#', '^'];

/// What an import produced
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Interchange xref → canonical id
    pub ids: BTreeMap<String, PersonId>,
    /// Documents written, in order
    pub written: Vec<Location>,
    /// Parse, extraction and graph findings
    pub findings: Vec<Finding>,
    /// Stopped early
    pub cancelled: bool,
    /// Graph over the written documents
    pub graph: FamilyGraph,
}

/// Relationship entries gathered for one individual
#[derive(Debug, Default)]
struct Relations(BTreeMap<RelationKind, Vec<(String, Pedigree)>>);

impl Relations {
    fn add(&mut self, kind: RelationKind, xref: &str, pedigree: Pedigree) {
        let entries = self.0.entry(kind).or_default();
        if !entries.iter().any(|(x, _)| x == xref) {
            entries.push((xref.to_string(), pedigree));
        }
    }
}

/// GEDCOM importer
#[derive(Debug, Clone, Default)]
pub struct Importer {
    options: ImportOptions,
}

impl Importer {
    /// Create importer
    #[inline]
    #[must_use]
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    /// Import raw interchange bytes into `sink`
    ///
    /// The token is polled between top-level records and before every
    /// write. Documents written before cancellation stay written.
    ///
    /// # Errors
    /// Returns [`crate::RootsError::Store`] when the sink refuses a write.
    pub fn run<S>(&self, bytes: &[u8], sink: &mut S, cancel: &CancelToken) -> Result<ImportReport>
    where
        S: DocumentSink + ?Sized,
    {
        let (data, findings) = read_gedcom(bytes, cancel).into_parts();
        let mut report = ImportReport {
            findings,
            cancelled: data.cancelled,
            ..ImportReport::default()
        };

        let (ids, documents) = self.plan(&data, &|location| sink.exists(location));
        report.ids = ids;

        let mut written = Vec::with_capacity(documents.len());
        for document in documents {
            if cancel.is_cancelled() {
                tracing::info!(written = written.len(), "import cancelled");
                report.cancelled = true;
                break;
            }
            sink.write_document(document.clone())?;
            report.written.push(document.location.clone());
            written.push(document);
        }

        let mut out = read_people(&written);
        let mut index = IdentityIndex::new();
        let conflicts = index.rebuild(
            out.value
                .iter()
                .map(|r| (r.location.clone(), r.id.clone(), r.name.clone())),
        );
        for conflict in &conflicts {
            tracing::warn!(error = %conflict, "identity conflict in imported documents");
        }
        let built = build_graph(&out.value, &index);
        report.graph = out.absorb(built);
        report.findings.extend(out.findings);

        tracing::info!(
            people = report.written.len(),
            findings = report.findings.len(),
            cancelled = report.cancelled,
            "import finished"
        );
        Ok(report)
    }

    /// Documents for every individual, without writing anything
    ///
    /// `taken` reports locations already occupied in the target store.
    #[must_use]
    pub fn plan(
        &self,
        data: &GedcomData,
        taken: &dyn Fn(&Location) -> bool,
    ) -> (BTreeMap<String, PersonId>, Vec<Document>) {
        let ids: BTreeMap<String, PersonId> = data
            .individuals
            .iter()
            .map(|indi| (indi.xref.clone(), PersonId::generate()))
            .collect();

        let mut used = HashSet::new();
        let locations: HashMap<&str, Location> = data
            .individuals
            .iter()
            .map(|indi| {
                let location = self.unique_location(&indi.display_name(), &mut used, taken);
                (indi.xref.as_str(), location)
            })
            .collect();

        let relations = gather_relations(data, &ids);
        let documents = data
            .individuals
            .iter()
            .filter_map(|indi| {
                let id = ids.get(&indi.xref)?;
                let location = locations.get(indi.xref.as_str())?;
                let empty = Relations::default();
                let rel = relations.get(indi.xref.as_str()).unwrap_or(&empty);
                Some(self.person_document(data, indi, id, location, rel, &ids, &locations))
            })
            .collect();
        (ids, documents)
    }

    fn unique_location(
        &self,
        name: &str,
        used: &mut HashSet<Location>,
        taken: &dyn Fn(&Location) -> bool,
    ) -> Location {
        let base: String = name
            .chars()
            .map(|c| if UNSAFE_NAME_CHARS.contains(&c) { '-' } else { c })
            .collect();
        let base = match base.trim() {
            "" => "Unknown",
            trimmed => trimmed,
        };

        let mut n = 1;
        loop {
            let file = if n == 1 {
                format!("{base}.md")
            } else {
                format!("{base} {n}.md")
            };
            let location = Location::join(&self.options.people_folder, &file);
            if !used.contains(&location) && !taken(&location) {
                used.insert(location.clone());
                return location;
            }
            n += 1;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn person_document(
        &self,
        data: &GedcomData,
        indi: &Individual,
        id: &PersonId,
        location: &Location,
        relations: &Relations,
        ids: &BTreeMap<String, PersonId>,
        locations: &HashMap<&str, Location>,
    ) -> Document {
        let name = indi.display_name();
        let mut meta = Metadata::new();
        meta.insert(TYPE_KEY, PERSON_TYPE);
        meta.insert(ID_KEY, id.as_str());
        meta.insert("name", name.as_str());
        if let Some(letter) = indi.sex.as_letter() {
            meta.insert("sex", letter);
        }
        for (tag, date_key, place_key) in [("BIRT", "born", "born_place"), ("DEAT", "died", "died_place")] {
            if let Some(event) = indi.event(tag) {
                if let Some(date) = &event.date {
                    meta.insert(date_key, date.as_str());
                }
                if let Some(place) = &event.place {
                    meta.insert(place_key, place.as_str());
                }
            }
        }

        for (kind, entries) in &relations.0 {
            let targets: Vec<(&PersonId, &Location, Pedigree)> = entries
                .iter()
                .filter_map(|(xref, pedigree)| Some((ids.get(xref)?, locations.get(xref.as_str())?, *pedigree)))
                .collect();
            if targets.is_empty() {
                continue;
            }
            meta.insert(
                kind.id_field(),
                FieldValue::List(targets.iter().map(|(id, _, _)| id.to_string()).collect()),
            );
            if self.options.wikilinks {
                meta.insert(
                    kind.link_field(),
                    FieldValue::List(
                        targets
                            .iter()
                            .map(|(_, loc, _)| wikilink(loc.without_extension()))
                            .collect(),
                    ),
                );
            }
            if *kind == RelationKind::Child && targets.iter().any(|(_, _, p)| *p != Pedigree::Biological) {
                meta.insert(
                    CHILDREN_PEDIGREE_KEY,
                    FieldValue::List(targets.iter().map(|(_, _, p)| p.as_str().to_string()).collect()),
                );
            }
        }

        let citations = indi
            .citations
            .iter()
            .chain(indi.events.iter().flat_map(|e| e.citations.iter()));
        let sources = distinct(citations.filter_map(|c| data.content_of(&c.source)));
        if !sources.is_empty() {
            meta.insert("sources", FieldValue::from_values(sources));
        }
        let media = distinct(indi.media.iter().filter_map(|m| data.content_of(m)));
        if !media.is_empty() {
            meta.insert("media", FieldValue::from_values(media));
        }

        let mut body = format!("# {name}\n");
        if self.options.notes_in_body {
            let notes = indi
                .notes
                .iter()
                .chain(indi.events.iter().flat_map(|e| e.notes.iter()));
            for note in notes.filter(|n| !n.is_dangling()) {
                if let Some(text) = data.content_of(note).filter(|t| !t.trim().is_empty()) {
                    body.push('\n');
                    body.push_str(text.trim());
                    body.push('\n');
                }
            }
        }

        Document::new(location.clone(), meta, body)
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values.map(str::trim).filter(|v| !v.is_empty()) {
        if !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

/// Relationship entries per individual, taken from family records
fn gather_relations<'d>(data: &'d GedcomData, ids: &BTreeMap<String, PersonId>) -> HashMap<&'d str, Relations> {
    let mut relations: HashMap<&str, Relations> = HashMap::new();
    let known = |xref: Option<&'d str>| xref.filter(|x| ids.contains_key(*x));

    for family in &data.families {
        let husband = known(family.husband.as_deref());
        let wife = known(family.wife.as_deref());

        if let (Some(h), Some(w)) = (husband, wife) {
            relations.entry(h).or_default().add(RelationKind::Spouse, w, Pedigree::Biological);
            relations.entry(w).or_default().add(RelationKind::Spouse, h, Pedigree::Biological);
        }

        for link in &family.children {
            if link.state == RefState::Dangling || !ids.contains_key(&link.child) {
                continue;
            }
            for (parent, pedigree, sex) in [(husband, link.father, Sex::Male), (wife, link.mother, Sex::Female)] {
                let Some(parent) = parent else {
                    continue;
                };
                let Some(kind) = RelationKind::parent_slot(pedigree, sex) else {
                    continue;
                };
                relations.entry(link.child.as_str()).or_default().add(kind, parent, pedigree);
                relations.entry(parent).or_default().add(RelationKind::Child, &link.child, pedigree);
            }
        }
    }
    relations
}
