//! Fix planning
//!
//! Each [`FixKind`] turns the current graph into a list of
//! [`MetadataEdit`]s. Plans are computed from a fresh build, so running a
//! fix a second time plans nothing.

use crate::document::{CHILDREN_PEDIGREE_KEY, ID_KEY};
use crate::graph::FamilyGraph;
use crate::record::RelationKind;
use roots_index::{wikilink, LinkText};
use roots_model::{FieldValue, FindingCode, Location, Metadata, Pedigree, PersonId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Category of repair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixKind {
    /// Give every person document without `cr_id` a fresh id
    AssignMissingIdentifiers,
    /// Give later holders of a shared id a fresh one
    ReassignDuplicateIdentities,
    /// Write the silent side of one-sided relationships
    AddMissingReciprocalLinks,
    /// Drop repeated entries from relationship fields
    RemoveDuplicateLinks,
}

impl FixKind {
    /// Every fix, in the order they are best applied
    pub const ALL: [Self; 4] = [
        Self::AssignMissingIdentifiers,
        Self::ReassignDuplicateIdentities,
        Self::RemoveDuplicateLinks,
        Self::AddMissingReciprocalLinks,
    ];

    /// Finding code the fix clears
    #[must_use]
    pub fn code(self) -> FindingCode {
        match self {
            Self::AssignMissingIdentifiers => FindingCode::MissingIdentifier,
            Self::ReassignDuplicateIdentities => FindingCode::DuplicateIdentity,
            Self::AddMissingReciprocalLinks => FindingCode::MissingReciprocalLink,
            Self::RemoveDuplicateLinks => FindingCode::DuplicateLink,
        }
    }

    /// Stable string form
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AssignMissingIdentifiers => "assign-missing-identifiers",
            Self::ReassignDuplicateIdentities => "reassign-duplicate-identities",
            Self::AddMissingReciprocalLinks => "add-missing-reciprocal-links",
            Self::RemoveDuplicateLinks => "remove-duplicate-links",
        }
    }
}

impl fmt::Display for FixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FixKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown fix kind: {s}"))
    }
}

/// One change to one document's metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "edit", rename_all = "snake_case")]
pub enum MetadataEdit {
    /// Replace a field with a single value
    SetValue {
        /// Document
        location: Location,
        /// Field
        field: String,
        /// New value
        value: String,
    },
    /// Add a relationship entry, matching the style the field already uses
    AddRelation {
        /// Document
        location: Location,
        /// Relationship
        kind: RelationKind,
        /// Person to add
        id: PersonId,
        /// Wikilink to the person
        link: String,
        /// Pedigree for child entries
        pedigree: Pedigree,
    },
    /// Remove entries at positions from a relationship field
    RemoveEntries {
        /// Document
        location: Location,
        /// Relationship
        kind: RelationKind,
        /// Whether the id field (rather than the link field) holds them
        explicit: bool,
        /// Positions to drop
        positions: Vec<usize>,
    },
}

impl MetadataEdit {
    /// Document the edit applies to
    #[must_use]
    pub fn location(&self) -> &Location {
        match self {
            Self::SetValue { location, .. }
            | Self::AddRelation { location, .. }
            | Self::RemoveEntries { location, .. } => location,
        }
    }

    /// Apply to metadata; `false` when nothing changed
    pub fn apply(&self, meta: &mut Metadata) -> bool {
        match self {
            Self::SetValue { field, value, .. } => {
                if meta.text(field) == Some(value.as_str()) {
                    return false;
                }
                meta.insert(field.clone(), value.clone());
                true
            }
            Self::AddRelation {
                kind,
                id,
                link,
                pedigree,
                ..
            } => add_relation(meta, *kind, id, link, *pedigree),
            Self::RemoveEntries {
                kind,
                explicit,
                positions,
                ..
            } => remove_entries(meta, *kind, *explicit, positions),
        }
    }
}

impl fmt::Display for MetadataEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetValue { location, field, value } => write!(f, "{location}: set {field} = {value}"),
            Self::AddRelation { location, kind, id, .. } => write!(f, "{location}: add {id} to {kind}"),
            Self::RemoveEntries {
                location,
                kind,
                positions,
                ..
            } => write!(f, "{location}: remove {} duplicate {kind} entries", positions.len()),
        }
    }
}

fn link_entries(meta: &Metadata, kind: RelationKind) -> Vec<LinkText> {
    meta.get(kind.link_field())
        .values()
        .iter()
        .flat_map(|v| LinkText::parse_all(v))
        .collect()
}

fn link_values(links: &[LinkText]) -> FieldValue {
    FieldValue::List(links.iter().map(ToString::to_string).collect())
}

fn add_relation(meta: &mut Metadata, kind: RelationKind, id: &PersonId, link: &str, pedigree: Pedigree) -> bool {
    let mut ids = meta.get(kind.id_field()).values();
    let mut links = link_entries(meta, kind);
    let new_link = LinkText::parse(link);

    if ids.iter().any(|existing| existing == id.as_str()) {
        return false;
    }

    let slot = if ids.is_empty() && !links.is_empty() {
        if links.iter().any(|l| Some(l) == new_link.as_ref()) {
            return false;
        }
        let slot = links.len();
        links.extend(new_link);
        meta.insert(kind.link_field(), link_values(&links));
        slot
    } else {
        let slot = ids.len();
        let aligned = !links.is_empty() && links.len() == ids.len();
        ids.push(id.as_str().to_string());
        meta.insert(kind.id_field(), FieldValue::List(ids));
        if aligned {
            links.extend(new_link);
            meta.insert(kind.link_field(), link_values(&links));
        }
        slot
    };

    if kind == RelationKind::Child {
        let mut pedigrees = meta.get(CHILDREN_PEDIGREE_KEY).values();
        if pedigree != Pedigree::Biological || !pedigrees.is_empty() {
            pedigrees.resize(slot, Pedigree::Biological.as_str().to_string());
            pedigrees.push(pedigree.as_str().to_string());
            meta.insert(CHILDREN_PEDIGREE_KEY, FieldValue::List(pedigrees));
        }
    }
    true
}

fn remove_entries(meta: &mut Metadata, kind: RelationKind, explicit: bool, positions: &[usize]) -> bool {
    let keep = |i: &usize| !positions.contains(i);
    let before = meta.get(kind.id_field()).values().len() + link_entries(meta, kind).len();

    let ids = meta.get(kind.id_field()).values();
    let links = link_entries(meta, kind);
    let aligned = !links.is_empty() && links.len() == ids.len();

    if explicit {
        let kept: Vec<String> = ids.into_iter().enumerate().filter(|(i, _)| keep(i)).map(|(_, v)| v).collect();
        meta.insert(kind.id_field(), FieldValue::List(kept));
    }
    if !explicit || aligned {
        let kept: Vec<LinkText> = links.into_iter().enumerate().filter(|(i, _)| keep(i)).map(|(_, v)| v).collect();
        meta.insert(kind.link_field(), link_values(&kept));
    }
    if kind == RelationKind::Child {
        let pedigrees = meta.get(CHILDREN_PEDIGREE_KEY).values();
        if !pedigrees.is_empty() {
            let kept: Vec<String> = pedigrees
                .into_iter()
                .enumerate()
                .filter(|(i, _)| keep(i))
                .map(|(_, v)| v)
                .collect();
            meta.insert(CHILDREN_PEDIGREE_KEY, FieldValue::List(kept));
        }
    }

    let after = meta.get(kind.id_field()).values().len() + link_entries(meta, kind).len();
    after < before
}

/// Plan the edits for one fix
#[must_use]
pub fn plan_fix(kind: FixKind, graph: &FamilyGraph) -> Vec<MetadataEdit> {
    match kind {
        FixKind::AssignMissingIdentifiers => graph
            .missing_ids()
            .iter()
            .map(|location| MetadataEdit::SetValue {
                location: location.clone(),
                field: ID_KEY.to_string(),
                value: PersonId::generate().to_string(),
            })
            .collect(),
        FixKind::ReassignDuplicateIdentities => graph
            .identity_conflicts()
            .iter()
            .map(|conflict| MetadataEdit::SetValue {
                location: conflict.location.clone(),
                field: ID_KEY.to_string(),
                value: PersonId::generate().to_string(),
            })
            .collect(),
        FixKind::AddMissingReciprocalLinks => graph
            .reciprocal_gaps()
            .iter()
            .filter_map(|gap| {
                let target = graph.get(&gap.target)?;
                Some(MetadataEdit::AddRelation {
                    location: gap.location.clone(),
                    kind: gap.kind,
                    id: gap.target.clone(),
                    link: wikilink(target.location.without_extension()),
                    pedigree: gap.pedigree,
                })
            })
            .collect(),
        FixKind::RemoveDuplicateLinks => {
            let mut grouped: BTreeMap<(Location, String), Vec<usize>> = BTreeMap::new();
            for dup in graph.duplicates() {
                grouped
                    .entry((dup.location.clone(), dup.field.clone()))
                    .or_default()
                    .push(dup.position);
            }
            grouped
                .into_iter()
                .filter_map(|((location, field), positions)| {
                    let (kind, explicit) = RelationKind::ALL.into_iter().find_map(|kind| {
                        if kind.id_field() == field {
                            Some((kind, true))
                        } else if kind.link_field() == field {
                            Some((kind, false))
                        } else {
                            None
                        }
                    })?;
                    Some(MetadataEdit::RemoveEntries {
                        location,
                        kind,
                        explicit,
                        positions,
                    })
                })
                .collect()
        }
    }
}
