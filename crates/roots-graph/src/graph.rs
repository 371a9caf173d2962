//! Family graph
//!
//! An arena of [`PersonNode`]s keyed by canonical id. Every edge is an id
//! lookup into the arena, so cycles in the data never become ownership
//! cycles.

use crate::record::RelationKind;
use indexmap::IndexMap;
use roots_index::name_key;
use roots_model::{Finding, Location, Pedigree, PersonId, Sex};
use serde::Serialize;
use std::collections::HashMap;

/// Child edge, tagged with the pedigree it was asserted under
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildEdge {
    /// Child id
    pub id: PersonId,
    /// Pedigree
    pub pedigree: Pedigree,
}

/// One person in the graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonNode {
    /// Canonical (or provisional) id
    pub id: PersonId,
    /// Source document
    pub location: Location,
    /// Display name
    pub name: String,
    /// Sex
    pub sex: Sex,
    /// Birth date as written
    pub born: Option<String>,
    /// Death date as written
    pub died: Option<String>,
    /// Biological father
    pub father: Option<PersonId>,
    /// Biological mother
    pub mother: Option<PersonId>,
    /// Step-fathers
    pub step_fathers: Vec<PersonId>,
    /// Step-mothers
    pub step_mothers: Vec<PersonId>,
    /// Adoptive father
    pub adoptive_father: Option<PersonId>,
    /// Adoptive mother
    pub adoptive_mother: Option<PersonId>,
    /// Foster parents
    pub foster_parents: Vec<PersonId>,
    /// Spouses
    pub spouses: Vec<PersonId>,
    /// Children
    pub children: Vec<ChildEdge>,
    /// Source references
    pub sources: Vec<String>,
    /// Media references
    pub media: Vec<String>,
}

/// Result of placing a parent into a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SlotFill {
    /// Newly placed
    Added,
    /// Already there
    Present,
    /// Single slot holds someone else
    Occupied(PersonId),
}

impl PersonNode {
    /// Node without relationships
    #[must_use]
    pub fn new(id: PersonId, location: Location, name: impl Into<String>) -> Self {
        Self {
            id,
            location,
            name: name.into(),
            sex: Sex::Unknown,
            born: None,
            died: None,
            father: None,
            mother: None,
            step_fathers: Vec::new(),
            step_mothers: Vec::new(),
            adoptive_father: None,
            adoptive_mother: None,
            foster_parents: Vec::new(),
            spouses: Vec::new(),
            children: Vec::new(),
            sources: Vec::new(),
            media: Vec::new(),
        }
    }

    /// Parents held in one slot
    #[must_use]
    pub fn parents_in(&self, kind: RelationKind) -> Vec<&PersonId> {
        match kind {
            RelationKind::Father => self.father.iter().collect(),
            RelationKind::Mother => self.mother.iter().collect(),
            RelationKind::AdoptiveFather => self.adoptive_father.iter().collect(),
            RelationKind::AdoptiveMother => self.adoptive_mother.iter().collect(),
            RelationKind::StepFather => self.step_fathers.iter().collect(),
            RelationKind::StepMother => self.step_mothers.iter().collect(),
            RelationKind::FosterParent => self.foster_parents.iter().collect(),
            RelationKind::Spouse | RelationKind::Child => Vec::new(),
        }
    }

    /// Every parent with the slot it sits in
    #[must_use]
    pub fn parents(&self) -> Vec<(RelationKind, &PersonId)> {
        RelationKind::ALL
            .into_iter()
            .filter(|kind| kind.is_parent())
            .flat_map(|kind| self.parents_in(kind).into_iter().map(move |id| (kind, id)))
            .collect()
    }

    /// Whether `child` is among the children
    #[must_use]
    pub fn has_child(&self, child: &PersonId) -> bool {
        self.children.iter().any(|edge| &edge.id == child)
    }

    pub(crate) fn fill_parent(&mut self, kind: RelationKind, parent: &PersonId) -> SlotFill {
        let single = match kind {
            RelationKind::Father => &mut self.father,
            RelationKind::Mother => &mut self.mother,
            RelationKind::AdoptiveFather => &mut self.adoptive_father,
            RelationKind::AdoptiveMother => &mut self.adoptive_mother,
            RelationKind::StepFather => return push_unique(&mut self.step_fathers, parent),
            RelationKind::StepMother => return push_unique(&mut self.step_mothers, parent),
            RelationKind::FosterParent => return push_unique(&mut self.foster_parents, parent),
            RelationKind::Spouse => return push_unique(&mut self.spouses, parent),
            RelationKind::Child => return SlotFill::Present,
        };
        if let Some(existing) = single.as_ref() {
            return if existing == parent {
                SlotFill::Present
            } else {
                SlotFill::Occupied(existing.clone())
            };
        }
        *single = Some(parent.clone());
        SlotFill::Added
    }

    pub(crate) fn add_child(&mut self, child: &PersonId, pedigree: Pedigree) {
        if !self.has_child(child) {
            self.children.push(ChildEdge {
                id: child.clone(),
                pedigree,
            });
        }
    }
}

fn push_unique(ids: &mut Vec<PersonId>, id: &PersonId) -> SlotFill {
    if ids.contains(id) {
        SlotFill::Present
    } else {
        ids.push(id.clone());
        SlotFill::Added
    }
}

/// Same target listed twice in one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateEntry {
    /// Person whose document holds the field
    pub holder: PersonId,
    /// Document
    pub location: Location,
    /// Field name
    pub field: String,
    /// Target as written
    pub target: String,
    /// Entry position within the field
    pub position: usize,
}

/// Relationship one side asserts and the other does not
///
/// Read as: `holder`'s document should list `target` under `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReciprocalGap {
    /// Silent side
    pub holder: PersonId,
    /// Silent side's document
    pub location: Location,
    /// Field kind to add
    pub kind: RelationKind,
    /// Person to add
    pub target: PersonId,
    /// Pedigree of a child entry
    pub pedigree: Pedigree,
}

/// Later holder of an id that an earlier document already claimed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityConflict {
    /// Shared id
    pub id: PersonId,
    /// Document that lost the id
    pub location: Location,
}

/// Answer to a name lookup
#[derive(Debug, Clone, PartialEq)]
pub enum NameLookup<'a> {
    /// Exactly one person
    Unique(&'a PersonNode),
    /// Two or more people share the name
    Ambiguous(Vec<&'a PersonNode>),
    /// Nobody
    NotFound,
}

/// Validated family graph
#[derive(Debug, Clone, Default)]
pub struct FamilyGraph {
    pub(crate) nodes: IndexMap<PersonId, PersonNode>,
    pub(crate) by_location: HashMap<Location, PersonId>,
    pub(crate) names: HashMap<String, Vec<PersonId>>,
    pub(crate) findings: Vec<Finding>,
    pub(crate) cycles: Vec<Vec<PersonId>>,
    pub(crate) duplicates: Vec<DuplicateEntry>,
    pub(crate) reciprocals: Vec<ReciprocalGap>,
    pub(crate) identity_conflicts: Vec<IdentityConflict>,
    pub(crate) missing_ids: Vec<Location>,
}

impl FamilyGraph {
    /// Person by id
    #[must_use]
    pub fn get(&self, id: &PersonId) -> Option<&PersonNode> {
        self.nodes.get(id)
    }

    /// Person stored at a location
    #[must_use]
    pub fn by_location(&self, location: &Location) -> Option<&PersonNode> {
        self.by_location.get(location).and_then(|id| self.nodes.get(id))
    }

    /// Person by display name, surfacing ambiguity
    #[must_use]
    pub fn lookup_by_name(&self, name: &str) -> NameLookup<'_> {
        let people: Vec<&PersonNode> = self
            .names
            .get(&name_key(name))
            .into_iter()
            .flatten()
            .filter_map(|id| self.nodes.get(id))
            .collect();
        match people.as_slice() {
            [] => NameLookup::NotFound,
            [one] => NameLookup::Unique(one),
            _ => NameLookup::Ambiguous(people),
        }
    }

    /// Findings recorded while building
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Parent→child cycles, each in adjacency order
    #[must_use]
    pub fn cycles(&self) -> &[Vec<PersonId>] {
        &self.cycles
    }

    /// Duplicated field entries
    #[must_use]
    pub fn duplicates(&self) -> &[DuplicateEntry] {
        &self.duplicates
    }

    /// One-sided relationships that a fix can complete
    #[must_use]
    pub fn reciprocal_gaps(&self) -> &[ReciprocalGap] {
        &self.reciprocals
    }

    /// Documents that lost a shared id
    #[must_use]
    pub fn identity_conflicts(&self) -> &[IdentityConflict] {
        &self.identity_conflicts
    }

    /// Person documents without an id
    #[must_use]
    pub fn missing_ids(&self) -> &[Location] {
        &self.missing_ids
    }

    /// Every person in build order
    pub fn nodes(&self) -> impl Iterator<Item = &PersonNode> {
        self.nodes.values()
    }

    /// Number of people
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// No people
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parents of a person with their slots
    #[must_use]
    pub fn parents_of(&self, id: &PersonId) -> Vec<(RelationKind, &PersonNode)> {
        self.nodes
            .get(id)
            .map(|node| {
                node.parents()
                    .into_iter()
                    .filter_map(|(kind, parent)| self.nodes.get(parent).map(|p| (kind, p)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Children of a person with their pedigrees
    #[must_use]
    pub fn children_of(&self, id: &PersonId) -> Vec<(Pedigree, &PersonNode)> {
        self.nodes
            .get(id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|edge| self.nodes.get(&edge.id).map(|c| (edge.pedigree, c)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Spouses of a person
    #[must_use]
    pub fn spouses_of(&self, id: &PersonId) -> Vec<&PersonNode> {
        self.nodes
            .get(id)
            .map(|node| node.spouses.iter().filter_map(|s| self.nodes.get(s)).collect())
            .unwrap_or_default()
    }

    pub(crate) fn node_mut(&mut self, id: &PersonId) -> Option<&mut PersonNode> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn insert(&mut self, node: PersonNode) {
        self.by_location.insert(node.location.clone(), node.id.clone());
        self.names
            .entry(name_key(&node.name))
            .or_default()
            .push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, name: &str) -> PersonNode {
        PersonNode::new(PersonId::new(id), Location::new(format!("People/{name}.md")), name)
    }

    #[test]
    fn single_slots_report_occupant() {
        let mut child = node("c", "Child");
        let a = PersonId::new("a");
        let b = PersonId::new("b");

        assert_eq!(child.fill_parent(RelationKind::Father, &a), SlotFill::Added);
        assert_eq!(child.fill_parent(RelationKind::Father, &a), SlotFill::Present);
        assert_eq!(child.fill_parent(RelationKind::Father, &b), SlotFill::Occupied(a.clone()));
        assert_eq!(child.fill_parent(RelationKind::StepFather, &b), SlotFill::Added);
        assert_eq!(child.parents().len(), 2);
    }

    #[test]
    fn name_lookup_surfaces_ambiguity() {
        let mut graph = FamilyGraph::default();
        graph.insert(node("1", "John Smith"));
        graph.insert(PersonNode::new(
            PersonId::new("2"),
            Location::new("Other/John Smith.md"),
            "John Smith",
        ));
        graph.insert(node("3", "Jane Doe"));

        assert!(matches!(graph.lookup_by_name("jane  doe"), NameLookup::Unique(n) if n.id.as_str() == "3"));
        assert!(matches!(graph.lookup_by_name("John Smith"), NameLookup::Ambiguous(v) if v.len() == 2));
        assert_eq!(graph.lookup_by_name("Nobody"), NameLookup::NotFound);
    }

    #[test]
    fn children_are_unique_by_id() {
        let mut parent = node("p", "Parent");
        let c = PersonId::new("c");
        parent.add_child(&c, Pedigree::Biological);
        parent.add_child(&c, Pedigree::Step);
        assert_eq!(parent.children.len(), 1);
        assert!(parent.has_child(&c));
    }
}
