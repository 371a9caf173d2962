//! Family graph builder
//!
//! Builds a [`FamilyGraph`] from person records in fixed passes:
//!
//! 1. **Nodes**: one per record; a repeated id keeps its first holder and
//!    the later document gets a provisional id
//! 2. **Resolution**: explicit ids must exist, links go through the
//!    [`IdentityIndex`]; duplicates collapse to one edge
//! 3. **Parent claims**: a person's own parent fields fill its slots
//! 4. **Child claims**: cross-checked against the child's own fields
//! 5. **Spouses**: symmetric union
//! 6. **Cycles**: reported, never repaired
//!
//! Anomalies become findings; the graph is always built to completion.

use crate::cycle::find_cycles;
use crate::graph::{
    DuplicateEntry, FamilyGraph, IdentityConflict, PersonNode, ReciprocalGap, SlotFill,
};
use crate::record::{same_pedigree_class, ClaimTarget, PersonRecord, RelationClaim, RelationKind};
use roots_index::{IdentityIndex, LinkResolution, LinkText};
use roots_model::{Finding, FindingCode, Location, Outcome, Pedigree, PersonId};
use std::collections::{HashMap, HashSet};

/// Build the graph from a snapshot of person records
#[must_use]
pub fn build_graph(records: &[PersonRecord], index: &IdentityIndex) -> Outcome<FamilyGraph> {
    let mut ordered: Vec<&PersonRecord> = records.iter().collect();
    ordered.sort_by(|a, b| a.location.cmp(&b.location));

    let mut builder = GraphBuilder::new(index);
    let owners = builder.add_nodes(&ordered);
    let edges = builder.resolve_claims(&owners);
    builder.apply_parent_claims(&edges);
    builder.apply_child_claims(&edges);
    builder.apply_spouses(&edges);
    builder.report_cycles();

    let GraphBuilder { mut graph, findings, .. } = builder;
    tracing::debug!(
        people = graph.len(),
        findings = findings.len(),
        cycles = graph.cycles.len(),
        "family graph built"
    );
    graph.findings = findings.clone();
    Outcome::with_findings(graph, findings)
}

/// A resolved, deduplicated claim
#[derive(Debug, Clone)]
struct Edge {
    from: PersonId,
    kind: RelationKind,
    to: PersonId,
    pedigree: Pedigree,
}

struct GraphBuilder<'a> {
    index: &'a IdentityIndex,
    graph: FamilyGraph,
    findings: Vec<Finding>,
}

impl<'a> GraphBuilder<'a> {
    fn new(index: &'a IdentityIndex) -> Self {
        Self {
            index,
            graph: FamilyGraph::default(),
            findings: Vec::new(),
        }
    }

    fn add_nodes<'r>(&mut self, records: &[&'r PersonRecord]) -> Vec<(PersonId, &'r PersonRecord)> {
        let mut owners = Vec::with_capacity(records.len());
        for record in records {
            let id = match &record.id {
                Some(id) => match self.graph.nodes.get(id) {
                    Some(holder) => {
                        self.findings.push(
                            Finding::new(
                                FindingCode::DuplicateIdentity,
                                format!("id '{id}' is already used by {}", holder.location),
                            )
                            .with_subject(id.as_str())
                            .with_field(crate::document::ID_KEY)
                            .with_location(record.location.clone())
                            .with_candidates([holder.location.to_string(), record.location.to_string()]),
                        );
                        self.graph.identity_conflicts.push(IdentityConflict {
                            id: id.clone(),
                            location: record.location.clone(),
                        });
                        PersonId::provisional(&record.location)
                    }
                    None => id.clone(),
                },
                None => {
                    self.graph.missing_ids.push(record.location.clone());
                    PersonId::provisional(&record.location)
                }
            };

            let mut node = PersonNode::new(id.clone(), record.location.clone(), record.name.clone());
            node.sex = record.sex;
            node.born.clone_from(&record.born);
            node.died.clone_from(&record.died);
            node.sources.clone_from(&record.sources);
            node.media.clone_from(&record.media);
            self.graph.insert(node);
            owners.push((id, *record));
        }
        owners
    }

    fn resolve_claims(&mut self, owners: &[(PersonId, &PersonRecord)]) -> Vec<Edge> {
        let mut seen: HashSet<(PersonId, RelationKind, PersonId)> = HashSet::new();
        let mut edges = Vec::new();

        for (owner, record) in owners {
            for claim in &record.claims {
                let Some(target) = self.resolve_target(owner, record, claim) else {
                    continue;
                };
                if &target == owner {
                    self.findings.push(
                        Finding::new(
                            FindingCode::SelfReference,
                            format!("{} lists itself as {}", record.name, claim.kind),
                        )
                        .with_subject(owner.as_str())
                        .with_field(claim.field())
                        .with_location(record.location.clone()),
                    );
                    continue;
                }
                if !seen.insert((owner.clone(), claim.kind, target.clone())) {
                    self.graph.duplicates.push(DuplicateEntry {
                        holder: owner.clone(),
                        location: record.location.clone(),
                        field: claim.field().to_string(),
                        target: claim.target.to_string(),
                        position: claim.position,
                    });
                    continue;
                }
                edges.push(Edge {
                    from: owner.clone(),
                    kind: claim.kind,
                    to: target,
                    pedigree: claim.pedigree,
                });
            }
        }
        edges
    }

    fn resolve_target(&mut self, owner: &PersonId, record: &PersonRecord, claim: &RelationClaim) -> Option<PersonId> {
        let finding = |code: FindingCode, message: String| {
            Finding::new(code, message)
                .with_subject(owner.as_str())
                .with_field(claim.field())
                .with_location(record.location.clone())
        };

        match &claim.target {
            ClaimTarget::Explicit(id) => {
                if !self.graph.nodes.contains_key(id) {
                    self.findings.push(finding(
                        FindingCode::UnresolvedReference,
                        format!("{} '{id}' matches no person", claim.field()),
                    ));
                    return None;
                }
                if let Some(shadow) = &claim.shadow {
                    if let Some(linked) = self.quiet_resolve(shadow) {
                        if &linked != id {
                            self.findings.push(
                                finding(
                                    FindingCode::LinkMismatch,
                                    format!(
                                        "{} points to '{id}' but {} links {shadow}; the id wins",
                                        claim.field(),
                                        claim.kind.link_field()
                                    ),
                                )
                                .with_subject(id.as_str())
                                .with_subject(linked.as_str()),
                            );
                        }
                    }
                }
                Some(id.clone())
            }
            ClaimTarget::Link(link) => match self.index.resolve(link) {
                LinkResolution::Resolved { location, .. } => {
                    let resolved = self.graph.by_location.get(&location).cloned();
                    if resolved.is_none() {
                        self.findings.push(finding(
                            FindingCode::UnresolvedReference,
                            format!("{link} is not a person document"),
                        ));
                    }
                    resolved
                }
                LinkResolution::Ambiguous { candidates } => {
                    self.findings.push(
                        finding(
                            FindingCode::AmbiguousReference,
                            format!("{link} matches {} documents", candidates.len()),
                        )
                        .with_candidates(candidates.iter().map(Location::to_string)),
                    );
                    None
                }
                LinkResolution::Unresolved => {
                    self.findings.push(finding(
                        FindingCode::UnresolvedReference,
                        format!("{link} matches no document"),
                    ));
                    None
                }
            },
        }
    }

    fn quiet_resolve(&self, link: &LinkText) -> Option<PersonId> {
        match self.index.resolve(link) {
            LinkResolution::Resolved { location, .. } => self.graph.by_location.get(&location).cloned(),
            LinkResolution::Ambiguous { .. } | LinkResolution::Unresolved => None,
        }
    }

    fn name_of(&self, id: &PersonId) -> String {
        self.graph
            .get(id)
            .map_or_else(|| id.to_string(), |node| node.name.clone())
    }

    fn location_of(&self, id: &PersonId) -> Option<Location> {
        self.graph.get(id).map(|node| node.location.clone())
    }

    fn record_gap(&mut self, holder: &PersonId, kind: RelationKind, target: &PersonId, pedigree: Pedigree) {
        if target.is_provisional() {
            return;
        }
        if let Some(location) = self.location_of(holder) {
            self.graph.reciprocals.push(ReciprocalGap {
                holder: holder.clone(),
                location,
                kind,
                target: target.clone(),
                pedigree,
            });
        }
    }

    /// A person's own parent fields
    fn apply_parent_claims(&mut self, edges: &[Edge]) {
        let listed_children: HashSet<(&PersonId, &PersonId)> = edges
            .iter()
            .filter(|e| e.kind == RelationKind::Child)
            .map(|e| (&e.from, &e.to))
            .collect();

        for edge in edges.iter().filter(|e| e.kind.is_parent()) {
            let (child, parent) = (&edge.from, &edge.to);
            let fill = match self.graph.node_mut(child) {
                Some(node) => node.fill_parent(edge.kind, parent),
                None => continue,
            };
            match fill {
                SlotFill::Occupied(existing) => {
                    let message = format!(
                        "{} lists both {} and {} as {}",
                        self.name_of(child),
                        self.name_of(&existing),
                        self.name_of(parent),
                        edge.kind
                    );
                    self.conflict(child, message, edge.kind.id_field(), [&existing, parent]);
                }
                SlotFill::Present => {}
                SlotFill::Added => {
                    let pedigree = edge.kind.pedigree().unwrap_or_default();
                    if let Some(node) = self.graph.node_mut(parent) {
                        node.add_child(child, pedigree);
                    }
                    if !listed_children.contains(&(parent, child)) {
                        self.missing_link(parent, child, RelationKind::Child, pedigree);
                    }
                }
            }
        }
    }

    /// A parent's children fields, cross-checked against the child's side
    fn apply_child_claims(&mut self, edges: &[Edge]) {
        let mut listed_parents: HashMap<(&PersonId, &PersonId), Vec<RelationKind>> = HashMap::new();
        for edge in edges.iter().filter(|e| e.kind.is_parent()) {
            listed_parents.entry((&edge.from, &edge.to)).or_default().push(edge.kind);
        }

        for edge in edges.iter().filter(|e| e.kind == RelationKind::Child) {
            let (parent, child) = (&edge.from, &edge.to);

            if let Some(kinds) = listed_parents.get(&(child, parent)) {
                let agrees = kinds
                    .iter()
                    .filter_map(|kind| kind.pedigree())
                    .any(|pedigree| same_pedigree_class(pedigree, edge.pedigree));
                if !agrees {
                    let message = format!(
                        "{} lists {} as {} child, but {} lists {} as {}",
                        self.name_of(parent),
                        self.name_of(child),
                        edge.pedigree,
                        self.name_of(child),
                        self.name_of(parent),
                        kinds.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
                    );
                    self.conflict(parent, message, RelationKind::Child.id_field(), [child]);
                }
                continue;
            }

            let sex = self.graph.get(parent).map(|node| node.sex).unwrap_or_default();
            let Some(slot) = RelationKind::parent_slot(edge.pedigree, sex) else {
                let finding = Finding::new(
                    FindingCode::UnknownParentSex,
                    format!(
                        "{} lists {} as child but has no recorded sex to choose a parent slot",
                        self.name_of(parent),
                        self.name_of(child)
                    ),
                )
                .with_subject(parent.as_str())
                .with_subject(child.as_str())
                .with_field(RelationKind::Child.id_field())
                .with_location_opt(self.location_of(parent));
                self.findings.push(finding);
                if let Some(node) = self.graph.node_mut(parent) {
                    node.add_child(child, edge.pedigree);
                }
                continue;
            };

            let fill = match self.graph.node_mut(child) {
                Some(node) => node.fill_parent(slot, parent),
                None => continue,
            };
            match fill {
                SlotFill::Occupied(existing) => {
                    let message = format!(
                        "{} lists {} as child, but {}'s {} is {}",
                        self.name_of(parent),
                        self.name_of(child),
                        self.name_of(child),
                        slot,
                        self.name_of(&existing)
                    );
                    self.conflict(parent, message, RelationKind::Child.id_field(), [child, &existing]);
                }
                SlotFill::Added | SlotFill::Present => {
                    if let Some(node) = self.graph.node_mut(parent) {
                        node.add_child(child, edge.pedigree);
                    }
                    self.missing_link(child, parent, slot, edge.pedigree);
                }
            }
        }
    }

    fn apply_spouses(&mut self, edges: &[Edge]) {
        let claimed: HashSet<(&PersonId, &PersonId)> = edges
            .iter()
            .filter(|e| e.kind == RelationKind::Spouse)
            .map(|e| (&e.from, &e.to))
            .collect();

        for edge in edges.iter().filter(|e| e.kind == RelationKind::Spouse) {
            let (a, b) = (&edge.from, &edge.to);
            for (x, y) in [(a, b), (b, a)] {
                if let Some(node) = self.graph.node_mut(x) {
                    node.fill_parent(RelationKind::Spouse, y);
                }
            }
            if !claimed.contains(&(b, a)) {
                self.missing_link(b, a, RelationKind::Spouse, Pedigree::default());
            }
        }
    }

    fn report_cycles(&mut self) {
        let cycles = find_cycles(&self.graph);
        for cycle in &cycles {
            let names: Vec<String> = cycle.iter().map(|id| self.name_of(id)).collect();
            let mut finding = Finding::new(
                FindingCode::RelationshipCycle,
                format!("parent cycle: {} → {}", names.join(" → "), names.first().cloned().unwrap_or_default()),
            );
            for id in cycle {
                finding = finding.with_subject(id.as_str());
            }
            self.findings.push(finding);
        }
        self.graph.cycles = cycles;
    }

    /// `holder` is silent about `target`
    fn missing_link(&mut self, holder: &PersonId, target: &PersonId, kind: RelationKind, pedigree: Pedigree) {
        let message = format!(
            "{} does not list {} as {}",
            self.name_of(holder),
            self.name_of(target),
            kind
        );
        let finding = Finding::new(FindingCode::MissingReciprocalLink, message)
            .with_subject(holder.as_str())
            .with_subject(target.as_str())
            .with_field(kind.id_field())
            .with_location_opt(self.location_of(holder));
        self.findings.push(finding);
        self.record_gap(holder, kind, target, pedigree);
    }

    fn conflict<'p>(
        &mut self,
        holder: &PersonId,
        message: String,
        field: &str,
        others: impl IntoIterator<Item = &'p PersonId>,
    ) {
        let mut finding = Finding::new(FindingCode::ParentClaimConflict, message)
            .with_subject(holder.as_str())
            .with_field(field)
            .with_location_opt(self.location_of(holder));
        for other in others {
            finding = finding.with_subject(other.as_str());
        }
        self.findings.push(finding);
    }
}

trait WithLocationOpt {
    fn with_location_opt(self, location: Option<Location>) -> Self;
}

impl WithLocationOpt for Finding {
    fn with_location_opt(self, location: Option<Location>) -> Self {
        match location {
            Some(location) => self.with_location(location),
            None => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roots_model::{Severity, Sex};

    fn person(id: &str, name: &str, sex: Sex) -> PersonRecord {
        PersonRecord::new(Location::new(format!("People/{name}.md")), name)
            .with_id(id)
            .with_sex(sex)
    }

    fn explicit(kind: RelationKind, id: &str) -> RelationClaim {
        RelationClaim::new(kind, ClaimTarget::Explicit(PersonId::new(id)))
    }

    fn link(kind: RelationKind, text: &str) -> RelationClaim {
        RelationClaim::new(kind, ClaimTarget::Link(LinkText::parse(text).unwrap()))
    }

    fn index_of(records: &[PersonRecord]) -> IdentityIndex {
        let mut index = IdentityIndex::new();
        index.rebuild(
            records
                .iter()
                .map(|r| (r.location.clone(), r.id.clone(), r.name.clone())),
        );
        index
    }

    fn build(records: &[PersonRecord]) -> Outcome<FamilyGraph> {
        build_graph(records, &index_of(records))
    }

    fn codes(findings: &[Finding]) -> Vec<FindingCode> {
        findings.iter().map(|f| f.code).collect()
    }

    #[test]
    fn consistent_parent_and_child_are_clean() {
        let records = vec![
            person("f", "Father", Sex::Male).with_claim(explicit(RelationKind::Child, "c")),
            person("c", "Child", Sex::Female).with_claim(explicit(RelationKind::Father, "f")),
        ];
        let out = build(&records);
        assert!(out.is_clean(), "{:?}", out.findings);

        let graph = out.value;
        let child = graph.get(&PersonId::new("c")).unwrap();
        assert_eq!(child.father, Some(PersonId::new("f")));
        let children = graph.children_of(&PersonId::new("f"));
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].0, Pedigree::Biological);
    }

    #[test]
    fn one_sided_child_claim_fills_slot_and_reports_gap() {
        let records = vec![
            person("m", "Mother", Sex::Female).with_claim(explicit(RelationKind::Child, "c")),
            person("c", "Child", Sex::Male),
        ];
        let out = build(&records);
        assert_eq!(codes(&out.findings), vec![FindingCode::MissingReciprocalLink]);
        assert_eq!(out.findings[0].field.as_deref(), Some("mother_id"));

        let graph = out.value;
        assert_eq!(graph.get(&PersonId::new("c")).unwrap().mother, Some(PersonId::new("m")));
        let gap = &graph.reciprocal_gaps()[0];
        assert_eq!(gap.holder, PersonId::new("c"));
        assert_eq!(gap.kind, RelationKind::Mother);
    }

    #[test]
    fn one_sided_parent_claim_reports_gap_on_parent() {
        let records = vec![
            person("f", "Father", Sex::Male),
            person("c", "Child", Sex::Male).with_claim(explicit(RelationKind::StepFather, "f")),
        ];
        let out = build(&records);
        assert_eq!(codes(&out.findings), vec![FindingCode::MissingReciprocalLink]);

        let gap = &out.value.reciprocal_gaps()[0];
        assert_eq!(gap.holder, PersonId::new("f"));
        assert_eq!(gap.kind, RelationKind::Child);
        assert_eq!(gap.pedigree, Pedigree::Step);
    }

    #[test]
    fn two_biological_fathers_conflict() {
        let records = vec![
            person("a", "Adam", Sex::Male).with_claim(explicit(RelationKind::Child, "c")),
            person("b", "Bert", Sex::Male),
            person("c", "Child", Sex::Male).with_claim(explicit(RelationKind::Father, "b")),
        ];
        let out = build(&records);
        assert!(out.findings.iter().any(|f| f.code == FindingCode::ParentClaimConflict
            && f.severity == Severity::Error
            && f.mentions("a")
            && f.mentions("b")));
        assert_eq!(
            out.value.get(&PersonId::new("c")).unwrap().father,
            Some(PersonId::new("b"))
        );
    }

    #[test]
    fn pedigree_disagreement_conflicts() {
        let records = vec![
            person("p", "Parent", Sex::Male)
                .with_claim(explicit(RelationKind::Child, "c").with_pedigree(Pedigree::Adopted)),
            person("c", "Child", Sex::Male).with_claim(explicit(RelationKind::Father, "p")),
        ];
        let out = build(&records);
        assert_eq!(codes(&out.findings), vec![FindingCode::ParentClaimConflict]);
    }

    #[test]
    fn step_parent_coexists_with_biological_father() {
        let records = vec![
            person("s", "Stepdad", Sex::Male)
                .with_claim(explicit(RelationKind::Child, "c").with_pedigree(Pedigree::Step)),
            person("f", "Dad", Sex::Male),
            person("c", "Child", Sex::Female)
                .with_claim(explicit(RelationKind::StepFather, "s"))
                .with_claim(explicit(RelationKind::Father, "f")),
        ];
        let out = build(&records);
        assert!(!out.findings.iter().any(|f| f.code == FindingCode::ParentClaimConflict));

        let child = out.value.get(&PersonId::new("c")).unwrap().clone();
        assert_eq!(child.step_fathers, vec![PersonId::new("s")]);
        assert_eq!(child.father, Some(PersonId::new("f")));
    }

    #[test]
    fn unknown_sex_leaves_slot_unchosen() {
        let records = vec![
            person("p", "Parent", Sex::Unknown).with_claim(explicit(RelationKind::Child, "c")),
            person("c", "Child", Sex::Male),
        ];
        let out = build(&records);
        assert_eq!(codes(&out.findings), vec![FindingCode::UnknownParentSex]);
        assert!(out.value.get(&PersonId::new("c")).unwrap().parents().is_empty());
        assert!(out.value.get(&PersonId::new("p")).unwrap().has_child(&PersonId::new("c")));
    }

    #[test]
    fn explicit_id_beats_conflicting_link() {
        let records = vec![
            person("f1", "Real Dad", Sex::Male).with_claim(explicit(RelationKind::Child, "c")),
            person("f2", "Other Man", Sex::Male),
            person("c", "Child", Sex::Male).with_claim(
                explicit(RelationKind::Father, "f1").with_shadow(LinkText::parse("[[Other Man]]")),
            ),
        ];
        let out = build(&records);
        assert_eq!(codes(&out.findings), vec![FindingCode::LinkMismatch]);
        assert_eq!(
            out.value.get(&PersonId::new("c")).unwrap().father,
            Some(PersonId::new("f1"))
        );
    }

    #[test]
    fn ambiguous_link_is_never_guessed() {
        let records = vec![
            PersonRecord::new(Location::new("People/John Smith.md"), "John Smith").with_id("j1"),
            PersonRecord::new(Location::new("Archive/John Smith.md"), "John Smith").with_id("j2"),
            person("c", "Child", Sex::Male).with_claim(link(RelationKind::Father, "John Smith")),
        ];
        let out = build(&records);
        let ambiguous: Vec<&Finding> = out
            .findings
            .iter()
            .filter(|f| f.code == FindingCode::AmbiguousReference)
            .collect();
        assert_eq!(ambiguous.len(), 1);
        assert_eq!(
            ambiguous[0].candidates,
            vec!["Archive/John Smith.md".to_string(), "People/John Smith.md".to_string()]
        );
        assert_eq!(out.value.get(&PersonId::new("c")).unwrap().father, None);
    }

    #[test]
    fn dangling_ids_and_self_links() {
        let records = vec![person("a", "Alone", Sex::Male)
            .with_claim(explicit(RelationKind::Father, "ghost"))
            .with_claim(explicit(RelationKind::Spouse, "a"))];
        let out = build(&records);
        assert_eq!(
            codes(&out.findings),
            vec![FindingCode::UnresolvedReference, FindingCode::SelfReference]
        );
    }

    #[test]
    fn duplicates_collapse_and_are_recorded() {
        let records = vec![
            person("p", "Parent", Sex::Male)
                .with_claim(explicit(RelationKind::Child, "c"))
                .with_claim(explicit(RelationKind::Child, "c")),
            person("c", "Child", Sex::Male).with_claim(explicit(RelationKind::Father, "p")),
        ];
        let out = build(&records);
        assert!(out.is_clean());
        assert_eq!(out.value.get(&PersonId::new("p")).unwrap().children.len(), 1);
        assert_eq!(out.value.duplicates().len(), 1);
        assert_eq!(out.value.duplicates()[0].field, "children_id");
    }

    #[test]
    fn duplicate_identity_keeps_first_holder() {
        let records = vec![
            PersonRecord::new(Location::new("B.md"), "Second").with_id("x"),
            PersonRecord::new(Location::new("A.md"), "First").with_id("x"),
            PersonRecord::new(Location::new("C.md"), "Nobody"),
        ];
        let out = build(&records);
        assert_eq!(codes(&out.findings), vec![FindingCode::DuplicateIdentity]);

        let graph = out.value;
        assert_eq!(graph.get(&PersonId::new("x")).unwrap().name, "First");
        assert_eq!(graph.identity_conflicts()[0].location, Location::new("B.md"));
        assert_eq!(graph.missing_ids(), &[Location::new("C.md")]);
        assert!(graph.by_location(&Location::new("C.md")).unwrap().id.is_provisional());
    }

    #[test]
    fn spouses_are_symmetric() {
        let records = vec![
            person("h", "Husband", Sex::Male).with_claim(explicit(RelationKind::Spouse, "w")),
            person("w", "Wife", Sex::Female),
        ];
        let out = build(&records);
        assert_eq!(codes(&out.findings), vec![FindingCode::MissingReciprocalLink]);
        assert_eq!(out.value.spouses_of(&PersonId::new("w")).len(), 1);
        assert_eq!(out.value.reciprocal_gaps()[0].holder, PersonId::new("w"));
    }

    #[test]
    fn parent_cycle_is_reported_in_order() {
        let records = vec![
            person("A", "Anna", Sex::Female)
                .with_claim(explicit(RelationKind::Child, "B"))
                .with_claim(explicit(RelationKind::Mother, "C")),
            person("B", "Bea", Sex::Female)
                .with_claim(explicit(RelationKind::Child, "C"))
                .with_claim(explicit(RelationKind::Mother, "A")),
            person("C", "Cleo", Sex::Female)
                .with_claim(explicit(RelationKind::Child, "A"))
                .with_claim(explicit(RelationKind::Mother, "B")),
        ];
        let out = build(&records);
        let cycles: Vec<&Finding> = out
            .findings
            .iter()
            .filter(|f| f.code == FindingCode::RelationshipCycle)
            .collect();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].subjects, vec!["A", "B", "C"]);
    }
}
