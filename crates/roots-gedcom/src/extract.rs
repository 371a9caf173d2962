//! Entity extraction
//!
//! Walks the top-level records of a [`TagTree`] and builds typed entities.
//! Pointers are collected as pending and settled in one resolution pass at
//! the end, so forward references need no special handling.

use crate::model::{
    ChildLink, Citation, EntityKey, Event, Family, FamilyMembership, GedcomData, Header, Individual,
    PersonName, RecordRef, RefState, SharedKind, SharedRecord,
};
use crate::parser::{TagRecord, TagTree};
use roots_model::{CancelToken, Finding, FindingCode, Outcome, Pedigree, Severity, Sex};
use std::collections::HashSet;

/// Individual event and attribute tags kept as [`Event`]s
const INDIVIDUAL_EVENTS: &[&str] = &[
    "BIRT", "CHR", "BAPM", "BARM", "BASM", "BLES", "CHRA", "CONF", "FCOM", "ORDN", "NATU", "EMIG",
    "IMMI", "CENS", "PROB", "WILL", "GRAD", "RETI", "DEAT", "BURI", "CREM", "ADOP", "EVEN", "OCCU",
    "RESI", "EDUC", "RELI", "TITL", "NATI", "CAST", "DSCR", "PROP", "NCHI", "NMR", "FACT",
];

/// Family event tags kept as [`Event`]s
const FAMILY_EVENTS: &[&str] = &[
    "MARR", "MARB", "MARC", "MARL", "MARS", "ENGA", "DIV", "DIVF", "ANUL", "CENS", "RESI", "EVEN",
];

/// Extract entities from a parsed tree
///
/// The token is polled before each top-level record; on cancellation the
/// records extracted so far are still resolved and returned with
/// `cancelled` set.
#[must_use]
pub fn extract(tree: &TagTree, cancel: &CancelToken) -> Outcome<GedcomData> {
    let mut extractor = Extractor::default();

    for record in tree.records() {
        if cancel.is_cancelled() {
            tracing::info!(
                extracted = extractor.data.individuals.len() + extractor.data.families.len(),
                "extraction cancelled"
            );
            extractor.data.cancelled = true;
            break;
        }
        extractor.record(record);
    }

    extractor.resolve();

    tracing::info!(
        individuals = extractor.data.individuals.len(),
        families = extractor.data.families.len(),
        shared = extractor.data.shared.len(),
        "extracted entities"
    );
    Outcome::with_findings(extractor.data, extractor.findings)
}

#[derive(Default)]
struct Extractor {
    data: GedcomData,
    findings: Vec<Finding>,
    referenced: HashSet<String>,
}

impl Extractor {
    fn warn(&mut self, code: FindingCode, message: String, subject: &str, line: usize) {
        self.findings.push(
            Finding::new(code, message)
                .with_subject(subject)
                .with_line(line),
        );
    }

    fn record(&mut self, record: &TagRecord) {
        collect_pointers(record, &mut self.referenced);

        match record.tag.as_str() {
            "HEAD" => self.data.header = header(record),
            "INDI" => self.individual(record),
            "FAM" => self.family(record),
            "NOTE" => self.shared(record, SharedKind::Note),
            "SOUR" => self.shared(record, SharedKind::Source),
            "OBJE" => self.shared(record, SharedKind::Media),
            "REPO" => self.shared(record, SharedKind::Repository),
            "TRLR" | "SUBM" | "SUBN" => {}
            other => tracing::debug!(tag = other, line = record.line, "skipping top-level record"),
        }
    }

    /// Claim an xref for a new entity; `None` when it was already taken
    fn claim(&mut self, record: &TagRecord, key: EntityKey) -> Option<String> {
        let xref = match &record.xref {
            Some(xref) => xref.clone(),
            None => {
                let generated = format!("@_L{}@", record.line);
                self.warn(
                    FindingCode::MalformedStructure,
                    format!("{} record without cross-reference id", record.tag),
                    &generated,
                    record.line,
                );
                generated
            }
        };

        if self.data.lookup.contains_key(&xref) {
            self.warn(
                FindingCode::MalformedStructure,
                format!("{xref} is defined more than once; later definition ignored"),
                &xref,
                record.line,
            );
            return None;
        }
        self.data.lookup.insert(xref.clone(), key);
        Some(xref)
    }

    fn individual(&mut self, record: &TagRecord) {
        let Some(xref) = self.claim(record, EntityKey::Individual(self.data.individuals.len())) else {
            return;
        };
        let mut indi = Individual {
            xref,
            line: record.line,
            ..Individual::default()
        };

        for child in &record.children {
            match child.tag.as_str() {
                "NAME" => indi.names.push(person_name(child)),
                "SEX" => indi.sex = Sex::parse(child.text().unwrap_or_default()),
                "FAMC" => match child.pointer() {
                    Some(family) => indi.child_of.push(FamilyMembership {
                        family: family.to_string(),
                        pedigree: child.child_value("PEDI").map(|p| Pedigree::resolve(Some(p))),
                        state: RefState::Pending,
                    }),
                    None => self.warn(
                        FindingCode::MalformedStructure,
                        "FAMC value is not a pointer".into(),
                        &indi.xref,
                        child.line,
                    ),
                },
                "FAMS" => match child.pointer() {
                    Some(family) => indi.spouse_of.push(family.to_string()),
                    None => self.warn(
                        FindingCode::MalformedStructure,
                        "FAMS value is not a pointer".into(),
                        &indi.xref,
                        child.line,
                    ),
                },
                "OBJE" => indi.media.extend(media_ref(child)),
                "NOTE" => indi.notes.extend(note_ref(child)),
                "SOUR" => indi.citations.extend(citation(child)),
                tag if INDIVIDUAL_EVENTS.contains(&tag) => indi.events.push(event(child)),
                _ => {}
            }
        }

        self.data.individuals.push(indi);
    }

    fn family(&mut self, record: &TagRecord) {
        let Some(xref) = self.claim(record, EntityKey::Family(self.data.families.len())) else {
            return;
        };
        let mut fam = Family {
            xref,
            line: record.line,
            ..Family::default()
        };

        for child in &record.children {
            match child.tag.as_str() {
                "HUSB" | "WIFE" => {
                    let Some(partner) = child.pointer() else {
                        self.warn(
                            FindingCode::MalformedStructure,
                            format!("{} value is not a pointer", child.tag),
                            &fam.xref,
                            child.line,
                        );
                        continue;
                    };
                    let slot = if child.tag == "HUSB" { &mut fam.husband } else { &mut fam.wife };
                    if slot.is_some() {
                        let message = format!("second {} in family ignored", child.tag);
                        self.warn(FindingCode::MalformedStructure, message, &fam.xref, child.line);
                    } else {
                        *slot = Some(partner.to_string());
                    }
                }
                "CHIL" => match child.pointer() {
                    Some(kid) => fam.children.push(child_link(kid, child)),
                    None => self.warn(
                        FindingCode::MalformedStructure,
                        "CHIL value is not a pointer".into(),
                        &fam.xref,
                        child.line,
                    ),
                },
                "OBJE" => fam.media.extend(media_ref(child)),
                "NOTE" => fam.notes.extend(note_ref(child)),
                "SOUR" => fam.citations.extend(citation(child)),
                tag if FAMILY_EVENTS.contains(&tag) => fam.events.push(event(child)),
                _ => {}
            }
        }

        self.data.families.push(fam);
    }

    fn shared(&mut self, record: &TagRecord, kind: SharedKind) {
        let Some(xref) = self.claim(record, EntityKey::Shared(self.data.shared.len())) else {
            return;
        };
        let mut shared = SharedRecord::new(xref, kind, record.line);

        match kind {
            SharedKind::Note => shared.text = record.value.clone(),
            SharedKind::Source => {
                shared.title = record
                    .child_value("TITL")
                    .or_else(|| record.child_value("ABBR"))
                    .or_else(|| record.text())
                    .map(str::to_string);
                shared.author = record.child_value("AUTH").map(str::to_string);
                shared.text = record.child_value("TEXT").map(str::to_string);
            }
            SharedKind::Media => {
                let file = record.child("FILE");
                shared.file = file.and_then(TagRecord::text).map(str::to_string);
                shared.title = record
                    .child_value("TITL")
                    .or_else(|| file.and_then(|f| f.child_value("TITL")))
                    .map(str::to_string);
            }
            SharedKind::Repository => {
                shared.title = record.child_value("NAME").map(str::to_string);
            }
        }

        self.data.shared.push(shared);
    }

    /// Settle every pending pointer, reconcile one-sided family links and
    /// flag unreferenced shared records
    fn resolve(&mut self) {
        self.resolve_individuals();
        self.resolve_families();
        self.reconcile_memberships();
        self.flag_orphans();
    }

    fn resolve_individuals(&mut self) {
        let mut findings = Vec::new();
        let data = &mut self.data;

        for indi in &mut data.individuals {
            for membership in &mut indi.child_of {
                membership.state = match data.lookup.get(&membership.family) {
                    Some(EntityKey::Family(_)) => RefState::Resolved,
                    _ => {
                        findings.push(dangling(&indi.xref, &membership.family, "FAMC", indi.line));
                        RefState::Dangling
                    }
                };
            }

            let lookup = &data.lookup;
            indi.spouse_of.retain(|family| {
                let ok = matches!(lookup.get(family), Some(EntityKey::Family(_)));
                if !ok {
                    findings.push(dangling(&indi.xref, family, "FAMS", indi.line));
                }
                ok
            });

            let refs = indi
                .media
                .iter_mut()
                .chain(indi.notes.iter_mut())
                .chain(indi.citations.iter_mut().map(|c| &mut c.source))
                .chain(
                    indi.events
                        .iter_mut()
                        .flat_map(|e| e.notes.iter_mut().chain(e.citations.iter_mut().map(|c| &mut c.source))),
                );
            for reference in refs {
                settle_shared(reference, lookup, &indi.xref, indi.line, &mut findings);
            }
        }

        self.findings.extend(findings);
    }

    fn resolve_families(&mut self) {
        let mut findings = Vec::new();
        let data = &mut self.data;
        let lookup = &data.lookup;
        let is_individual = |xref: &str| matches!(lookup.get(xref), Some(EntityKey::Individual(_)));

        for fam in &mut data.families {
            for (tag, slot) in [("HUSB", &mut fam.husband), ("WIFE", &mut fam.wife)] {
                if slot.as_deref().is_some_and(|p| !is_individual(p)) {
                    if let Some(missing) = slot.take() {
                        findings.push(dangling(&fam.xref, &missing, tag, fam.line));
                    }
                }
            }

            for link in &mut fam.children {
                link.state = if is_individual(&link.child) {
                    RefState::Resolved
                } else {
                    findings.push(dangling(&fam.xref, &link.child, "CHIL", fam.line));
                    RefState::Dangling
                };
            }

            let refs = fam
                .media
                .iter_mut()
                .chain(fam.notes.iter_mut())
                .chain(fam.citations.iter_mut().map(|c| &mut c.source))
                .chain(
                    fam.events
                        .iter_mut()
                        .flat_map(|e| e.notes.iter_mut().chain(e.citations.iter_mut().map(|c| &mut c.source))),
                );
            for reference in refs {
                settle_shared(reference, lookup, &fam.xref, fam.line, &mut findings);
            }
        }

        self.findings.extend(findings);
    }

    /// Individuals' `FAMC`/`FAMS` that the family does not list back are
    /// added to the family; a child's `PEDI` applies to unqualified links
    fn reconcile_memberships(&mut self) {
        let mut findings = Vec::new();
        let data = &mut self.data;

        for indi in &data.individuals {
            for membership in indi.child_of.iter().filter(|m| m.state == RefState::Resolved) {
                let Some(EntityKey::Family(idx)) = data.lookup.get(&membership.family).copied() else {
                    continue;
                };
                let Some(fam) = data.families.get_mut(idx) else {
                    continue;
                };

                match fam.children.iter_mut().find(|c| c.child == indi.xref) {
                    Some(link) => {
                        if let (false, Some(pedigree)) = (link.qualified, membership.pedigree) {
                            link.father = pedigree;
                            link.mother = pedigree;
                        }
                    }
                    None => {
                        let pedigree = membership.pedigree.unwrap_or_default();
                        fam.children.push(ChildLink {
                            child: indi.xref.clone(),
                            father: pedigree,
                            mother: pedigree,
                            qualified: false,
                            state: RefState::Resolved,
                        });
                        findings.push(one_sided(&indi.xref, &fam.xref, "CHIL", indi.line));
                    }
                }
            }

            for family in &indi.spouse_of {
                let Some(EntityKey::Family(idx)) = data.lookup.get(family).copied() else {
                    continue;
                };
                let Some(fam) = data.families.get_mut(idx) else {
                    continue;
                };
                if fam.partners().any(|p| p == indi.xref) {
                    continue;
                }
                let slot = match (indi.sex, fam.husband.is_none(), fam.wife.is_none()) {
                    (Sex::Male, true, _) | (Sex::Unknown, true, _) => &mut fam.husband,
                    (Sex::Female, _, true) | (Sex::Unknown, false, true) => &mut fam.wife,
                    _ => {
                        findings.push(
                            Finding::new(
                                FindingCode::ParentClaimConflict,
                                format!(
                                    "{} lists {} as a spouse family whose partner slot is taken",
                                    indi.xref, fam.xref
                                ),
                            )
                            .with_severity(Severity::Warning)
                            .with_subject(&indi.xref)
                            .with_subject(&fam.xref)
                            .with_line(indi.line),
                        );
                        continue;
                    }
                };
                *slot = Some(indi.xref.clone());
                findings.push(one_sided(&indi.xref, &fam.xref, "HUSB/WIFE", indi.line));
            }
        }

        self.findings.extend(findings);
    }

    fn flag_orphans(&mut self) {
        for shared in &self.data.shared {
            if !self.referenced.contains(&shared.xref) {
                self.findings.push(
                    Finding::new(
                        FindingCode::OrphanedSharedRecord,
                        format!("{:?} record {} is never referenced", shared.kind, shared.xref),
                    )
                    .with_subject(&shared.xref)
                    .with_line(shared.line),
                );
            }
        }
    }
}

fn settle_shared(
    reference: &mut RecordRef,
    lookup: &std::collections::HashMap<String, EntityKey>,
    owner: &str,
    line: usize,
    findings: &mut Vec<Finding>,
) {
    if let RecordRef::Pointer { xref, state } = reference {
        *state = match lookup.get(xref.as_str()) {
            Some(EntityKey::Shared(_)) => RefState::Resolved,
            _ => {
                findings.push(dangling(owner, xref, "reference", line));
                RefState::Dangling
            }
        };
    }
}

fn dangling(owner: &str, target: &str, what: &str, line: usize) -> Finding {
    Finding::new(
        FindingCode::UnresolvedReference,
        format!("{owner}: {what} {target} points to no matching record"),
    )
    .with_subject(owner)
    .with_field(what)
    .with_candidates(vec![target.to_string()])
    .with_line(line)
}

fn one_sided(person: &str, family: &str, what: &str, line: usize) -> Finding {
    Finding::new(
        FindingCode::MissingReciprocalLink,
        format!("{family} did not list {person} as {what}; link added from the individual record"),
    )
    .with_severity(Severity::Info)
    .with_subject(person)
    .with_subject(family)
    .with_line(line)
}

/// Record every pointer value below (not including) `record`'s own xref
fn collect_pointers(record: &TagRecord, into: &mut HashSet<String>) {
    for child in &record.children {
        if let Some(pointer) = child.pointer() {
            into.insert(pointer.to_string());
        }
        collect_pointers(child, into);
    }
}

fn header(record: &TagRecord) -> Header {
    Header {
        source: record.child_value("SOUR").map(str::to_string),
        version: record
            .child("GEDC")
            .and_then(|g| g.child_value("VERS"))
            .map(str::to_string),
        charset: record.child_value("CHAR").map(str::to_string),
    }
}

fn person_name(record: &TagRecord) -> PersonName {
    let mut name = PersonName::parse(record.value.as_deref().unwrap_or_default());
    let overrides = [
        ("GIVN", &mut name.given),
        ("SURN", &mut name.surname),
        ("NPFX", &mut name.prefix),
        ("NSFX", &mut name.suffix),
        ("NICK", &mut name.nickname),
    ];
    for (tag, slot) in overrides {
        if let Some(value) = record.child_value(tag) {
            *slot = Some(value.to_string());
        }
    }
    name
}

fn event(record: &TagRecord) -> Event {
    Event {
        tag: record.tag.clone(),
        value: record.text().map(str::to_string),
        kind: record.child_value("TYPE").map(str::to_string),
        date: record.child_value("DATE").map(str::to_string),
        place: record.child_value("PLAC").map(str::to_string),
        citations: record.children_with("SOUR").filter_map(citation).collect(),
        notes: record.children_with("NOTE").filter_map(note_ref).collect(),
    }
}

fn child_link(child: &str, record: &TagRecord) -> ChildLink {
    let father = record.child_value("_FREL");
    let mother = record.child_value("_MREL");
    ChildLink {
        child: child.to_string(),
        father: Pedigree::resolve(father),
        mother: Pedigree::resolve(mother),
        qualified: father.is_some() || mother.is_some(),
        state: RefState::Pending,
    }
}

fn note_ref(record: &TagRecord) -> Option<RecordRef> {
    match record.pointer() {
        Some(xref) => Some(RecordRef::pointer(xref)),
        None => record.value.clone().filter(|v| !v.trim().is_empty()).map(RecordRef::inline),
    }
}

fn citation(record: &TagRecord) -> Option<Citation> {
    let source = match record.pointer() {
        Some(xref) => RecordRef::pointer(xref),
        None => RecordRef::inline(record.text()?),
    };
    Some(Citation {
        source,
        page: record.child_value("PAGE").map(str::to_string),
    })
}

fn media_ref(record: &TagRecord) -> Option<RecordRef> {
    match record.pointer() {
        Some(xref) => Some(RecordRef::pointer(xref)),
        None => record
            .child_value("FILE")
            .or_else(|| record.text())
            .map(RecordRef::inline),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::tokenize;
    use crate::normalize::normalize;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn run(text: &str) -> Outcome<GedcomData> {
        let tree = parse(normalize(tokenize(text).value)).value;
        extract(&tree, &CancelToken::new())
    }

    const FAMILY: &str = "\
0 HEAD
1 SOUR TestGen
1 GEDC
2 VERS 5.5.1
1 CHAR UTF-8
0 @I1@ INDI
1 NAME John /Smith/
1 SEX M
1 BIRT
2 DATE 1 JAN 1850
2 PLAC Springfield
1 FAMS @F1@
1 NOTE @N1@
0 @I2@ INDI
1 NAME Jane /Doe/
1 SEX F
1 FAMS @F1@
0 @I3@ INDI
1 NAME Bob /Smith/
1 SEX M
1 FAMC @F1@
1 SOUR @S1@
2 PAGE p. 12
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 CHIL @I3@
1 MARR
2 DATE 1875
0 @N1@ NOTE Served in the
1 CONC  militia
0 @S1@ SOUR
1 TITL Parish register
0 TRLR
";

    #[test]
    fn extracts_people_families_and_shared_records() {
        let out = run(FAMILY);
        assert!(out.is_clean(), "{:?}", out.findings);
        let data = out.value;

        assert_eq!(data.header.version.as_deref(), Some("5.5.1"));
        assert_eq!(data.individuals.len(), 3);
        assert_eq!(data.families.len(), 1);
        assert_eq!(data.shared.len(), 2);

        let john = data.individual("@I1@").unwrap();
        assert_eq!(john.display_name(), "John Smith");
        assert_eq!(john.sex, Sex::Male);
        let birth = john.event("BIRT").unwrap();
        assert_eq!(birth.date.as_deref(), Some("1 JAN 1850"));
        assert_eq!(birth.place.as_deref(), Some("Springfield"));
        assert_eq!(data.content_of(&john.notes[0]), Some("Served in the militia"));

        let fam = data.family("@F1@").unwrap();
        assert_eq!(fam.husband.as_deref(), Some("@I1@"));
        assert_eq!(fam.wife.as_deref(), Some("@I2@"));
        assert_eq!(fam.children[0].child, "@I3@");
        assert_eq!(fam.children[0].father, Pedigree::Biological);
        assert_eq!(fam.children[0].state, RefState::Resolved);

        let bob = data.individual("@I3@").unwrap();
        assert_eq!(bob.citations[0].page.as_deref(), Some("p. 12"));
        assert_eq!(data.content_of(&bob.citations[0].source), Some("Parish register"));
    }

    #[test]
    fn forward_references_resolve() {
        let out = run("0 @F1@ FAM\n1 CHIL @I1@\n0 @I1@ INDI\n1 FAMC @F1@\n");
        assert!(out.is_clean());
        assert_eq!(out.value.families[0].children[0].state, RefState::Resolved);
        assert_eq!(out.value.individuals[0].child_of[0].state, RefState::Resolved);
    }

    #[test]
    fn dangling_pointers_are_reported() {
        let out = run("0 @I1@ INDI\n1 FAMC @F9@\n1 NOTE @N9@\n0 @F1@ FAM\n1 HUSB @I7@\n");
        let unresolved: Vec<_> = out
            .findings
            .iter()
            .filter(|f| f.code == FindingCode::UnresolvedReference)
            .collect();
        assert_eq!(unresolved.len(), 3);
        assert_eq!(out.value.individuals[0].child_of[0].state, RefState::Dangling);
        assert!(out.value.individuals[0].notes[0].is_dangling());
        assert_eq!(out.value.families[0].husband, None);
    }

    #[test]
    fn per_parent_pedigree_from_family() {
        let out = run(
            "0 @F1@ FAM\n1 HUSB @I1@\n1 WIFE @I2@\n1 CHIL @I3@\n2 _FREL Adopted\n2 _MREL Natural\n\
             0 @I1@ INDI\n0 @I2@ INDI\n0 @I3@ INDI\n",
        );
        let link = &out.value.families[0].children[0];
        assert_eq!(link.father, Pedigree::Adopted);
        assert_eq!(link.mother, Pedigree::Biological);
    }

    #[test]
    fn child_pedi_applies_to_unqualified_link() {
        let out = run("0 @F1@ FAM\n1 CHIL @I3@\n0 @I3@ INDI\n1 FAMC @F1@\n2 PEDI foster\n");
        let link = &out.value.families[0].children[0];
        assert_eq!(link.father, Pedigree::Foster);
        assert_eq!(link.mother, Pedigree::Foster);
    }

    #[test]
    fn one_sided_famc_adds_child_to_family() {
        let out = run("0 @F1@ FAM\n1 HUSB @I1@\n0 @I1@ INDI\n1 SEX M\n0 @I2@ INDI\n1 FAMC @F1@\n");
        assert_eq!(out.value.families[0].children.len(), 1);
        assert_eq!(out.value.families[0].children[0].child, "@I2@");
        assert!(out
            .findings
            .iter()
            .any(|f| f.code == FindingCode::MissingReciprocalLink && f.severity == Severity::Info));
    }

    #[test]
    fn one_sided_fams_fills_partner_slot() {
        let out = run("0 @F1@ FAM\n0 @I2@ INDI\n1 SEX F\n1 FAMS @F1@\n");
        assert_eq!(out.value.families[0].wife.as_deref(), Some("@I2@"));
    }

    #[test]
    fn unreferenced_shared_records_are_orphans() {
        let out = run("0 @N1@ NOTE lonely\n0 @S1@ SOUR\n1 TITL Used\n0 @I1@ INDI\n1 SOUR @S1@\n");
        let orphans: Vec<_> = out
            .findings
            .iter()
            .filter(|f| f.code == FindingCode::OrphanedSharedRecord)
            .collect();
        assert_eq!(orphans.len(), 1);
        assert!(orphans[0].mentions("@N1@"));
        assert_eq!(orphans[0].severity, Severity::Info);
    }

    #[test]
    fn duplicate_xref_keeps_first() {
        let out = run("0 @I1@ INDI\n1 NAME First\n0 @I1@ INDI\n1 NAME Second\n");
        assert_eq!(out.value.individuals.len(), 1);
        assert_eq!(out.value.individuals[0].display_name(), "First");
        assert_eq!(out.findings.len(), 1);
    }

    #[test]
    fn cancelled_before_start_extracts_nothing() {
        let tree = parse(normalize(tokenize(FAMILY).value)).value;
        let token = CancelToken::new();
        token.cancel();
        let out = extract(&tree, &token);
        assert!(out.value.cancelled);
        assert!(out.value.individuals.is_empty());
    }

    #[test]
    fn inline_media_and_notes() {
        let out = run("0 @I1@ INDI\n1 OBJE\n2 FILE photos/john.jpg\n1 NOTE Free text\n");
        let indi = &out.value.individuals[0];
        assert_eq!(indi.media[0], RecordRef::inline("photos/john.jpg"));
        assert_eq!(indi.notes[0], RecordRef::inline("Free text"));
    }
}
