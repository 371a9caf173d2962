//! Person document reader
//!
//! Turns document metadata into a [`PersonRecord`]. Every field is matched
//! totally on its [`FieldValue`] shape; an explicit id field always shadows
//! the textual link field of the same relationship.

use crate::record::{ClaimTarget, PersonRecord, RelationClaim, RelationKind};
use roots_index::LinkText;
use roots_model::{Document, Finding, FindingCode, Metadata, Outcome, Pedigree, PersonId, Sex};

/// Metadata key: type discriminator
pub const TYPE_KEY: &str = "cr_type";
/// Metadata key: canonical id
pub const ID_KEY: &str = "cr_id";
/// Type value for person documents
pub const PERSON_TYPE: &str = "person";
/// Metadata key: pedigree qualifiers aligned with the children fields
pub const CHILDREN_PEDIGREE_KEY: &str = "children_pedigree";

/// Whether metadata describes a person
///
/// `cr_type: person`, or no `cr_type` at all but a `cr_id`.
#[must_use]
pub fn is_person(metadata: &Metadata) -> bool {
    match metadata.text(TYPE_KEY) {
        Some(kind) => kind.eq_ignore_ascii_case(PERSON_TYPE),
        None => metadata.has(ID_KEY),
    }
}

/// Read a person document; `None` for other document types
#[must_use]
pub fn read_person(document: &Document) -> Outcome<Option<PersonRecord>> {
    let meta = &document.metadata;
    if !is_person(meta) {
        return Outcome::new(None);
    }

    let mut out = Outcome::new(());
    let name = meta
        .text("name")
        .unwrap_or_else(|| document.location.display_name())
        .to_string();

    let mut record = PersonRecord::new(document.location.clone(), name);
    record.id = meta.get(ID_KEY).values().into_iter().next().map(PersonId::new);
    record.sex = Sex::parse(meta.text("sex").or_else(|| meta.text("gender")).unwrap_or_default());
    record.born = meta.text("born").map(str::to_string);
    record.died = meta.text("died").map(str::to_string);
    record.sources = meta.get("sources").values();
    record.media = meta.get("media").values();

    for kind in RelationKind::ALL {
        let claims = if kind == RelationKind::Child {
            let pedigrees = out.absorb(read_pedigrees(document));
            read_claims(meta, kind, &pedigrees)
        } else {
            read_claims(meta, kind, &[])
        };
        record.claims.extend(claims);
    }

    Outcome::with_findings(Some(record), out.findings)
}

/// Read every person document of a snapshot
#[must_use]
pub fn read_people<'a>(documents: impl IntoIterator<Item = &'a Document>) -> Outcome<Vec<PersonRecord>> {
    let mut out = Outcome::new(Vec::new());
    for document in documents {
        if let Some(record) = out.absorb(read_person(document)) {
            out.value.push(record);
        }
    }
    out
}

/// Explicit ids win; links fill in only when the id field is empty
fn read_claims(meta: &Metadata, kind: RelationKind, pedigrees: &[Pedigree]) -> Vec<RelationClaim> {
    let ids = meta.get(kind.id_field()).values();
    let links: Vec<LinkText> = meta
        .get(kind.link_field())
        .values()
        .iter()
        .flat_map(|v| LinkText::parse_all(v))
        .collect();

    let pedigree_at = |i: usize| {
        pedigrees
            .get(i)
            .copied()
            .or_else(|| kind.pedigree())
            .unwrap_or_default()
    };

    if ids.is_empty() {
        links
            .into_iter()
            .enumerate()
            .map(|(i, link)| {
                RelationClaim::new(kind, ClaimTarget::Link(link))
                    .with_pedigree(pedigree_at(i))
                    .at(i)
            })
            .collect()
    } else {
        ids.into_iter()
            .enumerate()
            .map(|(i, id)| {
                RelationClaim::new(kind, ClaimTarget::Explicit(PersonId::new(id)))
                    .with_pedigree(pedigree_at(i))
                    .with_shadow(links.get(i).cloned())
                    .at(i)
            })
            .collect()
    }
}

fn read_pedigrees(document: &Document) -> Outcome<Vec<Pedigree>> {
    let mut out = Outcome::new(Vec::new());
    for raw in document.metadata.get(CHILDREN_PEDIGREE_KEY).values() {
        let pedigree = Pedigree::from_qualifier(&raw).unwrap_or_else(|| {
            out.push(
                Finding::new(
                    FindingCode::InvalidPedigree,
                    format!("unrecognised pedigree '{raw}' treated as unspecified"),
                )
                .with_field(CHILDREN_PEDIGREE_KEY)
                .with_location(document.location.clone()),
            );
            Pedigree::Unspecified
        });
        out.value.push(pedigree);
    }
    out
}
