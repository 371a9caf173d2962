//! Extracted GEDCOM entities
//!
//! Entities refer to each other by cross-reference id. A reference starts
//! [`RefState::Pending`] and is settled exactly once by the resolution pass
//! that runs after every top-level record has been extracted.

use roots_model::{Pedigree, Sex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resolution state of a pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefState {
    /// Not yet looked up
    #[default]
    Pending,
    /// Target exists
    Resolved,
    /// Target is not defined in the file
    Dangling,
}

/// Reference to a shared record or inline content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecordRef {
    /// `@X1@` pointer to a top-level record
    Pointer {
        /// Target xref
        xref: String,
        /// Lookup state
        state: RefState,
    },
    /// Content given in place (note text, source title, media path)
    Inline {
        /// The content
        text: String,
    },
}

impl RecordRef {
    /// Pending pointer
    #[inline]
    #[must_use]
    pub fn pointer(xref: impl Into<String>) -> Self {
        Self::Pointer {
            xref: xref.into(),
            state: RefState::Pending,
        }
    }

    /// Inline content
    #[inline]
    #[must_use]
    pub fn inline(text: impl Into<String>) -> Self {
        Self::Inline { text: text.into() }
    }

    /// Pointer target, if this is a pointer
    #[must_use]
    pub fn xref(&self) -> Option<&str> {
        match self {
            Self::Pointer { xref, .. } => Some(xref),
            Self::Inline { .. } => None,
        }
    }

    /// Whether this is a pointer whose target is missing
    #[must_use]
    pub fn is_dangling(&self) -> bool {
        matches!(
            self,
            Self::Pointer {
                state: RefState::Dangling,
                ..
            }
        )
    }
}

/// Source citation attached to a person, family or event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Cited source
    pub source: RecordRef,
    /// Page or detail (`PAGE`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

/// Name split into its parts
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonName {
    /// Raw `NAME` value (`John /Smith/ Jr`)
    pub full: String,
    /// Given names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,
    /// Surname
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    /// Prefix (`NPFX`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Suffix (`NSFX` or text after the surname)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Nickname (`NICK`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl PersonName {
    /// Split a raw `NAME` value on its surname slashes
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let full = raw.trim().to_string();
        let mut name = Self {
            full: full.clone(),
            ..Self::default()
        };

        let mut parts = full.splitn(3, '/');
        let before = parts.next().map(str::trim).unwrap_or_default();
        match (parts.next(), parts.next()) {
            (Some(surname), rest) => {
                name.given = non_empty(before);
                name.surname = non_empty(surname.trim());
                name.suffix = rest.map(str::trim).and_then(non_empty);
            }
            (None, _) => name.given = non_empty(before),
        }
        name
    }

    /// Human-readable form (`John Smith Jr`)
    #[must_use]
    pub fn display(&self) -> String {
        let joined = [&self.prefix, &self.given, &self.surname, &self.suffix]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        let text = if joined.is_empty() {
            self.full.replace('/', " ")
        } else {
            joined
        };
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

fn non_empty(s: &str) -> Option<String> {
    Some(s.to_string()).filter(|s| !s.is_empty())
}

/// Dated and placed event (birth, marriage, census, occupation...)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Event {
    /// Tag (`BIRT`, `MARR`, `OCCU`...)
    pub tag: String,
    /// Descriptor value (occupation text, `Y` flags)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// `TYPE` qualifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// `DATE` as written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// `PLAC` as written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    /// Citations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
    /// Notes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<RecordRef>,
}

/// Individual's membership in a family as a child (`FAMC`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMembership {
    /// Family xref
    pub family: String,
    /// `PEDI` qualifier, when given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pedigree: Option<Pedigree>,
    /// Lookup state
    pub state: RefState,
}

/// `INDI` record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Individual {
    /// Xref (`@I1@`)
    pub xref: String,
    /// Names, primary first
    pub names: Vec<PersonName>,
    /// Sex
    pub sex: Sex,
    /// Events and attributes in file order
    pub events: Vec<Event>,
    /// Families this person is a child in
    pub child_of: Vec<FamilyMembership>,
    /// Families this person is a partner in
    pub spouse_of: Vec<String>,
    /// Media references
    pub media: Vec<RecordRef>,
    /// Notes
    pub notes: Vec<RecordRef>,
    /// Citations
    pub citations: Vec<Citation>,
    /// Line of the `INDI` tag
    pub line: usize,
}

impl Individual {
    /// Display form of the primary name, `Unknown` when unnamed
    #[must_use]
    pub fn display_name(&self) -> String {
        self.names
            .first()
            .map(PersonName::display)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// First event with tag
    #[must_use]
    pub fn event(&self, tag: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.tag == tag)
    }
}

/// Child entry of a family with per-parent pedigree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildLink {
    /// Child xref
    pub child: String,
    /// Relationship to the husband
    pub father: Pedigree,
    /// Relationship to the wife
    pub mother: Pedigree,
    /// Whether the family record carried `_FREL`/`_MREL`
    pub qualified: bool,
    /// Lookup state
    pub state: RefState,
}

/// `FAM` record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Family {
    /// Xref (`@F1@`)
    pub xref: String,
    /// `HUSB`
    pub husband: Option<String>,
    /// `WIFE`
    pub wife: Option<String>,
    /// `CHIL` entries
    pub children: Vec<ChildLink>,
    /// Events (`MARR`, `DIV`...)
    pub events: Vec<Event>,
    /// Media
    pub media: Vec<RecordRef>,
    /// Notes
    pub notes: Vec<RecordRef>,
    /// Citations
    pub citations: Vec<Citation>,
    /// Line of the `FAM` tag
    pub line: usize,
}

impl Family {
    /// Partners present in the family
    pub fn partners(&self) -> impl Iterator<Item = &str> {
        self.husband.iter().chain(self.wife.iter()).map(String::as_str)
    }
}

/// Kind of shared record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SharedKind {
    /// `NOTE`
    Note,
    /// `SOUR`
    Source,
    /// `OBJE`
    Media,
    /// `REPO`
    Repository,
}

/// Top-level record referenced by pointer (note, source, media, repository)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedRecord {
    /// Xref
    pub xref: String,
    /// Kind
    pub kind: SharedKind,
    /// Title (`TITL`) or repository name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Note text or source text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Author (`AUTH`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Media file path (`FILE`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Line of the record tag
    pub line: usize,
}

impl SharedRecord {
    /// Create empty record
    #[must_use]
    pub fn new(xref: impl Into<String>, kind: SharedKind, line: usize) -> Self {
        Self {
            xref: xref.into(),
            kind,
            title: None,
            text: None,
            author: None,
            file: None,
            line,
        }
    }

    /// Most descriptive single string
    #[must_use]
    pub fn label(&self) -> &str {
        let candidates = match self.kind {
            SharedKind::Media => [&self.title, &self.file, &self.text],
            SharedKind::Note => [&self.text, &self.title, &self.file],
            SharedKind::Source | SharedKind::Repository => [&self.title, &self.text, &self.file],
        };
        candidates.into_iter().flatten().next().map_or("", String::as_str)
    }
}

/// Header fields of interest
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Header {
    /// Producing system (`SOUR`)
    pub source: Option<String>,
    /// GEDCOM version (`GEDC.VERS`)
    pub version: Option<String>,
    /// Declared character set (`CHAR`)
    pub charset: Option<String>,
}

/// Kind of entity an xref names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKey {
    /// Index into `individuals`
    Individual(usize),
    /// Index into `families`
    Family(usize),
    /// Index into `shared`
    Shared(usize),
}

/// Everything extracted from one file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GedcomData {
    /// Header
    pub header: Header,
    /// Individuals in file order
    pub individuals: Vec<Individual>,
    /// Families in file order
    pub families: Vec<Family>,
    /// Notes, sources, media and repositories in file order
    pub shared: Vec<SharedRecord>,
    /// Extraction stopped early
    pub cancelled: bool,
    #[serde(skip)]
    pub(crate) lookup: HashMap<String, EntityKey>,
}

impl GedcomData {
    /// What an xref names
    #[must_use]
    pub fn resolve(&self, xref: &str) -> Option<EntityKey> {
        self.lookup.get(xref).copied()
    }

    /// Individual by xref
    #[must_use]
    pub fn individual(&self, xref: &str) -> Option<&Individual> {
        match self.resolve(xref)? {
            EntityKey::Individual(idx) => self.individuals.get(idx),
            _ => None,
        }
    }

    /// Family by xref
    #[must_use]
    pub fn family(&self, xref: &str) -> Option<&Family> {
        match self.resolve(xref)? {
            EntityKey::Family(idx) => self.families.get(idx),
            _ => None,
        }
    }

    /// Shared record by xref
    #[must_use]
    pub fn shared(&self, xref: &str) -> Option<&SharedRecord> {
        match self.resolve(xref)? {
            EntityKey::Shared(idx) => self.shared.get(idx),
            _ => None,
        }
    }

    /// Text behind a reference (inline content or the target's label)
    #[must_use]
    pub fn content_of<'a>(&'a self, reference: &'a RecordRef) -> Option<&'a str> {
        match reference {
            RecordRef::Inline { text } => Some(text.as_str()),
            RecordRef::Pointer { xref, .. } => self.shared(xref).map(SharedRecord::label),
        }
    }

    /// Families where `xref` is husband or wife
    pub fn families_of<'a>(&'a self, xref: &'a str) -> impl Iterator<Item = &'a Family> + 'a {
        self.families
            .iter()
            .filter(move |f| f.partners().any(|p| p == xref))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_parts_from_slashes() {
        let name = PersonName::parse("John Henry /Smith/ Jr.");
        assert_eq!(name.given.as_deref(), Some("John Henry"));
        assert_eq!(name.surname.as_deref(), Some("Smith"));
        assert_eq!(name.suffix.as_deref(), Some("Jr."));
        assert_eq!(name.display(), "John Henry Smith Jr.");
    }

    #[test]
    fn name_without_slashes() {
        let name = PersonName::parse("Mary");
        assert_eq!(name.given.as_deref(), Some("Mary"));
        assert_eq!(name.surname, None);
        assert_eq!(name.display(), "Mary");
    }

    #[test]
    fn surname_only() {
        let name = PersonName::parse("/Doe/");
        assert_eq!(name.given, None);
        assert_eq!(name.display(), "Doe");
    }

    #[test]
    fn unnamed_individual_is_unknown() {
        let indi = Individual::default();
        assert_eq!(indi.display_name(), "Unknown");
    }

    #[test]
    fn shared_label_prefers_kind_specific_field() {
        let mut media = SharedRecord::new("@M1@", SharedKind::Media, 1);
        media.file = Some("photos/a.jpg".into());
        assert_eq!(media.label(), "photos/a.jpg");
        media.title = Some("Portrait".into());
        assert_eq!(media.label(), "Portrait");

        let mut note = SharedRecord::new("@N1@", SharedKind::Note, 2);
        note.text = Some("text".into());
        assert_eq!(note.label(), "text");
    }
}
