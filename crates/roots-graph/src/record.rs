//! Person records: the builder's input
//!
//! A [`PersonRecord`] is the typed reading of one person document: its
//! identity plus every relationship it asserts, each as a
//! [`RelationClaim`] that still has to be resolved.

use roots_index::LinkText;
use roots_model::{Location, Pedigree, PersonId, Sex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relationship a document field asserts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Biological father
    Father,
    /// Biological mother
    Mother,
    /// Step-father
    StepFather,
    /// Step-mother
    StepMother,
    /// Adoptive father
    AdoptiveFather,
    /// Adoptive mother
    AdoptiveMother,
    /// Foster parent (either sex)
    FosterParent,
    /// Spouse or partner
    Spouse,
    /// Child (pedigree carried by the claim)
    Child,
}

impl RelationKind {
    /// Every kind in field order
    pub const ALL: [Self; 9] = [
        Self::Father,
        Self::Mother,
        Self::StepFather,
        Self::StepMother,
        Self::AdoptiveFather,
        Self::AdoptiveMother,
        Self::FosterParent,
        Self::Spouse,
        Self::Child,
    ];

    /// Field holding explicit ids
    #[must_use]
    pub fn id_field(self) -> &'static str {
        match self {
            Self::Father => "father_id",
            Self::Mother => "mother_id",
            Self::StepFather => "stepfather_id",
            Self::StepMother => "stepmother_id",
            Self::AdoptiveFather => "adoptive_father_id",
            Self::AdoptiveMother => "adoptive_mother_id",
            Self::FosterParent => "foster_parent_id",
            Self::Spouse => "spouse_id",
            Self::Child => "children_id",
        }
    }

    /// Field holding textual links
    #[must_use]
    pub fn link_field(self) -> &'static str {
        match self {
            Self::Father => "father",
            Self::Mother => "mother",
            Self::StepFather => "stepfather",
            Self::StepMother => "stepmother",
            Self::AdoptiveFather => "adoptive_father",
            Self::AdoptiveMother => "adoptive_mother",
            Self::FosterParent => "foster_parent",
            Self::Spouse => "spouse",
            Self::Child => "children",
        }
    }

    /// Whether the target is a parent of the claiming person
    #[inline]
    #[must_use]
    pub fn is_parent(self) -> bool {
        !matches!(self, Self::Spouse | Self::Child)
    }

    /// Whether the person holds at most one target of this kind
    #[inline]
    #[must_use]
    pub fn is_single(self) -> bool {
        matches!(
            self,
            Self::Father | Self::Mother | Self::AdoptiveFather | Self::AdoptiveMother
        )
    }

    /// Pedigree of a parent kind
    #[must_use]
    pub fn pedigree(self) -> Option<Pedigree> {
        match self {
            Self::Father | Self::Mother => Some(Pedigree::Biological),
            Self::StepFather | Self::StepMother => Some(Pedigree::Step),
            Self::AdoptiveFather | Self::AdoptiveMother => Some(Pedigree::Adopted),
            Self::FosterParent => Some(Pedigree::Foster),
            Self::Spouse | Self::Child => None,
        }
    }

    /// Sex a parent of this kind is expected to have
    #[must_use]
    pub fn parent_sex(self) -> Option<Sex> {
        match self {
            Self::Father | Self::StepFather | Self::AdoptiveFather => Some(Sex::Male),
            Self::Mother | Self::StepMother | Self::AdoptiveMother => Some(Sex::Female),
            Self::FosterParent | Self::Spouse | Self::Child => None,
        }
    }

    /// Parent slot a child should use for a parent of `sex` under `pedigree`
    ///
    /// `None` when the slot depends on a sex that is unknown.
    /// Unspecified pedigree fills the biological slots.
    #[must_use]
    pub fn parent_slot(pedigree: Pedigree, sex: Sex) -> Option<Self> {
        match (pedigree, sex) {
            (Pedigree::Foster, _) => Some(Self::FosterParent),
            (_, Sex::Unknown) => None,
            (Pedigree::Biological | Pedigree::Unspecified, Sex::Male) => Some(Self::Father),
            (Pedigree::Biological | Pedigree::Unspecified, Sex::Female) => Some(Self::Mother),
            (Pedigree::Step, Sex::Male) => Some(Self::StepFather),
            (Pedigree::Step, Sex::Female) => Some(Self::StepMother),
            (Pedigree::Adopted, Sex::Male) => Some(Self::AdoptiveFather),
            (Pedigree::Adopted, Sex::Female) => Some(Self::AdoptiveMother),
        }
    }

    /// Parent kinds that share a pedigree class with `pedigree`
    #[must_use]
    pub fn parent_kinds_for(pedigree: Pedigree) -> &'static [Self] {
        match pedigree {
            Pedigree::Biological | Pedigree::Unspecified => &[Self::Father, Self::Mother],
            Pedigree::Step => &[Self::StepFather, Self::StepMother],
            Pedigree::Adopted => &[Self::AdoptiveFather, Self::AdoptiveMother],
            Pedigree::Foster => &[Self::FosterParent],
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.link_field())
    }
}

/// Whether two pedigrees describe the same kind of parenthood
#[must_use]
pub fn same_pedigree_class(a: Pedigree, b: Pedigree) -> bool {
    a == b || (a.is_birth_like() && b.is_birth_like())
}

/// Who a claim points at, before resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimTarget {
    /// Explicit id field value; trusted but must exist
    Explicit(PersonId),
    /// Textual link resolved through the identity index
    Link(LinkText),
}

impl fmt::Display for ClaimTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(id) => write!(f, "{id}"),
            Self::Link(link) => write!(f, "{link}"),
        }
    }
}

/// One asserted relationship
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationClaim {
    /// Relationship
    pub kind: RelationKind,
    /// Target
    pub target: ClaimTarget,
    /// Pedigree (children claims carry their own; parent kinds imply one)
    pub pedigree: Pedigree,
    /// Textual link in the same position of an explicit claim's field
    pub shadow: Option<LinkText>,
    /// Entry position within its field
    pub position: usize,
}

impl RelationClaim {
    /// Claim for a parent/spouse kind
    #[must_use]
    pub fn new(kind: RelationKind, target: ClaimTarget) -> Self {
        Self {
            kind,
            target,
            pedigree: kind.pedigree().unwrap_or_default(),
            shadow: None,
            position: 0,
        }
    }

    /// Set pedigree
    #[inline]
    #[must_use]
    pub fn with_pedigree(mut self, pedigree: Pedigree) -> Self {
        self.pedigree = pedigree;
        self
    }

    /// Set shadow link
    #[inline]
    #[must_use]
    pub fn with_shadow(mut self, shadow: Option<LinkText>) -> Self {
        self.shadow = shadow;
        self
    }

    /// Set entry position
    #[inline]
    #[must_use]
    pub fn at(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Field the claim was read from
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self.target {
            ClaimTarget::Explicit(_) => self.kind.id_field(),
            ClaimTarget::Link(_) => self.kind.link_field(),
        }
    }
}

/// Typed reading of one person document
#[derive(Debug, Clone, PartialEq)]
pub struct PersonRecord {
    /// Canonical id (`cr_id`), when assigned
    pub id: Option<PersonId>,
    /// Document location
    pub location: Location,
    /// Display name
    pub name: String,
    /// Sex
    pub sex: Sex,
    /// Birth date as written
    pub born: Option<String>,
    /// Death date as written
    pub died: Option<String>,
    /// Asserted relationships in field order
    pub claims: Vec<RelationClaim>,
    /// Source references
    pub sources: Vec<String>,
    /// Media references
    pub media: Vec<String>,
}

impl PersonRecord {
    /// Record without relationships
    #[must_use]
    pub fn new(location: Location, name: impl Into<String>) -> Self {
        Self {
            id: None,
            location,
            name: name.into(),
            sex: Sex::Unknown,
            born: None,
            died: None,
            claims: Vec::new(),
            sources: Vec::new(),
            media: Vec::new(),
        }
    }

    /// Set canonical id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(PersonId::new(id));
        self
    }

    /// Set sex
    #[inline]
    #[must_use]
    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = sex;
        self
    }

    /// Add claim
    #[inline]
    #[must_use]
    pub fn with_claim(mut self, claim: RelationClaim) -> Self {
        self.claims.push(claim);
        self
    }
}
