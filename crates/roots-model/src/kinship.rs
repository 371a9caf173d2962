//! Pedigree qualifiers and sex
//!
//! A pedigree qualifier tells what kind of parent/child link was asserted.
//! An absent qualifier means biological; an unrecognised one becomes
//! [`Pedigree::Unspecified`] and the caller records an `InvalidPedigree`
//! finding.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Nature of a parent/child link
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pedigree {
    /// Birth parent (default when no qualifier is given)
    #[default]
    Biological,
    /// Step parent
    Step,
    /// Adoptive parent
    Adopted,
    /// Foster parent
    Foster,
    /// Qualifier present but meaningless ("unknown", "sealing", typos)
    Unspecified,
}

impl Pedigree {
    /// Parse a qualifier; `None` when unrecognised
    ///
    /// Accepts the interchange-file `PEDI` values, the `_FREL`/`_MREL`
    /// vocabulary and the words people type into documents.
    #[must_use]
    pub fn from_qualifier(raw: &str) -> Option<Self> {
        let lower = raw.trim().to_ascii_lowercase();
        let pedigree = match lower.as_str() {
            "birth" | "biological" | "bio" | "natural" | "blood" => Self::Biological,
            "step" | "stepchild" | "step-child" | "stepparent" | "step-parent" => Self::Step,
            "adopted" | "adoptive" | "adoption" => Self::Adopted,
            "foster" => Self::Foster,
            "unknown" | "unspecified" | "sealing" | "private" => Self::Unspecified,
            _ => return None,
        };
        Some(pedigree)
    }

    /// Resolve an optional qualifier with the documented default
    ///
    /// Absent → [`Pedigree::Biological`], unrecognised →
    /// [`Pedigree::Unspecified`].
    #[must_use]
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Biological,
            Some(value) => Self::from_qualifier(value).unwrap_or(Self::Unspecified),
        }
    }

    /// Stable string form
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Biological => "biological",
            Self::Step => "step",
            Self::Adopted => "adopted",
            Self::Foster => "foster",
            Self::Unspecified => "unspecified",
        }
    }

    /// Edges asserted under this qualifier fill the birth-parent slots
    #[inline]
    #[must_use]
    pub fn is_birth_like(self) -> bool {
        matches!(self, Self::Biological | Self::Unspecified)
    }
}

impl Display for Pedigree {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recorded sex of a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    /// Male
    Male,
    /// Female
    Female,
    /// Unknown or not recorded
    #[default]
    Unknown,
}

impl Sex {
    /// Parse `M`/`F`/`male`/`female`; anything else is unknown
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "m" | "male" | "man" => Self::Male,
            "f" | "female" | "woman" => Self::Female,
            _ => Self::Unknown,
        }
    }

    /// Single-letter form used in documents
    #[must_use]
    pub fn as_letter(self) -> Option<&'static str> {
        match self {
            Self::Male => Some("M"),
            Self::Female => Some("F"),
            Self::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_qualifier_is_biological() {
        assert_eq!(Pedigree::resolve(None), Pedigree::Biological);
        assert_eq!(Pedigree::resolve(Some("  ")), Pedigree::Biological);
    }

    #[test]
    fn known_qualifiers_parse_case_insensitively() {
        assert_eq!(Pedigree::resolve(Some("STEP")), Pedigree::Step);
        assert_eq!(Pedigree::resolve(Some("adopted")), Pedigree::Adopted);
        assert_eq!(Pedigree::resolve(Some("Natural")), Pedigree::Biological);
        assert_eq!(Pedigree::resolve(Some("foster")), Pedigree::Foster);
    }

    #[test]
    fn unknown_qualifier_is_unspecified() {
        assert_eq!(Pedigree::from_qualifier("godparent"), None);
        assert_eq!(Pedigree::resolve(Some("godparent")), Pedigree::Unspecified);
    }

    #[test]
    fn sex_parsing() {
        assert_eq!(Sex::parse("M"), Sex::Male);
        assert_eq!(Sex::parse("female"), Sex::Female);
        assert_eq!(Sex::parse("U"), Sex::Unknown);
        assert_eq!(Sex::Unknown.as_letter(), None);
    }
}
