//! Canonical identifiers and document locations
//!
//! Provides [`PersonId`] (stable identity independent of name or storage)
//! and [`Location`] (a normalized relative document path).

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Prefix marking ids derived from a location rather than assigned
const PROVISIONAL_PREFIX: &str = "loc:";

/// Canonical person identifier
///
/// Assigned once and carried in document metadata. Documents that have not
/// been assigned an id yet are addressed by a provisional id derived from
/// their location until a fix assigns a real one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    /// Wrap an existing identifier (trimmed)
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.len() == id.len() {
            Self(id)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Generate a fresh random identifier
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Provisional identifier for a document without `cr_id`
    #[inline]
    #[must_use]
    pub fn provisional(location: &Location) -> Self {
        Self(format!("{PROVISIONAL_PREFIX}{}", location.as_str()))
    }

    /// Whether this id was derived from a location
    #[inline]
    #[must_use]
    pub fn is_provisional(&self) -> bool {
        self.0.starts_with(PROVISIONAL_PREFIX)
    }

    /// String form
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PersonId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Relative location of a document inside the store
///
/// Always uses forward slashes, never starts with `/` or `./`.
///
/// # Examples
/// - `People/John Smith.md` → display name `John Smith`
/// - `./People\\Jane.md` → `People/Jane.md`
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    /// Create a normalized location
    #[must_use]
    pub fn new(path: impl AsRef<str>) -> Self {
        let mut normalized = path.as_ref().trim().replace('\\', "/");
        while let Some(rest) = normalized.strip_prefix("./") {
            normalized = rest.to_string();
        }
        Self(normalized.trim_start_matches('/').to_string())
    }

    /// Join a folder and a file name
    #[must_use]
    pub fn join(folder: &str, file_name: &str) -> Self {
        let folder = folder.trim().trim_end_matches('/');
        if folder.is_empty() {
            Self::new(file_name)
        } else {
            Self::new(format!("{folder}/{file_name}"))
        }
    }

    /// String form
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Location with a trailing `.md` removed
    #[must_use]
    pub fn without_extension(&self) -> &str {
        strip_md(&self.0)
    }

    /// Display name: file name without folder or `.md` extension
    #[must_use]
    pub fn display_name(&self) -> &str {
        let stem = self.without_extension();
        stem.rsplit('/').next().unwrap_or(stem)
    }

    /// Containing folder (empty at root)
    #[must_use]
    pub fn folder(&self) -> &str {
        self.0.rfind('/').map_or("", |idx| &self.0[..idx])
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

fn strip_md(s: &str) -> &str {
    let split = s.len().saturating_sub(3);
    match s.get(split..) {
        Some(ext) if s.len() >= 3 && ext.eq_ignore_ascii_case(".md") => &s[..split],
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_normalizes_separators() {
        let loc = Location::new("./People\\Smith/John Smith.md");
        assert_eq!(loc.as_str(), "People/Smith/John Smith.md");
        assert_eq!(loc.display_name(), "John Smith");
        assert_eq!(loc.folder(), "People/Smith");
    }

    #[test]
    fn location_without_folder() {
        let loc = Location::new("/Jane.MD");
        assert_eq!(loc.as_str(), "Jane.MD");
        assert_eq!(loc.display_name(), "Jane");
        assert_eq!(loc.folder(), "");
    }

    #[test]
    fn join_handles_trailing_slash() {
        assert_eq!(Location::join("People/", "A.md").as_str(), "People/A.md");
        assert_eq!(Location::join("", "A.md").as_str(), "A.md");
    }

    #[test]
    fn provisional_ids_are_marked() {
        let loc = Location::new("People/A.md");
        let id = PersonId::provisional(&loc);
        assert!(id.is_provisional());
        assert!(!PersonId::new("abc-123").is_provisional());
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(PersonId::generate(), PersonId::generate());
    }

    #[test]
    fn person_id_trims_whitespace() {
        assert_eq!(PersonId::new("  I1 ").as_str(), "I1");
    }
}
