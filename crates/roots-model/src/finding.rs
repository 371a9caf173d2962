//! Findings: recorded anomalies with machine-readable codes
//!
//! Every recoverable anomaly (parse, extraction, graph build, validation)
//! becomes a [`Finding`]. Findings are data, never thrown: callers decide
//! what to present.

use crate::id::Location;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Finding severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational quality signal
    Info,
    /// Data is usable but probably wrong
    Warning,
    /// Data contradicts itself
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Machine-readable finding code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FindingCode {
    /// Structural problem in the interchange file, recovered
    MalformedStructure,
    /// Pointer or link with no matching record/document
    UnresolvedReference,
    /// Name matching two or more documents
    AmbiguousReference,
    /// Two halves of a parent/child fact disagree
    ParentClaimConflict,
    /// Directed cycle in parent→child edges
    RelationshipCycle,
    /// Shared note/source/media referenced by nothing
    OrphanedSharedRecord,
    /// One side of a relationship is silent about the other
    MissingReciprocalLink,
    /// Two documents share a canonical id
    DuplicateIdentity,
    /// Person document without a canonical id
    MissingIdentifier,
    /// Person linked to itself
    SelfReference,
    /// Same target listed twice in one field
    DuplicateLink,
    /// Parent slot disagrees with the parent's recorded sex
    SexMismatch,
    /// Reciprocal parent slot cannot be chosen without a sex
    UnknownParentSex,
    /// Display name shared by two or more documents
    AmbiguousName,
    /// Unrecognised pedigree qualifier
    InvalidPedigree,
    /// Explicit id and textual link on one field disagree
    LinkMismatch,
}

impl FindingCode {
    /// Severity used when none is given explicitly
    #[must_use]
    pub fn default_severity(self) -> Severity {
        match self {
            Self::ParentClaimConflict
            | Self::RelationshipCycle
            | Self::DuplicateIdentity
            | Self::SelfReference => Severity::Error,
            Self::MalformedStructure
            | Self::UnresolvedReference
            | Self::AmbiguousReference
            | Self::MissingReciprocalLink
            | Self::MissingIdentifier
            | Self::SexMismatch
            | Self::LinkMismatch => Severity::Warning,
            Self::OrphanedSharedRecord
            | Self::DuplicateLink
            | Self::UnknownParentSex
            | Self::AmbiguousName
            | Self::InvalidPedigree => Severity::Info,
        }
    }

    /// Stable string form
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedStructure => "MalformedStructure",
            Self::UnresolvedReference => "UnresolvedReference",
            Self::AmbiguousReference => "AmbiguousReference",
            Self::ParentClaimConflict => "ParentClaimConflict",
            Self::RelationshipCycle => "RelationshipCycle",
            Self::OrphanedSharedRecord => "OrphanedSharedRecord",
            Self::MissingReciprocalLink => "MissingReciprocalLink",
            Self::DuplicateIdentity => "DuplicateIdentity",
            Self::MissingIdentifier => "MissingIdentifier",
            Self::SelfReference => "SelfReference",
            Self::DuplicateLink => "DuplicateLink",
            Self::SexMismatch => "SexMismatch",
            Self::UnknownParentSex => "UnknownParentSex",
            Self::AmbiguousName => "AmbiguousName",
            Self::InvalidPedigree => "InvalidPedigree",
            Self::LinkMismatch => "LinkMismatch",
        }
    }
}

impl Display for FindingCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded anomaly
///
/// Carries enough context for a host to render an actionable message or a
/// "jump to document" action: affected ids, field, location and line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Machine code
    pub code: FindingCode,
    /// Severity
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Affected identifiers (person ids, cross-reference ids)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subjects: Vec<String>,
    /// Metadata field or tag involved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Document the finding belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Candidate documents (ambiguity) or cycle members in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<String>,
    /// 1-based line in the interchange file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Finding {
    /// Create finding with the code's default severity
    #[must_use]
    pub fn new(code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            message: message.into(),
            subjects: Vec::new(),
            field: None,
            location: None,
            candidates: Vec::new(),
            line: None,
        }
    }

    /// Override severity
    #[inline]
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Add an affected identifier
    #[inline]
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subjects.push(subject.into());
        self
    }

    /// Set the field name
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the document location
    #[inline]
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set candidate list
    #[inline]
    #[must_use]
    pub fn with_candidates<I, S>(mut self, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candidates = candidates.into_iter().map(Into::into).collect();
        self
    }

    /// Set line number
    #[inline]
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Whether the finding concerns the given subject
    #[must_use]
    pub fn mentions(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }
}

impl Display for Finding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)?;
        if let Some(location) = &self.location {
            write!(f, " ({location})")?;
        }
        if let Some(line) = self.line {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}
