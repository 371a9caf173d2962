//! Best-effort results with accumulated findings
//!
//! Parsing, extraction and graph building never fail on anticipated
//! malformations; they return an [`Outcome`] holding the value they could
//! produce plus every finding recorded along the way.

use crate::finding::{Finding, Severity};

/// Best-effort value plus findings
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    /// The produced value
    pub value: T,
    /// Findings recorded while producing it
    pub findings: Vec<Finding>,
}

impl<T> Outcome<T> {
    /// Outcome without findings
    #[inline]
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value,
            findings: Vec::new(),
        }
    }

    /// Outcome with existing findings
    #[inline]
    #[must_use]
    pub fn with_findings(value: T, findings: Vec<Finding>) -> Self {
        Self { value, findings }
    }

    /// Record a finding
    #[inline]
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Take another outcome's findings and return its value
    pub fn absorb<U>(&mut self, other: Outcome<U>) -> U {
        self.findings.extend(other.findings);
        other.value
    }

    /// Transform the value, keeping findings
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            findings: self.findings,
        }
    }

    /// Split into value and findings
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (T, Vec<Finding>) {
        (self.value, self.findings)
    }

    /// No findings were recorded
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// At least one error-severity finding
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }
}

impl<T: Default> Default for Outcome<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::FindingCode;

    #[test]
    fn absorb_moves_findings() {
        let mut outer = Outcome::new(());
        let mut inner = Outcome::new(5);
        inner.push(Finding::new(FindingCode::MalformedStructure, "x"));

        let value = outer.absorb(inner);
        assert_eq!(value, 5);
        assert_eq!(outer.findings.len(), 1);
    }

    #[test]
    fn has_errors_checks_severity() {
        let mut out = Outcome::new(());
        out.push(Finding::new(FindingCode::DuplicateLink, "info only"));
        assert!(!out.has_errors());
        out.push(Finding::new(FindingCode::RelationshipCycle, "cycle"));
        assert!(out.has_errors());
    }

    #[test]
    fn map_keeps_findings() {
        let out = Outcome::with_findings(
            2,
            vec![Finding::new(FindingCode::InvalidPedigree, "p")],
        )
        .map(|v| v * 2);
        assert_eq!(out.value, 4);
        assert_eq!(out.findings.len(), 1);
    }
}
