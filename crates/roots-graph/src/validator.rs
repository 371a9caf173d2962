//! Consistency and quality checks
//!
//! [`FamilyValidator`] runs a fixed battery of checks over a built graph
//! and its index. It never mutates anything; repairs go through
//! [`crate::fix`].

use crate::document::ID_KEY;
use crate::graph::FamilyGraph;
use roots_index::IdentityIndex;
use roots_model::{Finding, FindingCode, Sex};
use std::cmp::Reverse;

/// Graph and index validator
#[derive(Debug, Clone, Copy)]
pub struct FamilyValidator;

impl FamilyValidator {
    /// Create new validator instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Every finding for the graph, most severe first
    ///
    /// Build findings plus duplicate entries, missing ids, parent sex
    /// mismatches and names shared by several documents.
    #[must_use]
    pub fn validate(&self, graph: &FamilyGraph, index: &IdentityIndex) -> Vec<Finding> {
        let mut findings = graph.findings().to_vec();
        findings.extend(Self::duplicate_links(graph));
        findings.extend(Self::missing_identifiers(graph));
        findings.extend(Self::sex_mismatches(graph));
        findings.extend(Self::ambiguous_names(index));

        findings.sort_by(|a, b| {
            (Reverse(a.severity), a.code, &a.location, &a.subjects)
                .cmp(&(Reverse(b.severity), b.code, &b.location, &b.subjects))
        });
        findings
    }

    /// Findings of one code only
    #[must_use]
    pub fn validate_code(&self, graph: &FamilyGraph, index: &IdentityIndex, code: FindingCode) -> Vec<Finding> {
        self.validate(graph, index)
            .into_iter()
            .filter(|f| f.code == code)
            .collect()
    }

    fn duplicate_links(graph: &FamilyGraph) -> Vec<Finding> {
        graph
            .duplicates()
            .iter()
            .map(|dup| {
                Finding::new(
                    FindingCode::DuplicateLink,
                    format!("{} lists {} more than once", dup.field, dup.target),
                )
                .with_subject(dup.holder.as_str())
                .with_field(dup.field.clone())
                .with_location(dup.location.clone())
            })
            .collect()
    }

    fn missing_identifiers(graph: &FamilyGraph) -> Vec<Finding> {
        graph
            .missing_ids()
            .iter()
            .map(|location| {
                Finding::new(
                    FindingCode::MissingIdentifier,
                    format!("{} has no {ID_KEY}", location.display_name()),
                )
                .with_field(ID_KEY)
                .with_location(location.clone())
            })
            .collect()
    }

    fn sex_mismatches(graph: &FamilyGraph) -> Vec<Finding> {
        let mut out = Vec::new();
        for child in graph.nodes() {
            for (kind, parent) in graph.parents_of(&child.id) {
                let Some(expected) = kind.parent_sex() else {
                    continue;
                };
                if parent.sex != Sex::Unknown && parent.sex != expected {
                    out.push(
                        Finding::new(
                            FindingCode::SexMismatch,
                            format!(
                                "{} is {}'s {kind} but is recorded as {}",
                                parent.name,
                                child.name,
                                parent.sex.as_letter().unwrap_or("?")
                            ),
                        )
                        .with_subject(parent.id.as_str())
                        .with_subject(child.id.as_str())
                        .with_field(kind.id_field())
                        .with_location(child.location.clone()),
                    );
                }
            }
        }
        out
    }

    fn ambiguous_names(index: &IdentityIndex) -> Vec<Finding> {
        index
            .ambiguous_names()
            .into_iter()
            .map(|(name, locations)| {
                Finding::new(
                    FindingCode::AmbiguousName,
                    format!("'{name}' names {} documents", locations.len()),
                )
                .with_candidates(locations.iter().map(ToString::to_string))
            })
            .collect()
    }
}

impl Default for FamilyValidator {
    fn default() -> Self {
        Self::new()
    }
}
