//! Roots GEDCOM
//!
//! Reads GEDCOM 5.5/5.5.1 files into typed entities.
//!
//! # Overview
//!
//! The pipeline runs in fixed stages, each recording findings instead of
//! failing:
//!
//! 1. **Decoding**: byte-order mark, header `CHAR` or UTF-8 with a
//!    Windows-1252 fallback
//! 2. **Tokenizing**: physical lines into [`GedcomLine`]s
//! 3. **Normalizing**: `CONC`/`CONT` folded into their owner's value
//! 4. **Parsing**: a level-consistent [`TagTree`]
//! 5. **Extraction**: individuals, families and shared records with every
//!    pointer settled in one resolution pass
//!
//! # Example
//!
//! ```rust
//! use roots_gedcom::read_gedcom;
//! use roots_model::CancelToken;
//!
//! let text = b"0 HEAD\n0 @I1@ INDI\n1 NAME Ada /Byron/\n0 TRLR\n";
//! let outcome = read_gedcom(text, &CancelToken::new());
//! assert_eq!(outcome.value.individuals[0].display_name(), "Ada Byron");
//! ```

#![warn(missing_docs)]

pub mod anonymize;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod line;
pub mod model;
pub mod normalize;
pub mod parser;

// Re-exports
pub use anonymize::{AnonymizeOptions, AnonymizeSummary, Anonymizer};
pub use encoding::{decode, Charset, Decoded};
pub use error::GedcomError;
pub use extract::extract;
pub use line::{tokenize, GedcomLine};
pub use model::{
    ChildLink, Citation, EntityKey, Event, Family, FamilyMembership, GedcomData, Header, Individual,
    PersonName, RecordRef, RefState, SharedKind, SharedRecord,
};
pub use normalize::normalize;
pub use parser::{parse, TagRecord, TagTree};

use roots_model::{CancelToken, Outcome};
use std::path::Path;

/// Tag tree from already-decoded text
#[must_use]
pub fn parse_text(text: &str) -> Outcome<TagTree> {
    let mut out = Outcome::new(());
    let lines = out.absorb(tokenize(text));
    let tree = out.absorb(parse(normalize(lines)));
    Outcome::with_findings(tree, out.findings)
}

/// Full pipeline from raw bytes to extracted entities
#[must_use]
pub fn read_gedcom(bytes: &[u8], cancel: &CancelToken) -> Outcome<GedcomData> {
    let mut out = Outcome::new(());
    let decoded = out.absorb(decode(bytes));
    tracing::info!(bytes = bytes.len(), charset = %decoded.charset, "reading GEDCOM");

    let tree = out.absorb(parse_text(&decoded.text));
    let data = out.absorb(extract(&tree, cancel));
    Outcome::with_findings(data, out.findings)
}

/// Read a file from disk and run the full pipeline
///
/// # Errors
/// Returns [`GedcomError::Io`] when the file cannot be read.
pub fn read_gedcom_file(path: &Path, cancel: &CancelToken) -> Result<Outcome<GedcomData>, GedcomError> {
    let bytes = std::fs::read(path).map_err(|e| GedcomError::io_error(path, e))?;
    Ok(read_gedcom(&bytes, cancel))
}

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for GEDCOM reading
    pub use crate::{read_gedcom, read_gedcom_file, Family, GedcomData, Individual, Pedigree, RecordRef, TagTree};
}

pub use roots_model::Pedigree;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
