//! Roots Model
//!
//! Vocabulary shared by every stage of the family-graph pipeline.
//!
//! # Overview
//!
//! - **PersonId / Location**: canonical identifiers and document locations
//! - **Finding**: a recorded anomaly with a machine code and severity
//! - **Outcome**: best-effort value plus accumulated findings
//! - **FieldValue / Metadata**: typed document metadata
//! - **DocumentStore / DocumentSink**: the host-provided storage boundary
//! - **CancelToken**: cooperative cancellation for long imports
//!
//! # Example
//!
//! ```rust
//! use roots_model::{Finding, FindingCode, Outcome};
//!
//! let mut outcome = Outcome::new(42);
//! outcome.push(Finding::new(FindingCode::MalformedStructure, "level skipped"));
//! assert_eq!(outcome.findings.len(), 1);
//! assert_eq!(outcome.value, 42);
//! ```

#![warn(missing_docs)]

pub mod cancel;
pub mod error;
pub mod finding;
pub mod id;
pub mod kinship;
pub mod metadata;
pub mod outcome;
pub mod store;

// Re-exports
pub use cancel::CancelToken;
pub use error::StoreError;
pub use finding::{Finding, FindingCode, Severity};
pub use id::{Location, PersonId};
pub use kinship::{Pedigree, Sex};
pub use metadata::{FieldValue, Metadata};
pub use outcome::Outcome;
pub use store::{ChangeEvent, ChangeKind, Document, DocumentSink, DocumentStore};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for pipeline stages
    pub use crate::{
        CancelToken, ChangeEvent, ChangeKind, Document, DocumentSink, DocumentStore, FieldValue,
        Finding, FindingCode, Location, Metadata, Outcome, Pedigree, PersonId, Severity, Sex,
        StoreError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
