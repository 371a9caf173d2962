//! Roots Graph
//!
//! Validated family graph built from person documents.
//!
//! # Overview
//!
//! - **PersonRecord**: typed reading of one person document
//! - **build_graph**: resolves every claim and cross-checks both halves of
//!   each parent/child fact
//! - **FamilyGraph**: arena of person nodes keyed by canonical id
//! - **FamilyValidator**: read-only battery of quality checks
//! - **plan_fix**: metadata edits for one category of finding
//! - **GraphExport**: nodes and edges for renderers
//!
//! # Example
//!
//! ```rust
//! use roots_graph::{build_graph, ClaimTarget, PersonRecord, RelationClaim, RelationKind};
//! use roots_index::IdentityIndex;
//! use roots_model::{Location, PersonId, Sex};
//!
//! let records = vec![
//!     PersonRecord::new(Location::new("People/Ada.md"), "Ada").with_id("a").with_sex(Sex::Female),
//!     PersonRecord::new(Location::new("People/Byron.md"), "Byron")
//!         .with_id("b")
//!         .with_claim(RelationClaim::new(RelationKind::Mother, ClaimTarget::Explicit(PersonId::new("a")))),
//! ];
//! let outcome = build_graph(&records, &IdentityIndex::new());
//! assert_eq!(outcome.value.children_of(&PersonId::new("a")).len(), 1);
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod cycle;
pub mod document;
pub mod export;
pub mod fix;
pub mod graph;
pub mod record;
pub mod validator;

// Re-exports
pub use builder::build_graph;
pub use cycle::find_cycles;
pub use document::{is_person, read_people, read_person};
pub use export::{EdgeKind, ExportEdge, ExportNode, GraphExport};
pub use fix::{plan_fix, FixKind, MetadataEdit};
pub use graph::{
    ChildEdge, DuplicateEntry, FamilyGraph, IdentityConflict, NameLookup, PersonNode, ReciprocalGap,
};
pub use record::{same_pedigree_class, ClaimTarget, PersonRecord, RelationClaim, RelationKind};
pub use validator::FamilyValidator;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for graph building
    pub use crate::{
        build_graph, plan_fix, FamilyGraph, FamilyValidator, FixKind, MetadataEdit, PersonNode, PersonRecord,
        RelationKind,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
