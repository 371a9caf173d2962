//! Roots Core
//!
//! Ties the interchange reader, identity index and family graph together:
//! - Imports GEDCOM files into person documents through a writable store
//! - Keeps a resident, lazily rebuilt tree over a document store
//! - Runs validation and fix operations against that tree
//!
//! # Example
//!
//! ```rust
//! use roots_core::{FamilyTree, Importer, MemoryStore, RootsConfig};
//! use roots_model::CancelToken;
//!
//! let text = b"0 @I1@ INDI\n1 NAME Ada /Byron/\n1 SEX F\n0 TRLR\n";
//! let mut store = MemoryStore::new();
//! let report = Importer::default().run(text, &mut store, &CancelToken::new()).unwrap();
//! assert_eq!(report.written.len(), 1);
//!
//! let tree = FamilyTree::new(RootsConfig::default());
//! tree.load(&store).unwrap();
//! assert_eq!(tree.graph().len(), 1);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod import;
pub mod store;
pub mod tree;

// Re-exports
pub use config::{ImportOptions, RootsConfig};
pub use error::{Result, RootsError};
pub use import::{ImportReport, Importer};
pub use store::MemoryStore;
pub use tree::FamilyTree;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Roots Core
    pub use crate::{FamilyTree, ImportOptions, ImportReport, Importer, MemoryStore, RootsConfig, RootsError};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
