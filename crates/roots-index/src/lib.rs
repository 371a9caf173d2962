//! Roots Index
//!
//! Identity index and textual link resolution over person documents.
//!
//! # Overview
//!
//! - **IdentityIndex**: location ↔ canonical id and name → locations, with
//!   explicit `invalidate`/`rebuild` and immediate `forget` on deletes
//! - **LinkText**: wikilink, bare name and path parsing
//! - **LinkResolution**: `Resolved`, `Ambiguous` (never tie-broken) or
//!   `Unresolved`
//!
//! # Example
//!
//! ```rust
//! use roots_index::{IdentityIndex, LinkResolution};
//! use roots_model::{Location, PersonId};
//!
//! let mut index = IdentityIndex::new();
//! index
//!     .register(Location::new("People/Ada.md"), Some(PersonId::new("a1")), "Ada Byron")
//!     .unwrap();
//!
//! assert!(matches!(
//!     index.resolve_link("[[Ada Byron]]"),
//!     LinkResolution::Resolved { .. }
//! ));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod index;
pub mod link;

// Re-exports
pub use error::IndexError;
pub use index::{IdentityIndex, IndexEntry, LinkResolution};
pub use link::{name_key, wikilink, LinkText};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for link resolution
    pub use crate::{IdentityIndex, IndexError, LinkResolution, LinkText};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
