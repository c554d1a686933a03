//! Static reference data the resolver works against.
//!
//! Both registries are loaded once from JSON and are read-only for the
//! rest of the run.
//!
//! # File Layout
//!
//! ```text
//! ~/.buildsheet/
//! ├── catalog.json    # weapons, artifact sets, artifact groups
//! └── roster.json     # characters: id, name, element, weapon_type
//! ```

pub mod catalog;
pub mod roster;

pub use catalog::{Catalog, CatalogError, CatalogFile};
pub use roster::{Roster, RosterEntry};
