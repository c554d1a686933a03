//! Domain types for the build resolver.
//!
//! This module contains the core data structures:
//! - Candidates: catalog entries and their identifiers
//! - Build: raw sheet rows and resolved records
//! - Report: diagnostics collected during a run

pub mod build;
pub mod candidate;
pub mod report;

// Re-export commonly used types
pub use build::{
    ArtifactSetChoice, ArtifactSetSelection, CharacterBlock, CharacterRecord, RawBuildRow,
    ResolvedBuild,
};
pub use candidate::{
    ArtifactCandidate, ArtifactGroupCandidate, ArtifactGroupId, ArtifactId, CharacterId, Element,
    WeaponCandidate, WeaponId, WeaponType,
};
pub use report::{Diagnostic, DiagnosticKind, ResolutionReport};
