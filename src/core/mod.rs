//! Core resolution logic.
//!
//! This module contains:
//! - Distance: weighted and substring edit distance
//! - Containment: fuzzy "name occurs in line" test
//! - Weapon: weapon line resolution restricted by weapon type
//! - Artifact: artifact set extraction and classification
//! - Normalizer: carry-forward repair of merged cells
//! - Pipeline: end-to-end block resolution

pub mod artifact;
pub mod containment;
pub mod distance;
pub mod normalizer;
pub mod pipeline;
pub mod weapon;

// Re-export commonly used types
pub use artifact::{classify, resolve_artifact_line, ArtifactSetExtractor, CHOOSE_AMOUNT};
pub use containment::{adjusted_distance, fuzzy_contains, Containment, DEFAULT_ERROR_BUDGET};
pub use distance::{
    damerau_distance, distance, substring_distance, weighted_distance, EditWeights,
};
pub use normalizer::{normalize_block, CarryField, CellResolver, NormalizeError};
pub use pipeline::{digest_blocks, ResolutionOutput, ResolutionPipeline, ResolveError};
pub use weapon::{
    resolve_weapon_line, MatchStrategy, RankedHit, WeaponResolver, DEFAULT_RANKED_THRESHOLD,
};
