//! buildsheet - Character build spreadsheet resolver
//!
//! Turns the freeform text of a community build spreadsheet into structured
//! character records whose weapons and artifact sets are catalog
//! identifiers.
//!
//! # Architecture
//!
//! Resolution is a pure function of its inputs:
//! - The catalog and roster are loaded once and passed explicitly
//! - Blocks are resolved in order; each block is independent
//! - Unresolvable text is dropped and recorded in the run report
//!
//! # Modules
//!
//! - `adapters`: Block sources and record sinks (sheet ranges, JSON)
//! - `core`: Matching and resolution (distance, weapons, artifacts, pipeline)
//! - `domain`: Data structures (candidates, builds, report)
//! - `library`: Candidate catalog and character roster
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Resolve an exported sheet
//! buildsheet resolve --input ranges.json --output data.json
//!
//! # Check how a single line is matched
//! buildsheet weapon catalyst "Kagura's Verity (R1)"
//! buildsheet artifacts "Gladiator's Finale / Shimenawa's Reminiscence"
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod library;

// Re-export main types at crate root for convenience
pub use core::{MatchStrategy, ResolutionOutput, ResolutionPipeline, ResolveError};
pub use domain::{
    ArtifactSetChoice, ArtifactSetSelection, CharacterBlock, CharacterRecord, RawBuildRow,
    ResolutionReport, ResolvedBuild,
};
pub use library::{Catalog, Roster};
