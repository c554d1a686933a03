//! Diagnostics collected while resolving a sheet.
//!
//! Resolution is best-effort: lines that match nothing are dropped and
//! blocks that cannot be identified are skipped. Every such decision is
//! recorded here so a run can be audited afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why something was dropped or flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A weapons line matched no candidate of the character's weapon type
    UnresolvedWeapon,

    /// An artifact-sets line contained no catalog name
    UnresolvedArtifactSet,

    /// The block header matched no roster entry; block skipped
    UnknownCharacter,

    /// A cell was absent on a row with no predecessor; block skipped
    MalformedCarryForward,

    /// The block's weapon type hint disagrees with the roster
    WeaponTypeMismatch,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DiagnosticKind::UnresolvedWeapon => "unresolved_weapon",
            DiagnosticKind::UnresolvedArtifactSet => "unresolved_artifact_set",
            DiagnosticKind::UnknownCharacter => "unknown_character",
            DiagnosticKind::MalformedCarryForward => "malformed_carry_forward",
            DiagnosticKind::WeaponTypeMismatch => "weapon_type_mismatch",
        };
        f.write_str(name)
    }
}

/// A single recorded drop or skip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// Block view name the diagnostic belongs to
    pub character: String,

    /// Zero-based row within the block, if row specific
    pub row: Option<usize>,

    /// Offending text or reason
    pub detail: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, character: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            character: character.into(),
            row: None,
            detail: detail.into(),
        }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

/// Summary of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,

    /// `sha256:<hex>` of the serialized input blocks
    pub input_digest: String,

    pub blocks_seen: usize,
    pub records_resolved: usize,

    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolutionReport {
    pub fn new(input_digest: String) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            completed_at: None,
            input_digest,
            blocks_seen: 0,
            records_resolved: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Number of diagnostics of the given kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    /// Blocks that produced no record
    pub fn blocks_skipped(&self) -> usize {
        self.blocks_seen.saturating_sub(self.records_resolved)
    }
}
