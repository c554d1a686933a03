//! Resolution pipeline: character blocks in, character records out.
//!
//! For each block the character is identified through the roster, the rows
//! are normalized and every weapons/artifact-sets line is resolved against
//! the catalog. Failures are local: an unresolvable line is dropped, an
//! unknown character or malformed block is skipped, and each of these is
//! logged and recorded in the run report.

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{
    ArtifactSetSelection, CharacterBlock, CharacterRecord, Diagnostic, DiagnosticKind,
    ResolutionReport, WeaponId,
};
use crate::library::{Catalog, Roster, RosterEntry};

use super::artifact::ArtifactSetExtractor;
use super::normalizer::{normalize_block, CellResolver, NormalizeError};
use super::weapon::{MatchStrategy, WeaponResolver};

/// Hard pipeline failures (strict mode only)
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("Block '{character}' is malformed: {source}")]
    MalformedBlock {
        character: String,
        #[source]
        source: NormalizeError,
    },
}

/// Records plus the report describing how they were produced
#[derive(Debug, Clone)]
pub struct ResolutionOutput {
    pub records: Vec<CharacterRecord>,
    pub report: ResolutionReport,
}

/// Resolves character blocks against read-only catalog and roster
#[derive(Debug, Clone)]
pub struct ResolutionPipeline<'a> {
    catalog: &'a Catalog,
    roster: &'a Roster,
    strategy: MatchStrategy,
    strict: bool,
}

impl<'a> ResolutionPipeline<'a> {
    pub fn new(catalog: &'a Catalog, roster: &'a Roster) -> Self {
        Self {
            catalog,
            roster,
            strategy: MatchStrategy::default(),
            strict: false,
        }
    }

    /// Weapon matching strategy used for every line of the run
    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Abort the run on a malformed block instead of skipping it
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolve all blocks in order
    #[instrument(skip(self, blocks), fields(blocks = blocks.len()))]
    pub fn run(&self, blocks: &[CharacterBlock]) -> Result<ResolutionOutput, ResolveError> {
        let mut report = ResolutionReport::new(digest_blocks(blocks));
        info!(run_id = %report.run_id, strategy = ?self.strategy, "Starting resolution");

        let mut records = Vec::with_capacity(blocks.len());
        for block in blocks {
            report.blocks_seen += 1;
            if let Some(record) = self.resolve_block(block, &mut report)? {
                records.push(record);
            }
        }

        report.records_resolved = records.len();
        report.finish();

        info!(
            records = records.len(),
            skipped = report.blocks_skipped(),
            unresolved_weapons = report.count(DiagnosticKind::UnresolvedWeapon),
            unresolved_artifact_sets = report.count(DiagnosticKind::UnresolvedArtifactSet),
            "Resolution finished"
        );

        Ok(ResolutionOutput { records, report })
    }

    /// Resolve one block; `Ok(None)` when the block is skipped
    #[instrument(skip(self, block, report), fields(character = %block.view_name))]
    pub fn resolve_block(
        &self,
        block: &CharacterBlock,
        report: &mut ResolutionReport,
    ) -> Result<Option<CharacterRecord>, ResolveError> {
        let Some(entry) = self.roster.lookup(&block.view_name) else {
            warn!("Unknown character, skipping block");
            report.record(Diagnostic::new(
                DiagnosticKind::UnknownCharacter,
                &block.view_name,
                "no roster entry with this name",
            ));
            return Ok(None);
        };

        if let Some(hint) = block.weapon_type_hint {
            if hint != entry.weapon_type {
                warn!(%hint, roster = %entry.weapon_type, "Weapon type hint disagrees with roster");
                report.record(Diagnostic::new(
                    DiagnosticKind::WeaponTypeMismatch,
                    &block.view_name,
                    format!("hint {} but roster says {}", hint, entry.weapon_type),
                ));
            }
        }

        let mut cells = BlockCells::new(self, entry, &block.view_name);
        let builds = match normalize_block(&block.rows, &mut cells) {
            Ok(builds) => builds,
            Err(err) => {
                error!(error = %err, "Malformed carry-forward");
                if self.strict {
                    return Err(ResolveError::MalformedBlock {
                        character: block.view_name.clone(),
                        source: err,
                    });
                }
                let NormalizeError::MissingPredecessor { row, .. } = err;
                report.record(
                    Diagnostic::new(
                        DiagnosticKind::MalformedCarryForward,
                        &block.view_name,
                        err.to_string(),
                    )
                    .at_row(row),
                );
                return Ok(None);
            }
        };

        for diagnostic in cells.diagnostics {
            report.record(diagnostic);
        }

        debug!(builds = builds.len(), "Block resolved");
        Ok(Some(CharacterRecord {
            character_id: entry.id.clone(),
            element: entry.element,
            weapon_type: entry.weapon_type,
            notes: block.notes.clone(),
            builds,
        }))
    }
}

/// Per-block cell resolution, collecting drops as it goes
struct BlockCells<'a> {
    character: &'a str,
    weapons: WeaponResolver<'a>,
    artifacts: ArtifactSetExtractor<'a>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> BlockCells<'a> {
    fn new(pipeline: &ResolutionPipeline<'a>, entry: &RosterEntry, character: &'a str) -> Self {
        Self {
            character,
            weapons: WeaponResolver::new(pipeline.catalog, entry.weapon_type, pipeline.strategy),
            artifacts: ArtifactSetExtractor::new(pipeline.catalog),
            diagnostics: Vec::new(),
        }
    }

    fn drop_line(&mut self, kind: DiagnosticKind, row: usize, line: &str) {
        debug!(%kind, row, line, "Dropping unresolved line");
        self.diagnostics
            .push(Diagnostic::new(kind, self.character, line).at_row(row));
    }
}

impl CellResolver for BlockCells<'_> {
    fn resolve_weapons(&mut self, row: usize, cell: &str) -> Vec<WeaponId> {
        let mut weapons = Vec::new();
        for line in non_empty_lines(cell) {
            match self.weapons.resolve(line) {
                Some(id) => weapons.push(id.clone()),
                None => self.drop_line(DiagnosticKind::UnresolvedWeapon, row, line),
            }
        }
        weapons
    }

    fn resolve_artifact_sets(&mut self, row: usize, cell: &str) -> Vec<ArtifactSetSelection> {
        let mut selections = Vec::new();
        for line in non_empty_lines(cell) {
            match self.artifacts.resolve(line) {
                Some(selection) => selections.push(selection),
                None => self.drop_line(DiagnosticKind::UnresolvedArtifactSet, row, line),
            }
        }
        selections
    }
}

fn non_empty_lines(cell: &str) -> impl Iterator<Item = &str> {
    cell.lines().filter(|line| !line.trim().is_empty())
}

/// `sha256:<hex>` of the serialized blocks, for tracing a report back to its input
pub fn digest_blocks(blocks: &[CharacterBlock]) -> String {
    let mut hasher = Sha256::new();
    for block in blocks {
        // Serializing plain data into a Vec cannot fail
        if let Ok(bytes) = serde_json::to_vec(block) {
            hasher.update(&bytes);
        }
    }
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArtifactCandidate, Element, RawBuildRow, WeaponCandidate, WeaponType};

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                WeaponCandidate::new("kaguras_verity", "Kagura's Verity", WeaponType::Catalyst),
                WeaponCandidate::new("the_widsith", "The Widsith", WeaponType::Catalyst),
                WeaponCandidate::new("skyward_harp", "Skyward Harp", WeaponType::Bow),
            ],
            vec![ArtifactCandidate::new(
                "emblem_of_severed_fate",
                "Emblem of Severed Fate",
            )],
            vec![],
        )
        .unwrap()
    }

    fn roster() -> Roster {
        Roster::new(vec![RosterEntry::new(
            "yae_miko",
            "Yae Miko",
            Element::Electro,
            WeaponType::Catalyst,
        )])
    }

    fn row(weapons: &str, artifacts: &str) -> RawBuildRow {
        RawBuildRow {
            name: Some("DPS".to_string()),
            weapons: Some(weapons.to_string()),
            artifact_sets: Some(artifacts.to_string()),
            artifact_main_stats: Some(String::new()),
            artifact_sub_stats: Some(String::new()),
            talent_priority: Some(String::new()),
            ability_tips: None,
        }
    }

    #[test]
    fn test_unresolved_lines_are_dropped_and_reported() {
        let catalog = catalog();
        let roster = roster();
        let block = CharacterBlock {
            view_name: "Yae Miko".to_string(),
            rows: vec![row(
                "Kagura's Verity\nqqqqqqqqqqqqqqqqqqqq\n\nThe Widsith",
                "Emblem of Severed Fate\n4pc whatever",
            )],
            ..Default::default()
        };

        let output = ResolutionPipeline::new(&catalog, &roster)
            .run(&[block])
            .unwrap();

        let build = &output.records[0].builds[0];
        assert_eq!(
            build.weapons,
            vec![WeaponId::new("kaguras_verity"), WeaponId::new("the_widsith")]
        );
        assert_eq!(build.artifact_sets.len(), 1);
        assert_eq!(output.report.count(DiagnosticKind::UnresolvedWeapon), 1);
        assert_eq!(output.report.count(DiagnosticKind::UnresolvedArtifactSet), 1);
        assert_eq!(output.report.diagnostics[0].row, Some(0));
    }

    #[test]
    fn test_weapon_type_hint_mismatch_is_reported() {
        let catalog = catalog();
        let roster = roster();
        let block = CharacterBlock {
            view_name: "Yae Miko".to_string(),
            weapon_type_hint: Some(WeaponType::Bow),
            rows: vec![row("Skyward Harp", "")],
            ..Default::default()
        };

        let output = ResolutionPipeline::new(&catalog, &roster)
            .run(&[block])
            .unwrap();

        // Roster wins: a bow is never resolved for a catalyst user
        assert_eq!(output.records[0].weapon_type, WeaponType::Catalyst);
        assert!(output.records[0].builds[0]
            .weapons
            .iter()
            .all(|id| id.as_str() != "skyward_harp"));
        assert_eq!(output.report.count(DiagnosticKind::WeaponTypeMismatch), 1);
    }

    #[test]
    fn test_strict_mode_fails_on_malformed_block() {
        let catalog = catalog();
        let roster = roster();
        let block = CharacterBlock {
            view_name: "Yae Miko".to_string(),
            rows: vec![RawBuildRow::default()],
            ..Default::default()
        };

        let lenient = ResolutionPipeline::new(&catalog, &roster)
            .run(std::slice::from_ref(&block))
            .unwrap();
        assert!(lenient.records.is_empty());
        assert_eq!(lenient.report.count(DiagnosticKind::MalformedCarryForward), 1);

        let strict = ResolutionPipeline::new(&catalog, &roster)
            .with_strict(true)
            .run(&[block]);
        assert!(matches!(strict, Err(ResolveError::MalformedBlock { .. })));
    }

    #[test]
    fn test_digest_is_deterministic() {
        let block = CharacterBlock {
            view_name: "Yae Miko".to_string(),
            ..Default::default()
        };
        let a = digest_blocks(std::slice::from_ref(&block));
        let b = digest_blocks(&[block]);
        assert_eq!(a, b);
        assert!(a.starts_with("sha256:"));
        assert_ne!(a, digest_blocks(&[]));
    }
}
