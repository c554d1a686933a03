//! Row normalization: repairs cells lost to vertical cell merging.
//!
//! When a cell spans several build rows the sheet only reports it on the
//! first of them; on the following rows it is absent. An absent cell in one
//! of the carry-forward columns takes the *resolved* value of the same column
//! on the previous row of the block. Ability tips never carry forward and
//! the build name never does either; both default to empty.
//!
//! Rows are processed strictly in order because each row may read the
//! result of the one before it.

use thiserror::Error;

use crate::domain::{ArtifactSetSelection, RawBuildRow, ResolvedBuild, WeaponId};

/// Columns that inherit from the previous row when absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarryField {
    Weapons,
    ArtifactSets,
    ArtifactMainStats,
    ArtifactSubStats,
    TalentPriority,
}

impl std::fmt::Display for CarryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CarryField::Weapons => "weapons",
            CarryField::ArtifactSets => "artifact_sets",
            CarryField::ArtifactMainStats => "artifact_main_stats",
            CarryField::ArtifactSubStats => "artifact_sub_stats",
            CarryField::TalentPriority => "talent_priority",
        };
        f.write_str(name)
    }
}

/// Normalization failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// An absent cell on a row with nothing above it to inherit from
    #[error("Row {row} has no '{field}' cell and no previous row to inherit it from")]
    MissingPredecessor { row: usize, field: CarryField },
}

/// Converts present cell text into resolved values
pub trait CellResolver {
    /// Resolve a weapons cell (one weapon per line)
    fn resolve_weapons(&mut self, row: usize, cell: &str) -> Vec<WeaponId>;

    /// Resolve an artifact-sets cell (one selection per line)
    fn resolve_artifact_sets(&mut self, row: usize, cell: &str) -> Vec<ArtifactSetSelection>;
}

/// Resolve every row of one block, filling absent cells from the row above
pub fn normalize_block<R: CellResolver + ?Sized>(
    rows: &[RawBuildRow],
    resolver: &mut R,
) -> Result<Vec<ResolvedBuild>, NormalizeError> {
    let mut builds: Vec<ResolvedBuild> = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let previous = builds.last();

        let weapons = match row.weapons.as_deref() {
            Some(cell) => resolver.resolve_weapons(index, cell),
            None => inherit(previous, index, CarryField::Weapons, |b| b.weapons.clone())?,
        };
        let artifact_sets = match row.artifact_sets.as_deref() {
            Some(cell) => resolver.resolve_artifact_sets(index, cell),
            None => inherit(previous, index, CarryField::ArtifactSets, |b| {
                b.artifact_sets.clone()
            })?,
        };
        let artifact_main_stats = carry_text(
            &row.artifact_main_stats,
            previous,
            index,
            CarryField::ArtifactMainStats,
            |b| &b.artifact_main_stats,
        )?;
        let artifact_sub_stats = carry_text(
            &row.artifact_sub_stats,
            previous,
            index,
            CarryField::ArtifactSubStats,
            |b| &b.artifact_sub_stats,
        )?;
        let talent_priority = carry_text(
            &row.talent_priority,
            previous,
            index,
            CarryField::TalentPriority,
            |b| &b.talent_priority,
        )?;

        builds.push(ResolvedBuild {
            name: row.name.clone().unwrap_or_default(),
            weapons,
            artifact_sets,
            artifact_main_stats,
            artifact_sub_stats,
            talent_priority,
            ability_tips: row.ability_tips.clone().unwrap_or_default(),
        });
    }

    Ok(builds)
}

fn inherit<T>(
    previous: Option<&ResolvedBuild>,
    row: usize,
    field: CarryField,
    take: impl FnOnce(&ResolvedBuild) -> T,
) -> Result<T, NormalizeError> {
    previous
        .map(take)
        .ok_or(NormalizeError::MissingPredecessor { row, field })
}

fn carry_text(
    cell: &Option<String>,
    previous: Option<&ResolvedBuild>,
    row: usize,
    field: CarryField,
    take: impl FnOnce(&ResolvedBuild) -> &String,
) -> Result<String, NormalizeError> {
    match cell {
        Some(text) => Ok(text.clone()),
        None => inherit(previous, row, field, |b| take(b).clone()),
    }
}
