//! Spreadsheet value-range adapter.
//!
//! Converts exported value ranges (the `{range, values}` objects returned by
//! the spreadsheets API) into character blocks. Each range covers one
//! character: the header cell carries the name, rows 4 onward hold builds
//! and the final row holds notes. The API omits trailing empty cells, which
//! is exactly how a vertically merged cell shows up: absent.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use super::BlockSource;
use crate::domain::{CharacterBlock, RawBuildRow};

/// Index of the first build row within a range
pub const FIRST_BUILD_ROW: usize = 4;

/// One exported range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub range: String,

    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

/// Batch response wrapper
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchResponse {
    #[serde(default)]
    value_ranges: Vec<ValueRange>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RangePayload {
    Ranges(Vec<ValueRange>),
    Batch(BatchResponse),
}

/// Build a block from one value range; `None` when the range has no header
pub fn block_from_range(range: &ValueRange) -> Option<CharacterBlock> {
    let header = range.values.first()?.first()?;
    let view_name = header.replace('\n', " ");

    let last = range.values.len() - 1;
    let notes = range.values[last].get(1).cloned().unwrap_or_default();

    let rows = range
        .values
        .get(FIRST_BUILD_ROW..last)
        .unwrap_or_default()
        .iter()
        .map(|cells| row_from_cells(cells))
        .collect();

    Some(CharacterBlock {
        view_name,
        weapon_type_hint: None,
        rows,
        notes,
    })
}

/// Map cells after the label column onto build fields; missing cells are absent
fn row_from_cells(cells: &[String]) -> RawBuildRow {
    let cell = |index: usize| cells.get(index + 1).cloned();

    RawBuildRow {
        name: cell(0),
        weapons: cell(1),
        artifact_sets: cell(2),
        artifact_main_stats: cell(3),
        artifact_sub_stats: cell(4),
        talent_priority: cell(5),
        ability_tips: cell(6),
    }
}

/// Parse a JSON payload holding either a range array or a batch response
pub fn parse_ranges(content: &str) -> Result<Vec<ValueRange>> {
    let payload: RangePayload =
        serde_json::from_str(content).context("Failed to parse value ranges")?;

    Ok(match payload {
        RangePayload::Ranges(ranges) => ranges,
        RangePayload::Batch(batch) => batch.value_ranges,
    })
}

/// Reads blocks from an exported value-range JSON file
#[derive(Debug, Clone)]
pub struct SheetRangeSource {
    path: PathBuf,
}

impl SheetRangeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BlockSource for SheetRangeSource {
    fn name(&self) -> &str {
        "sheet-ranges"
    }

    async fn fetch_blocks(&self) -> Result<Vec<CharacterBlock>> {
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read value ranges: {}", self.path.display()))?;

        let ranges = parse_ranges(&content)
            .with_context(|| format!("Invalid value ranges: {}", self.path.display()))?;

        let mut blocks = Vec::with_capacity(ranges.len());
        for range in &ranges {
            match block_from_range(range) {
                Some(block) => blocks.push(block),
                None => warn!(range = %range.range, "Skipping range without values"),
            }
        }

        debug!(ranges = ranges.len(), blocks = blocks.len(), "Loaded sheet ranges");
        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn range() -> ValueRange {
        ValueRange {
            range: "Electro !B10:I16".to_string(),
            values: vec![
                cells(&["Yae\nMiko"]),
                cells(&[]),
                cells(&["", "Role"]),
                cells(&["", "Name", "Weapons"]),
                cells(&["", "DPS", "Kagura's Verity", "Emblem of Severed Fate", "ATK%", "CRIT", "E > Q", "tips"]),
                cells(&["", "Support", "", "Noblesse Oblige"]),
                cells(&["Notes", "Works with any team"]),
            ],
        }
    }

    #[test]
    fn test_block_from_range() {
        let block = block_from_range(&range()).unwrap();

        assert_eq!(block.view_name, "Yae Miko");
        assert_eq!(block.notes, "Works with any team");
        assert_eq!(block.rows.len(), 2);

        let first = &block.rows[0];
        assert_eq!(first.name.as_deref(), Some("DPS"));
        assert_eq!(first.weapons.as_deref(), Some("Kagura's Verity"));
        assert_eq!(first.ability_tips.as_deref(), Some("tips"));

        // Present but empty stays present; missing trailing cells are absent
        let second = &block.rows[1];
        assert_eq!(second.weapons.as_deref(), Some(""));
        assert_eq!(second.artifact_sets.as_deref(), Some("Noblesse Oblige"));
        assert_eq!(second.artifact_main_stats, None);
        assert_eq!(second.ability_tips, None);
    }

    #[test]
    fn test_range_without_values() {
        assert!(block_from_range(&ValueRange::default()).is_none());
    }

    #[test]
    fn test_short_range_has_no_rows() {
        let range = ValueRange {
            range: String::new(),
            values: vec![cells(&["Amber"]), cells(&["Notes"])],
        };
        let block = block_from_range(&range).unwrap();
        assert!(block.rows.is_empty());
        assert_eq!(block.notes, "");
    }

    #[test]
    fn test_parse_both_payload_shapes() {
        let array = r#"[{"range": "A", "values": [["Amber"]]}]"#;
        let batch = r#"{"spreadsheetId": "x", "valueRanges": [{"range": "A", "values": [["Amber"]]}, {"range": "B"}]}"#;

        assert_eq!(parse_ranges(array).unwrap().len(), 1);
        let ranges = parse_ranges(batch).unwrap();
        assert_eq!(ranges.len(), 2);
        assert!(ranges[1].values.is_empty());
    }

    #[tokio::test]
    async fn test_source_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ranges.json");
        let content = serde_json::to_string(&vec![range(), ValueRange::default()]).unwrap();
        std::fs::write(&path, content).unwrap();

        let blocks = SheetRangeSource::new(&path).fetch_blocks().await.unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].view_name, "Yae Miko");
    }
}
