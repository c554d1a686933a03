//! JSON file adapters: pre-segmented blocks in, resolved records out.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, info};

use super::{BlockSource, RecordSink};
use crate::domain::{CharacterBlock, CharacterRecord};

/// Reads a JSON array of `CharacterBlock`s
#[derive(Debug, Clone)]
pub struct JsonBlockSource {
    path: PathBuf,
}

impl JsonBlockSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BlockSource for JsonBlockSource {
    fn name(&self) -> &str {
        "json-blocks"
    }

    async fn fetch_blocks(&self) -> Result<Vec<CharacterBlock>> {
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read blocks: {}", self.path.display()))?;

        let blocks: Vec<CharacterBlock> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid blocks file: {}", self.path.display()))?;

        debug!(blocks = blocks.len(), path = %self.path.display(), "Loaded blocks");
        Ok(blocks)
    }
}

/// Writes records as a pretty-printed JSON array.
///
/// The file is written to a temporary sibling first and then renamed over
/// the destination, so readers never see a partial file.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSink for JsonFileSink {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn persist(&self, records: &[CharacterRecord]) -> Result<()> {
        let content =
            serde_json::to_string_pretty(records).context("Failed to serialize records")?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&dir, &path, content.as_bytes()))
            .await
            .context("Writer task failed")??;

        info!(records = records.len(), path = %self.path.display(), "Records written");
        Ok(())
    }
}

fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    file.write_all(bytes)
        .context("Failed to write temporary file")?;
    file.persist(path)
        .with_context(|| format!("Failed to persist output: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ArtifactId, ArtifactSetChoice, ArtifactSetSelection, CharacterId, Element, ResolvedBuild,
        WeaponId, WeaponType,
    };
    use tempfile::TempDir;

    fn record() -> CharacterRecord {
        CharacterRecord {
            character_id: CharacterId::new("yae_miko"),
            element: Element::Electro,
            weapon_type: WeaponType::Catalyst,
            notes: String::new(),
            builds: vec![ResolvedBuild {
                name: "DPS".to_string(),
                weapons: vec![WeaponId::new("kaguras_verity")],
                artifact_sets: vec![ArtifactSetSelection::Single {
                    choice: ArtifactSetChoice::Set(ArtifactId::new("emblem_of_severed_fate")),
                }],
                ..Default::default()
            }],
        }
    }

    #[tokio::test]
    async fn test_sink_writes_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("data.json");
        let sink = JsonFileSink::new(&path);

        sink.persist(&[record()]).await.unwrap();
        sink.persist(&[record(), record()]).await.unwrap();

        let written: Vec<CharacterRecord> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0], record());

        // Only the output file remains; the temporary file was renamed
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_source_reads_blocks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blocks.json");
        std::fs::write(
            &path,
            r#"[{"view_name": "Yae Miko", "rows": [{"name": "DPS", "weapons": "Kagura's Verity"}]}]"#,
        )
        .unwrap();

        let blocks = tokio_test::block_on(JsonBlockSource::new(&path).fetch_blocks()).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].rows[0].weapons.as_deref(), Some("Kagura's Verity"));
        assert_eq!(blocks[0].rows[0].artifact_sets, None);
    }

    #[tokio::test]
    async fn test_source_missing_file() {
        let result = JsonBlockSource::new("/nonexistent/blocks.json")
            .fetch_blocks()
            .await;
        assert!(result.is_err());
    }
}
