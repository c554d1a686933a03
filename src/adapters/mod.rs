//! Adapter interfaces for external systems.
//!
//! Sources produce character blocks from wherever the sheet data lives;
//! sinks persist the resolved records. The pipeline itself never touches
//! either.

pub mod json;
pub mod sheet;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{CharacterBlock, CharacterRecord};

// Re-export the concrete adapters
pub use json::{JsonBlockSource, JsonFileSink};
pub use sheet::{block_from_range, SheetRangeSource, ValueRange};

/// Trait for block producers
#[async_trait]
pub trait BlockSource: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// Fetch all blocks, in sheet order
    async fn fetch_blocks(&self) -> Result<Vec<CharacterBlock>>;
}

/// Trait for record consumers
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Human-readable sink name
    fn name(&self) -> &str;

    /// Persist the records of one run
    async fn persist(&self, records: &[CharacterRecord]) -> Result<()>;
}
