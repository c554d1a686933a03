//! Build rows as they come off the sheet, and the structured records they become.

use serde::{Deserialize, Serialize};

use super::candidate::{ArtifactGroupId, ArtifactId, CharacterId, Element, WeaponId, WeaponType};

/// One spreadsheet row describing a single build.
///
/// `None` means the cell is absent from the source row (vertically merged
/// into the cell above), which is different from a present but empty cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBuildRow {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub weapons: Option<String>,
    #[serde(default)]
    pub artifact_sets: Option<String>,
    #[serde(default)]
    pub artifact_main_stats: Option<String>,
    #[serde(default)]
    pub artifact_sub_stats: Option<String>,
    #[serde(default)]
    pub talent_priority: Option<String>,
    #[serde(default)]
    pub ability_tips: Option<String>,
}

/// Contiguous rows describing one character, as segmented from the sheet layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterBlock {
    /// Character name as displayed in the sheet header
    pub view_name: String,

    #[serde(default)]
    pub weapon_type_hint: Option<WeaponType>,

    /// Build rows in sheet order
    #[serde(default)]
    pub rows: Vec<RawBuildRow>,

    /// Free-text notes row closing the block
    #[serde(default)]
    pub notes: String,
}

/// A single artifact slot option: either a concrete set or a group of sets
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum ArtifactSetChoice {
    Set(ArtifactId),
    Group(ArtifactGroupId),
}

/// Shape of one artifact-set line of a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArtifactSetSelection {
    /// Full four-piece of one choice
    Single { choice: ArtifactSetChoice },

    /// Two pieces from each, in the order written
    Double { options: [ArtifactSetChoice; 2] },

    /// Pick `amount` (1 or 2) sets worth from the options
    Choose {
        amount: u8,
        options: Vec<ArtifactSetChoice>,
    },
}

impl ArtifactSetSelection {
    /// All choices referenced by this selection, in order
    pub fn choices(&self) -> Vec<&ArtifactSetChoice> {
        match self {
            ArtifactSetSelection::Single { choice } => vec![choice],
            ArtifactSetSelection::Double { options } => options.iter().collect(),
            ArtifactSetSelection::Choose { options, .. } => options.iter().collect(),
        }
    }
}

/// A build row after resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBuild {
    pub name: String,

    /// One id per resolved input line, in line order
    pub weapons: Vec<WeaponId>,

    pub artifact_sets: Vec<ArtifactSetSelection>,
    pub artifact_main_stats: String,
    pub artifact_sub_stats: String,
    pub talent_priority: String,
    pub ability_tips: String,
}

/// Everything known about one character, ready for persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub character_id: CharacterId,
    pub element: Element,
    pub weapon_type: WeaponType,
    pub notes: String,
    pub builds: Vec<ResolvedBuild>,
}
