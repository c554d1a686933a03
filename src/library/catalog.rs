//! Candidate catalog: the fixed registries build cells are resolved against.
//!
//! A catalog is constructed once, validated, and then only read. Each list
//! is kept sorted by display-name length, longest first, so scans that stop
//! at the first hit prefer the longest name.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

use crate::domain::{
    ArtifactCandidate, ArtifactGroupCandidate, ArtifactGroupId, ArtifactId, WeaponCandidate,
    WeaponId, WeaponType,
};

/// On-disk catalog schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub weapons: Vec<WeaponCandidate>,
    #[serde(default)]
    pub artifacts: Vec<ArtifactCandidate>,
    #[serde(default)]
    pub groups: Vec<ArtifactGroupCandidate>,
}

/// Catalog validation errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Duplicate weapon id: {0}")]
    DuplicateWeapon(WeaponId),

    #[error("Duplicate artifact set id: {0}")]
    DuplicateArtifact(ArtifactId),

    #[error("Duplicate artifact group id: {0}")]
    DuplicateGroup(ArtifactGroupId),

    #[error("Candidate '{id}' has an empty display name")]
    EmptyName { id: String },

    #[error("Artifact group '{id}' needs at least 2 members, has {members}")]
    GroupTooSmall { id: ArtifactGroupId, members: usize },

    #[error("Artifact group '{group}' references unknown set '{member}'")]
    UnknownGroupMember {
        group: ArtifactGroupId,
        member: ArtifactId,
    },
}

/// Read-only registries of weapons, artifact sets and artifact groups
#[derive(Debug, Clone)]
pub struct Catalog {
    weapons: Vec<WeaponCandidate>,
    artifacts: Vec<ArtifactCandidate>,
    groups: Vec<ArtifactGroupCandidate>,
}

impl Catalog {
    /// Build and validate a catalog
    pub fn new(
        mut weapons: Vec<WeaponCandidate>,
        mut artifacts: Vec<ArtifactCandidate>,
        mut groups: Vec<ArtifactGroupCandidate>,
    ) -> Result<Self, CatalogError> {
        validate(&weapons, &artifacts, &groups)?;

        // Stable sort keeps file order among equal lengths
        weapons.sort_by_key(|w| std::cmp::Reverse(w.name.chars().count()));
        artifacts.sort_by_key(|a| std::cmp::Reverse(a.name.chars().count()));
        groups.sort_by_key(|g| std::cmp::Reverse(g.name.chars().count()));

        debug!(
            weapons = weapons.len(),
            artifacts = artifacts.len(),
            groups = groups.len(),
            "Catalog loaded"
        );

        Ok(Self {
            weapons,
            artifacts,
            groups,
        })
    }

    /// Parse a catalog from JSON content
    pub fn from_json(content: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(content).context("Failed to parse catalog JSON")?;
        Ok(Self::try_from(file)?)
    }

    /// Load a catalog file from disk
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read catalog: {}", path.display()))?;

        Self::from_json(&content)
            .with_context(|| format!("Invalid catalog: {}", path.display()))
    }

    /// All weapons, longest name first
    pub fn weapons(&self) -> &[WeaponCandidate] {
        &self.weapons
    }

    /// All artifact sets, longest name first
    pub fn artifacts(&self) -> &[ArtifactCandidate] {
        &self.artifacts
    }

    /// All artifact groups, longest name first
    pub fn groups(&self) -> &[ArtifactGroupCandidate] {
        &self.groups
    }

    /// Weapons a wielder of `weapon_type` can use
    pub fn weapons_of_type(
        &self,
        weapon_type: WeaponType,
    ) -> impl Iterator<Item = &WeaponCandidate> + '_ {
        self.weapons
            .iter()
            .filter(move |w| w.weapon_type == weapon_type)
    }

    pub fn weapon(&self, id: &WeaponId) -> Option<&WeaponCandidate> {
        self.weapons.iter().find(|w| &w.id == id)
    }

    pub fn artifact(&self, id: &ArtifactId) -> Option<&ArtifactCandidate> {
        self.artifacts.iter().find(|a| &a.id == id)
    }

    pub fn group(&self, id: &ArtifactGroupId) -> Option<&ArtifactGroupCandidate> {
        self.groups.iter().find(|g| &g.id == id)
    }

    /// Total number of candidates across all registries
    pub fn len(&self) -> usize {
        self.weapons.len() + self.artifacts.len() + self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TryFrom<CatalogFile> for Catalog {
    type Error = CatalogError;

    fn try_from(file: CatalogFile) -> Result<Self, Self::Error> {
        Self::new(file.weapons, file.artifacts, file.groups)
    }
}

fn validate(
    weapons: &[WeaponCandidate],
    artifacts: &[ArtifactCandidate],
    groups: &[ArtifactGroupCandidate],
) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for weapon in weapons {
        check_name(weapon.id.as_str(), &weapon.name)?;
        if !seen.insert(&weapon.id) {
            return Err(CatalogError::DuplicateWeapon(weapon.id.clone()));
        }
    }

    let mut artifact_ids = HashSet::new();
    for artifact in artifacts {
        check_name(artifact.id.as_str(), &artifact.name)?;
        if !artifact_ids.insert(&artifact.id) {
            return Err(CatalogError::DuplicateArtifact(artifact.id.clone()));
        }
    }

    let mut group_ids = HashSet::new();
    let mut owners: HashMap<&ArtifactId, &ArtifactGroupId> = HashMap::new();
    for group in groups {
        check_name(group.id.as_str(), &group.name)?;
        if !group_ids.insert(&group.id) {
            return Err(CatalogError::DuplicateGroup(group.id.clone()));
        }
        if group.members.len() < 2 {
            return Err(CatalogError::GroupTooSmall {
                id: group.id.clone(),
                members: group.members.len(),
            });
        }
        for member in &group.members {
            if !artifact_ids.contains(member) {
                return Err(CatalogError::UnknownGroupMember {
                    group: group.id.clone(),
                    member: member.clone(),
                });
            }
            if let Some(owner) = owners.insert(member, &group.id) {
                if owner != &group.id {
                    warn!(%member, first = %owner, second = %group.id, "Artifact set belongs to more than one group");
                }
            }
        }
    }

    Ok(())
}

fn check_name(id: &str, name: &str) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::EmptyName { id: id.to_string() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CATALOG_JSON: &str = r#"
{
  "weapons": [
    {"id": "the_widsith", "name": "The Widsith", "weapon_type": "catalyst"},
    {"id": "kaguras_verity", "name": "Kagura's Verity", "weapon_type": "catalyst"},
    {"id": "aquila_favonia", "name": "Aquila Favonia", "weapon_type": "sword"}
  ],
  "artifacts": [
    {"id": "gladiators_finale", "name": "Gladiator's Finale"},
    {"id": "shimenawas_reminiscence", "name": "Shimenawa's Reminiscence"}
  ],
  "groups": [
    {"id": "atk_18", "name": "18% ATK set", "members": ["gladiators_finale", "shimenawas_reminiscence"]}
  ]
}
"#;

    #[test]
    fn test_catalog_parsing_sorts_longest_first() {
        let catalog = Catalog::from_json(TEST_CATALOG_JSON).unwrap();

        assert_eq!(catalog.len(), 6);
        let names: Vec<&str> = catalog.weapons().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Kagura's Verity", "Aquila Favonia", "The Widsith"]);
        assert_eq!(catalog.artifacts()[0].id.as_str(), "shimenawas_reminiscence");
    }

    #[test]
    fn test_weapons_of_type() {
        let catalog = Catalog::from_json(TEST_CATALOG_JSON).unwrap();

        let catalysts: Vec<_> = catalog.weapons_of_type(WeaponType::Catalyst).collect();
        assert_eq!(catalysts.len(), 2);
        assert!(catalysts.iter().all(|w| w.weapon_type == WeaponType::Catalyst));
        assert_eq!(catalog.weapons_of_type(WeaponType::Bow).count(), 0);
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::from_json(TEST_CATALOG_JSON).unwrap();

        assert!(catalog.weapon(&WeaponId::new("the_widsith")).is_some());
        assert!(catalog.artifact(&ArtifactId::new("gladiators_finale")).is_some());
        assert!(catalog.group(&ArtifactGroupId::new("atk_18")).is_some());
        assert!(catalog.weapon(&WeaponId::new("missing")).is_none());
    }

    #[test]
    fn test_duplicate_weapon_rejected() {
        let result = Catalog::new(
            vec![
                WeaponCandidate::new("a", "Alpha", WeaponType::Bow),
                WeaponCandidate::new("a", "Alpha Again", WeaponType::Bow),
            ],
            vec![],
            vec![],
        );
        assert_eq!(
            result.unwrap_err(),
            CatalogError::DuplicateWeapon(WeaponId::new("a"))
        );
    }

    #[test]
    fn test_group_validation() {
        let artifacts = vec![
            ArtifactCandidate::new("a", "Set A"),
            ArtifactCandidate::new("b", "Set B"),
        ];

        let too_small = Catalog::new(
            vec![],
            artifacts.clone(),
            vec![ArtifactGroupCandidate::new("g", "Group", ["a"])],
        );
        assert!(matches!(too_small, Err(CatalogError::GroupTooSmall { members: 1, .. })));

        let unknown = Catalog::new(
            vec![],
            artifacts.clone(),
            vec![ArtifactGroupCandidate::new("g", "Group", ["a", "zzz"])],
        );
        assert!(matches!(unknown, Err(CatalogError::UnknownGroupMember { .. })));

        let ok = Catalog::new(
            vec![],
            artifacts,
            vec![ArtifactGroupCandidate::new("g", "Group", ["a", "b"])],
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = Catalog::new(vec![], vec![ArtifactCandidate::new("a", "  ")], vec![]);
        assert!(matches!(result, Err(CatalogError::EmptyName { .. })));
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        std::fs::write(&path, TEST_CATALOG_JSON).unwrap();

        let catalog = Catalog::load(&path).await.unwrap();
        assert_eq!(catalog.groups().len(), 1);

        let missing = Catalog::load(&temp.path().join("nope.json")).await;
        assert!(missing.is_err());
    }
}
