//! Character roster: maps sheet header names to character identities.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::domain::{CharacterId, Element, WeaponType};

/// A known character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: CharacterId,

    /// Display name as written in sheet headers
    pub name: String,

    pub element: Element,
    pub weapon_type: WeaponType,
}

impl RosterEntry {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        element: Element,
        weapon_type: WeaponType,
    ) -> Self {
        Self {
            id: CharacterId::new(id),
            name: name.into(),
            element,
            weapon_type,
        }
    }
}

/// Static list of characters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }

    /// Parse a roster from a JSON array of entries
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse roster JSON")
    }

    /// Load a roster file from disk
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read roster: {}", path.display()))?;

        Self::from_json(&content).with_context(|| format!("Invalid roster: {}", path.display()))
    }

    /// Exact, case-insensitive name lookup
    pub fn lookup(&self, display_name: &str) -> Option<&RosterEntry> {
        let wanted = display_name.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.name.to_lowercase() == wanted)
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
