//! Catalog candidates and the identifiers they carry.
//!
//! Candidates are loaded once at startup and never mutated afterwards.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the raw string value
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }
    };
}

string_id!(
    /// Weapon identifier (e.g. `kaguras_verity`)
    WeaponId
);
string_id!(
    /// Artifact set identifier (e.g. `crimson_witch_of_flames`)
    ArtifactId
);
string_id!(
    /// Artifact group identifier (e.g. `atk_18`)
    ArtifactGroupId
);
string_id!(
    /// Character identifier from the roster
    CharacterId
);

/// Weapon category; a character can only wield one of these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponType {
    Sword,
    Claymore,
    Polearm,
    Bow,
    Catalyst,
}

impl WeaponType {
    pub const ALL: [WeaponType; 5] = [
        WeaponType::Sword,
        WeaponType::Claymore,
        WeaponType::Polearm,
        WeaponType::Bow,
        WeaponType::Catalyst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponType::Sword => "sword",
            WeaponType::Claymore => "claymore",
            WeaponType::Polearm => "polearm",
            WeaponType::Bow => "bow",
            WeaponType::Catalyst => "catalyst",
        }
    }
}

impl std::fmt::Display for WeaponType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WeaponType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sword" => Ok(WeaponType::Sword),
            "claymore" => Ok(WeaponType::Claymore),
            "polearm" => Ok(WeaponType::Polearm),
            "bow" => Ok(WeaponType::Bow),
            "catalyst" => Ok(WeaponType::Catalyst),
            _ => anyhow::bail!("Unknown weapon type: {}", s),
        }
    }
}

/// Elemental affinity of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Pyro,
    Electro,
    Hydro,
    Cryo,
    Anemo,
    Geo,
    Dendro,
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Element::Pyro => "pyro",
            Element::Electro => "electro",
            Element::Hydro => "hydro",
            Element::Cryo => "cryo",
            Element::Anemo => "anemo",
            Element::Geo => "geo",
            Element::Dendro => "dendro",
        };
        f.write_str(name)
    }
}

/// A weapon that build cells may refer to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponCandidate {
    pub id: WeaponId,

    /// Name as written in the game client
    pub name: String,

    pub weapon_type: WeaponType,
}

impl WeaponCandidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, weapon_type: WeaponType) -> Self {
        Self {
            id: WeaponId::new(id),
            name: name.into(),
            weapon_type,
        }
    }
}

/// An artifact set that build cells may refer to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactCandidate {
    pub id: ArtifactId,
    pub name: String,
}

impl ArtifactCandidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ArtifactId::new(id),
            name: name.into(),
        }
    }
}

/// A named bundle of interchangeable artifact sets ("any 18% ATK set").
///
/// Members are expected not to overlap with other groups; the catalog warns
/// about overlaps but does not reject them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactGroupCandidate {
    pub id: ArtifactGroupId,
    pub name: String,

    /// Ordered member set ids, at least two
    pub members: Vec<ArtifactId>,
}

impl ArtifactGroupCandidate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        members: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: ArtifactGroupId::new(id),
            name: name.into(),
            members: members.into_iter().map(ArtifactId::new).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_type_parsing() {
        assert_eq!("Bow".parse::<WeaponType>().unwrap(), WeaponType::Bow);
        assert_eq!(" catalyst ".parse::<WeaponType>().unwrap(), WeaponType::Catalyst);
        assert!("spear".parse::<WeaponType>().is_err());
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let weapon = WeaponCandidate::new("the_widsith", "The Widsith", WeaponType::Catalyst);
        let json = serde_json::to_string(&weapon).unwrap();
        assert_eq!(
            json,
            r#"{"id":"the_widsith","name":"The Widsith","weapon_type":"catalyst"}"#
        );
    }

    #[test]
    fn test_group_members_keep_order() {
        let group = ArtifactGroupCandidate::new("atk_18", "18% ATK set", ["b", "a", "c"]);
        let members: Vec<&str> = group.members.iter().map(|m| m.as_str()).collect();
        assert_eq!(members, vec!["b", "a", "c"]);
    }
}
