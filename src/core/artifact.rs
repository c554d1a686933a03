//! Artifact set extraction: one line to zero or more set/group references.
//!
//! The line is scanned for the first catalog name that occurs in it as a
//! literal, case-sensitive substring: all artifact set names first, then all
//! group names, each list longest name first. The matched span is cut out,
//! the two remaining halves are joined, and the scan restarts from the top.
//! Extraction ends when a full pass finds nothing. Because every hit shrinks
//! the line, the scan order decides ties and must not change.

use crate::domain::{ArtifactSetChoice, ArtifactSetSelection};
use crate::library::Catalog;

/// Options in a choose selection are always taken two sets at a time
pub const CHOOSE_AMOUNT: u8 = 2;

/// Extracts artifact-set references from free-text lines
#[derive(Debug, Clone, Copy)]
pub struct ArtifactSetExtractor<'a> {
    catalog: &'a Catalog,
}

impl<'a> ArtifactSetExtractor<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Every reference found in `line`, in the order found
    pub fn extract(&self, line: &str) -> Vec<ArtifactSetChoice> {
        let mut remaining = line.to_string();
        let mut found = Vec::new();

        while let Some((choice, start, len)) = self.first_hit(&remaining) {
            remaining.replace_range(start..start + len, "");
            found.push(choice);
        }

        found
    }

    /// Extract and classify; `None` when the line names nothing
    pub fn resolve(&self, line: &str) -> Option<ArtifactSetSelection> {
        classify(self.extract(line))
    }

    fn first_hit(&self, line: &str) -> Option<(ArtifactSetChoice, usize, usize)> {
        let sets = self.catalog.artifacts().iter().find_map(|artifact| {
            line.find(&artifact.name).map(|start| {
                (
                    ArtifactSetChoice::Set(artifact.id.clone()),
                    start,
                    artifact.name.len(),
                )
            })
        });

        sets.or_else(|| {
            self.catalog.groups().iter().find_map(|group| {
                line.find(&group.name).map(|start| {
                    (
                        ArtifactSetChoice::Group(group.id.clone()),
                        start,
                        group.name.len(),
                    )
                })
            })
        })
    }
}

/// Shape collected choices into a selection.
///
/// Zero choices yield nothing, one is a single set, two are a 2pc/2pc
/// pairing in the order found, and three or more become "choose two".
pub fn classify(choices: Vec<ArtifactSetChoice>) -> Option<ArtifactSetSelection> {
    let mut choices = choices;
    match choices.len() {
        0 => None,
        1 => choices
            .pop()
            .map(|choice| ArtifactSetSelection::Single { choice }),
        2 => {
            let second = choices.pop()?;
            let first = choices.pop()?;
            Some(ArtifactSetSelection::Double {
                options: [first, second],
            })
        }
        _ => Some(ArtifactSetSelection::Choose {
            amount: CHOOSE_AMOUNT,
            options: choices,
        }),
    }
}

/// Resolve a single artifact-sets line against `catalog`
pub fn resolve_artifact_line(catalog: &Catalog, line: &str) -> Option<ArtifactSetSelection> {
    ArtifactSetExtractor::new(catalog).resolve(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ArtifactCandidate, ArtifactGroupCandidate, ArtifactGroupId, ArtifactId};

    fn catalog() -> Catalog {
        Catalog::new(
            vec![],
            vec![
                ArtifactCandidate::new("crimson_witch_of_flames", "Crimson Witch of Flames"),
                ArtifactCandidate::new("gladiators_finale", "Gladiator's Finale"),
                ArtifactCandidate::new("wanderers_troupe", "Wanderer's Troupe"),
                ArtifactCandidate::new("shimenawas_reminiscence", "Shimenawa's Reminiscence"),
                ArtifactCandidate::new("noblesse_oblige", "Noblesse Oblige"),
                ArtifactCandidate::new("lavawalker", "Lavawalker"),
            ],
            vec![ArtifactGroupCandidate::new(
                "atk_18",
                "18% ATK set",
                ["gladiators_finale", "shimenawas_reminiscence"],
            )],
        )
        .unwrap()
    }

    fn set(id: &str) -> ArtifactSetChoice {
        ArtifactSetChoice::Set(ArtifactId::new(id))
    }

    #[test]
    fn test_single_set() {
        let catalog = catalog();
        let result = resolve_artifact_line(&catalog, "Crimson Witch of Flames");

        assert_eq!(
            result,
            Some(ArtifactSetSelection::Single {
                choice: set("crimson_witch_of_flames")
            })
        );
    }

    #[test]
    fn test_two_names_without_separator() {
        let catalog = catalog();
        let result = resolve_artifact_line(&catalog, "Gladiator's FinaleWanderer's Troupe");

        assert_eq!(
            result,
            Some(ArtifactSetSelection::Double {
                options: [set("gladiators_finale"), set("wanderers_troupe")]
            })
        );
    }

    #[test]
    fn test_three_names_choose_two() {
        let catalog = catalog();
        let result = resolve_artifact_line(
            &catalog,
            "Noblesse Oblige / Gladiator's Finale / Wanderer's Troupe (2pc each)",
        );

        // Found in scan order: longest names first
        assert_eq!(
            result,
            Some(ArtifactSetSelection::Choose {
                amount: 2,
                options: vec![
                    set("gladiators_finale"),
                    set("wanderers_troupe"),
                    set("noblesse_oblige"),
                ]
            })
        );
    }

    #[test]
    fn test_no_catalog_name() {
        let catalog = catalog();
        assert_eq!(resolve_artifact_line(&catalog, "whatever has the best stats"), None);
        assert_eq!(resolve_artifact_line(&catalog, ""), None);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let catalog = catalog();
        assert_eq!(resolve_artifact_line(&catalog, "crimson witch of flames"), None);
    }

    #[test]
    fn test_sets_before_groups() {
        let catalog = catalog();
        let extractor = ArtifactSetExtractor::new(&catalog);

        let found = extractor.extract("18% ATK set + Noblesse Oblige");
        assert_eq!(
            found,
            vec![
                set("noblesse_oblige"),
                ArtifactSetChoice::Group(ArtifactGroupId::new("atk_18")),
            ]
        );
    }

    #[test]
    fn test_repeated_name_found_twice() {
        let catalog = catalog();
        let found = ArtifactSetExtractor::new(&catalog).extract("Lavawalker Lavawalker");
        assert_eq!(found, vec![set("lavawalker"), set("lavawalker")]);
    }

    #[test]
    fn test_removal_joins_remaining_text() {
        // Cutting the inner name joins the outer halves into a new name
        let catalog = Catalog::new(
            vec![],
            vec![
                ArtifactCandidate::new("inner", "Inner Set"),
                ArtifactCandidate::new("outer", "Outer"),
            ],
            vec![],
        )
        .unwrap();

        let found = ArtifactSetExtractor::new(&catalog).extract("OuInner Setter");
        assert_eq!(found, vec![set("inner"), set("outer")]);
    }

    #[test]
    fn test_classify_shapes() {
        assert_eq!(classify(vec![]), None);
        assert!(matches!(
            classify(vec![set("a")]),
            Some(ArtifactSetSelection::Single { .. })
        ));
        assert!(matches!(
            classify(vec![set("a"), set("b")]),
            Some(ArtifactSetSelection::Double { .. })
        ));
        assert!(matches!(
            classify(vec![set("a"), set("b"), set("c"), set("d")]),
            Some(ArtifactSetSelection::Choose { amount: 2, ref options }) if options.len() == 4
        ));
    }
}
