//! Weapon resolution: one free-text line to at most one weapon id.
//!
//! Candidates are always restricted to the owning character's weapon type,
//! so a bow user can never be assigned a sword however close the text is.
//!
//! Two strategies exist. `Ranked` (the default) scores every candidate and
//! keeps the best one under a threshold. The score looks for the line inside
//! the candidate name, never the name inside the line, so a short name
//! cannot absorb an unrelated long line. `Distance` is the older containment
//! based search: every candidate whose adjusted distance fits the error
//! budget is kept and the smallest distance wins, shorter names winning
//! ties. A run uses exactly one strategy for every line.

use std::cmp::Ordering;

use tracing::trace;

use crate::domain::{WeaponCandidate, WeaponId, WeaponType};
use crate::library::Catalog;

use super::containment::{fuzzy_contains, DEFAULT_ERROR_BUDGET};
use super::distance::substring_distance;

/// Default acceptance threshold for ranked search (0 is a perfect match)
pub const DEFAULT_RANKED_THRESHOLD: f64 = 0.5;

/// The window score only counts when the whole-string score is at most this
pub const WINDOW_CUTOFF: f64 = 0.75;

/// Shorter lines are scored on the whole string alone
pub const MIN_WINDOW_CHARS: usize = 3;

/// How a weapon line is matched against candidates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchStrategy {
    /// Normalized similarity search; keep hits scoring at most `threshold`
    Ranked { threshold: f64 },

    /// Containment search; keep hits with adjusted distance at most `error_budget`
    Distance { error_budget: i64 },
}

impl Default for MatchStrategy {
    fn default() -> Self {
        Self::Ranked {
            threshold: DEFAULT_RANKED_THRESHOLD,
        }
    }
}

impl MatchStrategy {
    pub fn distance() -> Self {
        Self::Distance {
            error_budget: DEFAULT_ERROR_BUDGET,
        }
    }
}

/// A candidate accepted by the ranked search
#[derive(Debug, Clone, Copy)]
pub struct RankedHit<'a> {
    pub candidate: &'a WeaponCandidate,

    /// Best of the whole-string and window scores, in `[0, 1]`
    pub score: f64,

    /// Whole-string score alone, used to separate equal `score`s
    pub whole_score: f64,
}

/// Resolves weapon lines for one weapon type
#[derive(Debug, Clone)]
pub struct WeaponResolver<'a> {
    weapon_type: WeaponType,
    candidates: Vec<&'a WeaponCandidate>,
    strategy: MatchStrategy,
}

impl<'a> WeaponResolver<'a> {
    pub fn new(catalog: &'a Catalog, weapon_type: WeaponType, strategy: MatchStrategy) -> Self {
        Self {
            weapon_type,
            candidates: catalog.weapons_of_type(weapon_type).collect(),
            strategy,
        }
    }

    pub fn weapon_type(&self) -> WeaponType {
        self.weapon_type
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Resolve one line; empty lines and lines matching nothing yield `None`
    pub fn resolve(&self, line: &str) -> Option<&'a WeaponId> {
        if line.trim().is_empty() {
            return None;
        }

        let found = match self.strategy {
            MatchStrategy::Ranked { threshold } => {
                self.rank(line, threshold).first().map(|hit| hit.candidate)
            }
            MatchStrategy::Distance { error_budget } => self.closest(line, error_budget),
        };

        trace!(line, weapon_type = %self.weapon_type, found = ?found.map(|w| &w.id), "Weapon line resolved");
        found.map(|candidate| &candidate.id)
    }

    /// All candidates scoring within `threshold`, best first.
    ///
    /// Ordering: score, then whole-string score, then shorter display name,
    /// then catalog order.
    pub fn rank(&self, line: &str, threshold: f64) -> Vec<RankedHit<'a>> {
        let query = line.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<RankedHit<'a>> = self
            .candidates
            .iter()
            .copied()
            .map(|candidate| score_candidate(&query, candidate))
            .filter(|hit| hit.score <= threshold)
            .collect();

        hits.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    a.whole_score
                        .partial_cmp(&b.whole_score)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| name_len(a.candidate).cmp(&name_len(b.candidate)))
        });

        hits
    }

    /// Candidates whose adjusted distance fits `error_budget`, best first.
    ///
    /// Ordering: adjusted distance, then shorter display name, then catalog order.
    pub fn contained(&self, line: &str, error_budget: i64) -> Vec<(&'a WeaponCandidate, i64)> {
        let mut hits: Vec<(&'a WeaponCandidate, i64)> = self
            .candidates
            .iter()
            .filter_map(|candidate| {
                let containment = fuzzy_contains(line, &candidate.name, error_budget);
                containment
                    .matched
                    .then_some((*candidate, containment.adjusted_distance))
            })
            .collect();

        hits.sort_by_key(|(candidate, distance)| (*distance, name_len(candidate)));
        hits
    }

    fn closest(&self, line: &str, error_budget: i64) -> Option<&'a WeaponCandidate> {
        self.contained(line, error_budget)
            .first()
            .map(|(candidate, _)| *candidate)
    }
}

/// Resolve a single weapon line for an owner of `weapon_type`
pub fn resolve_weapon_line(
    catalog: &Catalog,
    line: &str,
    weapon_type: WeaponType,
    strategy: MatchStrategy,
) -> Option<WeaponId> {
    WeaponResolver::new(catalog, weapon_type, strategy)
        .resolve(line)
        .cloned()
}

fn score_candidate<'a>(query: &str, candidate: &'a WeaponCandidate) -> RankedHit<'a> {
    let name = candidate.name.trim().to_lowercase();

    let whole_score = 1.0 - strsim::normalized_damerau_levenshtein(query, &name);
    let query_len = query.chars().count();
    let score = if whole_score <= WINDOW_CUTOFF && query_len >= MIN_WINDOW_CHARS {
        // Every query char must be accounted for; only the name's ends are free
        let window = substring_distance(query, &name) as f64 / query_len as f64;
        whole_score.min(window)
    } else {
        whole_score
    }
    .clamp(0.0, 1.0);

    RankedHit {
        candidate,
        score,
        whole_score,
    }
}

fn name_len(candidate: &WeaponCandidate) -> usize {
    candidate.name.chars().count()
}
