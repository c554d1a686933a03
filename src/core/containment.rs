//! Fuzzy containment: "does this name appear somewhere in this noisy line?"
//!
//! The edit distance between the line and the name is discounted by however
//! much longer the line is, so extra words around a correctly spelled name
//! cost nothing while misspellings still count. This is a heuristic and not
//! a substring search: a short name can match anywhere in a long line.

use super::distance::damerau_distance;

/// Default number of edits tolerated after the length discount
pub const DEFAULT_ERROR_BUDGET: i64 = 3;

/// Outcome of a containment test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Containment {
    pub matched: bool,

    /// Edit distance minus the length excess of the haystack
    pub adjusted_distance: i64,
}

/// Edit distance between `haystack` and `name`, discounted by the length excess
pub fn adjusted_distance(haystack: &str, name: &str) -> i64 {
    let raw = damerau_distance(haystack, name) as i64;
    let excess = haystack.chars().count() as i64 - name.chars().count() as i64;
    raw - excess
}

/// Test whether `name` fuzzily occurs in `haystack` within `error_budget` edits
pub fn fuzzy_contains(haystack: &str, name: &str, error_budget: i64) -> Containment {
    let adjusted_distance = adjusted_distance(haystack, name);
    Containment {
        matched: adjusted_distance <= error_budget,
        adjusted_distance,
    }
}
