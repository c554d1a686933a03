//! Weighted edit distance.
//!
//! Classic dynamic-programming Levenshtein distance over a
//! `(|s1|+1) x (|s2|+1)` table, with configurable per-operation weights and
//! an optional single-transposition extension (optimal string alignment).
//! Strings are compared per `char`, not per byte.

/// Per-operation costs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditWeights {
    /// Cost of inserting a character of `s2`
    pub insertion: usize,

    /// Cost of deleting a character of `s1`
    pub deletion: usize,

    /// Cost of substituting one character for another (also used for transpositions)
    pub substitution: usize,
}

impl Default for EditWeights {
    fn default() -> Self {
        Self {
            insertion: 1,
            deletion: 1,
            substitution: 1,
        }
    }
}

/// Unit-weight edit distance without transpositions
pub fn distance(s1: &str, s2: &str) -> usize {
    weighted_distance(s1, s2, EditWeights::default(), false)
}

/// Unit-weight edit distance counting an adjacent swap as one edit
pub fn damerau_distance(s1: &str, s2: &str) -> usize {
    weighted_distance(s1, s2, EditWeights::default(), true)
}

/// Edit distance transforming `s1` into `s2`.
///
/// Only symmetric when all weights are equal and `transposition` is off.
pub fn weighted_distance(s1: &str, s2: &str, weights: EditWeights, transposition: bool) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.is_empty() {
        return b.len() * weights.insertion;
    }
    if b.is_empty() {
        return a.len() * weights.deletion;
    }

    let cols = b.len() + 1;
    let mut table = vec![0usize; (a.len() + 1) * cols];
    let at = |i: usize, j: usize| i * cols + j;

    for i in 0..=a.len() {
        table[at(i, 0)] = i * weights.deletion;
    }
    for j in 0..=b.len() {
        table[at(0, j)] = j * weights.insertion;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let substitute = if a[i - 1] == b[j - 1] {
                table[at(i - 1, j - 1)]
            } else {
                table[at(i - 1, j - 1)] + weights.substitution
            };
            let delete = table[at(i - 1, j)] + weights.deletion;
            let insert = table[at(i, j - 1)] + weights.insertion;

            let mut best = substitute.min(delete).min(insert);

            if transposition
                && i > 1
                && j > 1
                && a[i - 1] == b[j - 2]
                && a[i - 2] == b[j - 1]
                && a[i - 1] != a[i - 2]
            {
                best = best.min(table[at(i - 2, j - 2)] + weights.substitution);
            }

            table[at(i, j)] = best;
        }
    }

    table[at(a.len(), b.len())]
}

/// Smallest unit-weight Damerau distance between `needle` and any substring of `haystack`.
///
/// Haystack characters before and after the aligned window are free, so
/// `"widsith"` is at distance 0 from `"the widsith"` while the reverse
/// direction still costs the four missing characters.
pub fn substring_distance(needle: &str, haystack: &str) -> usize {
    let a: Vec<char> = needle.chars().collect();
    let b: Vec<char> = haystack.chars().collect();

    if a.is_empty() {
        return 0;
    }
    if b.is_empty() {
        return a.len();
    }

    let cols = b.len() + 1;
    let mut table = vec![0usize; (a.len() + 1) * cols];
    let at = |i: usize, j: usize| i * cols + j;

    // Row 0 stays zero: the window may start anywhere in the haystack
    for i in 0..=a.len() {
        table[at(i, 0)] = i;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = (table[at(i - 1, j - 1)] + cost)
                .min(table[at(i - 1, j)] + 1)
                .min(table[at(i, j - 1)] + 1);

            if i > 1
                && j > 1
                && a[i - 1] == b[j - 2]
                && a[i - 2] == b[j - 1]
                && a[i - 1] != a[i - 2]
            {
                best = best.min(table[at(i - 2, j - 2)] + 1);
            }

            table[at(i, j)] = best;
        }
    }

    // ... and end anywhere
    (0..=b.len())
        .map(|j| table[at(a.len(), j)])
        .min()
        .unwrap_or(a.len())
}
