//! Character-trigram text matcher.
//!
//! A text is reduced to the set of its contiguous three-character
//! substrings ("shingles") after lowercasing. A candidate's score is the
//! number of shingles it shares with the query. The score is an overlap
//! count, not a ratio, so long candidates are not penalised for shingles
//! the query does not contain.

use std::collections::HashSet;

/// Length of a shingle, in characters.
pub const SHINGLE_LEN: usize = 3;

/// A candidate's position in the input list and its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranked {
    pub index: usize,
    pub score: usize,
}

/// Canonical case used for comparison.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

/// Shingle set of an already normalized text. Empty for texts shorter than
/// [`SHINGLE_LEN`] characters.
pub fn shingles(text: &str) -> HashSet<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .windows(SHINGLE_LEN)
        .map(|w| w.iter().collect())
        .collect()
}

/// Number of shingles shared by `query` and `candidate`.
pub fn similarity(query: &HashSet<String>, candidate: &HashSet<String>) -> usize {
    query.intersection(candidate).count()
}

/// Score every candidate against `query` and sort by score, highest first.
///
/// Ties keep their input order, so ranking the same input twice gives the
/// same result.
pub fn rank<S: AsRef<str>>(query: &str, candidates: &[S]) -> Vec<Ranked> {
    let query = shingles(&normalize(query));

    let mut ranked: Vec<Ranked> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| Ranked {
            index,
            score: similarity(&query, &shingles(&normalize(candidate.as_ref()))),
        })
        .collect();

    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

/// Highest-ranked candidate, or `None` when there are no candidates.
pub fn best<S: AsRef<str>>(query: &str, candidates: &[S]) -> Option<Ranked> {
    rank(query, candidates).into_iter().next()
}
