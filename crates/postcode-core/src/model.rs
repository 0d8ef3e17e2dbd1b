// crates/postcode-core/src/model.rs

//! Result types shared by the index, the scorer, the cache and callers.

use crate::distance::levenshtein;
use crate::normalize::NormalizedCode;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One match produced by a query. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCandidate {
    pub code: NormalizedCode,
    /// The code as it appeared in the dataset (`"E14 9WB"`), for display.
    pub original_text: String,
    pub edit_distance: usize,
    /// `|len(code) - len(query)|`, secondary ranking key.
    pub length_delta: usize,
}

impl SearchCandidate {
    /// Builds a candidate, measuring distance and length delta against `query`.
    pub fn against(query: &NormalizedCode, code: NormalizedCode, original_text: &str) -> Self {
        let edit_distance = levenshtein(query.as_str(), code.as_str());
        Self::with_distance(query, code, original_text, edit_distance)
    }

    /// Builds a candidate when the distance is already known (BK-tree hits).
    pub fn with_distance(
        query: &NormalizedCode,
        code: NormalizedCode,
        original_text: &str,
        edit_distance: usize,
    ) -> Self {
        let length_delta = code.len().abs_diff(query.len());
        Self {
            code,
            original_text: original_text.to_owned(),
            edit_distance,
            length_delta,
        }
    }

    /// Deterministic ranking: edit distance, then length delta, then code.
    ///
    /// Independent of insertion order and of the traversal order of the
    /// indexes.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.edit_distance
            .cmp(&other.edit_distance)
            .then(self.length_delta.cmp(&other.length_delta))
            .then_with(|| self.code.cmp(&other.code))
    }
}

/// A candidate annotated by the confidence policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub candidate: SearchCandidate,
    /// In `[0, 1]`; 1.0 is an exact match.
    pub confidence: f64,
    /// `true` only for a top candidate the caller may accept without asking.
    pub auto_selected: bool,
}

impl ScoredResult {
    pub fn code(&self) -> &str {
        self.candidate.code.as_str()
    }

    pub fn original_text(&self) -> &str {
        &self.candidate.original_text
    }

    pub fn edit_distance(&self) -> usize {
        self.candidate.edit_distance
    }
}

/// How a result list was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Trie hit; fuzzy search skipped.
    Exact,
    /// BK-tree search, stopped at this radius.
    Fuzzy { radius: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Normalizer;

    fn code(s: &str) -> NormalizedCode {
        Normalizer::default().normalize(s).unwrap()
    }

    #[test]
    fn against_measures_distance_and_delta() {
        let c = SearchCandidate::against(&code("E149W"), code("E149WB"), "E14 9WB");
        assert_eq!(c.edit_distance, 1);
        assert_eq!(c.length_delta, 1);
        assert_eq!(c.original_text, "E14 9WB");
    }

    #[test]
    fn rank_orders_by_distance_delta_then_code() {
        let q = code("E149W");
        let mut v = vec![
            SearchCandidate::against(&q, code("E149WB"), "E14 9WB"),
            SearchCandidate::against(&q, code("E19W"), "E1 9W"),
            SearchCandidate::against(&q, code("E149WA"), "E14 9WA"),
            SearchCandidate::against(&q, code("E149W"), "E14 9W"),
        ];
        v.sort_by(SearchCandidate::rank_cmp);
        let order: Vec<&str> = v.iter().map(|c| c.code.as_str()).collect();
        // E19W and E149WA/B are all at distance 1 with delta 1.
        assert_eq!(order, ["E149W", "E149WA", "E149WB", "E19W"]);
    }
}
