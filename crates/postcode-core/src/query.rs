// crates/postcode-core/src/query.rs

//! # Query Orchestrator
//!
//! Turns one normalized query into a ranked, bounded candidate list:
//!
//! 1. trie exact hit → return it alone (fuzzy search skipped),
//! 2. BK-tree search with the radius widened one step at a time until
//!    enough candidates are found or the maximum radius is reached,
//! 3. for queries shorter than a full code, trie prefix matches are merged
//!    in,
//! 4. deduplicate, rank, truncate.
//!
//! An empty list is a normal outcome ("nothing close enough"), not an error.

use crate::error::Result;
use crate::index::PostcodeIndex;
use crate::model::{SearchCandidate, Strategy};
use crate::normalize::{NormalizedCode, Normalizer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How far the fuzzy search may widen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusPolicy {
    /// Same ceiling for every query.
    Fixed(usize),
    /// Stricter for short input: 1 for up to 3 characters, 2 otherwise.
    /// Radius 3 touches close to half of a uniformly spread code space,
    /// so it is never chosen automatically.
    ByLength,
}

impl RadiusPolicy {
    pub fn max_radius_for(&self, query_len: usize) -> usize {
        match *self {
            RadiusPolicy::Fixed(r) => r,
            RadiusPolicy::ByLength if query_len <= 3 => 1,
            RadiusPolicy::ByLength => 2,
        }
    }
}

impl Default for RadiusPolicy {
    fn default() -> Self {
        RadiusPolicy::Fixed(2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    pub max_radius: RadiusPolicy,
    /// Widening stops as soon as this many fuzzy candidates are found.
    pub min_results: usize,
    /// Cap on the returned list.
    pub max_results: usize,
    /// Cap on trie prefix enumeration for truncated queries.
    pub prefix_limit: usize,
    /// Length of a complete code; shorter queries also get prefix matches.
    /// `None` uses the shortest code in the index.
    pub full_code_len: Option<usize>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            max_radius: RadiusPolicy::default(),
            min_results: 1,
            max_results: 10,
            prefix_limit: 100,
            full_code_len: None,
        }
    }
}

impl QueryOptions {
    pub fn with_max_radius(mut self, radius: usize) -> Self {
        self.max_radius = RadiusPolicy::Fixed(radius);
        self
    }
}

/// Candidates plus a note on how they were found.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    pub query: NormalizedCode,
    pub candidates: Vec<SearchCandidate>,
    pub strategy: Strategy,
    /// Whether trie prefix matches were merged in.
    pub used_prefix: bool,
    /// BK-tree nodes measured across all widening rounds.
    pub nodes_visited: usize,
}

impl PostcodeIndex {
    /// Normalizes `raw` and runs it through [`run`].
    ///
    /// # Errors
    /// Only [`crate::PostcodeError::InvalidInput`], from normalization.
    pub fn query(
        &self,
        normalizer: &Normalizer,
        raw: &str,
        options: &QueryOptions,
    ) -> Result<QueryOutput> {
        let query = normalizer.normalize(raw)?;
        Ok(run(self, query, options))
    }
}

/// Orchestrates trie and BK-tree lookups for an already normalized query.
pub fn run(index: &PostcodeIndex, query: NormalizedCode, options: &QueryOptions) -> QueryOutput {
    if let Some(hit) = index.trie().exact_lookup(&query) {
        tracing::debug!(%query, "exact match");
        return QueryOutput {
            query,
            candidates: vec![hit],
            strategy: Strategy::Exact,
            used_prefix: false,
            nodes_visited: 0,
        };
    }

    let max_radius = options.max_radius.max_radius_for(query.len());
    let (fuzzy, radius, nodes_visited) = widen(index, &query, max_radius, options.min_results);

    let mut merged: HashMap<NormalizedCode, SearchCandidate> = HashMap::with_capacity(fuzzy.len());
    for candidate in fuzzy {
        merged.insert(candidate.code.clone(), candidate);
    }

    let full_len = options.full_code_len.unwrap_or(index.min_code_len());
    let used_prefix = query.len() < full_len;
    if used_prefix {
        for candidate in index.trie().prefix_lookup(&query, options.prefix_limit) {
            merged.entry(candidate.code.clone()).or_insert(candidate);
        }
    }

    let mut candidates: Vec<SearchCandidate> = merged.into_values().collect();
    candidates.sort_by(SearchCandidate::rank_cmp);
    candidates.truncate(options.max_results);

    tracing::debug!(
        %query,
        radius,
        nodes_visited,
        used_prefix,
        found = candidates.len(),
        "fuzzy query"
    );

    QueryOutput {
        query,
        candidates,
        strategy: Strategy::Fuzzy { radius },
        used_prefix,
        nodes_visited,
    }
}

/// Iterative radius widening: 1, 2, … up to `max_radius`.
///
/// Returns the candidates of the last round, the radius it ran at and the
/// total number of BK-tree nodes measured.
fn widen(
    index: &PostcodeIndex,
    query: &NormalizedCode,
    max_radius: usize,
    min_results: usize,
) -> (Vec<SearchCandidate>, usize, usize) {
    let mut nodes_visited = 0;
    let mut radius = 1.min(max_radius);

    loop {
        let mut found = Vec::new();
        nodes_visited += index.bk_tree().search_with(query, radius, |m| {
            // Every BK-tree code is also in the trie; the builder inserts both.
            if let Some(original) = index.trie().original_text(m.code) {
                found.push(SearchCandidate::with_distance(
                    query,
                    m.code.clone(),
                    original,
                    m.distance,
                ));
            }
        });

        if found.len() >= min_results || radius >= max_radius {
            return (found, radius, nodes_visited);
        }
        radius += 1;
    }
}
