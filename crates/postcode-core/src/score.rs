// crates/postcode-core/src/score.rs

//! # Confidence Scoring / Auto-Selection
//!
//! `confidence = 1 - distance / max(query_len, candidate_len)`, clamped to
//! `[0, 1]`.
//!
//! The top candidate is auto-selected only when **all** of these hold:
//! - no other candidate shares its (minimum) edit distance,
//! - its confidence is strictly above `auto_select_threshold`,
//! - the runner-up's confidence is at least `separation_margin` lower.
//!
//! Otherwise nothing is auto-selected and the caller has to let the user
//! choose.

use crate::model::{ScoredResult, SearchCandidate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub auto_select_threshold: f64,
    pub separation_margin: f64,
    /// Below this, `best_match` reports "not found" instead of a weak guess.
    pub min_confidence: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            auto_select_threshold: 0.8,
            separation_margin: 0.15,
            min_confidence: 0.5,
        }
    }
}

/// Edit distance relative to the longer of the two strings.
pub fn confidence(edit_distance: usize, query_len: usize, candidate_len: usize) -> f64 {
    let longest = query_len.max(candidate_len);
    if longest == 0 {
        return 1.0;
    }
    (1.0 - edit_distance as f64 / longest as f64).clamp(0.0, 1.0)
}

impl ScoringPolicy {
    /// Scores candidates that are already in rank order (best first), as
    /// produced by the query orchestrator. Order is preserved.
    pub fn score(&self, candidates: &[SearchCandidate], query_len: usize) -> Vec<ScoredResult> {
        let mut scored: Vec<ScoredResult> = candidates
            .iter()
            .map(|c| ScoredResult {
                confidence: confidence(c.edit_distance, query_len, c.code.len()),
                candidate: c.clone(),
                auto_selected: false,
            })
            .collect();

        if self.should_auto_select(&scored) {
            scored[0].auto_selected = true;
        }
        scored
    }

    fn should_auto_select(&self, scored: &[ScoredResult]) -> bool {
        let Some(best) = scored.first() else {
            return false;
        };
        if best.confidence <= self.auto_select_threshold {
            return false;
        }
        match scored.get(1) {
            None => true,
            Some(second) => {
                second.candidate.edit_distance > best.candidate.edit_distance
                    && best.confidence - second.confidence >= self.separation_margin
            }
        }
    }
}
