// crates/postcode-core/src/common.rs
use serde::{Deserialize, Serialize};

/// Simple aggregate statistics for a built index.
///
/// Returned by [`crate::PostcodeIndex::stats`]; the counts reflect the
/// materialized in-memory index after deduplication at build time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub codes: usize,
    pub trie_nodes: usize,
    pub bk_depth: usize,
    pub min_code_len: usize,
    pub max_code_len: usize,
}
