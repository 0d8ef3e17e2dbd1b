// crates/postcode-core/src/index.rs

//! The built, immutable search index: a trie for exact/prefix lookups and a
//! BK-tree for fuzzy lookups over the same set of codes.
//!
//! A `PostcodeIndex` is never mutated after [`crate::builder::IndexBuilder`]
//! returns it. Sharing it behind an `Arc` is enough for concurrent readers.

use crate::bktree::BkTree;
use crate::common::IndexStats;
use crate::trie::Trie;
use serde::{Deserialize, Serialize};

/// Counters gathered while building an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    /// Distinct codes inserted.
    pub inserted: usize,
    /// Entries dropped because an identical entry was already inserted.
    pub duplicates: usize,
    /// Entries dropped because their code did not normalize.
    pub skipped: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PostcodeIndex {
    pub(crate) trie: Trie,
    pub(crate) bk_tree: BkTree,
    pub(crate) report: BuildReport,
    /// Shortest / longest normalized code in the index.
    pub(crate) min_code_len: usize,
    pub(crate) max_code_len: usize,
}

impl PostcodeIndex {
    pub(crate) fn from_parts(trie: Trie, bk_tree: BkTree, report: BuildReport) -> Self {
        let (min_code_len, max_code_len) = bk_tree
            .codes()
            .map(|c| c.len())
            .fold((usize::MAX, 0), |(lo, hi), n| (lo.min(n), hi.max(n)));
        Self {
            trie,
            bk_tree,
            report,
            min_code_len: if min_code_len == usize::MAX { 0 } else { min_code_len },
            max_code_len,
        }
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    pub fn bk_tree(&self) -> &BkTree {
        &self.bk_tree
    }

    pub fn report(&self) -> BuildReport {
        self.report
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    pub fn min_code_len(&self) -> usize {
        self.min_code_len
    }

    pub fn max_code_len(&self) -> usize {
        self.max_code_len
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            codes: self.len(),
            trie_nodes: self.trie.node_count(),
            bk_depth: self.bk_tree.depth(),
            min_code_len: self.min_code_len,
            max_code_len: self.max_code_len,
        }
    }

    /// Both arenas are well formed and hold the same codes. Used when
    /// loading a snapshot.
    pub fn is_consistent(&self) -> bool {
        self.trie.is_well_formed()
            && self.bk_tree.is_well_formed()
            && self.trie.len() == self.bk_tree.len()
            && self
                .bk_tree
                .codes()
                .all(|c| self.trie.original_text(c).is_some())
    }
}
