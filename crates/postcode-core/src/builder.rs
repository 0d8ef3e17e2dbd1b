// crates/postcode-core/src/builder.rs

//! # Index Builder
//!
//! Bulk-loads a dataset snapshot into a [`PostcodeIndex`].
//!
//! 1. **Normalize** every entry. This step is pure, so it runs on the rayon
//!    pool once the dataset is large enough to pay for it.
//! 2. **Insert** sequentially into the trie, and into the BK-tree for codes
//!    the trie had not seen. The trie decides what counts as a duplicate.
//!
//! Insertion is kept single-threaded: BK-trees built on separate shards can
//! only be merged by re-inserting one into the other, which costs as much as
//! building serially.

use crate::bktree::BkTree;
use crate::error::{PostcodeError, Result};
use crate::index::{BuildReport, PostcodeIndex};
use crate::normalize::Normalizer;
use crate::trie::{Trie, TrieInsert};
use rayon::prelude::*;
use std::time::Instant;

/// Below this many entries normalization stays on the calling thread.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 50_000;

#[derive(Debug, Clone, Copy)]
pub struct IndexBuilder {
    normalizer: Normalizer,
    parallel_threshold: usize,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new(Normalizer::default())
    }
}

impl IndexBuilder {
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Entry count from which normalization fans out to rayon.
    /// `usize::MAX` keeps it serial, `0` always parallelizes.
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Builds both indexes from `(code, original_text)` pairs.
    ///
    /// # Errors
    /// [`PostcodeError::Build`] when two entries normalize to the same code
    /// but carry different original text, or when no entry survives
    /// normalization. Both are fatal: the index would otherwise silently
    /// resolve codes to the wrong display text, or to nothing.
    pub fn build<I, C, O>(&self, entries: I) -> Result<PostcodeIndex>
    where
        I: IntoIterator<Item = (C, O)>,
        C: AsRef<str> + Send,
        O: AsRef<str> + Send,
    {
        let started = Instant::now();
        let entries: Vec<(C, O)> = entries.into_iter().collect();
        let total = entries.len();

        let normalizer = self.normalizer;
        let normalized: Vec<_> = if total >= self.parallel_threshold {
            entries
                .into_par_iter()
                .map(|(code, original)| (normalizer.normalize(code.as_ref()), original))
                .collect()
        } else {
            entries
                .into_iter()
                .map(|(code, original)| (normalizer.normalize(code.as_ref()), original))
                .collect()
        };

        let mut trie = Trie::new();
        let mut bk_tree = BkTree::new();
        let mut report = BuildReport::default();

        for (position, (code, original)) in normalized.into_iter().enumerate() {
            let code = match code {
                Ok(code) => code,
                Err(e) => {
                    tracing::debug!(position, error = %e, "skipping dataset entry");
                    report.skipped += 1;
                    continue;
                }
            };
            let original = original.as_ref().trim();

            match trie.insert(&code, original) {
                TrieInsert::Inserted => {
                    bk_tree.insert(code);
                    report.inserted += 1;
                }
                TrieInsert::Duplicate => report.duplicates += 1,
                TrieInsert::Conflict { existing } => {
                    return Err(PostcodeError::Build(format!(
                        "code {code} appears as both '{existing}' and '{original}' (entry {position})"
                    )));
                }
            }
        }

        if report.skipped > 0 {
            tracing::warn!(
                skipped = report.skipped,
                total,
                "dataset entries without a usable postcode were skipped"
            );
        }
        if report.inserted == 0 {
            return Err(PostcodeError::Build(format!(
                "dataset of {total} entries contains no valid postcodes"
            )));
        }

        let index = PostcodeIndex::from_parts(trie, bk_tree, report);
        tracing::info!(
            codes = report.inserted,
            duplicates = report.duplicates,
            skipped = report.skipped,
            bk_depth = index.bk_tree().depth(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "postcode index built"
        );
        Ok(index)
    }
}

/// Builds an index with the default normalizer.
pub fn build_index<I, C, O>(entries: I) -> Result<PostcodeIndex>
where
    I: IntoIterator<Item = (C, O)>,
    C: AsRef<str> + Send,
    O: AsRef<str> + Send,
{
    IndexBuilder::default().build(entries)
}

/// Convenience for datasets where the display text *is* the code.
pub fn build_index_from_codes<I, S>(codes: I) -> Result<PostcodeIndex>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str> + Send + Clone,
{
    build_index(codes.into_iter().map(|c| (c.clone(), c)))
}
