// crates/postcode-core/src/engine.rs

//! # Search Engine
//!
//! The boundary API. Callers hand in raw user text and get ranked,
//! confidence-annotated results back; everything below (normalization,
//! cache, trie, BK-tree, scoring) stays internal.
//!
//! The live `(index, cache)` pair sits behind an `RwLock<Option<Arc<_>>>`.
//! A query clones the `Arc` under a short read lock and drops the lock before
//! doing any work, so a rebuild that publishes a new pair never waits on
//! queries, and a query never observes half of a rebuild.

use crate::builder::IndexBuilder;
use crate::cache::{CacheStats, ResultCache};
use crate::config::EngineConfig;
use crate::error::{PostcodeError, Result};
use crate::index::{BuildReport, PostcodeIndex};
use crate::model::{ScoredResult, Strategy};
use crate::normalize::{NormalizedCode, Normalizer};
use crate::query::{self, QueryOptions};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

static GLOBAL: Lazy<PostcodeSearch> = Lazy::new(|| PostcodeSearch::new(EngineConfig::default()));

/// An index together with the cache of results computed against it.
struct Live {
    index: Arc<PostcodeIndex>,
    cache: ResultCache,
}

/// Returned once an index has been published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ready {
    pub codes: usize,
    pub report: BuildReport,
}

/// Everything [`PostcodeSearch::search`] knows about one query.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub query: NormalizedCode,
    /// Best first. Empty when nothing was close enough.
    pub results: Arc<[ScoredResult]>,
    /// `None` when the results came from the cache.
    pub strategy: Option<Strategy>,
    pub from_cache: bool,
    pub elapsed: Duration,
}

impl SearchOutcome {
    /// The auto-selected result, if the confidence policy picked one.
    pub fn auto_selected(&self) -> Option<&ScoredResult> {
        self.results.first().filter(|r| r.auto_selected)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestMatch {
    pub code: String,
    pub original_text: String,
    pub confidence: f64,
    pub edit_distance: usize,
    /// `false` means: show it to the user and ask.
    pub auto_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub code: String,
    pub original_text: String,
    pub confidence: f64,
}

impl From<&ScoredResult> for Match {
    fn from(r: &ScoredResult) -> Self {
        Self {
            code: r.code().to_owned(),
            original_text: r.original_text().to_owned(),
            confidence: r.confidence,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub ready: bool,
    pub codes: usize,
    /// Every query since construction, including failed ones.
    pub searches: u64,
    pub cache: CacheStats,
}

pub struct PostcodeSearch {
    config: EngineConfig,
    normalizer: Normalizer,
    live: RwLock<Option<Arc<Live>>>,
    searches: AtomicU64,
}

impl std::fmt::Debug for PostcodeSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostcodeSearch")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl Default for PostcodeSearch {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PostcodeSearch {
    /// An engine with no index yet. Every query fails with
    /// [`PostcodeError::NotReady`] until [`initialize`](Self::initialize)
    /// (or one of its siblings) succeeds.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config.normalizer),
            config,
            live: RwLock::new(None),
            searches: AtomicU64::new(0),
        }
    }

    /// The process-wide engine, created with the default configuration on
    /// first access. It still has to be initialized.
    pub fn global() -> &'static PostcodeSearch {
        &GLOBAL
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Builds an index from `(code, original_text)` pairs and publishes it.
    ///
    /// # Errors
    /// [`PostcodeError::Build`] on conflicting duplicates or a dataset with
    /// no usable code. The previously published index, if any, stays live;
    /// an engine that was not ready stays not ready.
    pub fn initialize<I, C, O>(&self, entries: I) -> Result<Ready>
    where
        I: IntoIterator<Item = (C, O)>,
        C: AsRef<str> + Send,
        O: AsRef<str> + Send,
    {
        let index = IndexBuilder::new(self.normalizer).build(entries)?;
        Ok(self.install(index))
    }

    /// Loads the dataset at `path`, through its snapshot when one is fresh.
    pub fn initialize_from_path(&self, path: impl AsRef<Path>) -> Result<Ready> {
        let builder = IndexBuilder::new(self.normalizer);
        let index = PostcodeIndex::load_via_snapshot(path, &builder)?;
        Ok(self.install(index))
    }

    /// Replaces the live index with one built from `entries`.
    ///
    /// Queries running during the rebuild finish against the old index;
    /// queries starting after it returns see the new one. The cache starts
    /// empty.
    pub fn rebuild<I, C, O>(&self, entries: I) -> Result<Ready>
    where
        I: IntoIterator<Item = (C, O)>,
        C: AsRef<str> + Send,
        O: AsRef<str> + Send,
    {
        tracing::info!(was_ready = self.is_ready(), "rebuilding postcode index");
        self.initialize(entries)
    }

    /// Publishes a prebuilt index together with a fresh, empty cache.
    pub fn install(&self, index: PostcodeIndex) -> Ready {
        let ready = Ready {
            codes: index.len(),
            report: index.report(),
        };
        let live = Arc::new(Live {
            index: Arc::new(index),
            cache: ResultCache::new(self.config.cache),
        });
        *self.live.write() = Some(live);
        tracing::info!(codes = ready.codes, "postcode index published");
        ready
    }

    pub fn is_ready(&self) -> bool {
        self.live.read().is_some()
    }

    /// The currently published index.
    pub fn index(&self) -> Option<Arc<PostcodeIndex>> {
        self.live.read().as_ref().map(|live| Arc::clone(&live.index))
    }

    /// All scored results for `raw`, best first.
    ///
    /// # Errors
    /// [`PostcodeError::NotReady`] before initialization,
    /// [`PostcodeError::InvalidInput`] when `raw` does not normalize.
    pub fn search(&self, raw: &str) -> Result<SearchOutcome> {
        self.searches.fetch_add(1, Ordering::Relaxed);
        let started = Instant::now();
        let live = self.live()?;
        let query = self.normalizer.normalize(raw)?;

        if let Some(results) = live.cache.get(query.as_str()) {
            tracing::debug!(%query, "cache hit");
            return Ok(SearchOutcome {
                query,
                results,
                strategy: None,
                from_cache: true,
                elapsed: started.elapsed(),
            });
        }

        let output = query::run(&live.index, query, &self.config.query);
        let scored = self.config.scoring.score(&output.candidates, output.query.len());
        let results: Arc<[ScoredResult]> = scored.into();
        live.cache.put(output.query.as_str(), Arc::clone(&results));

        Ok(SearchOutcome {
            query: output.query,
            results,
            strategy: Some(output.strategy),
            from_cache: false,
            elapsed: started.elapsed(),
        })
    }

    /// The top result, or `None` when there is none or its confidence is
    /// below the policy's `min_confidence`.
    pub fn best_match(&self, raw: &str) -> Result<Option<BestMatch>> {
        let outcome = self.search(raw)?;
        let min_confidence = self.config.scoring.min_confidence;
        Ok(outcome
            .results
            .first()
            .filter(|r| r.confidence >= min_confidence)
            .map(|r| BestMatch {
                code: r.code().to_owned(),
                original_text: r.original_text().to_owned(),
                confidence: r.confidence,
                edit_distance: r.edit_distance(),
                auto_selected: r.auto_selected,
            }))
    }

    /// Up to `n` results, best first, for a "did you mean" list.
    ///
    /// When `n` exceeds the configured `max_results` the query runs again
    /// with the larger bound and bypasses the cache, whose lists are cut at
    /// `max_results`.
    pub fn top_matches(&self, raw: &str, n: usize) -> Result<Vec<Match>> {
        if n <= self.config.query.max_results {
            let outcome = self.search(raw)?;
            return Ok(outcome.results.iter().take(n).map(Match::from).collect());
        }

        self.searches.fetch_add(1, Ordering::Relaxed);
        let live = self.live()?;
        let query = self.normalizer.normalize(raw)?;
        let options = QueryOptions {
            max_results: n,
            ..self.config.query
        };
        let output = query::run(&live.index, query, &options);
        let scored = self.config.scoring.score(&output.candidates, output.query.len());
        Ok(scored.iter().map(Match::from).collect())
    }

    pub fn stats(&self) -> EngineStats {
        let live = self.live.read().clone();
        EngineStats {
            ready: live.is_some(),
            codes: live.as_ref().map_or(0, |l| l.index.len()),
            searches: self.searches.load(Ordering::Relaxed),
            cache: live.as_ref().map(|l| l.cache.stats()).unwrap_or_default(),
        }
    }

    fn live(&self) -> Result<Arc<Live>> {
        self.live.read().clone().ok_or(PostcodeError::NotReady)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<(&'static str, &'static str)> {
        ["E14 9WB", "E14 9WA", "SW1A 1AA"]
            .into_iter()
            .map(|c| (c, c))
            .collect()
    }

    fn ready_engine() -> PostcodeSearch {
        let engine = PostcodeSearch::default();
        engine.initialize(sample()).unwrap();
        engine
    }

    #[test]
    fn queries_before_initialize_are_not_ready() {
        let engine = PostcodeSearch::default();
        assert!(!engine.is_ready());
        assert!(matches!(engine.search("E149WB"), Err(PostcodeError::NotReady)));
        assert!(matches!(engine.best_match("E149WB"), Err(PostcodeError::NotReady)));
    }

    #[test]
    fn initialize_reports_counts() {
        let engine = PostcodeSearch::default();
        let ready = engine.initialize(sample()).unwrap();
        assert_eq!(ready.codes, 3);
        assert_eq!(ready.report.inserted, 3);
        assert!(engine.is_ready());
    }

    #[test]
    fn second_search_is_served_from_cache() {
        let engine = ready_engine();
        let first = engine.search("e14 9w").unwrap();
        let second = engine.search("E14-9W").unwrap();
        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(first.results, second.results);

        let stats = engine.stats();
        assert_eq!(stats.searches, 2);
        assert_eq!(stats.cache.hits, 1);
    }

    #[test]
    fn best_match_respects_min_confidence() {
        let engine = ready_engine();
        let best = engine.best_match("e149wb").unwrap().unwrap();
        assert_eq!(best.original_text, "E14 9WB");
        assert!(best.auto_selected);

        let strict = PostcodeSearch::new(EngineConfig {
            scoring: crate::score::ScoringPolicy {
                min_confidence: 0.9,
                ..Default::default()
            },
            ..Default::default()
        });
        strict.initialize(sample()).unwrap();
        // One edit over six characters is 0.83.
        assert!(strict.best_match("E149WC").unwrap().is_none());
    }

    #[test]
    fn top_matches_is_bounded() {
        let engine = ready_engine();
        let top = engine.top_matches("E14 9W", 1).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].code, "E149WA");
    }

    #[test]
    fn top_matches_can_exceed_max_results() {
        let engine = PostcodeSearch::default();
        let codes: Vec<String> = ('A'..='Z').map(|c| format!("E1 1A{c}")).collect();
        engine
            .initialize(codes.iter().map(|c| (c.as_str(), c.as_str())))
            .unwrap();

        let cap = engine.config().query.max_results;
        assert!(cap < 25);
        assert_eq!(engine.top_matches("E1 1A", cap).unwrap().len(), cap);

        let wide = engine.top_matches("E1 1A", 25).unwrap();
        assert_eq!(wide.len(), 25);
        assert!(wide.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        // Only the capped query went through the cache.
        assert_eq!(engine.stats().cache.entries, 1);
        assert_eq!(engine.search("E1 1A").unwrap().results.len(), cap);
    }

    #[test]
    fn failed_rebuild_keeps_old_index() {
        let engine = ready_engine();
        let err = engine
            .rebuild([("E14 9WB", "E14 9WB"), ("e149wb", "elsewhere")])
            .unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(engine.stats().codes, 3);
    }

    #[test]
    fn rebuild_swaps_index_and_clears_cache() {
        let engine = ready_engine();
        engine.search("E149WB").unwrap();
        engine.rebuild([("M1 1AE", "M1 1AE")]).unwrap();

        let stats = engine.stats();
        assert_eq!(stats.codes, 1);
        assert_eq!(stats.cache.entries, 0);
        assert!(engine.best_match("E149WB").unwrap().is_none());
    }

    #[test]
    fn engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostcodeSearch>();
        assert_send_sync::<PostcodeIndex>();
        assert_send_sync::<ResultCache>();
    }
}
