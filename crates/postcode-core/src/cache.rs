// crates/postcode-core/src/cache.rs

//! # Result Cache
//!
//! Bounded LRU of scored result lists, keyed by normalized query.
//!
//! The cache is split into shards picked by an `fxhash` of the key; each
//! shard is an `lru::LruCache` behind its own `parking_lot::Mutex`, so
//! concurrent lookups for different keys rarely contend. `get` needs the
//! lock too, because a hit promotes the entry.
//!
//! Entries copy candidate data and never point into the index. When the
//! index is rebuilt the engine swaps in a fresh cache with it.

use crate::model::ScoredResult;
use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Total entries across all shards; 0 disables caching.
    pub capacity: usize,
    pub shards: usize,
    /// Entries older than this are treated as misses. `None` = LRU only.
    pub ttl_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            shards: 8,
            ttl_secs: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub query_key: String,
    pub results: Arc<[ScoredResult]>,
    pub inserted_at: Instant,
}

pub struct ResultCache {
    shards: Vec<Mutex<LruCache<String, CacheEntry>>>,
    ttl: Option<Duration>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("shards", &self.shards.len())
            .field("ttl", &self.ttl)
            .field("stats", &self.stats())
            .finish()
    }
}

impl ResultCache {
    pub fn new(config: CacheConfig) -> Self {
        let shards = if config.capacity == 0 {
            Vec::new()
        } else {
            // Shard capacities sum to exactly `capacity`; the first
            // `capacity % count` shards take one extra entry.
            let count = config.shards.clamp(1, config.capacity);
            let base = config.capacity / count;
            let extra = config.capacity % count;
            (0..count)
                .map(|i| {
                    let per_shard = base + usize::from(i < extra);
                    let cap = NonZeroUsize::new(per_shard).unwrap_or(NonZeroUsize::MIN);
                    Mutex::new(LruCache::new(cap))
                })
                .collect()
        };

        Self {
            shards,
            ttl: config.ttl_secs.map(Duration::from_secs),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A cache that stores nothing.
    pub fn disabled() -> Self {
        Self::new(CacheConfig {
            capacity: 0,
            ..CacheConfig::default()
        })
    }

    pub fn is_enabled(&self) -> bool {
        !self.shards.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Arc<[ScoredResult]>> {
        let shard = self.shard_for(key)?;

        let mut guard = shard.lock();
        let found = match guard.get(key) {
            Some(entry) if self.is_expired(entry) => None,
            Some(entry) => Some(Arc::clone(&entry.results)),
            None => None,
        };
        if found.is_none() && self.ttl.is_some() {
            guard.pop(key);
        }
        drop(guard);

        match &found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    pub fn put(&self, key: &str, results: Arc<[ScoredResult]>) {
        let Some(shard) = self.shard_for(key) else {
            return;
        };
        let entry = CacheEntry {
            query_key: key.to_owned(),
            results,
            inserted_at: Instant::now(),
        };
        shard.lock().put(key.to_owned(), entry);
    }

    pub fn clear(&self) {
        for shard in &self.shards {
            shard.lock().clear();
        }
    }

    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        self.ttl.is_some_and(|ttl| entry.inserted_at.elapsed() >= ttl)
    }

    fn shard_for(&self, key: &str) -> Option<&Mutex<LruCache<String, CacheEntry>>> {
        if self.shards.is_empty() {
            return None;
        }
        let mut hasher = fxhash::FxHasher::default();
        key.hash(&mut hasher);
        let idx = (hasher.finish() as usize) % self.shards.len();
        self.shards.get(idx)
    }
}
