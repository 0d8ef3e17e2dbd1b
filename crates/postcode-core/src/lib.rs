// crates/postcode-core/src/lib.rs

//! # postcode-core
//!
//! In-memory fuzzy postcode search. A trie answers exact and prefix lookups,
//! a BK-tree answers "within `k` edits" lookups, and a confidence policy
//! decides whether the best candidate can be accepted without asking the
//! user.
//!
//! ```rust
//! use postcode_core::prelude::*;
//!
//! let engine = PostcodeSearch::new(EngineConfig::default());
//! engine
//!     .initialize([("E14 9WB", "E14 9WB"), ("E14 9WA", "E14 9WA"), ("SW1A 1AA", "SW1A 1AA")])
//!     .unwrap();
//!
//! let best = engine.best_match("e149wb").unwrap().unwrap();
//! assert_eq!(best.original_text, "E14 9WB");
//! assert!(best.auto_selected);
//! ```

pub mod bktree;
pub mod builder;
pub mod cache;
pub mod common;
pub mod config;
pub mod distance;
pub mod engine;
pub mod error;
pub mod format;
pub mod index;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod prelude;
pub mod query;
pub mod score;
pub mod trie;

// Re-exports
pub use crate::builder::{build_index, build_index_from_codes, IndexBuilder};
pub use crate::cache::{CacheConfig, CacheStats, ResultCache};
pub use crate::common::IndexStats;
pub use crate::config::EngineConfig;
pub use crate::engine::{BestMatch, EngineStats, Match, PostcodeSearch, Ready, SearchOutcome};
pub use crate::error::{PostcodeError, Result};
pub use crate::index::{BuildReport, PostcodeIndex};
pub use crate::model::{ScoredResult, SearchCandidate, Strategy};
pub use crate::normalize::{NormalizedCode, Normalizer, NormalizerConfig};
pub use crate::query::{QueryOptions, QueryOutput, RadiusPolicy};
pub use crate::score::ScoringPolicy;
