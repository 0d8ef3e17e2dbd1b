// crates/postcode-core/src/config.rs

//! Engine configuration.
//!
//! Every field has a default, and every section is `#[serde(default)]`, so a
//! config file only needs to mention what it changes:
//!
//! ```json
//! { "query": { "max_radius": { "fixed": 3 } }, "scoring": { "separation_margin": 0.2 } }
//! ```

use crate::cache::CacheConfig;
use crate::normalize::NormalizerConfig;
use crate::query::QueryOptions;
use crate::score::ScoringPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub normalizer: NormalizerConfig,
    pub query: QueryOptions,
    pub scoring: ScoringPolicy,
    pub cache: CacheConfig,
}

impl EngineConfig {
    /// Reads a JSON config file; missing fields keep their defaults.
    #[cfg(feature = "json")]
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            crate::PostcodeError::NotFound(format!("Config not found at {}: {}", path.display(), e))
        })?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }

    /// Same config with caching turned off.
    pub fn without_cache(mut self) -> Self {
        self.cache.capacity = 0;
        self
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::query::RadiusPolicy;

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "query": { "max_radius": { "fixed": 3 } }, "scoring": { "separation_margin": 0.2 } }"#;
        let cfg: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.query.max_radius, RadiusPolicy::Fixed(3));
        assert_eq!(cfg.query.max_results, QueryOptions::default().max_results);
        assert_eq!(cfg.scoring.separation_margin, 0.2);
        assert_eq!(cfg.scoring.auto_select_threshold, 0.8);
        assert_eq!(cfg.cache, CacheConfig::default());
    }

    #[test]
    fn by_length_policy_parses() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{ "query": { "max_radius": "by_length" } }"#).unwrap();
        assert_eq!(cfg.query.max_radius, RadiusPolicy::ByLength);
    }

    #[test]
    fn load_from_missing_path_is_not_found() {
        let err = EngineConfig::load_from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, crate::PostcodeError::NotFound(_)));
    }
}
