//! postcode-core prelude: bring common types into scope for demos and tests.

#![allow(unused_imports)]

pub use crate::config::EngineConfig;
pub use crate::engine::{BestMatch, EngineStats, Match, PostcodeSearch, SearchOutcome};
pub use crate::error::{PostcodeError, Result};
pub use crate::format::{display_form, is_valid_uk_format};
pub use crate::index::PostcodeIndex;
pub use crate::model::{ScoredResult, Strategy};
pub use crate::query::RadiusPolicy;
pub use crate::score::ScoringPolicy;
