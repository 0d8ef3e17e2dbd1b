// crates/postcode-core/src/error.rs

//! # Errors
//!
//! One error enum for the whole engine. Only [`PostcodeError::Build`] is
//! fatal; everything else is recoverable by the caller (re-prompt, retry
//! after readiness, fix the dataset path).
//!
//! "No candidate within the search radius" is *not* an error: it surfaces as
//! an empty result list or `Option::None`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostcodeError {
    /// Query (or dataset code) is empty, too long, or has no alphanumerics.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A query arrived before `initialize()` published an index.
    #[error("Search index is not ready")]
    NotReady,

    /// The dataset cannot be indexed without guessing (e.g. the same code
    /// with two different display texts). Aborts initialization.
    #[error("Index build failed: {0}")]
    Build(String),

    /// A dataset or snapshot file could not be found/opened.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A dataset or snapshot file exists but its contents are unusable.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A snapshot was readable but written by an incompatible format version.
    #[error("Snapshot rejected: {0}")]
    Snapshot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Binary encoding error: {0}")]
    Bincode(#[from] bincode::Error),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PostcodeError>;

impl PostcodeError {
    /// `true` for errors that must abort startup rather than be retried.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PostcodeError::Build(_))
    }
}
