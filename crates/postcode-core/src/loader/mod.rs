// crates/postcode-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the physical layer (files, gzip) and delegates to the dataset
//! parsers or the binary snapshot codec.

use crate::builder::IndexBuilder;
use crate::error::Result;
use crate::index::PostcodeIndex;
use std::path::Path;
use std::time::Instant;

pub mod common_io;
pub mod dataset;
pub mod snapshot;

pub use dataset::DatasetEntry;
pub use snapshot::{CompressionMode, IndexSnapshot, CACHE_SUFFIX, SNAPSHOT_FORMAT_VERSION};

impl PostcodeIndex {
    /// Parses the dataset at `path` and builds a fresh index from it.
    pub fn load_from_dataset(path: impl AsRef<Path>, builder: &IndexBuilder) -> Result<Self> {
        let path = path.as_ref();
        let entries = dataset::read_entries(path)?;
        tracing::debug!(path = %path.display(), entries = entries.len(), "dataset read");
        builder.build(entries.into_iter().map(DatasetEntry::into_pair))
    }

    /// **Smart Load:** uses the snapshot next to `source` when it is fresh,
    /// otherwise builds from `source` and rewrites the snapshot.
    ///
    /// A snapshot that fails to load (corrupt, other format version) is
    /// treated as stale. Writing the new snapshot is best effort.
    pub fn load_via_snapshot(source: impl AsRef<Path>, builder: &IndexBuilder) -> Result<Self> {
        let source = source.as_ref();
        let cache_path = common_io::get_cache_path(source, CACHE_SUFFIX);

        if common_io::is_cache_fresh(source, &cache_path) {
            let started = Instant::now();
            match snapshot::load_snapshot(&cache_path) {
                Ok(index) => {
                    tracing::info!(
                        path = %cache_path.display(),
                        codes = index.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "postcode index loaded from snapshot"
                    );
                    return Ok(index);
                }
                Err(e) => {
                    tracing::warn!(path = %cache_path.display(), error = %e, "ignoring unusable snapshot");
                }
            }
        }

        let index = Self::load_from_dataset(source, builder)?;

        if let Err(e) = snapshot::save_snapshot(&index, &cache_path) {
            tracing::warn!(path = %cache_path.display(), error = %e, "could not write snapshot");
        }
        Ok(index)
    }

    /// Writes this index as a snapshot at `path`.
    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        snapshot::save_snapshot(self, path)?;
        tracing::info!(path = %path.display(), codes = self.len(), "snapshot written");
        Ok(())
    }

    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        snapshot::load_snapshot(path.as_ref())
    }
}
