// crates/postcode-core/src/loader/snapshot.rs

//! Binary snapshots of a built [`PostcodeIndex`].
//!
//! A snapshot is a derived artifact: it only saves the O(n · L²) build on
//! restart and is regenerated whenever its source dataset is newer. The
//! payload is the bincode encoding of both arenas, gzipped under the
//! `compact` feature. Reading sniffs the gzip magic bytes, so a reader can
//! consume either kind regardless of how it was compiled (as long as
//! `compact` is on for gzipped files).

use crate::error::{PostcodeError, Result};
use crate::index::PostcodeIndex;
use bincode::Options;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

/// Bumped whenever the serialized layout of the index changes.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Upper bound on a decoded snapshot, against corrupt length prefixes.
const SNAPSHOT_LIMIT: u64 = 512 * 1024 * 1024;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// The file extension to use for the snapshot next to a dataset.
#[cfg(not(feature = "compact"))]
pub const CACHE_SUFFIX: &str = ".idx.bin";
#[cfg(feature = "compact")]
pub const CACHE_SUFFIX: &str = ".idx.bin.gz";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    Gzip,
    None,
}

impl Default for CompressionMode {
    fn default() -> Self {
        #[cfg(feature = "compact")]
        {
            CompressionMode::Gzip
        }
        #[cfg(not(feature = "compact"))]
        {
            CompressionMode::None
        }
    }
}

/// Borrowing twin of [`IndexSnapshot`] so saving does not clone the arenas.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    format_version: u32,
    index: &'a PostcodeIndex,
}

/// On-disk envelope: the index plus the layout version it was written with.
#[derive(Debug, Deserialize)]
pub struct IndexSnapshot {
    pub format_version: u32,
    pub index: PostcodeIndex,
}

/// Same options for writing and reading; bincode's free functions use a
/// different integer encoding than `DefaultOptions`.
fn bincode_options() -> impl Options {
    bincode::DefaultOptions::new().with_limit(SNAPSHOT_LIMIT)
}

/// Writes `index` to `path` with the default compression.
pub fn save_snapshot(index: &PostcodeIndex, path: &Path) -> Result<()> {
    save_snapshot_with(index, path, CompressionMode::default())
}

pub fn save_snapshot_with(
    index: &PostcodeIndex,
    path: &Path,
    compression: CompressionMode,
) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let snapshot = SnapshotRef {
        format_version: SNAPSHOT_FORMAT_VERSION,
        index,
    };

    match compression {
        CompressionMode::Gzip => {
            #[cfg(feature = "compact")]
            {
                let mut encoder = GzEncoder::new(writer, Compression::default());
                bincode_options().serialize_into(&mut encoder, &snapshot)?;
                // `finish` writes the gzip trailer.
                encoder.finish()?.flush()?;
            }
            #[cfg(not(feature = "compact"))]
            {
                return Err(PostcodeError::InvalidData(
                    "Gzip requested but 'compact' disabled".into(),
                ));
            }
        }
        CompressionMode::None => {
            bincode_options().serialize_into(&mut writer, &snapshot)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Reads a snapshot written by [`save_snapshot`].
///
/// # Errors
/// `NotFound` if the file is missing, `Snapshot` if it was written by
/// another format version or its two indexes are malformed or disagree, `Bincode` if it is
/// truncated or corrupt.
pub fn load_snapshot(path: &Path) -> Result<PostcodeIndex> {
    let mut file = File::open(path).map_err(|e| {
        PostcodeError::NotFound(format!("Snapshot not found at {}: {}", path.display(), e))
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    if bytes.starts_with(&GZIP_MAGIC) {
        bytes = gunzip(&bytes, path)?;
    }
    from_bytes(&bytes)
}

/// Decodes an uncompressed snapshot payload.
pub fn from_bytes(bytes: &[u8]) -> Result<PostcodeIndex> {
    let snapshot: IndexSnapshot = bincode_options().deserialize(bytes)?;

    if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(PostcodeError::Snapshot(format!(
            "format version {} (expected {})",
            snapshot.format_version, SNAPSHOT_FORMAT_VERSION
        )));
    }
    if !snapshot.index.is_consistent() {
        return Err(PostcodeError::Snapshot("malformed or inconsistent index".into()));
    }
    Ok(snapshot.index)
}

#[cfg(feature = "compact")]
fn gunzip(bytes: &[u8], _path: &Path) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(not(feature = "compact"))]
fn gunzip(_bytes: &[u8], path: &Path) -> Result<Vec<u8>> {
    Err(PostcodeError::InvalidData(format!(
        "{} is gzip-compressed but the 'compact' feature is disabled",
        path.display()
    )))
}
