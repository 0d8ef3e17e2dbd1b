// crates/postcode-core/src/loader/common_io.rs
use crate::error::{PostcodeError, Result};
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[cfg(feature = "compact")]
use flate2::read::GzDecoder;

/// `true` when the file name ends in `.gz`.
pub fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Opens `path` buffered, transparently gunzipping `*.gz` files.
pub fn open_stream(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| {
        PostcodeError::NotFound(format!("Dataset not found at {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);

    if !is_gzip_path(path) {
        return Ok(Box::new(reader));
    }

    #[cfg(feature = "compact")]
    {
        Ok(Box::new(BufReader::new(GzDecoder::new(reader))))
    }

    #[cfg(not(feature = "compact"))]
    {
        Err(PostcodeError::InvalidData(format!(
            "{} is gzip-compressed but the 'compact' feature is disabled",
            path.display()
        )))
    }
}

/// Snapshot path next to a dataset: `postcodes.txt` → `postcodes.txt<suffix>`.
pub fn get_cache_path(source: &Path, suffix: &str) -> PathBuf {
    let filename = source
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| "postcodes".to_owned());
    source.with_file_name(format!("{filename}{suffix}"))
}

/// A snapshot is fresh when it exists and is not older than its source.
pub fn is_cache_fresh(source: &Path, cache: &Path) -> bool {
    let cache_time = match fs::metadata(cache).and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(_) => return false,
    };
    match fs::metadata(source).and_then(|m| m.modified()) {
        Ok(source_time) => source_time <= cache_time,
        // Source gone: the snapshot is all we have.
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_path_appends_suffix() {
        let p = get_cache_path(Path::new("/data/postcodes.txt.gz"), ".idx.bin");
        assert_eq!(p, PathBuf::from("/data/postcodes.txt.gz.idx.bin"));
    }

    #[test]
    fn gzip_detection() {
        assert!(is_gzip_path(Path::new("a.json.gz")));
        assert!(is_gzip_path(Path::new("a.GZ")));
        assert!(!is_gzip_path(Path::new("a.json")));
    }

    #[test]
    fn missing_cache_is_stale() {
        assert!(!is_cache_fresh(Path::new("/nope/src"), Path::new("/nope/cache")));
    }
}
