// crates/postcode-core/src/loader/dataset.rs

//! Reading postcode datasets.
//!
//! Two source shapes are understood (optionally gzipped):
//!
//! - **JSON** (`*.json`, `json` feature): an array whose items are either
//!   plain strings or objects with a `postcode` field (`Postcode` and
//!   `postal_code` are accepted too) and an optional `display` text.
//! - **Text / CSV** (anything else): one record per line, the postcode is the
//!   first comma-separated field. Blank lines, `#` comments and a leading
//!   `postcode` header are ignored.

use super::common_io;
use crate::error::Result;
use std::io::BufRead;
use std::path::Path;

/// One dataset record: the code to index and the text to show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    pub code: String,
    pub original: String,
}

impl DatasetEntry {
    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        Self {
            code: code.to_owned(),
            original: code.to_owned(),
        }
    }

    /// `(code, original)` form accepted by the index builder.
    pub fn into_pair(self) -> (String, String) {
        (self.code, self.original)
    }
}

/// Reads every record of the dataset at `path`.
pub fn read_entries(path: &Path) -> Result<Vec<DatasetEntry>> {
    let reader = common_io::open_stream(path)?;

    if is_json_path(path) {
        #[cfg(feature = "json")]
        {
            return parse_json(reader);
        }
        #[cfg(not(feature = "json"))]
        {
            return Err(crate::PostcodeError::InvalidData(format!(
                "{} is JSON but the 'json' feature is disabled",
                path.display()
            )));
        }
    }

    parse_lines(reader)
}

/// `postcodes.json` and `postcodes.json.gz` are JSON.
fn is_json_path(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|f| f.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    name.ends_with(".json")
}

/// Line-oriented records; the first comma-separated field is the code.
pub fn parse_lines<R: BufRead>(reader: R) -> Result<Vec<DatasetEntry>> {
    let mut entries = Vec::new();
    let mut first_record = true;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let field = line
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .trim_matches('"')
            .trim();

        if first_record {
            first_record = false;
            if field.eq_ignore_ascii_case("postcode") || field.eq_ignore_ascii_case("postal_code") {
                continue;
            }
        }
        entries.push(DatasetEntry::from_code(field));
    }

    Ok(entries)
}

#[cfg(feature = "json")]
mod json {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    pub(super) enum RawRecord {
        Code(String),
        Record {
            #[serde(alias = "Postcode", alias = "postal_code")]
            postcode: String,
            #[serde(default)]
            display: Option<String>,
        },
    }
}

/// JSON array of strings or `{ "postcode": ..., "display": ... }` objects.
#[cfg(feature = "json")]
pub fn parse_json<R: BufRead>(reader: R) -> Result<Vec<DatasetEntry>> {
    let raw: Vec<json::RawRecord> = serde_json::from_reader(reader)?;
    Ok(raw
        .into_iter()
        .map(|record| match record {
            json::RawRecord::Code(code) => DatasetEntry::from_code(&code),
            json::RawRecord::Record { postcode, display } => {
                let mut entry = DatasetEntry::from_code(&postcode);
                if let Some(display) = display.filter(|d| !d.trim().is_empty()) {
                    entry.original = display.trim().to_owned();
                }
                entry
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PostcodeError;
    use std::io::Cursor;

    #[test]
    fn lines_with_header_comments_and_csv() {
        let text = "Postcode,lat,lng\n# comment\nE14 9WB,51.5,-0.01\n\n\"SW1A 1AA\",51.5,-0.14\nM1 1AE\n";
        let entries = parse_lines(Cursor::new(text)).unwrap();
        let codes: Vec<&str> = entries.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, ["E14 9WB", "SW1A 1AA", "M1 1AE"]);
        assert_eq!(entries[0].original, "E14 9WB");
    }

    #[test]
    fn header_only_skipped_on_first_record() {
        let entries = parse_lines(Cursor::new("E14 9WB\npostcode\n")).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_strings_and_objects() {
        let json = r#"["E14 9WB", {"Postcode": "SW1A 1AA"}, {"postcode": "m11ae", "display": "M1 1AE"}]"#;
        let entries = parse_json(Cursor::new(json)).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].code, "SW1A 1AA");
        assert_eq!(entries[2].code, "m11ae");
        assert_eq!(entries[2].original, "M1 1AE");
    }

    #[test]
    fn json_detection_ignores_gz() {
        assert!(is_json_path(Path::new("/x/postcodes.JSON.gz")));
        assert!(is_json_path(Path::new("postcodes.json")));
        assert!(!is_json_path(Path::new("postcodes.csv.gz")));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = read_entries(Path::new("/no/such/postcodes.txt")).unwrap_err();
        assert!(matches!(err, PostcodeError::NotFound(_)));
    }
}
