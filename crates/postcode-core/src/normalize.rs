// crates/postcode-core/src/normalize.rs

//! Canonical keys for postal codes.
//!
//! Every string that enters an index or a query goes through
//! [`Normalizer::normalize`] first:
//!
//! 1. transliterate Unicode → ASCII (`deunicode`), so full-width digits or
//!    accented letters typed by a speech-to-text layer still compare,
//! 2. drop everything that is not an ASCII letter or digit (spaces, dashes,
//!    dots),
//! 3. upper-case.
//!
//! The output alphabet is `[A-Z0-9]`, which makes the operation idempotent.

use crate::error::{PostcodeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default upper bound on the length of a normalized key.
///
/// The longest real-world postal codes are ~10 characters; anything much
/// longer is either garbage or a sentence, and would only make the
/// quadratic edit-distance work more expensive.
pub const DEFAULT_MAX_LEN: usize = 16;

/// An upper-case, separator-free postal code key (`"E149WB"`).
///
/// Only [`Normalizer`] (and deserialization of a snapshot written by it)
/// constructs these, so holders can rely on the `[A-Z0-9]+` shape.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedCode(String);

impl NormalizedCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters (equal to bytes, the alphabet is ASCII).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Wraps a string that is already known to be normalized.
    pub(crate) fn from_normalized(s: String) -> Self {
        debug_assert!(s.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        NormalizedCode(s)
    }
}

impl AsRef<str> for NormalizedCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Knobs for [`Normalizer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Longest accepted normalized key.
    pub max_len: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_len: DEFAULT_MAX_LEN,
        }
    }
}

/// Pure, deterministic key builder.
#[derive(Clone, Copy, Debug, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn max_len(&self) -> usize {
        self.config.max_len
    }

    /// Builds the canonical key for `raw`.
    ///
    /// # Errors
    /// [`PostcodeError::InvalidInput`] when nothing alphanumeric is left, or
    /// when the key is longer than the configured maximum.
    ///
    /// # Examples
    /// ```rust
    /// use postcode_core::normalize::Normalizer;
    ///
    /// let n = Normalizer::default();
    /// assert_eq!(n.normalize(" e14 9wb ").unwrap().as_str(), "E149WB");
    /// assert_eq!(n.normalize("SW1A-1AA").unwrap().as_str(), "SW1A1AA");
    /// assert!(n.normalize("   ").is_err());
    /// ```
    pub fn normalize(&self, raw: &str) -> Result<NormalizedCode> {
        let key = fold_code(raw);

        if key.is_empty() {
            return Err(PostcodeError::InvalidInput(format!(
                "'{}' contains no letters or digits",
                raw.trim()
            )));
        }
        if key.len() > self.config.max_len {
            return Err(PostcodeError::InvalidInput(format!(
                "'{}' is longer than {} characters once normalized",
                raw.trim(),
                self.config.max_len
            )));
        }

        Ok(NormalizedCode(key))
    }
}

/// The unchecked folding step behind [`Normalizer::normalize`].
///
/// Never fails; may return an empty string.
pub fn fold_code(raw: &str) -> String {
    let ascii = if raw.is_ascii() {
        std::borrow::Cow::Borrowed(raw)
    } else {
        std::borrow::Cow::Owned(deunicode::deunicode(raw))
    };

    ascii
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_whitespace_and_separators() {
        let n = Normalizer::default();
        assert_eq!(n.normalize("E14 9WB").unwrap().as_str(), "E149WB");
        assert_eq!(n.normalize("\te14\n9wb").unwrap().as_str(), "E149WB");
        assert_eq!(n.normalize("sw1a-1aa.").unwrap().as_str(), "SW1A1AA");
    }

    #[test]
    fn transliterates_non_ascii() {
        let n = Normalizer::default();
        // Full-width digits/letters as produced by some IMEs.
        assert_eq!(n.normalize("Ｅ１４ ９ＷＢ").unwrap().as_str(), "E149WB");
    }

    #[test]
    fn rejects_empty_and_symbol_only() {
        let n = Normalizer::default();
        assert!(matches!(n.normalize(""), Err(PostcodeError::InvalidInput(_))));
        assert!(matches!(n.normalize(" - . "), Err(PostcodeError::InvalidInput(_))));
    }

    #[test]
    fn rejects_oversized() {
        let n = Normalizer::new(NormalizerConfig { max_len: 8 });
        assert!(n.normalize("SW1A 1AA").is_ok());
        assert!(matches!(
            n.normalize("SW1A 1AA SW1A"),
            Err(PostcodeError::InvalidInput(_))
        ));
    }

    #[test]
    fn idempotent_on_samples() {
        let n = Normalizer::default();
        for raw in ["E14 9WB", "  sw1a 1aa", "Straße 12", "m1-1ae"] {
            let once = n.normalize(raw).unwrap();
            let twice = n.normalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }
}
