// crates/postcode-core/src/format.rs

//! UK postcode shape helpers.
//!
//! The index itself is format-agnostic; these helpers let a caller reject
//! input that cannot be a UK postcode before searching, and render a
//! normalized key the way people write it.

use crate::normalize::fold_code;
use once_cell::sync::Lazy;
use regex::Regex;

/// Outward code (area + district) and inward code (sector + unit).
static UK_POSTCODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{1,2}[0-9][A-Z0-9]? ?[0-9][A-Z]{2}$").expect("static regex compiles")
});

/// `true` if `raw`, once normalized and re-spaced, has the UK postcode shape
/// (`A9 9AA`, `A99 9AA`, `A9A 9AA`, `AA9 9AA`, `AA99 9AA`, `AA9A 9AA`).
///
/// ```rust
/// use postcode_core::format::is_valid_uk_format;
/// assert!(is_valid_uk_format("e14 9wb"));
/// assert!(is_valid_uk_format("SW1A1AA"));
/// assert!(!is_valid_uk_format("E14 9W"));
/// ```
pub fn is_valid_uk_format(raw: &str) -> bool {
    let key = fold_code(raw);
    key.len() >= 5 && UK_POSTCODE.is_match(&display_form(&key))
}

/// Inserts the single space before the inward code: `E149WB` → `E14 9WB`.
/// Keys shorter than 5 characters are returned unchanged.
pub fn display_form(code: &str) -> String {
    if code.len() < 5 || !code.is_ascii() {
        return code.to_owned();
    }
    let (outward, inward) = code.split_at(code.len() - 3);
    format!("{outward} {inward}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_uk_shape() {
        for raw in ["M1 1AE", "B33 8TH", "W1A 0AX", "CR2 6XH", "DN55 1PT", "EC1A 1BB"] {
            assert!(is_valid_uk_format(raw), "{raw}");
        }
    }

    #[test]
    fn rejects_malformed() {
        for raw in ["", "E14", "E14 9W", "123 456", "ZZZ9 9ZZ", "E14 9WBX"] {
            assert!(!is_valid_uk_format(raw), "{raw}");
        }
    }

    #[test]
    fn display_form_spaces_inward_code() {
        assert_eq!(display_form("E149WB"), "E14 9WB");
        assert_eq!(display_form("SW1A1AA"), "SW1A 1AA");
        assert_eq!(display_form("E14"), "E14");
    }
}
