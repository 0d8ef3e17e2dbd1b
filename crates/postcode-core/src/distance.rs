// crates/postcode-core/src/distance.rs

//! Edit distance used by the BK-tree and the ranking.
//!
//! Plain Levenshtein: insertion, deletion and substitution all cost 1.
//! Transposition-aware metrics (Damerau) are not offered; a caller that
//! needs one re-ranks the candidates it gets back. The BK-tree's pruning
//! relies on the triangle inequality of the metric it was built with, so the
//! index itself never switches metric.

/// Classic dynamic-programming Levenshtein distance, O(|a|·|b|) time,
/// O(min(|a|,|b|)) memory (two rolling rows).
///
/// Works on `char`s so it stays correct for non-ASCII callers, though the
/// index only ever feeds it normalized ASCII keys.
///
/// ```rust
/// use postcode_core::distance::levenshtein;
/// assert_eq!(levenshtein("E149WB", "E149WA"), 1);
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// ```
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Keep the row over the shorter string.
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0usize; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let substitution = prev[j] + usize::from(lc != sc);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}
