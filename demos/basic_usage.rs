//! Basic usage example for postcode-rs
//!
//! Builds an index from a handful of codes and runs the three query styles.

use postcode_core::prelude::*;

fn main() -> Result<()> {
    println!("=== postcode-rs Basic Usage Example ===\n");

    let dataset = [
        "E14 9WB", "E14 9WA", "E14 5AB", "SW1A 1AA", "SW1A 2AA", "M1 1AE", "EC1A 1BB",
    ];

    let engine = PostcodeSearch::new(EngineConfig::default());
    let ready = engine.initialize(dataset.iter().map(|c| (*c, *c)))?;
    println!("Indexed {} postcodes\n", ready.codes);

    // Example 1: exact match, typed without the space
    println!("--- Example 1: Exact match ---");
    if let Some(best) = engine.best_match("e149wb")? {
        println!(
            "  {} (confidence {:.2}, auto-selected: {})",
            best.original_text, best.confidence, best.auto_selected
        );
    }
    println!();

    // Example 2: truncated input has two equally good answers
    println!("--- Example 2: Ambiguous input ---");
    let outcome = engine.search("E14 9W")?;
    match outcome.auto_selected() {
        Some(r) => println!("  Auto-selected {}", r.original_text()),
        None => {
            println!("  Please choose:");
            for r in outcome.results.iter().take(3) {
                println!("  - {} (confidence {:.2})", r.original_text(), r.confidence);
            }
        }
    }
    println!();

    // Example 3: one mistyped character
    println!("--- Example 3: Typo ---");
    for m in engine.top_matches("SW1A 1AB", 3)? {
        println!("  {} ({:.2})", m.original_text, m.confidence);
    }
    println!();

    // Example 4: format check and display form
    println!("--- Example 4: Format helpers ---");
    for raw in ["ec1a1bb", "E14 9W", "not a postcode"] {
        if is_valid_uk_format(raw) {
            let key = engine.normalizer().normalize(raw)?;
            println!("  {raw:?} -> {}", display_form(key.as_str()));
        } else {
            println!("  {raw:?} is not a UK postcode");
        }
    }
    println!();

    let stats = engine.stats();
    println!(
        "Searches: {}, cache hits: {}, cache misses: {}",
        stats.searches, stats.cache.hits, stats.cache.misses
    );

    Ok(())
}
