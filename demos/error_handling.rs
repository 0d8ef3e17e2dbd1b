//! Error handling example for postcode-rs
//!
//! Shows which failures are errors and which are ordinary "nothing found"
//! outcomes.

use postcode_core::prelude::*;

fn main() -> Result<()> {
    println!("=== postcode-rs Error Handling Example ===\n");

    let engine = PostcodeSearch::new(EngineConfig::default());

    // Example 1: querying before the index exists
    println!("--- Example 1: Engine not ready ---");
    match engine.search("E14 9WB") {
        Err(PostcodeError::NotReady) => println!("  ✓ NotReady before initialize()"),
        other => println!("  unexpected: {other:?}"),
    }
    println!();

    // Example 2: a dataset that cannot be indexed unambiguously
    println!("--- Example 2: Conflicting duplicates ---");
    match engine.initialize([("E14 9WB", "E14 9WB"), ("E149WB", "E14 9WB Canary Wharf")]) {
        Ok(_) => println!("  unexpected success"),
        Err(e) if e.is_fatal() => println!("  ✗ Fatal build error: {e}"),
        Err(e) => println!("  ✗ Build error: {e}"),
    }
    println!("  Ready afterwards: {}", engine.is_ready());
    println!();

    engine.initialize([("E14 9WB", "E14 9WB"), ("SW1A 1AA", "SW1A 1AA")])?;

    // Example 3: invalid input
    println!("--- Example 3: Invalid input ---");
    for raw in ["", "  -- ", "THIS IS FAR TOO LONG TO BE A POSTCODE"] {
        match engine.best_match(raw) {
            Err(PostcodeError::InvalidInput(msg)) => println!("  ✗ {msg}"),
            other => println!("  unexpected: {other:?}"),
        }
    }
    println!();

    // Example 4: nothing close enough is not an error
    println!("--- Example 4: No match ---");
    match engine.best_match("ZZ99 9ZZ")? {
        Some(best) => println!("  Found {}", best.original_text),
        None => println!("  No postcode close to ZZ99 9ZZ"),
    }
    println!();

    // Example 5: missing dataset file
    println!("--- Example 5: Missing dataset ---");
    match engine.initialize_from_path("does/not/exist.csv") {
        Err(PostcodeError::NotFound(msg)) => println!("  ✗ {msg}"),
        other => println!("  unexpected: {other:?}"),
    }
    println!("  Previous index still live: {}", engine.stats().codes);

    Ok(())
}
