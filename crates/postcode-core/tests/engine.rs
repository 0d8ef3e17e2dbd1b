//! Concurrency and lifecycle of the shared engine.

use postcode_core::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

/// `AA1 1AA`-shaped codes, enough to give the BK-tree some depth.
fn synthetic_codes(areas: &[&str], districts: u32) -> Vec<String> {
    let mut out = Vec::new();
    for area in areas {
        for district in 1..=districts {
            for unit in ["AA", "AB", "BA", "ZZ"] {
                out.push(format!("{area}{district} {}{unit}", district % 10));
            }
        }
    }
    out
}

fn pairs(codes: &[String]) -> impl Iterator<Item = (&str, &str)> {
    codes.iter().map(|c| (c.as_str(), c.as_str()))
}

#[test]
fn concurrent_readers_see_identical_results() {
    let codes = synthetic_codes(&["E", "SW", "M", "NW"], 20);
    let engine = Arc::new(PostcodeSearch::default());
    engine.initialize(pairs(&codes)).unwrap();

    let expected: Vec<Match> = engine.top_matches("SW7 7AC", 5).unwrap();
    assert!(!expected.is_empty());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                (0..200)
                    .map(|_| engine.top_matches("SW7 7AC", 5).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for got in handle.join().unwrap() {
            assert_eq!(got, expected);
        }
    }
    assert_eq!(engine.stats().searches, 1 + 8 * 200);
}

#[test]
fn rebuild_under_load_is_atomic() {
    let old_codes = synthetic_codes(&["E"], 30);
    let new_codes = synthetic_codes(&["W"], 30);

    let engine = Arc::new(PostcodeSearch::default());
    engine.initialize(pairs(&old_codes)).unwrap();
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let outcome = engine.search("E5 5AA").unwrap();
                    // Either the whole old index answers, or the whole new one.
                    let areas: Vec<char> = outcome
                        .results
                        .iter()
                        .map(|r| r.code().chars().next().unwrap_or('?'))
                        .collect();
                    assert!(
                        areas.iter().all(|&a| a == 'E') || areas.iter().all(|&a| a == 'W'),
                        "mixed result set {areas:?}"
                    );
                }
            })
        })
        .collect();

    engine.rebuild(pairs(&new_codes)).unwrap();
    stop.store(true, Ordering::Relaxed);
    for reader in readers {
        reader.join().unwrap();
    }

    let best = engine.best_match("W5 5AA").unwrap().unwrap();
    assert_eq!(best.original_text, "W5 5AA");
    assert_eq!(engine.stats().codes, new_codes.len());
}

#[test]
fn cache_does_not_change_answers() {
    let codes = synthetic_codes(&["E", "SW"], 15);
    let cached = PostcodeSearch::default();
    let uncached = PostcodeSearch::new(EngineConfig::default().without_cache());
    cached.initialize(pairs(&codes)).unwrap();
    uncached.initialize(pairs(&codes)).unwrap();

    for query in ["E1 1AA", "E11AA", "sw3 3ab", "E12 2Z", "SW9", "E9 9BB"] {
        let a = cached.search(query).unwrap();
        let b = cached.search(query).unwrap();
        let c = uncached.search(query).unwrap();
        assert!(b.from_cache, "{query}");
        assert!(!c.from_cache);
        assert_eq!(a.results, b.results, "{query}");
        assert_eq!(a.results, c.results, "{query}");
    }
    assert_eq!(uncached.stats().cache.entries, 0);
}

#[test]
fn global_engine_is_a_singleton() {
    let a = PostcodeSearch::global() as *const PostcodeSearch;
    let b = PostcodeSearch::global() as *const PostcodeSearch;
    assert_eq!(a, b);
}
