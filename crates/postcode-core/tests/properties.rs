use postcode_core::distance::levenshtein;
use postcode_core::{build_index_from_codes, EngineConfig, Normalizer, PostcodeSearch};
use proptest::prelude::*;
use std::collections::BTreeSet;

const CODE: &str = "[A-Z]{1,2}[0-9]{1,2} [0-9][A-Z]{2}";

fn dataset() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(CODE, 1..80).prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn normalization_is_idempotent(raw in ".{0,40}") {
        let n = Normalizer::default();
        if let Ok(once) = n.normalize(&raw) {
            let twice = n.normalize(once.as_str()).unwrap();
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn bk_search_matches_linear_scan(codes in dataset(), query in "[A-Z0-9]{1,8}", radius in 0usize..4) {
        let index = build_index_from_codes(&codes).unwrap();
        let query = Normalizer::default().normalize(&query).unwrap();

        let found: BTreeSet<(String, usize)> = index
            .bk_tree()
            .search(&query, radius)
            .into_iter()
            .map(|m| (m.code.to_string(), m.distance))
            .collect();
        let expected: BTreeSet<(String, usize)> = index
            .bk_tree()
            .codes()
            .map(|c| (c.to_string(), levenshtein(c.as_str(), query.as_str())))
            .filter(|&(_, d)| d <= radius)
            .collect();

        prop_assert_eq!(found, expected);
    }

    #[test]
    fn wider_radius_never_finds_less(codes in dataset(), query in "[A-Z0-9]{1,8}", r1 in 0usize..3) {
        let index = build_index_from_codes(&codes).unwrap();
        let query = Normalizer::default().normalize(&query).unwrap();
        let narrow = index.bk_tree().search(&query, r1).len();
        let wide = index.bk_tree().search(&query, r1 + 1).len();
        prop_assert!(narrow <= wide, "{} > {}", narrow, wide);
    }

    #[test]
    fn bk_invariant_holds_after_build(codes in dataset()) {
        let index = build_index_from_codes(&codes).unwrap();
        prop_assert!(index.bk_tree().check_invariant());
        prop_assert!(index.is_consistent());
    }

    #[test]
    fn insertion_order_does_not_change_results(
        (codes, shuffled) in dataset().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
        queries in prop::collection::vec("[A-Z0-9]{2,8}", 1..8),
    ) {
        let a = PostcodeSearch::new(EngineConfig::default().without_cache());
        let b = PostcodeSearch::new(EngineConfig::default().without_cache());
        a.initialize(codes.iter().map(|c| (c.as_str(), c.as_str()))).unwrap();
        b.initialize(shuffled.iter().map(|c| (c.as_str(), c.as_str()))).unwrap();

        prop_assert!(a.index().unwrap().bk_tree().check_invariant());
        prop_assert!(b.index().unwrap().bk_tree().check_invariant());

        for query in queries.iter().chain(codes.iter()) {
            let left = a.search(query).unwrap();
            let right = b.search(query).unwrap();
            prop_assert_eq!(&left.results[..], &right.results[..], "query {}", query);
        }
    }

    #[test]
    fn every_indexed_code_finds_itself(codes in dataset()) {
        let engine = PostcodeSearch::default();
        engine.initialize(codes.iter().map(|c| (c.as_str(), c.as_str()))).unwrap();

        for code in &codes {
            let outcome = engine.search(code).unwrap();
            let top = &outcome.results[0];
            prop_assert_eq!(top.original_text(), code.as_str());
            prop_assert_eq!(top.edit_distance(), 0);
            prop_assert!(top.auto_selected);
        }
    }

    #[test]
    fn results_are_ranked(codes in dataset(), query in "[A-Z0-9]{2,8}") {
        let engine = PostcodeSearch::default();
        engine.initialize(codes.iter().map(|c| (c.as_str(), c.as_str()))).unwrap();

        let outcome = engine.search(&query).unwrap();
        for pair in outcome.results.windows(2) {
            prop_assert!(pair[0].candidate.rank_cmp(&pair[1].candidate).is_lt());
        }
        prop_assert!(outcome.results.iter().skip(1).all(|r| !r.auto_selected));
    }

    #[test]
    fn cache_is_transparent(codes in dataset(), queries in prop::collection::vec("[A-Z0-9]{2,8}", 1..10)) {
        let cached = PostcodeSearch::default();
        let uncached = PostcodeSearch::new(EngineConfig::default().without_cache());
        cached.initialize(codes.iter().map(|c| (c.as_str(), c.as_str()))).unwrap();
        uncached.initialize(codes.iter().map(|c| (c.as_str(), c.as_str()))).unwrap();

        // Every query twice, so the second round is served from the cache.
        for query in queries.iter().chain(queries.iter()) {
            let a = cached.search(query).unwrap();
            let b = uncached.search(query).unwrap();
            prop_assert_eq!(&a.results[..], &b.results[..]);
        }
    }
}
