//! Property-based tests for the clean-pass read-through cache.

use cleancache_test_utils::generators::*;
use cleancache_test_utils::{
    AttributeSnapshot, CleanCache, ConsistencyCounters, DataSourceConnector, PivotKey, PivotMap,
    RunMode, ScriptedConnector,
};
use proptest::prelude::*;
use std::time::Duration;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("build runtime")
        .block_on(future)
}

/// A lookup presents either the snapshot of an enumerated entry or a fresh one.
fn arb_lookup() -> impl Strategy<Value = (PivotMap, PivotKey, AttributeSnapshot)> {
    (arb_non_empty_pivot_map(8), arb_pivot_key(), arb_snapshot(), any::<prop::sample::Index>())
        .prop_map(|(pivots, key, fresh, index)| {
            if index.index(2) == 0 {
                let (k, v) = pivots
                    .iter()
                    .nth(index.index(pivots.len()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .expect("non-empty map");
                (pivots, k, v)
            } else {
                (pivots, key, fresh)
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: in Apply mode a populated cache keeps an entry if and only
    /// if its snapshot equals one captured during population.
    #[test]
    fn prop_apply_keeps_iff_snapshot_cached((pivots, key, presented) in arb_lookup()) {
        let expected = pivots.values().any(|s| s == &presented);
        let connector = ScriptedConnector::new("src").with_entries(&pivots);
        let mut cache = CleanCache::new(connector, RunMode::Apply);
        cache.populate(Some(&pivots));

        let result = block_on(cache.fetch_record(&key, &presented, false)).expect("apply never fails");

        prop_assert_eq!(result.is_some(), expected);
        if let Some(record) = result {
            prop_assert!(record.is_placeholder());
        }
        prop_assert_eq!(cache.delegate().fetch_count(), 0);

        let counters = cache.counters();
        prop_assert_eq!(counters.cache_check_time(), Duration::ZERO);
        prop_assert_eq!(counters.live_check_time(), Duration::ZERO);
        prop_assert_eq!(counters.differences(), 0);
    }

    /// Property: same-service calls return exactly what the connector
    /// returns and leave cache and counters untouched.
    #[test]
    fn prop_same_service_is_passthrough(
        (pivots, key, presented) in arb_lookup(),
        run_mode in arb_run_mode(),
        populated in any::<bool>(),
    ) {
        let connector = ScriptedConnector::new("src").with_entries(&pivots);
        let expected = connector.live_record(&key);
        let mut cache = CleanCache::new(connector, run_mode);
        if populated {
            cache.populate(Some(&pivots));
        }
        let len_before = cache.cache_len();
        let counters_before = cache.counters();

        let result = block_on(cache.fetch_record(&key, &presented, true)).expect("scripted fetch");

        prop_assert_eq!(result, expected);
        prop_assert_eq!(cache.cache_len(), len_before);
        prop_assert_eq!(cache.counters(), counters_before);
        prop_assert_eq!(cache.delegate().fetch_count(), 1);
    }

    /// Property: without population the clean direction always asks the
    /// connector, whatever the run mode.
    #[test]
    fn prop_cold_cache_delegates(
        (pivots, key, presented) in arb_lookup(),
        run_mode in arb_run_mode(),
    ) {
        let connector = ScriptedConnector::new("src").with_entries(&pivots);
        let expected = connector.live_record(&key);
        let mut cache = CleanCache::new(connector, run_mode);

        let result = block_on(cache.fetch_record(&key, &presented, false)).expect("scripted fetch");

        prop_assert_eq!(result, expected);
        prop_assert_eq!(cache.delegate().fetch_count(), 1);
        prop_assert_eq!(cache.counters(), ConsistencyCounters::new());
    }

    /// Property: in DryRun mode the live answer always wins, and the
    /// disagreement counter moves by one exactly when cache and live differ.
    #[test]
    fn prop_dry_run_returns_live_and_counts_disagreements(
        pivots in arb_non_empty_pivot_map(8),
        removals in prop::collection::vec(any::<prop::sample::Index>(), 0..4),
        extra in prop::collection::vec((arb_pivot_key(), arb_snapshot()), 0..4),
    ) {
        let mut connector = ScriptedConnector::new("src").with_entries(&pivots);
        let keys: Vec<PivotKey> = pivots.keys().cloned().collect();
        for index in &removals {
            connector.remove_live(&keys[index.index(keys.len())]);
        }

        let mut cache = CleanCache::new(connector, RunMode::DryRun);
        cache.populate(Some(&pivots));

        let checks: Vec<(PivotKey, AttributeSnapshot)> = pivots
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .chain(extra)
            .collect();

        let mut previous = cache.counters();
        for (key, snapshot) in &checks {
            let expected = cache.delegate().live_record(key);
            let in_cache = pivots.values().any(|s| s == snapshot);

            let result = block_on(cache.fetch_record(key, snapshot, false)).expect("scripted fetch");
            let counters = cache.counters();

            let step = if in_cache == expected.is_some() { 0 } else { 1 };
            prop_assert_eq!(counters.differences(), previous.differences() + step);
            prop_assert!(counters.cache_check_time() >= previous.cache_check_time());
            prop_assert!(counters.live_check_time() >= previous.live_check_time());
            prop_assert_eq!(result, expected);
            previous = counters;
        }
        prop_assert_eq!(cache.delegate().fetch_count(), checks.len());
    }

    /// Property: each population appends every snapshot again.
    #[test]
    fn prop_repeated_population_appends(pivots in arb_pivot_map(8), times in 1usize..4) {
        let mut cache = CleanCache::new(ScriptedConnector::new("src"), RunMode::Apply);
        for _ in 0..times {
            cache.populate(Some(&pivots));
        }
        prop_assert_eq!(cache.cache_len(), pivots.len() * times);
        prop_assert_eq!(cache.is_filled(), !pivots.is_empty());
    }

    /// Property: enumeration through the decorator is the connector's
    /// enumeration and never fills the cache.
    #[test]
    fn prop_list_pivots_is_passthrough(pivots in arb_pivot_map(8), run_mode in arb_run_mode()) {
        let connector = ScriptedConnector::new("src").with_entries(&pivots);
        let mut cache = CleanCache::new(connector, run_mode);

        let listed = block_on(cache.list_pivots()).expect("scripted list");

        prop_assert_eq!(listed, pivots);
        prop_assert!(!cache.is_filled());
        prop_assert_eq!(cache.cache_len(), 0);
    }
}
