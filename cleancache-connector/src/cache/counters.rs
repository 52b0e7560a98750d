//! Per-run consistency counters.

use std::time::Duration;

use serde::Serialize;

/// Running totals for one task execution.
///
/// Zeroed at construction and never reset. Check timings and the
/// disagreement count only move during dry-run existence checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyCounters {
    population: Duration,
    cache_check: Duration,
    live_check: Duration,
    differences: u64,
}

impl ConsistencyCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall time spent copying the last enumeration into the cache.
    pub fn population_time(&self) -> Duration {
        self.population
    }

    /// Cumulative time spent in cache membership tests.
    pub fn cache_check_time(&self) -> Duration {
        self.cache_check
    }

    /// Cumulative time spent waiting on the wrapped connector.
    pub fn live_check_time(&self) -> Duration {
        self.live_check
    }

    /// Number of checks where cache and live source disagreed.
    pub fn differences(&self) -> u64 {
        self.differences
    }

    pub(crate) fn set_population_time(&mut self, elapsed: Duration) {
        self.population = elapsed;
    }

    pub(crate) fn record_cache_check(&mut self, elapsed: Duration) {
        self.cache_check = self.cache_check.saturating_add(elapsed);
    }

    pub(crate) fn record_live_check(&mut self, elapsed: Duration) {
        self.live_check = self.live_check.saturating_add(elapsed);
    }

    pub(crate) fn record_difference(&mut self) {
        self.differences += 1;
    }

    /// One-line aggregated status.
    pub fn summary(&self) -> String {
        format!(
            "difference count: {} - cache check time: {:?} - live check time: {:?}",
            self.differences, self.cache_check, self.live_check
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let counters = ConsistencyCounters::new();
        assert_eq!(counters.differences(), 0);
        assert_eq!(counters.cache_check_time(), Duration::ZERO);
        assert_eq!(counters.live_check_time(), Duration::ZERO);
        assert_eq!(counters.population_time(), Duration::ZERO);
    }

    #[test]
    fn test_counters_accumulate() {
        let mut counters = ConsistencyCounters::new();
        counters.record_cache_check(Duration::from_micros(5));
        counters.record_cache_check(Duration::from_micros(7));
        counters.record_live_check(Duration::from_millis(3));
        counters.record_difference();
        counters.record_difference();

        assert_eq!(counters.cache_check_time(), Duration::from_micros(12));
        assert_eq!(counters.live_check_time(), Duration::from_millis(3));
        assert_eq!(counters.differences(), 2);
    }

    #[test]
    fn test_population_time_is_overwritten() {
        let mut counters = ConsistencyCounters::new();
        counters.set_population_time(Duration::from_millis(10));
        counters.set_population_time(Duration::from_millis(4));
        assert_eq!(counters.population_time(), Duration::from_millis(4));
    }

    #[test]
    fn test_summary_format() {
        let mut counters = ConsistencyCounters::new();
        counters.record_difference();
        counters.record_live_check(Duration::from_millis(2));
        assert_eq!(
            counters.summary(),
            "difference count: 1 - cache check time: 0ns - live check time: 2ms"
        );
    }

    #[test]
    fn test_counters_serialize() {
        let mut counters = ConsistencyCounters::new();
        counters.record_difference();
        let json = serde_json::to_value(counters).unwrap();
        assert_eq!(json["differences"], 1);
        assert_eq!(json["cache_check"]["secs"], 0);
    }
}
