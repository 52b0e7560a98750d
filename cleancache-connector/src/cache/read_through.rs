//! Read-through decorator for clean passes.
//!
//! Routes existence checks either to the snapshot cache, to the wrapped
//! connector, or to both, depending on the call direction, whether the cache
//! has been populated and the run mode.

use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use cleancache_core::{
    new_run_id, AttributeSnapshot, CleanCacheResult, PivotKey, PivotMap, Record, RunId, RunMode,
    Timestamp,
};

use super::counters::ConsistencyCounters;
use super::snapshot::SnapshotCache;
use crate::connector::DataSourceConnector;

/// Cache-backed connector decorator.
///
/// Owns the wrapped connector, the snapshot cache and the consistency
/// counters for the duration of one task execution.
///
/// # Example
///
/// ```ignore
/// let mut cache = CleanCache::new(ldap_connector, RunMode::DryRun);
///
/// // Enumerate once and keep the snapshots
/// let pivots = cache.list_pivots_and_populate().await?;
///
/// // Clean pass: answered from the cache, verified against the source
/// let still_there = cache.fetch_record(&pivot, &snapshot, false).await?;
/// ```
pub struct CleanCache<D> {
    delegate: D,
    run_mode: RunMode,
    run_id: RunId,
    cache: SnapshotCache,
    counters: ConsistencyCounters,
    populated_at: Option<Timestamp>,
}

impl<D: DataSourceConnector> CleanCache<D> {
    /// Wrap an already constructed connector.
    pub fn new(delegate: D, run_mode: RunMode) -> Self {
        let run_id = new_run_id();
        tracing::debug!(
            run_id = %run_id,
            connector = delegate.name(),
            run_mode = %run_mode,
            "Clean cache created"
        );
        Self {
            delegate,
            run_mode,
            run_id,
            cache: SnapshotCache::new(),
            counters: ConsistencyCounters::new(),
            populated_at: None,
        }
    }

    /// Get the run mode.
    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    /// Get the id attached to this run's log events.
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Get a reference to the wrapped connector.
    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    /// Get a mutable reference to the wrapped connector.
    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    /// Check if the cache has been populated.
    pub fn is_filled(&self) -> bool {
        self.cache.is_filled()
    }

    /// Get the number of cached snapshots, duplicates included.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Snapshot of the counters accumulated so far.
    pub fn counters(&self) -> ConsistencyCounters {
        self.counters
    }

    /// When the cache was last populated.
    pub fn populated_at(&self) -> Option<Timestamp> {
        self.populated_at
    }

    /// Copy the snapshots of an enumeration into the cache.
    ///
    /// Meant to be called once per run. A second call appends the same
    /// snapshots again. An absent or empty mapping is a no-op and leaves an
    /// unpopulated cache unpopulated.
    pub fn populate(&mut self, pivots: Option<&PivotMap>) {
        let pivots = match pivots {
            Some(pivots) if !pivots.is_empty() => pivots,
            _ => {
                tracing::debug!(run_id = %self.run_id, "Nothing to cache, population skipped");
                return;
            }
        };

        let start = Instant::now();
        let appended = self.cache.extend_from(pivots);
        let elapsed = start.elapsed();
        self.counters.set_population_time(elapsed);
        self.populated_at = Some(Utc::now());

        tracing::debug!(
            run_id = %self.run_id,
            appended,
            cache_len = self.cache.len(),
            "Cache populated"
        );
        if self.run_mode.is_dry_run() {
            tracing::info!(run_id = %self.run_id, elapsed = ?elapsed, "Cache population time");
        }
    }

    /// Enumerate through the wrapped connector and populate the cache with
    /// the result. The enumeration is returned unchanged.
    pub async fn list_pivots_and_populate(&mut self) -> CleanCacheResult<PivotMap> {
        let pivots = self.delegate.list_pivots().await?;
        self.populate(Some(&pivots));
        Ok(pivots)
    }

    /// Existence check for the clean direction with a populated cache.
    fn check_cached(&self, pivot: &PivotKey, attributes: &AttributeSnapshot) -> Option<Record> {
        if self.cache.contains(attributes) {
            tracing::debug!(run_id = %self.run_id, pivot = %pivot, "Cache: keep");
            Some(Record::placeholder())
        } else {
            tracing::debug!(run_id = %self.run_id, pivot = %pivot, "Cache: delete");
            None
        }
    }

    /// Dry-run existence check: consult both cache and connector, count
    /// disagreements, and return the connector's answer.
    async fn check_verified(
        &mut self,
        pivot: &PivotKey,
        attributes: &AttributeSnapshot,
    ) -> CleanCacheResult<Option<Record>> {
        tracing::info!(run_id = %self.run_id, pivot = %pivot, "Cache check");

        let start = Instant::now();
        let in_cache = self.cache.contains(attributes);
        self.counters.record_cache_check(start.elapsed());

        let start = Instant::now();
        let live = self.delegate.fetch_record(pivot, attributes, false).await?;
        self.counters.record_live_check(start.elapsed());

        if in_cache == live.is_some() {
            tracing::info!(run_id = %self.run_id, pivot = %pivot, "Cache and live result are consistent");
        } else {
            self.counters.record_difference();
            tracing::warn!(
                run_id = %self.run_id,
                pivot = %pivot,
                in_cache,
                live = live.is_some(),
                "Cache and live result differ"
            );
        }

        tracing::info!(
            run_id = %self.run_id,
            summary = %self.counters.summary(),
            "Aggregated cache status"
        );

        Ok(live)
    }
}

#[async_trait]
impl<D: DataSourceConnector> DataSourceConnector for CleanCache<D> {
    fn name(&self) -> &str {
        self.delegate.name()
    }

    /// Enumeration is passed through; it never touches the cache.
    async fn list_pivots(&mut self) -> CleanCacheResult<PivotMap> {
        self.delegate.list_pivots().await
    }

    async fn fetch_record(
        &mut self,
        pivot: &PivotKey,
        attributes: &AttributeSnapshot,
        from_same_service: bool,
    ) -> CleanCacheResult<Option<Record>> {
        if from_same_service {
            return self
                .delegate
                .fetch_record(pivot, attributes, from_same_service)
                .await;
        }

        tracing::debug!(
            run_id = %self.run_id,
            pivot = %pivot,
            attributes = %attributes,
            "Clean lookup"
        );

        if !self.cache.is_filled() {
            tracing::debug!(run_id = %self.run_id, "No cache populated, querying connector");
            return self
                .delegate
                .fetch_record(pivot, attributes, from_same_service)
                .await;
        }

        match self.run_mode {
            RunMode::Apply => Ok(self.check_cached(pivot, attributes)),
            RunMode::DryRun => self.check_verified(pivot, attributes).await,
        }
    }
}
