//! Snapshot cache for the clean pass.
//!
//! This module provides:
//! - `SnapshotCache`: ordered, content-matched store of attribute snapshots
//! - `ConsistencyCounters`: per-run timings and cache/live disagreement count
//! - `CleanCache`: the read-through decorator around a data-source connector

mod counters;
mod read_through;
mod snapshot;

pub use counters::ConsistencyCounters;
pub use read_through::CleanCache;
pub use snapshot::SnapshotCache;
