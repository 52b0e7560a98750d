//! Ordered store of attribute snapshots.

use cleancache_core::{AttributeSnapshot, PivotMap};

/// Snapshots captured during enumeration, in encounter order.
///
/// Lookups match on content: a snapshot is a member if it is structurally
/// equal to one of the stored snapshots. Pivot keys are not retained.
#[derive(Debug, Clone, Default)]
pub struct SnapshotCache {
    entries: Vec<AttributeSnapshot>,
    filled: bool,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every snapshot of the mapping, discarding the keys.
    ///
    /// Appends even if the same snapshots were added before. Returns the
    /// number of snapshots appended. The cache counts as filled once at
    /// least one snapshot has been appended.
    pub fn extend_from(&mut self, pivots: &PivotMap) -> usize {
        self.entries.extend(pivots.values().cloned());
        if !pivots.is_empty() {
            self.filled = true;
        }
        pivots.len()
    }

    /// Linear scan for a structurally equal snapshot.
    pub fn contains(&self, snapshot: &AttributeSnapshot) -> bool {
        self.entries.iter().any(|entry| entry == snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeSnapshot> {
        self.entries.iter()
    }
}
