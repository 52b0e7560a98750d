//! Data-source connector trait.
//!
//! This is both the contract the clean cache consumes from the connector it
//! wraps and the contract it exposes to the host, so a `CleanCache` can be
//! dropped in wherever the host expects a connector.

use async_trait::async_trait;
use cleancache_core::{AttributeSnapshot, CleanCacheResult, PivotKey, PivotMap, Record};

/// A source of records for a synchronization task.
///
/// Methods take `&mut self`: a connector instance belongs to one task and
/// the host drives it from a single logical thread of control.
#[async_trait]
pub trait DataSourceConnector: Send {
    /// Human-readable connector name, used in log events.
    fn name(&self) -> &str;

    /// Enumerate every known pivot key with its attribute snapshot.
    async fn list_pivots(&mut self) -> CleanCacheResult<PivotMap>;

    /// Fetch the full record for a pivot key.
    ///
    /// `from_same_service` is true when the call comes from the
    /// synchronization direction and false during a clean pass.
    ///
    /// # Returns
    /// * `Ok(Some(record))` - The record exists
    /// * `Ok(None)` - The record is absent from the source
    /// * `Err(CleanCacheError::Connector)` - The source could not be queried
    async fn fetch_record(
        &mut self,
        pivot: &PivotKey,
        attributes: &AttributeSnapshot,
        from_same_service: bool,
    ) -> CleanCacheResult<Option<Record>>;
}

#[async_trait]
impl<T: DataSourceConnector + ?Sized> DataSourceConnector for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn list_pivots(&mut self) -> CleanCacheResult<PivotMap> {
        (**self).list_pivots().await
    }

    async fn fetch_record(
        &mut self,
        pivot: &PivotKey,
        attributes: &AttributeSnapshot,
        from_same_service: bool,
    ) -> CleanCacheResult<Option<Record>> {
        (**self)
            .fetch_record(pivot, attributes, from_same_service)
            .await
    }
}
