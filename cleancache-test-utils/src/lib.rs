//! cleancache Test Utilities
//!
//! Centralized test infrastructure for the cleancache workspace:
//! - A scripted in-memory connector with a call log and injectable failures
//! - Proptest generators for snapshots and enumerations
//! - Test fixtures for common scenarios
//! - A tracing subscriber for test output

pub use cleancache_connector::{
    CleanCache, ConnectorRegistry, ConsistencyCounters, DataSourceConnector, SnapshotCache,
};
pub use cleancache_core::{
    AttributeSnapshot, AttributeValue, CleanCacheError, CleanCacheResult, ConfigError,
    ConnectorError, PivotKey, PivotMap, PluginConfig, Record, RunMode, ServiceDescriptor,
    TaskDescriptor,
};

use async_trait::async_trait;
use std::collections::HashMap;

// ============================================================================
// TRACING
// ============================================================================

/// Install a fmt subscriber writing through the test harness.
///
/// Honors `RUST_LOG`; defaults to `cleancache_connector=debug`. Safe to call
/// from every test.
pub fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cleancache_connector=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

// ============================================================================
// SCRIPTED CONNECTOR
// ============================================================================

/// A call received by a [`ScriptedConnector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorCall {
    ListPivots,
    FetchRecord {
        pivot: PivotKey,
        from_same_service: bool,
    },
}

/// In-memory connector for tests.
///
/// The enumeration and the live records are scripted separately, so a test
/// can model entries that disappeared (or changed) after enumeration.
#[derive(Debug, Clone, Default)]
pub struct ScriptedConnector {
    name: String,
    pivots: PivotMap,
    live: HashMap<PivotKey, AttributeSnapshot>,
    list_error: Option<ConnectorError>,
    fetch_error: Option<ConnectorError>,
    calls: Vec<ConnectorCall>,
}

impl ScriptedConnector {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// An entry that is both enumerated and live.
    pub fn with_entry(mut self, pivot: impl Into<PivotKey>, snapshot: AttributeSnapshot) -> Self {
        let pivot = pivot.into();
        self.pivots.insert(pivot.clone(), snapshot.clone());
        self.live.insert(pivot, snapshot);
        self
    }

    /// An entry that is enumerated but no longer live.
    pub fn with_enumerated(
        mut self,
        pivot: impl Into<PivotKey>,
        snapshot: AttributeSnapshot,
    ) -> Self {
        self.pivots.insert(pivot.into(), snapshot);
        self
    }

    /// An entry that is live but was not enumerated.
    pub fn with_live(mut self, pivot: impl Into<PivotKey>, snapshot: AttributeSnapshot) -> Self {
        self.live.insert(pivot.into(), snapshot);
        self
    }

    /// Enumerate and serve every entry of the mapping.
    pub fn with_entries(self, pivots: &PivotMap) -> Self {
        pivots
            .iter()
            .fold(self, |connector, (pivot, snapshot)| {
                connector.with_entry(pivot.clone(), snapshot.clone())
            })
    }

    /// Remove an entry from the live source. Returns true if it was live.
    pub fn remove_live(&mut self, pivot: &PivotKey) -> bool {
        self.live.remove(pivot).is_some()
    }

    pub fn insert_live(&mut self, pivot: impl Into<PivotKey>, snapshot: AttributeSnapshot) {
        self.live.insert(pivot.into(), snapshot);
    }

    /// Make every following enumeration fail with `error`.
    pub fn fail_list(&mut self, error: ConnectorError) {
        self.list_error = Some(error);
    }

    /// Make every following fetch fail with `error`.
    pub fn fail_fetch(&mut self, error: ConnectorError) {
        self.fetch_error = Some(error);
    }

    pub fn clear_failures(&mut self) {
        self.list_error = None;
        self.fetch_error = None;
    }

    pub fn calls(&self) -> &[ConnectorCall] {
        &self.calls
    }

    pub fn list_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ConnectorCall::ListPivots))
            .count()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ConnectorCall::FetchRecord { .. }))
            .count()
    }

    /// The record this connector would return for a pivot, without logging a call.
    pub fn live_record(&self, pivot: &PivotKey) -> Option<Record> {
        self.live
            .get(pivot)
            .map(|snapshot| Record::new(pivot.clone(), snapshot.clone()))
    }
}

#[async_trait]
impl DataSourceConnector for ScriptedConnector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_pivots(&mut self) -> CleanCacheResult<PivotMap> {
        self.calls.push(ConnectorCall::ListPivots);
        if let Some(error) = &self.list_error {
            return Err(error.clone().into());
        }
        Ok(self.pivots.clone())
    }

    async fn fetch_record(
        &mut self,
        pivot: &PivotKey,
        _attributes: &AttributeSnapshot,
        from_same_service: bool,
    ) -> CleanCacheResult<Option<Record>> {
        self.calls.push(ConnectorCall::FetchRecord {
            pivot: pivot.clone(),
            from_same_service,
        });
        if let Some(error) = &self.fetch_error {
            return Err(error.clone().into());
        }
        Ok(self.live_record(pivot))
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for cleancache types.

    use super::*;
    use proptest::collection::{btree_map, vec};
    use proptest::prelude::*;

    /// Generate a pivot key.
    pub fn arb_pivot_key() -> impl Strategy<Value = PivotKey> {
        "[a-z]{1,8}".prop_map(PivotKey::from)
    }

    /// Generate an attribute value of any representation.
    pub fn arb_attribute_value() -> impl Strategy<Value = AttributeValue> {
        prop_oneof![
            "[a-z0-9]{0,6}".prop_map(AttributeValue::Text),
            any::<i64>().prop_map(AttributeValue::Integer),
            any::<bool>().prop_map(AttributeValue::Boolean),
            vec("[a-z]{0,4}", 0..3)
                .prop_map(|items| AttributeValue::List(
                    items.into_iter().map(AttributeValue::Text).collect()
                )),
        ]
    }

    /// Generate a non-empty attribute snapshot.
    pub fn arb_snapshot() -> impl Strategy<Value = AttributeSnapshot> {
        btree_map("[a-z]{1,5}", arb_attribute_value(), 1..4)
            .prop_map(|attributes| attributes.into_iter().collect::<AttributeSnapshot>())
    }

    /// Generate an enumeration with fewer than `max` entries.
    pub fn arb_pivot_map(max: usize) -> impl Strategy<Value = PivotMap> {
        btree_map(arb_pivot_key(), arb_snapshot(), 0..max)
    }

    /// Generate a non-empty enumeration with fewer than `max` entries.
    pub fn arb_non_empty_pivot_map(max: usize) -> impl Strategy<Value = PivotMap> {
        btree_map(arb_pivot_key(), arb_snapshot(), 1..max.max(2))
    }

    /// Generate a run mode.
    pub fn arb_run_mode() -> impl Strategy<Value = RunMode> {
        prop_oneof![Just(RunMode::DryRun), Just(RunMode::Apply)]
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built test fixtures for common testing scenarios.

    use super::*;
    use cleancache_core::config::tags;

    /// Connector tag under which [`scripted_registry`] registers its connector.
    pub const SCRIPTED: &str = "scripted";

    /// Snapshot of a directory entry identified by `uid`.
    pub fn person(uid: &str) -> AttributeSnapshot {
        AttributeSnapshot::new()
            .with("uid", uid)
            .with("cn", format!("Person {}", uid))
    }

    /// Connector enumerating and serving `a`, `b` and `c`.
    pub fn three_people() -> ScriptedConnector {
        ScriptedConnector::new("people")
            .with_entry("a", person("a"))
            .with_entry("b", person("b"))
            .with_entry("c", person("c"))
    }

    /// A host task whose source is the clean-cache plugin wrapping `connector`.
    pub fn plugin_task(dry_run: bool, connector: &str) -> TaskDescriptor {
        let settings = serde_json::json!({
            "dry_run": dry_run,
            "data_source": { "name": "people-source", "connector": connector }
        });
        TaskDescriptor::new("people")
            .with_id("people-task")
            .with_destination(ServiceDescriptor::new("directory", tags::LDAP))
            .with_source(ServiceDescriptor::new("clean-cache", tags::PLUGIN).with_settings(settings))
    }

    /// Registry building a clone of `connector` for the [`SCRIPTED`] tag.
    pub fn scripted_registry(connector: ScriptedConnector) -> ConnectorRegistry {
        let mut registry = ConnectorRegistry::new();
        registry.register(SCRIPTED, move |_task| {
            Ok(Box::new(connector.clone()) as Box<dyn DataSourceConnector>)
        });
        registry
    }
}

// ============================================================================
// TESTS
// ============================================================================
