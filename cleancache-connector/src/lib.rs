//! cleancache Connector - Read-Through Cache for Clean Passes
//!
//! Wraps a data-source connector with an in-memory snapshot cache. The
//! synchronization direction always goes straight to the wrapped connector;
//! the clean direction answers "does this entry still exist?" from the
//! snapshots captured at enumeration time, optionally cross-checked against
//! the live source.

pub mod cache;
pub mod connector;
pub mod plugin;
pub mod registry;

pub use cache::{CleanCache, ConsistencyCounters, SnapshotCache};
pub use connector::DataSourceConnector;
pub use registry::{ConnectorFactory, ConnectorRegistry};

// Re-export core types so hosts only need this crate.
pub use cleancache_core::{
    AttributeSnapshot, AttributeValue, CleanCacheError, CleanCacheResult, ConfigError,
    ConnectorError, PivotKey, PivotMap, PluginConfig, Record, RunMode, ServiceDescriptor,
    TaskDescriptor,
};
