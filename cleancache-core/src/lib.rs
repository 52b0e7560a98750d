//! cleancache Core - Data Types
//!
//! Pure data structures shared by the connector crates: pivot keys,
//! attribute snapshots, records, run modes, errors and task configuration.
//! This crate performs no I/O.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

pub mod config;
pub mod error;
pub mod task;

pub use config::{PluginConfig, ServiceDescriptor};
pub use error::{CleanCacheError, CleanCacheResult, ConfigError, ConnectorError};
pub use task::{AuditLog, DelegateTaskBuilder, SourceOverride, TaskDescriptor};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Identifier of one decorator instance (one task execution).
/// UUIDv7 so that run ids sort by creation time in the logs.
pub type RunId = Uuid;

/// Generate a new UUIDv7 run id.
pub fn new_run_id() -> RunId {
    Uuid::now_v7()
}

/// Stable identifier of a record across source and destination systems.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PivotKey(String);

impl PivotKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PivotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PivotKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for PivotKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

/// A single attribute value as returned by a connector.
///
/// Equality is structural and representation-sensitive: `Text("1")` and
/// `Integer(1)` are different values, and list order matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    List(Vec<AttributeValue>),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<T: Into<AttributeValue>> From<Vec<T>> for AttributeValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Attribute name/value pairs captured for one record at a point in time.
///
/// The mapping is unordered from the caller's point of view: two snapshots
/// holding the same pairs are equal regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSnapshot(BTreeMap<String, AttributeValue>);

impl AttributeSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert an attribute, returning the previous value if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeValue)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeSnapshot
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for AttributeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={:?}", name, value)?;
        }
        f.write_str("}")
    }
}

/// Result of a full enumeration: every known pivot key with the attribute
/// snapshot captured for it. Iteration follows key order.
pub type PivotMap = BTreeMap<PivotKey, AttributeSnapshot>;

// ============================================================================
// RECORDS
// ============================================================================

/// A record fetched from a connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Pivot key of the record, absent for placeholder records.
    pub pivot: Option<PivotKey>,
    /// Full attribute set of the record.
    pub attributes: AttributeSnapshot,
}

impl Record {
    pub fn new(pivot: impl Into<PivotKey>, attributes: AttributeSnapshot) -> Self {
        Self {
            pivot: Some(pivot.into()),
            attributes,
        }
    }

    /// An empty record that only signals "this entry still exists".
    ///
    /// Returned by a cache hit during a clean pass; the host only checks
    /// presence, never the contents.
    pub fn placeholder() -> Self {
        Self {
            pivot: None,
            attributes: AttributeSnapshot::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.pivot.is_none() && self.attributes.is_empty()
    }
}

// ============================================================================
// RUN MODE
// ============================================================================

/// How the clean pass uses the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Consult both cache and delegate, report disagreements, return the
    /// delegate's answer.
    #[default]
    DryRun,
    /// Trust the cache alone once it has been populated.
    Apply,
}

impl RunMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            Self::DryRun
        } else {
            Self::Apply
        }
    }

    pub fn is_dry_run(&self) -> bool {
        matches!(self, Self::DryRun)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DryRun => f.write_str("dry_run"),
            Self::Apply => f.write_str("apply"),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
