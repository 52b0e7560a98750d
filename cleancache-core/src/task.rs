//! Synchronization task descriptors.
//!
//! A [`TaskDescriptor`] describes one synchronization task as handed over by
//! the host. The clean-cache plugin sits in the task's source slot, so the
//! connector it wraps needs a descriptor of its own: identical to the host
//! task except for the source service. [`DelegateTaskBuilder`] derives it.

use crate::*;
use serde::{Deserialize, Serialize};

/// Audit log attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLog {
    pub name: String,
    /// Operations to record (create, update, delete, ...). Empty means all.
    #[serde(default)]
    pub operations: Vec<String>,
}

/// Immutable description of a synchronization task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
    /// Bean implementation used by the host for records of this task.
    #[serde(default)]
    pub bean: Option<String>,
    #[serde(default)]
    pub clean_hook: Option<String>,
    #[serde(default)]
    pub sync_hook: Option<String>,
    #[serde(default)]
    pub destination: Option<ServiceDescriptor>,
    /// Host-specific synchronization options, passed through untouched.
    #[serde(default)]
    pub sync_options: serde_json::Value,
    #[serde(default)]
    pub custom_library: Vec<String>,
    #[serde(default)]
    pub script_include: Vec<String>,
    #[serde(default)]
    pub audit_logs: Vec<AuditLog>,
    #[serde(default)]
    pub source: Option<ServiceDescriptor>,
}

impl TaskDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            bean: None,
            clean_hook: None,
            sync_hook: None,
            destination: None,
            sync_options: serde_json::Value::Null,
            custom_library: Vec::new(),
            script_include: Vec::new(),
            audit_logs: Vec::new(),
            source: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_destination(mut self, destination: ServiceDescriptor) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn with_source(mut self, source: ServiceDescriptor) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_audit_log(mut self, log: AuditLog) -> Self {
        self.audit_logs.push(log);
        self
    }

    /// Parse a task descriptor from TOML.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|e| ConfigError::Parse {
            format: "toml".to_string(),
            reason: e.to_string(),
        })
    }
}

/// Source-specific fields replaced when deriving a delegate task.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOverride {
    pub source: ServiceDescriptor,
}

impl From<ServiceDescriptor> for SourceOverride {
    fn from(source: ServiceDescriptor) -> Self {
        Self { source }
    }
}

/// Builds the task descriptor handed to a wrapped connector.
///
/// Every field of the base task is carried over except the source service,
/// which comes from the [`SourceOverride`]. The base is never modified.
#[derive(Debug, Clone)]
pub struct DelegateTaskBuilder<'a> {
    base: &'a TaskDescriptor,
    source: Option<SourceOverride>,
}

impl<'a> DelegateTaskBuilder<'a> {
    pub fn new(base: &'a TaskDescriptor) -> Self {
        Self { base, source: None }
    }

    pub fn with_source(mut self, source: impl Into<SourceOverride>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn build(self) -> Result<TaskDescriptor, ConfigError> {
        let SourceOverride { source } = self.source.ok_or_else(|| ConfigError::MissingRequired {
            field: "source".to_string(),
        })?;

        // Exhaustive destructuring: a new task field will not compile until
        // it is listed here.
        let TaskDescriptor {
            name,
            id,
            bean,
            clean_hook,
            sync_hook,
            destination,
            sync_options,
            custom_library,
            script_include,
            audit_logs,
            source: _,
        } = self.base;

        Ok(TaskDescriptor {
            name: name.clone(),
            id: id.clone(),
            bean: bean.clone(),
            clean_hook: clean_hook.clone(),
            sync_hook: sync_hook.clone(),
            destination: destination.clone(),
            sync_options: sync_options.clone(),
            custom_library: custom_library.clone(),
            script_include: script_include.clone(),
            audit_logs: audit_logs.clone(),
            source: Some(source),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
