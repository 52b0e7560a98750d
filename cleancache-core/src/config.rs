//! Configuration types

use crate::*;
use serde::{Deserialize, Serialize};

/// Well-known connector tags. Plugins may register any other tag.
pub mod tags {
    pub const LDAP: &str = "ldap";
    pub const ASYNC_LDAP: &str = "async_ldap";
    pub const GOOGLE_APPS: &str = "google_apps";
    pub const DATABASE: &str = "database";
    pub const PLUGIN: &str = "plugin";
}

/// Description of a source service: which connector to build and its own
/// settings, left opaque to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Service name as it appears in the task configuration.
    pub name: String,
    /// Connector type tag resolved by the connector registry.
    pub connector: String,
    /// Connector-specific settings.
    #[serde(default)]
    pub settings: serde_json::Value,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, connector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connector: connector.into(),
            settings: serde_json::Value::Null,
        }
    }

    pub fn with_settings(mut self, settings: serde_json::Value) -> Self {
        self.settings = settings;
        self
    }

    /// Returns true if this descriptor points at a plugin service.
    pub fn is_plugin(&self) -> bool {
        self.connector == tags::PLUGIN
    }
}

fn default_dry_run() -> bool {
    true
}

/// Settings of the clean-cache plugin itself.
///
/// ```toml
/// dry_run = false
///
/// [data_source]
/// name = "people-db"
/// connector = "database"
///
/// [data_source.settings]
/// request_name_for_list = "getPeople"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Verify the cache against the live source instead of trusting it.
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
    /// The connector wrapped by the cache.
    pub data_source: ServiceDescriptor,
}

impl PluginConfig {
    pub fn new(dry_run: bool, data_source: ServiceDescriptor) -> Self {
        Self {
            dry_run,
            data_source,
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|e| ConfigError::Parse {
            format: "toml".to_string(),
            reason: e.to_string(),
        })
    }

    /// Parse the plugin settings block of a task descriptor.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        serde_json::from_value(value.clone()).map_err(|e| ConfigError::Parse {
            format: "json".to_string(),
            reason: e.to_string(),
        })
    }

    /// The run mode selected by `dry_run`.
    pub fn run_mode(&self) -> RunMode {
        RunMode::from_dry_run(self.dry_run)
    }

    /// Validate the configuration.
    ///
    /// Validates:
    /// - data_source.name is not blank
    /// - data_source.connector is not blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_source.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "data_source.name".to_string(),
                value: self.data_source.name.clone(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.data_source.connector.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "data_source.connector".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
