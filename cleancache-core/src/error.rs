//! Error types for cleancache operations

use thiserror::Error;

/// Configuration errors.
///
/// Raised while resolving the plugin configuration or constructing the
/// delegate connector. These are fatal for the task and never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Task {task} has no cleancache configuration in its plugin source")]
    PluginConfigNotFound { task: String },

    #[error("Task {task} does not use a plugin source service")]
    NotAPluginSource { task: String },

    #[error("No connector registered for tag: {connector}")]
    UnknownConnector { connector: String },

    #[error("Failed to construct connector {connector}: {reason}")]
    ConnectorConstruction { connector: String, reason: String },

    #[error("Failed to parse {format} configuration: {reason}")]
    Parse { format: String, reason: String },
}

/// Errors reported by a data-source connector.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectorError {
    #[error("Connector {connector} unavailable: {reason}")]
    Unavailable { connector: String, reason: String },

    #[error("Query on {connector} failed for pivot {pivot}: {reason}")]
    QueryFailed {
        connector: String,
        pivot: String,
        reason: String,
    },

    #[error("Invalid response from {connector}: {reason}")]
    InvalidResponse { connector: String, reason: String },
}

/// Master error type for all cleancache errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CleanCacheError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),
}

impl CleanCacheError {
    /// Returns true if this error came from the wrapped connector.
    pub fn is_connector(&self) -> bool {
        matches!(self, Self::Connector(_))
    }
}

/// Result type alias for cleancache operations.
pub type CleanCacheResult<T> = Result<T, CleanCacheError>;

// =============================================================================
// TESTS
// =============================================================================
