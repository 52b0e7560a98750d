//! Connector registry.
//!
//! Maps a connector type tag (the `connector` field of a
//! [`ServiceDescriptor`](cleancache_core::ServiceDescriptor)) to a factory
//! that builds the connector from its task descriptor.

use std::collections::HashMap;
use std::fmt;

use cleancache_core::{ConfigError, TaskDescriptor};

use crate::connector::DataSourceConnector;

/// Factory building a connector from the task descriptor it will serve.
pub type ConnectorFactory = Box<
    dyn Fn(&TaskDescriptor) -> Result<Box<dyn DataSourceConnector>, ConfigError> + Send + Sync,
>;

/// Registry of connector factories keyed by type tag.
///
/// # Example
/// ```ignore
/// let mut registry = ConnectorRegistry::new();
/// registry.register("database", |task| Ok(Box::new(DatabaseConnector::from_task(task)?)));
///
/// let connector = registry.build(&task)?;
/// ```
pub struct ConnectorRegistry {
    factories: HashMap<String, ConnectorFactory>,
}

impl ConnectorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory for a tag.
    /// Replaces any previously registered factory for the same tag.
    pub fn register<F>(&mut self, tag: impl Into<String>, factory: F)
    where
        F: Fn(&TaskDescriptor) -> Result<Box<dyn DataSourceConnector>, ConfigError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(tag.into(), Box::new(factory));
    }

    /// Remove the factory for a tag. Returns true if one was registered.
    pub fn unregister(&mut self, tag: &str) -> bool {
        self.factories.remove(tag).is_some()
    }

    /// Check if a factory is registered for a tag.
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Build the connector for a task's source service.
    ///
    /// # Returns
    /// * `Err(ConfigError::MissingRequired)` - The task has no source service
    /// * `Err(ConfigError::UnknownConnector)` - No factory for the source's tag
    /// * Any error returned by the factory itself
    pub fn build(&self, task: &TaskDescriptor) -> Result<Box<dyn DataSourceConnector>, ConfigError> {
        let source = task
            .source
            .as_ref()
            .ok_or_else(|| ConfigError::MissingRequired {
                field: "source".to_string(),
            })?;

        let factory =
            self.factories
                .get(&source.connector)
                .ok_or_else(|| ConfigError::UnknownConnector {
                    connector: source.connector.clone(),
                })?;

        factory(task)
    }
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

// ============================================================================
// UNIT TESTS
// ============================================================================
