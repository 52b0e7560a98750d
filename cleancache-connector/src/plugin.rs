//! Plugin bootstrap.
//!
//! Builds a [`CleanCache`] from the task descriptor the host hands to a
//! plugin source service: read the plugin settings, derive the task
//! descriptor of the wrapped connector, and build that connector through the
//! registry.

use cleancache_core::{ConfigError, DelegateTaskBuilder, PluginConfig, TaskDescriptor};

use crate::cache::CleanCache;
use crate::connector::DataSourceConnector;
use crate::registry::ConnectorRegistry;

impl CleanCache<Box<dyn DataSourceConnector>> {
    /// Construct the decorator for a task whose source is this plugin.
    ///
    /// # Returns
    /// * `Err(ConfigError::NotAPluginSource)` - The task source is not a plugin service
    /// * `Err(ConfigError::PluginConfigNotFound)` - The plugin settings carry no data source
    /// * Any parse, validation or registry error for the wrapped connector
    pub fn from_task(
        task: &TaskDescriptor,
        registry: &ConnectorRegistry,
    ) -> Result<Self, ConfigError> {
        Self::bootstrap(task, registry).map_err(|e| {
            tracing::error!(task = %task.name, error = %e, "Clean cache initialisation failed");
            e
        })
    }

    fn bootstrap(task: &TaskDescriptor, registry: &ConnectorRegistry) -> Result<Self, ConfigError> {
        let source = task
            .source
            .as_ref()
            .filter(|source| source.is_plugin())
            .ok_or_else(|| ConfigError::NotAPluginSource {
                task: task.name.clone(),
            })?;

        if source.settings.get("data_source").is_none() {
            return Err(ConfigError::PluginConfigNotFound {
                task: task.name.clone(),
            });
        }

        let config = PluginConfig::from_json_value(&source.settings)?;
        config.validate()?;
        tracing::debug!(
            task = %task.name,
            plugin = %source.name,
            data_source = %config.data_source.name,
            connector = %config.data_source.connector,
            dry_run = config.dry_run,
            "Read clean cache configuration"
        );

        let delegate_task = DelegateTaskBuilder::new(task)
            .with_source(config.data_source.clone())
            .build()?;
        let delegate = registry.build(&delegate_task)?;

        Ok(CleanCache::new(delegate, config.run_mode()))
    }
}
