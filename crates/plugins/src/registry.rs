//! Plugin registration table

use std::fmt;

use contracts::{ContractError, IdIndex, Identified, Plugin};
use tracing::debug;

use crate::builtin::{CsvPlugin, PubSubPlugin};

pub const PLUGIN_KIND: &str = "plugin";

struct Registration(Box<dyn Plugin>);

impl Identified for Registration {
    fn id(&self) -> &str {
        self.0.name()
    }
}

/// Name -> plugin table, built once at startup and passed by reference.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: IdIndex<Registration>,
}

impl PluginRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in `pubsub` and `csv` plugins
    pub fn with_builtins() -> Result<Self, ContractError> {
        let mut registry = Self::new();
        registry.register(PubSubPlugin)?;
        registry.register(CsvPlugin)?;
        Ok(registry)
    }

    /// Register a plugin under its own name.
    ///
    /// # Errors
    /// `DuplicateId` if a plugin with the same name is already registered
    pub fn register(&mut self, plugin: impl Plugin + 'static) -> Result<(), ContractError> {
        self.register_boxed(Box::new(plugin))
    }

    pub fn register_boxed(&mut self, plugin: Box<dyn Plugin>) -> Result<(), ContractError> {
        if plugin.name().is_empty() {
            return Err(ContractError::config_validation(
                "plugin",
                "plugin name must not be empty",
            ));
        }
        debug!(plugin = plugin.name(), "plugin registered");
        self.plugins.insert(PLUGIN_KIND, Registration(plugin))
    }

    pub fn get(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins.get(name).map(|r| r.0.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.contains(name)
    }

    /// Registered plugins in registration order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Plugin> {
        self.plugins.iter().map(|r| r.0.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|p| p.name())
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
