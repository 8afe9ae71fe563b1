//! Plugin runner

use std::time::{Duration, Instant};

use contracts::{ContractError, Fragment, Plugin, ResolvedModule};
use tracing::{debug, info, instrument};

use crate::registry::PluginRegistry;

/// Invokes the selected plugins against the pruned module set.
#[derive(Debug, Clone, Copy)]
pub struct PluginRunner<'a> {
    registry: &'a PluginRegistry,
}

impl<'a> PluginRunner<'a> {
    pub fn new(registry: &'a PluginRegistry) -> Self {
        Self { registry }
    }

    /// Look every name up before anything runs.
    ///
    /// # Errors
    /// - `UnknownPlugin` for the first name with no registration
    /// - `ConfigValidation` when two selected plugins both use `Serial`
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&'a dyn Plugin>, ContractError> {
        let plugins = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.registry
                    .get(name)
                    .ok_or_else(|| ContractError::unknown_plugin(name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut serial = plugins.iter().filter(|p| p.uses_serial()).map(|p| p.name());
        if let (Some(first), Some(second)) = (serial.next(), serial.next()) {
            return Err(ContractError::config_validation(
                "sketch.plugins",
                format!("plugins '{first}' and '{second}' both use the Serial port"),
            ));
        }
        Ok(plugins)
    }

    /// Run each named plugin once, in the order given, over the full module
    /// slice. Fragments are returned in the same order.
    pub fn run<S: AsRef<str>>(
        &self,
        names: &[S],
        modules: &[ResolvedModule],
    ) -> Result<Vec<Fragment>, ContractError> {
        self.run_with(names, modules, |_, _| {})
    }

    /// Like [`run`](Self::run), reporting each plugin's render time to
    /// `on_rendered`.
    #[instrument(
        name = "plugins_run",
        skip_all,
        fields(plugins = names.len(), modules = modules.len())
    )]
    pub fn run_with<S, F>(
        &self,
        names: &[S],
        modules: &[ResolvedModule],
        mut on_rendered: F,
    ) -> Result<Vec<Fragment>, ContractError>
    where
        S: AsRef<str>,
        F: FnMut(&str, Duration),
    {
        let plugins = self.resolve(names)?;

        let mut fragments = Vec::with_capacity(plugins.len());
        for plugin in plugins {
            let started = Instant::now();
            let mut fragment = plugin.render(modules)?;
            if fragment.plugin.is_empty() {
                fragment.plugin = plugin.name().to_string();
            }
            let elapsed = started.elapsed();
            debug!(
                plugin = plugin.name(),
                blocks = fragment.blocks.len(),
                elapsed_us = elapsed.as_micros() as u64,
                "plugin rendered"
            );
            on_rendered(plugin.name(), elapsed);
            fragments.push(fragment);
        }

        info!(fragments = fragments.len(), "plugins finished");
        Ok(fragments)
    }
}
