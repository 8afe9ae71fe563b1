//! `plugins` command implementation.

use anyhow::Result;
use plugins::PluginRegistry;

/// List every registered plugin with its description
pub fn run_plugins() -> Result<()> {
    let registry = PluginRegistry::with_builtins()?;
    println!("Registered plugins ({}):", registry.len());
    for plugin in registry.iter() {
        let description = plugin.description();
        if description.is_empty() {
            println!("  {}", plugin.name());
        } else {
            println!("  {:<10} {}", plugin.name(), description);
        }
    }
    Ok(())
}
