//! Category pruner
//!
//! Filters each module's exposed inputs/outputs down to enabled categories.
//! Only ports are removed; the module itself, its commands and its
//! dependencies always survive.

use std::collections::BTreeSet;

use contracts::{Category, IdIndex, Port, ResolvedModule};
use tracing::{debug, instrument};

/// Return a pruned copy of the module set; the input is left untouched.
#[instrument(
    name = "prune_categories",
    skip_all,
    fields(modules = modules.len(), enabled = enabled.len())
)]
pub fn prune(
    modules: &IdIndex<ResolvedModule>,
    enabled: &BTreeSet<Category>,
) -> IdIndex<ResolvedModule> {
    let pruned = modules.map(|module| prune_module(module, enabled));

    let before: usize = modules.iter().map(port_count).sum();
    let after: usize = pruned.iter().map(port_count).sum();
    debug!(ports_before = before, ports_after = after, "categories pruned");

    pruned
}

/// Prune a single module
pub fn prune_module(module: &ResolvedModule, enabled: &BTreeSet<Category>) -> ResolvedModule {
    ResolvedModule {
        inputs: retain_enabled(&module.inputs, enabled),
        outputs: retain_enabled(&module.outputs, enabled),
        ..module.clone()
    }
}

fn retain_enabled(ports: &[Port], enabled: &BTreeSet<Category>) -> Vec<Port> {
    ports
        .iter()
        .filter(|port| enabled.contains(&port.category))
        .cloned()
        .collect()
}

fn port_count(module: &ResolvedModule) -> usize {
    module.inputs.len() + module.outputs.len()
}
