//! Type and instance catalogs
//!
//! Discovered and configured module types share one namespace: both
//! sequences are concatenated and indexed once, so a configured type can
//! never shadow a discovered one silently.

use contracts::{ContractError, IdIndex, ModuleInstance, ModuleType};
use tracing::{debug, instrument};

pub const MODULE_TYPE_KIND: &str = "module type";
pub const MODULE_INSTANCE_KIND: &str = "module instance";

/// Index discovered manifests followed by configured types.
#[instrument(
    name = "catalog_build_types",
    skip_all,
    fields(discovered = discovered.len(), configured = configured.len())
)]
pub fn build_type_index(
    discovered: Vec<ModuleType>,
    configured: Vec<ModuleType>,
) -> Result<IdIndex<ModuleType>, ContractError> {
    let index = IdIndex::build(MODULE_TYPE_KIND, discovered.into_iter().chain(configured))?;
    debug!(types = index.len(), "type catalog built");
    Ok(index)
}

/// Index module instances in declaration order.
pub fn build_instance_index(
    instances: Vec<ModuleInstance>,
) -> Result<IdIndex<ModuleInstance>, ContractError> {
    IdIndex::build(MODULE_INSTANCE_KIND, instances)
}
