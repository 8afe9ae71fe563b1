//! Synthesizer
//!
//! Merges each module instance with its type. A type defines capability
//! (ports, commands, dependencies, class, headers); an instance defines
//! configuration (parameters). Neither side overrides the other.

use std::collections::BTreeMap;

use contracts::{
    ContractError, IdIndex, ModuleInstance, ModuleType, ParamValue, ResolvedModule,
};
use tracing::{debug, instrument, warn};

pub const RESOLVED_MODULE_KIND: &str = "module";

/// Resolve every instance against the type catalog, in instance order.
///
/// # Errors
/// - `UnknownType` if an instance names a type that is not in the catalog
/// - `MissingParameter` if a declared argument has no value and no default
#[instrument(
    name = "synthesize",
    skip_all,
    fields(types = types.len(), instances = instances.len())
)]
pub fn synthesize(
    types: &IdIndex<ModuleType>,
    instances: &IdIndex<ModuleInstance>,
) -> Result<IdIndex<ResolvedModule>, ContractError> {
    let mut resolved = IdIndex::default();
    for instance in instances {
        let module_type = types
            .get(&instance.type_id)
            .ok_or_else(|| ContractError::unknown_type(instance.id.as_str(), instance.type_id.as_str()))?;
        resolved.insert(RESOLVED_MODULE_KIND, resolve(instance, module_type)?)?;
    }
    debug!(modules = resolved.len(), "modules resolved");
    Ok(resolved)
}

/// Merge one instance with its type
pub fn resolve(
    instance: &ModuleInstance,
    module_type: &ModuleType,
) -> Result<ResolvedModule, ContractError> {
    let (arguments, parameters) = bind_arguments(instance, module_type)?;

    Ok(ResolvedModule {
        id: instance.id.clone(),
        type_id: module_type.id.clone(),
        class_name: module_type.class_name(),
        header_files: module_type.header_files.clone(),
        arguments,
        parameters,
        inputs: module_type.inputs.clone(),
        outputs: module_type.outputs.clone(),
        commands: module_type.commands.clone(),
        dependencies: module_type.dependencies.clone(),
    })
}

/// Compute constructor arguments and the effective parameter map.
///
/// Declared arguments are filled from the instance, falling back to the
/// type's default. Without declared arguments, the instance parameters are
/// passed in name order.
fn bind_arguments(
    instance: &ModuleInstance,
    module_type: &ModuleType,
) -> Result<(Vec<ParamValue>, BTreeMap<String, ParamValue>), ContractError> {
    if module_type.arguments.is_empty() {
        let arguments = instance.parameters.values().cloned().collect();
        return Ok((arguments, instance.parameters.clone()));
    }

    let mut parameters = instance.parameters.clone();
    let mut arguments = Vec::with_capacity(module_type.arguments.len());
    for spec in &module_type.arguments {
        let value = match (instance.parameters.get(&spec.name), &spec.default) {
            (Some(value), _) => value.clone(),
            (None, Some(default)) => {
                parameters.insert(spec.name.clone(), default.clone());
                default.clone()
            }
            (None, None) => {
                return Err(ContractError::MissingParameter {
                    instance_id: instance.id.to_string(),
                    parameter: spec.name.clone(),
                })
            }
        };
        arguments.push(value);
    }

    for name in instance.parameters.keys() {
        if !module_type.arguments.iter().any(|spec| &spec.name == name) {
            warn!(
                module = %instance.id,
                module_type = %module_type.id,
                parameter = %name,
                "parameter is not a declared argument and is not passed to the constructor"
            );
        }
    }

    Ok((arguments, parameters))
}
