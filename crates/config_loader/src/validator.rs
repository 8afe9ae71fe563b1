//! Configuration validation
//!
//! Rules:
//! - sketch settings pass their field constraints (interval > 0, baud rate range)
//! - status interval is finite and fits a 32-bit millisecond counter
//! - plugin names are non-empty and not repeated
//! - instance IDs are usable as C identifiers and are not reserved in the sketch
//! - module types name ports, commands and classes with C identifiers
//!
//! ID uniqueness is enforced when the identity indexes are built.

use std::collections::HashSet;

use contracts::{
    is_c_identifier, is_cpp_keyword, is_reserved_identifier, ContractError, ModuleType,
    ProjectConfig,
};
use validator::Validate;

/// Longest status interval `millis()` can count on a 32-bit `unsigned long`
pub const MAX_STATUS_INTERVAL_SECS: f64 = u32::MAX as f64 / 1000.0;

/// Validate a parsed project configuration
///
/// Returns the first error encountered.
pub fn validate(config: &ProjectConfig) -> Result<(), ContractError> {
    validate_settings(config)?;
    validate_plugins(config)?;
    validate_instances(config)?;
    for ty in &config.module_types {
        validate_module_type(ty, &format!("firmware_module_type[id={}]", ty.id))?;
    }
    Ok(())
}

fn validate_settings(config: &ProjectConfig) -> Result<(), ContractError> {
    let sketch = &config.sketch;
    sketch
        .validate()
        .map_err(|e| ContractError::config_validation("sketch", e.to_string()))?;

    if !sketch.status_update_interval_secs.is_finite() {
        return Err(ContractError::config_validation(
            "sketch.status_update_interval_secs",
            format!(
                "interval must be a finite number of seconds, got {}",
                sketch.status_update_interval_secs
            ),
        ));
    }

    if sketch.status_update_interval_secs > MAX_STATUS_INTERVAL_SECS {
        return Err(ContractError::config_validation(
            "sketch.status_update_interval_secs",
            format!(
                "interval of {}s exceeds {MAX_STATUS_INTERVAL_SECS}s ({} milliseconds)",
                sketch.status_update_interval_secs,
                u32::MAX
            ),
        ));
    }

    for category in &sketch.categories {
        if category.as_str().trim().is_empty() {
            return Err(ContractError::config_validation(
                "sketch.categories",
                "category name cannot be empty",
            ));
        }
    }
    Ok(())
}

fn validate_plugins(config: &ProjectConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, name) in config.sketch.plugins.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("sketch.plugins[{idx}]"),
                "plugin name cannot be empty",
            ));
        }
        if !seen.insert(name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sketch.plugins[{idx}]"),
                format!("plugin '{name}' is listed more than once"),
            ));
        }
    }
    Ok(())
}

fn validate_instances(config: &ProjectConfig) -> Result<(), ContractError> {
    for module in &config.modules {
        if !module.id.is_c_identifier() {
            return Err(ContractError::config_validation(
                format!("firmware_module[id={}]", module.id),
                "module id must be a valid C identifier",
            ));
        }
        if is_reserved_identifier(&module.id) {
            return Err(ContractError::config_validation(
                format!("firmware_module[id={}]", module.id),
                format!("'{}' is reserved in the generated sketch", module.id),
            ));
        }
        for name in module.parameters.keys() {
            if name.is_empty() {
                return Err(ContractError::config_validation(
                    format!("firmware_module[id={}].parameters", module.id),
                    "parameter name cannot be empty",
                ));
            }
        }
    }
    Ok(())
}

/// Check the names a module type contributes to generated code.
///
/// Shared by configured types and manifests discovered on disk.
pub fn validate_module_type(ty: &ModuleType, field: &str) -> Result<(), ContractError> {
    if ty.id.is_empty() {
        return Err(ContractError::config_validation(
            field,
            "module type id cannot be empty",
        ));
    }

    let class_name = ty.class_name();
    if !is_c_identifier(&class_name) || is_reserved_identifier(&class_name) {
        return Err(ContractError::config_validation(
            format!("{field}.class_name"),
            format!("'{class_name}' is not a valid C++ class name or is reserved"),
        ));
    }

    for port in ty.inputs.iter().chain(&ty.outputs) {
        if !is_c_identifier(&port.name) {
            return Err(ContractError::config_validation(
                format!("{field}.ports[{}]", port.name),
                "port name must be a valid C identifier",
            ));
        }
    }

    for command in &ty.commands {
        if !is_c_identifier(command) || is_cpp_keyword(command) {
            return Err(ContractError::config_validation(
                format!("{field}.commands[{command}]"),
                "command name must be a valid C identifier and not a keyword",
            ));
        }
    }

    let mut arguments = HashSet::new();
    for arg in &ty.arguments {
        if !arguments.insert(arg.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("{field}.arguments[{}]", arg.name),
                "argument declared more than once",
            ));
        }
    }

    Ok(())
}
