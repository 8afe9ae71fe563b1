//! Layered error definitions
//!
//! Categorized by stage: config / manifest / synthesis / plugin / generation.
//! Every variant is fatal to the current run.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Build-project marker file is absent from the project root
    #[error("no {marker} found in project root '{}'", root.display())]
    MissingProject { root: PathBuf, marker: String },

    // ===== Catalog Errors =====
    /// Two entities of one collection share an ID
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: String, id: String },

    /// Malformed module-type manifest
    #[error("failed to parse manifest '{}': {message}", path.display())]
    ManifestParse {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ===== Synthesis Errors =====
    /// Module instance references a type that is not in the catalog
    #[error("module '{instance_id}' references unknown module type '{type_id}'")]
    UnknownType { instance_id: String, type_id: String },

    /// Declared constructor argument has neither a value nor a default
    #[error("module '{instance_id}' is missing required parameter '{parameter}'")]
    MissingParameter {
        instance_id: String,
        parameter: String,
    },

    // ===== Plugin Errors =====
    /// Plugin name is not registered
    #[error("unknown plugin '{name}'")]
    UnknownPlugin { name: String },

    /// Plugin could not render its fragment
    #[error("plugin '{plugin}' failed: {message}")]
    Plugin { plugin: String, message: String },

    // ===== Generation Errors =====
    /// Sketch destination could not be written
    #[error("failed to write sketch to '{}': {source}", path.display())]
    GenerationIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn duplicate_id(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            kind: kind.into(),
            id: id.into(),
        }
    }

    pub fn manifest_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ManifestParse {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    pub fn unknown_type(instance_id: impl Into<String>, type_id: impl Into<String>) -> Self {
        Self::UnknownType {
            instance_id: instance_id.into(),
            type_id: type_id.into(),
        }
    }

    pub fn unknown_plugin(name: impl Into<String>) -> Self {
        Self::UnknownPlugin { name: name.into() }
    }

    /// Create plugin render error
    pub fn plugin(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Plugin {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    pub fn generation_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::GenerationIo {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_offending_ids() {
        let err = ContractError::unknown_type("t2", "missing_type");
        let msg = err.to_string();
        assert!(msg.contains("t2"), "got: {msg}");
        assert!(msg.contains("missing_type"), "got: {msg}");

        let err = ContractError::duplicate_id("module type", "temp_sensor");
        assert_eq!(err.to_string(), "duplicate module type id 'temp_sensor'");

        let err = ContractError::unknown_plugin("xml");
        assert_eq!(err.to_string(), "unknown plugin 'xml'");
    }

    #[test]
    fn test_manifest_error_includes_path() {
        let err = ContractError::manifest_parse("lib/dht22/module.json", "expected value");
        assert!(err.to_string().contains("lib/dht22/module.json"));
    }
}
