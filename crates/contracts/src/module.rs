//! Firmware module model
//!
//! A [`ModuleType`] declares what a piece of hardware can do, a
//! [`ModuleInstance`] places one of them on a board with concrete parameters,
//! and a [`ResolvedModule`] is the merge of both that the rest of the pipeline
//! works on.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::ModuleId;

/// Semantic role of an input or output.
///
/// Free-form so that libraries can introduce their own roles; the three
/// well-known ones are exposed as constants and make up the default enabled
/// set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub const ENVIRONMENTAL: &'static str = "environmental";
    pub const ACTUATION: &'static str = "actuation";
    pub const STATUS: &'static str = "status";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Categories enabled when the configuration does not name any.
    pub fn defaults() -> BTreeSet<Category> {
        [Self::ENVIRONMENTAL, Self::ACTUATION, Self::STATUS]
            .into_iter()
            .map(Category::new)
            .collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Value type carried by a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[serde(alias = "boolean")]
    Bool,
    #[serde(alias = "integer")]
    Int,
    #[serde(alias = "double")]
    Float,
    #[serde(alias = "str")]
    String,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Bool => "bool",
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::String => "string",
        };
        f.write_str(name)
    }
}

/// Declared input or output of a module type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,

    pub data_type: DataType,

    pub category: Category,
}

/// Concrete parameter value (pin numbers, calibration constants, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(v) => write!(f, "{v}"),
            ParamValue::Integer(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::String(v) => write!(f, "{v:?}"),
        }
    }
}

/// Constructor argument declared by a module type, in constructor order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    pub name: String,

    /// Used when an instance does not set the parameter
    #[serde(default)]
    pub default: Option<ParamValue>,
}

/// Reusable declaration of a hardware module's capabilities.
///
/// Loaded from a `module.json` manifest or from the project configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleType {
    pub id: ModuleId,

    /// C++ class implementing the module (defaults to the PascalCase ID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Headers the sketch must include to use the class
    #[serde(default)]
    pub header_files: Vec<String>,

    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,

    #[serde(default)]
    pub inputs: Vec<Port>,

    #[serde(default)]
    pub outputs: Vec<Port>,

    #[serde(default)]
    pub commands: Vec<String>,

    /// External library identifiers, passed verbatim to the toolchain
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ModuleType {
    pub fn class_name(&self) -> String {
        self.class_name
            .clone()
            .unwrap_or_else(|| self.id.to_pascal_case())
    }
}

/// Deployment of a module type with concrete parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleInstance {
    pub id: ModuleId,

    #[serde(rename = "type")]
    pub type_id: ModuleId,

    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
}

/// Module instance merged with its type.
///
/// Capability fields come from the type, configuration fields from the
/// instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedModule {
    pub id: ModuleId,

    pub type_id: ModuleId,

    pub class_name: String,

    pub header_files: Vec<String>,

    /// Constructor arguments, in the order they are passed
    pub arguments: Vec<ParamValue>,

    /// Instance parameters with type defaults filled in
    pub parameters: BTreeMap<String, ParamValue>,

    pub inputs: Vec<Port>,

    pub outputs: Vec<Port>,

    pub commands: Vec<String>,

    pub dependencies: Vec<String>,
}

impl ResolvedModule {
    /// Whether the module still exposes any input or output
    pub fn has_ports(&self) -> bool {
        !self.inputs.is_empty() || !self.outputs.is_empty()
    }
}
