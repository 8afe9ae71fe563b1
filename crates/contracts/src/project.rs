//! ProjectConfig - Config Loader output
//!
//! Describes one firmware project: which categories and plugins are enabled,
//! how often module status is refreshed, where manifests live, and the module
//! type / module instance records supplied directly by configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use validator::Validate;

use crate::{Category, ContractError, ModuleInstance, ModuleType};

/// Build-project marker expected in the project root
pub const PROJECT_MARKER: &str = "platformio.ini";

/// File name of a module-type manifest inside the library directory
pub const MANIFEST_FILE_NAME: &str = "module.json";

/// Project configuration file looked up when none is given
pub const DEFAULT_CONFIG_FILE: &str = "sketchgen.toml";

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete project configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub version: ConfigVersion,

    #[serde(default)]
    pub sketch: SketchSettings,

    /// Module types supplied by configuration rather than discovered on disk
    #[serde(default, rename = "firmware_module_type", skip_serializing_if = "Vec::is_empty")]
    pub module_types: Vec<ModuleType>,

    /// Module instances, in declaration order
    #[serde(default, rename = "firmware_module", skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<ModuleInstance>,
}

/// Sketch generation settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SketchSettings {
    /// Enabled categories; inputs/outputs outside this set are pruned
    #[serde(default = "Category::defaults")]
    pub categories: BTreeSet<Category>,

    /// Plugins to run, in order
    #[serde(default)]
    pub plugins: Vec<String>,

    /// Minimum time between two module update cycles
    #[serde(default = "default_status_update_interval")]
    #[validate(range(exclusive_min = 0.0))]
    pub status_update_interval_secs: f64,

    /// Manifest directory, relative to the project root
    #[serde(default = "default_library_dir")]
    pub library_dir: PathBuf,

    /// Generated sketch path, relative to the project root
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Serial baud rate used by the generated `setup()`
    #[serde(default = "default_baud_rate")]
    #[validate(range(min = 300, max = 2_000_000))]
    pub baud_rate: u32,
}

fn default_status_update_interval() -> f64 {
    5.0
}

fn default_library_dir() -> PathBuf {
    PathBuf::from("lib")
}

fn default_output() -> PathBuf {
    PathBuf::from("src").join("src.ino")
}

fn default_baud_rate() -> u32 {
    57600
}

impl Default for SketchSettings {
    fn default() -> Self {
        Self {
            categories: Category::defaults(),
            plugins: Vec::new(),
            status_update_interval_secs: default_status_update_interval(),
            library_dir: default_library_dir(),
            output: default_output(),
            baud_rate: default_baud_rate(),
        }
    }
}

impl SketchSettings {
    /// Status update interval as a `Duration`
    pub fn status_interval(&self) -> Result<Duration, ContractError> {
        Duration::try_from_secs_f64(self.status_update_interval_secs).map_err(|e| {
            ContractError::config_validation(
                "sketch.status_update_interval_secs",
                format!(
                    "invalid interval {}: {e}",
                    self.status_update_interval_secs
                ),
            )
        })
    }

    pub fn library_path(&self, root: &Path) -> PathBuf {
        root.join(&self.library_dir)
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: ProjectConfig = toml::from_str("").unwrap();
        assert_eq!(config.sketch.status_update_interval_secs, 5.0);
        assert_eq!(config.sketch.categories, Category::defaults());
        assert!(config.sketch.plugins.is_empty());
        assert!(config.module_types.is_empty());
        assert!(config.modules.is_empty());
        assert_eq!(
            config.sketch.status_interval().unwrap(),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_record_kind_tags() {
        let config: ProjectConfig = toml::from_str(
            r#"
[sketch]
categories = ["environmental"]
plugins = ["csv"]

[[firmware_module_type]]
id = "temp_sensor"

[[firmware_module]]
id = "t1"
type = "temp_sensor"
"#,
        )
        .unwrap();
        assert_eq!(config.module_types.len(), 1);
        assert_eq!(config.modules[0].type_id, "temp_sensor");
        assert_eq!(config.sketch.categories.len(), 1);
        assert_eq!(config.sketch.plugins, vec!["csv".to_string()]);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let settings = SketchSettings {
            status_update_interval_secs: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_paths_resolve_against_root() {
        let settings = SketchSettings::default();
        let root = Path::new("/tmp/project");
        assert_eq!(settings.library_path(root), root.join("lib"));
        assert_eq!(settings.output_path(root), root.join("src").join("src.ino"));
    }
}
