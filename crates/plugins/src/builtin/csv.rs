//! `csv` - tabular serial logging

use contracts::{ContractError, Fragment, Plugin, ResolvedModule, Scope};
use tracing::{instrument, warn};

use super::getter;

pub const CSV_PLUGIN: &str = "csv";

/// Prints a `<module>.<output>` header row at startup and one row of output
/// values per status cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvPlugin;

impl Plugin for CsvPlugin {
    fn name(&self) -> &str {
        CSV_PLUGIN
    }

    fn description(&self) -> &str {
        "comma-separated output values on the serial port"
    }

    fn uses_serial(&self) -> bool {
        true
    }

    #[instrument(name = "csv_render", skip_all, fields(modules = modules.len()))]
    fn render(&self, modules: &[ResolvedModule]) -> Result<Fragment, ContractError> {
        let mut fragment = Fragment::new(CSV_PLUGIN);

        let columns: Vec<_> = modules
            .iter()
            .flat_map(|module| module.outputs.iter().map(move |port| (module, port)))
            .collect();
        if columns.is_empty() {
            warn!("no outputs enabled, csv log would be empty");
            return Ok(fragment);
        }

        let header = columns
            .iter()
            .map(|(module, port)| format!("{}.{}", module.id, port.name))
            .collect::<Vec<_>>()
            .join(",");

        let mut row = String::new();
        for (i, (module, port)) in columns.iter().enumerate() {
            if i > 0 {
                row.push_str("Serial.print(',');\n");
            }
            row.push_str(&format!("Serial.print({});\n", getter(module, port)));
        }
        row.push_str("Serial.println();\n");

        fragment
            .push(Scope::Setup, format!("Serial.println(\"{header}\");\n"))
            .push(Scope::Update, row);
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Category, DataType, Port};
    use std::collections::BTreeMap;

    fn module(id: &str, outputs: &[&str]) -> ResolvedModule {
        ResolvedModule {
            id: id.into(),
            type_id: "temp_sensor".into(),
            class_name: "TempSensor".into(),
            header_files: vec![],
            arguments: vec![],
            parameters: BTreeMap::new(),
            inputs: vec![],
            outputs: outputs
                .iter()
                .map(|name| Port {
                    name: name.to_string(),
                    data_type: DataType::Float,
                    category: Category::new(Category::ENVIRONMENTAL),
                })
                .collect(),
            commands: vec![],
            dependencies: vec![],
        }
    }

    #[test]
    fn test_header_and_row_follow_module_order() {
        let modules = vec![module("t1", &["temperature", "humidity"]), module("t2", &["temperature"])];
        let fragment = CsvPlugin.render(&modules).unwrap();

        let setup: Vec<_> = fragment.blocks_in(Scope::Setup).collect();
        assert_eq!(
            setup[0].code,
            "Serial.println(\"t1.temperature,t1.humidity,t2.temperature\");\n"
        );

        let update = &fragment.blocks_in(Scope::Update).next().unwrap().code;
        assert_eq!(
            update,
            "Serial.print(t1.get_temperature());\n\
             Serial.print(',');\n\
             Serial.print(t1.get_humidity());\n\
             Serial.print(',');\n\
             Serial.print(t2.get_temperature());\n\
             Serial.println();\n"
        );
        assert!(fragment.dependencies.is_empty());
    }

    #[test]
    fn test_no_outputs_renders_empty_fragment() {
        let fragment = CsvPlugin.render(&[module("t1", &[])]).unwrap();
        assert!(fragment.is_empty());
        assert_eq!(fragment.plugin, CSV_PLUGIN);
    }
}
