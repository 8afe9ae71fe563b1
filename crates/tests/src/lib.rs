//! # Integration Tests
//!
//! End-to-end tests across the pipeline crates.
//!
//! Covers:
//! - contract smoke tests
//! - project directory -> sketch file runs
//! - generation followed by a mock toolchain build

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
        assert_eq!(contracts::PROJECT_MARKER, "platformio.ini");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    use codegen::{write_sketch, CodeGenContext};
    use config_loader::{discover_manifests, ConfigFormat, ConfigLoader};
    use contracts::{ContractError, ProjectConfig, PROJECT_MARKER};
    use plugins::builtin::ROSSERIAL_LIBRARY;
    use plugins::{PluginRegistry, PluginRunner};
    use synthesis::{
        build_instance_index, build_type_index, prune, resolve_dependencies, synthesize,
        DependencySet,
    };
    use tempfile::TempDir;
    use toolchain::{BuildOrchestrator, BuildTarget, MockToolchain, ToolchainCall};

    const TEMP_SENSOR: &str = r#"{
        "id": "temp_sensor",
        "header_files": ["temp_sensor.h"],
        "arguments": [{ "name": "pin" }],
        "outputs": [
            { "name": "temperature", "data_type": "float", "category": "environmental" }
        ],
        "dependencies": ["DHT22"]
    }"#;

    const RELAY: &str = r#"{
        "id": "relay",
        "header_files": ["relay.h"],
        "arguments": [{ "name": "pin" }, { "name": "active_low", "default": false }],
        "inputs": [
            { "name": "state", "data_type": "bool", "category": "actuation" }
        ],
        "commands": ["toggle"],
        "dependencies": ["DHT22", "Relay"]
    }"#;

    /// Project directory with marker and manifests; the config is returned
    /// separately so each test can vary it
    fn project_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PROJECT_MARKER), "[env:uno]\nboard = uno\n").unwrap();
        for (name, manifest) in [("temp_sensor", TEMP_SENSOR), ("relay", RELAY)] {
            let module_dir = dir.path().join("lib").join(name);
            fs::create_dir_all(&module_dir).unwrap();
            fs::write(module_dir.join("module.json"), manifest).unwrap();
        }
        dir
    }

    fn config(toml: &str) -> ProjectConfig {
        ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap()
    }

    struct Output {
        sketch: String,
        dependencies: DependencySet,
    }

    /// Same stage order as the `generate` command
    fn generate(root: &Path, config: &ProjectConfig) -> Result<Output, ContractError> {
        let discovered = discover_manifests(&config.sketch.library_path(root))?;
        let types = build_type_index(discovered, config.module_types.clone())?;
        let instances = build_instance_index(config.modules.clone())?;
        let modules = synthesize(&types, &instances)?;
        let pruned = prune(&modules, &config.sketch.categories);

        let registry = PluginRegistry::with_builtins()?;
        let fragments = PluginRunner::new(&registry).run(&config.sketch.plugins, pruned.as_slice())?;

        let mut dependencies = resolve_dependencies(modules.iter());
        dependencies.extend_from_fragments(&fragments);

        let context = CodeGenContext::new(
            pruned.into_vec(),
            fragments,
            config.sketch.status_interval()?,
            config.sketch.baud_rate,
        );
        Ok(Output {
            sketch: codegen::generate(&context)?,
            dependencies,
        })
    }

    fn generate_and_write(root: &Path, config: &ProjectConfig) -> Result<Output, ContractError> {
        let output = generate(root, config)?;
        write_sketch(&config.sketch.output_path(root), &output.sketch)?;
        Ok(output)
    }

    const T1_WITH_CSV: &str = r#"
[sketch]
categories = ["environmental"]
plugins = ["csv"]

[[firmware_module]]
id = "t1"
type = "temp_sensor"
parameters = { pin = 4 }
"#;

    #[test]
    fn test_environmental_output_reaches_plugin() {
        let dir = project_dir();
        let config = config(T1_WITH_CSV);

        let output = generate_and_write(dir.path(), &config).unwrap();

        let written = fs::read_to_string(dir.path().join("src").join("src.ino")).unwrap();
        assert_eq!(written, output.sketch);
        assert!(written.contains("TempSensor t1(4);"));
        assert!(written.contains("Serial.println(\"t1.temperature\");"));
        assert!(written.contains("Serial.print(t1.get_temperature());"));
        assert_eq!(output.dependencies.as_slice(), ["DHT22".to_string()]);
    }

    #[test]
    fn test_actuation_only_hides_sensor_output() {
        let dir = project_dir();
        let config = config(&T1_WITH_CSV.replace("\"environmental\"]", "\"actuation\"]"));

        let output = generate(dir.path(), &config).unwrap();

        // module still declared and updated, but no plugin sees its output
        assert!(output.sketch.contains("TempSensor t1(4);"));
        assert!(output.sketch.contains("t1.update();"));
        assert!(!output.sketch.contains("get_temperature"));
        assert_eq!(output.dependencies.as_slice(), ["DHT22".to_string()]);
    }

    #[test]
    fn test_duplicate_instance_ids() {
        let dir = project_dir();
        let config = config(
            r#"
[[firmware_module]]
id = "t1"
type = "temp_sensor"
parameters = { pin = 4 }

[[firmware_module]]
id = "t1"
type = "temp_sensor"
parameters = { pin = 5 }
"#,
        );

        let err = generate(dir.path(), &config).err().unwrap();
        assert!(matches!(err, ContractError::DuplicateId { ref id, .. } if id == "t1"));
    }

    #[test]
    fn test_configured_type_shadowing_manifest() {
        let dir = project_dir();
        let config = config(
            r#"
[[firmware_module_type]]
id = "relay"
"#,
        );

        let err = generate(dir.path(), &config).err().unwrap();
        assert_eq!(err.to_string(), "duplicate module type id 'relay'");
    }

    #[test]
    fn test_unknown_module_type() {
        let dir = project_dir();
        let config = config(
            r#"
[[firmware_module]]
id = "t2"
type = "missing_type"
"#,
        );

        let err = generate_and_write(dir.path(), &config).err().unwrap();
        match err {
            ContractError::UnknownType {
                instance_id,
                type_id,
            } => {
                assert_eq!(instance_id, "t2");
                assert_eq!(type_id, "missing_type");
            }
            other => panic!("expected UnknownType, got {other:?}"),
        }
        assert!(!config.sketch.output_path(dir.path()).exists());
    }

    #[test]
    fn test_unknown_plugin_keeps_previous_sketch() {
        let dir = project_dir();
        let good = config(T1_WITH_CSV);
        let first = generate_and_write(dir.path(), &good).unwrap();

        let bad = config(&T1_WITH_CSV.replace("[\"csv\"]", "[\"xml\"]"));
        let err = generate_and_write(dir.path(), &bad).err().unwrap();

        assert!(matches!(err, ContractError::UnknownPlugin { ref name } if name == "xml"));
        let on_disk = fs::read_to_string(good.sketch.output_path(dir.path())).unwrap();
        assert_eq!(on_disk, first.sketch);
    }

    #[test]
    fn test_serial_plugins_conflict_keeps_previous_sketch() {
        let dir = project_dir();
        let good = config(T1_WITH_CSV);
        let first = generate_and_write(dir.path(), &good).unwrap();

        let both = config(&T1_WITH_CSV.replace("[\"csv\"]", "[\"pubsub\", \"csv\"]"));
        let err = generate_and_write(dir.path(), &both).err().unwrap();

        assert!(matches!(err, ContractError::ConfigValidation { ref field, .. } if field == "sketch.plugins"));
        let on_disk = fs::read_to_string(good.sketch.output_path(dir.path())).unwrap();
        assert_eq!(on_disk, first.sketch);
    }

    #[test]
    fn test_reserved_module_id_rejected_at_load() {
        let err = ConfigLoader::load_from_str(
            r#"
[[firmware_module]]
id = "loop"
type = "temp_sensor"
"#,
            ConfigFormat::Toml,
        )
        .unwrap_err();
        assert!(err.to_string().contains("reserved"), "got: {err}");
    }

    #[test]
    fn test_generation_is_deterministic() {
        let dir = project_dir();
        let config = config(
            r#"
[sketch]
plugins = ["pubsub"]

[[firmware_module]]
id = "r1"
type = "relay"
parameters = { pin = 7 }

[[firmware_module]]
id = "t1"
type = "temp_sensor"
parameters = { pin = 4 }
"#,
        );

        let first = generate(dir.path(), &config).unwrap();
        let second = generate(dir.path(), &config).unwrap();
        assert_eq!(first.sketch, second.sketch);
        assert_eq!(first.dependencies, second.dependencies);

        // declarations follow instance order, not ID order
        let r1 = first.sketch.find("Relay r1(7, false);").unwrap();
        let t1 = first.sketch.find("TempSensor t1(4);").unwrap();
        assert!(r1 < t1);
    }

    #[test]
    fn test_dependencies_deduplicated_in_first_seen_order() {
        let dir = project_dir();
        let config = config(
            r#"
[sketch]
plugins = ["pubsub"]

[[firmware_module]]
id = "t1"
type = "temp_sensor"
parameters = { pin = 4 }

[[firmware_module]]
id = "r1"
type = "relay"
parameters = { pin = 7 }

[[firmware_module]]
id = "t2"
type = "temp_sensor"
parameters = { pin = 5 }
"#,
        );

        let output = generate(dir.path(), &config).unwrap();
        assert_eq!(
            output.dependencies.as_slice(),
            [
                "DHT22".to_string(),
                "Relay".to_string(),
                ROSSERIAL_LIBRARY.to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_generate_then_mock_build() {
        let dir = project_dir();
        let mut config = config(T1_WITH_CSV);
        config.sketch.status_update_interval_secs = 0.5;

        let output = generate_and_write(dir.path(), &config).unwrap();
        assert!(output
            .sketch
            .contains("const unsigned long STATUS_UPDATE_INTERVAL_MS = 500UL;"));
        assert_eq!(
            config.sketch.status_interval().unwrap(),
            Duration::from_millis(500)
        );

        let orchestrator = BuildOrchestrator::new(MockToolchain::new());
        let report = orchestrator
            .execute(
                output.dependencies.as_slice(),
                &config.sketch.output_path(dir.path()),
                BuildTarget::Upload,
            )
            .await
            .unwrap();

        assert_eq!(report.libraries_installed, 1);
        assert_eq!(
            orchestrator.toolchain().calls(),
            vec![
                ToolchainCall::Install("DHT22".into()),
                ToolchainCall::Run(BuildTarget::Upload),
            ]
        );
    }
}
