//! `info` command implementation.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use contracts::{ParamValue, Port, ResolvedModule};
use serde::Serialize;
use synthesis::resolve_dependencies;
use tracing::info;

use crate::cli::{Cli, InfoArgs};
use crate::commands::load_pipeline;

/// Project info for JSON output
#[derive(Serialize)]
struct ProjectInfo {
    project_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config_path: Option<String>,
    categories: Vec<String>,
    plugins: Vec<String>,
    status_update_interval_secs: f64,
    output: String,
    modules: Vec<ModuleInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dependencies: Option<Vec<String>>,
}

#[derive(Serialize)]
struct ModuleInfo {
    id: String,
    #[serde(rename = "type")]
    type_id: String,
    class_name: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<String, ParamValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inputs: Option<Vec<PortInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outputs: Option<Vec<PortInfo>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    commands: Vec<String>,
}

#[derive(Serialize)]
struct PortInfo {
    name: String,
    data_type: String,
    category: String,
}

impl From<&Port> for PortInfo {
    fn from(port: &Port) -> Self {
        Self {
            name: port.name.clone(),
            data_type: port.data_type.to_string(),
            category: port.category.to_string(),
        }
    }
}

/// Execute the `info` command
pub fn run_info(cli: &Cli, args: &InfoArgs) -> Result<()> {
    info!(project = %cli.project_dir.display(), "Loading project info");

    let pipeline = load_pipeline(cli)?;
    let resolution = pipeline.resolve().context("Failed to resolve modules")?;
    let pruned = pipeline.prune(&resolution);

    let config = pipeline.config();
    let dependencies = args
        .deps
        .then(|| resolve_dependencies(resolution.modules.iter()).into_vec());

    let project = ProjectInfo {
        project_dir: pipeline.root().display().to_string(),
        config_path: pipeline.config_path().map(|p| p.display().to_string()),
        categories: config
            .sketch
            .categories
            .iter()
            .map(|c| c.to_string())
            .collect(),
        plugins: config.sketch.plugins.clone(),
        status_update_interval_secs: config.sketch.status_update_interval_secs,
        output: pipeline.output_path().display().to_string(),
        modules: pruned
            .iter()
            .map(|module| build_module_info(module, args.ports))
            .collect(),
        dependencies,
    };

    if args.json {
        let json =
            serde_json::to_string_pretty(&project).context("Failed to serialize project info")?;
        println!("{}", json);
    } else {
        print_project_info(&project);
    }

    Ok(())
}

fn build_module_info(module: &ResolvedModule, with_ports: bool) -> ModuleInfo {
    let ports = |list: &[Port]| list.iter().map(PortInfo::from).collect::<Vec<_>>();
    ModuleInfo {
        id: module.id.to_string(),
        type_id: module.type_id.to_string(),
        class_name: module.class_name.clone(),
        parameters: module.parameters.clone(),
        inputs: with_ports.then(|| ports(&module.inputs)),
        outputs: with_ports.then(|| ports(&module.outputs)),
        commands: module.commands.clone(),
    }
}

fn print_project_info(project: &ProjectInfo) {
    println!("Project: {}", project.project_dir);
    match project.config_path {
        Some(ref path) => println!("  Config: {}", path),
        None => println!("  Config: (defaults)"),
    }
    println!("  Categories: {}", project.categories.join(", "));
    if project.plugins.is_empty() {
        println!("  Plugins: none");
    } else {
        println!("  Plugins: {}", project.plugins.join(", "));
    }
    println!(
        "  Status interval: {}s",
        project.status_update_interval_secs
    );
    println!("  Output: {}", project.output);

    println!("\nModules ({}):", project.modules.len());
    for module in &project.modules {
        println!(
            "  {} ({}, class {})",
            module.id, module.type_id, module.class_name
        );
        if !module.parameters.is_empty() {
            let params: Vec<String> = module
                .parameters
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            println!("    parameters: {}", params.join(", "));
        }
        if !module.commands.is_empty() {
            println!("    commands: {}", module.commands.join(", "));
        }
        print_ports("inputs", module.inputs.as_deref());
        print_ports("outputs", module.outputs.as_deref());
    }

    if let Some(ref dependencies) = project.dependencies {
        println!("\nDependencies ({}):", dependencies.len());
        for library in dependencies {
            println!("  - {}", library);
        }
    }
}

fn print_ports(label: &str, ports: Option<&[PortInfo]>) {
    let Some(ports) = ports else {
        return;
    };
    if ports.is_empty() {
        println!("    {label}: none exposed");
        return;
    }
    println!("    {label}:");
    for port in ports {
        println!(
            "      - {} [{}, {}]",
            port.name, port.data_type, port.category
        );
    }
}
