//! `validate` command implementation.
//!
//! Runs the whole pipeline in memory: marker, config, manifests, synthesis,
//! pruning, plugins and generation. Nothing is written.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::{Cli, ValidateArgs};
use crate::commands::load_pipeline;
use crate::error::CliError;
use crate::pipeline::Generated;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    project_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ProjectSummary>,
}

#[derive(Serialize)]
struct ProjectSummary {
    module_types: usize,
    modules: usize,
    ports_exposed: usize,
    plugins: Vec<String>,
    dependencies: Vec<String>,
}

/// Execute the `validate` command
pub fn run_validate(cli: &Cli, args: &ValidateArgs) -> Result<()> {
    info!(project = %cli.project_dir.display(), "Validating project");

    let result = validate_project(cli);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        Err(CliError::ValidationFailed {
            reason: result.error.unwrap_or_default(),
        }
        .into())
    }
}

fn validate_project(cli: &Cli) -> ValidationResult {
    let project_dir = cli.project_dir.display().to_string();

    match load_pipeline(cli).and_then(|pipeline| pipeline.generate()) {
        Ok(generated) => {
            let warnings = collect_warnings(&generated);
            let summary = generated.summary;
            ValidationResult {
                valid: true,
                project_dir,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ProjectSummary {
                    module_types: summary.types_discovered + summary.types_configured,
                    modules: summary.modules,
                    ports_exposed: summary.ports_exposed,
                    plugins: summary.plugins,
                    dependencies: summary.dependencies,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            project_dir,
            error: Some(format!("{e:#}")),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect non-fatal issues
fn collect_warnings(generated: &Generated) -> Vec<String> {
    let summary = &generated.summary;
    let mut warnings = Vec::new();

    if summary.modules == 0 {
        warnings.push("No modules configured - the sketch only contains the scaffold".to_string());
    }

    for module in &summary.modules_without_ports {
        warnings.push(format!(
            "Module '{}' has no inputs or outputs in the enabled categories",
            module
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Project is valid: {}", result.project_dir);

        if let Some(ref summary) = result.summary {
            println!("\n  Module types: {}", summary.module_types);
            println!("  Modules: {}", summary.modules);
            println!("  Ports exposed: {}", summary.ports_exposed);
            if summary.plugins.is_empty() {
                println!("  Plugins: none");
            } else {
                println!("  Plugins: {}", summary.plugins.join(", "));
            }
            println!("  Dependencies: {}", summary.dependencies.len());
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Project is invalid: {}", result.project_dir);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
