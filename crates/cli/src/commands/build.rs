//! `build` command implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use observability::record_build;
use toolchain::{BuildOrchestrator, BuildTarget, PlatformIo};
use tracing::{info, warn};

use crate::cli::{BuildArgs, Cli};
use crate::commands::load_pipeline;

/// Execute the `build` command
pub async fn run_build(cli: &Cli, args: &BuildArgs) -> Result<()> {
    let metrics = args
        .metrics_out
        .as_ref()
        .map(|_| observability::install_metrics_recorder())
        .transpose()?;

    let mut pipeline = load_pipeline(cli)?;
    pipeline.apply_overrides(&args.overrides)?;

    let generated = pipeline.generate()?;
    let sketch_path = pipeline.write(&generated)?;

    let target = BuildTarget::from(args.target);
    let timeout = (args.timeout > 0).then_some(Duration::from_secs(args.timeout));
    let toolchain = PlatformIo::new(pipeline.root())
        .with_program(&args.pio)
        .with_timeout(timeout);

    info!(
        target = %target,
        libraries = generated.dependencies.len(),
        timeout_secs = args.timeout,
        "Starting build"
    );

    let orchestrator = BuildOrchestrator::new(toolchain).skip_install(args.skip_install);
    let outcome = orchestrator
        .execute(generated.dependencies.as_slice(), &sketch_path, target)
        .await;
    record_build(&target.to_string(), outcome.is_ok());

    if let (Some(handle), Some(path)) = (metrics, args.metrics_out.as_deref()) {
        if let Err(e) = observability::write_metrics(&handle, path) {
            warn!(error = %e, "failed to write metrics");
        }
    }

    let report = outcome.with_context(|| format!("{target} failed"))?;

    if !cli.quiet {
        println!("{}", generated.summary);
        println!(
            "{} succeeded: {} libraries installed in {:.2}s",
            report.target,
            report.libraries_installed,
            report.elapsed.as_secs_f64()
        );
    }
    Ok(())
}
