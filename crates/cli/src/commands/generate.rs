//! `generate` command implementation.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{Cli, GenerateArgs};
use crate::commands::load_pipeline;

/// Execute the `generate` command
pub fn run_generate(cli: &Cli, args: &GenerateArgs) -> Result<()> {
    let metrics = args
        .metrics_out
        .as_ref()
        .map(|_| observability::install_metrics_recorder())
        .transpose()?;

    let mut pipeline = load_pipeline(cli)?;
    pipeline.apply_overrides(&args.overrides)?;

    let generated = pipeline.generate()?;

    if args.stdout {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(generated.sketch.as_bytes())
            .context("Failed to write sketch to stdout")?;
        stdout.flush().context("Failed to flush stdout")?;
    } else {
        let path = pipeline.write(&generated)?;
        info!(path = %path.display(), "Generation complete");
        if !cli.quiet {
            println!("{}", generated.summary);
            println!("Sketch: {}", path.display());
        }
    }

    if let (Some(handle), Some(path)) = (metrics, args.metrics_out.as_deref()) {
        observability::write_metrics(&handle, path)?;
    }

    Ok(())
}
