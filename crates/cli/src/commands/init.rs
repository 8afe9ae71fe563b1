//! `init` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{ProjectConfig, DEFAULT_CONFIG_FILE, PROJECT_MARKER};
use tracing::info;

use crate::cli::{Cli, InitArgs};
use crate::error::CliError;

/// Execute the `init` command
pub fn run_init(cli: &Cli, args: &InitArgs) -> Result<()> {
    let written = init_project(&cli.project_dir, args)?;
    if !cli.quiet {
        println!("✓ Project initialized: {}", cli.project_dir.display());
        for path in written {
            println!("  + {}", path.display());
        }
    }
    Ok(())
}

fn platformio_ini(args: &InitArgs) -> String {
    format!(
        "[env:{board}]\nplatform = {platform}\nboard = {board}\nframework = arduino\n",
        board = args.board,
        platform = args.platform,
    )
}

/// Write the marker, the default configuration and the library directory
fn init_project(root: &Path, args: &InitArgs) -> Result<Vec<PathBuf>> {
    let config = ProjectConfig::default();
    let marker = root.join(PROJECT_MARKER);
    let config_path = root.join(DEFAULT_CONFIG_FILE);
    let library_dir = config.sketch.library_path(root);

    if !args.force {
        for path in [&marker, &config_path] {
            if path.exists() {
                return Err(CliError::project_exists(path).into());
            }
        }
    }

    fs::create_dir_all(&library_dir)
        .with_context(|| format!("Failed to create {}", library_dir.display()))?;

    fs::write(&marker, platformio_ini(args))
        .with_context(|| format!("Failed to write {}", marker.display()))?;

    let toml = ConfigLoader::to_toml(&config)?;
    fs::write(&config_path, toml)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    info!(
        root = %root.display(),
        board = %args.board,
        platform = %args.platform,
        "project initialized"
    );
    Ok(vec![marker, config_path, library_dir])
}
