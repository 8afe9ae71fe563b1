//! Command implementations.

mod build;
mod generate;
mod info;
mod init;
mod plugins;
mod validate;

pub use build::run_build;
pub use generate::run_generate;
pub use info::run_info;
pub use init::run_init;
pub use plugins::run_plugins;
pub use validate::run_validate;

use anyhow::Result;

use crate::cli::Cli;
use crate::error::CliError;
use crate::pipeline::Pipeline;

/// Load the project named by the global `--project-dir` / `--config` flags
fn load_pipeline(cli: &Cli) -> Result<Pipeline> {
    if let Some(ref path) = cli.config {
        if !path.exists() {
            return Err(CliError::config_not_found(path).into());
        }
    }
    Pipeline::load(&cli.project_dir, cli.config.as_deref())
}
