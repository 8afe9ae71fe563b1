//! Error types for CLI operations.

use std::path::PathBuf;

use thiserror::Error;
use toolchain::ToolchainError;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Explicit configuration file does not exist
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// `init` would overwrite an existing file
    #[error("{} already exists (use --force to overwrite)", path.display())]
    ProjectExists { path: PathBuf },

    /// `validate` found a problem
    #[error("Project validation failed: {reason}")]
    ValidationFailed { reason: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn project_exists(path: impl Into<PathBuf>) -> Self {
        Self::ProjectExists { path: path.into() }
    }
}

/// Process exit code for a failed command.
///
/// A failing toolchain command passes its own exit code through; everything
/// else exits with 1.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<ToolchainError>())
        .map(|e| u8::try_from(e.exit_code()).unwrap_or(1))
        .filter(|code| *code != 0)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ContractError;

    #[test]
    fn test_toolchain_exit_code_passes_through() {
        let err = anyhow::Error::new(ToolchainError::tool_failed("pio run", Some(3)))
            .context("Build failed");
        assert_eq!(exit_code(&err), 3);
    }

    #[test]
    fn test_out_of_range_code_falls_back() {
        let err = anyhow::Error::new(ToolchainError::tool_failed("pio run", Some(300)));
        assert_eq!(exit_code(&err), 1);
    }

    #[test]
    fn test_other_errors_exit_one() {
        let err = anyhow::Error::new(CliError::config_not_found("missing.toml"));
        assert_eq!(exit_code(&err), 1);

        let err = anyhow::Error::new(ContractError::unknown_plugin("xml"));
        assert_eq!(exit_code(&err), 1);
    }
}
