//! PlatformIO command-line toolchain

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::client::{BuildTarget, Toolchain};
use crate::error::{Result, ToolchainError};

pub const DEFAULT_PROGRAM: &str = "pio";

/// Runs `pio` inside the project directory.
///
/// Tool output is inherited so the user sees compiler progress live.
#[derive(Debug, Clone)]
pub struct PlatformIo {
    project_dir: PathBuf,
    program: PathBuf,
    timeout: Option<Duration>,
}

impl PlatformIo {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            program: PathBuf::from(DEFAULT_PROGRAM),
            timeout: None,
        }
    }

    /// Use a different executable (e.g. `platformio` or an absolute path)
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Kill any single command that runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn install_args(library: &str) -> Vec<String> {
        ["pkg", "install", "--library", library]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn run_args(target: BuildTarget) -> Vec<String> {
        match target {
            BuildTarget::Build => vec!["run".into()],
            BuildTarget::Upload => vec!["run".into(), "-t".into(), "upload".into()],
        }
    }

    fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[instrument(name = "platformio_exec", skip(self), fields(dir = %self.project_dir.display()))]
    async fn exec(&self, args: Vec<String>) -> Result<()> {
        let command_line = self.command_line(&args);
        let started = Instant::now();

        let mut child = Command::new(&self.program)
            .args(&args)
            .current_dir(&self.project_dir)
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ToolchainError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let status = match self.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    warn!(command = %command_line, "command timed out, killing");
                    let _ = child.kill().await;
                    return Err(ToolchainError::Timeout {
                        command: command_line,
                        timeout,
                    });
                }
            },
            None => child.wait().await,
        }
        .map_err(|source| ToolchainError::Spawn {
            command: command_line.clone(),
            source,
        })?;

        debug!(
            command = %command_line,
            code = ?status.code(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "command finished"
        );

        if status.success() {
            Ok(())
        } else {
            Err(ToolchainError::tool_failed(command_line, status.code()))
        }
    }
}

impl Toolchain for PlatformIo {
    fn name(&self) -> &str {
        "platformio"
    }

    async fn install_library(&self, library: &str) -> Result<()> {
        info!(library, "installing library");
        self.exec(Self::install_args(library)).await
    }

    async fn run(&self, target: BuildTarget) -> Result<()> {
        info!(%target, "running toolchain");
        self.exec(Self::run_args(target)).await
    }
}
