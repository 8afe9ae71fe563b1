//! Build orchestrator
//!
//! Installs the resolved libraries and invokes the toolchain on an already
//! generated sketch.

use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use crate::client::{BuildTarget, Toolchain};
use crate::error::{Result, ToolchainError};

/// Outcome of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub target: BuildTarget,
    pub libraries_installed: usize,
    pub elapsed: Duration,
}

pub struct BuildOrchestrator<T: Toolchain> {
    toolchain: T,
    skip_install: bool,
}

impl<T: Toolchain> BuildOrchestrator<T> {
    pub fn new(toolchain: T) -> Self {
        Self {
            toolchain,
            skip_install: false,
        }
    }

    /// Assume libraries are already installed
    pub fn skip_install(mut self, skip: bool) -> Self {
        self.skip_install = skip;
        self
    }

    pub fn toolchain(&self) -> &T {
        &self.toolchain
    }

    /// Install `dependencies` in order, then build `target`.
    ///
    /// Stops at the first failing command; nothing is retried.
    ///
    /// # Errors
    /// - `MissingSketch` if `sketch_path` does not exist
    /// - `ToolFailed` / `Timeout` / `Spawn` from the toolchain
    #[instrument(
        name = "build_execute",
        skip(self, dependencies),
        fields(
            toolchain = self.toolchain.name(),
            libraries = dependencies.len(),
            sketch = %sketch_path.display(),
            target = %target
        )
    )]
    pub async fn execute(
        &self,
        dependencies: &[String],
        sketch_path: &Path,
        target: BuildTarget,
    ) -> Result<BuildReport> {
        if !sketch_path.is_file() {
            return Err(ToolchainError::MissingSketch {
                path: sketch_path.to_path_buf(),
            });
        }

        let started = Instant::now();
        let mut installed = 0;

        if self.skip_install {
            info!("library installation skipped");
        } else {
            for library in dependencies {
                if let Err(e) = self.toolchain.install_library(library).await {
                    warn!(library = %library, error = %e, "library installation failed");
                    return Err(e);
                }
                installed += 1;
            }
        }

        self.toolchain.run(target).await?;

        let report = BuildReport {
            target,
            libraries_installed: installed,
            elapsed: started.elapsed(),
        };
        info!(
            libraries = installed,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "build finished"
        );
        Ok(report)
    }
}
