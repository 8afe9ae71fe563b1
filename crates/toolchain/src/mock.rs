//! Mock toolchain
//!
//! Records every call and can inject failures.

use std::sync::{Mutex, PoisonError};

use tracing::instrument;

use crate::client::{BuildTarget, Toolchain};
use crate::error::{Result, ToolchainError};

/// Mock configuration
#[derive(Debug, Default, Clone)]
pub struct MockConfig {
    /// Libraries whose install fails
    pub fail_install: Vec<String>,
    /// Exit code returned by `run`, if it should fail
    pub fail_run: Option<i32>,
}

/// Recorded toolchain call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolchainCall {
    Install(String),
    Run(BuildTarget),
}

/// In-memory toolchain for tests
#[derive(Debug, Default)]
pub struct MockToolchain {
    config: MockConfig,
    calls: Mutex<Vec<ToolchainCall>>,
}

impl MockToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<ToolchainCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: ToolchainCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl Toolchain for MockToolchain {
    fn name(&self) -> &str {
        "mock"
    }

    #[instrument(name = "mock_toolchain_install", skip(self))]
    async fn install_library(&self, library: &str) -> Result<()> {
        self.record(ToolchainCall::Install(library.to_string()));
        if self.config.fail_install.iter().any(|l| l == library) {
            return Err(ToolchainError::tool_failed(
                format!("mock install {library}"),
                Some(1),
            ));
        }
        Ok(())
    }

    #[instrument(name = "mock_toolchain_run", skip(self))]
    async fn run(&self, target: BuildTarget) -> Result<()> {
        self.record(ToolchainCall::Run(target));
        match self.config.fail_run {
            Some(code) => Err(ToolchainError::tool_failed(
                format!("mock {target}"),
                Some(code),
            )),
            None => Ok(()),
        }
    }
}
