//! Toolchain error types

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Build orchestration errors
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// Sketch must be generated before building
    #[error("sketch '{}' does not exist, generate it first", path.display())]
    MissingSketch { path: PathBuf },

    /// Tool could not be started
    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Tool exited unsuccessfully; `code` is `None` when killed by a signal
    #[error("'{command}' failed with {}", describe_code(*code))]
    ToolFailed { command: String, code: Option<i32> },

    /// Tool exceeded the configured timeout and was killed
    #[error("'{command}' timed out after {}s", timeout.as_secs_f64())]
    Timeout { command: String, timeout: Duration },
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl ToolchainError {
    pub fn tool_failed(command: impl Into<String>, code: Option<i32>) -> Self {
        Self::ToolFailed {
            command: command.into(),
            code,
        }
    }

    /// Process exit code to propagate to the caller's own exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, ToolchainError>;
