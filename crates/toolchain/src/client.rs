//! Toolchain abstraction
//!
//! Lets the build orchestrator drive PlatformIO in production and a
//! recording mock in tests.

use std::fmt;
use std::future::Future;

use crate::error::Result;

/// What the toolchain should do with the generated sketch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildTarget {
    /// Compile only
    #[default]
    Build,
    /// Compile and flash the board
    Upload,
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildTarget::Build => write!(f, "build"),
            BuildTarget::Upload => write!(f, "upload"),
        }
    }
}

/// Firmware toolchain trait
pub trait Toolchain: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Install one external library into the project.
    ///
    /// Installing an already-present library must succeed.
    fn install_library(&self, library: &str) -> impl Future<Output = Result<()>> + Send;

    /// Build (and optionally upload) the project
    fn run(&self, target: BuildTarget) -> impl Future<Output = Result<()>> + Send;
}
