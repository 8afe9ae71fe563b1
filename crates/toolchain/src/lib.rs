//! # Toolchain
//!
//! Build orchestration for generated sketches.
//!
//! Responsibilities:
//! - Install the resolved external libraries, in order
//! - Invoke the firmware toolchain to build or upload
//! - Surface the toolchain's exit status unchanged
//!
//! The generated sketch is never modified here.

pub mod client;
pub mod error;
pub mod mock;
pub mod orchestrator;
pub mod platformio;

pub use client::{BuildTarget, Toolchain};
pub use error::{Result, ToolchainError};
pub use mock::{MockConfig, MockToolchain, ToolchainCall};
pub use orchestrator::{BuildOrchestrator, BuildReport};
pub use platformio::PlatformIo;
