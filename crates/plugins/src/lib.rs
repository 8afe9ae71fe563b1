//! # Plugins
//!
//! Plugin registration table, plugin runner, and the built-in code
//! contributors.
//!
//! Responsibilities:
//! - Hold plugins in an explicit registry populated at startup
//! - Resolve every requested name before any plugin runs
//! - Collect one [`Fragment`] per plugin, in the order requested

pub mod builtin;
pub mod registry;
pub mod runner;

pub use builtin::{CsvPlugin, PubSubPlugin};
pub use contracts::{Fragment, Plugin};
pub use registry::PluginRegistry;
pub use runner::PluginRunner;
