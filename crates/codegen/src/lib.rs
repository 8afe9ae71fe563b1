//! # Codegen
//!
//! Renders the firmware sketch from the pruned module set and plugin
//! fragments, and writes it to disk atomically.
//!
//! [`generate`] performs no I/O; [`write_sketch`] is the only function
//! here that touches the filesystem.

mod context;
mod generate;
mod literal;
mod output;
mod writer;

pub use context::CodeGenContext;
pub use generate::{generate, BANNER};
pub use literal::{escape_string, render_literal};
pub use output::write_sketch;
