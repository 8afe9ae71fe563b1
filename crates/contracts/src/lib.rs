//! # Contracts
//!
//! Frozen interface contracts shared by every stage of the sketch pipeline:
//! the module model, the identity index, the plugin interface and the error
//! type. All business crates depend on this crate; reverse dependencies are
//! prohibited.
//!
//! ## Data flow
//! `ModuleType` + `ModuleInstance` -> `ResolvedModule` -> pruned
//! `ResolvedModule` -> (`Fragment`s, dependency list) -> sketch text.

mod error;
mod index;
mod module;
mod module_id;
mod plugin;
mod project;
mod reserved;

pub use error::*;
pub use index::{IdIndex, Identified};
pub use module::*;
pub use module_id::{is_c_identifier, ModuleId};
pub use plugin::*;
pub use project::*;
pub use reserved::{is_cpp_keyword, is_reserved_identifier};
