//! # Synthesis
//!
//! Turns the project's raw declarations into the resolved module set the
//! code generator consumes.
//!
//! Stages, in pipeline order:
//! - [`catalog`]: index module types and instances, rejecting repeated IDs
//! - [`synthesize`](mod@synthesize): merge each instance with its type
//! - [`prune`](mod@prune): drop ports whose category is not enabled
//! - [`dependencies`]: collect the external libraries to install
//!
//! Every stage is a pure function over [`contracts::IdIndex`], so output
//! order always follows declaration order.

pub mod catalog;
pub mod dependencies;
pub mod prune;
pub mod synthesize;

pub use catalog::{build_instance_index, build_type_index};
pub use dependencies::{resolve_dependencies, DependencySet};
pub use prune::{prune, prune_module};
pub use synthesize::{resolve, synthesize};
