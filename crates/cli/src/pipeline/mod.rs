//! Pipeline orchestration module.

mod orchestrator;

pub use orchestrator::{Generated, Pipeline};
