//! Plugin trait - Plugin Runner input interface
//!
//! A plugin turns the full, pruned module set into one [`Fragment`] of
//! generated code. Plugins never see each other's output.

use serde::Serialize;

use crate::{ContractError, ResolvedModule};

/// Insertion point of a code block in the generated sketch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// File scope, after the module declarations
    Global,
    /// Inside `setup()`, after every module has been initialized
    Setup,
    /// Inside `loop()`, on every iteration
    Loop,
    /// Inside `loop()`, once per status update interval, after module updates
    Update,
}

/// Block of generated code bound to a scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeBlock {
    pub scope: Scope,
    pub code: String,
}

/// Output of one plugin invocation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Fragment {
    /// Name of the plugin that produced the fragment
    pub plugin: String,

    /// Headers required by the fragment's code
    pub includes: Vec<String>,

    /// Libraries required by the fragment's code
    pub dependencies: Vec<String>,

    /// Code blocks, in emission order within each scope
    pub blocks: Vec<CodeBlock>,
}

impl Fragment {
    pub fn new(plugin: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            ..Default::default()
        }
    }

    pub fn include(&mut self, header: impl Into<String>) -> &mut Self {
        let header = header.into();
        if !self.includes.contains(&header) {
            self.includes.push(header);
        }
        self
    }

    pub fn depend_on(&mut self, library: impl Into<String>) -> &mut Self {
        let library = library.into();
        if !self.dependencies.contains(&library) {
            self.dependencies.push(library);
        }
        self
    }

    /// Append a code block; empty code is ignored.
    pub fn push(&mut self, scope: Scope, code: impl Into<String>) -> &mut Self {
        let code = code.into();
        if !code.trim().is_empty() {
            self.blocks.push(CodeBlock { scope, code });
        }
        self
    }

    /// Blocks for one scope, in emission order
    pub fn blocks_in(&self, scope: Scope) -> impl Iterator<Item = &CodeBlock> {
        self.blocks.iter().filter(move |b| b.scope == scope)
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.dependencies.is_empty() && self.blocks.is_empty()
    }
}

/// Code-contributing plugin.
///
/// Implementations must be deterministic: the same module slice always
/// yields the same fragment.
pub trait Plugin: Send + Sync {
    /// Registry name, matched exactly
    fn name(&self) -> &str;

    /// One-line description shown by `sketchgen plugins`
    fn description(&self) -> &str {
        ""
    }

    /// Whether the generated code talks over `Serial`; at most one selected
    /// plugin may
    fn uses_serial(&self) -> bool {
        false
    }

    /// Render the fragment for the ordered module set
    ///
    /// # Errors
    /// Returns `ContractError::Plugin` when the modules cannot be expressed
    fn render(&self, modules: &[ResolvedModule]) -> Result<Fragment, ContractError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_builder_dedups_and_skips_empty() {
        let mut fragment = Fragment::new("csv");
        fragment
            .include("<Arduino.h>")
            .include("<Arduino.h>")
            .depend_on("lib")
            .push(Scope::Setup, "Serial.println();")
            .push(Scope::Update, "   ");

        assert_eq!(fragment.includes.len(), 1);
        assert_eq!(fragment.dependencies.len(), 1);
        assert_eq!(fragment.blocks.len(), 1);
        assert_eq!(fragment.blocks_in(Scope::Setup).count(), 1);
        assert_eq!(fragment.blocks_in(Scope::Update).count(), 0);
        assert!(!fragment.is_empty());
        assert!(Fragment::new("empty").is_empty());
    }
}
