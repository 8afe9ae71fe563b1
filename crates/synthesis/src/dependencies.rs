//! Dependency resolver
//!
//! Collects the external libraries the sketch needs, deduplicated in
//! first-seen order. Resolution runs over the *unpruned* module set: a
//! module whose ports were all filtered out is still constructed and
//! still links against its libraries.

use std::collections::HashSet;

use contracts::{Fragment, ResolvedModule};
use tracing::{debug, instrument};

/// Ordered set of library identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a library; returns `false` if it was already present.
    pub fn insert(&mut self, library: impl Into<String>) -> bool {
        let library = library.into();
        if self.seen.contains(&library) {
            return false;
        }
        self.seen.insert(library.clone());
        self.items.push(library);
        true
    }

    /// Append the libraries plugins asked for, after module dependencies
    pub fn extend_from_fragments(&mut self, fragments: &[Fragment]) {
        for fragment in fragments {
            for library in &fragment.dependencies {
                self.insert(library.as_str());
            }
        }
    }

    pub fn contains(&self, library: &str) -> bool {
        self.seen.contains(library)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl<'a> IntoIterator for &'a DependencySet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for DependencySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for library in iter {
            set.insert(library);
        }
        set
    }
}

/// Union of every module's dependencies, in module then declaration order
#[instrument(name = "resolve_dependencies", skip_all)]
pub fn resolve_dependencies<'a>(
    modules: impl IntoIterator<Item = &'a ResolvedModule>,
) -> DependencySet {
    let set: DependencySet = modules
        .into_iter()
        .flat_map(|module| module.dependencies.iter().map(String::as_str))
        .collect();
    debug!(libraries = set.len(), "dependencies resolved");
    set
}
