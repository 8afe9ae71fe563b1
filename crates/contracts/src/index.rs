//! Identity index
//!
//! Insertion-ordered ID -> entity mapping with a uniqueness guarantee. Every
//! downstream lookup assumes IDs are unique, so a duplicate is a hard error.

use std::collections::HashMap;

use crate::{ContractError, ModuleId, ModuleInstance, ModuleType, ResolvedModule};

/// Entity that exposes an ID field
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for ModuleType {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Identified for ModuleInstance {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl Identified for ResolvedModule {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

/// Insertion-ordered, uniqueness-checked collection.
///
/// Iteration order is the order items were supplied in, never hash order,
/// which keeps generated output stable across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct IdIndex<T> {
    items: Vec<T>,
    positions: HashMap<ModuleId, usize>,
}

impl<T: Identified> IdIndex<T> {
    /// Build the index, failing on the first repeated ID.
    ///
    /// `kind` names the collection in the error ("module type", ...).
    pub fn build(
        kind: &str,
        items: impl IntoIterator<Item = T>,
    ) -> Result<Self, ContractError> {
        let mut index = Self::default();
        for item in items {
            index.insert(kind, item)?;
        }
        Ok(index)
    }

    /// Append one entity, rejecting a repeated ID.
    pub fn insert(&mut self, kind: &str, item: T) -> Result<(), ContractError> {
        let id = ModuleId::from(item.id());
        if self.positions.contains_key(&id) {
            return Err(ContractError::duplicate_id(kind, id.as_str()));
        }
        self.positions.insert(id, self.items.len());
        self.items.push(item);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.positions.get(id).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Apply `f` to every entity, keeping keys and order.
    ///
    /// `f` must not change an entity's ID.
    pub fn map<U: Identified>(&self, f: impl FnMut(&T) -> U) -> IdIndex<U> {
        let items: Vec<U> = self.items.iter().map(f).collect();
        debug_assert!(items
            .iter()
            .zip(&self.items)
            .all(|(new, old)| new.id() == old.id()));
        IdIndex {
            items,
            positions: self.positions.clone(),
        }
    }
}

impl<T> IdIndex<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Entities in insertion order
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for IdIndex<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<'a, T> IntoIterator for &'a IdIndex<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
