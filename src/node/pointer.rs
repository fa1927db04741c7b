//! Named pointer slots.
//!
//! Every node of a structure carries the same fixed set of pointer slots
//! (`next`, or `next` and `prev`). Names are resolved once into a [`PointerKey`]
//! so the hot paths index a small slice instead of comparing strings.

use super::NodeHandle;
use crate::config::StructureKind;
use crate::error::{LinkError, Result};

/// A resolved pointer slot name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerKey(pub(crate) usize);

/// The ordered set of pointer names shared by all nodes of one structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerKeys {
    names: Box<[String]>,
}

impl PointerKeys {
    /// Builds the key set.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] if `names` is empty.
    pub fn new(names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Err(LinkError::config("pointer key list is empty"));
        }
        Ok(Self { names: names.into() })
    }

    /// Canonical key set for `kind`: `next`, then `prev` for doubly linked kinds.
    pub(crate) fn canonical(kind: StructureKind) -> Self {
        Self { names: kind.pointer_keys().into() }
    }

    /// Resolves `name` into a key.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] if `name` is not one of the configured keys.
    pub fn resolve(&self, name: &str) -> Result<PointerKey> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(PointerKey)
            .ok_or_else(|| LinkError::config(format!("unknown pointer key `{name}`")))
    }

    /// Name of a resolved key.
    pub fn name(&self, key: PointerKey) -> &str {
        &self.names[key.0]
    }

    /// Number of pointer slots per node.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`: construction rejects empty key sets.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates the configured names in slot order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Fresh slot storage with every pointer absent.
    pub(crate) fn empty_slots(&self) -> PointerSlots {
        PointerSlots(vec![None; self.names.len()].into_boxed_slice())
    }
}

/// Per-node pointer storage. Readable by anyone holding the node, writable only
/// by the node manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerSlots(Box<[Option<NodeHandle>]>);

impl PointerSlots {
    /// Reads a pointer.
    #[inline]
    pub fn get(&self, key: PointerKey) -> Option<NodeHandle> {
        self.0.get(key.0).copied().flatten()
    }

    #[inline]
    pub(crate) fn set(&mut self, key: PointerKey, value: Option<NodeHandle>) {
        if let Some(slot) = self.0.get_mut(key.0) {
            *slot = value;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.0.iter_mut().for_each(|slot| *slot = None);
    }

    /// Returns `true` if every pointer is absent.
    pub fn is_unlinked(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}
