//! `Structure`: node manager + size controller + id index.
//!
//! Every list and deque is backed by exactly one `Structure`. It is the single
//! place nodes are created and destroyed:
//!
//! - [`Structure::add`] checks capacity and id uniqueness, creates the node,
//!   registers its id and hands a [`Wiring`] to the caller to link it in.
//! - [`Structure::remove`] checks the id, hands a [`Wiring`] to the caller to link
//!   neighbours around the node, unregisters the id and frees the node.
//!
//! All checks run before any state is touched, so a failed call leaves the
//! structure exactly as it was.

pub mod size;

pub use size::{MaxSize, SizeController, SizeMode};

use crate::config::{SizingConfig, StructureConfig, StructureKind};
use crate::error::{LinkError, Result};
use crate::node::{AnchorKey, Detail, NodeHandle, NodeManager, NodeRef, Wiring};
use std::collections::HashMap;

/// What [`Structure::remove`] hands back: the freed node's detail and the
/// callback's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removed<D, R> {
    /// Id and payload of the removed node.
    pub detail: Detail<D>,
    /// The wiring callback's result.
    pub output: R,
}

/// The storage core shared by every list and deque.
#[derive(Debug)]
pub struct Structure<D> {
    kind: StructureKind,
    nodes: NodeManager<D>,
    ids: HashMap<String, NodeHandle>,
    sizing: SizeController,
}

impl<D> Structure<D> {
    /// Creates an empty structure.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] if `config` does not validate.
    pub fn new(config: &StructureConfig) -> Result<Self> {
        config.validate()?;
        let structure = Self {
            kind: config.kind,
            nodes: NodeManager::new(&config.node_manager)?,
            ids: HashMap::new(),
            sizing: SizeController::new(&config.sizing),
        };
        trace_event!(debug, kind = ?structure.kind, max_size = %structure.sizing.max_size(), "structure created");
        Ok(structure)
    }

    /// Structure with the canonical keys of `kind` and the given maximum.
    pub fn for_kind(kind: StructureKind, max: MaxSize) -> Self {
        let sizing = SizingConfig {
            max_size: match max {
                MaxSize::Bounded(n) => Some(n),
                MaxSize::Unbounded => None,
            },
            ..SizingConfig::default()
        };
        Self {
            kind,
            nodes: NodeManager::for_kind(kind),
            ids: HashMap::new(),
            sizing: SizeController::new(&sizing),
        }
    }

    /// Kind tag.
    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    /// Read access to the node arena and anchors.
    pub fn nodes(&self) -> &NodeManager<D> {
        &self.nodes
    }

    /// The size controller.
    pub fn sizing(&self) -> &SizeController {
        &self.sizing
    }

    /// Current size, from cache when valid.
    pub fn size(&self) -> usize {
        self.sizing.get(false, || self.ids.len())
    }

    /// Current size, always recomputed from the id index.
    pub fn recompute_size(&self) -> usize {
        self.sizing.get(true, || self.ids.len())
    }

    /// The configured maximum size.
    pub fn max_size(&self) -> MaxSize {
        self.sizing.max_size()
    }

    /// Changes the maximum size.
    ///
    /// # Errors
    /// Returns [`LinkError::Capacity`] if `max` is below the current size.
    pub fn set_max_size(&mut self, max: MaxSize) -> Result<()> {
        let current = self.size();
        self.sizing.set_max_size(max, current)?;
        trace_event!(debug, max_size = %max, "max size changed");
        Ok(())
    }

    /// Remaining room.
    pub fn capacity(&self) -> MaxSize {
        self.sizing.capacity(self.size())
    }

    /// Returns `true` if no further node fits.
    pub fn is_full(&self) -> bool {
        self.sizing.is_full(self.size())
    }

    /// Returns `true` if the structure holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns `true` if a node with `id` is present.
    pub fn has(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Handle of the node with `id`.
    pub fn lookup(&self, id: &str) -> Option<NodeHandle> {
        self.ids.get(id).copied()
    }

    /// Read-only view of a node.
    pub fn node(&self, handle: NodeHandle) -> Option<NodeRef<'_, D>> {
        self.nodes.node_ref(handle)
    }

    /// Reads a resolved anchor.
    pub fn anchor(&self, key: AnchorKey) -> Option<NodeHandle> {
        self.nodes.anchors().get_key(key)
    }

    /// Mutable payload access by id.
    pub fn data_mut(&mut self, id: &str) -> Option<&mut D> {
        let handle = self.lookup(id)?;
        self.nodes.data_mut(handle)
    }

    /// Changes the primary anchor.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] if `name` is not a configured anchor.
    pub fn set_primary_anchor(&mut self, name: &str) -> Result<()> {
        self.nodes.anchors_mut().set_primary_key(name)
    }

    /// Creates a node from `detail` and lets `wire` link it in.
    ///
    /// # Errors
    /// - [`LinkError::Capacity`] if the structure is full.
    /// - [`LinkError::DuplicateId`] if `detail.id` is already present.
    pub fn add<R>(&mut self, detail: Detail<D>, wire: impl FnOnce(&mut Wiring<'_, D>, NodeHandle) -> R) -> Result<R> {
        self.sizing.assert_not_full(self.size())?;
        if self.ids.contains_key(&detail.id) {
            return Err(LinkError::DuplicateId(detail.id));
        }
        let id = detail.id.clone();
        let handle = self.nodes.create_node(detail)?;
        trace_event!(trace, id = %id, ?handle, "node added");
        self.ids.insert(id, handle);
        let output = wire(&mut Wiring::new(&mut self.nodes), handle);
        self.sizing.invalidate();
        Ok(output)
    }

    /// Lets `wire` unlink `node` from its neighbours, then unregisters and frees it.
    ///
    /// `None` is a no-op returning `Ok(None)`.
    ///
    /// # Errors
    /// Returns [`LinkError::UnknownId`] if `node` is not a live node of this structure.
    pub fn remove<R>(
        &mut self,
        node: Option<NodeHandle>,
        wire: impl FnOnce(&mut Wiring<'_, D>, NodeHandle) -> R,
    ) -> Result<Option<Removed<D, R>>> {
        let Some(handle) = node else {
            return Ok(None);
        };
        let registered = self
            .nodes
            .get(handle)
            .map(|n| (n.id().to_owned(), self.ids.get(n.id()) == Some(&handle)));
        match registered {
            Some((_, true)) => Ok(self.release(handle, wire)),
            Some((id, false)) => Err(LinkError::UnknownId(id)),
            None => Err(LinkError::UnknownId(format!("{handle:?}"))),
        }
    }

    /// Like [`Structure::remove`] for a handle obtained from this structure's own
    /// anchors or pointers; a stale handle yields `None`.
    pub fn release<R>(
        &mut self,
        handle: NodeHandle,
        wire: impl FnOnce(&mut Wiring<'_, D>, NodeHandle) -> R,
    ) -> Option<Removed<D, R>> {
        if !self.nodes.contains(handle) {
            return None;
        }
        let output = wire(&mut Wiring::new(&mut self.nodes), handle);
        let detail = self.nodes.destroy(handle)?;
        self.ids.remove(&detail.id);
        self.sizing.invalidate();
        trace_event!(trace, id = %detail.id, ?handle, "node removed");
        Some(Removed { detail, output })
    }

    /// Clears anchors, the id index and the size cache.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.ids.clear();
        self.sizing.invalidate();
        trace_event!(debug, kind = ?self.kind, "structure reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HEAD, NEXT, PREV, TAIL};
    use crate::error::ErrorKind;

    fn structure() -> Structure<i32> {
        Structure::new(&StructureConfig::for_kind(StructureKind::SinglyLinear)).unwrap()
    }

    #[test]
    fn test_add_registers_and_wires() {
        let mut s = structure();
        let head = s.nodes().anchors().resolve(HEAD).unwrap();
        let h = s
            .add(Detail::new("a", 1), |w, h| {
                w.set_anchor(head, Some(h));
                h
            })
            .unwrap();
        assert_eq!(s.size(), 1);
        assert!(s.has("a"));
        assert_eq!(s.lookup("a"), Some(h));
        assert_eq!(s.anchor(head), Some(h));
    }

    #[test]
    fn test_add_rejects_duplicate_and_overflow() {
        let mut s = Structure::new(&StructureConfig::for_kind(StructureKind::SinglyLinear).with_max_size(1)).unwrap();
        s.add(Detail::new("a", 1), |_, _| ()).unwrap();
        assert_eq!(s.add(Detail::new("b", 2), |_, _| ()).unwrap_err().kind(), ErrorKind::Capacity);
        s.set_max_size(MaxSize::Unbounded).unwrap();
        assert_eq!(s.add(Detail::new("a", 3), |_, _| ()).unwrap_err().kind(), ErrorKind::DuplicateId);
        assert_eq!(s.size(), 1);
        assert_eq!(s.nodes().live(), 1);
    }

    #[test]
    fn test_remove() {
        let mut s = structure();
        let a = s.add(Detail::new("a", 1), |_, h| h).unwrap();
        assert!(s.remove(None, |_, _| ()).unwrap().is_none());

        let removed = s.remove(Some(a), |_, _| 7).unwrap().unwrap();
        assert_eq!(removed.detail, Detail::new("a", 1));
        assert_eq!(removed.output, 7);
        assert_eq!(s.size(), 0);
        assert!(!s.has("a"));

        assert_eq!(s.remove(Some(a), |_, _| ()).unwrap_err().kind(), ErrorKind::UnknownId);
    }

    #[test]
    fn test_remove_unlinks_node() {
        let mut s = structure();
        let next = s.nodes().pointer_keys().resolve(NEXT).unwrap();
        let a = s.add(Detail::new("a", 1), |_, h| h).unwrap();
        s.add(Detail::new("b", 2), |w, h| w.set_pointer(a, next, Some(h))).unwrap();
        let b = s.lookup("b").unwrap();
        assert_eq!(s.nodes().pointer(a, next), Some(b));
        s.remove(Some(b), |w, _| w.set_pointer(a, next, None)).unwrap();
        assert_eq!(s.nodes().pointer(a, next), None);
    }

    #[test]
    fn test_remove_rejects_handle_of_other_structure() {
        let mut a: Structure<&str> = Structure::new(&StructureConfig::for_kind(StructureKind::DequeLinear)).unwrap();
        let mut b: Structure<&str> = Structure::new(&StructureConfig::for_kind(StructureKind::DequeLinear)).unwrap();
        let from_a = a.add(Detail::new("only-in-a", "x"), |_, h| h).unwrap();
        let from_b = b.add(Detail::new("only-in-b", "y"), |_, h| h).unwrap();
        assert_eq!(from_a.index(), from_b.index());

        let err = b.remove(Some(from_a), |_, _| ()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownId);
        assert!(b.release(from_a, |_, _| ()).is_none());
        assert!(b.node(from_a).is_none());
        assert!(b.has("only-in-b"));
        assert_eq!(b.size(), 1);
        assert!(a.has("only-in-a"));
    }

    #[test]
    fn test_wiring_by_name_in_callbacks() {
        let mut s: Structure<i32> = Structure::new(&StructureConfig::for_kind(StructureKind::DoublyLinear)).unwrap();
        let names: Vec<_> = s.nodes().pointer_keys().names().collect();
        assert_eq!(names, ["next", "prev"]);

        let a = s
            .add(Detail::new("a", 1), |w, h| {
                w.set_anchor_named(HEAD, Some(h)).unwrap();
                w.set_anchor_named(TAIL, Some(h)).unwrap();
                assert!(w.set_anchor_named("cursor", Some(h)).is_err());
                h
            })
            .unwrap();
        let b = s
            .add(Detail::new("b", 2), |w, h| {
                let next = w.pointer_key(NEXT).unwrap();
                let prev = w.pointer_key(PREV).unwrap();
                w.set_pointers(h, &[(prev, Some(a)), (next, None)]);
                w.set_pointer(a, next, Some(h));
                w.set_anchor_named(TAIL, Some(h)).unwrap();
                h
            })
            .unwrap();
        let prev = s.nodes().pointer_keys().resolve(PREV).unwrap();
        assert_eq!(s.nodes().pointer(b, prev), Some(a));
        assert_eq!(s.nodes().anchors().get(TAIL).unwrap(), Some(b));

        let removed = s
            .remove(Some(b), |w, h| {
                w.unlink(h);
                let next = w.pointer_key(NEXT).unwrap();
                w.set_pointer(a, next, None);
                w.set_anchor_named(TAIL, Some(a)).unwrap();
                w.pointer(h, prev)
            })
            .unwrap()
            .unwrap();
        assert_eq!(removed.output, None);
        assert_eq!(removed.detail, Detail::new("b", 2));
        assert_eq!(s.nodes().anchors().get(TAIL).unwrap(), Some(a));
        assert!(s.nodes().get(a).unwrap().pointers().is_unlinked());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut s = structure();
        let tail = s.nodes().anchors().resolve(TAIL).unwrap();
        s.add(Detail::new("a", 1), |w, h| w.set_anchor(tail, Some(h))).unwrap();
        s.reset();
        s.reset();
        assert_eq!(s.size(), 0);
        assert_eq!(s.recompute_size(), 0);
        assert_eq!(s.anchor(tail), None);
        assert!(!s.has("a"));
        s.add(Detail::new("a", 1), |_, _| ()).unwrap();
        assert_eq!(s.size(), 1);
    }
}
