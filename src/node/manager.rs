//! `NodeManager`: the node arena of one structure.
//!
//! Nodes live in a flat slot vector addressed by [`NodeHandle`]s. Pointer slots
//! and anchors store handles, never references, so circular topologies are just
//! two integers pointing at each other.
//!
//! Freed slots are threaded onto a free list and reused; each reuse bumps the
//! slot generation so stale handles stop resolving. Every manager carries an
//! owner tag stamped on the handles it issues; a handle from another manager
//! never resolves here.
//!
//! The manager is the only writer of pointer slots. Outside this crate pointers
//! can be written only through a [`Wiring`] handed to `Structure::add` and
//! `Structure::remove` callbacks.

use super::handle::next_owner;
use super::{AnchorKey, AnchorManager, Detail, NodeHandle, NodeRef, PointerKey, PointerKeys, PointerSlots};
use crate::config::{NodeManagerConfig, StructureKind};
use crate::error::{LinkError, Result};
use core::fmt;

/// A node: id, payload and pointer slots.
pub struct Node<D> {
    pub(crate) kind: StructureKind,
    pub(crate) id: String,
    pub(crate) data: D,
    pointers: PointerSlots,
}

impl<D> Node<D> {
    /// Kind tag of the owning structure.
    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    /// The node id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The payload.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Read-only pointer slots.
    pub fn pointers(&self) -> &PointerSlots {
        &self.pointers
    }
}

impl<D: fmt::Debug> fmt::Debug for Node<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("data", &self.data)
            .field("pointers", &self.pointers)
            .finish()
    }
}

enum Slot<D> {
    Occupied { generation: u32, node: Node<D> },
    Free { generation: u32, next_free: Option<u32> },
}

/// Node factory, pointer writer and anchor owner for one structure.
pub struct NodeManager<D> {
    owner: u32,
    kind: StructureKind,
    keys: PointerKeys,
    anchors: AnchorManager,
    slots: Vec<Slot<D>>,
    free_head: Option<u32>,
    live: usize,
}

impl<D> NodeManager<D> {
    /// Creates an empty manager.
    ///
    /// # Errors
    /// Returns `LinkError::Config` if the anchor or pointer key lists are empty or
    /// the primary anchor is unknown.
    pub fn new(config: &NodeManagerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            owner: next_owner(),
            kind: config.kind,
            keys: PointerKeys::new(&config.pointer_keys)?,
            anchors: AnchorManager::new(&config.anchor_keys, config.primary_anchor_key.as_deref())?,
            slots: Vec::new(),
            free_head: None,
            live: 0,
        })
    }

    /// Manager with the canonical keys of `kind`.
    pub(crate) fn for_kind(kind: StructureKind) -> Self {
        Self {
            owner: next_owner(),
            kind,
            keys: PointerKeys::canonical(kind),
            anchors: AnchorManager::canonical(),
            slots: Vec::new(),
            free_head: None,
            live: 0,
        }
    }

    /// Owner tag stamped on issued handles.
    pub fn owner(&self) -> u32 {
        self.owner
    }

    /// Kind tag stamped on created nodes.
    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    /// Pointer key set.
    pub fn pointer_keys(&self) -> &PointerKeys {
        &self.keys
    }

    /// Anchor slots.
    pub fn anchors(&self) -> &AnchorManager {
        &self.anchors
    }

    pub(crate) fn anchors_mut(&mut self) -> &mut AnchorManager {
        &mut self.anchors
    }

    /// Number of live nodes in the arena.
    pub fn live(&self) -> usize {
        self.live
    }

    /// Allocates a node with every pointer absent, reusing a free slot if any.
    ///
    /// # Errors
    /// Returns [`LinkError::Capacity`] if the arena already spans `u32::MAX` slots.
    pub(crate) fn create_node(&mut self, detail: Detail<D>) -> Result<NodeHandle> {
        let node = Node {
            kind: self.kind,
            id: detail.id,
            data: detail.data,
            pointers: self.keys.empty_slots(),
        };

        let handle = if let Some(idx) = self.free_head {
            let slot = &mut self.slots[idx as usize];
            let (generation, next_free) = match slot {
                Slot::Free { generation, next_free } => (*generation, *next_free),
                Slot::Occupied { .. } => unreachable!("free list points at an occupied slot"),
            };
            *slot = Slot::Occupied { generation, node };
            self.free_head = next_free;
            NodeHandle::new(self.owner, idx, generation)
        } else {
            let idx = u32::try_from(self.slots.len())
                .ok()
                .filter(|&idx| idx < u32::MAX)
                .ok_or_else(|| LinkError::Capacity("node arena exhausted".into()))?;
            self.slots.push(Slot::Occupied { generation: 0, node });
            NodeHandle::new(self.owner, idx, 0)
        };
        self.live += 1;
        Ok(handle)
    }

    /// Resolves a handle to its node.
    pub fn get(&self, handle: NodeHandle) -> Option<&Node<D>> {
        if handle.owner() != self.owner {
            return None;
        }
        match self.slots.get(handle.index())? {
            Slot::Occupied { generation, node } if *generation == handle.generation() => Some(node),
            _ => None,
        }
    }

    fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut Node<D>> {
        if handle.owner() != self.owner {
            return None;
        }
        match self.slots.get_mut(handle.index())? {
            Slot::Occupied { generation, node } if *generation == handle.generation() => Some(node),
            _ => None,
        }
    }

    /// Read-only view of a node.
    pub fn node_ref(&self, handle: NodeHandle) -> Option<NodeRef<'_, D>> {
        NodeRef::new(self, handle)
    }

    /// Returns `true` if `handle` resolves to a live node.
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Mutable payload access. Pointers stay out of reach.
    pub(crate) fn data_mut(&mut self, handle: NodeHandle) -> Option<&mut D> {
        self.get_mut(handle).map(|node| &mut node.data)
    }

    /// Reads a pointer slot of a live node.
    #[inline]
    pub fn pointer(&self, handle: NodeHandle, key: PointerKey) -> Option<NodeHandle> {
        self.get(handle)?.pointers.get(key)
    }

    /// Writes pointer slots. Stale handles are ignored.
    pub(crate) fn set_pointers(&mut self, handle: NodeHandle, values: &[(PointerKey, Option<NodeHandle>)]) {
        if let Some(node) = self.get_mut(handle) {
            for &(key, value) in values {
                node.pointers.set(key, value);
            }
        }
    }

    #[inline]
    pub(crate) fn set_pointer(&mut self, handle: NodeHandle, key: PointerKey, value: Option<NodeHandle>) {
        self.set_pointers(handle, &[(key, value)]);
    }

    /// Sets every pointer slot of `handle` to absent. Neighbours are untouched.
    pub(crate) fn unlink(&mut self, handle: NodeHandle) {
        if let Some(node) = self.get_mut(handle) {
            node.pointers.clear();
        }
    }

    /// Unlinks and frees the node, handing its id and payload back.
    pub(crate) fn destroy(&mut self, handle: NodeHandle) -> Option<Detail<D>> {
        if handle.owner() != self.owner {
            return None;
        }
        self.unlink(handle);
        let slot = self.slots.get_mut(handle.index())?;
        match slot {
            Slot::Occupied { generation, .. } if *generation == handle.generation() => {}
            _ => return None,
        }
        let freed = Slot::Free {
            generation: handle.generation().wrapping_add(1),
            next_free: self.free_head,
        };
        let Slot::Occupied { node, .. } = core::mem::replace(slot, freed) else {
            return None;
        };
        self.free_head = Some(handle.slot());
        self.live -= 1;
        Some(Detail { id: node.id, data: node.data })
    }

    /// Drops every node and resets the anchors.
    ///
    /// Slots are kept and their generations bumped, so handles issued before the
    /// clear never resolve to nodes created after it.
    pub(crate) fn clear(&mut self) {
        self.anchors.reset();
        if self.live > 0 {
            let len = self.slots.len();
            for (idx, slot) in self.slots.iter_mut().enumerate() {
                let generation = match slot {
                    Slot::Occupied { generation, .. } => generation.wrapping_add(1),
                    Slot::Free { generation, .. } => *generation,
                };
                let next_free = if idx + 1 < len { u32::try_from(idx + 1).ok() } else { None };
                *slot = Slot::Free { generation, next_free };
            }
            self.free_head = if len > 0 { Some(0) } else { None };
        }
        self.live = 0;
    }
}

impl<D> fmt::Debug for NodeManager<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeManager")
            .field("kind", &self.kind)
            .field("live", &self.live)
            .field("slots", &self.slots.len())
            .field("anchors", &self.anchors)
            .finish()
    }
}

/// Write access to pointers and anchors, scoped to one `Structure::add` or
/// `Structure::remove` callback.
pub struct Wiring<'a, D> {
    manager: &'a mut NodeManager<D>,
}

impl<'a, D> Wiring<'a, D> {
    pub(crate) fn new(manager: &'a mut NodeManager<D>) -> Self {
        Self { manager }
    }

    /// Read access to the underlying manager.
    pub fn nodes(&self) -> &NodeManager<D> {
        self.manager
    }

    /// Resolves a pointer name.
    ///
    /// # Errors
    /// Returns `LinkError::Config` for unknown names.
    pub fn pointer_key(&self, name: &str) -> Result<PointerKey> {
        self.manager.keys.resolve(name)
    }

    /// Resolves an anchor name.
    ///
    /// # Errors
    /// Returns `LinkError::Config` for unknown names.
    pub fn anchor_key(&self, name: &str) -> Result<AnchorKey> {
        self.manager.anchors.resolve(name)
    }

    /// Reads a pointer.
    #[inline]
    pub fn pointer(&self, handle: NodeHandle, key: PointerKey) -> Option<NodeHandle> {
        self.manager.pointer(handle, key)
    }

    /// Writes one pointer.
    #[inline]
    pub fn set_pointer(&mut self, handle: NodeHandle, key: PointerKey, value: Option<NodeHandle>) {
        self.manager.set_pointer(handle, key, value);
    }

    /// Writes several pointers of one node.
    pub fn set_pointers(&mut self, handle: NodeHandle, values: &[(PointerKey, Option<NodeHandle>)]) {
        self.manager.set_pointers(handle, values);
    }

    /// Clears every pointer of `handle`.
    pub fn unlink(&mut self, handle: NodeHandle) {
        self.manager.unlink(handle);
    }

    /// Reads an anchor.
    #[inline]
    pub fn anchor(&self, key: AnchorKey) -> Option<NodeHandle> {
        self.manager.anchors.get_key(key)
    }

    /// Writes an anchor.
    #[inline]
    pub fn set_anchor(&mut self, key: AnchorKey, node: Option<NodeHandle>) {
        self.manager.anchors.set_key(key, node);
    }

    /// Writes an anchor by name.
    ///
    /// # Errors
    /// Returns `LinkError::Config` for unknown names.
    pub fn set_anchor_named(&mut self, name: &str, node: Option<NodeHandle>) -> Result<()> {
        self.manager.anchors.set(name, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NEXT;

    fn manager() -> NodeManager<u32> {
        NodeManager::new(&NodeManagerConfig::for_kind(StructureKind::SinglyLinear)).unwrap()
    }

    #[test]
    fn test_create_node_starts_unlinked() {
        let mut m = manager();
        let h = m.create_node(Detail::new("a", 1)).unwrap();
        let node = m.get(h).unwrap();
        assert_eq!(node.id(), "a");
        assert_eq!(*node.data(), 1);
        assert!(node.pointers().is_unlinked());
        assert_eq!(node.kind(), StructureKind::SinglyLinear);
        assert_eq!(m.live(), 1);
    }

    #[test]
    fn test_set_pointer_and_unlink() {
        let mut m = manager();
        let next = m.pointer_keys().resolve(NEXT).unwrap();
        let a = m.create_node(Detail::new("a", 1)).unwrap();
        let b = m.create_node(Detail::new("b", 2)).unwrap();
        m.set_pointer(a, next, Some(b));
        assert_eq!(m.pointer(a, next), Some(b));
        assert_eq!(m.node_ref(a).unwrap().next().unwrap().id(), "b");

        m.unlink(a);
        assert_eq!(m.pointer(a, next), None);
        assert!(m.contains(b));
    }

    #[test]
    fn test_destroy_reuses_slot_with_new_generation() {
        let mut m = manager();
        let a = m.create_node(Detail::new("a", 1)).unwrap();
        let detail = m.destroy(a).unwrap();
        assert_eq!(detail, Detail::new("a", 1));
        assert!(m.get(a).is_none());
        assert!(m.destroy(a).is_none());

        let b = m.create_node(Detail::new("b", 2)).unwrap();
        assert_eq!(b.index(), a.index());
        assert_ne!(b.generation(), a.generation());
        assert!(m.get(a).is_none());
        assert_eq!(m.get(b).unwrap().id(), "b");
        assert_eq!(m.live(), 1);
    }

    #[test]
    fn test_wiring_writes_through() {
        let mut m = manager();
        let a = m.create_node(Detail::new("a", 1)).unwrap();
        let mut w = Wiring::new(&mut m);
        let head = w.anchor_key("head").unwrap();
        w.set_anchor(head, Some(a));
        assert_eq!(w.anchor(head), Some(a));
        assert!(w.pointer_key("prev").is_err());
        assert!(m.anchors().is_anchor("head", a).unwrap());
    }

    #[test]
    fn test_foreign_handle_never_resolves() {
        let mut a = manager();
        let mut b = manager();
        assert_ne!(a.owner(), b.owner());
        let from_a = a.create_node(Detail::new("a", 1)).unwrap();
        let from_b = b.create_node(Detail::new("b", 2)).unwrap();
        assert_eq!(from_a.index(), from_b.index());
        assert_eq!(from_a.generation(), from_b.generation());

        assert!(b.get(from_a).is_none());
        assert!(!b.contains(from_a));
        assert!(b.data_mut(from_a).is_none());
        assert!(b.destroy(from_a).is_none());
        assert_eq!(b.live(), 1);
        assert_eq!(b.get(from_b).unwrap().id(), "b");
    }

    #[test]
    fn test_clear() {
        let mut m = manager();
        let a = m.create_node(Detail::new("a", 1)).unwrap();
        m.anchors_mut().set("head", Some(a)).unwrap();
        m.clear();
        assert_eq!(m.live(), 0);
        assert!(m.get(a).is_none());
        assert_eq!(m.anchors().get("head").unwrap(), None);

        let b = m.create_node(Detail::new("b", 2)).unwrap();
        assert_eq!(b.index(), a.index());
        assert!(m.get(a).is_none());
    }
}
