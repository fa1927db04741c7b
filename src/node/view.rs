//! Read-only node views handed to callers, and the owned `Detail` used to create nodes.

use super::{NodeHandle, NodeManager, PointerKey};
use crate::config::StructureKind;
use core::fmt;

/// The caller-supplied `{id, data}` pair a node is created from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Detail<D> {
    /// Identifier, unique within one structure.
    pub id: String,
    /// Payload.
    pub data: D,
}

impl<D> Detail<D> {
    /// Creates a detail.
    pub fn new(id: impl Into<String>, data: D) -> Self {
        Self { id: id.into(), data }
    }
}

impl<S: Into<String>, D> From<(S, D)> for Detail<D> {
    fn from((id, data): (S, D)) -> Self {
        Self::new(id, data)
    }
}

/// A borrowed, read-only view of a live node.
///
/// Pointers can be followed but not written: the only writer is the owning
/// [`NodeManager`].
pub struct NodeRef<'a, D> {
    manager: &'a NodeManager<D>,
    handle: NodeHandle,
    kind: StructureKind,
    id: &'a str,
    data: &'a D,
}

impl<'a, D> Clone for NodeRef<'a, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, D> Copy for NodeRef<'a, D> {}

impl<'a, D> NodeRef<'a, D> {
    pub(crate) fn new(manager: &'a NodeManager<D>, handle: NodeHandle) -> Option<Self> {
        let node = manager.get(handle)?;
        Some(Self {
            manager,
            handle,
            kind: node.kind,
            id: &node.id,
            data: &node.data,
        })
    }

    /// The node's handle.
    pub fn handle(&self) -> NodeHandle {
        self.handle
    }

    /// Kind tag of the owning structure.
    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    /// The node id.
    pub fn id(&self) -> &'a str {
        self.id
    }

    /// The node payload.
    pub fn data(&self) -> &'a D {
        self.data
    }

    /// Follows a resolved pointer.
    pub fn follow(&self, key: PointerKey) -> Option<NodeRef<'a, D>> {
        let target = self.manager.pointer(self.handle, key)?;
        NodeRef::new(self.manager, target)
    }

    /// Follows a pointer by name. Unknown names resolve to `None`.
    pub fn pointer(&self, name: &str) -> Option<NodeRef<'a, D>> {
        let key = self.manager.pointer_keys().resolve(name).ok()?;
        self.follow(key)
    }

    /// Follows `next`.
    pub fn next(&self) -> Option<NodeRef<'a, D>> {
        self.pointer(crate::config::NEXT)
    }

    /// Follows `prev`. Always `None` for singly linked nodes.
    pub fn prev(&self) -> Option<NodeRef<'a, D>> {
        self.pointer(crate::config::PREV)
    }
}

impl<'a, D: fmt::Debug> fmt::Debug for NodeRef<'a, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Neighbours are printed by id only so circular graphs stay finite.
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("data", self.data)
            .field("next", &self.next().map(|n| n.id))
            .field("prev", &self.prev().map(|n| n.id))
            .finish()
    }
}

/// A node together with its position in traversal order.
pub struct Entry<'a, D> {
    /// The node.
    pub node: NodeRef<'a, D>,
    /// Zero-based position from the traversal start.
    pub index: usize,
}

impl<'a, D> Clone for Entry<'a, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, D> Copy for Entry<'a, D> {}

impl<'a, D> Entry<'a, D> {
    /// Shorthand for `self.node.id()`.
    pub fn id(&self) -> &'a str {
        self.node.id()
    }

    /// Shorthand for `self.node.data()`.
    pub fn data(&self) -> &'a D {
        self.node.data()
    }
}

impl<'a, D: fmt::Debug> fmt::Debug for Entry<'a, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.node.id())
            .field("index", &self.index)
            .field("data", self.node.data())
            .finish()
    }
}
