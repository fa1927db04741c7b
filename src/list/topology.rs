//! Topology selection and the linking strategy trait.
//!
//! The insert/extract/move/traverse algorithms are shared by every list; what
//! differs between singly and doubly linked nodes, and between linear and
//! circular topologies, is a handful of wiring primitives. [`LinkScheme`]
//! collects those primitives; [`Topology`] selects the terminal-pointer rule.

use crate::config::{StructureKind, HEAD, NEXT, PREV, TAIL};
use crate::error::Result;
use crate::node::{AnchorKey, NodeHandle, NodeManager, PointerKey, Wiring};
use crate::structure::{MaxSize, Structure};

/// Terminal-pointer rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Topology {
    /// Terminal pointers are absent.
    #[default]
    Linear,
    /// `tail.next` is `head` (and `head.prev` is `tail` for doubly linked nodes).
    Circular,
}

impl Topology {
    /// Returns `true` for [`Topology::Circular`].
    pub const fn is_circular(self) -> bool {
        matches!(self, Self::Circular)
    }

    pub(crate) const fn of(kind: StructureKind) -> Self {
        if kind.is_circular() {
            Self::Circular
        } else {
            Self::Linear
        }
    }
}

/// Resolved anchor and pointer keys used by the wiring primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Links {
    pub(crate) head: AnchorKey,
    pub(crate) tail: AnchorKey,
    pub(crate) next: PointerKey,
    pub(crate) prev: Option<PointerKey>,
}

impl Links {
    /// Keys of the canonical layout built by `Structure::for_kind`.
    pub(crate) const fn canonical(doubly: bool) -> Self {
        Self {
            head: AnchorKey(0),
            tail: AnchorKey(1),
            next: PointerKey(0),
            prev: if doubly { Some(PointerKey(1)) } else { None },
        }
    }

    /// Resolves `head`/`tail` and `next` (plus `prev` when `doubly`) against `nodes`.
    pub(crate) fn resolve<D>(nodes: &NodeManager<D>, doubly: bool) -> Result<Self> {
        let anchors = nodes.anchors();
        let keys = nodes.pointer_keys();
        Ok(Self {
            head: anchors.resolve(HEAD)?,
            tail: anchors.resolve(TAIL)?,
            next: keys.resolve(NEXT)?,
            prev: if doubly { Some(keys.resolve(PREV)?) } else { None },
        })
    }

    pub(crate) fn head<D>(&self, nodes: &NodeManager<D>) -> Option<NodeHandle> {
        nodes.anchors().get_key(self.head)
    }

    pub(crate) fn tail<D>(&self, nodes: &NodeManager<D>) -> Option<NodeHandle> {
        nodes.anchors().get_key(self.tail)
    }
}

/// Wiring primitives a linked topology provides to the shared algorithms.
///
/// Implemented by [`Singly`](super::Singly) and [`Doubly`](super::Doubly).
/// All `wire_*` functions run inside a `Structure::add` callback with `node`
/// freshly created and unlinked; `unwire` runs inside a `Structure::remove`
/// callback.
pub trait LinkScheme {
    /// `true` if nodes carry a `prev` pointer.
    const DOUBLY: bool;

    /// Structure kind for `topology`.
    fn kind(topology: Topology) -> StructureKind;

    /// Returns the topology a structure kind selects, if this scheme accepts it.
    fn accepts(kind: StructureKind) -> Option<Topology>;

    /// First node of an empty structure: both anchors, self-loop when circular.
    fn wire_initial<D>(w: &mut Wiring<'_, D>, links: &Links, topology: Topology, node: NodeHandle);

    /// New head of a non-empty structure.
    fn wire_head<D>(w: &mut Wiring<'_, D>, links: &Links, topology: Topology, node: NodeHandle);

    /// New tail of a non-empty structure.
    fn wire_tail<D>(w: &mut Wiring<'_, D>, links: &Links, topology: Topology, node: NodeHandle);

    /// Splices `node` directly after `prev`, which is not the tail.
    fn wire_after<D>(w: &mut Wiring<'_, D>, links: &Links, prev: NodeHandle, node: NodeHandle);

    /// The node whose `next` is `node`.
    fn predecessor<D>(nodes: &NodeManager<D>, links: &Links, topology: Topology, node: NodeHandle) -> Option<NodeHandle>;

    /// Links the neighbours of `node` around it and moves anchors off it.
    /// `pred` is the value [`LinkScheme::predecessor`] returned for `node`.
    fn unwire<D>(w: &mut Wiring<'_, D>, links: &Links, node: NodeHandle, pred: Option<NodeHandle>);
}

/// Shared body of `unwire`: relinks `pred.next` (and `next.prev` when doubly)
/// and moves the anchors.
pub(crate) fn unwire_common<D>(w: &mut Wiring<'_, D>, links: &Links, node: NodeHandle, pred: Option<NodeHandle>) {
    let head = w.anchor(links.head);
    let tail = w.anchor(links.tail);
    if head == Some(node) && tail == Some(node) {
        w.set_anchor(links.head, None);
        w.set_anchor(links.tail, None);
        return;
    }
    let next = w.pointer(node, links.next);
    if let Some(p) = pred {
        w.set_pointer(p, links.next, next);
    }
    if let (Some(prev_key), Some(n)) = (links.prev, next) {
        w.set_pointer(n, prev_key, pred);
    }
    if head == Some(node) {
        w.set_anchor(links.head, next);
    }
    if tail == Some(node) {
        w.set_anchor(links.tail, pred);
    }
}

/// Verifies size, anchor and pointer-relation invariants of a linked structure.
pub(crate) fn verify<D>(structure: &Structure<D>, links: &Links, topology: Topology) -> core::result::Result<(), String> {
    let nodes = structure.nodes();
    let size = structure.recompute_size();
    if size != nodes.live() {
        return Err(format!("id index holds {size} ids but the arena holds {} nodes", nodes.live()));
    }
    if let MaxSize::Bounded(max) = structure.max_size() {
        if size > max {
            return Err(format!("size {size} exceeds max size {max}"));
        }
    }

    let (head, tail) = match (links.head(nodes), links.tail(nodes)) {
        (None, None) if size == 0 => return Ok(()),
        (Some(h), Some(t)) if size > 0 => (h, t),
        (h, t) => return Err(format!("anchors head={h:?} tail={t:?} inconsistent with size {size}")),
    };
    for anchor in [head, tail] {
        let node = nodes.get(anchor).ok_or_else(|| format!("anchor {anchor:?} is dangling"))?;
        if structure.lookup(node.id()) != Some(anchor) {
            return Err(format!("anchor {anchor:?} is not registered"));
        }
    }

    let mut current = head;
    for index in 0..size {
        let next = nodes.pointer(current, links.next);
        if let (Some(prev_key), Some(n)) = (links.prev, next) {
            if nodes.pointer(n, prev_key) != Some(current) {
                return Err(format!("prev of {n:?} does not point back to {current:?}"));
            }
        }
        if index + 1 == size {
            if current != tail {
                return Err(format!("walk ended at {current:?}, tail is {tail:?}"));
            }
            let expected = if topology.is_circular() { Some(head) } else { None };
            if next != expected {
                return Err(format!("tail.next is {next:?}, expected {expected:?}"));
            }
        } else {
            current = next.ok_or_else(|| format!("walk ended early at index {index}"))?;
            if current == head {
                return Err(format!("cycle back to head after {} of {size} nodes", index + 1));
            }
        }
    }

    if let Some(prev_key) = links.prev {
        let expected = if topology.is_circular() { Some(tail) } else { None };
        let actual = nodes.pointer(head, prev_key);
        if actual != expected {
            return Err(format!("head.prev is {actual:?}, expected {expected:?}"));
        }
    }
    Ok(())
}
