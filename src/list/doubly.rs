//! Doubly linked wiring: nodes carry `next` and `prev`.

use super::linked::LinkedList;
use super::topology::{unwire_common, LinkScheme, Links, Topology};
use super::traverse::Traverse;
use crate::config::StructureKind;
use crate::node::{NodeHandle, NodeManager, Wiring};

/// Link scheme for nodes with `next` and `prev` pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Doubly;

/// A list of doubly linked nodes.
pub type DoublyLinkedList<D> = LinkedList<D, Doubly>;

impl LinkScheme for Doubly {
    const DOUBLY: bool = true;

    fn kind(topology: Topology) -> StructureKind {
        match topology {
            Topology::Linear => StructureKind::DoublyLinear,
            Topology::Circular => StructureKind::DoublyCircular,
        }
    }

    fn accepts(kind: StructureKind) -> Option<Topology> {
        match kind {
            StructureKind::DoublyLinear => Some(Topology::Linear),
            StructureKind::DoublyCircular => Some(Topology::Circular),
            _ => None,
        }
    }

    fn wire_initial<D>(w: &mut Wiring<'_, D>, links: &Links, topology: Topology, node: NodeHandle) {
        w.set_anchor(links.head, Some(node));
        w.set_anchor(links.tail, Some(node));
        if topology.is_circular() {
            w.set_pointer(node, links.next, Some(node));
            if let Some(prev) = links.prev {
                w.set_pointer(node, prev, Some(node));
            }
        }
    }

    fn wire_head<D>(w: &mut Wiring<'_, D>, links: &Links, topology: Topology, node: NodeHandle) {
        let old_head = w.anchor(links.head);
        let tail = w.anchor(links.tail);
        w.set_pointer(node, links.next, old_head);
        if let (Some(prev), Some(old)) = (links.prev, old_head) {
            w.set_pointer(old, prev, Some(node));
        }
        w.set_anchor(links.head, Some(node));
        if topology.is_circular() {
            if let Some(prev) = links.prev {
                w.set_pointer(node, prev, tail);
            }
            if let Some(t) = tail {
                w.set_pointer(t, links.next, Some(node));
            }
        }
    }

    fn wire_tail<D>(w: &mut Wiring<'_, D>, links: &Links, topology: Topology, node: NodeHandle) {
        let old_tail = w.anchor(links.tail);
        let head = w.anchor(links.head);
        if let Some(prev) = links.prev {
            w.set_pointer(node, prev, old_tail);
        }
        if let Some(old) = old_tail {
            w.set_pointer(old, links.next, Some(node));
        }
        w.set_anchor(links.tail, Some(node));
        if topology.is_circular() {
            w.set_pointer(node, links.next, head);
            if let (Some(prev), Some(h)) = (links.prev, head) {
                w.set_pointer(h, prev, Some(node));
            }
        }
    }

    fn wire_after<D>(w: &mut Wiring<'_, D>, links: &Links, prev: NodeHandle, node: NodeHandle) {
        let next = w.pointer(prev, links.next);
        w.set_pointer(node, links.next, next);
        w.set_pointer(prev, links.next, Some(node));
        if let Some(prev_key) = links.prev {
            w.set_pointer(node, prev_key, Some(prev));
            if let Some(n) = next {
                w.set_pointer(n, prev_key, Some(node));
            }
        }
    }

    fn predecessor<D>(nodes: &NodeManager<D>, links: &Links, _topology: Topology, node: NodeHandle) -> Option<NodeHandle> {
        links.prev.and_then(|prev| nodes.pointer(node, prev))
    }

    fn unwire<D>(w: &mut Wiring<'_, D>, links: &Links, node: NodeHandle, pred: Option<NodeHandle>) {
        unwire_common(w, links, node, pred);
    }
}

impl<D> LinkedList<D, Doubly> {
    /// Walks `prev` pointers from `tail`.
    pub fn traverse_backward(&self) -> Traverse<'_, D> {
        let nodes = self.structure().nodes();
        let links = self.links();
        let start = links.prev.and_then(|_| links.tail(nodes));
        let key = links.prev.unwrap_or(links.next);
        Traverse::new(nodes, start, key, self.len())
    }
}
