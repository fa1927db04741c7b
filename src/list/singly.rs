//! Singly linked wiring: nodes carry only `next`.

use super::linked::LinkedList;
use super::topology::{unwire_common, LinkScheme, Links, Topology};
use crate::config::StructureKind;
use crate::node::{NodeHandle, NodeManager, Wiring};

/// Link scheme for nodes with a single `next` pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Singly;

/// A list of singly linked nodes.
pub type SinglyLinkedList<D> = LinkedList<D, Singly>;

impl LinkScheme for Singly {
    const DOUBLY: bool = false;

    fn kind(topology: Topology) -> StructureKind {
        match topology {
            Topology::Linear => StructureKind::SinglyLinear,
            Topology::Circular => StructureKind::SinglyCircular,
        }
    }

    fn accepts(kind: StructureKind) -> Option<Topology> {
        match kind {
            StructureKind::SinglyLinear => Some(Topology::Linear),
            StructureKind::SinglyCircular => Some(Topology::Circular),
            _ => None,
        }
    }

    fn wire_initial<D>(w: &mut Wiring<'_, D>, links: &Links, topology: Topology, node: NodeHandle) {
        w.set_anchor(links.head, Some(node));
        w.set_anchor(links.tail, Some(node));
        if topology.is_circular() {
            w.set_pointer(node, links.next, Some(node));
        }
    }

    fn wire_head<D>(w: &mut Wiring<'_, D>, links: &Links, topology: Topology, node: NodeHandle) {
        let old_head = w.anchor(links.head);
        w.set_pointer(node, links.next, old_head);
        w.set_anchor(links.head, Some(node));
        if topology.is_circular() {
            if let Some(tail) = w.anchor(links.tail) {
                w.set_pointer(tail, links.next, Some(node));
            }
        }
    }

    fn wire_tail<D>(w: &mut Wiring<'_, D>, links: &Links, topology: Topology, node: NodeHandle) {
        if let Some(old_tail) = w.anchor(links.tail) {
            w.set_pointer(old_tail, links.next, Some(node));
        }
        w.set_anchor(links.tail, Some(node));
        let wrap = if topology.is_circular() { w.anchor(links.head) } else { None };
        w.set_pointer(node, links.next, wrap);
    }

    fn wire_after<D>(w: &mut Wiring<'_, D>, links: &Links, prev: NodeHandle, node: NodeHandle) {
        let next = w.pointer(prev, links.next);
        w.set_pointer(node, links.next, next);
        w.set_pointer(prev, links.next, Some(node));
    }

    /// Forward scan from `head`; the head's predecessor is the tail when circular.
    fn predecessor<D>(nodes: &NodeManager<D>, links: &Links, topology: Topology, node: NodeHandle) -> Option<NodeHandle> {
        let head = links.head(nodes)?;
        if head == node {
            return if topology.is_circular() { links.tail(nodes) } else { None };
        }
        let mut current = head;
        for _ in 0..nodes.live() {
            let next = nodes.pointer(current, links.next)?;
            if next == node {
                return Some(current);
            }
            if next == head {
                return None;
            }
            current = next;
        }
        None
    }

    fn unwire<D>(w: &mut Wiring<'_, D>, links: &Links, node: NodeHandle, pred: Option<NodeHandle>) {
        unwire_common(w, links, node, pred);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::list::{Position, Target};
    use crate::node::Detail;
    use crate::structure::MaxSize;

    fn abc(topology: Topology) -> SinglyLinkedList<&'static str> {
        SinglyLinkedList::try_from_details(topology, [("1", "A"), ("2", "B"), ("3", "C")]).unwrap()
    }

    fn ids<'a, S: LinkScheme>(list: &'a LinkedList<&'static str, S>) -> Vec<&'a str> {
        list.ids().collect()
    }

    #[test]
    fn test_append_traverses_in_order() {
        let list = abc(Topology::Linear);
        let walked: Vec<_> = list.traverse().map(|e| (e.id().to_owned(), e.index)).collect();
        assert_eq!(walked, vec![("1".into(), 0), ("2".into(), 1), ("3".into(), 2)]);
        assert_eq!(list.to_vec(), vec!["A", "B", "C"]);
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_head_of_single_node() {
        let mut list = SinglyLinkedList::linear();
        list.insert_tail(("only", 1)).unwrap();
        assert_eq!(list.remove_head().unwrap(), Detail::new("only", 1));
        assert_eq!(list.len(), 0);
        assert!(list.head().is_none());
        assert!(list.tail().is_none());
        assert_eq!(list.remove_head().unwrap_err().kind(), ErrorKind::Underflow);
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_out_of_range_index_is_absent() {
        let mut list = abc(Topology::Linear);
        assert!(list.get_by_index(99).is_none());
        assert!(list.extract(99).is_none());
        assert!(list.get("missing").is_none());
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_circular_wraps_and_terminates() {
        let mut list = abc(Topology::Circular);
        list.insert_head(("0", "Z")).unwrap();
        assert_eq!(ids(&list), ["0", "1", "2", "3"]);
        let tail = list.tail().unwrap();
        assert_eq!(tail.next().map(|n| n.id()), Some("0"));
        assert_eq!(list.to_string(), "[0 -> 1 -> 2 -> 3 -> 0] (singly/circular, size 4/∞)");
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut list = abc(Topology::Linear);
        list.insert_before(("h", "H"), "1").unwrap();
        list.insert_before(("m", "M"), "3").unwrap();
        list.insert_after(("t", "T"), "3").unwrap();
        list.insert_after(("x", "X"), 0).unwrap();
        assert_eq!(ids(&list), ["h", "x", "1", "2", "m", "3", "t"]);
        assert_eq!(list.tail().map(|n| n.id()), Some("t"));
        let err = list.insert_after(("y", "Y"), "nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TargetNotFound);
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_insert_at_clamps_to_tail() {
        let mut list = abc(Topology::Circular);
        list.insert_at(1, ("a", "a")).unwrap();
        list.insert_at(100, ("z", "z")).unwrap();
        assert_eq!(ids(&list), ["1", "a", "2", "3", "z"]);
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_extract_relinks_neighbours() {
        let mut list = abc(Topology::Circular);
        let mid = list.extract("2").unwrap();
        assert_eq!(mid.index, 1);
        assert_eq!(mid.detail.data, "B");
        let tail = list.extract(1).unwrap();
        assert_eq!(tail.detail.id, "3");
        assert_eq!(list.tail().map(|n| n.id()), Some("1"));
        assert_eq!(list.head().and_then(|n| n.next()).map(|n| n.id()), Some("1"));
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_extract_by_predicate() {
        let mut list = abc(Topology::Linear);
        let found = list.extract_by(|e| *e.data() == "C").unwrap();
        assert_eq!((found.detail.id.as_str(), found.index), ("3", 2));
        assert!(list.extract_by(|e| *e.data() == "C").is_none());
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_get_prev_scans() {
        let list = abc(Topology::Linear);
        assert_eq!(list.get_prev("3").map(|n| n.id()), Some("2"));
        assert!(list.get_prev("1").is_none());
        let circular = abc(Topology::Circular);
        assert_eq!(circular.get_prev("1").map(|n| n.id()), Some("3"));
    }

    #[test]
    fn test_move_node() {
        let mut list = abc(Topology::Linear);
        list.move_node("1", "3", Position::After).unwrap();
        assert_eq!(ids(&list), ["2", "3", "1"]);
        list.move_node(Target::Index(2), "2", Position::Before).unwrap();
        assert_eq!(ids(&list), ["1", "2", "3"]);
        list.move_node("2", "2", Position::Before).unwrap();
        assert_eq!(ids(&list), ["1", "2", "3"]);
        assert_eq!(list.move_node("9", "2", Position::After).unwrap_err().kind(), ErrorKind::TargetNotFound);
        list.check_invariants().unwrap();
    }

    #[test]
    fn test_bounded_list() {
        let mut list = SinglyLinkedList::with_max_size(Topology::Linear, 2_usize);
        list.insert_tail(("a", 1)).unwrap();
        list.insert_tail(("b", 2)).unwrap();
        assert!(list.is_full());
        assert_eq!(list.insert_head(("c", 3)).unwrap_err().kind(), ErrorKind::Capacity);
        list.move_node("a", "b", Position::After).unwrap();
        assert_eq!(list.set_max_size(1_usize).unwrap_err().kind(), ErrorKind::Capacity);
        list.set_max_size(MaxSize::Unbounded).unwrap();
        assert_eq!(list.capacity(), MaxSize::Unbounded);
    }

    #[test]
    fn test_queries() {
        let list = abc(Topology::Linear);
        assert_eq!(list.find(|e| e.data().starts_with('B')).map(|e| e.index), Some(1));
        assert_eq!(list.map(|e| e.data().to_lowercase()), vec!["a", "b", "c"]);
        assert_eq!(list.filter(|e| e.index != 1).len(), 2);
        assert_eq!(list.reduce(String::new(), |acc, e| acc + *e.data()), "ABC");
        let mut seen = 0;
        list.for_each(|_| seen += 1);
        assert_eq!(seen, 3);
        assert_eq!(list.get_by_id("3").map(|e| e.index), Some(2));
    }

    #[test]
    fn test_into_details_and_reset() {
        let mut list = abc(Topology::Circular);
        list.reset();
        list.reset();
        assert!(list.is_empty());
        list.extend_tail([("x", "X"), ("y", "Y")]).unwrap();
        let details = list.into_details();
        assert_eq!(details, vec![Detail::new("x", "X"), Detail::new("y", "Y")]);
    }
}
