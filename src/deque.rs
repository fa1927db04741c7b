//! `Deque`: double-ended queue over doubly linked nodes.
//!
//! Only the ends are reachable: `append`/`prepend` insert, `pop_head`/`pop_tail`
//! extract, all in O(1). A circular deque keeps `tail.next == head` and
//! `head.prev == tail` after every operation.
//!
//! ```
//! use strand::{Deque, Topology};
//!
//! let mut deque = Deque::new(Topology::Linear);
//! for i in 1..=3 {
//!     deque.append((i.to_string(), i)).unwrap();
//! }
//! let popped: Vec<_> = std::iter::from_fn(|| deque.pop_tail()).map(|d| d.data).collect();
//! assert_eq!(popped, [3, 2, 1]);
//! ```

use crate::config::{StructureConfig, StructureKind, HEAD, TAIL};
use crate::error::{LinkError, Result};
use crate::list::{Doubly, LinkScheme, Links, Target, Topology, Traverse};
use crate::node::{Detail, Entry, NodeHandle, NodeRef};
use crate::structure::{MaxSize, Structure};
use core::fmt;

/// A double-ended queue of identified payloads.
pub struct Deque<D> {
    structure: Structure<D>,
    links: Links,
    topology: Topology,
}

impl<D> Deque<D> {
    /// Creates an empty deque in dynamic size mode.
    pub fn new(topology: Topology) -> Self {
        Self::with_max_size(topology, MaxSize::Unbounded)
    }

    /// Creates an empty deque with a capacity limit.
    pub fn with_max_size(topology: Topology, max: impl Into<MaxSize>) -> Self {
        Self {
            structure: Structure::for_kind(kind_of(topology), max.into()),
            links: Links::canonical(true),
            topology,
        }
    }

    /// Creates an empty deque from a configuration.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] unless the kind is a deque kind and the
    /// configuration carries `head`/`tail` anchors and `next`/`prev` pointers.
    pub fn with_config(config: &StructureConfig) -> Result<Self> {
        if !matches!(config.kind, StructureKind::DequeLinear | StructureKind::DequeCircular) {
            return Err(LinkError::config(format!("`{}` is not a deque kind", config.kind.name())));
        }
        let topology = Topology::of(config.kind);
        config.validate_for(config.kind)?;
        let structure = Structure::new(config)?;
        let links = Links::resolve(structure.nodes(), true)?;
        Ok(Self {
            structure,
            links,
            topology,
        })
    }

    /// Builds a deque by appending every detail in order.
    ///
    /// # Errors
    /// Fails on the first duplicate id.
    pub fn try_from_details<I>(topology: Topology, details: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Detail<D>>,
    {
        let mut deque = Self::new(topology);
        for detail in details {
            deque.append(detail)?;
        }
        Ok(deque)
    }

    /// The topology.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// The structure kind.
    pub fn kind(&self) -> StructureKind {
        self.structure.kind()
    }

    /// The backing structure.
    pub fn structure(&self) -> &Structure<D> {
        &self.structure
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.structure.size()
    }

    /// Returns `true` if the deque holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.structure.is_empty()
    }

    /// Returns `true` if no further node fits.
    pub fn is_full(&self) -> bool {
        self.structure.is_full()
    }

    /// The configured maximum size.
    pub fn max_size(&self) -> MaxSize {
        self.structure.max_size()
    }

    /// Changes the maximum size.
    ///
    /// # Errors
    /// Returns [`LinkError::Capacity`] if `max` is below the current size.
    pub fn set_max_size(&mut self, max: impl Into<MaxSize>) -> Result<()> {
        self.structure.set_max_size(max.into())
    }

    /// Remaining room.
    pub fn capacity(&self) -> MaxSize {
        self.structure.capacity()
    }

    /// Returns `true` if a node with `id` is present.
    pub fn has(&self, id: &str) -> bool {
        self.structure.has(id)
    }

    /// The node at `index` counted from the head, or `None` when out of range.
    pub fn get_by_index(&self, index: usize) -> Option<Entry<'_, D>> {
        let handle = self.handle_at(index)?;
        let node = self.structure.node(handle)?;
        Some(Entry { node, index })
    }

    /// The node with `id`, with its index.
    pub fn get_by_id(&self, id: &str) -> Option<Entry<'_, D>> {
        let handle = self.structure.lookup(id)?;
        let index = self.index_of(handle)?;
        let node = self.structure.node(handle)?;
        Some(Entry { node, index })
    }

    /// The node at an index or with an id.
    pub fn get(&self, target: impl Into<Target>) -> Option<Entry<'_, D>> {
        match target.into() {
            Target::Index(index) => self.get_by_index(index),
            Target::Id(id) => self.get_by_id(&id),
        }
    }

    /// The first entry in traversal order matching `pred`.
    pub fn find<'a>(&'a self, mut pred: impl FnMut(&Entry<'a, D>) -> bool) -> Option<Entry<'a, D>> {
        self.iter().find(|entry| pred(entry))
    }

    /// Maps every entry in traversal order.
    pub fn map<'a, R>(&'a self, f: impl FnMut(Entry<'a, D>) -> R) -> Vec<R> {
        self.iter().map(f).collect()
    }

    /// Entries matching `pred`, in traversal order.
    pub fn filter<'a>(&'a self, mut pred: impl FnMut(&Entry<'a, D>) -> bool) -> Vec<Entry<'a, D>> {
        self.iter().filter(|entry| pred(entry)).collect()
    }

    /// Folds every entry in traversal order.
    pub fn reduce<'a, A>(&'a self, init: A, f: impl FnMut(A, Entry<'a, D>) -> A) -> A {
        self.iter().fold(init, f)
    }

    /// Calls `f` on every entry in traversal order.
    pub fn for_each<'a>(&'a self, f: impl FnMut(Entry<'a, D>)) {
        self.iter().for_each(f);
    }

    /// Mutable payload access by id.
    pub fn data_mut(&mut self, id: &str) -> Option<&mut D> {
        self.structure.data_mut(id)
    }

    /// The first node.
    pub fn head(&self) -> Option<NodeRef<'_, D>> {
        self.links.head(self.structure.nodes()).and_then(|h| self.structure.node(h))
    }

    /// The last node.
    pub fn tail(&self) -> Option<NodeRef<'_, D>> {
        self.links.tail(self.structure.nodes()).and_then(|h| self.structure.node(h))
    }

    /// Same as [`Deque::head`].
    pub fn peek_head(&self) -> Option<NodeRef<'_, D>> {
        self.head()
    }

    /// Same as [`Deque::tail`].
    pub fn peek_tail(&self) -> Option<NodeRef<'_, D>> {
        self.tail()
    }

    /// Inserts at the tail.
    ///
    /// # Errors
    /// [`LinkError::Capacity`] when full, [`LinkError::DuplicateId`] on id reuse.
    pub fn append(&mut self, detail: impl Into<Detail<D>>) -> Result<NodeHandle> {
        let (links, topology) = (self.links, self.topology);
        self.structure.add(detail.into(), move |w, node| {
            if w.anchor(links.head).is_none() {
                Doubly::wire_initial(w, &links, topology, node);
            } else {
                Doubly::wire_tail(w, &links, topology, node);
            }
            node
        })
    }

    /// Inserts at the head.
    ///
    /// # Errors
    /// [`LinkError::Capacity`] when full, [`LinkError::DuplicateId`] on id reuse.
    pub fn prepend(&mut self, detail: impl Into<Detail<D>>) -> Result<NodeHandle> {
        let (links, topology) = (self.links, self.topology);
        self.structure.add(detail.into(), move |w, node| {
            if w.anchor(links.head).is_none() {
                Doubly::wire_initial(w, &links, topology, node);
            } else {
                Doubly::wire_head(w, &links, topology, node);
            }
            node
        })
    }

    /// Removes the head, or returns `None` when empty.
    pub fn pop_head(&mut self) -> Option<Detail<D>> {
        let head = self.links.head(self.structure.nodes())?;
        self.detach(head)
    }

    /// Removes the tail, or returns `None` when empty.
    pub fn pop_tail(&mut self) -> Option<Detail<D>> {
        let tail = self.links.tail(self.structure.nodes())?;
        self.detach(tail)
    }

    /// Removes the head.
    ///
    /// # Errors
    /// Returns [`LinkError::Underflow`] when empty.
    pub fn try_pop_head(&mut self) -> Result<Detail<D>> {
        self.structure.sizing().assert_can_remove(self.len())?;
        self.pop_head().ok_or_else(|| LinkError::UnknownId(HEAD.to_owned()))
    }

    /// Removes the tail.
    ///
    /// # Errors
    /// Returns [`LinkError::Underflow`] when empty.
    pub fn try_pop_tail(&mut self) -> Result<Detail<D>> {
        self.structure.sizing().assert_can_remove(self.len())?;
        self.pop_tail().ok_or_else(|| LinkError::UnknownId(TAIL.to_owned()))
    }

    /// Walks `next` pointers from the primary anchor.
    pub fn iter(&self) -> Traverse<'_, D> {
        let nodes = self.structure.nodes();
        let start = nodes.anchors().get_key(nodes.anchors().primary());
        Traverse::new(nodes, start, self.links.next, self.len())
    }

    /// Walks `prev` pointers from the tail.
    pub fn iter_backward(&self) -> Traverse<'_, D> {
        let nodes = self.structure.nodes();
        let key = self.links.prev.unwrap_or(self.links.next);
        Traverse::new(nodes, self.links.tail(nodes), key, self.len())
    }

    /// Removes every node.
    pub fn reset(&mut self) {
        self.structure.reset();
    }

    /// Verifies size, anchor and pointer invariants, describing the first violation.
    ///
    /// # Errors
    /// Returns a description of the first violated invariant.
    pub fn check_invariants(&self) -> core::result::Result<(), String> {
        crate::list::topology::verify(&self.structure, &self.links, self.topology)
    }

    /// Walks from whichever end is closer.
    fn handle_at(&self, index: usize) -> Option<NodeHandle> {
        let len = self.len();
        if index >= len {
            return None;
        }
        let nodes = self.structure.nodes();
        if let (true, Some(prev)) = (index > len / 2, self.links.prev) {
            let mut current = self.links.tail(nodes)?;
            for _ in 0..(len - 1 - index) {
                current = nodes.pointer(current, prev)?;
            }
            return Some(current);
        }
        let mut current = self.links.head(nodes)?;
        for _ in 0..index {
            current = nodes.pointer(current, self.links.next)?;
        }
        Some(current)
    }

    fn index_of(&self, handle: NodeHandle) -> Option<usize> {
        let nodes = self.structure.nodes();
        let mut current = self.links.head(nodes)?;
        for index in 0..self.len() {
            if current == handle {
                return Some(index);
            }
            current = nodes.pointer(current, self.links.next)?;
        }
        None
    }

    fn detach(&mut self, handle: NodeHandle) -> Option<Detail<D>> {
        let links = self.links;
        let pred = Doubly::predecessor(self.structure.nodes(), &links, self.topology, handle);
        self.structure
            .release(handle, move |w, node| Doubly::unwire(w, &links, node, pred))
            .map(|removed| removed.detail)
    }
}

const fn kind_of(topology: Topology) -> StructureKind {
    match topology {
        Topology::Linear => StructureKind::DequeLinear,
        Topology::Circular => StructureKind::DequeCircular,
    }
}

impl<D> Default for Deque<D> {
    fn default() -> Self {
        Self::new(Topology::Linear)
    }
}

impl<'a, D> IntoIterator for &'a Deque<D> {
    type Item = Entry<'a, D>;
    type IntoIter = Traverse<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<D> fmt::Display for Deque<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for entry in self.iter() {
            if entry.index > 0 {
                f.write_str(" <-> ")?;
            }
            f.write_str(entry.id())?;
        }
        write!(f, "] ({}, size {}/{})", self.kind().name(), self.len(), self.max_size())
    }
}

impl<D: fmt::Debug> fmt::Debug for Deque<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deque")
            .field("kind", &self.kind())
            .field("len", &self.len())
            .field("max_size", &self.max_size())
            .field("nodes", &self.iter().map(|e| (e.id(), e.data())).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn drain_tail(deque: &mut Deque<i32>) -> Vec<i32> {
        std::iter::from_fn(|| deque.pop_tail()).map(|d| d.data).collect()
    }

    fn drain_head(deque: &mut Deque<i32>) -> Vec<i32> {
        std::iter::from_fn(|| deque.pop_head()).map(|d| d.data).collect()
    }

    #[test]
    fn test_append_then_pop_tail_is_lifo() {
        for topology in [Topology::Linear, Topology::Circular] {
            let mut deque = Deque::new(topology);
            for i in 1..=3 {
                deque.append((i.to_string(), i)).unwrap();
                deque.check_invariants().unwrap();
            }
            assert_eq!(drain_tail(&mut deque), [3, 2, 1]);
            assert!(deque.is_empty());
            assert!(deque.peek_head().is_none());
            assert!(deque.peek_tail().is_none());
        }
    }

    #[test]
    fn test_prepend_then_pop_head() {
        for topology in [Topology::Linear, Topology::Circular] {
            let mut deque = Deque::new(topology);
            for i in 1..=3 {
                deque.prepend((i.to_string(), i)).unwrap();
            }
            assert_eq!(drain_head(&mut deque), [3, 2, 1]);
        }
    }

    #[test]
    fn test_circular_wrap_after_pop() {
        let mut deque = Deque::try_from_details(Topology::Circular, [("a", 1), ("b", 2), ("c", 3)]).unwrap();
        deque.pop_tail().unwrap();
        let tail = deque.peek_tail().unwrap();
        assert_eq!(tail.id(), "b");
        assert_eq!(tail.next().map(|n| n.id()), Some("a"));
        assert_eq!(deque.peek_head().and_then(|n| n.prev()).map(|n| n.id()), Some("b"));
        deque.check_invariants().unwrap();

        deque.pop_head().unwrap();
        let only = deque.peek_head().unwrap();
        assert_eq!(only.next().map(|n| n.id()), Some("b"));
        assert_eq!(only.prev().map(|n| n.id()), Some("b"));
        deque.check_invariants().unwrap();
    }

    #[test]
    fn test_try_pop_on_empty() {
        let mut deque: Deque<i32> = Deque::default();
        assert!(deque.pop_head().is_none());
        assert_eq!(deque.try_pop_head().unwrap_err().kind(), ErrorKind::Underflow);
        assert_eq!(deque.try_pop_tail().unwrap_err().kind(), ErrorKind::Underflow);
    }

    #[test]
    fn test_capacity_and_duplicates() {
        let mut deque = Deque::with_max_size(Topology::Linear, 2_usize);
        deque.append(("a", 1)).unwrap();
        assert_eq!(deque.prepend(("a", 2)).unwrap_err().kind(), ErrorKind::DuplicateId);
        deque.prepend(("b", 2)).unwrap();
        assert!(deque.is_full());
        assert_eq!(deque.append(("c", 3)).unwrap_err().kind(), ErrorKind::Capacity);
        assert_eq!(deque.to_string(), "[b <-> a] (deque/linear, size 2/2)");
        assert_eq!(deque.iter_backward().map(|e| e.id()).collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn test_with_config() {
        let config = StructureConfig::for_kind(StructureKind::DequeCircular);
        let deque: Deque<u8> = Deque::with_config(&config).unwrap();
        assert_eq!(deque.topology(), Topology::Circular);

        let config = StructureConfig::for_kind(StructureKind::DoublyLinear);
        assert_eq!(Deque::<u8>::with_config(&config).unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn test_queries_by_index_id_and_predicate() {
        for topology in [Topology::Linear, Topology::Circular] {
            let deque = Deque::try_from_details(topology, (0..7).map(|i| (format!("n{i}"), i))).unwrap();
            assert_eq!(deque.head().map(|n| n.id()), Some("n0"));
            assert_eq!(deque.tail().map(|n| n.id()), Some("n6"));
            for i in 0..7 {
                let entry = deque.get_by_index(i).unwrap();
                assert_eq!(*entry.data(), i32::try_from(i).unwrap());
                assert_eq!(deque.get(entry.id()).map(|e| e.index), Some(i));
            }
            assert!(deque.get(7).is_none());
            assert!(deque.get("missing").is_none());
            assert_eq!(deque.get_by_id("n5").map(|e| e.index), Some(5));

            assert_eq!(deque.find(|e| *e.data() > 3).map(|e| e.id()), Some("n4"));
            assert_eq!(deque.map(|e| *e.data() * 10)[..3], [0, 10, 20]);
            assert_eq!(deque.filter(|e| e.data() % 3 == 0).len(), 3);
            assert_eq!(deque.reduce(0, |acc, e| acc + *e.data()), 21);
            let mut seen = Vec::new();
            deque.for_each(|e| seen.push(e.index));
            assert_eq!(seen, (0..7).collect::<Vec<_>>());
        }
    }
}
