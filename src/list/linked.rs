//! `LinkedList`: the insert/extract/move/query algorithms shared by every
//! list topology.
//!
//! The list is generic over a [`LinkScheme`] (singly or doubly linked nodes)
//! and carries a runtime [`Topology`] (linear or circular). Everything here goes
//! through `Structure::add`/`Structure::release`, so size accounting, id
//! uniqueness and capacity are enforced in one place.
//!
//! Indices count from `head`. Traversal starts at the primary anchor, which is
//! `head` unless changed with [`LinkedList::set_primary_anchor`].

use super::topology::{verify, LinkScheme, Links, Topology};
use super::traverse::Traverse;
use crate::config::{check_primary_anchor, StructureConfig, StructureKind, HEAD, TAIL};
use crate::error::{LinkError, Result};
use crate::node::{Detail, Entry, NodeHandle, NodeRef};
use crate::structure::{MaxSize, SizeMode, Structure};
use core::fmt;
use core::marker::PhantomData;

/// Locates a node by position or by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// Zero-based position from `head`.
    Index(usize),
    /// Node id.
    Id(String),
}

impl From<usize> for Target {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Self::Id(id.to_owned())
    }
}

impl From<String> for Target {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<&String> for Target {
    fn from(id: &String) -> Self {
        Self::Id(id.clone())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "index {index}"),
            Self::Id(id) => write!(f, "id `{id}`"),
        }
    }
}

/// Where [`LinkedList::move_node`] re-inserts relative to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    /// Directly before the destination.
    Before,
    /// Directly after the destination.
    #[default]
    After,
}

/// A node taken out of a list, with the index it had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<D> {
    /// Id and payload.
    pub detail: Detail<D>,
    /// Position the node occupied before extraction.
    pub index: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum End {
    Head,
    Tail,
}

/// A pointer-linked list over a [`Structure`].
///
/// Use the [`SinglyLinkedList`](super::SinglyLinkedList) and
/// [`DoublyLinkedList`](super::DoublyLinkedList) aliases.
pub struct LinkedList<D, S: LinkScheme> {
    structure: Structure<D>,
    links: Links,
    topology: Topology,
    _scheme: PhantomData<S>,
}

impl<D, S: LinkScheme> LinkedList<D, S> {
    /// Creates an empty list in dynamic size mode.
    pub fn new(topology: Topology) -> Self {
        Self::with_max_size(topology, MaxSize::Unbounded)
    }

    /// Creates an empty linear list.
    pub fn linear() -> Self {
        Self::new(Topology::Linear)
    }

    /// Creates an empty circular list.
    pub fn circular() -> Self {
        Self::new(Topology::Circular)
    }

    /// Creates an empty list with a capacity limit.
    pub fn with_max_size(topology: Topology, max: impl Into<MaxSize>) -> Self {
        Self {
            structure: Structure::for_kind(S::kind(topology), max.into()),
            links: Links::canonical(S::DOUBLY),
            topology,
            _scheme: PhantomData,
        }
    }

    /// Creates an empty list from a configuration.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] if the kind does not belong to this list type,
    /// or the configuration lacks the anchors and pointers the topology needs.
    pub fn with_config(config: &StructureConfig) -> Result<Self> {
        let topology = S::accepts(config.kind).ok_or_else(|| {
            LinkError::config(format!("`{}` is not a kind this list supports", config.kind.name()))
        })?;
        config.validate_for(config.kind)?;
        let structure = Structure::new(config)?;
        let links = Links::resolve(structure.nodes(), S::DOUBLY)?;
        Ok(Self {
            structure,
            links,
            topology,
            _scheme: PhantomData,
        })
    }

    /// Builds a list by appending every detail in order.
    ///
    /// # Errors
    /// Fails on the first duplicate id.
    pub fn try_from_details<I>(topology: Topology, details: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Detail<D>>,
    {
        let mut list = Self::new(topology);
        list.extend_tail(details)?;
        Ok(list)
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

    /// Returns `true` if the list holds no nodes.
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

    /// Changes the maximum size. `MaxSize::Unbounded` switches to dynamic mode.
    ///
    /// # Errors
    /// Returns [`LinkError::Capacity`] if `max` is below the current size.
    pub fn set_max_size(&mut self, max: impl Into<MaxSize>) -> Result<()> {
        self.structure.set_max_size(max.into())
    }

    /// The capacity mode.
    pub fn mode(&self) -> SizeMode {
        self.structure.sizing().mode()
    }

    /// Remaining room.
    pub fn capacity(&self) -> MaxSize {
        self.structure.capacity()
    }

    /// The first node.
    pub fn head(&self) -> Option<NodeRef<'_, D>> {
        self.links.head(self.structure.nodes()).and_then(|h| self.structure.node(h))
    }

    /// The last node.
    pub fn tail(&self) -> Option<NodeRef<'_, D>> {
        self.links.tail(self.structure.nodes()).and_then(|h| self.structure.node(h))
    }

    /// Returns `true` if a node with `id` is present.
    pub fn has(&self, id: &str) -> bool {
        self.structure.has(id)
    }

    /// The node at `index`, or `None` when out of range.
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

    /// Walks `next` pointers from the primary anchor.
    pub fn traverse(&self) -> Traverse<'_, D> {
        let nodes = self.structure.nodes();
        let start = nodes.anchors().get_key(nodes.anchors().primary());
        Traverse::new(nodes, start, self.links.next, self.len())
    }

    /// Same as [`LinkedList::traverse`].
    pub fn iter(&self) -> Traverse<'_, D> {
        self.traverse()
    }

    /// Ids in traversal order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|entry| entry.id())
    }

    /// Clones every payload in traversal order.
    pub fn to_vec(&self) -> Vec<D>
    where
        D: Clone,
    {
        self.iter().map(|entry| entry.data().clone()).collect()
    }

    /// The node whose `next` is `target`.
    ///
    /// O(1) for doubly linked nodes. Singly linked nodes have no back-pointer, so
    /// this scans forward from `head`.
    pub fn get_prev(&self, target: impl Into<Target>) -> Option<NodeRef<'_, D>> {
        let handle = self.resolve(&target.into())?;
        let prev = S::predecessor(self.structure.nodes(), &self.links, self.topology, handle)?;
        self.structure.node(prev)
    }

    /// Mutable payload access by id.
    pub fn data_mut(&mut self, id: &str) -> Option<&mut D> {
        self.structure.data_mut(id)
    }

    /// Makes `name` (`head` or `tail`) the anchor traversal starts from.
    ///
    /// # Errors
    /// Returns [`LinkError::Config`] if `name` is neither `head` nor `tail`, or
    /// is not a configured anchor.
    pub fn set_primary_anchor(&mut self, name: &str) -> Result<()> {
        check_primary_anchor(name)?;
        self.structure.set_primary_anchor(name)
    }

    /// Inserts a new first node.
    ///
    /// # Errors
    /// [`LinkError::Capacity`] when full, [`LinkError::DuplicateId`] on id reuse.
    pub fn insert_head(&mut self, detail: impl Into<Detail<D>>) -> Result<NodeHandle> {
        self.push(detail.into(), End::Head)
    }

    /// Inserts a new last node.
    ///
    /// # Errors
    /// [`LinkError::Capacity`] when full, [`LinkError::DuplicateId`] on id reuse.
    pub fn insert_tail(&mut self, detail: impl Into<Detail<D>>) -> Result<NodeHandle> {
        self.push(detail.into(), End::Tail)
    }

    /// Inserts so the new node ends up at `index`.
    ///
    /// `0` inserts at the head, anything `>= len` at the tail.
    ///
    /// # Errors
    /// [`LinkError::Capacity`] when full, [`LinkError::DuplicateId`] on id reuse.
    pub fn insert_at(&mut self, index: usize, detail: impl Into<Detail<D>>) -> Result<NodeHandle> {
        let detail = detail.into();
        if index == 0 {
            return self.push(detail, End::Head);
        }
        if index >= self.len() {
            return self.push(detail, End::Tail);
        }
        match self.handle_at(index - 1) {
            Some(prev) => self.splice_after(detail, prev),
            None => self.push(detail, End::Tail),
        }
    }

    /// Inserts directly before `target`.
    ///
    /// An index target behaves like [`LinkedList::insert_at`].
    ///
    /// # Errors
    /// [`LinkError::TargetNotFound`] if an id target is absent, plus the
    /// errors of [`LinkedList::insert_head`].
    pub fn insert_before(&mut self, detail: impl Into<Detail<D>>, target: impl Into<Target>) -> Result<NodeHandle> {
        let handle = match target.into() {
            Target::Index(index) => return self.insert_at(index, detail),
            Target::Id(id) => self.lookup_target(id)?,
        };
        let nodes = self.structure.nodes();
        if self.links.head(nodes) == Some(handle) {
            return self.push(detail.into(), End::Head);
        }
        match S::predecessor(nodes, &self.links, self.topology, handle) {
            Some(prev) => self.splice_after(detail.into(), prev),
            None => self.push(detail.into(), End::Head),
        }
    }

    /// Inserts directly after `target`.
    ///
    /// An index target `i` behaves like `insert_at(i + 1)`.
    ///
    /// # Errors
    /// [`LinkError::TargetNotFound`] if an id target is absent, plus the
    /// errors of [`LinkedList::insert_tail`].
    pub fn insert_after(&mut self, detail: impl Into<Detail<D>>, target: impl Into<Target>) -> Result<NodeHandle> {
        let handle = match target.into() {
            Target::Index(index) => return self.insert_at(index.saturating_add(1), detail),
            Target::Id(id) => self.lookup_target(id)?,
        };
        if self.links.tail(self.structure.nodes()) == Some(handle) {
            return self.push(detail.into(), End::Tail);
        }
        self.splice_after(detail.into(), handle)
    }

    /// Removes the node at an index or with an id. Missing targets yield `None`.
    pub fn extract(&mut self, target: impl Into<Target>) -> Option<Extracted<D>> {
        let target = target.into();
        let handle = self.resolve(&target)?;
        let index = match target {
            Target::Index(index) => index,
            Target::Id(_) => self.index_of(handle)?,
        };
        self.detach(handle).map(|detail| Extracted { detail, index })
    }

    /// Removes the first node in traversal order matching `pred`.
    pub fn extract_by(&mut self, mut pred: impl FnMut(&Entry<'_, D>) -> bool) -> Option<Extracted<D>> {
        let (handle, index) = self.iter().find(|entry| pred(entry)).map(|e| (e.node.handle(), e.index))?;
        self.detach(handle).map(|detail| Extracted { detail, index })
    }

    /// Removes the first node.
    ///
    /// # Errors
    /// Returns [`LinkError::Underflow`] if the list is empty.
    pub fn remove_head(&mut self) -> Result<Detail<D>> {
        self.remove_end(End::Head)
    }

    /// Removes the last node.
    ///
    /// # Errors
    /// Returns [`LinkError::Underflow`] if the list is empty.
    pub fn remove_tail(&mut self) -> Result<Detail<D>> {
        self.remove_end(End::Tail)
    }

    /// Moves `from` directly before or after `to`.
    ///
    /// Moving a node relative to itself is a no-op.
    ///
    /// # Errors
    /// Returns [`LinkError::TargetNotFound`] if either target is absent.
    pub fn move_node(&mut self, from: impl Into<Target>, to: impl Into<Target>, position: Position) -> Result<()> {
        let (from, to) = (from.into(), to.into());
        let source = self.resolve(&from).ok_or_else(|| LinkError::TargetNotFound(from.to_string()))?;
        let dest = self.resolve(&to).ok_or_else(|| LinkError::TargetNotFound(to.to_string()))?;
        if source == dest {
            return Ok(());
        }
        let dest_id = self
            .structure
            .node(dest)
            .map(|node| node.id().to_owned())
            .ok_or_else(|| LinkError::TargetNotFound(to.to_string()))?;
        let detail = self.detach(source).ok_or_else(|| LinkError::TargetNotFound(from.to_string()))?;
        match position {
            Position::Before => self.insert_before(detail, Target::Id(dest_id)),
            Position::After => self.insert_after(detail, Target::Id(dest_id)),
        }
        .map(|_| ())
    }

    /// Appends every detail in order.
    ///
    /// # Errors
    /// Stops at the first failing insert; earlier details stay inserted.
    pub fn extend_tail<I>(&mut self, details: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Detail<D>>,
    {
        for detail in details {
            self.insert_tail(detail)?;
        }
        Ok(())
    }

    /// Removes every node.
    pub fn reset(&mut self) {
        self.structure.reset();
    }

    /// Consumes the list, returning details from head to tail.
    pub fn into_details(mut self) -> Vec<Detail<D>> {
        let mut details = Vec::with_capacity(self.len());
        while let Some(head) = self.links.head(self.structure.nodes()) {
            match self.detach(head) {
                Some(detail) => details.push(detail),
                None => break,
            }
        }
        details
    }

    /// Verifies size, anchor and pointer invariants, describing the first violation.
    ///
    /// # Errors
    /// Returns a description of the first violated invariant.
    pub fn check_invariants(&self) -> core::result::Result<(), String> {
        verify(&self.structure, &self.links, self.topology)
    }

    pub(crate) fn links(&self) -> &Links {
        &self.links
    }

    fn push(&mut self, detail: Detail<D>, end: End) -> Result<NodeHandle> {
        let (links, topology) = (self.links, self.topology);
        self.structure.add(detail, move |w, node| {
            if w.anchor(links.head).is_none() {
                S::wire_initial(w, &links, topology, node);
            } else if end == End::Head {
                S::wire_head(w, &links, topology, node);
            } else {
                S::wire_tail(w, &links, topology, node);
            }
            node
        })
    }

    fn splice_after(&mut self, detail: Detail<D>, prev: NodeHandle) -> Result<NodeHandle> {
        let links = self.links;
        self.structure.add(detail, move |w, node| {
            S::wire_after(w, &links, prev, node);
            node
        })
    }

    fn detach(&mut self, handle: NodeHandle) -> Option<Detail<D>> {
        let (links, topology) = (self.links, self.topology);
        let pred = S::predecessor(self.structure.nodes(), &links, topology, handle);
        self.structure
            .release(handle, move |w, node| S::unwire(w, &links, node, pred))
            .map(|removed| removed.detail)
    }

    fn remove_end(&mut self, end: End) -> Result<Detail<D>> {
        self.structure.sizing().assert_can_remove(self.len())?;
        let nodes = self.structure.nodes();
        let (anchor, name) = match end {
            End::Head => (self.links.head(nodes), HEAD),
            End::Tail => (self.links.tail(nodes), TAIL),
        };
        anchor
            .and_then(|handle| self.detach(handle))
            .ok_or_else(|| LinkError::UnknownId(name.to_owned()))
    }

    fn lookup_target(&self, id: String) -> Result<NodeHandle> {
        self.structure
            .lookup(&id)
            .ok_or_else(|| LinkError::TargetNotFound(Target::Id(id).to_string()))
    }

    fn resolve(&self, target: &Target) -> Option<NodeHandle> {
        match target {
            Target::Index(index) => self.handle_at(*index),
            Target::Id(id) => self.structure.lookup(id),
        }
    }

    /// Walks from whichever end is closer when `prev` pointers exist.
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
}

impl<D, S: LinkScheme> Default for LinkedList<D, S> {
    fn default() -> Self {
        Self::linear()
    }
}

impl<'a, D, S: LinkScheme> IntoIterator for &'a LinkedList<D, S> {
    type Item = Entry<'a, D>;
    type IntoIter = Traverse<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<D, S: LinkScheme> fmt::Display for LinkedList<D, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if S::DOUBLY { " <-> " } else { " -> " };
        f.write_str("[")?;
        for entry in self.iter() {
            if entry.index > 0 {
                f.write_str(separator)?;
            }
            f.write_str(entry.id())?;
        }
        if self.topology.is_circular() {
            if let Some(head) = self.head() {
                write!(f, "{separator}{}", head.id())?;
            }
        }
        write!(f, "] ({}, size {}/{})", self.kind().name(), self.len(), self.max_size())
    }
}

impl<D: fmt::Debug, S: LinkScheme> fmt::Debug for LinkedList<D, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedList")
            .field("kind", &self.kind())
            .field("len", &self.len())
            .field("max_size", &self.max_size())
            .field("nodes", &self.iter().map(|e| (e.id(), e.data())).collect::<Vec<_>>())
            .finish()
    }
}
