//! `Traverse`: lazy, circular-aware walk over a linked structure.

use crate::node::{Entry, NodeHandle, NodeManager, NodeRef, PointerKey};
use core::iter::FusedIterator;

/// Iterator yielding [`Entry`] values by following one pointer from a start node.
///
/// Ends when the pointer is absent (linear) or when it leads back to the start
/// node (circular). Each call to `traverse`/`iter` produces a fresh walk.
///
/// The iterator borrows the structure, so the structure cannot be mutated while
/// a walk is in progress.
pub struct Traverse<'a, D> {
    nodes: &'a NodeManager<D>,
    current: Option<NodeHandle>,
    start: Option<NodeHandle>,
    key: PointerKey,
    index: usize,
    remaining: usize,
}

impl<'a, D> Traverse<'a, D> {
    pub(crate) fn new(nodes: &'a NodeManager<D>, start: Option<NodeHandle>, key: PointerKey, len: usize) -> Self {
        Self {
            nodes,
            current: start,
            start,
            key,
            index: 0,
            remaining: len,
        }
    }
}

impl<'a, D> Iterator for Traverse<'a, D> {
    type Item = Entry<'a, D>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.current?;
        let node = NodeRef::new(self.nodes, handle)?;

        // Circular termination: stop once the walk wraps back to where it began.
        self.current = match self.nodes.pointer(handle, self.key) {
            Some(next) if Some(next) == self.start => None,
            other => other,
        };

        let entry = Entry { node, index: self.index };
        self.index += 1;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current.is_none() || self.remaining == 0 {
            (0, Some(0))
        } else {
            (1, Some(self.remaining))
        }
    }
}

impl<'a, D> FusedIterator for Traverse<'a, D> {}
