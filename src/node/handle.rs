//! `NodeHandle`: a generational index into a node arena.

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

static NEXT_OWNER: AtomicU32 = AtomicU32::new(1);

/// Issues a fresh arena owner tag. Tags start at 1.
pub(crate) fn next_owner() -> u32 {
    NEXT_OWNER.fetch_add(1, Ordering::Relaxed)
}

/// A stable handle to a node slot.
///
/// Contains the tag of the arena that issued it, the slot index and the
/// generation the slot had when the node was created. A handle kept after its
/// node was removed resolves to nothing, even once the slot has been reused,
/// and a handle never resolves in an arena other than its own.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle {
    owner: u32,
    index: u32,
    generation: u32,
}

impl NodeHandle {
    pub(crate) const fn new(owner: u32, index: u32, generation: u32) -> Self {
        Self { owner, index, generation }
    }

    /// Tag of the arena that issued this handle.
    #[inline]
    pub const fn owner(self) -> u32 {
        self.owner
    }

    /// Slot index inside the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    pub(crate) const fn slot(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}@{}", self.index, self.generation, self.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_tags_are_unique() {
        let a = next_owner();
        let b = next_owner();
        assert_ne!(a, b);
        assert_ne!(a, 0);
        assert_ne!(NodeHandle::new(a, 0, 0), NodeHandle::new(b, 0, 0));
        assert_eq!(format!("{:?}", NodeHandle::new(7, 2, 1)), "#2v1@7");
    }
}
