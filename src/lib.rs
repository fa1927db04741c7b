//! # `strand` - Pointer-Linked Structure Toolkit
//!
//! Linked lists and deques built on a shared node/anchor/pointer layer. Nodes
//! live in an arena owned by their [`Structure`]; pointers and anchors are
//! generational [`NodeHandle`]s, so circular topologies are plain integers and
//! a handle to a removed node never resolves again.
//!
//! ## Guarantees
//!
//! - **Manager-only pointer writes**: callers see nodes through read-only
//!   [`NodeRef`] views. Pointer and anchor slots are written only through a
//!   [`Wiring`] handed out inside [`Structure::add`] and [`Structure::remove`].
//! - **Consistent size accounting**: every insert and removal goes through the
//!   [`Structure`], which checks capacity and id uniqueness before touching any
//!   state. A failed call leaves the structure unchanged.
//! - **Finite traversal**: circular walks stop when they return to the node
//!   they started from.
//!
//! ## Architecture
//!
//! 1. **Node layer** ([`node`]): [`NodeManager`] arena, [`AnchorManager`] for
//!    named `head`/`tail` references, named pointer slots.
//! 2. **Structure** ([`structure`]): node manager + [`SizeController`] + id index.
//! 3. **Collections**: [`LinkedList`] generic over a [`LinkScheme`]
//!    ([`Singly`] or [`Doubly`]) and a runtime [`Topology`]; [`Deque`] on doubly
//!    linked nodes.
//!
//! ## Example
//!
//! ```rust
//! use strand::{Position, SinglyLinkedList, Topology};
//!
//! let mut list = SinglyLinkedList::new(Topology::Linear);
//! list.insert_tail(("1", "A")).unwrap();
//! list.insert_tail(("2", "B")).unwrap();
//! list.insert_tail(("3", "C")).unwrap();
//!
//! list.move_node("1", "3", Position::After).unwrap();
//! assert_eq!(list.to_string(), "[2 -> 3 -> 1] (singly/linear, size 3/∞)");
//!
//! let removed = list.extract("3").unwrap();
//! assert_eq!((removed.detail.data, removed.index), ("C", 1));
//! assert!(list.get_by_index(99).is_none());
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): structured events for node add/remove, resets and
//!   capacity changes. Without it the event macros compile to nothing.

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {
        tracing::$level!($($arg)+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {
        ()
    };
}

pub mod config;
pub mod deque;
pub mod error;
pub mod list;
pub mod node;
pub mod structure;

pub use config::{AssertMessages, NodeManagerConfig, SizingConfig, StructureConfig, StructureKind};
pub use deque::Deque;
pub use error::{ErrorKind, LinkError, Result};
pub use list::{
    Doubly, DoublyLinkedList, Extracted, LinkScheme, LinkedList, Position, Singly, SinglyLinkedList, Target, Topology,
    Traverse,
};
pub use node::{AnchorManager, Detail, Entry, NodeHandle, NodeManager, NodeRef, Wiring};
pub use structure::{MaxSize, SizeController, SizeMode, Structure};

// Compile-time layout checks.
const _: () = {
    use core::mem;

    // Handles are three `u32`s: owner, slot, generation.
    assert!(mem::size_of::<NodeHandle>() == 12);
    assert!(mem::size_of::<Option<NodeHandle>>() <= 16);
    assert!(mem::size_of::<MaxSize>() <= mem::size_of::<usize>() * 2);
};
