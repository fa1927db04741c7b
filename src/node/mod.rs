//! Node core: handles, pointer slots, anchors and the node manager.
//!
//! - `handle`: generational [`NodeHandle`]s into the node arena
//! - `pointer`: named pointer slots ([`PointerKeys`], [`PointerSlots`])
//! - `anchor`: named anchor references ([`AnchorManager`])
//! - `manager`: the arena itself ([`NodeManager`]) and scoped write access ([`Wiring`])
//! - `view`: read-only [`NodeRef`]/[`Entry`] views and the owned [`Detail`]

pub mod anchor;
pub mod handle;
pub mod manager;
pub mod pointer;
pub mod view;

pub use anchor::{AnchorKey, AnchorManager};
pub use handle::NodeHandle;
pub use manager::{Node, NodeManager, Wiring};
pub use pointer::{PointerKey, PointerKeys, PointerSlots};
pub use view::{Detail, Entry, NodeRef};
