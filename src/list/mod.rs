//! Linked lists in four topologies: singly or doubly linked, linear or circular.
//!
//! The shared algorithms live on [`LinkedList`]; the node layout is chosen by
//! a [`LinkScheme`] type parameter and the terminal-pointer rule by a runtime
//! [`Topology`].
//!
//! ```
//! use strand::list::{DoublyLinkedList, Topology};
//!
//! let mut list = DoublyLinkedList::new(Topology::Circular);
//! list.insert_tail(("a", 1)).unwrap();
//! list.insert_tail(("b", 2)).unwrap();
//! list.insert_head(("z", 0)).unwrap();
//!
//! let ids: Vec<_> = list.ids().collect();
//! assert_eq!(ids, ["z", "a", "b"]);
//! assert_eq!(list.tail().and_then(|n| n.next()).map(|n| n.id()), Some("z"));
//! ```

mod linked;
pub mod doubly;
pub mod singly;
pub mod topology;
pub mod traverse;

pub use linked::{Extracted, LinkedList, Position, Target};
pub use doubly::{Doubly, DoublyLinkedList};
pub use singly::{Singly, SinglyLinkedList};
pub use topology::{LinkScheme, Links, Topology};
pub use traverse::Traverse;
