//! DOM crate — document tree for the node-handle adapter.
//!
//! All nodes live in a `Vec` owned by [`Document`] and are referenced by
//! [`NodeId`]. Nodes are never deallocated — removal only detaches them from
//! the tree — so an id handed out once stays valid for the document's whole
//! lifetime.

#![forbid(unsafe_code)]

pub mod event;
pub mod node;
pub mod tree;

pub use event::*;
pub use node::*;
pub use tree::{Document, SharedDocument};
