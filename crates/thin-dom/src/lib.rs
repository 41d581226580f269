//! thin-dom - Document Object Model
//!
//! Memory-efficient arena DOM tree the thin utility surface queries and
//! mutates. Nodes are linked by index, not by pointer.

mod document;
mod node;
pub mod selector;
mod tree;

pub use document::{Document, ReadyState};
pub use node::{Attribute, ElementData, Node, NodeData};
pub use tree::{Ancestors, Children, Descendants, DomError, DomResult, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check this id refers to a node at all
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        NodeId(index as u32)
    }
}
