//! Arbor DOM - Document Object Model
//!
//! Arena-backed, mutable DOM tree. A single [`NodeStore`] owns every node of
//! one or more documents; nodes are addressed by [`NodeId`] handles.

mod attributes;
mod chardata;
mod classlist;
mod dataset;
mod document;
mod error;
mod mutation;
mod namespace;
mod node;
mod position;
mod tree;

pub use classlist::{ClassList, ClassListMut};
pub use dataset::{Dataset, DatasetMut};
pub use error::{DomError, DomResult};
pub use mutation::InsertPosition;
pub use namespace::ns;
pub use node::{Attribute, ElementData, Node, NodeData, NodeType, QualName};
pub use position::DocumentPosition;
pub use tree::{Ancestors, Children, Descendants, NodeStore};

/// Node identifier (index into the store's arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node" in link fields
    pub(crate) const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub(crate) fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn some(self) -> Option<NodeId> {
        self.is_valid().then_some(self)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
