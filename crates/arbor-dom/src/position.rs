//! Document position comparison and node identity helpers

use std::ops::BitOr;

use crate::node::NodeData;
use crate::tree::NodeStore;
use crate::NodeId;

/// `compareDocumentPosition` result bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DocumentPosition(u16);

impl DocumentPosition {
    pub const DISCONNECTED: DocumentPosition = DocumentPosition(0x01);
    pub const PRECEDING: DocumentPosition = DocumentPosition(0x02);
    pub const FOLLOWING: DocumentPosition = DocumentPosition(0x04);
    pub const CONTAINS: DocumentPosition = DocumentPosition(0x08);
    pub const CONTAINED_BY: DocumentPosition = DocumentPosition(0x10);
    pub const IMPLEMENTATION_SPECIFIC: DocumentPosition = DocumentPosition(0x20);

    /// Raw bits
    #[inline]
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Check that every bit of `other` is set
    #[inline]
    pub fn contains(self, other: DocumentPosition) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for DocumentPosition {
    type Output = DocumentPosition;

    fn bitor(self, rhs: Self) -> Self::Output {
        DocumentPosition(self.0 | rhs.0)
    }
}

impl NodeStore {
    /// Position of `other` relative to `reference`
    pub fn compare_document_position(&self, reference: NodeId, other: NodeId) -> DocumentPosition {
        if reference == other {
            return DocumentPosition::default();
        }

        let mut reference_chain: Vec<NodeId> = self.inclusive_ancestors(reference).collect();
        let mut other_chain: Vec<NodeId> = self.inclusive_ancestors(other).collect();
        reference_chain.reverse();
        other_chain.reverse();

        if reference_chain[0] != other_chain[0] {
            // whole trees are ordered by their roots
            let order = if other_chain[0] < reference_chain[0] {
                DocumentPosition::PRECEDING
            } else {
                DocumentPosition::FOLLOWING
            };
            return DocumentPosition::DISCONNECTED
                | DocumentPosition::IMPLEMENTATION_SPECIFIC
                | order;
        }

        let common = reference_chain
            .iter()
            .zip(&other_chain)
            .take_while(|(a, b)| a == b)
            .count();
        if common == reference_chain.len() {
            return DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING;
        }
        if common == other_chain.len() {
            return DocumentPosition::CONTAINS | DocumentPosition::PRECEDING;
        }

        // siblings under the last common ancestor decide the order
        let reference_branch = reference_chain[common];
        let other_branch = other_chain[common];
        let other_first = std::iter::successors(self.previous_sibling(reference_branch), |&n| {
            self.previous_sibling(n)
        })
        .any(|n| n == other_branch);
        if other_first {
            DocumentPosition::PRECEDING
        } else {
            DocumentPosition::FOLLOWING
        }
    }

    /// `node` is an inclusive descendant of `candidate`
    pub fn contains(&self, candidate: NodeId, node: NodeId) -> bool {
        self.inclusive_ancestors(node).any(|a| a == candidate)
    }

    /// Topmost inclusive ancestor (`getRootNode`)
    pub fn get_root_node(&self, id: NodeId) -> NodeId {
        self.root(id)
    }

    /// Root is a document
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.connected_document(id).is_some()
    }

    #[inline]
    pub fn is_same_node(&self, a: NodeId, b: NodeId) -> bool {
        a == b
    }

    /// Structural equality of two subtrees
    ///
    /// Attributes compare as sets; everything else, including child order,
    /// must match.
    pub fn is_equal_node(&self, a: NodeId, b: NodeId) -> bool {
        let mut pending = vec![(a, b)];
        while let Some((x, y)) = pending.pop() {
            if !self.shallow_equal(x, y) {
                return false;
            }
            let mut left = self.children(x);
            let mut right = self.children(y);
            loop {
                match (left.next(), right.next()) {
                    (Some(l), Some(r)) => pending.push((l, r)),
                    (None, None) => break,
                    _ => return false,
                }
            }
        }
        true
    }

    fn shallow_equal(&self, a: NodeId, b: NodeId) -> bool {
        match (self.data(a), self.data(b)) {
            (NodeData::Element(x), NodeData::Element(y)) => {
                x.name == y.name
                    && x.attrs().len() == y.attrs().len()
                    && x.attrs().iter().all(|attr| {
                        y.attr_ns(&attr.name.ns, &attr.name.local)
                            .is_some_and(|other| other.value == attr.value)
                    })
            }
            (x, y) => x == y,
        }
    }
}
