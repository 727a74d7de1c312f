//! DOM Tree (arena-based allocation)
//!
//! [`NodeStore`] owns every node. Links are plain [`NodeId`]s, so moving a
//! subtree only rewrites a handful of link fields. The store also keeps the
//! per-document id index used by `getElementById`.

use std::collections::HashMap;

use tracing::trace;

use crate::error::{DomError, DomResult};
use crate::node::{ElementData, Node, NodeData, NodeType, QualName};
use crate::NodeId;

/// Arena-based DOM store; may hold several documents
///
/// Ids are only handed out by the store that created them. Accessors panic
/// when given an id from a different, smaller store; use [`NodeStore::get`]
/// to check an id of unknown origin.
#[derive(Debug, Default, Clone)]
pub struct NodeStore {
    nodes: Vec<Node>,
    /// document -> id value -> connected elements carrying that id
    id_index: HashMap<NodeId, HashMap<String, Vec<NodeId>>>,
}

impl NodeStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            id_index: HashMap::new(),
        }
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Number of nodes ever created in this store
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if store is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Node payload
    #[inline]
    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.node(id).data
    }

    #[inline]
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.node(id).as_element()
    }

    #[inline]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.node(id).is_element()
    }

    #[inline]
    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.node(id).node_type()
    }

    pub fn node_name(&self, id: NodeId) -> String {
        self.node(id).node_name().into_owned()
    }

    #[inline]
    pub fn node_value(&self, id: NodeId) -> Option<&str> {
        self.node(id).node_value()
    }

    // ---- creation -------------------------------------------------------

    /// Allocate a detached node owned by `document`'s document
    ///
    /// Document payloads get no owner. Any node of the target document may be
    /// passed as `document`.
    pub fn create_node(&mut self, document: NodeId, data: NodeData) -> NodeId {
        let owner = match data {
            NodeData::Document => NodeId::NONE,
            _ => self.document_of(document),
        };
        self.push(Node::new(data, owner))
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create an empty document
    pub fn create_document(&mut self) -> NodeId {
        self.push(Node::new(NodeData::Document, NodeId::NONE))
    }

    /// Create an HTML element; the tag name is lower-cased
    pub fn create_element(&mut self, document: NodeId, tag: &str) -> NodeId {
        let name = QualName::html(tag.to_ascii_lowercase());
        self.create_node(document, NodeData::Element(ElementData::new(name)))
    }

    pub fn create_text_node(&mut self, document: NodeId, data: &str) -> NodeId {
        self.create_node(document, NodeData::Text(data.to_owned()))
    }

    pub fn create_comment(&mut self, document: NodeId, data: &str) -> NodeId {
        self.create_node(document, NodeData::Comment(data.to_owned()))
    }

    pub fn create_document_fragment(&mut self, document: NodeId) -> NodeId {
        self.create_node(document, NodeData::DocumentFragment)
    }

    pub fn create_processing_instruction(
        &mut self,
        document: NodeId,
        target: &str,
        data: &str,
    ) -> DomResult<NodeId> {
        if target.is_empty() || target.contains(char::is_whitespace) {
            return Err(DomError::InvalidCharacter(target.to_owned()));
        }
        if data.contains("?>") {
            return Err(DomError::InvalidCharacter(data.to_owned()));
        }
        Ok(self.create_node(
            document,
            NodeData::ProcessingInstruction {
                target: target.to_owned(),
                data: data.to_owned(),
            },
        ))
    }

    pub fn create_document_type(
        &mut self,
        document: NodeId,
        name: &str,
        public_id: &str,
        system_id: &str,
    ) -> NodeId {
        self.create_node(
            document,
            NodeData::Doctype {
                name: name.to_owned(),
                public_id: public_id.to_owned(),
                system_id: system_id.to_owned(),
            },
        )
    }

    // ---- navigation -----------------------------------------------------

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent()
    }

    #[inline]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child()
    }

    #[inline]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child()
    }

    #[inline]
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling()
    }

    #[inline]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling()
    }

    #[inline]
    pub fn has_child_nodes(&self, id: NodeId) -> bool {
        self.node(id).has_children()
    }

    /// Children in order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let node = self.node(id);
        Children {
            store: self,
            front: node.first_child,
            back: node.last_child,
        }
    }

    /// Snapshot of the children
    pub fn child_nodes(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).collect()
    }

    /// Pre-order descendants, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            store: self,
            root: id,
            next: self.node(id).first_child,
        }
    }

    /// `id` followed by its descendants in tree order
    pub fn inclusive_descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::once(id).chain(self.descendants(id))
    }

    /// Parent chain, excluding `id`
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            store: self,
            next: self.node(id).parent,
        }
    }

    /// `id` followed by its parent chain
    pub fn inclusive_ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors { store: self, next: id }
    }

    /// Topmost inclusive ancestor
    pub fn root(&self, id: NodeId) -> NodeId {
        self.inclusive_ancestors(id).last().unwrap_or(id)
    }

    /// Position among the parent's children
    pub fn index_of(&self, id: NodeId) -> usize {
        let mut index = 0;
        let mut current = self.node(id).prev_sibling;
        while current.is_valid() {
            index += 1;
            current = self.node(current).prev_sibling;
        }
        index
    }

    /// The document a node belongs to (a document belongs to itself)
    pub(crate) fn document_of(&self, id: NodeId) -> NodeId {
        let node = self.node(id);
        if node.is_document() { id } else { node.owner_document }
    }

    /// Document the node is connected to, if its root is one
    pub(crate) fn connected_document(&self, id: NodeId) -> Option<NodeId> {
        let root = self.root(id);
        self.node(root).is_document().then_some(root)
    }

    // ---- linking --------------------------------------------------------

    /// Splice a detached node into `parent` before `before` (append on `None`)
    fn link(&mut self, parent: NodeId, node: NodeId, before: Option<NodeId>) {
        let before = before.unwrap_or(NodeId::NONE);
        let prev = if before.is_valid() {
            self.node(before).prev_sibling
        } else {
            self.node(parent).last_child
        };

        {
            let n = self.node_mut(node);
            n.parent = parent;
            n.prev_sibling = prev;
            n.next_sibling = before;
        }
        if prev.is_valid() {
            self.node_mut(prev).next_sibling = node;
        } else {
            self.node_mut(parent).first_child = node;
        }
        if before.is_valid() {
            self.node_mut(before).prev_sibling = node;
        } else {
            self.node_mut(parent).last_child = node;
        }
    }

    /// Remove a node from its parent's child list
    fn unlink(&mut self, node: NodeId) {
        let (parent, prev, next) = {
            let n = self.node(node);
            (n.parent, n.prev_sibling, n.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }
        if prev.is_valid() {
            self.node_mut(prev).next_sibling = next;
        } else {
            self.node_mut(parent).first_child = next;
        }
        if next.is_valid() {
            self.node_mut(next).prev_sibling = prev;
        } else {
            self.node_mut(parent).last_child = prev;
        }

        let n = self.node_mut(node);
        n.parent = NodeId::NONE;
        n.prev_sibling = NodeId::NONE;
        n.next_sibling = NodeId::NONE;
    }

    /// Link a detached node and index its ids if it became connected
    pub(crate) fn attach(&mut self, parent: NodeId, node: NodeId, before: Option<NodeId>) {
        self.link(parent, node, before);
        if let Some(document) = self.connected_document(parent) {
            self.index_subtree(node, document);
        }
        trace!(?node, ?parent, ?before, "attached node");
    }

    /// Detach a node from its parent; the subtree stays intact
    pub(crate) fn detach(&mut self, node: NodeId) {
        if !self.node(node).parent.is_valid() {
            return;
        }
        if let Some(document) = self.connected_document(node) {
            self.unindex_subtree(node, document);
        }
        self.unlink(node);
        trace!(?node, "detached node");
    }

    /// Move a node under `parent` before `before`
    pub(crate) fn reparent(&mut self, node: NodeId, parent: NodeId, before: Option<NodeId>) {
        self.detach(node);
        self.attach(parent, node, before);
    }

    /// Re-own a subtree; documents inside it are left alone
    pub(crate) fn set_owner_subtree(&mut self, root: NodeId, document: NodeId) {
        let subtree: Vec<NodeId> = self.inclusive_descendants(root).collect();
        for id in subtree {
            let node = self.node_mut(id);
            if !node.is_document() {
                node.owner_document = document;
            }
        }
    }

    // ---- id index -------------------------------------------------------

    pub(crate) fn index_subtree(&mut self, root: NodeId, document: NodeId) {
        let entries: Vec<(String, NodeId)> = self
            .inclusive_descendants(root)
            .filter_map(|id| Some((self.node(id).as_element()?.id()?.to_owned(), id)))
            .collect();
        for (value, element) in entries {
            self.index_id(document, value, element);
        }
    }

    fn unindex_subtree(&mut self, root: NodeId, document: NodeId) {
        let entries: Vec<(String, NodeId)> = self
            .inclusive_descendants(root)
            .filter_map(|id| Some((self.node(id).as_element()?.id()?.to_owned(), id)))
            .collect();
        for (value, element) in entries {
            self.unindex_id(document, &value, element);
        }
    }

    pub(crate) fn index_id(&mut self, document: NodeId, value: String, element: NodeId) {
        if value.is_empty() {
            return;
        }
        let entries = self
            .id_index
            .entry(document)
            .or_default()
            .entry(value)
            .or_default();
        if !entries.contains(&element) {
            entries.push(element);
        }
    }

    pub(crate) fn unindex_id(&mut self, document: NodeId, value: &str, element: NodeId) {
        let Some(ids) = self.id_index.get_mut(&document) else {
            return;
        };
        if let Some(entries) = ids.get_mut(value) {
            entries.retain(|&e| e != element);
            if entries.is_empty() {
                ids.remove(value);
            }
        }
    }

    /// First connected element in tree order carrying `value` as its id
    pub(crate) fn indexed_element(&self, document: NodeId, value: &str) -> Option<NodeId> {
        let candidates = self.id_index.get(&document)?.get(value)?;
        match candidates.as_slice() {
            [] => None,
            [only] => Some(*only),
            _ => self.descendants(document).find(|id| candidates.contains(id)),
        }
    }

    // ---- validation -----------------------------------------------------

    /// Check that `node` may be inserted into `parent` before `child`
    ///
    /// `replacing` names a child that is about to be removed and therefore
    /// does not count against the document's element/doctype limits.
    pub(crate) fn ensure_pre_insert_validity(
        &self,
        parent: NodeId,
        node: NodeId,
        child: Option<NodeId>,
        replacing: Option<NodeId>,
    ) -> DomResult<()> {
        if !self.data(parent).is_container() {
            return Err(DomError::HierarchyViolation("parent cannot have children"));
        }
        if self.inclusive_ancestors(parent).any(|a| a == node) {
            return Err(DomError::HierarchyViolation(
                "node is an inclusive ancestor of the parent",
            ));
        }
        if let Some(child) = child
            && self.node(child).parent != parent
        {
            return Err(DomError::NotFound);
        }

        let parent_is_document = self.node(parent).is_document();
        match self.data(node) {
            NodeData::Document => {
                return Err(DomError::HierarchyViolation("documents cannot be inserted"));
            }
            NodeData::Doctype { .. } if !parent_is_document => {
                return Err(DomError::HierarchyViolation(
                    "doctype can only be a child of a document",
                ));
            }
            NodeData::Text(_) if parent_is_document => {
                return Err(DomError::HierarchyViolation(
                    "text cannot be a child of a document",
                ));
            }
            _ => {}
        }

        if parent_is_document {
            self.ensure_document_child(parent, node, child, replacing)?;
        }
        Ok(())
    }

    fn ensure_document_child(
        &self,
        document: NodeId,
        node: NodeId,
        child: Option<NodeId>,
        replacing: Option<NodeId>,
    ) -> DomResult<()> {
        let is_element = |id: NodeId| self.node(id).is_element();
        let is_doctype = |id: NodeId| matches!(self.data(id), NodeData::Doctype { .. });
        let others = || self.children(document).filter(move |&c| Some(c) != replacing);
        let doctype_after = || match child {
            Some(c) => {
                (replacing != Some(c) && is_doctype(c))
                    || self.following_siblings(c).any(is_doctype)
            }
            None => false,
        };

        match self.data(node) {
            NodeData::DocumentFragment => {
                if self.children(node).any(|c| self.node(c).is_text()) {
                    return Err(DomError::HierarchyViolation(
                        "text cannot be a child of a document",
                    ));
                }
                let elements = self.children(node).filter(|&c| is_element(c)).count();
                if elements > 1 {
                    return Err(DomError::HierarchyViolation(
                        "document can only have one element child",
                    ));
                }
                if elements == 1 && (others().any(is_element) || doctype_after()) {
                    return Err(DomError::HierarchyViolation(
                        "document can only have one element child",
                    ));
                }
            }
            NodeData::Element(_) => {
                if others().any(is_element) {
                    return Err(DomError::HierarchyViolation(
                        "document can only have one element child",
                    ));
                }
                if doctype_after() {
                    return Err(DomError::HierarchyViolation(
                        "element cannot precede the doctype",
                    ));
                }
            }
            NodeData::Doctype { .. } => {
                if others().any(is_doctype) {
                    return Err(DomError::HierarchyViolation(
                        "document can only have one doctype",
                    ));
                }
                let element_before = match child {
                    Some(c) => self.preceding_siblings(c).any(is_element),
                    None => others().any(is_element),
                };
                if element_before {
                    return Err(DomError::HierarchyViolation(
                        "doctype must precede the document element",
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn following_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.next_sibling(id), |&n| self.next_sibling(n))
    }

    fn preceding_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.previous_sibling(id), |&n| self.previous_sibling(n))
    }
}

/// Iterator over a node's children
pub struct Children<'a> {
    store: &'a NodeStore,
    front: NodeId,
    back: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.front.is_valid() {
            return None;
        }
        let current = self.front;
        if current == self.back {
            self.front = NodeId::NONE;
            self.back = NodeId::NONE;
        } else {
            self.front = self.store.node(current).next_sibling;
        }
        Some(current)
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<NodeId> {
        if !self.back.is_valid() {
            return None;
        }
        let current = self.back;
        if current == self.front {
            self.front = NodeId::NONE;
            self.back = NodeId::NONE;
        } else {
            self.back = self.store.node(current).prev_sibling;
        }
        Some(current)
    }
}

/// Pre-order walk below a root
pub struct Descendants<'a> {
    store: &'a NodeStore,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next;
        if !current.is_valid() {
            return None;
        }

        let node = self.store.node(current);
        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut n = current;
            loop {
                if n == self.root {
                    break NodeId::NONE;
                }
                let node = self.store.node(n);
                if node.next_sibling.is_valid() {
                    break node.next_sibling;
                }
                n = node.parent;
                if !n.is_valid() {
                    break NodeId::NONE;
                }
            }
        };
        Some(current)
    }
}

/// Walk up the parent chain
pub struct Ancestors<'a> {
    store: &'a NodeStore,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next;
        if !current.is_valid() {
            return None;
        }
        self.next = self.store.node(current).parent;
        Some(current)
    }
}
