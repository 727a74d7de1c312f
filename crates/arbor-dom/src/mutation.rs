//! DOM Node Operations
//!
//! Core node manipulation: appendChild, removeChild, insertBefore,
//! replaceChild, cloneNode, importNode/adoptNode and normalize.
//!
//! Every operation validates before it touches a link, so an error leaves
//! the tree exactly as it was.

use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::{DomError, DomResult};
use crate::node::{Node, NodeData, NodeType};
use crate::tree::NodeStore;
use crate::NodeId;

/// Position argument of the `insertAdjacent*` family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Before the target, as a sibling
    BeforeBegin,
    /// First child of the target
    AfterBegin,
    /// Last child of the target
    BeforeEnd,
    /// After the target, as a sibling
    AfterEnd,
}

impl FromStr for InsertPosition {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beforebegin" => Ok(Self::BeforeBegin),
            "afterbegin" => Ok(Self::AfterBegin),
            "beforeend" => Ok(Self::BeforeEnd),
            "afterend" => Ok(Self::AfterEnd),
            _ => Err(DomError::Syntax(format!("invalid insert position {s:?}"))),
        }
    }
}

impl NodeStore {
    /// Insert `node` before `reference`, or append when `reference` is `None`
    ///
    /// Fragments contribute their children (the fragment ends up empty).
    /// Nodes owned by another document are adopted.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        reference: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.ensure_pre_insert_validity(parent, node, reference, None)?;
        let reference = match reference {
            Some(r) if r == node => self.next_sibling(node),
            other => other,
        };
        self.insert_unchecked(parent, node, reference);
        Ok(node)
    }

    /// Append a child node
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> DomResult<NodeId> {
        self.insert_before(parent, node, None)
    }

    /// Insert as the first child
    pub fn prepend_child(&mut self, parent: NodeId, node: NodeId) -> DomResult<NodeId> {
        let first = self.first_child(parent);
        self.insert_before(parent, node, first)
    }

    /// Replace `old` with `new`; returns `old`, now detached
    pub fn replace_child(&mut self, parent: NodeId, new: NodeId, old: NodeId) -> DomResult<NodeId> {
        if self.parent(old) != Some(parent) {
            return Err(DomError::NotFound);
        }
        self.ensure_pre_insert_validity(parent, new, Some(old), Some(old))?;
        if new == old {
            return Ok(old);
        }

        let mut reference = self.next_sibling(old);
        if reference == Some(new) {
            reference = self.next_sibling(new);
        }
        self.detach(old);
        self.insert_unchecked(parent, new, reference);
        trace!(?parent, ?new, ?old, "replaced child");
        Ok(old)
    }

    /// Remove a child node
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotFound);
        }
        self.detach(child);
        Ok(child)
    }

    /// Detach a node (and its subtree) from its parent; no-op when detached
    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }

    /// Insert `new` right before `node`
    pub fn before(&mut self, node: NodeId, new: NodeId) -> DomResult<NodeId> {
        let parent = self.parent(node).ok_or(DomError::NoParent)?;
        self.insert_before(parent, new, Some(node))
    }

    /// Insert `new` right after `node`
    pub fn after(&mut self, node: NodeId, new: NodeId) -> DomResult<NodeId> {
        let parent = self.parent(node).ok_or(DomError::NoParent)?;
        let next = self.next_sibling(node);
        self.insert_before(parent, new, next)
    }

    /// Put `new` in `node`'s place
    pub fn replace_with(&mut self, node: NodeId, new: NodeId) -> DomResult<NodeId> {
        let parent = self.parent(node).ok_or(DomError::NoParent)?;
        self.replace_child(parent, new, node)
    }

    /// Link `node` (or a fragment's children) without validation
    fn insert_unchecked(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
        let document = self.document_of(parent);
        let nodes = if matches!(self.data(node), NodeData::DocumentFragment) {
            self.child_nodes(node)
        } else {
            vec![node]
        };

        for id in nodes {
            if self.node(id).owner_document != document {
                self.set_owner_subtree(id, document);
            }
            self.reparent(id, parent, reference);
        }
    }

    /// Copy a node; `deep` copies the whole subtree
    ///
    /// The copy is detached and owned by the source's document (a copied
    /// document owns its own copied subtree).
    pub fn clone_node(&mut self, node: NodeId, deep: bool) -> NodeId {
        let owner = self.node(node).owner_document;
        self.clone_into(node, owner, deep)
    }

    /// Copy a node from any document into `document`, detached
    pub fn import_node(&mut self, document: NodeId, node: NodeId, deep: bool) -> DomResult<NodeId> {
        if !self.node(document).is_document() {
            return Err(DomError::InvalidNodeType);
        }
        if self.node(node).is_document() {
            return Err(DomError::NotSupported);
        }
        Ok(self.clone_into(node, document, deep))
    }

    /// Move a node into `document`, keeping its identity
    pub fn adopt_node(&mut self, document: NodeId, node: NodeId) -> DomResult<NodeId> {
        if !self.node(document).is_document() {
            return Err(DomError::InvalidNodeType);
        }
        if self.node(node).is_document() {
            return Err(DomError::NotSupported);
        }
        self.detach(node);
        if self.node(node).owner_document != document {
            self.set_owner_subtree(node, document);
            debug!(?node, ?document, "adopted node");
        }
        Ok(node)
    }

    fn clone_into(&mut self, source: NodeId, owner: NodeId, deep: bool) -> NodeId {
        let root = self.copy_payload(source, owner);
        if !deep {
            return root;
        }

        // copies of a document are owned by the new document
        let child_owner = if self.node(root).is_document() { root } else { owner };
        let mut stack: Vec<(NodeId, NodeId)> = self
            .children(source)
            .rev()
            .map(|child| (child, root))
            .collect();
        while let Some((source_child, parent_copy)) = stack.pop() {
            let copy = self.copy_payload(source_child, child_owner);
            self.attach(parent_copy, copy, None);
            stack.extend(self.children(source_child).rev().map(|child| (child, copy)));
        }
        trace!(?source, copy = ?root, "cloned subtree");
        root
    }

    fn copy_payload(&mut self, source: NodeId, owner: NodeId) -> NodeId {
        let data = self.node(source).data.clone();
        let owner = if matches!(data, NodeData::Document) { NodeId::NONE } else { owner };
        self.push(Node::new(data, owner))
    }

    /// Merge adjacent Text children and drop empty ones, recursively
    pub fn normalize(&mut self, node: NodeId) {
        let containers: Vec<NodeId> = self
            .inclusive_descendants(node)
            .filter(|&id| self.data(id).is_container())
            .collect();

        for container in containers {
            let mut child = self.first_child(container);
            while let Some(current) = child {
                child = self.next_sibling(current);
                let Some(text) = self.node(current).as_text() else {
                    continue;
                };

                let mut merged = text.to_owned();
                while let Some(next) = child {
                    let Some(more) = self.node(next).as_text() else {
                        break;
                    };
                    merged.push_str(more);
                    child = self.next_sibling(next);
                    self.detach(next);
                }

                if merged.is_empty() {
                    self.detach(current);
                } else if let NodeData::Text(data) = &mut self.node_mut(current).data {
                    *data = merged;
                }
            }
        }
        trace!(?node, "normalized");
    }

    /// `insertAdjacentElement` / `insertAdjacent` core
    pub fn insert_adjacent(
        &mut self,
        target: NodeId,
        position: InsertPosition,
        node: NodeId,
    ) -> DomResult<NodeId> {
        match position {
            InsertPosition::BeforeBegin => self.before(target, node),
            InsertPosition::AfterBegin => self.prepend_child(target, node),
            InsertPosition::BeforeEnd => self.append_child(target, node),
            InsertPosition::AfterEnd => self.after(target, node),
        }
    }

    /// Insert an element relative to `target`
    pub fn insert_adjacent_element(
        &mut self,
        target: NodeId,
        position: InsertPosition,
        element: NodeId,
    ) -> DomResult<NodeId> {
        if !self.is_element(element) {
            return Err(DomError::InvalidNodeType);
        }
        self.insert_adjacent(target, position, element)
    }

    /// Insert a new Text node relative to `target`
    pub fn insert_adjacent_text(
        &mut self,
        target: NodeId,
        position: InsertPosition,
        data: &str,
    ) -> DomResult<NodeId> {
        if matches!(position, InsertPosition::BeforeBegin | InsertPosition::AfterEnd)
            && self.parent(target).is_none()
        {
            return Err(DomError::NoParent);
        }
        let text = self.create_text_node(target, data);
        self.insert_adjacent(target, position, text)
    }

    /// `textContent` setter
    ///
    /// Containers lose all children and gain one Text node (none for an
    /// empty string); character data is overwritten; documents and
    /// doctypes are left alone.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        match self.node_type(node) {
            NodeType::Element | NodeType::DocumentFragment => {
                for child in self.child_nodes(node) {
                    self.detach(child);
                }
                if !text.is_empty() {
                    let child = self.create_text_node(node, text);
                    self.attach(node, child, None);
                }
            }
            NodeType::Text | NodeType::Comment | NodeType::ProcessingInstruction => {
                if let Some(data) = self.node_mut(node).data.character_data_mut() {
                    *data = text.to_owned();
                }
            }
            NodeType::Document | NodeType::DocumentType => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document_with_body(store: &mut NodeStore) -> (NodeId, NodeId) {
        let doc = store.create_document();
        let html = store.create_element(doc, "html");
        let body = store.create_element(doc, "body");
        store.append_child(doc, html).unwrap();
        store.append_child(html, body).unwrap();
        (doc, body)
    }

    #[test]
    fn test_insert_before_orders_children() {
        let mut store = NodeStore::new();
        let (doc, body) = document_with_body(&mut store);
        let a = store.create_element(doc, "a");
        let b = store.create_element(doc, "b");
        let c = store.create_element(doc, "c");
        store.append_child(body, a).unwrap();
        store.append_child(body, c).unwrap();
        store.insert_before(body, b, Some(c)).unwrap();
        assert_eq!(store.child_nodes(body), vec![a, b, c]);

        // reference equal to the node itself keeps its place
        store.insert_before(body, b, Some(b)).unwrap();
        assert_eq!(store.child_nodes(body), vec![a, b, c]);
    }

    #[test]
    fn test_move_between_parents() {
        let mut store = NodeStore::new();
        let (doc, body) = document_with_body(&mut store);
        let first = store.create_element(doc, "div");
        let second = store.create_element(doc, "div");
        let span = store.create_element(doc, "span");
        store.append_child(body, first).unwrap();
        store.append_child(body, second).unwrap();
        store.append_child(first, span).unwrap();
        store.append_child(second, span).unwrap();
        assert!(!store.has_child_nodes(first));
        assert_eq!(store.parent(span), Some(second));
    }

    #[test]
    fn test_fragment_children_move_in_order() {
        let mut store = NodeStore::new();
        let (doc, body) = document_with_body(&mut store);
        let fragment = store.create_document_fragment(doc);
        let x = store.create_element(doc, "x");
        let y = store.create_text_node(doc, "y");
        store.append_child(fragment, x).unwrap();
        store.append_child(fragment, y).unwrap();
        store.append_child(body, fragment).unwrap();
        assert_eq!(store.child_nodes(body), vec![x, y]);
        assert!(!store.has_child_nodes(fragment));
    }

    #[test]
    fn test_failed_insert_leaves_tree() {
        let mut store = NodeStore::new();
        let (doc, body) = document_with_body(&mut store);
        let div = store.create_element(doc, "div");
        store.append_child(body, div).unwrap();
        let err = store.append_child(div, body).unwrap_err();
        assert!(matches!(err, DomError::HierarchyViolation(_)));
        assert_eq!(store.parent(div), Some(body));
        assert_eq!(store.child_nodes(div), vec![]);

        let stranger = store.create_element(doc, "p");
        let other = store.create_element(doc, "p");
        assert_eq!(
            store.insert_before(body, other, Some(stranger)),
            Err(DomError::NotFound)
        );
        assert_eq!(store.parent(other), None);
    }

    #[test]
    fn test_replace_child() {
        let mut store = NodeStore::new();
        let (doc, body) = document_with_body(&mut store);
        let a = store.create_element(doc, "a");
        let b = store.create_element(doc, "b");
        let c = store.create_element(doc, "c");
        store.append_child(body, a).unwrap();
        store.append_child(body, b).unwrap();
        assert_eq!(store.replace_child(body, c, a), Ok(a));
        assert_eq!(store.child_nodes(body), vec![c, b]);
        assert_eq!(store.parent(a), None);

        // replacing with the following sibling
        store.replace_child(body, b, c).unwrap();
        assert_eq!(store.child_nodes(body), vec![b]);
        assert_eq!(store.replace_child(body, a, c), Err(DomError::NotFound));
    }

    #[test]
    fn test_child_node_helpers() {
        let mut store = NodeStore::new();
        let (doc, body) = document_with_body(&mut store);
        let mid = store.create_element(doc, "mid");
        store.append_child(body, mid).unwrap();
        let first = store.create_element(doc, "first");
        let last = store.create_element(doc, "last");
        store.before(mid, first).unwrap();
        store.after(mid, last).unwrap();
        assert_eq!(store.child_nodes(body), vec![first, mid, last]);

        let swap = store.create_element(doc, "swap");
        store.replace_with(mid, swap).unwrap();
        assert_eq!(store.child_nodes(body), vec![first, swap, last]);
        assert_eq!(store.before(mid, first), Err(DomError::NoParent));
    }

    #[test]
    fn test_remove_preserves_subtree() {
        let mut store = NodeStore::new();
        let (doc, body) = document_with_body(&mut store);
        let div = store.create_element(doc, "div");
        let text = store.create_text_node(doc, "hi");
        store.append_child(body, div).unwrap();
        store.append_child(div, text).unwrap();
        store.remove(div);
        assert_eq!(store.parent(div), None);
        assert_eq!(store.child_nodes(div), vec![text]);
        assert_eq!(store.remove_child(body, div), Err(DomError::NotFound));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut store = NodeStore::new();
        let (doc, body) = document_with_body(&mut store);
        let div = store.create_element(doc, "div");
        let text = store.create_text_node(doc, "hi");
        store.append_child(body, div).unwrap();
        store.append_child(div, text).unwrap();

        let shallow = store.clone_node(div, false);
        assert!(!store.has_child_nodes(shallow));
        assert_eq!(store.parent(shallow), None);

        let deep = store.clone_node(div, true);
        let copied_text = store.first_child(deep).unwrap();
        assert_ne!(copied_text, text);
        store.set_text_content(copied_text, "changed");
        assert_eq!(store.node_value(text), Some("hi"));
    }

    #[test]
    fn test_adopt_and_import() {
        let mut store = NodeStore::new();
        let (doc, body) = document_with_body(&mut store);
        let other = store.create_document();
        let div = store.create_element(doc, "div");
        store.append_child(body, div).unwrap();

        let imported = store.import_node(other, div, true).unwrap();
        assert_eq!(store.get(imported).and_then(Node::owner_document), Some(other));
        assert_eq!(store.parent(div), Some(body));

        let adopted = store.adopt_node(other, div).unwrap();
        assert_eq!(adopted, div);
        assert_eq!(store.parent(div), None);
        assert_eq!(store.get(div).and_then(Node::owner_document), Some(other));

        assert_eq!(store.adopt_node(other, doc), Err(DomError::NotSupported));
        assert_eq!(store.import_node(other, doc, false), Err(DomError::NotSupported));
    }

    #[test]
    fn test_normalize() {
        let mut store = NodeStore::new();
        let (doc, body) = document_with_body(&mut store);
        let p = store.create_element(doc, "p");
        store.append_child(body, p).unwrap();
        for data in ["a", "", "b"] {
            let t = store.create_text_node(doc, data);
            store.append_child(p, t).unwrap();
        }
        let span = store.create_element(doc, "span");
        store.append_child(p, span).unwrap();
        let empty = store.create_text_node(doc, "");
        store.append_child(span, empty).unwrap();

        store.normalize(body);
        let children = store.child_nodes(p);
        assert_eq!(children.len(), 2);
        assert_eq!(store.node_value(children[0]), Some("ab"));
        assert!(!store.has_child_nodes(span));

        store.normalize(body);
        assert_eq!(store.child_nodes(p), children);
    }

    #[test]
    fn test_insert_adjacent() {
        let mut store = NodeStore::new();
        let (doc, body) = document_with_body(&mut store);
        let target = store.create_element(doc, "div");
        store.append_child(body, target).unwrap();
        let inner = store.create_element(doc, "i");
        store.insert_adjacent(target, "afterBegin".parse().unwrap(), inner).unwrap();
        store
            .insert_adjacent_text(target, InsertPosition::AfterEnd, "tail")
            .unwrap();
        assert_eq!(store.first_child(target), Some(inner));
        assert_eq!(store.child_nodes(body).len(), 2);

        assert!(matches!("middle".parse::<InsertPosition>(), Err(DomError::Syntax(_))));
        let loose = store.create_element(doc, "div");
        assert_eq!(
            store.insert_adjacent_text(loose, InsertPosition::BeforeBegin, "x"),
            Err(DomError::NoParent)
        );
        let text = store.create_text_node(doc, "t");
        assert_eq!(
            store.insert_adjacent_element(target, InsertPosition::BeforeEnd, text),
            Err(DomError::InvalidNodeType)
        );
    }
}
