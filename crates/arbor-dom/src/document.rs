//! Document - High-level document API
//!
//! Document accessors, `getElementsBy*` lookups and element traversal.

use crate::node::NodeData;
use crate::tree::NodeStore;
use crate::NodeId;

impl NodeStore {
    /// Owner document; `None` for documents themselves
    pub fn owner_document(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).owner_document()
    }

    /// The document's element child (`<html>`)
    pub fn document_element(&self, document: NodeId) -> Option<NodeId> {
        self.children(document).find(|&c| self.is_element(c))
    }

    pub fn doctype(&self, document: NodeId) -> Option<NodeId> {
        self.children(document)
            .find(|&c| matches!(self.data(c), NodeData::Doctype { .. }))
    }

    /// `<head>` child of the `<html>` element
    pub fn head(&self, document: NodeId) -> Option<NodeId> {
        self.html_child(document, "head")
    }

    /// `<body>` child of the `<html>` element
    pub fn body(&self, document: NodeId) -> Option<NodeId> {
        self.html_child(document, "body")
    }

    fn html_child(&self, document: NodeId, local: &str) -> Option<NodeId> {
        let html = self
            .document_element(document)
            .filter(|&id| self.element(id).is_some_and(|el| el.is("html")))?;
        self.children(html)
            .find(|&c| self.element(c).is_some_and(|el| el.is(local)))
    }

    /// Text of the first `<title>`, whitespace stripped and collapsed
    pub fn title(&self, document: NodeId) -> String {
        let Some(title) = self
            .descendants(document)
            .find(|&id| self.element(id).is_some_and(|el| el.is("title")))
        else {
            return String::new();
        };

        let text: String = self
            .children(title)
            .filter_map(|c| self.node(c).as_text())
            .collect();
        text.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// First element in tree order with the given id
    ///
    /// Documents answer from the id index; other scopes scan their subtree.
    pub fn get_element_by_id(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        if self.node(scope).is_document() {
            return self.indexed_element(scope, id);
        }
        self.descendants(scope)
            .find(|&n| self.element(n).and_then(|el| el.id()) == Some(id))
    }

    /// Descendant elements by qualified name; `*` matches everything
    pub fn get_elements_by_tag_name(&self, scope: NodeId, name: &str) -> Vec<NodeId> {
        let lowered = name.to_ascii_lowercase();
        self.descendants(scope)
            .filter(|&n| match self.element(n) {
                Some(_) if name == "*" => true,
                Some(el) if el.is_html() => el.name.qualified() == lowered,
                Some(el) => el.name.qualified() == name,
                None => false,
            })
            .collect()
    }

    /// Descendant elements carrying every listed class
    pub fn get_elements_by_class_name(&self, scope: NodeId, names: &str) -> Vec<NodeId> {
        let wanted: Vec<&str> = names.split_ascii_whitespace().collect();
        if wanted.is_empty() {
            return Vec::new();
        }
        self.descendants(scope)
            .filter(|&n| {
                self.element(n)
                    .is_some_and(|el| wanted.iter().all(|class| el.has_class(class)))
            })
            .collect()
    }

    // ---- element traversal ----------------------------------------------

    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    /// Element children in order
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).filter(|&c| self.is_element(c)).collect()
    }

    pub fn child_element_count(&self, id: NodeId) -> usize {
        self.children(id).filter(|&c| self.is_element(c)).count()
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).find(|&c| self.is_element(c))
    }

    pub fn last_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).rev().find(|&c| self.is_element(c))
    }

    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        std::iter::successors(self.previous_sibling(id), |&n| self.previous_sibling(n))
            .find(|&n| self.is_element(n))
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        std::iter::successors(self.next_sibling(id), |&n| self.next_sibling(n))
            .find(|&n| self.is_element(n))
    }
}
