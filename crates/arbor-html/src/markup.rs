//! Markup-level mutation: innerHTML, outerHTML and insertAdjacentHTML
//!
//! Fragments are parsed as `<body>` content, collected into a
//! DocumentFragment owned by the target's document and inserted in one
//! step, so a rejected insertion leaves the tree as it was.

use arbor_dom::{DomError, InsertPosition, NodeId, NodeStore, NodeType};
use tracing::trace;

use crate::error::Result;
use crate::parser::HtmlParser;
use crate::serializer::HtmlSerializer;

impl HtmlParser {
    /// Parse `html` into a new DocumentFragment owned by `document`
    pub fn fragment(&self, store: &mut NodeStore, document: NodeId, html: &str) -> Result<NodeId> {
        let fragment = store.create_document_fragment(document);
        for node in self.parse_fragment(store, document, html) {
            store.append_child(fragment, node)?;
        }
        Ok(fragment)
    }

    /// Replace the children of an element or fragment with parsed markup
    pub fn set_inner_html(&self, store: &mut NodeStore, node: NodeId, html: &str) -> Result<()> {
        if !matches!(
            store.node_type(node),
            NodeType::Element | NodeType::DocumentFragment
        ) {
            return Err(DomError::InvalidNodeType.into());
        }
        let document = target_document(store, node)?;
        let fragment = self.fragment(store, document, html)?;

        store.set_text_content(node, "");
        store.append_child(node, fragment)?;
        trace!(%node, "set innerHTML");
        Ok(())
    }

    /// Replace an element with parsed markup
    pub fn set_outer_html(&self, store: &mut NodeStore, node: NodeId, html: &str) -> Result<()> {
        if !store.is_element(node) {
            return Err(DomError::InvalidNodeType.into());
        }
        let parent = store.parent(node).ok_or(DomError::NoParent)?;
        let document = target_document(store, node)?;
        let fragment = self.fragment(store, document, html)?;

        store.insert_before(parent, fragment, Some(node))?;
        store.remove_child(parent, node)?;
        trace!(%node, "set outerHTML");
        Ok(())
    }

    /// Insert parsed markup relative to an element
    pub fn insert_adjacent_html(
        &self,
        store: &mut NodeStore,
        node: NodeId,
        position: InsertPosition,
        html: &str,
    ) -> Result<()> {
        if !store.is_element(node) {
            return Err(DomError::InvalidNodeType.into());
        }
        let document = target_document(store, node)?;
        let fragment = self.fragment(store, document, html)?;
        store.insert_adjacent(node, position, fragment)?;
        Ok(())
    }
}

/// Document that should own nodes parsed for `node`
fn target_document(store: &NodeStore, node: NodeId) -> Result<NodeId> {
    match store.owner_document(node) {
        Some(document) => Ok(document),
        None => Err(DomError::InvalidNodeType.into()),
    }
}

/// Markup accessors on the node store, using default parser and
/// serializer settings
pub trait HtmlMarkup {
    fn inner_html(&self, node: NodeId) -> String;

    fn outer_html(&self, node: NodeId) -> String;

    fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<()>;

    /// Fails with `NoParent` for a detached element
    fn set_outer_html(&mut self, node: NodeId, html: &str) -> Result<()>;

    fn insert_adjacent_html(&mut self, node: NodeId, position: InsertPosition, html: &str) -> Result<()>;
}

impl HtmlMarkup for NodeStore {
    fn inner_html(&self, node: NodeId) -> String {
        HtmlSerializer::new().serialize_inner(self, node)
    }

    fn outer_html(&self, node: NodeId) -> String {
        HtmlSerializer::new().serialize_outer(self, node)
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<()> {
        HtmlParser::new().set_inner_html(self, node, html)
    }

    fn set_outer_html(&mut self, node: NodeId, html: &str) -> Result<()> {
        HtmlParser::new().set_outer_html(self, node, html)
    }

    fn insert_adjacent_html(&mut self, node: NodeId, position: InsertPosition, html: &str) -> Result<()> {
        HtmlParser::new().insert_adjacent_html(self, node, position, html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HtmlError;

    fn document_with(html: &str) -> (NodeStore, NodeId) {
        let mut store = NodeStore::new();
        let doc = HtmlParser::new().parse(&mut store, html);
        (store, doc)
    }

    #[test]
    fn test_inner_html_roundtrip() {
        let (mut store, doc) = document_with("<div></div>");
        let div = store.get_elements_by_tag_name(doc, "div")[0];
        store.set_inner_html(div, "<span>hello</span>").unwrap();
        assert_eq!(store.inner_html(div), "<span>hello</span>");

        let span = store.first_child(div).unwrap();
        assert_eq!(store.owner_document(span), Some(doc));
        assert!(store.is_connected(span));
    }

    #[test]
    fn test_inner_html_replaces_children() {
        let (mut store, doc) = document_with("<p>old <b>text</b></p>");
        let p = store.get_elements_by_tag_name(doc, "p")[0];
        let old = store.first_child(p).unwrap();
        store.set_inner_html(p, "new").unwrap();
        assert_eq!(store.inner_html(p), "new");
        assert_eq!(store.parent(old), None);
    }

    #[test]
    fn test_inner_html_on_fragment() {
        let mut store = NodeStore::new();
        let doc = store.create_document();
        let fragment = store.create_document_fragment(doc);
        store.set_inner_html(fragment, "<i>a</i>b").unwrap();
        assert_eq!(store.child_nodes(fragment).len(), 2);

        let text = store.create_text_node(doc, "x");
        assert_eq!(
            store.set_inner_html(text, "<i></i>"),
            Err(HtmlError::Dom(DomError::InvalidNodeType))
        );
    }

    #[test]
    fn test_outer_html() {
        let (mut store, doc) = document_with("<div><span>old</span></div>");
        let div = store.get_elements_by_tag_name(doc, "div")[0];
        let span = store.first_child(div).unwrap();

        store.set_outer_html(span, "<b>1</b><i>2</i>").unwrap();
        assert_eq!(store.inner_html(div), "<b>1</b><i>2</i>");
        assert_eq!(store.parent(span), None);

        assert_eq!(
            store.set_outer_html(span, "<p></p>"),
            Err(HtmlError::Dom(DomError::NoParent))
        );
    }

    #[test]
    fn test_insert_adjacent_html() {
        let (mut store, doc) = document_with("<ul><li>b</li></ul>");
        let li = store.get_elements_by_tag_name(doc, "li")[0];
        let ul = store.parent(li).unwrap();

        store.insert_adjacent_html(li, InsertPosition::BeforeBegin, "<li>a</li>").unwrap();
        store.insert_adjacent_html(li, InsertPosition::AfterEnd, "<li>c</li>").unwrap();
        store.insert_adjacent_html(li, InsertPosition::AfterBegin, "[").unwrap();
        store.insert_adjacent_html(li, InsertPosition::BeforeEnd, "]").unwrap();
        assert_eq!(store.inner_html(ul), "<li>a</li><li>[b]</li><li>c</li>");

        let detached = store.create_element(doc, "div");
        assert_eq!(
            store.insert_adjacent_html(detached, InsertPosition::AfterEnd, "x"),
            Err(HtmlError::Dom(DomError::NoParent))
        );
    }
}
