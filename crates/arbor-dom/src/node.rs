//! DOM Node - Compact representation
//!
//! Nodes live in the [`NodeStore`](crate::NodeStore) arena and link to each
//! other through [`NodeId`] handles:
//! - parent / first child / last child / previous sibling / next sibling
//! - owner document (back-reference, `NONE` for documents)
//!
//! Child order is only stored in the sibling links.

use std::borrow::Cow;

use crate::ns;
use crate::NodeId;

/// Node type constants, numbered like the DOM `nodeType` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    ProcessingInstruction = 7,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
}

impl NodeType {
    /// Numeric `nodeType` value
    #[inline]
    pub fn value(self) -> u16 {
        self as u16
    }
}

/// Qualified name: optional prefix, namespace URI ("" for none) and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QualName {
    pub prefix: Option<String>,
    pub ns: String,
    pub local: String,
}

impl QualName {
    pub fn new(prefix: Option<String>, ns: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            prefix,
            ns: ns.into(),
            local: local.into(),
        }
    }

    /// Element name in the XHTML namespace
    pub fn html(local: impl Into<String>) -> Self {
        Self::new(None, ns::HTML, local)
    }

    /// Name with no namespace and no prefix (plain HTML attributes)
    pub fn local(local: impl Into<String>) -> Self {
        Self::new(None, "", local)
    }

    /// `prefix:local`, or just `local`
    pub fn qualified(&self) -> Cow<'_, str> {
        match &self.prefix {
            Some(prefix) => Cow::Owned(format!("{}:{}", prefix, self.local)),
            None => Cow::Borrowed(&self.local),
        }
    }

    /// Namespace URI, `None` when the name has no namespace
    #[inline]
    pub fn namespace(&self) -> Option<&str> {
        (!self.ns.is_empty()).then_some(self.ns.as_str())
    }

    /// Same `(namespace, local)` key, prefix ignored
    #[inline]
    pub fn same_key(&self, ns: &str, local: &str) -> bool {
        self.ns == ns && self.local == local
    }
}

/// Element attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    pub fn new(name: QualName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    #[inline]
    pub fn local_name(&self) -> &str {
        &self.name.local
    }

    #[inline]
    pub fn namespace(&self) -> Option<&str> {
        self.name.namespace()
    }

    #[inline]
    pub fn prefix(&self) -> Option<&str> {
        self.name.prefix.as_deref()
    }

    pub fn qualified_name(&self) -> Cow<'_, str> {
        self.name.qualified()
    }
}

/// Element-specific data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub name: QualName,
    pub(crate) attrs: Vec<Attribute>,
}

impl ElementData {
    pub fn new(name: QualName) -> Self {
        Self {
            name,
            attrs: Vec::new(),
        }
    }

    pub fn with_attrs(name: QualName, attrs: Vec<Attribute>) -> Self {
        Self { name, attrs }
    }

    /// Attributes in insertion order
    #[inline]
    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    #[inline]
    pub fn local_name(&self) -> &str {
        &self.name.local
    }

    /// In the XHTML namespace
    #[inline]
    pub fn is_html(&self) -> bool {
        self.name.ns == ns::HTML
    }

    /// Check for a specific HTML element
    #[inline]
    pub fn is(&self, local: &str) -> bool {
        self.is_html() && self.name.local == local
    }

    /// `tagName`: upper-cased for HTML elements
    pub fn tag_name(&self) -> String {
        let qualified = self.name.qualified();
        if self.is_html() {
            qualified.to_ascii_uppercase()
        } else {
            qualified.into_owned()
        }
    }

    /// First attribute whose qualified name equals `name`
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.name.qualified() == name)
    }

    pub(crate) fn attr_position(&self, name: &str) -> Option<usize> {
        self.attrs.iter().position(|a| a.name.qualified() == name)
    }

    /// Attribute keyed by `(namespace, local)`
    pub fn attr_ns(&self, ns: &str, local: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.name.same_key(ns, local))
    }

    pub(crate) fn attr_ns_position(&self, ns: &str, local: &str) -> Option<usize> {
        self.attrs.iter().position(|a| a.name.same_key(ns, local))
    }

    /// Value of a null-namespace attribute
    #[inline]
    pub fn get(&self, local: &str) -> Option<&str> {
        self.attr_ns("", local).map(|a| a.value.as_str())
    }

    /// `id` attribute value, if present
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    /// Whitespace-separated tokens of the `class` attribute
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get("class").unwrap_or("").split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }
}

/// Node data variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Document root
    Document,
    /// Lightweight container whose children move on insertion
    DocumentFragment,
    /// `<!DOCTYPE name>`
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// Element node
    Element(ElementData),
    /// Text node
    Text(String),
    /// Comment node
    Comment(String),
    /// `<?target data?>`
    ProcessingInstruction { target: String, data: String },
}

impl NodeData {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeData::Document => NodeType::Document,
            NodeData::DocumentFragment => NodeType::DocumentFragment,
            NodeData::Doctype { .. } => NodeType::DocumentType,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
            NodeData::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
        }
    }

    /// Can hold children
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeData::Document | NodeData::DocumentFragment | NodeData::Element(_)
        )
    }

    /// Character data (Text, Comment, ProcessingInstruction)
    pub fn character_data(&self) -> Option<&str> {
        match self {
            NodeData::Text(data) | NodeData::Comment(data) => Some(data),
            NodeData::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }

    pub(crate) fn character_data_mut(&mut self) -> Option<&mut String> {
        match self {
            NodeData::Text(data) | NodeData::Comment(data) => Some(data),
            NodeData::ProcessingInstruction { data, .. } => Some(data),
            _ => None,
        }
    }
}

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: NodeId,
    pub(crate) first_child: NodeId,
    pub(crate) last_child: NodeId,
    pub(crate) prev_sibling: NodeId,
    pub(crate) next_sibling: NodeId,
    /// Owner document (NONE for documents)
    pub(crate) owner_document: NodeId,
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData, owner_document: NodeId) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            owner_document,
            data,
        }
    }

    #[inline]
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent.some()
    }

    #[inline]
    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child.some()
    }

    #[inline]
    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child.some()
    }

    #[inline]
    pub fn prev_sibling(&self) -> Option<NodeId> {
        self.prev_sibling.some()
    }

    #[inline]
    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling.some()
    }

    #[inline]
    pub fn owner_document(&self) -> Option<NodeId> {
        self.owner_document.some()
    }

    #[inline]
    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    #[inline]
    pub fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document)
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// `nodeName`
    pub fn node_name(&self) -> Cow<'_, str> {
        match &self.data {
            NodeData::Document => Cow::Borrowed("#document"),
            NodeData::DocumentFragment => Cow::Borrowed("#document-fragment"),
            NodeData::Doctype { name, .. } => Cow::Borrowed(name),
            NodeData::Element(el) => Cow::Owned(el.tag_name()),
            NodeData::Text(_) => Cow::Borrowed("#text"),
            NodeData::Comment(_) => Cow::Borrowed("#comment"),
            NodeData::ProcessingInstruction { target, .. } => Cow::Borrowed(target),
        }
    }

    /// `nodeValue`: character data, `None` for everything else
    #[inline]
    pub fn node_value(&self) -> Option<&str> {
        self.data.character_data()
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_names() {
        let div = Node::new(NodeData::Element(ElementData::new(QualName::html("div"))), NodeId::NONE);
        assert_eq!(div.node_name(), "DIV");
        assert_eq!(div.node_type().value(), 1);

        let svg = Node::new(
            NodeData::Element(ElementData::new(QualName::new(None, ns::SVG, "svg"))),
            NodeId::NONE,
        );
        assert_eq!(svg.node_name(), "svg");

        let text = Node::new(NodeData::Text("hi".into()), NodeId::NONE);
        assert_eq!(text.node_name(), "#text");
        assert_eq!(text.node_value(), Some("hi"));

        let doc = Node::new(NodeData::Document, NodeId::NONE);
        assert_eq!(doc.node_name(), "#document");
        assert_eq!(doc.node_value(), None);
        assert_eq!(doc.node_type().value(), 9);
    }

    #[test]
    fn test_qualified_name() {
        let name = QualName::new(Some("xlink".into()), ns::XLINK, "href");
        assert_eq!(name.qualified(), "xlink:href");
        assert!(name.same_key(ns::XLINK, "href"));
        assert_eq!(QualName::local("id").namespace(), None);
    }

    #[test]
    fn test_classes() {
        let mut el = ElementData::new(QualName::html("p"));
        el.attrs.push(Attribute::new(QualName::local("class"), " a  b\tc "));
        assert_eq!(el.classes().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(el.has_class("b"));
        assert!(!el.has_class("d"));
    }
}
