//! Namespace resolution and namespaced attributes
//!
//! Lookups walk the element chain twice: first for `xmlns` / `xmlns:p`
//! declarations (nearest wins), then for an element whose own
//! `(prefix, namespace)` binds the prefix.

use tracing::trace;

use crate::attributes::validate_attribute_name;
use crate::error::{DomError, DomResult};
use crate::node::{Attribute, ElementData, NodeData, QualName};
use crate::tree::NodeStore;
use crate::NodeId;

/// Well-known namespace URIs
pub mod ns {
    pub const HTML: &str = "http://www.w3.org/1999/xhtml";
    pub const SVG: &str = "http://www.w3.org/2000/svg";
    pub const MATHML: &str = "http://www.w3.org/1998/Math/MathML";
    pub const XLINK: &str = "http://www.w3.org/1999/xlink";
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
}

/// What an attribute declares: `Some(None)` for a default namespace,
/// `Some(Some(p))` for prefix `p`
///
/// Covers both properly namespaced declarations and the plain
/// `xmlns:p` attributes the HTML parser leaves on HTML elements.
fn declaration(attr: &Attribute) -> Option<Option<&str>> {
    match (attr.prefix(), attr.local_name()) {
        (None, "xmlns") => Some(None),
        (Some("xmlns"), local) => Some(Some(local)),
        (None, local) if attr.name.ns.is_empty() => local.strip_prefix("xmlns:").map(Some),
        _ => None,
    }
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// Split and validate a qualified name against a namespace
pub(crate) fn validate_and_extract(namespace: Option<&str>, qualified: &str) -> DomResult<QualName> {
    let namespace = namespace.and_then(non_empty);
    let (prefix, local) = match qualified.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qualified),
    };
    validate_attribute_name(local)?;
    if let Some(prefix) = prefix {
        validate_attribute_name(prefix)?;
        if local.contains(':') {
            return Err(DomError::InvalidCharacter(qualified.to_owned()));
        }
    }

    if prefix.is_some() && namespace.is_none() {
        return Err(DomError::Namespace("prefix without a namespace"));
    }
    if prefix == Some("xml") && namespace != Some(ns::XML) {
        return Err(DomError::Namespace("xml prefix outside the XML namespace"));
    }
    let xmlns_name = qualified == "xmlns" || prefix == Some("xmlns");
    if xmlns_name != (namespace == Some(ns::XMLNS)) {
        return Err(DomError::Namespace("xmlns names belong to the XMLNS namespace"));
    }

    Ok(QualName::new(
        prefix.map(str::to_owned),
        namespace.unwrap_or(""),
        local,
    ))
}

impl NodeStore {
    /// Element where a lookup starts
    fn namespace_scope(&self, node: NodeId) -> Option<NodeId> {
        match self.data(node) {
            NodeData::Element(_) => Some(node),
            NodeData::Document => self.document_element(node),
            NodeData::Text(_) | NodeData::Comment(_) | NodeData::ProcessingInstruction { .. } => {
                self.parent_element(node)
            }
            NodeData::Doctype { .. } | NodeData::DocumentFragment => None,
        }
    }

    fn scope_elements(&self, start: NodeId) -> impl Iterator<Item = &ElementData> + '_ {
        self.inclusive_ancestors(start)
            .filter_map(|id| self.node(id).as_element())
    }

    /// Namespace bound to `prefix` (`None` = default namespace) at `node`
    pub fn lookup_namespace_uri(&self, node: NodeId, prefix: Option<&str>) -> Option<&str> {
        let prefix = prefix.and_then(non_empty);
        match prefix {
            Some("xml") => return Some(ns::XML),
            Some("xmlns") => return Some(ns::XMLNS),
            _ => {}
        }
        let start = self.namespace_scope(node)?;
        let bound_by_name =
            |el: &ElementData| el.name.prefix.as_deref() == prefix && !el.name.ns.is_empty();

        if prefix.is_some() {
            // nearest binding wins, the element's own name before its declarations
            for el in self.scope_elements(start) {
                if bound_by_name(el) {
                    return Some(el.name.ns.as_str());
                }
                if let Some(attr) = el.attrs().iter().find(|a| declaration(a) == Some(prefix)) {
                    return non_empty(&attr.value);
                }
            }
            return None;
        }

        for el in self.scope_elements(start) {
            if let Some(attr) = el.attrs().iter().find(|a| declaration(a) == Some(None)) {
                return non_empty(&attr.value);
            }
        }
        self.scope_elements(start)
            .find(|&el| bound_by_name(el))
            .map(|el| el.name.ns.as_str())
    }

    /// Prefix bound to `namespace` at `node`; default declarations never count
    pub fn lookup_prefix(&self, node: NodeId, namespace: Option<&str>) -> Option<&str> {
        let namespace = namespace.and_then(non_empty)?;
        let start = self.namespace_scope(node)?;
        let in_scope = |prefix: &str| self.lookup_namespace_uri(start, Some(prefix)) == Some(namespace);

        self.scope_elements(start).find_map(|el| {
            if let Some(prefix) = el.name.prefix.as_deref()
                && el.name.ns == namespace
                && in_scope(prefix)
            {
                return Some(prefix);
            }
            el.attrs().iter().find_map(|a| match declaration(a) {
                Some(Some(prefix)) if a.value == namespace && in_scope(prefix) => Some(prefix),
                _ => None,
            })
        })
    }

    /// `namespace` (empty = none) is the default namespace at `node`
    pub fn is_default_namespace(&self, node: NodeId, namespace: Option<&str>) -> bool {
        self.lookup_namespace_uri(node, None) == namespace.and_then(non_empty)
    }

    /// Element namespace, `None` for no namespace or non-elements
    pub fn namespace_uri(&self, element: NodeId) -> Option<&str> {
        self.element(element)?.name.namespace()
    }

    pub fn prefix(&self, element: NodeId) -> Option<&str> {
        self.element(element)?.name.prefix.as_deref()
    }

    pub fn local_name(&self, element: NodeId) -> Option<&str> {
        Some(self.element(element)?.local_name())
    }

    /// Create an element with an explicit namespace and qualified name
    pub fn create_element_ns(
        &mut self,
        document: NodeId,
        namespace: Option<&str>,
        qualified: &str,
    ) -> DomResult<NodeId> {
        let name = validate_element_name(namespace, qualified)?;
        Ok(self.create_node(document, NodeData::Element(ElementData::new(name))))
    }

    pub fn get_attribute_ns(
        &self,
        element: NodeId,
        namespace: Option<&str>,
        local: &str,
    ) -> Option<&str> {
        let namespace = namespace.unwrap_or("");
        self.element(element)?
            .attr_ns(namespace, local)
            .map(|a| a.value.as_str())
    }

    pub fn has_attribute_ns(&self, element: NodeId, namespace: Option<&str>, local: &str) -> bool {
        self.get_attribute_ns(element, namespace, local).is_some()
    }

    /// Set an attribute keyed by `(namespace, local)`
    pub fn set_attribute_ns(
        &mut self,
        element: NodeId,
        namespace: Option<&str>,
        qualified: &str,
        value: &str,
    ) -> DomResult<()> {
        if !self.is_element(element) {
            return Err(DomError::InvalidNodeType);
        }
        let name = validate_and_extract(namespace, qualified)?;
        trace!(?element, name = %name.qualified(), "set namespaced attribute");
        self.write_attribute(element, name, value.to_owned())
    }

    pub fn remove_attribute_ns(
        &mut self,
        element: NodeId,
        namespace: Option<&str>,
        local: &str,
    ) -> bool {
        let namespace = namespace.unwrap_or("");
        let position = self
            .element(element)
            .and_then(|el| el.attr_ns_position(namespace, local));
        match position {
            Some(position) => self.drop_attribute(element, position).is_some(),
            None => false,
        }
    }
}

/// Element names follow attribute rules, minus the xmlns exemption
fn validate_element_name(namespace: Option<&str>, qualified: &str) -> DomResult<QualName> {
    let name = validate_and_extract(namespace, qualified)?;
    if name.ns == ns::XMLNS {
        return Err(DomError::Namespace("elements cannot live in the XMLNS namespace"));
    }
    Ok(name)
}
