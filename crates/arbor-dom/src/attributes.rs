//! Element Attributes
//!
//! Attribute manipulation: get, set, remove, has, toggle. All writes go
//! through [`NodeStore::write_attribute`] / [`NodeStore::drop_attribute`] so
//! the id index stays in sync.

use std::borrow::Cow;

use crate::error::{DomError, DomResult};
use crate::node::{Attribute, QualName};
use crate::tree::NodeStore;
use crate::NodeId;

/// Reject names the HTML serializer could not round-trip
pub(crate) fn validate_attribute_name(name: &str) -> DomResult<()> {
    let invalid = name.is_empty()
        || name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '<' | '/' | '=')
        });
    if invalid {
        return Err(DomError::InvalidCharacter(name.to_owned()));
    }
    Ok(())
}

impl NodeStore {
    /// HTML elements match attribute names lower-cased
    fn attribute_name<'a>(&self, element: NodeId, name: &'a str) -> Cow<'a, str> {
        match self.element(element) {
            Some(el) if el.is_html() && name.bytes().any(|b| b.is_ascii_uppercase()) => {
                Cow::Owned(name.to_ascii_lowercase())
            }
            _ => Cow::Borrowed(name),
        }
    }

    /// Set or overwrite the attribute keyed by `(name.ns, name.local)`
    ///
    /// An existing attribute keeps its prefix and position.
    pub(crate) fn write_attribute(
        &mut self,
        element: NodeId,
        name: QualName,
        value: String,
    ) -> DomResult<()> {
        let tracked_id = (name.ns.is_empty() && name.local == "id").then(|| value.clone());
        let document = match tracked_id {
            Some(_) => self.connected_document(element),
            None => None,
        };

        let el = self
            .node_mut(element)
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType)?;
        let previous = match el.attr_ns_position(&name.ns, &name.local) {
            Some(position) => Some(std::mem::replace(&mut el.attrs[position].value, value)),
            None => {
                el.attrs.push(Attribute::new(name, value));
                None
            }
        };

        if let (Some(document), Some(current)) = (document, tracked_id) {
            if let Some(previous) = previous {
                self.unindex_id(document, &previous, element);
            }
            self.index_id(document, current, element);
        }
        Ok(())
    }

    /// Remove the attribute at `position`
    pub(crate) fn drop_attribute(&mut self, element: NodeId, position: usize) -> Option<Attribute> {
        let document = self.connected_document(element);
        let el = self.node_mut(element).as_element_mut()?;
        if position >= el.attrs.len() {
            return None;
        }
        let removed = el.attrs.remove(position);
        if let Some(document) = document
            && removed.name.same_key("", "id")
        {
            self.unindex_id(document, &removed.value, element);
        }
        Some(removed)
    }

    /// Attributes in insertion order (empty for non-elements)
    pub fn attributes(&self, element: NodeId) -> &[Attribute] {
        self.element(element).map(|el| el.attrs()).unwrap_or(&[])
    }

    pub fn has_attributes(&self, element: NodeId) -> bool {
        !self.attributes(element).is_empty()
    }

    /// Qualified names in insertion order
    pub fn get_attribute_names(&self, element: NodeId) -> Vec<String> {
        self.attributes(element)
            .iter()
            .map(|a| a.qualified_name().into_owned())
            .collect()
    }

    /// Get attribute value by qualified name
    pub fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        let name = self.attribute_name(element, name);
        self.element(element)?.attr(&name).map(|a| a.value.as_str())
    }

    pub fn has_attribute(&self, element: NodeId, name: &str) -> bool {
        self.get_attribute(element, name).is_some()
    }

    /// Set attribute by qualified name
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> DomResult<()> {
        validate_attribute_name(name)?;
        let name = self.attribute_name(element, name);
        let el = self.element(element).ok_or(DomError::InvalidNodeType)?;
        let key = match el.attr(&name) {
            Some(existing) => existing.name.clone(),
            None => QualName::local(name.into_owned()),
        };
        self.write_attribute(element, key, value.to_owned())
    }

    /// Remove attribute by qualified name; returns whether one was removed
    pub fn remove_attribute(&mut self, element: NodeId, name: &str) -> bool {
        let name = self.attribute_name(element, name);
        let position = self.element(element).and_then(|el| el.attr_position(&name));
        match position {
            Some(position) => self.drop_attribute(element, position).is_some(),
            None => false,
        }
    }

    /// Toggle attribute, returns whether it is present afterwards
    pub fn toggle_attribute(
        &mut self,
        element: NodeId,
        name: &str,
        force: Option<bool>,
    ) -> DomResult<bool> {
        validate_attribute_name(name)?;
        let present = self.has_attribute(element, name);
        match force {
            Some(true) => {
                if !present {
                    self.set_attribute(element, name, "")?;
                }
                Ok(true)
            }
            Some(false) => {
                self.remove_attribute(element, name);
                Ok(false)
            }
            None => {
                if present {
                    self.remove_attribute(element, name);
                    Ok(false)
                } else {
                    self.set_attribute(element, name, "")?;
                    Ok(true)
                }
            }
        }
    }

    /// `id` attribute, empty when absent
    pub fn id(&self, element: NodeId) -> &str {
        self.element(element).and_then(|el| el.id()).unwrap_or("")
    }

    pub fn set_id(&mut self, element: NodeId, id: &str) -> DomResult<()> {
        self.set_attribute(element, "id", id)
    }

    /// `class` attribute, empty when absent
    pub fn class_name(&self, element: NodeId) -> &str {
        self.element(element)
            .and_then(|el| el.get("class"))
            .unwrap_or("")
    }

    pub fn set_class_name(&mut self, element: NodeId, class: &str) -> DomResult<()> {
        self.set_attribute(element, "class", class)
    }

    /// `tagName`, `None` for non-elements
    pub fn tag_name(&self, element: NodeId) -> Option<String> {
        self.element(element).map(|el| el.tag_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element() -> (NodeStore, NodeId, NodeId) {
        let mut store = NodeStore::new();
        let doc = store.create_document();
        let div = store.create_element(doc, "DIV");
        (store, doc, div)
    }

    #[test]
    fn test_set_get_attribute() {
        let (mut store, _, div) = element();
        store.set_attribute(div, "Title", "hello").unwrap();
        assert_eq!(store.get_attribute(div, "title"), Some("hello"));
        assert_eq!(store.get_attribute(div, "TITLE"), Some("hello"));
        store.set_attribute(div, "title", "again").unwrap();
        assert_eq!(store.attributes(div).len(), 1);
        assert_eq!(store.get_attribute_names(div), vec!["title"]);
    }

    #[test]
    fn test_insertion_order() {
        let (mut store, _, div) = element();
        for name in ["b", "a", "c"] {
            store.set_attribute(div, name, "").unwrap();
        }
        store.set_attribute(div, "a", "changed").unwrap();
        assert_eq!(store.get_attribute_names(div), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_invalid_names() {
        let (mut store, _, div) = element();
        assert!(matches!(
            store.set_attribute(div, "", "x"),
            Err(DomError::InvalidCharacter(_))
        ));
        assert!(store.set_attribute(div, "a b", "x").is_err());
        assert!(!store.has_attributes(div));
    }

    #[test]
    fn test_toggle_attribute() {
        let (mut store, _, div) = element();
        assert_eq!(store.toggle_attribute(div, "hidden", None), Ok(true));
        assert!(store.has_attribute(div, "hidden"));
        assert_eq!(store.toggle_attribute(div, "hidden", Some(true)), Ok(true));
        assert_eq!(store.toggle_attribute(div, "hidden", None), Ok(false));
        assert_eq!(store.toggle_attribute(div, "hidden", Some(false)), Ok(false));
        assert!(!store.has_attribute(div, "hidden"));
    }

    #[test]
    fn test_remove_attribute() {
        let (mut store, _, div) = element();
        store.set_class_name(div, "a b").unwrap();
        assert_eq!(store.class_name(div), "a b");
        assert!(store.remove_attribute(div, "class"));
        assert!(!store.remove_attribute(div, "class"));
        assert_eq!(store.class_name(div), "");
    }

    #[test]
    fn test_id_changes_update_index() {
        let (mut store, doc, div) = element();
        store.append_child(doc, div).unwrap();
        store.set_id(div, "first").unwrap();
        assert_eq!(store.indexed_element(doc, "first"), Some(div));
        store.set_id(div, "second").unwrap();
        assert_eq!(store.indexed_element(doc, "first"), None);
        assert_eq!(store.indexed_element(doc, "second"), Some(div));
        store.remove_attribute(div, "id");
        assert_eq!(store.indexed_element(doc, "second"), None);
        assert_eq!(store.id(div), "");
    }

    #[test]
    fn test_non_element() {
        let (mut store, doc, _) = element();
        let text = store.create_text_node(doc, "t");
        assert_eq!(store.set_attribute(text, "a", "b"), Err(DomError::InvalidNodeType));
        assert_eq!(store.get_attribute(text, "a"), None);
        assert_eq!(store.tag_name(text), None);
    }
}
