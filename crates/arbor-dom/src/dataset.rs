//! DOMStringMap (dataset)
//!
//! Live views over null-namespace `data-*` attributes.
//! `data-user-id` is exposed as `userId`.

use crate::error::{DomError, DomResult};
use crate::node::Attribute;
use crate::tree::NodeStore;
use crate::NodeId;

/// `data-*` attribute name -> dataset key; `None` for other attributes
fn key_for(attr: &Attribute) -> Option<String> {
    if !attr.name.ns.is_empty() || attr.prefix().is_some() {
        return None;
    }
    let rest = attr.local_name().strip_prefix("data-")?;
    if rest.bytes().any(|b| b.is_ascii_uppercase()) {
        return None;
    }
    Some(to_camel_case(rest))
}

/// Convert kebab-case to camelCase (only `-` + ASCII lower-case letter folds)
fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('-', Some(next)) if next.is_ascii_lowercase() => {
                result.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => result.push(c),
        }
    }

    result
}

/// Convert camelCase key to its `data-*` attribute name
fn to_attribute_name(key: &str) -> DomResult<String> {
    let bytes = key.as_bytes();
    if bytes
        .windows(2)
        .any(|pair| pair[0] == b'-' && pair[1].is_ascii_lowercase())
    {
        return Err(DomError::Syntax(format!("invalid dataset key {key:?}")));
    }

    let mut result = String::with_capacity(key.len() + 8);
    result.push_str("data-");
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    Ok(result)
}

/// Read-only dataset view
#[derive(Debug, Clone, Copy)]
pub struct Dataset<'a> {
    store: &'a NodeStore,
    element: NodeId,
}

impl<'a> Dataset<'a> {
    /// Get value by camelCase key
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Check if key exists
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in attribute order
    pub fn keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k).collect()
    }

    /// `(key, value)` pairs in attribute order
    pub fn iter(&self) -> impl Iterator<Item = (String, &'a str)> + 'a {
        self.store
            .attributes(self.element)
            .iter()
            .filter_map(|attr| Some((key_for(attr)?, attr.value.as_str())))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Mutable dataset view
#[derive(Debug)]
pub struct DatasetMut<'a> {
    store: &'a mut NodeStore,
    element: NodeId,
}

impl DatasetMut<'_> {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.store.dataset(self.element).get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set value by camelCase key
    pub fn set(&mut self, key: &str, value: &str) -> DomResult<()> {
        let name = to_attribute_name(key)?;
        self.store.set_attribute(self.element, &name, value)
    }

    /// Delete by key; returns whether an attribute was removed
    pub fn remove(&mut self, key: &str) -> bool {
        match to_attribute_name(key) {
            Ok(name) => self.store.remove_attribute(self.element, &name),
            Err(_) => false,
        }
    }
}

impl NodeStore {
    /// Read-only `dataset`
    pub fn dataset(&self, element: NodeId) -> Dataset<'_> {
        Dataset {
            store: self,
            element,
        }
    }

    /// Mutable `dataset`
    pub fn dataset_mut(&mut self, element: NodeId) -> DatasetMut<'_> {
        DatasetMut {
            store: self,
            element,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element() -> (NodeStore, NodeId) {
        let mut store = NodeStore::new();
        let doc = store.create_document();
        let div = store.create_element(doc, "div");
        (store, div)
    }

    #[test]
    fn test_from_attributes() {
        let (mut store, div) = element();
        store.set_attribute(div, "data-user-id", "123").unwrap();
        store.set_attribute(div, "data-active", "true").unwrap();
        store.set_attribute(div, "class", "ignored").unwrap();

        let dataset = store.dataset(div);
        assert_eq!(dataset.get("userId"), Some("123"));
        assert_eq!(dataset.get("active"), Some("true"));
        assert!(!dataset.has("class"));
        assert_eq!(dataset.keys(), vec!["userId", "active"]);
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(to_camel_case("user-id"), "userId");
        assert_eq!(to_camel_case("hello-world"), "helloWorld");
        assert_eq!(to_camel_case("simple"), "simple");
        assert_eq!(to_camel_case("x-1"), "x-1");
    }

    #[test]
    fn test_attribute_name() {
        assert_eq!(to_attribute_name("userId").unwrap(), "data-user-id");
        assert_eq!(to_attribute_name("firstName").unwrap(), "data-first-name");
        assert!(matches!(to_attribute_name("first-name"), Err(DomError::Syntax(_))));
        assert_eq!(to_attribute_name("x-1").unwrap(), "data-x-1");
    }

    #[test]
    fn test_set_and_remove() {
        let (mut store, div) = element();
        store.dataset_mut(div).set("helloWorld", "hi").unwrap();
        assert_eq!(store.get_attribute(div, "data-hello-world"), Some("hi"));
        assert_eq!(store.dataset_mut(div).get("helloWorld"), Some("hi"));

        assert!(store.dataset_mut(div).remove("helloWorld"));
        assert!(!store.has_attribute(div, "data-hello-world"));
        assert!(store.dataset(div).is_empty());
        assert!(store.dataset_mut(div).set("bad-key", "x").is_err());
    }
}
