//! DOMTokenList (classList)
//!
//! Live views over an element's `class` attribute. Reads parse the current
//! attribute value; writes serialize the ordered, de-duplicated token set
//! back into it.

use crate::error::{DomError, DomResult};
use crate::node::QualName;
use crate::tree::NodeStore;
use crate::NodeId;

/// Ordered set of space-separated tokens
#[derive(Debug, Clone, Default)]
struct TokenSet {
    tokens: Vec<String>,
}

impl TokenSet {
    /// Parse from space-separated string, dropping duplicates
    fn from_string(s: &str) -> Self {
        let mut set = Self::default();
        for token in s.split_ascii_whitespace() {
            if !set.contains(token) {
                set.tokens.push(token.to_owned());
            }
        }
        set
    }

    fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    fn add(&mut self, token: &str) {
        if !self.contains(token) {
            self.tokens.push(token.to_owned());
        }
    }

    fn remove(&mut self, token: &str) {
        self.tokens.retain(|t| t != token);
    }

    /// The first of `old`/`new` becomes `new`; later copies of either go
    fn replace(&mut self, old: &str, new: &str) -> bool {
        if !self.contains(old) {
            return false;
        }
        let mut placed = false;
        self.tokens.retain_mut(|t| {
            if t.as_str() != old && t.as_str() != new {
                return true;
            }
            if placed {
                return false;
            }
            placed = true;
            *t = new.to_owned();
            true
        });
        true
    }

    fn value(&self) -> String {
        self.tokens.join(" ")
    }
}

fn validate_token(token: &str) -> DomResult<()> {
    if token.is_empty() {
        return Err(DomError::Syntax("empty token".into()));
    }
    if token.contains(|c: char| c.is_ascii_whitespace()) {
        return Err(DomError::InvalidCharacter(token.to_owned()));
    }
    Ok(())
}

/// Read-only class list view
#[derive(Debug, Clone, Copy)]
pub struct ClassList<'a> {
    store: &'a NodeStore,
    element: NodeId,
}

impl<'a> ClassList<'a> {
    /// Raw attribute value
    pub fn value(&self) -> &'a str {
        self.store.class_name(self.element)
    }

    /// Tokens in order, without duplicates
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + 'a {
        let value = self.value();
        value
            .split_ascii_whitespace()
            .enumerate()
            .filter(move |&(i, token)| !value.split_ascii_whitespace().take(i).any(|t| t == token))
            .map(|(_, token)| token)
    }

    /// Get number of tokens
    pub fn length(&self) -> usize {
        self.iter().count()
    }

    /// Get token at index
    pub fn item(&self, index: usize) -> Option<&'a str> {
        self.iter().nth(index)
    }

    /// Check if token exists
    pub fn contains(&self, token: &str) -> bool {
        self.value().split_ascii_whitespace().any(|t| t == token)
    }
}

/// Mutable class list view
#[derive(Debug)]
pub struct ClassListMut<'a> {
    store: &'a mut NodeStore,
    element: NodeId,
}

impl ClassListMut<'_> {
    fn read(&self) -> TokenSet {
        TokenSet::from_string(self.store.class_name(self.element))
    }

    fn has_attribute(&self) -> bool {
        self.store
            .element(self.element)
            .is_some_and(|el| el.get("class").is_some())
    }

    /// Write back; an absent attribute stays absent when nothing is left
    fn write(&mut self, set: &TokenSet) -> DomResult<()> {
        if set.tokens.is_empty() && !self.has_attribute() {
            return Ok(());
        }
        self.store
            .write_attribute(self.element, QualName::local("class"), set.value())
    }

    pub fn value(&self) -> &str {
        self.store.class_name(self.element)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.read().contains(token)
    }

    pub fn length(&self) -> usize {
        self.read().tokens.len()
    }

    /// Add token(s)
    pub fn add(&mut self, tokens: &[&str]) -> DomResult<()> {
        tokens.iter().try_for_each(|t| validate_token(t))?;
        let mut set = self.read();
        for token in tokens {
            set.add(token);
        }
        self.write(&set)
    }

    /// Remove token(s)
    pub fn remove(&mut self, tokens: &[&str]) -> DomResult<()> {
        tokens.iter().try_for_each(|t| validate_token(t))?;
        let mut set = self.read();
        for token in tokens {
            set.remove(token);
        }
        self.write(&set)
    }

    /// Toggle token, returns new state
    pub fn toggle(&mut self, token: &str, force: Option<bool>) -> DomResult<bool> {
        validate_token(token)?;
        let mut set = self.read();
        let present = set.contains(token);
        let wanted = force.unwrap_or(!present);
        match (present, wanted) {
            (false, true) => set.add(token),
            (true, false) => set.remove(token),
            // already in the requested state
            _ => return Ok(wanted),
        }
        self.write(&set)?;
        Ok(wanted)
    }

    /// Replace token; `false` when `old` is absent
    pub fn replace(&mut self, old: &str, new: &str) -> DomResult<bool> {
        validate_token(old)?;
        validate_token(new)?;
        let mut set = self.read();
        if !set.replace(old, new) {
            return Ok(false);
        }
        self.write(&set)?;
        Ok(true)
    }
}

impl NodeStore {
    /// Read-only `classList`
    pub fn class_list(&self, element: NodeId) -> ClassList<'_> {
        ClassList {
            store: self,
            element,
        }
    }

    /// Mutable `classList`
    pub fn class_list_mut(&mut self, element: NodeId) -> ClassListMut<'_> {
        ClassListMut {
            store: self,
            element,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(class: Option<&str>) -> (NodeStore, NodeId) {
        let mut store = NodeStore::new();
        let doc = store.create_document();
        let div = store.create_element(doc, "div");
        if let Some(class) = class {
            store.set_class_name(div, class).unwrap();
        }
        (store, div)
    }

    #[test]
    fn test_read_view() {
        let (store, div) = element(Some("btn  btn-primary btn active"));
        let list = store.class_list(div);
        assert_eq!(list.length(), 3);
        assert_eq!(list.item(1), Some("btn-primary"));
        assert_eq!(list.item(3), None);
        assert!(list.contains("active"));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["btn", "btn-primary", "active"]);
    }

    #[test]
    fn test_add_serializes_set() {
        let (mut store, div) = element(Some("foo bar foo"));
        store.class_list_mut(div).add(&["baz", "bar"]).unwrap();
        assert_eq!(store.class_name(div), "foo bar baz");
    }

    #[test]
    fn test_toggle() {
        let (mut store, div) = element(Some("bar"));
        assert_eq!(store.class_list_mut(div).toggle("foo", None), Ok(true));
        assert_eq!(store.class_name(div), "bar foo");
        assert_eq!(store.class_list_mut(div).toggle("foo", None), Ok(false));
        assert_eq!(store.class_name(div), "bar");
        assert_eq!(store.class_list_mut(div).toggle("bar", Some(true)), Ok(true));
        assert_eq!(store.class_list_mut(div).toggle("qux", Some(false)), Ok(false));
        assert_eq!(store.class_name(div), "bar");
    }

    #[test]
    fn test_replace() {
        let (mut store, div) = element(Some("a b c"));
        assert_eq!(store.class_list_mut(div).replace("b", "z"), Ok(true));
        assert_eq!(store.class_name(div), "a z c");
        assert_eq!(store.class_list_mut(div).replace("c", "a"), Ok(true));
        assert_eq!(store.class_name(div), "a z");
        assert_eq!(store.class_list_mut(div).replace("missing", "x"), Ok(false));
    }

    #[test]
    fn test_absent_attribute_not_created() {
        let (mut store, div) = element(None);
        store.class_list_mut(div).remove(&["x"]).unwrap();
        assert!(!store.has_attribute(div, "class"));
        store.class_list_mut(div).add(&["x"]).unwrap();
        store.class_list_mut(div).remove(&["x"]).unwrap();
        assert_eq!(store.get_attribute(div, "class"), Some(""));
    }

    #[test]
    fn test_invalid_tokens() {
        let (mut store, div) = element(Some("a"));
        assert!(matches!(
            store.class_list_mut(div).add(&["ok", ""]),
            Err(DomError::Syntax(_))
        ));
        assert!(matches!(
            store.class_list_mut(div).toggle("a b", None),
            Err(DomError::InvalidCharacter(_))
        ));
        assert_eq!(store.class_name(div), "a");
    }
}
