//! Element query API
//!
//! `matches`, `closest` and the `querySelector` family on top of
//! [`NodeStore`]. String-taking methods parse on every call; hold a
//! [`SelectorList`] and use [`ElementQuery::select`] to reuse one.

use arbor_dom::{NodeId, NodeStore};
use tracing::trace;

use crate::matching::matches_list;
use crate::parser::parse_selector_list;
use crate::selectors::SelectorList;
use crate::Result;

/// Selector queries over elements in a [`NodeStore`]
pub trait ElementQuery {
    /// Does `element` match the selector? Non-elements never match.
    fn matches(&self, element: NodeId, selector: &str) -> Result<bool>;

    /// Innermost inclusive ancestor element matching the selector
    fn closest(&self, element: NodeId, selector: &str) -> Result<Option<NodeId>>;

    /// First matching descendant of `scope` in tree order
    fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>>;

    /// All matching descendants of `scope` in tree order
    fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>>;

    /// First match for an already parsed list
    fn select(&self, scope: NodeId, list: &SelectorList) -> Option<NodeId>;

    /// All matches for an already parsed list
    fn select_all(&self, scope: NodeId, list: &SelectorList) -> Vec<NodeId>;
}

impl ElementQuery for NodeStore {
    fn matches(&self, element: NodeId, selector: &str) -> Result<bool> {
        let list = parse_selector_list(selector)?;
        Ok(self.is_element(element) && matches_list(self, &list, element))
    }

    fn closest(&self, element: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let list = parse_selector_list(selector)?;
        Ok(self
            .inclusive_ancestors(element)
            .filter(|&n| self.is_element(n))
            .find(|&n| matches_list(self, &list, n)))
    }

    fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let list = parse_selector_list(selector)?;
        Ok(self.select(scope, &list))
    }

    fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let list = parse_selector_list(selector)?;
        let found = self.select_all(scope, &list);
        trace!(%scope, selector, count = found.len(), "query_selector_all");
        Ok(found)
    }

    fn select(&self, scope: NodeId, list: &SelectorList) -> Option<NodeId> {
        self.descendants(scope)
            .find(|&n| self.is_element(n) && matches_list(self, list, n))
    }

    fn select_all(&self, scope: NodeId, list: &SelectorList) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&n| self.is_element(n) && matches_list(self, list, n))
            .collect()
    }
}
