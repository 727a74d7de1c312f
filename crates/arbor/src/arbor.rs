//! Arbor - Main entry point

use arbor_css::ElementQuery;
use arbor_dom::{InsertPosition, NodeId, NodeStore};
use arbor_html::{DomParser, HtmlParser, HtmlSerializer};

use crate::{Config, Result};

/// A node store plus the parser and serializer configured for it
///
/// Every document parsed through one `Arbor` lives in the same store, so
/// nodes can move between them and be compared by document position.
#[derive(Debug)]
pub struct Arbor {
    config: Config,
    store: NodeStore,
    parser: HtmlParser,
    serializer: HtmlSerializer,
}

impl Arbor {
    /// Create an empty store with the given configuration
    pub fn new(config: Config) -> Self {
        tracing::info!("Arbor {} initialized", crate::VERSION);
        Self {
            config,
            store: NodeStore::new(),
            parser: config.into(),
            serializer: config.into(),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut NodeStore {
        &mut self.store
    }

    /// Parse an HTML document, returning its Document node
    pub fn parse(&mut self, html: &str) -> NodeId {
        self.parser.parse(&mut self.store, html)
    }

    /// `DOMParser.parseFromString`
    pub fn parse_from_string(&mut self, html: &str, mime_type: &str) -> Result<NodeId> {
        let parser = DomParser::with_options(self.parser.options());
        Ok(parser.parse_from_string(&mut self.store, html, mime_type)?)
    }

    /// Serialize a node including itself
    pub fn serialize(&self, node: NodeId) -> String {
        self.serializer.serialize_outer(&self.store, node)
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        self.serializer.serialize_inner(&self.store, node)
    }

    pub fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<()> {
        Ok(self.parser.set_inner_html(&mut self.store, node, html)?)
    }

    pub fn set_outer_html(&mut self, node: NodeId, html: &str) -> Result<()> {
        Ok(self.parser.set_outer_html(&mut self.store, node, html)?)
    }

    pub fn insert_adjacent_html(
        &mut self,
        node: NodeId,
        position: InsertPosition,
        html: &str,
    ) -> Result<()> {
        Ok(self
            .parser
            .insert_adjacent_html(&mut self.store, node, position, html)?)
    }

    pub fn matches(&self, element: NodeId, selector: &str) -> Result<bool> {
        Ok(self.store.matches(element, selector)?)
    }

    pub fn closest(&self, element: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.store.closest(element, selector)?)
    }

    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.store.query_selector(scope, selector)?)
    }

    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        Ok(self.store.query_selector_all(scope, selector)?)
    }
}

impl Default for Arbor {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
