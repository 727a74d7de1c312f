//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts the result into the node store.
//! Template contents are flattened into the template element's children.

use arbor_dom::{Attribute, ElementData, NodeData, NodeId, NodeStore, QualName};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use tracing::{debug, warn};

/// Parser options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Parse `<noscript>` as raw text, as a browser with scripting would
    pub scripting_enabled: bool,
    /// Keep text nodes that contain only whitespace
    pub keep_whitespace_text: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            scripting_enabled: true,
            keep_whitespace_text: true,
        }
    }
}

/// HTML5 parser
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    options: ParseOptions,
}

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Parse a complete document into `store`, returning the Document node
    pub fn parse(&self, store: &mut NodeStore, html: &str) -> NodeId {
        debug!(bytes = html.len(), "parsing HTML document");
        let dom = self.parse_rcdom(html);

        let document = store.create_document();
        for child in dom.document.children.borrow().iter() {
            if let Some(node) = self.convert(store, document, child) {
                self.append(store, document, node);
            }
        }

        debug!(
            %document,
            nodes = store.descendants(document).count() + 1,
            "parsed HTML document"
        );
        document
    }

    /// Parse markup as `<body>` content, returning detached top-level nodes
    /// owned by `document`
    pub fn parse_fragment(&self, store: &mut NodeStore, document: NodeId, html: &str) -> Vec<NodeId> {
        let dom = self.parse_rcdom(html);
        let container = find_body(&dom).unwrap_or_else(|| dom.document.clone());

        let nodes: Vec<NodeId> = container
            .children
            .borrow()
            .iter()
            .filter_map(|child| self.convert(store, document, child))
            .collect();
        debug!(count = nodes.len(), "parsed HTML fragment");
        nodes
    }

    fn parse_rcdom(&self, html: &str) -> RcDom {
        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                scripting_enabled: self.options.scripting_enabled,
                ..Default::default()
            },
            ..Default::default()
        };
        parse_document(RcDom::default(), opts).one(html)
    }

    /// Convert an RcDom subtree; `None` when the root is dropped
    fn convert(&self, store: &mut NodeStore, document: NodeId, handle: &Handle) -> Option<NodeId> {
        let root = self.convert_node(store, document, handle)?;

        // explicit stack so deeply nested markup cannot overflow
        let mut stack: Vec<(Handle, NodeId)> = vec![(handle.clone(), root)];
        while let Some((source, target)) = stack.pop() {
            let mut children: Vec<Handle> = source.children.borrow().clone();
            if let RcNodeData::Element {
                template_contents, ..
            } = &source.data
                && let Some(contents) = template_contents.borrow().as_ref()
            {
                children.extend(contents.children.borrow().iter().cloned());
            }

            for child in children {
                if let Some(node) = self.convert_node(store, document, &child) {
                    self.append(store, target, node);
                    stack.push((child, node));
                }
            }
        }
        Some(root)
    }

    /// Create the store node for a single RcDom node
    fn convert_node(&self, store: &mut NodeStore, document: NodeId, handle: &Handle) -> Option<NodeId> {
        let data = match &handle.data {
            RcNodeData::Document => return None,
            RcNodeData::Doctype {
                name,
                public_id,
                system_id,
            } => NodeData::Doctype {
                name: name.to_string(),
                public_id: public_id.to_string(),
                system_id: system_id.to_string(),
            },
            RcNodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                if !self.options.keep_whitespace_text && text.trim().is_empty() {
                    return None;
                }
                NodeData::Text(text)
            }
            RcNodeData::Comment { contents } => NodeData::Comment(contents.to_string()),
            RcNodeData::Element { name, attrs, .. } => {
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| Attribute::new(convert_name(&attr.name), attr.value.to_string()))
                    .collect();
                NodeData::Element(ElementData::with_attrs(convert_name(name), attrs))
            }
            RcNodeData::ProcessingInstruction { target, contents } => {
                NodeData::ProcessingInstruction {
                    target: target.to_string(),
                    data: contents.to_string(),
                }
            }
        };
        Some(store.create_node(document, data))
    }

    fn append(&self, store: &mut NodeStore, parent: NodeId, node: NodeId) {
        if let Err(err) = store.append_child(parent, node) {
            warn!(%parent, %node, %err, "dropped node the tree cannot hold");
        }
    }
}

fn convert_name(name: &html5ever::QualName) -> QualName {
    QualName::new(
        name.prefix.as_ref().map(|p| p.to_string()),
        name.ns.to_string(),
        name.local.to_string(),
    )
}

fn find_child(parent: &Handle, local: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| matches!(&child.data, RcNodeData::Element { name, .. } if &*name.local == local))
        .cloned()
}

fn find_body(dom: &RcDom) -> Option<Handle> {
    let html = find_child(&dom.document, "html")?;
    find_child(&html, "body")
}
