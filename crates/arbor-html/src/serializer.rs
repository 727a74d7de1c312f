//! HTML Serialization (innerHTML/outerHTML)
//!
//! Key features:
//! - HTML escaping for text and attribute values
//! - Void elements without end tags
//! - Raw text elements written verbatim
//! - Qualified names for foreign elements and namespaced attributes

use std::borrow::Cow;

use arbor_dom::{Attribute, ElementData, NodeData, NodeId, NodeStore, ns};

/// HTML serializer
#[derive(Debug, Clone)]
pub struct HtmlSerializer {
    /// Whether to format output with indentation
    pub pretty_print: bool,
    /// Indentation string
    pub indent: String,
    /// `<noscript>` content is raw text when scripting is enabled
    pub scripting_enabled: bool,
}

/// Void elements (no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Raw text elements (no escaping for content)
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self {
            pretty_print: false,
            indent: "  ".to_string(),
            scripting_enabled: true,
        }
    }
}

impl HtmlSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self {
            pretty_print: true,
            ..Self::default()
        }
    }

    /// Serialize innerHTML of a node (children only)
    pub fn serialize_inner(&self, store: &NodeStore, node: NodeId) -> String {
        let mut stack = Vec::new();
        push_children(store, node, 0, &mut stack);
        self.serialize(store, stack)
    }

    /// Serialize outerHTML of a node (including the node itself)
    pub fn serialize_outer(&self, store: &NodeStore, node: NodeId) -> String {
        self.serialize(store, vec![Step::Open(node, 0)])
    }

    /// Walk with an explicit stack so deep trees cannot overflow
    fn serialize(&self, store: &NodeStore, mut stack: Vec<Step>) -> String {
        let mut output = String::new();
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(node, depth) => {
                    self.open_node(store, node, depth, &mut stack, &mut output)
                }
                Step::Close(node, depth) => self.close_element(store, node, depth, &mut output),
            }
        }
        output
    }

    fn open_node(
        &self,
        store: &NodeStore,
        node: NodeId,
        depth: usize,
        stack: &mut Vec<Step>,
        output: &mut String,
    ) {
        match store.data(node) {
            NodeData::Document | NodeData::DocumentFragment => {
                push_children(store, node, depth, stack);
            }
            NodeData::Element(elem) => {
                if self.open_element(elem, output, depth) {
                    stack.push(Step::Close(node, depth));
                    push_children(store, node, depth + 1, stack);
                }
            }
            NodeData::Text(text) => {
                if self.is_raw_text_parent(store, node) {
                    output.push_str(text);
                } else {
                    escape_text(text, output);
                }
            }
            NodeData::Comment(text) => {
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
            NodeData::Doctype { name, .. } => {
                output.push_str("<!DOCTYPE ");
                output.push_str(name);
                output.push('>');
            }
            NodeData::ProcessingInstruction { target, data } => {
                output.push_str("<?");
                output.push_str(target);
                output.push(' ');
                output.push_str(data);
                output.push('>');
            }
        }
    }

    /// Write the start tag; false for void elements, which take no end tag
    fn open_element(&self, elem: &ElementData, output: &mut String, depth: usize) -> bool {
        if self.pretty_print && depth > 0 {
            newline(output, &self.indent, depth);
        }

        output.push('<');
        output.push_str(&tag_name(elem));
        for attr in elem.attrs() {
            output.push(' ');
            push_attribute_name(attr, output);
            output.push_str("=\"");
            escape_attribute(&attr.value, output);
            output.push('"');
        }
        output.push('>');

        !(elem.is_html() && VOID_ELEMENTS.contains(&elem.local_name()))
    }

    fn close_element(&self, store: &NodeStore, node: NodeId, depth: usize, output: &mut String) {
        let Some(elem) = store.element(node) else {
            return;
        };
        if self.pretty_print && store.children(node).any(|c| store.is_element(c)) {
            newline(output, &self.indent, depth);
        }
        output.push_str("</");
        output.push_str(&tag_name(elem));
        output.push('>');
    }

    fn is_raw_text_parent(&self, store: &NodeStore, node: NodeId) -> bool {
        store
            .parent(node)
            .and_then(|p| store.element(p))
            .is_some_and(|el| {
                el.is_html()
                    && (RAW_TEXT_ELEMENTS.contains(&el.local_name())
                        || (self.scripting_enabled && el.local_name() == "noscript"))
            })
    }
}

/// Pending work for the serializer walk
enum Step {
    Open(NodeId, usize),
    Close(NodeId, usize),
}

/// Queue `parent`'s children so they pop in document order
fn push_children(store: &NodeStore, parent: NodeId, depth: usize, stack: &mut Vec<Step>) {
    stack.extend(store.children(parent).rev().map(|child| Step::Open(child, depth)));
}

fn tag_name(elem: &ElementData) -> Cow<'_, str> {
    if elem.is_html() {
        Cow::Borrowed(elem.local_name())
    } else {
        elem.name.qualified()
    }
}

fn newline(output: &mut String, indent: &str, depth: usize) {
    output.push('\n');
    for _ in 0..depth {
        output.push_str(indent);
    }
}

/// Serialized attribute name: well-known namespaces get their usual prefix
fn push_attribute_name(attr: &Attribute, output: &mut String) {
    let prefix = match attr.namespace() {
        None => None,
        Some(ns::XML) => Some("xml"),
        Some(ns::XMLNS) if attr.local_name() == "xmlns" => None,
        Some(ns::XMLNS) => Some("xmlns"),
        Some(ns::XLINK) => Some("xlink"),
        Some(_) => attr.prefix(),
    };
    if let Some(prefix) = prefix {
        output.push_str(prefix);
        output.push(':');
    }
    output.push_str(attr.local_name());
}

/// Escape text content for HTML
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inner_html(store: &NodeStore, node: NodeId) -> String {
        HtmlSerializer::new().serialize_inner(store, node)
    }

    fn outer_html(store: &NodeStore, node: NodeId) -> String {
        HtmlSerializer::new().serialize_outer(store, node)
    }

    #[test]
    fn test_escape_text() {
        let mut output = String::new();
        escape_text("Hello <world> & \"friends\"\u{a0}", &mut output);
        assert_eq!(output, "Hello &lt;world&gt; &amp; \"friends\"&nbsp;");
    }

    #[test]
    fn test_escape_attribute() {
        let mut output = String::new();
        escape_attribute("Hello <world> & \"friends\"", &mut output);
        assert_eq!(output, "Hello <world> &amp; &quot;friends&quot;");
    }

    #[test]
    fn test_void_elements() {
        assert!(VOID_ELEMENTS.contains(&"br"));
        assert!(VOID_ELEMENTS.contains(&"img"));
        assert!(VOID_ELEMENTS.contains(&"input"));
        assert!(!VOID_ELEMENTS.contains(&"div"));
    }

    #[test]
    fn test_serialize_built_tree() {
        let mut store = NodeStore::new();
        let doc = store.create_document();
        let div = store.create_element(doc, "div");
        store.set_attribute(div, "title", "a \"b\"").unwrap();
        store.set_attribute(div, "hidden", "").unwrap();
        let br = store.create_element(doc, "br");
        let text = store.create_text_node(doc, "1 < 2");
        let comment = store.create_comment(doc, "c");
        for child in [br, text, comment] {
            store.append_child(div, child).unwrap();
        }

        assert_eq!(
            outer_html(&store, div),
            "<div title=\"a &quot;b&quot;\" hidden=\"\"><br>1 &lt; 2<!--c--></div>"
        );
        assert_eq!(inner_html(&store, div), "<br>1 &lt; 2<!--c-->");
    }

    #[test]
    fn test_raw_text_and_noscript() {
        let mut store = NodeStore::new();
        let doc = store.create_document();
        let script = store.create_element(doc, "script");
        let code = store.create_text_node(doc, "a < b && c");
        store.append_child(script, code).unwrap();
        assert_eq!(outer_html(&store, script), "<script>a < b && c</script>");

        let noscript = store.create_element(doc, "noscript");
        let text = store.create_text_node(doc, "<b>");
        store.append_child(noscript, text).unwrap();
        assert_eq!(outer_html(&store, noscript), "<noscript><b></noscript>");

        let serializer = HtmlSerializer {
            scripting_enabled: false,
            ..HtmlSerializer::new()
        };
        assert_eq!(
            serializer.serialize_outer(&store, noscript),
            "<noscript>&lt;b&gt;</noscript>"
        );
    }

    #[test]
    fn test_doctype_and_processing_instruction() {
        let mut store = NodeStore::new();
        let doc = store.create_document();
        let doctype = store.create_document_type(doc, "html", "", "");
        let pi = store.create_processing_instruction(doc, "xml-stylesheet", "href=a").unwrap();
        assert_eq!(outer_html(&store, doctype), "<!DOCTYPE html>");
        assert_eq!(outer_html(&store, pi), "<?xml-stylesheet href=a>");
    }

    #[test]
    fn test_foreign_names() {
        let mut store = NodeStore::new();
        let doc = store.create_document();
        let svg = store.create_element_ns(doc, Some(ns::SVG), "svg:rect").unwrap();
        store
            .set_attribute_ns(svg, Some(ns::XLINK), "xlink:href", "#x")
            .unwrap();
        store
            .set_attribute_ns(svg, Some("urn:other"), "o:thing", "1")
            .unwrap();
        assert_eq!(
            outer_html(&store, svg),
            "<svg:rect xlink:href=\"#x\" o:thing=\"1\"></svg:rect>"
        );
    }

    #[test]
    fn test_pretty_print() {
        let mut store = NodeStore::new();
        let doc = store.create_document();
        let ul = store.create_element(doc, "ul");
        let li = store.create_element(doc, "li");
        let text = store.create_text_node(doc, "x");
        store.append_child(li, text).unwrap();
        store.append_child(ul, li).unwrap();

        assert_eq!(
            HtmlSerializer::pretty().serialize_outer(&store, ul),
            "<ul>\n  <li>x</li>\n</ul>"
        );
    }
}
