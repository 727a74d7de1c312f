//! Arbor HTML
//!
//! HTML5 parsing built on html5ever, serialization back to markup, a
//! `DOMParser` entry point and innerHTML/outerHTML style mutation.

mod dom_parser;
mod error;
mod markup;
mod parser;
mod serializer;

pub use dom_parser::{DomParser, TEXT_HTML};
pub use error::{HtmlError, Result};
pub use markup::HtmlMarkup;
pub use parser::{HtmlParser, ParseOptions};
pub use serializer::HtmlSerializer;

use arbor_dom::{NodeId, NodeStore};

/// Parse an HTML document into `store` with default options
pub fn parse(store: &mut NodeStore, html: &str) -> NodeId {
    HtmlParser::new().parse(store, html)
}
