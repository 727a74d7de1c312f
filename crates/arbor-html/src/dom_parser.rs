//! DOMParser
//!
//! `parseFromString` for `text/html`. Other MIME types are rejected.

use arbor_dom::{NodeId, NodeStore};
use tracing::warn;

use crate::error::{HtmlError, Result};
use crate::parser::{HtmlParser, ParseOptions};

/// The only MIME type this parser accepts
pub const TEXT_HTML: &str = "text/html";

#[derive(Debug, Clone, Default)]
pub struct DomParser {
    parser: HtmlParser,
}

impl DomParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            parser: HtmlParser::with_options(options),
        }
    }

    /// Parse `html` into a new Document in `store`
    pub fn parse_from_string(&self, store: &mut NodeStore, html: &str, mime_type: &str) -> Result<NodeId> {
        if mime_type != TEXT_HTML {
            warn!(mime_type, "rejecting unsupported mime type");
            return Err(HtmlError::UnsupportedMimeType(mime_type.to_owned()));
        }
        Ok(self.parser.parse(store, html))
    }
}
