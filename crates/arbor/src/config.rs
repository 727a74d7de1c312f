//! Arbor Configuration

use arbor_html::{HtmlParser, HtmlSerializer, ParseOptions};
use serde::{Deserialize, Serialize};

/// Parsing and serialization options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Parse and serialize `<noscript>` as a scripting browser would
    pub scripting_enabled: bool,

    /// Keep whitespace-only text nodes when parsing
    pub keep_whitespace_text: bool,

    /// Indent serialized markup
    pub pretty_print: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scripting_enabled: true,
            keep_whitespace_text: true,
            pretty_print: false,
        }
    }
}

impl From<Config> for ParseOptions {
    fn from(config: Config) -> Self {
        ParseOptions {
            scripting_enabled: config.scripting_enabled,
            keep_whitespace_text: config.keep_whitespace_text,
        }
    }
}

impl From<Config> for HtmlParser {
    fn from(config: Config) -> Self {
        HtmlParser::with_options(config.into())
    }
}

impl From<Config> for HtmlSerializer {
    fn from(config: Config) -> Self {
        HtmlSerializer {
            pretty_print: config.pretty_print,
            scripting_enabled: config.scripting_enabled,
            ..HtmlSerializer::default()
        }
    }
}
