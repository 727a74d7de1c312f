//! Arbor
//!
//! An in-memory, mutable HTML DOM with CSS selector queries.
//!
//! # Example
//! ```rust,ignore
//! use arbor::{Arbor, Config};
//!
//! let mut arbor = Arbor::new(Config::default());
//! let doc = arbor.parse("<ul><li>a</li><li>b</li></ul>");
//! let items = arbor.query_selector_all(doc, "li")?;
//! println!("{}", arbor.serialize(items[1]));
//! ```

mod arbor;
mod config;
mod error;

pub use arbor::Arbor;
pub use config::Config;
pub use error::{Error, Result};

pub use arbor_css::{ElementQuery, SelectorError, SelectorList};
pub use arbor_dom::{DocumentPosition, DomError, InsertPosition, NodeData, NodeId, NodeStore, NodeType};
pub use arbor_html::{DomParser, HtmlError, HtmlMarkup, HtmlParser, HtmlSerializer, ParseOptions};

// Re-export sub-crates for advanced usage
pub use arbor_css as css;
pub use arbor_dom as dom;
pub use arbor_html as html;

/// Arbor version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
