//! Facade error

use thiserror::Error;

/// Any error raised through the [`Arbor`](crate::Arbor) entry point
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("DOM error: {0}")]
    Dom(#[from] arbor_dom::DomError),

    #[error("Selector error: {0}")]
    Selector(#[from] arbor_css::SelectorError),

    #[error("HTML error: {0}")]
    Html(#[from] arbor_html::HtmlError),
}

pub type Result<T> = std::result::Result<T, Error>;
